use super::*;
use crate::atlas::AtlasReader;
use crate::dump::test_support::{StubSource, sample_place_line};
use geoatlas_core::{COUNTRY_CODES, PlaceFilter};
use rstest::{fixture, rstest};
use std::fs;
use tempfile::TempDir;

struct Workdir {
    _guard: TempDir,
    path: Utf8PathBuf,
}

#[fixture]
fn workdir() -> Workdir {
    let guard = TempDir::new().expect("create temp dir");
    let path = Utf8PathBuf::from_path_buf(guard.path().join("atlas")).expect("utf-8 path");
    Workdir {
        _guard: guard,
        path,
    }
}

fn places() -> String {
    [
        sample_place_line(1, "Zed City", "ZZ", "5000", "Etc/Zulu"),
        sample_place_line(2, "Hamlet", "ZZ", "40", "Etc/Zulu"),
        sample_place_line(3, "Driftwood", "ZZ", "1200", ""),
    ]
    .concat()
}

#[fixture]
fn source() -> StubSource {
    StubSource::sample(&places()).expect("build sample archive")
}

#[rstest]
fn config_defaults_to_the_catalogue() {
    let config = AtlasConfig::new("/data");
    assert_eq!(config.country_codes().len(), COUNTRY_CODES.len());
    assert_eq!(config.place_filter(), &PlaceFilter::default());
    assert_eq!(config.input_dir(), "/data/in");
    assert_eq!(config.output_path(), "/data/out/atlas.db");
}

#[rstest]
fn builds_a_complete_atlas(workdir: Workdir, source: StubSource) {
    let config = AtlasConfig::new(workdir.path.clone()).with_country_codes(["ZZ"]);

    let report = build_atlas(&config, &source).expect("build atlas");

    assert_eq!(report.timezones, 2);
    assert_eq!(report.countries, 1);
    assert_eq!(report.places, [("ZZ".to_owned(), 2)]);
    assert_eq!(report.total_places(), 2);
    assert_eq!(report.output_path, workdir.path.join("out/atlas.db"));

    let reader = AtlasReader::open(&report.output_path).expect("open atlas");
    let found = reader.search("Drift", "ZZ").expect("search places");
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].timezone, "?");
    assert!(workdir.path.join("in/_timeZones.txt").is_file());
    assert!(workdir.path.join("in/ZZ.txt").is_file());
}

#[rstest]
fn existing_output_blocks_the_build(workdir: Workdir, source: StubSource) {
    let config = AtlasConfig::new(workdir.path.clone()).with_country_codes(["ZZ"]);
    fs::create_dir_all(workdir.path.join("out")).expect("create out dir");
    fs::write(config.output_path(), b"previous build").expect("seed output");

    let err = build_atlas(&config, &source).expect_err("output exists");

    assert!(matches!(err, BuildError::OutputExists { ref path } if *path == config.output_path()));
    assert!(!workdir.path.join("in").exists(), "nothing is fetched");
    assert_eq!(
        fs::read(config.output_path()).expect("read output"),
        b"previous build"
    );
}

#[rstest]
fn failure_keeps_committed_batches(workdir: Workdir, source: StubSource) {
    let config = AtlasConfig::new(workdir.path.clone()).with_country_codes(["ZZ", "QQ"]);

    let err = build_atlas(&config, &source).expect_err("QQ is not published");

    match err {
        BuildError::Acquire { stage, .. } => assert_eq!(stage, BuildStage::Places("QQ".into())),
        other => panic!("unexpected error: {other:?}"),
    }
    let reader = AtlasReader::open(config.output_path()).expect("open partial atlas");
    assert_eq!(reader.countries().expect("list countries").len(), 1);
    assert_eq!(reader.search("Zed", "ZZ").expect("search").len(), 1);

    let rerun = build_atlas(&config, &source).expect_err("partial output blocks rerun");
    assert!(matches!(rerun, BuildError::OutputExists { .. }));
}

#[rstest]
fn places_for_unknown_countries_fail_to_load(workdir: Workdir) {
    let source = StubSource::sample(&sample_place_line(7, "Orphan", "QQ", "5000", "Etc/Zulu"))
        .expect("build sample archive");
    let config = AtlasConfig::new(workdir.path.clone()).with_country_codes(["ZZ"]);

    let err = build_atlas(&config, &source).expect_err("country missing");

    assert!(matches!(
        err,
        BuildError::Load {
            stage: BuildStage::Places(ref code),
            source: LoadError::Constraint { table: "places", .. },
        } if code == "ZZ"
    ));
}

#[rstest]
fn malformed_sources_report_the_stage(workdir: Workdir) {
    let source = StubSource::default()
        .with_file("timeZones.txt", "header\nZZ\tEtc/Zulu\tnoon\t0.0\t0.0\n");
    let config = AtlasConfig::new(workdir.path.clone()).with_country_codes(["ZZ"]);

    let err = build_atlas(&config, &source).expect_err("bad offset");

    assert!(matches!(
        err,
        BuildError::Parse {
            stage: BuildStage::Timezones,
            source: ParseFileError::Record { line: 1, .. },
            ..
        }
    ));
}

#[rstest]
fn stages_advance_in_order(workdir: Workdir, source: StubSource) {
    let config = AtlasConfig::new(workdir.path.clone());
    let pipeline = AtlasPipeline::create(&config, &source).expect("create atlas");
    let pipeline = pipeline.load_timezones().expect("load timezones");
    assert_eq!(pipeline.report().timezones, 2);
    let mut pipeline = pipeline.load_countries().expect("load countries");
    assert_eq!(pipeline.load_places("ZZ").expect("load places"), 2);
    let report = pipeline.finish();
    assert_eq!(report.countries, 1);
}

#[rstest]
fn custom_filters_apply_to_places(workdir: Workdir, source: StubSource) {
    let config = AtlasConfig::new(workdir.path.clone())
        .with_country_codes(["ZZ"])
        .with_place_filter(PlaceFilter::new(0, ["ZZ"]));

    let report = build_atlas(&config, &source).expect("build atlas");

    assert_eq!(report.total_places(), 3);
}
