use super::*;
use geoatlas_core::{PLACEHOLDER_TIMEZONE_ID, RecordKind};
use rstest::rstest;
use std::io::{self, Cursor, Read};

const COUNTRIES: &str = "# GeoNames country table\n\
#ISO\tISO3\tISO-Numeric\tfips\tCountry\n\
AD\tAND\t020\tAN\tAndorra\tAndorra la Vella\t468\t77006\tEU\t.ad\tEUR\tEuro\t376\tAD###\t^(?:AD)*(\\d{3})$\tca\t3041565\tES,FR\t\n\
\n\
AQ\tATA\t010\tAY\tAntarctica\t\t14000000\t0\tAN\t.aq\t\t\t\t\t\t\t6697173\t\t\n";

fn place(id: u32, class: &str, country: &str, population: &str, tz: &str) -> String {
    format!(
        "{id}\tPlace {id}\tPlace {id}\t\t42.5\t1.5\t{class}\tPPL\t{country}\t\t\t\t\t\t{population}\t\t900\t{tz}\t2024-01-01\n"
    )
}

struct FailingReader;

impl Read for FailingReader {
    fn read(&mut self, _buf: &mut [u8]) -> io::Result<usize> {
        Err(io::Error::other("disk went away"))
    }
}

#[rstest]
fn parses_timezones_in_file_order() {
    let zones = parse_timezones(Cursor::new(
        "AD\tEurope/Andorra\t1.0\t2.0\t1.0\nFR\tEurope/Paris\t1.0\t2.0\t1.0\n",
    ))
    .expect("valid timezones");
    let ids: Vec<_> = zones.iter().map(|zone| zone.id.as_str()).collect();
    assert_eq!(ids, ["Europe/Andorra", "Europe/Paris"]);
}

#[rstest]
fn short_timezone_line_reports_its_line_number() {
    let err = parse_timezones(Cursor::new(
        "AD\tEurope/Andorra\t1.0\t2.0\t1.0\n\nFR\tEurope/Paris\t1.0\n",
    ))
    .expect_err("short line");
    match err {
        ParseFileError::Record {
            line,
            source: RecordError::Shape { kind, .. },
        } => {
            assert_eq!(line, 3);
            assert_eq!(kind, RecordKind::Timezone);
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[rstest]
fn skips_country_comments() {
    let countries = parse_countries(Cursor::new(COUNTRIES)).expect("valid countries");
    assert_eq!(countries.len(), 2);
    assert_eq!(countries[0].iso_alpha2, "AD");
    assert_eq!(countries[0].iso_numeric, 20);
    assert_eq!(countries[1].geoname_id, 6_697_173);
}

#[rstest]
fn non_numeric_country_code_is_fatal() {
    let line = "ZZ\tZZZ\tabc\tZZ\tNowhere\t\t0\t0\tEU\t\t\t\t\t\t\t\t1\t\t\n";
    let err = parse_countries(Cursor::new(line)).expect_err("bad iso numeric");
    assert!(matches!(
        err,
        ParseFileError::Record {
            line: 1,
            source: RecordError::InvalidNumber { field: "ISO numeric", .. }
        }
    ));
}

#[rstest]
fn filters_places_while_reading() {
    let file = [
        place(1, "P", "AD", "8022", "Europe/Andorra"),
        place(2, "P", "AD", "12", "Europe/Andorra"),
        place(3, "H", "AD", "50000", "Europe/Andorra"),
        place(4, "P", "AD", "", "Europe/Andorra"),
        place(5, "P", "AD", "many", "Europe/Andorra"),
        place(6, "P", "AD", "1000", ""),
    ]
    .concat();

    let extract = parse_places(Cursor::new(file), &PlaceFilter::default()).expect("valid places");

    assert_eq!(extract.scanned, 6);
    let kept: Vec<_> = extract.places.iter().map(|place| place.geoname_id).collect();
    assert_eq!(kept, [1, 6]);
    assert_eq!(extract.places[1].timezone_id, PLACEHOLDER_TIMEZONE_ID);
}

#[rstest]
fn exempt_countries_keep_unpopulated_places() {
    let file = [place(1, "P", "AQ", "", ""), place(2, "T", "AQ", "", "")].concat();
    let extract = parse_places(Cursor::new(file), &PlaceFilter::default()).expect("valid places");
    assert_eq!(extract.places.len(), 1);
    assert_eq!(extract.places[0].geoname_id, 1);
}

#[rstest]
fn read_errors_are_reported() {
    let err = parse_timezones(io::BufReader::new(FailingReader)).expect_err("read failure");
    assert!(matches!(err, ParseFileError::ReadLine { line: 1, .. }));
}

#[rstest]
fn missing_file_is_an_open_error() {
    let temp = tempfile::tempdir().expect("create temp dir");
    let path = Utf8PathBuf::from_path_buf(temp.path().join("countryInfo.txt")).expect("utf-8 path");
    let err = read_countries(&path).expect_err("file missing");
    assert!(matches!(err, ParseFileError::Open { path: ref missing, .. } if *missing == path));
}

#[rstest]
fn reads_places_from_disk() {
    let temp = tempfile::tempdir().expect("create temp dir");
    let path = Utf8PathBuf::from_path_buf(temp.path().join("AD.txt")).expect("utf-8 path");
    std::fs::write(&path, place(7, "P", "AD", "2000", "Europe/Andorra")).expect("write places");
    let extract = read_places(&path, &PlaceFilter::default()).expect("read places");
    assert_eq!(extract.places.len(), 1);
    assert_eq!(extract.places[0].elevation, None);
}
