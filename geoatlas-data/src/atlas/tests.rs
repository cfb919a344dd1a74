//! Unit tests for the atlas schema, loaders and reader.

use super::*;
use geoatlas_core::{Country, PLACEHOLDER_TIMEZONE_ID, Place, Timezone};
use proptest::prelude::*;
use rstest::{fixture, rstest};
use rusqlite::Connection;

fn country(iso: &str, name: &str) -> Country {
    let iso3 = format!("{iso}X");
    Country::parse(&format!(
        "{iso}\t{iso3}\t999\t{iso}\t{name}\tCapital\t100\t5000\tEU\t.zz\tEUR\tEuro\t+0\t\t\tzz\t1\t\t"
    ))
    .expect("fixture country is valid")
}

fn timezone(id: &str) -> Timezone {
    Timezone::parse(&format!("ZZ\t{id}\t1.0\t2.0\t1.0")).expect("fixture timezone is valid")
}

fn place(id: i64, name: &str, country: &str, tz: &str) -> Place {
    Place::parse(&format!(
        "{id}\t{name}\t{name}\t{name} alt\t48.85\t2.35\tP\tPPL\t{country}\t\t\t\t\t\t5000\t35\t40\t{tz}\t2024-01-01"
    ))
    .expect("fixture place is valid")
}

fn count(connection: &Connection, table: &str) -> i64 {
    connection
        .query_row(&format!("SELECT COUNT(*) FROM {table}"), [], |row| {
            row.get(0)
        })
        .expect("count rows")
}

fn empty_atlas() -> Connection {
    let mut connection = Connection::open_in_memory().expect("open in-memory database");
    initialise_schema(&mut connection).expect("create schema");
    connection
}

#[fixture]
fn atlas() -> Connection {
    empty_atlas()
}

#[fixture]
fn seeded(mut atlas: Connection) -> Connection {
    load_timezones(&mut atlas, &[timezone("Europe/Paris")]).expect("load timezones");
    load_countries(
        &mut atlas,
        &[country("FR", "France"), country("FI", "Finland")],
    )
    .expect("load countries");
    atlas
}

#[rstest]
fn creates_tables_index_and_view(atlas: Connection) {
    let objects: Vec<String> = atlas
        .prepare(
            "SELECT name FROM sqlite_master
                WHERE type IN ('table', 'index', 'view') AND name NOT LIKE 'sqlite_%'
                ORDER BY name",
        )
        .expect("prepare listing")
        .query_map([], |row| row.get(0))
        .expect("list schema objects")
        .collect::<Result<_, _>>()
        .expect("read schema objects");
    assert_eq!(
        objects,
        [
            "countries",
            "idx_places_country",
            "place_details",
            "places",
            "timezones"
        ]
    );
    let foreign_keys: i64 = atlas
        .query_row("PRAGMA foreign_keys", [], |row| row.get(0))
        .expect("read pragma");
    assert_eq!(foreign_keys, 1);
}

#[rstest]
fn schema_is_created_once(mut atlas: Connection) {
    let err = initialise_schema(&mut atlas).expect_err("tables already exist");
    assert!(matches!(
        err,
        SchemaError::Migration {
            step: "create timezones",
            ..
        }
    ));
}

#[rstest]
fn placeholder_timezone_is_inserted_first(mut atlas: Connection) {
    let inserted =
        load_timezones(&mut atlas, &[timezone("Europe/Paris")]).expect("load timezones");
    assert_eq!(inserted, 2);
    let (name, offset): (String, f64) = atlas
        .query_row(
            "SELECT name, gmt_offset FROM timezones ORDER BY id LIMIT 1",
            [],
            |row| Ok((row.get(0)?, row.get(1)?)),
        )
        .expect("read first timezone");
    assert_eq!(name, PLACEHOLDER_TIMEZONE_ID);
    assert_eq!(offset, 0.0);
}

#[rstest]
fn duplicate_timezone_is_a_constraint_violation(mut atlas: Connection) {
    let zones = [timezone("Europe/Paris"), timezone("Europe/Paris")];
    let err = load_timezones(&mut atlas, &zones).expect_err("duplicate id");
    assert!(matches!(
        err,
        LoadError::Constraint { table: "timezones", ref key, .. } if key == "Europe/Paris"
    ));
    assert_eq!(count(&atlas, "timezones"), 0, "batch is rolled back");
}

#[rstest]
fn duplicate_alpha2_rejects_the_batch(mut atlas: Connection) {
    let countries = [country("FR", "France"), country("FR", "Francia")];
    let err = load_countries(&mut atlas, &countries).expect_err("duplicate alpha-2");
    assert!(matches!(
        err,
        LoadError::Constraint { table: "countries", ref key, .. } if key == "FR"
    ));
    assert_eq!(count(&atlas, "countries"), 0);
}

#[rstest]
fn places_reference_parent_rows(mut seeded: Connection) {
    let loaded = load_places(
        &mut seeded,
        &[
            place(1, "Paris", "FR", "Europe/Paris"),
            place(2, "Nowhere", "FR", PLACEHOLDER_TIMEZONE_ID),
        ],
    )
    .expect("load places");
    assert_eq!(loaded, 2);

    let rows: Vec<(String, String, String)> = seeded
        .prepare("SELECT name, country_code, timezone FROM place_details ORDER BY id")
        .expect("prepare view query")
        .query_map([], |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)))
        .expect("query view")
        .collect::<Result<_, _>>()
        .expect("read view rows");
    assert_eq!(
        rows,
        [
            ("Paris".into(), "FR".into(), "Europe/Paris".into()),
            ("Nowhere".into(), "FR".into(), PLACEHOLDER_TIMEZONE_ID.into()),
        ]
    );
}

#[rstest]
#[case::unknown_country(place(1, "Atlantis", "ZZ", "Europe/Paris"))]
#[case::unknown_timezone(place(1, "Paris", "FR", "Mars/Olympus"))]
fn unresolved_references_abort_the_batch(mut seeded: Connection, #[case] orphan: Place) {
    let batch = [place(9, "Lyon", "FR", "Europe/Paris"), orphan];
    let err = load_places(&mut seeded, &batch).expect_err("unresolved reference");
    assert!(matches!(err, LoadError::Constraint { table: "places", .. }));
    assert_eq!(count(&seeded, "places"), 0);
}

#[rstest]
fn empty_elevation_is_stored_as_null(mut seeded: Connection) {
    let mut paris = place(1, "Paris", "FR", "Europe/Paris");
    paris.elevation = None;
    load_places(&mut seeded, &[paris]).expect("load place");
    let elevation: Option<i64> = seeded
        .query_row("SELECT elevation FROM places", [], |row| row.get(0))
        .expect("read elevation");
    assert_eq!(elevation, None);
}

#[rstest]
fn reader_lists_countries_by_name(seeded: Connection) {
    let reader = AtlasReader::from_connection(seeded);
    let names: Vec<_> = reader
        .countries()
        .expect("list countries")
        .into_iter()
        .map(|country| country.name)
        .collect();
    assert_eq!(names, ["Finland", "France"]);
}

#[rstest]
fn reader_returns_every_country_column(mut atlas: Connection) {
    let stored = country("ZZ", "Zedland");
    load_countries(&mut atlas, std::slice::from_ref(&stored)).expect("load countries");
    let reader = AtlasReader::from_connection(atlas);
    assert_eq!(reader.countries().expect("list countries"), [stored]);
}

#[rstest]
#[case::alpha2("fr")]
#[case::name_prefix("Fra")]
fn reader_searches_by_country(mut seeded: Connection, #[case] country: &str) {
    load_places(
        &mut seeded,
        &[
            place(1, "Paris", "FR", "Europe/Paris"),
            place(2, "Parisot", "FR", PLACEHOLDER_TIMEZONE_ID),
            place(3, "Lyon", "FR", "Europe/Paris"),
        ],
    )
    .expect("load places");
    let reader = AtlasReader::from_connection(seeded);

    let matches = reader.search("paris", country).expect("search places");

    let names: Vec<_> = matches.iter().map(|found| found.name.as_str()).collect();
    assert_eq!(names, ["Paris", "Parisot"]);
    assert_eq!(matches[0].country_code, "FR");
    assert_eq!(matches[0].timezone, "Europe/Paris");
    assert_eq!(matches[0].elevation, Some(35));
}

#[rstest]
fn reader_treats_wildcards_literally(mut seeded: Connection) {
    load_places(&mut seeded, &[place(1, "Paris", "FR", "Europe/Paris")]).expect("load places");
    let reader = AtlasReader::from_connection(seeded);
    assert!(reader.search("%", "FR").expect("search").is_empty());
}

#[rstest]
#[case("", "FR", "location")]
#[case("Paris", "F", "country")]
#[case("Paris", "", "country")]
fn reader_requires_arguments(
    seeded: Connection,
    #[case] location: &str,
    #[case] country: &str,
    #[case] missing: &str,
) {
    let reader = AtlasReader::from_connection(seeded);
    let err = reader.search(location, country).expect_err("missing argument");
    assert!(matches!(err, QueryError::MissingArgument { argument } if argument == missing));
}

#[rstest]
fn reader_looks_up_timezones(seeded: Connection) {
    let reader = AtlasReader::from_connection(seeded);
    let paris = reader
        .timezone("Europe/Paris")
        .expect("query timezone")
        .expect("timezone present");
    assert_eq!(paris.dst_offset, 2.0);
    assert!(reader.timezone("Mars/Olympus").expect("query").is_none());
}

#[rstest]
fn opening_a_missing_atlas_fails() {
    let temp = tempfile::tempdir().expect("create temp dir");
    let err = AtlasReader::open(temp.path().join("atlas.db")).expect_err("file missing");
    assert!(matches!(err, QueryError::Open { .. }));
}

proptest! {
    #[test]
    fn parsed_timezones_round_trip_through_the_table(
        id in "[A-Z][a-z]{2,8}/[A-Z][a-z_]{2,12}",
        gmt in -12.0f64..14.0,
        dst in -12.0f64..14.0,
        raw in -12.0f64..14.0,
    ) {
        let zone = Timezone::parse(&format!("XX\t{id}\t{gmt}\t{dst}\t{raw}"))
            .expect("generated line is valid");
        let mut connection = empty_atlas();
        load_timezones(&mut connection, std::slice::from_ref(&zone)).expect("load timezone");
        let stored = AtlasReader::from_connection(connection)
            .timezone(&id)
            .expect("query timezone")
            .expect("timezone present");
        prop_assert_eq!(stored.name, id);
        prop_assert_eq!(stored.gmt_offset, gmt);
        prop_assert_eq!(stored.dst_offset, dst);
        prop_assert_eq!(stored.raw_offset, raw);
    }
}
