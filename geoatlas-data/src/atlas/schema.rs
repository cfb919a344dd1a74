use rusqlite::{Connection, Error as SqliteError, Transaction};
use thiserror::Error;

/// Value stored in `PRAGMA user_version` once the schema is created.
pub const SCHEMA_VERSION: i64 = 1;

/// Create the atlas tables inside an empty SQLite database.
///
/// Foreign keys are enabled on the connection, then the `timezones`,
/// `countries` and `places` tables are created together with an index on the
/// owning country of each place and the `place_details` view. The tables are
/// created exactly once: running this against a database that already holds
/// them fails.
///
/// # Examples
/// ```
/// use rusqlite::Connection;
/// use geoatlas_data::atlas::{SCHEMA_VERSION, initialise_schema};
///
/// let mut conn = Connection::open_in_memory().expect("create in-memory database");
/// initialise_schema(&mut conn).expect("create atlas schema");
///
/// let version: i64 = conn
///     .query_row("PRAGMA user_version", [], |row| row.get(0))
///     .expect("read schema version");
/// assert_eq!(version, SCHEMA_VERSION);
/// assert!(initialise_schema(&mut conn).is_err());
/// ```
pub fn initialise_schema(connection: &mut Connection) -> Result<(), SchemaError> {
    connection
        .pragma_update(None, "foreign_keys", true)
        .map_err(|source| SchemaError::ForeignKeys { source })?;

    let transaction = connection
        .transaction()
        .map_err(|source| SchemaError::Migration {
            step: "begin schema transaction",
            source,
        })?;

    create_tables(&transaction)?;
    create_indexes(&transaction)?;
    create_views(&transaction)?;
    transaction
        .pragma_update(None, "user_version", SCHEMA_VERSION)
        .map_err(|source| SchemaError::Migration {
            step: "record schema version",
            source,
        })?;

    transaction
        .commit()
        .map_err(|source| SchemaError::Migration {
            step: "commit schema transaction",
            source,
        })
}

fn create_tables(transaction: &Transaction<'_>) -> Result<(), SchemaError> {
    run_migration_step(
        transaction,
        "create timezones",
        "CREATE TABLE timezones (
            id INTEGER PRIMARY KEY,
            name TEXT NOT NULL UNIQUE,
            gmt_offset REAL NOT NULL,
            dst_offset REAL NOT NULL,
            raw_offset REAL NOT NULL
        )",
    )?;
    run_migration_step(
        transaction,
        "create countries",
        "CREATE TABLE countries (
            id INTEGER PRIMARY KEY,
            iso TEXT NOT NULL UNIQUE,
            iso3 TEXT NOT NULL,
            iso_numeric INTEGER NOT NULL,
            fips TEXT NOT NULL,
            name TEXT NOT NULL,
            capital TEXT NOT NULL,
            area TEXT NOT NULL,
            population TEXT NOT NULL,
            continent TEXT NOT NULL,
            tld TEXT NOT NULL,
            currency_code TEXT NOT NULL,
            currency_name TEXT NOT NULL,
            phone TEXT NOT NULL,
            postal_code_format TEXT NOT NULL,
            postal_code_regex TEXT NOT NULL,
            languages TEXT NOT NULL,
            geoname_id INTEGER NOT NULL,
            neighbours TEXT NOT NULL,
            equivalent_fips_code TEXT NOT NULL
        )",
    )?;
    run_migration_step(
        transaction,
        "create places",
        "CREATE TABLE places (
            id INTEGER PRIMARY KEY,
            geoname_id INTEGER DEFAULT NULL,
            name TEXT NOT NULL,
            ascii_name TEXT NOT NULL,
            alternate_names TEXT NOT NULL,
            latitude REAL NOT NULL,
            longitude REAL NOT NULL,
            country_id INTEGER NOT NULL REFERENCES countries(id),
            elevation INTEGER,
            timezone_id INTEGER NOT NULL REFERENCES timezones(id)
        )",
    )
}

fn create_indexes(transaction: &Transaction<'_>) -> Result<(), SchemaError> {
    run_migration_step(
        transaction,
        "index places by country",
        "CREATE INDEX idx_places_country ON places(country_id)",
    )
}

fn create_views(transaction: &Transaction<'_>) -> Result<(), SchemaError> {
    run_migration_step(
        transaction,
        "create place_details view",
        "CREATE VIEW place_details AS
            SELECT
                places.id AS id,
                places.geoname_id AS geoname_id,
                places.name AS name,
                places.ascii_name AS ascii_name,
                places.alternate_names AS alternate_names,
                places.latitude AS latitude,
                places.longitude AS longitude,
                places.elevation AS elevation,
                countries.iso AS country_code,
                countries.name AS country_name,
                timezones.name AS timezone
            FROM places
            JOIN countries ON countries.id = places.country_id
            JOIN timezones ON timezones.id = places.timezone_id",
    )
}

fn run_migration_step(
    transaction: &Transaction<'_>,
    step: &'static str,
    sql: &str,
) -> Result<(), SchemaError> {
    transaction
        .execute(sql, [])
        .map(|_| ())
        .map_err(|source| SchemaError::Migration { step, source })
}

/// Errors raised when creating the atlas schema.
#[derive(Debug, Error)]
pub enum SchemaError {
    #[error("failed to enable SQLite foreign keys")]
    ForeignKeys {
        #[source]
        source: SqliteError,
    },
    #[error("failed to execute migration step '{step}'")]
    Migration {
        step: &'static str,
        #[source]
        source: SqliteError,
    },
}
