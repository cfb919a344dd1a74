use rusqlite::{CachedStatement, Connection, Error as SqliteError, ErrorCode, Transaction, params};
use thiserror::Error;

use geoatlas_core::{Country, Place, Timezone};

/// Insert the placeholder timezone followed by every supplied timezone.
///
/// All rows are written in one transaction. Returns the number of rows
/// inserted, placeholder included.
///
/// # Examples
/// ```
/// use rusqlite::Connection;
/// use geoatlas_core::Timezone;
/// use geoatlas_data::atlas::{initialise_schema, load_timezones};
///
/// let mut conn = Connection::open_in_memory().expect("create in-memory database");
/// initialise_schema(&mut conn).expect("create atlas schema");
/// let zones = vec![Timezone::parse("FR\tEurope/Paris\t1.0\t2.0\t1.0").expect("valid line")];
///
/// let inserted = load_timezones(&mut conn, &zones).expect("load timezones");
/// assert_eq!(inserted, 2);
/// let placeholder: i64 = conn
///     .query_row("SELECT COUNT(*) FROM timezones WHERE name = '?'", [], |row| row.get(0))
///     .expect("count placeholder rows");
/// assert_eq!(placeholder, 1);
/// ```
pub fn load_timezones(
    connection: &mut Connection,
    timezones: &[Timezone],
) -> Result<usize, LoadError> {
    let placeholder = Timezone::placeholder();
    in_transaction(connection, "timezones", |transaction| {
        let mut insert = prepare(
            transaction,
            "prepare insert timezone",
            "INSERT INTO timezones (name, gmt_offset, dst_offset, raw_offset)
                VALUES (?1, ?2, ?3, ?4)",
        )?;
        let mut inserted = 0;
        for zone in std::iter::once(&placeholder).chain(timezones) {
            insert
                .execute(params![
                    zone.id,
                    zone.gmt_offset,
                    zone.dst_offset,
                    zone.raw_offset
                ])
                .map_err(|source| classify(source, "timezones", &zone.id, "insert timezone"))?;
            inserted += 1;
        }
        Ok(inserted)
    })
}

/// Insert every supplied country in one transaction.
pub fn load_countries(
    connection: &mut Connection,
    countries: &[Country],
) -> Result<usize, LoadError> {
    in_transaction(connection, "countries", |transaction| {
        let mut insert = prepare(
            transaction,
            "prepare insert country",
            "INSERT INTO countries (
                iso, iso3, iso_numeric, fips, name, capital, area, population,
                continent, tld, currency_code, currency_name, phone,
                postal_code_format, postal_code_regex, languages, geoname_id,
                neighbours, equivalent_fips_code
            ) VALUES (
                ?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14,
                ?15, ?16, ?17, ?18, ?19
            )",
        )?;
        for country in countries {
            insert
                .execute(params![
                    country.iso_alpha2,
                    country.iso_alpha3,
                    country.iso_numeric,
                    country.fips,
                    country.name,
                    country.capital,
                    country.area,
                    country.population,
                    country.continent,
                    country.tld,
                    country.currency_code,
                    country.currency_name,
                    country.phone,
                    country.postal_code_format,
                    country.postal_code_regex,
                    country.languages,
                    country.geoname_id,
                    country.neighbours,
                    country.equivalent_fips_code,
                ])
                .map_err(|source| {
                    classify(source, "countries", &country.iso_alpha2, "insert country")
                })?;
        }
        Ok(countries.len())
    })
}

/// Insert a batch of places in one transaction.
///
/// The owning country and timezone are looked up by natural key while the row
/// is inserted. A key with no parent row leaves the column `NULL`, which the
/// schema rejects, so the whole batch is rolled back.
pub fn load_places(connection: &mut Connection, places: &[Place]) -> Result<usize, LoadError> {
    in_transaction(connection, "places", |transaction| {
        let mut insert = prepare(
            transaction,
            "prepare insert place",
            "INSERT INTO places (
                geoname_id, name, ascii_name, alternate_names, latitude,
                longitude, country_id, elevation, timezone_id
            ) VALUES (
                ?1, ?2, ?3, ?4, ?5, ?6,
                (SELECT id FROM countries WHERE iso = ?7),
                ?8,
                (SELECT id FROM timezones WHERE name = ?9)
            )",
        )?;
        for place in places {
            insert
                .execute(params![
                    place.geoname_id,
                    place.name,
                    place.ascii_name,
                    place.alternate_names,
                    place.location.y,
                    place.location.x,
                    place.country_code,
                    place.elevation,
                    place.timezone_id,
                ])
                .map_err(|source| {
                    let key = format!(
                        "{} (country {}, timezone {})",
                        place.geoname_id, place.country_code, place.timezone_id
                    );
                    classify(source, "places", &key, "insert place")
                })?;
        }
        Ok(places.len())
    })
}

fn in_transaction<F>(
    connection: &mut Connection,
    table: &'static str,
    body: F,
) -> Result<usize, LoadError>
where
    F: FnOnce(&Transaction<'_>) -> Result<usize, LoadError>,
{
    let transaction = connection
        .transaction()
        .map_err(|source| LoadError::Sqlite {
            operation: "begin load transaction",
            source,
        })?;
    let inserted = body(&transaction)?;
    transaction.commit().map_err(|source| LoadError::Sqlite {
        operation: "commit load transaction",
        source,
    })?;
    log::debug!("committed {inserted} rows into {table}");
    Ok(inserted)
}

fn prepare<'conn>(
    transaction: &'conn Transaction<'_>,
    operation: &'static str,
    sql: &str,
) -> Result<CachedStatement<'conn>, LoadError> {
    transaction
        .prepare_cached(sql)
        .map_err(|source| LoadError::Sqlite { operation, source })
}

fn classify(
    source: SqliteError,
    table: &'static str,
    key: &str,
    operation: &'static str,
) -> LoadError {
    if source.sqlite_error_code() == Some(ErrorCode::ConstraintViolation) {
        log::error!("constraint violated inserting {key} into {table}: {source}");
        LoadError::Constraint {
            table,
            key: key.to_owned(),
            source,
        }
    } else {
        LoadError::Sqlite { operation, source }
    }
}

/// Errors raised while loading records into the atlas.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("{table} row {key} violates a constraint")]
    Constraint {
        table: &'static str,
        key: String,
        #[source]
        source: SqliteError,
    },
    #[error("failed to {operation}")]
    Sqlite {
        operation: &'static str,
        #[source]
        source: SqliteError,
    },
}
