use std::path::{Path, PathBuf};

use geoatlas_core::Country;
use rusqlite::{Connection, Error as SqliteError, OpenFlags, OptionalExtension, Row, params};
use serde::Serialize;
use thiserror::Error;

/// A place returned by [`AtlasReader::search`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlaceMatch {
    pub name: String,
    pub ascii_name: String,
    pub alternate_names: String,
    pub country_code: String,
    pub latitude: f64,
    pub longitude: f64,
    pub elevation: Option<i64>,
    pub timezone: String,
}

/// Offsets of a stored timezone, in hours.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimezoneOffsets {
    pub name: String,
    pub gmt_offset: f64,
    pub dst_offset: f64,
    pub raw_offset: f64,
}

/// Read-only access to a built atlas.
///
/// # Examples
/// ```
/// use rusqlite::Connection;
/// use geoatlas_data::atlas::{AtlasReader, initialise_schema};
///
/// let mut conn = Connection::open_in_memory().expect("create in-memory database");
/// initialise_schema(&mut conn).expect("create atlas schema");
/// let reader = AtlasReader::from_connection(conn);
/// assert!(reader.countries().expect("list countries").is_empty());
/// ```
#[derive(Debug)]
pub struct AtlasReader {
    connection: Connection,
}

impl AtlasReader {
    /// Open the atlas at `path` without write access.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, QueryError> {
        let path = path.as_ref();
        let connection = Connection::open_with_flags(
            path,
            OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )
        .map_err(|source| QueryError::Open {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self { connection })
    }

    /// Wrap an existing connection.
    #[must_use]
    pub fn from_connection(connection: Connection) -> Self {
        Self { connection }
    }

    /// List every stored country row, ordered by name.
    pub fn countries(&self) -> Result<Vec<Country>, QueryError> {
        let mut statement = self
            .connection
            .prepare_cached(
                "SELECT iso, iso3, iso_numeric, fips, name, capital, area, population,
                        continent, tld, currency_code, currency_name, phone,
                        postal_code_format, postal_code_regex, languages, geoname_id,
                        neighbours, equivalent_fips_code
                    FROM countries ORDER BY name",
            )
            .map_err(|source| QueryError::Sqlite {
                operation: "prepare country listing",
                source,
            })?;
        let rows = statement
            .query_map([], country_row)
            .map_err(|source| QueryError::Sqlite {
                operation: "list countries",
                source,
            })?;
        rows.collect::<Result<_, _>>()
            .map_err(|source| QueryError::Sqlite {
                operation: "read country row",
                source,
            })
    }

    /// Find places whose names contain `location` within `country`.
    ///
    /// A two-character `country` is matched against the alpha-2 code, any
    /// longer value is a prefix of the country name. Matching is
    /// case-insensitive for ASCII letters.
    pub fn search(&self, location: &str, country: &str) -> Result<Vec<PlaceMatch>, QueryError> {
        let location = location.trim();
        let country = country.trim();
        if location.is_empty() {
            return Err(QueryError::MissingArgument { argument: "location" });
        }
        if country.chars().count() < 2 {
            return Err(QueryError::MissingArgument { argument: "country" });
        }

        let (filter, country_value) = if country.chars().count() == 2 {
            ("countries.iso = ?2", country.to_ascii_uppercase())
        } else {
            (
                "countries.name LIKE ?2 ESCAPE '\\'",
                format!("{}%", escape_like(country)),
            )
        };
        let sql = format!(
            "SELECT places.name, places.ascii_name, places.alternate_names, countries.iso,
                    places.latitude, places.longitude, places.elevation, timezones.name
                FROM places
                JOIN countries ON countries.id = places.country_id
                JOIN timezones ON timezones.id = places.timezone_id
                WHERE {filter}
                  AND (places.name LIKE ?1 ESCAPE '\\'
                       OR places.ascii_name LIKE ?1 ESCAPE '\\'
                       OR places.alternate_names LIKE ?1 ESCAPE '\\')
                ORDER BY places.name"
        );
        let pattern = format!("%{}%", escape_like(location));

        let mut statement =
            self.connection
                .prepare_cached(&sql)
                .map_err(|source| QueryError::Sqlite {
                    operation: "prepare place search",
                    source,
                })?;
        let rows = statement
            .query_map(params![pattern, country_value], place_match)
            .map_err(|source| QueryError::Sqlite {
                operation: "search places",
                source,
            })?;
        rows.collect::<Result<_, _>>()
            .map_err(|source| QueryError::Sqlite {
                operation: "read place row",
                source,
            })
    }

    /// Look up the offsets of a timezone by identifier.
    pub fn timezone(&self, name: &str) -> Result<Option<TimezoneOffsets>, QueryError> {
        self.connection
            .query_row(
                "SELECT name, gmt_offset, dst_offset, raw_offset FROM timezones WHERE name = ?1",
                [name],
                |row| {
                    Ok(TimezoneOffsets {
                        name: row.get(0)?,
                        gmt_offset: row.get(1)?,
                        dst_offset: row.get(2)?,
                        raw_offset: row.get(3)?,
                    })
                },
            )
            .optional()
            .map_err(|source| QueryError::Sqlite {
                operation: "look up timezone",
                source,
            })
    }
}

fn country_row(row: &Row<'_>) -> rusqlite::Result<Country> {
    Ok(Country {
        iso_alpha2: row.get(0)?,
        iso_alpha3: row.get(1)?,
        iso_numeric: row.get(2)?,
        fips: row.get(3)?,
        name: row.get(4)?,
        capital: row.get(5)?,
        area: row.get(6)?,
        population: row.get(7)?,
        continent: row.get(8)?,
        tld: row.get(9)?,
        currency_code: row.get(10)?,
        currency_name: row.get(11)?,
        phone: row.get(12)?,
        postal_code_format: row.get(13)?,
        postal_code_regex: row.get(14)?,
        languages: row.get(15)?,
        geoname_id: row.get(16)?,
        neighbours: row.get(17)?,
        equivalent_fips_code: row.get(18)?,
    })
}

fn place_match(row: &Row<'_>) -> rusqlite::Result<PlaceMatch> {
    Ok(PlaceMatch {
        name: row.get(0)?,
        ascii_name: row.get(1)?,
        alternate_names: row.get(2)?,
        country_code: row.get(3)?,
        latitude: row.get(4)?,
        longitude: row.get(5)?,
        elevation: row.get(6)?,
        timezone: row.get(7)?,
    })
}

/// Escape the `LIKE` wildcards so user input matches literally.
fn escape_like(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for ch in value.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped
}

/// Errors raised while querying an atlas.
#[derive(Debug, Error)]
pub enum QueryError {
    #[error("failed to open atlas at {path:?}")]
    Open {
        path: PathBuf,
        #[source]
        source: SqliteError,
    },
    #[error("missing or too short {argument}")]
    MissingArgument { argument: &'static str },
    #[error("failed to {operation}")]
    Sqlite {
        operation: &'static str,
        #[source]
        source: SqliteError,
    },
}
