//! Line-oriented extraction of records from the dump files.
//!
//! Each parser streams a `BufRead`, skips blank lines and decodes every other
//! line with the matching record parser from `geoatlas-core`. The first
//! malformed line aborts the whole file. Place files are filtered while they
//! are read so excluded records never reach the loader.
#![forbid(unsafe_code)]

use std::io::{BufRead, BufReader};

use camino::{Utf8Path, Utf8PathBuf};
use geoatlas_core::{Country, Place, PlaceFilter, RecordError, Retention, Timezone};
use geoatlas_fs::open_utf8_file;
use log::{debug, warn};
use thiserror::Error;

/// Errors that can occur while extracting records from a dump file.
#[derive(Debug, Error)]
pub enum ParseFileError {
    #[error("failed to open {path:?}")]
    Open {
        path: Utf8PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to read line {line}")]
    ReadLine {
        #[source]
        source: std::io::Error,
        line: usize,
    },
    #[error("malformed record at line {line}")]
    Record {
        #[source]
        source: RecordError,
        line: usize,
    },
}

/// Places retained from one places file.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlaceExtract {
    /// Places that passed the filter, in file order.
    pub places: Vec<Place>,
    /// Number of records read, retained or not.
    pub scanned: usize,
}

/// Parse every line of the sorted timezone table.
///
/// # Examples
/// ```
/// use std::io::Cursor;
/// use geoatlas_data::etl::parse_timezones;
///
/// let zones = parse_timezones(Cursor::new("FR\tEurope/Paris\t1.0\t2.0\t1.0\n"))?;
/// assert_eq!(zones[0].id, "Europe/Paris");
/// # Ok::<(), geoatlas_data::etl::ParseFileError>(())
/// ```
pub fn parse_timezones<R: BufRead>(reader: R) -> Result<Vec<Timezone>, ParseFileError> {
    let mut zones = Vec::new();
    scan_lines(reader, |line_number, line| {
        let zone = Timezone::parse(line).map_err(|source| ParseFileError::Record {
            source,
            line: line_number,
        })?;
        zones.push(zone);
        Ok(())
    })?;
    Ok(zones)
}

/// Parse the country table, skipping comment lines.
pub fn parse_countries<R: BufRead>(reader: R) -> Result<Vec<Country>, ParseFileError> {
    let mut countries = Vec::new();
    scan_lines(reader, |line_number, line| {
        if Country::is_comment(line) {
            return Ok(());
        }
        let country = Country::parse(line).map_err(|source| ParseFileError::Record {
            source,
            line: line_number,
        })?;
        countries.push(country);
        Ok(())
    })?;
    Ok(countries)
}

/// Parse a places file, keeping only the records `filter` retains.
///
/// # Examples
/// ```
/// use std::io::Cursor;
/// use geoatlas_core::PlaceFilter;
/// use geoatlas_data::etl::parse_places;
///
/// let file = "1\tBig\tBig\t\t1.0\t2.0\tP\tPPL\tFR\t\t\t\t\t\t5000\t\t\tEurope/Paris\t2020-01-01\n\
///             2\tSmall\tSmall\t\t1.0\t2.0\tP\tPPL\tFR\t\t\t\t\t\t10\t\t\tEurope/Paris\t2020-01-01\n";
/// let extract = parse_places(Cursor::new(file), &PlaceFilter::default())?;
/// assert_eq!(extract.scanned, 2);
/// assert_eq!(extract.places.len(), 1);
/// assert_eq!(extract.places[0].name, "Big");
/// # Ok::<(), geoatlas_data::etl::ParseFileError>(())
/// ```
pub fn parse_places<R: BufRead>(
    reader: R,
    filter: &PlaceFilter,
) -> Result<PlaceExtract, ParseFileError> {
    let mut extract = PlaceExtract::default();
    scan_lines(reader, |line_number, line| {
        let place = Place::parse(line).map_err(|source| ParseFileError::Record {
            source,
            line: line_number,
        })?;
        extract.scanned += 1;
        match filter.evaluate(&place) {
            Retention::Keep => extract.places.push(place),
            Retention::MalformedPopulation => warn!(
                "skipping place {} at line {line_number}: population {:?} is not an integer",
                place.geoname_id, place.raw_population
            ),
            reason => debug!(
                "skipping place {} at line {line_number}: {reason:?}",
                place.geoname_id
            ),
        }
        Ok(())
    })?;
    Ok(extract)
}

/// Open `path` and parse it as the sorted timezone table.
pub fn read_timezones(path: &Utf8Path) -> Result<Vec<Timezone>, ParseFileError> {
    parse_timezones(open_buffered(path)?)
}

/// Open `path` and parse it as the country table.
pub fn read_countries(path: &Utf8Path) -> Result<Vec<Country>, ParseFileError> {
    parse_countries(open_buffered(path)?)
}

/// Open `path` and parse it as a places file.
pub fn read_places(path: &Utf8Path, filter: &PlaceFilter) -> Result<PlaceExtract, ParseFileError> {
    parse_places(open_buffered(path)?, filter)
}

fn open_buffered(path: &Utf8Path) -> Result<impl BufRead, ParseFileError> {
    let file = open_utf8_file(path).map_err(|source| ParseFileError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(BufReader::new(file))
}

fn scan_lines<R, F>(mut reader: R, mut visit: F) -> Result<(), ParseFileError>
where
    R: BufRead,
    F: FnMut(usize, &str) -> Result<(), ParseFileError>,
{
    let mut line = String::new();
    let mut line_number = 0usize;

    loop {
        line.clear();
        match reader.read_line(&mut line) {
            Ok(0) => break,
            Ok(_) => {
                line_number += 1;
            }
            Err(source) => {
                return Err(ParseFileError::ReadLine {
                    source,
                    line: line_number + 1,
                });
            }
        }

        let record = line.trim_end_matches(['\r', '\n']);
        if record.is_empty() {
            continue;
        }
        visit(line_number, record)?;
    }

    Ok(())
}

#[cfg(test)]
mod tests;
