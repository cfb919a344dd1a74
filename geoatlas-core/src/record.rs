//! Positional access to tab-delimited dump records.
//!
//! Dump files carry no header that can be relied upon, so every record is
//! decoded by position. [`Fields`] hands out the columns one by one under a
//! descriptive name, which lets a short line fail with a shape error naming the
//! missing column instead of an out-of-range index.

use std::{fmt, str::FromStr, str::Split};

use thiserror::Error;

/// Column separator used by every dump file.
pub const FIELD_SEPARATOR: char = '\t';

/// The kind of record being decoded, used to label errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecordKind {
    /// A row of the timezone table.
    Timezone,
    /// A row of the country table.
    Country,
    /// A row of a per-country populated places file.
    Place,
}

impl RecordKind {
    /// Number of tab-separated columns a well-formed line carries.
    #[must_use]
    pub const fn arity(self) -> usize {
        match self {
            Self::Timezone => 5,
            Self::Country | Self::Place => 19,
        }
    }
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Timezone => "timezone",
            Self::Country => "country",
            Self::Place => "place",
        })
    }
}

/// Errors raised while decoding a single record.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[non_exhaustive]
pub enum RecordError {
    /// The line ended before the named column.
    #[error("{kind} record has {found} fields, expected {expected} (missing `{field}`)")]
    Shape {
        /// Record being decoded.
        kind: RecordKind,
        /// Column that could not be found.
        field: &'static str,
        /// Number of columns the record should carry.
        expected: usize,
        /// Number of columns the line actually carried.
        found: usize,
    },
    /// A column expected to hold a number did not parse.
    #[error("{kind} field `{field}` is not a valid number: {value:?}")]
    InvalidNumber {
        /// Record being decoded.
        kind: RecordKind,
        /// Column holding the bad value.
        field: &'static str,
        /// Raw column contents.
        value: String,
    },
}

/// Cursor over the columns of one record line.
///
/// # Examples
/// ```
/// use geoatlas_core::{Fields, RecordKind};
///
/// let mut fields = Fields::new("FR\tEurope/Paris\t1.0\t2.0\t1.0", RecordKind::Timezone);
/// assert_eq!(fields.text("country code")?, "FR");
/// assert_eq!(fields.text("timezone id")?, "Europe/Paris");
/// let offset: f64 = fields.number("GMT offset")?;
/// assert_eq!(offset, 1.0);
/// # Ok::<(), geoatlas_core::RecordError>(())
/// ```
#[derive(Debug, Clone)]
pub struct Fields<'a> {
    kind: RecordKind,
    line: &'a str,
    columns: Split<'a, char>,
}

impl<'a> Fields<'a> {
    /// Start decoding `line` as a record of the given kind.
    ///
    /// Trailing carriage returns and newlines are ignored.
    #[must_use]
    pub fn new(line: &'a str, kind: RecordKind) -> Self {
        let trimmed = line.trim_end_matches(['\r', '\n']);
        Self {
            kind,
            line: trimmed,
            columns: trimmed.split(FIELD_SEPARATOR),
        }
    }

    /// Take the next column verbatim.
    pub fn text(&mut self, field: &'static str) -> Result<&'a str, RecordError> {
        self.columns.next().ok_or_else(|| RecordError::Shape {
            kind: self.kind,
            field,
            expected: self.kind.arity(),
            found: self.line.split(FIELD_SEPARATOR).count(),
        })
    }

    /// Take the next column as an owned string.
    pub fn owned(&mut self, field: &'static str) -> Result<String, RecordError> {
        self.text(field).map(str::to_owned)
    }

    /// Take the next column and parse it as a number.
    ///
    /// Surrounding whitespace is tolerated; an empty column is rejected.
    pub fn number<T: FromStr>(&mut self, field: &'static str) -> Result<T, RecordError> {
        let raw = self.text(field)?;
        parse_number(self.kind, field, raw)
    }

    /// Take the next column as a number, mapping an empty column to `None`.
    pub fn optional_number<T: FromStr>(
        &mut self,
        field: &'static str,
    ) -> Result<Option<T>, RecordError> {
        let raw = self.text(field)?;
        if raw.trim().is_empty() {
            return Ok(None);
        }
        parse_number(self.kind, field, raw).map(Some)
    }
}

fn parse_number<T: FromStr>(
    kind: RecordKind,
    field: &'static str,
    raw: &str,
) -> Result<T, RecordError> {
    raw.trim()
        .parse::<T>()
        .map_err(|_| RecordError::InvalidNumber {
            kind,
            field,
            value: raw.to_owned(),
        })
}
