use crate::record::{Fields, RecordError, RecordKind};

/// Identifier of the synthetic row standing in for an unknown timezone.
pub const PLACEHOLDER_TIMEZONE_ID: &str = "?";

/// A row of the timezone table.
///
/// The country code is decoded for completeness but timezones are stored
/// independently of countries.
///
/// # Examples
/// ```
/// use geoatlas_core::Timezone;
///
/// let zone = Timezone::parse("DE\tEurope/Berlin\t1.0\t2.0\t1.0")?;
/// assert_eq!(zone.id, "Europe/Berlin");
/// assert_eq!(zone.dst_offset, 2.0);
/// # Ok::<(), geoatlas_core::RecordError>(())
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Timezone {
    /// Alpha-2 code of the country listing the zone.
    pub country_code: String,
    /// IANA identifier, unique across the table.
    pub id: String,
    /// Offset from UTC on 1 January, in hours.
    pub gmt_offset: f64,
    /// Offset from UTC on 1 July, in hours.
    pub dst_offset: f64,
    /// Offset from UTC ignoring daylight saving, in hours.
    pub raw_offset: f64,
}

impl Timezone {
    /// Decode one tab-delimited line of the timezone dump.
    pub fn parse(line: &str) -> Result<Self, RecordError> {
        let mut fields = Fields::new(line, RecordKind::Timezone);
        Ok(Self {
            country_code: fields.owned("country code")?,
            id: fields.owned("timezone id")?,
            gmt_offset: fields.number("GMT offset")?,
            dst_offset: fields.number("DST offset")?,
            raw_offset: fields.number("raw offset")?,
        })
    }

    /// The row referenced by places whose source omits a timezone.
    #[must_use]
    pub fn placeholder() -> Self {
        Self {
            country_code: String::new(),
            id: PLACEHOLDER_TIMEZONE_ID.to_owned(),
            gmt_offset: 0.0,
            dst_offset: 0.0,
            raw_offset: 0.0,
        }
    }

    /// Whether this is the unknown-timezone placeholder.
    #[must_use]
    pub fn is_placeholder(&self) -> bool {
        self.id == PLACEHOLDER_TIMEZONE_ID
    }
}
