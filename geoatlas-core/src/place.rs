use geo::Coord;

use crate::record::{Fields, RecordError, RecordKind};
use crate::timezone::PLACEHOLDER_TIMEZONE_ID;

/// Feature class letter the source uses for populated places.
pub const POPULATED_PLACE_CLASS: &str = "P";

/// A row of a per-country populated places file.
///
/// Coordinates are WGS84 with `x = longitude`, `y = latitude`. The country and
/// timezone are kept as natural keys; they are resolved to row identifiers
/// when the place is loaded.
///
/// # Examples
/// ```
/// use geoatlas_core::Place;
///
/// let line = "2988507\tParis\tParis\tLutece,Paris\t48.85341\t2.3488\tP\tPPLC\tFR\t\t11\t75\t751\t75056\t2138551\t\t42\tEurope/Paris\t2024-01-01";
/// let place = Place::parse(line)?;
/// assert_eq!(place.name, "Paris");
/// assert_eq!(place.location.y, 48.85341);
/// assert_eq!(place.population(), Some(2_138_551));
/// assert_eq!(place.elevation, None);
/// # Ok::<(), geoatlas_core::RecordError>(())
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Place {
    /// Geoname identifier.
    pub geoname_id: i64,
    /// Name in UTF-8.
    pub name: String,
    /// Name in plain ASCII.
    pub ascii_name: String,
    /// Comma-separated alternate names.
    pub alternate_names: String,
    /// Position of the place.
    pub location: Coord<f64>,
    /// Feature class letter.
    pub feature_class: String,
    /// Feature code within the class.
    pub feature_code: String,
    /// Alpha-2 code of the owning country.
    pub country_code: String,
    /// Alternate country codes.
    pub cc2: String,
    /// First to fourth order administrative division codes.
    pub admin_codes: [String; 4],
    /// Population as published; see [`Place::population`].
    pub raw_population: String,
    /// Elevation in metres, when surveyed.
    pub elevation: Option<i64>,
    /// Digital elevation model value, as published.
    pub dem: String,
    /// Timezone identifier, or the placeholder when the source omits it.
    pub timezone_id: String,
    /// Date of last modification, as published.
    pub modification_date: String,
}

impl Place {
    /// Decode one tab-delimited line of a places file.
    pub fn parse(line: &str) -> Result<Self, RecordError> {
        let mut fields = Fields::new(line, RecordKind::Place);
        let geoname_id = fields.number("geonameid")?;
        let name = fields.owned("name")?;
        let ascii_name = fields.owned("asciiname")?;
        let alternate_names = fields.owned("alternatenames")?;
        let latitude = fields.number("latitude")?;
        let longitude = fields.number("longitude")?;
        let feature_class = fields.owned("feature class")?;
        let feature_code = fields.owned("feature code")?;
        let country_code = fields.owned("country code")?;
        let cc2 = fields.owned("cc2")?;
        let admin_codes = [
            fields.owned("admin1 code")?,
            fields.owned("admin2 code")?,
            fields.owned("admin3 code")?,
            fields.owned("admin4 code")?,
        ];
        let raw_population = fields.owned("population")?;
        let elevation = fields.optional_number("elevation")?;
        let dem = fields.owned("dem")?;
        let timezone = fields.text("timezone")?;
        let timezone_id = if timezone.is_empty() {
            PLACEHOLDER_TIMEZONE_ID.to_owned()
        } else {
            timezone.to_owned()
        };
        let modification_date = fields.owned("modification date")?;

        Ok(Self {
            geoname_id,
            name,
            ascii_name,
            alternate_names,
            location: Coord {
                x: longitude,
                y: latitude,
            },
            feature_class,
            feature_code,
            country_code,
            cc2,
            admin_codes,
            raw_population,
            elevation,
            dem,
            timezone_id,
            modification_date,
        })
    }

    /// Interpret the published population, if it is an integer.
    #[must_use]
    pub fn population(&self) -> Option<i64> {
        self.raw_population.trim().parse().ok()
    }

    /// Whether the source classifies this feature as a populated place.
    #[must_use]
    pub fn is_populated_place(&self) -> bool {
        self.feature_class == POPULATED_PLACE_CLASS
    }
}
