use crate::record::{Fields, RecordError, RecordKind};

/// Prefix marking comment lines in the country dump.
pub const COMMENT_MARKER: char = '#';

/// A row of the country table.
///
/// Free-text columns are kept verbatim; only the ISO numeric code and the
/// geoname identifier are interpreted.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Country {
    /// ISO 3166-1 alpha-2 code, the join key used by places.
    pub iso_alpha2: String,
    /// ISO 3166-1 alpha-3 code.
    pub iso_alpha3: String,
    /// ISO 3166-1 numeric code.
    pub iso_numeric: i64,
    /// FIPS country code.
    pub fips: String,
    /// English short name.
    pub name: String,
    /// Capital city.
    pub capital: String,
    /// Area in square kilometres, as published.
    pub area: String,
    /// Population, as published.
    pub population: String,
    /// Continent code.
    pub continent: String,
    /// Top-level domain.
    pub tld: String,
    /// ISO 4217 currency code.
    pub currency_code: String,
    /// Currency name.
    pub currency_name: String,
    /// International dialling prefix.
    pub phone: String,
    /// Postal code format.
    pub postal_code_format: String,
    /// Postal code validation regex.
    pub postal_code_regex: String,
    /// Comma-separated language tags.
    pub languages: String,
    /// Geoname identifier of the country feature.
    pub geoname_id: i64,
    /// Comma-separated alpha-2 codes of neighbouring countries.
    pub neighbours: String,
    /// Equivalent FIPS code.
    pub equivalent_fips_code: String,
}

impl Country {
    /// Report whether a raw dump line is a comment to be skipped.
    #[must_use]
    pub fn is_comment(line: &str) -> bool {
        line.starts_with(COMMENT_MARKER)
    }

    /// Decode one tab-delimited line of the country dump.
    ///
    /// # Examples
    /// ```
    /// use geoatlas_core::Country;
    ///
    /// let line = "AD\tAND\t020\tAN\tAndorra\tAndorra la Vella\t468\t77006\tEU\t.ad\tEUR\tEuro\t376\tAD###\t^(?:AD)*(\\d{3})$\tca\t3041565\tES,FR\t";
    /// let country = Country::parse(line)?;
    /// assert_eq!(country.iso_alpha2, "AD");
    /// assert_eq!(country.iso_numeric, 20);
    /// assert_eq!(country.geoname_id, 3041565);
    /// # Ok::<(), geoatlas_core::RecordError>(())
    /// ```
    pub fn parse(line: &str) -> Result<Self, RecordError> {
        let mut fields = Fields::new(line, RecordKind::Country);
        Ok(Self {
            iso_alpha2: fields.owned("ISO")?,
            iso_alpha3: fields.owned("ISO3")?,
            iso_numeric: fields.number("ISO numeric")?,
            fips: fields.owned("fips")?,
            name: fields.owned("country")?,
            capital: fields.owned("capital")?,
            area: fields.owned("area")?,
            population: fields.owned("population")?,
            continent: fields.owned("continent")?,
            tld: fields.owned("tld")?,
            currency_code: fields.owned("currency code")?,
            currency_name: fields.owned("currency name")?,
            phone: fields.owned("phone")?,
            postal_code_format: fields.owned("postal code format")?,
            postal_code_regex: fields.owned("postal code regex")?,
            languages: fields.owned("languages")?,
            geoname_id: fields.number("geonameid")?,
            neighbours: fields.owned("neighbours")?,
            equivalent_fips_code: fields.owned("equivalent fips code")?,
        })
    }
}
