//! In-memory dump source and sample dump contents for tests and examples.
use std::{
    collections::HashMap,
    io::{Cursor, Write},
};

use zip::{ZipWriter, result::ZipResult, write::SimpleFileOptions};

use super::{BaseUrl, DumpSource, TransportError};

/// Timezone table with a header row and a single zone, `Etc/Zulu`.
pub const SAMPLE_TIMEZONES: &str = "CountryCode\tTimeZoneId\tGMT offset 1. Jan 2024\tDST offset 1. Jul 2024\trawOffset (independant of DST)\n\
ZZ\tEtc/Zulu\t0.0\t0.0\t0.0\n";

/// Country table with a comment header and a single country, `ZZ`.
pub const SAMPLE_COUNTRIES: &str = "# sample country table\n\
#ISO\tISO3\tISO-Numeric\tfips\tCountry\tCapital\tArea(in sq km)\tPopulation\tContinent\ttld\tCurrencyCode\tCurrencyName\tPhone\tPostal Code Format\tPostal Code Regex\tLanguages\tgeonameid\tneighbours\tEquivalentFipsCode\n\
ZZ\tZZZ\t999\tZZ\tZedland\tZed City\t100\t5000\tEU\t.zz\tZZD\tZed\t+999\t\t\tzz\t9999999\t\t\n";

/// Format one line of a places file.
#[must_use]
pub fn sample_place_line(
    geoname_id: i64,
    name: &str,
    country_code: &str,
    population: &str,
    timezone: &str,
) -> String {
    format!(
        "{geoname_id}\t{name}\t{name}\t\t51.5\t-0.1\tP\tPPL\t{country_code}\t\t\t\t\t\t{population}\t12\t15\t{timezone}\t2024-01-01\n"
    )
}

/// Package `contents` as the `<CC>.txt` member of a places archive.
pub fn place_archive(country_code: &str, contents: &str) -> ZipResult<Vec<u8>> {
    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    writer.start_file(format!("{country_code}.txt"), SimpleFileOptions::default())?;
    writer.write_all(contents.as_bytes())?;
    Ok(writer.finish()?.into_inner())
}

/// Stub [`DumpSource`] serving files from memory.
///
/// Requests for unknown files fail with a 404 transport error, mirroring a
/// dump server that does not publish the file.
#[derive(Debug, Clone)]
pub struct StubSource {
    base_url: BaseUrl,
    files: HashMap<String, Vec<u8>>,
}

impl Default for StubSource {
    fn default() -> Self {
        Self::new(BaseUrl::from("https://example.org/dump"))
    }
}

impl StubSource {
    /// Construct an empty stub source with an explicit base URL.
    #[must_use]
    pub fn new(base_url: BaseUrl) -> Self {
        Self {
            base_url,
            files: HashMap::new(),
        }
    }

    /// Publish `contents` under `file_name`.
    #[must_use]
    pub fn with_file(mut self, file_name: &str, contents: impl Into<Vec<u8>>) -> Self {
        self.files.insert(file_name.to_owned(), contents.into());
        self
    }

    /// A source publishing the sample timezone and country tables plus a
    /// places archive for `ZZ` holding `places`.
    pub fn sample(places: &str) -> ZipResult<Self> {
        Ok(Self::default()
            .with_file("timeZones.txt", SAMPLE_TIMEZONES)
            .with_file("countryInfo.txt", SAMPLE_COUNTRIES)
            .with_file("ZZ.zip", place_archive("ZZ", places)?))
    }
}

impl DumpSource for StubSource {
    fn base_url(&self) -> &BaseUrl {
        &self.base_url
    }

    fn download(&self, file_name: &str, sink: &mut dyn Write) -> Result<u64, TransportError> {
        let url = format!("{}/{file_name}", self.base_url);
        let Some(contents) = self.files.get(file_name) else {
            return Err(TransportError::Http {
                url,
                status: 404,
                message: "not found".to_owned(),
            });
        };
        sink.write_all(contents)
            .map_err(|source| TransportError::Network { url, source })?;
        Ok(u64::try_from(contents.len()).unwrap_or(u64::MAX))
    }
}
