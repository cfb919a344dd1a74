//! Domain wrappers for dump endpoints and the artefacts fetched from them.

use std::{fmt, ops::Deref};

use url::Url;

/// Base URL of the dump server.
///
/// # Examples
/// ```
/// # use geoatlas_data::dump::BaseUrl;
/// let url = BaseUrl::new("https://download.geonames.org/export/dump");
/// assert_eq!(url.as_ref(), "https://download.geonames.org/export/dump");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BaseUrl(String);

impl BaseUrl {
    /// Construct a new [`BaseUrl`] from an owned or borrowed string.
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }
}

impl From<&str> for BaseUrl {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl AsRef<str> for BaseUrl {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Deref for BaseUrl {
    type Target = str;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl fmt::Display for BaseUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Fully qualified URL pointing to a dump artefact.
///
/// # Examples
/// ```
/// # use geoatlas_data::dump::DumpUrl;
/// let url = DumpUrl::new("https://example.test/FR.zip");
/// assert!(url.as_ref().ends_with(".zip"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DumpUrl(String);

impl DumpUrl {
    /// Construct a new [`DumpUrl`] from an owned or borrowed string.
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }
}

impl AsRef<str> for DumpUrl {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Deref for DumpUrl {
    type Target = str;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl fmt::Display for DumpUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<Url> for DumpUrl {
    fn from(value: Url) -> Self {
        Self(value.into())
    }
}

/// An artefact published by the dump server.
///
/// # Examples
/// ```
/// # use geoatlas_data::dump::SourceFile;
/// let places = SourceFile::Places("FR".into());
/// assert_eq!(places.remote_name(), "FR.zip");
/// assert_eq!(places.local_name(), "FR.txt");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SourceFile {
    /// The timezone table.
    Timezones,
    /// The country table.
    Countries,
    /// The populated places of one country, published as a zip archive.
    Places(String),
}

impl SourceFile {
    /// Name of the file on the dump server.
    #[must_use]
    pub fn remote_name(&self) -> String {
        match self {
            Self::Timezones => "timeZones.txt".to_owned(),
            Self::Countries => "countryInfo.txt".to_owned(),
            Self::Places(code) => format!("{code}.zip"),
        }
    }

    /// Name of the text file the parsers read.
    ///
    /// For timezones this is the sorted, header-stripped derivative; for
    /// places it is the member extracted from the archive.
    #[must_use]
    pub fn local_name(&self) -> String {
        match self {
            Self::Timezones => "_timeZones.txt".to_owned(),
            Self::Countries => "countryInfo.txt".to_owned(),
            Self::Places(code) => format!("{code}.txt"),
        }
    }
}

impl fmt::Display for SourceFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Timezones => f.write_str("timezones"),
            Self::Countries => f.write_str("countries"),
            Self::Places(code) => write!(f, "places for {code}"),
        }
    }
}
