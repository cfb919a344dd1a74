use camino::{Utf8Path, Utf8PathBuf};
use geoatlas_core::{COUNTRY_CODES, PlaceFilter};

/// Subdirectory of the working directory holding downloaded sources.
pub const INPUT_DIR: &str = "in";
/// Subdirectory of the working directory holding the built atlas.
pub const OUTPUT_DIR: &str = "out";
/// File name of the built atlas.
pub const ATLAS_FILE_NAME: &str = "atlas.db";

/// Inputs of a single atlas build.
///
/// # Examples
/// ```
/// use geoatlas_data::pipeline::AtlasConfig;
///
/// let config = AtlasConfig::new("/tmp/atlas").with_country_codes(["AD", "FR"]);
/// assert_eq!(config.input_dir(), "/tmp/atlas/in");
/// assert_eq!(config.output_path(), "/tmp/atlas/out/atlas.db");
/// assert_eq!(config.country_codes(), ["AD", "FR"]);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct AtlasConfig {
    workdir: Utf8PathBuf,
    country_codes: Vec<String>,
    place_filter: PlaceFilter,
}

impl AtlasConfig {
    /// Build every catalogued country with the default place filter.
    pub fn new(workdir: impl Into<Utf8PathBuf>) -> Self {
        Self {
            workdir: workdir.into(),
            country_codes: COUNTRY_CODES.iter().map(|code| (*code).to_owned()).collect(),
            place_filter: PlaceFilter::default(),
        }
    }

    /// Restrict the build to `codes`, loaded in the given order.
    #[must_use]
    pub fn with_country_codes<I, S>(mut self, codes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.country_codes = codes.into_iter().map(Into::into).collect();
        self
    }

    /// Replace the place retention policy.
    #[must_use]
    pub fn with_place_filter(mut self, place_filter: PlaceFilter) -> Self {
        self.place_filter = place_filter;
        self
    }

    #[must_use]
    pub fn workdir(&self) -> &Utf8Path {
        &self.workdir
    }

    #[must_use]
    pub fn country_codes(&self) -> &[String] {
        &self.country_codes
    }

    #[must_use]
    pub fn place_filter(&self) -> &PlaceFilter {
        &self.place_filter
    }

    /// Directory sources are fetched into.
    #[must_use]
    pub fn input_dir(&self) -> Utf8PathBuf {
        self.workdir.join(INPUT_DIR)
    }

    /// Location of the atlas database.
    #[must_use]
    pub fn output_path(&self) -> Utf8PathBuf {
        self.workdir.join(OUTPUT_DIR).join(ATLAS_FILE_NAME)
    }
}
