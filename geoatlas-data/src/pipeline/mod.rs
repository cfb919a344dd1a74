//! Drives a complete atlas build.
//!
//! The build is a strict sequence: the timezone table, then the country
//! table, then one batch of places per country code. [`AtlasPipeline`] encodes
//! that order in its type parameter, so places can only be loaded once both
//! parent tables are committed. Each stage fetches its sources, parses them and
//! loads them before the next begins. Nothing is rolled back across stages: a
//! failure part-way leaves the committed batches in place and the existing
//! output blocks a rerun.
#![forbid(unsafe_code)]

mod config;

use std::{fmt, marker::PhantomData};

use camino::Utf8PathBuf;
use geoatlas_fs::{ensure_dir, path_exists};
use log::info;
use rusqlite::Connection;
use thiserror::Error;

use crate::atlas::{
    LoadError, SchemaError, initialise_schema, load_countries, load_places, load_timezones,
};
use crate::dump::{AcquisitionError, DumpSource, ensure_countries, ensure_places, ensure_timezones};
use crate::etl::{ParseFileError, read_countries, read_places, read_timezones};

pub use config::{ATLAS_FILE_NAME, AtlasConfig, INPUT_DIR, OUTPUT_DIR};

/// A step of the build, used to label errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BuildStage {
    Timezones,
    Countries,
    Places(String),
}

impl fmt::Display for BuildStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Timezones => f.write_str("timezones"),
            Self::Countries => f.write_str("countries"),
            Self::Places(code) => write!(f, "places for {code}"),
        }
    }
}

/// Errors raised while building an atlas.
#[derive(Debug, Error)]
pub enum BuildError {
    /// The output database is already present.
    #[error("atlas {path} already exists; remove it to rebuild")]
    OutputExists {
        /// Location of the existing database.
        path: Utf8PathBuf,
    },
    /// Preparing the working directory failed.
    #[error("failed to prepare {path}")]
    Workspace {
        /// Directory or file being inspected or created.
        path: Utf8PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// Creating the output database failed.
    #[error("failed to open SQLite database at {path}")]
    Open {
        /// Destination database path.
        path: Utf8PathBuf,
        /// Source error returned by `rusqlite`.
        #[source]
        source: rusqlite::Error,
    },
    /// Creating the tables failed.
    #[error(transparent)]
    Schema(#[from] SchemaError),
    /// Fetching a source file failed.
    #[error("failed to acquire {stage}")]
    Acquire {
        /// Step being executed.
        stage: BuildStage,
        /// Underlying acquisition error.
        #[source]
        source: AcquisitionError,
    },
    /// Parsing a source file failed.
    #[error("failed to parse {stage} from {path}")]
    Parse {
        /// Step being executed.
        stage: BuildStage,
        /// File being parsed.
        path: Utf8PathBuf,
        /// Underlying parse error.
        #[source]
        source: ParseFileError,
    },
    /// Inserting a batch failed.
    #[error("failed to load {stage}")]
    Load {
        /// Step being executed.
        stage: BuildStage,
        /// Underlying loader error.
        #[source]
        source: LoadError,
    },
}

/// Row counts of a finished build.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildReport {
    /// Location of the atlas database.
    pub output_path: Utf8PathBuf,
    /// Timezone rows, placeholder included.
    pub timezones: usize,
    /// Country rows.
    pub countries: usize,
    /// Place rows per country code, in load order.
    pub places: Vec<(String, usize)>,
}

impl BuildReport {
    /// Place rows across every country.
    #[must_use]
    pub fn total_places(&self) -> usize {
        self.places.iter().map(|(_, count)| count).sum()
    }
}

/// Schema created, nothing loaded.
#[derive(Debug)]
pub struct Init;
/// Timezone table committed.
#[derive(Debug)]
pub struct TimezonesLoaded;
/// Country table committed; places may be loaded.
#[derive(Debug)]
pub struct CountriesLoaded;

/// An atlas under construction.
pub struct AtlasPipeline<'a, Stage> {
    config: &'a AtlasConfig,
    source: &'a dyn DumpSource,
    connection: Connection,
    report: BuildReport,
    stage: PhantomData<Stage>,
}

impl<Stage> fmt::Debug for AtlasPipeline<'_, Stage> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AtlasPipeline")
            .field("config", self.config)
            .field("source", &self.source.base_url())
            .field("report", &self.report)
            .finish_non_exhaustive()
    }
}

impl<'a> AtlasPipeline<'a, Init> {
    /// Create the output database and its schema.
    ///
    /// Fails with [`BuildError::OutputExists`] before touching the filesystem
    /// when the configured output is already present.
    pub fn create(config: &'a AtlasConfig, source: &'a dyn DumpSource) -> Result<Self, BuildError> {
        let output_path = config.output_path();
        let exists = path_exists(&output_path).map_err(|source| BuildError::Workspace {
            path: output_path.clone(),
            source,
        })?;
        if exists {
            return Err(BuildError::OutputExists { path: output_path });
        }

        for dir in [config.input_dir(), config.workdir().join(OUTPUT_DIR)] {
            ensure_dir(&dir).map_err(|source| BuildError::Workspace { path: dir.clone(), source })?;
        }

        let mut connection =
            Connection::open(output_path.as_std_path()).map_err(|source| BuildError::Open {
                path: output_path.clone(),
                source,
            })?;
        initialise_schema(&mut connection)?;
        info!("created atlas schema in {output_path}");

        Ok(Self {
            config,
            source,
            connection,
            report: BuildReport {
                output_path,
                ..BuildReport::default()
            },
            stage: PhantomData,
        })
    }

    /// Fetch, parse and load the timezone table.
    pub fn load_timezones(mut self) -> Result<AtlasPipeline<'a, TimezonesLoaded>, BuildError> {
        let stage = BuildStage::Timezones;
        let path = ensure_timezones(self.source, &self.config.input_dir())
            .map_err(|source| acquire_error(&stage, source))?;
        let zones = read_timezones(&path).map_err(|source| BuildError::Parse {
            stage: stage.clone(),
            path: path.clone(),
            source,
        })?;
        let loaded = load_timezones(&mut self.connection, &zones)
            .map_err(|source| BuildError::Load { stage, source })?;
        info!("loaded {loaded} timezones");
        self.report.timezones = loaded;
        Ok(self.advance())
    }
}

impl<'a> AtlasPipeline<'a, TimezonesLoaded> {
    /// Fetch, parse and load the country table.
    pub fn load_countries(mut self) -> Result<AtlasPipeline<'a, CountriesLoaded>, BuildError> {
        let stage = BuildStage::Countries;
        let path = ensure_countries(self.source, &self.config.input_dir())
            .map_err(|source| acquire_error(&stage, source))?;
        let countries = read_countries(&path).map_err(|source| BuildError::Parse {
            stage: stage.clone(),
            path: path.clone(),
            source,
        })?;
        let loaded = load_countries(&mut self.connection, &countries)
            .map_err(|source| BuildError::Load { stage, source })?;
        info!("loaded {loaded} countries");
        self.report.countries = loaded;
        Ok(self.advance())
    }
}

impl AtlasPipeline<'_, CountriesLoaded> {
    /// Fetch, parse, filter and load the places of one country.
    ///
    /// Returns the number of places loaded.
    pub fn load_places(&mut self, country_code: &str) -> Result<usize, BuildError> {
        let stage = BuildStage::Places(country_code.to_owned());
        let path = ensure_places(self.source, &self.config.input_dir(), country_code)
            .map_err(|source| acquire_error(&stage, source))?;
        let extract = read_places(&path, self.config.place_filter()).map_err(|source| {
            BuildError::Parse {
                stage: stage.clone(),
                path: path.clone(),
                source,
            }
        })?;
        let loaded = load_places(&mut self.connection, &extract.places)
            .map_err(|source| BuildError::Load { stage, source })?;
        info!(
            "loaded {loaded} of {} places for {country_code}",
            extract.scanned
        );
        self.report.places.push((country_code.to_owned(), loaded));
        Ok(loaded)
    }

    /// Close the database and return the row counts.
    #[must_use]
    pub fn finish(self) -> BuildReport {
        self.report
    }
}

impl<'a, Stage> AtlasPipeline<'a, Stage> {
    fn advance<Next>(self) -> AtlasPipeline<'a, Next> {
        AtlasPipeline {
            config: self.config,
            source: self.source,
            connection: self.connection,
            report: self.report,
            stage: PhantomData,
        }
    }

    /// Row counts recorded so far.
    #[must_use]
    pub fn report(&self) -> &BuildReport {
        &self.report
    }
}

fn acquire_error(stage: &BuildStage, source: AcquisitionError) -> BuildError {
    BuildError::Acquire {
        stage: stage.clone(),
        source,
    }
}

/// Build the atlas described by `config`, fetching missing sources from
/// `source`.
///
/// Countries are loaded in the configured order. The first failure aborts the
/// build; batches committed before it remain in the output.
///
/// # Examples
/// ```
/// # use camino::Utf8PathBuf;
/// # use geoatlas_data::dump::test_support::StubSource;
/// # use geoatlas_data::pipeline::{AtlasConfig, build_atlas};
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let temp = tempfile::tempdir()?;
/// let workdir = Utf8PathBuf::from_path_buf(temp.path().to_path_buf()).map_err(|_| "utf-8")?;
/// let source = StubSource::default()
///     .with_file("timeZones.txt", "CountryCode\tTimeZoneId\tGMT\tDST\tRAW\n")
///     .with_file("countryInfo.txt", "# no countries\n");
/// let config = AtlasConfig::new(workdir).with_country_codes(Vec::<String>::new());
///
/// let report = build_atlas(&config, &source)?;
/// assert_eq!(report.timezones, 1);
/// assert_eq!(report.countries, 0);
/// assert!(report.output_path.is_file());
/// # Ok(())
/// # }
/// # example().unwrap();
/// ```
pub fn build_atlas(
    config: &AtlasConfig,
    source: &dyn DumpSource,
) -> Result<BuildReport, BuildError> {
    let mut pipeline = AtlasPipeline::create(config, source)?
        .load_timezones()?
        .load_countries()?;
    for code in config.country_codes() {
        pipeline.load_places(code)?;
    }
    let report = pipeline.finish();
    info!(
        "atlas {} built: {} timezones, {} countries, {} places",
        report.output_path,
        report.timezones,
        report.countries,
        report.total_places()
    );
    Ok(report)
}

#[cfg(test)]
mod tests;
