//! Facade crate for the geoatlas builder.
//!
//! This crate re-exports the record types and retention policy from
//! `geoatlas-core` together with the build driver and atlas reader from
//! `geoatlas-data`.

#![forbid(unsafe_code)]

pub use geoatlas_core::{
    COUNTRY_CODES, Country, DEFAULT_MIN_POPULATION, PLACEHOLDER_TIMEZONE_ID,
    POPULATION_FILTER_EXEMPT, Place, PlaceFilter, RecordError, RecordKind, Retention, Timezone,
};

pub use geoatlas_data::atlas::{AtlasReader, PlaceMatch, QueryError};
pub use geoatlas_data::dump::{DumpSource, HttpDumpSource};
pub use geoatlas_data::pipeline::{AtlasConfig, BuildError, BuildReport, build_atlas};
