//! Core domain records for the geographic atlas.
//!
//! The records mirror the three flat-file dumps the atlas is built from:
//! timezones, countries and populated places. Each is decoded from one
//! tab-delimited line by position, with the expected arity checked so a short
//! line surfaces as a [`RecordError::Shape`] naming the missing column.
//!
//! This crate performs no I/O; acquisition and persistence live in
//! `geoatlas-data`.
#![forbid(unsafe_code)]

pub mod catalogue;
mod country;
pub mod filter;
mod place;
mod record;
mod timezone;

pub use catalogue::{COUNTRY_CODES, is_catalogued};
pub use country::{COMMENT_MARKER, Country};
pub use filter::{
    DEFAULT_MIN_POPULATION, POPULATION_FILTER_EXEMPT, PlaceFilter, Retention,
};
pub use place::{POPULATED_PLACE_CLASS, Place};
pub use record::{FIELD_SEPARATOR, Fields, RecordError, RecordKind};
pub use timezone::{PLACEHOLDER_TIMEZONE_ID, Timezone};
