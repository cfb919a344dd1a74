//! The SQLite atlas: schema, loaders and read-only queries.
//!
//! - [`initialise_schema`] creates the three tables, the country index on
//!   places and the `place_details` view.
//! - The `load_*` functions insert one batch per transaction, resolving the
//!   foreign keys of places through natural-key subqueries.
//! - [`AtlasReader`] queries a finished atlas without write access.
#![forbid(unsafe_code)]

mod persistence;
mod reader;
mod schema;

pub use persistence::{LoadError, load_countries, load_places, load_timezones};
pub use reader::{AtlasReader, PlaceMatch, QueryError, TimezoneOffsets};
pub use schema::{SCHEMA_VERSION, SchemaError, initialise_schema};

#[cfg(test)]
mod tests;
