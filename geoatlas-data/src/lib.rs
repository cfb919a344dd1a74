//! Acquisition, parsing and storage for the geoatlas builder.
//!
//! Responsibilities:
//! - Fetch the dump files into the working directory and reuse local copies.
//! - Stream dump files through the record parsers from `geoatlas-core`.
//! - Create the SQLite atlas, load it batch by batch and query it afterwards.
//! - Drive the full build in dependency order.
//!
//! Boundaries:
//! - Record layouts and the place retention policy live in `geoatlas-core`.
//! - All I/O is blocking and sequential; there is a single connection per
//!   build.
//!
//! Invariants:
//! - Place rows only reference committed country and timezone rows.
//! - No global mutable state.

pub mod atlas;
pub mod dump;
pub mod etl;
pub mod pipeline;

pub use atlas::{AtlasReader, PlaceMatch};
pub use pipeline::{AtlasConfig, BuildError, BuildReport, build_atlas};
