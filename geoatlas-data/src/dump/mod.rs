//! Facilities for fetching the flat-file dumps the atlas is built from.
//!
//! Every artefact lands in the source directory (`<workdir>/in`). Files that
//! already exist locally are reused, so an interrupted run only refetches what
//! it is missing.
#![forbid(unsafe_code)]

mod archive;
mod error;
mod ops;
mod source;
mod types;
mod util;

#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

pub use archive::extract_member;
pub use error::{AcquisitionError, TransportError};
pub use ops::{ensure_countries, ensure_places, ensure_timezones, write_sorted_timezones};
pub use source::{DEFAULT_BASE_URL, DEFAULT_USER_AGENT, DumpSource, HttpDumpSource};
pub use types::{BaseUrl, DumpUrl, SourceFile};
