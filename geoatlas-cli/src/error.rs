//! Error types emitted by the geoatlas CLI.

use std::sync::Arc;

use geoatlas_data::atlas::QueryError;
use geoatlas_data::dump::TransportError;
use geoatlas_data::pipeline::BuildError;
use thiserror::Error;

/// Errors emitted by the geoatlas CLI.
#[derive(Debug, Error)]
pub enum CliError {
    /// Provided arguments failed Clap validation.
    #[error(transparent)]
    ArgumentParsing(#[from] clap::Error),
    /// Configuration layering failed (files, env, CLI).
    #[error("failed to load configuration: {0}")]
    Configuration(#[from] Arc<ortho_config::OrthoError>),
    /// A required option is missing after configuration merging.
    #[error("missing {field} (set --{field} or {env})")]
    MissingArgument {
        field: &'static str,
        env: &'static str,
    },
    /// The HTTP client could not be constructed.
    #[error("failed to prepare the dump client: {0}")]
    Transport(#[source] TransportError),
    /// Building the atlas failed.
    #[error(transparent)]
    Build(#[from] BuildError),
    /// Querying the atlas failed.
    #[error(transparent)]
    Query(#[from] QueryError),
    /// Serializing query results failed.
    #[error("failed to serialize output: {0}")]
    SerializeOutput(#[source] serde_json::Error),
    /// Writing to standard output failed.
    #[error("failed to write output: {0}")]
    WriteOutput(#[source] std::io::Error),
}
