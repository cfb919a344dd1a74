//! Error types produced while acquiring dump files.

use std::io;

use camino::Utf8PathBuf;
use thiserror::Error;

/// Errors produced while preparing the local copy of a dump file.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AcquisitionError {
    /// The remote file could not be fetched.
    #[error("failed to download {file_name}: {source}")]
    Download {
        /// Remote file name.
        file_name: String,
        /// Transport failure.
        source: TransportError,
    },
    /// Preparing the source directory failed.
    #[error("failed to create source directory {path:?}: {source}")]
    CreateDir {
        /// Directory that could not be created.
        path: Utf8PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },
    /// Reading a local source file failed.
    #[error("failed to read {path:?}: {source}")]
    Read {
        /// File being read.
        path: Utf8PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },
    /// Writing a local source file failed.
    #[error("failed to write {path:?}: {source}")]
    Write {
        /// File being written.
        path: Utf8PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },
    /// The archive could not be opened or decompressed.
    #[error("failed to read archive {path:?}: {source}")]
    Archive {
        /// Archive path.
        path: Utf8PathBuf,
        /// Error reported by the zip reader.
        source: zip::result::ZipError,
    },
    /// The archive does not contain the expected member.
    #[error("archive {path:?} does not contain {member}")]
    MissingArchiveEntry {
        /// Archive path.
        path: Utf8PathBuf,
        /// Member that was expected.
        member: String,
    },
}

/// Transport-level errors encountered while issuing HTTP requests.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum TransportError {
    /// The HTTP client could not be constructed.
    #[error("failed to build HTTP client: {source}")]
    Client {
        /// Builder error reported by `reqwest`.
        source: reqwest::Error,
    },
    /// The base URL and file name did not form a valid URL.
    #[error("invalid download URL {url:?}: {source}")]
    InvalidUrl {
        /// URL that failed to parse.
        url: String,
        /// Parse failure.
        source: url::ParseError,
    },
    /// The server returned an HTTP error status.
    #[error("request to {url} failed with status {status}: {message}")]
    Http {
        /// Fully qualified request URL.
        url: String,
        /// HTTP status code.
        status: u16,
        /// Short error description supplied by the server.
        message: String,
    },
    /// The request failed due to an I/O error.
    #[error("network error contacting {url}: {source}")]
    Network {
        /// Fully qualified request URL.
        url: String,
        /// I/O error reported by the transport.
        source: io::Error,
    },
}
