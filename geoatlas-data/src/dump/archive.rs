//! Extraction of places files from the per-country zip archives.

use std::io::{self, BufReader};

use camino::Utf8Path;
use geoatlas_fs::open_utf8_file;
use zip::{ZipArchive, result::ZipError};

use super::AcquisitionError;
use super::ops::persist_atomically;

/// Extract `member` from the zip archive at `archive` into `destination`.
///
/// The destination only appears once the member has been fully decompressed.
/// Returns the number of bytes written.
pub fn extract_member(
    archive: &Utf8Path,
    member: &str,
    destination: &Utf8Path,
) -> Result<u64, AcquisitionError> {
    let file = open_utf8_file(archive).map_err(|source| AcquisitionError::Read {
        path: archive.to_path_buf(),
        source,
    })?;
    let mut zip =
        ZipArchive::new(BufReader::new(file)).map_err(|source| AcquisitionError::Archive {
            path: archive.to_path_buf(),
            source,
        })?;
    let mut entry = match zip.by_name(member) {
        Ok(entry) => entry,
        Err(ZipError::FileNotFound) => {
            return Err(AcquisitionError::MissingArchiveEntry {
                path: archive.to_path_buf(),
                member: member.to_owned(),
            });
        }
        Err(source) => {
            return Err(AcquisitionError::Archive {
                path: archive.to_path_buf(),
                source,
            });
        }
    };
    persist_atomically(destination, |sink| {
        io::copy(&mut entry, sink).map_err(|source| AcquisitionError::Write {
            path: destination.to_path_buf(),
            source,
        })
    })
}
