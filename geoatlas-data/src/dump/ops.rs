use std::{
    collections::BTreeMap,
    io::{BufRead, BufReader, Write},
};

use camino::{Utf8Path, Utf8PathBuf};
use geoatlas_fs::{ensure_dir, file_is_file, open_utf8_file};
use log::{debug, info};
use tempfile::NamedTempFile;

use super::archive::extract_member;
use super::source::DumpSource;
use super::{AcquisitionError, SourceFile};

/// Ensure the sorted timezone table exists in `dir`, fetching it if needed.
///
/// The raw table is kept next to a derivative without the header row, holding
/// one line per timezone identifier, sorted by identifier. The derivative is
/// rebuilt whenever the raw table is refetched. Returns the derivative's path.
///
/// # Examples
/// ```
/// # use camino::Utf8PathBuf;
/// # use geoatlas_data::dump::{ensure_timezones, test_support::StubSource};
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let temp = tempfile::tempdir()?;
/// let dir = Utf8PathBuf::from_path_buf(temp.path().to_path_buf()).map_err(|_| "utf-8")?;
/// let source = StubSource::default().with_file(
///     "timeZones.txt",
///     "CountryCode\tTimeZoneId\tGMT\tDST\tRAW\nFR\tEurope/Paris\t1.0\t2.0\t1.0\n",
/// );
/// let sorted = ensure_timezones(&source, &dir)?;
/// assert_eq!(std::fs::read_to_string(sorted)?, "FR\tEurope/Paris\t1.0\t2.0\t1.0\n");
/// # Ok(())
/// # }
/// # example().unwrap();
/// ```
pub fn ensure_timezones<S: DumpSource + ?Sized>(
    source: &S,
    dir: &Utf8Path,
) -> Result<Utf8PathBuf, AcquisitionError> {
    let remote_name = SourceFile::Timezones.remote_name();
    let raw = dir.join(&remote_name);
    let sorted = dir.join(SourceFile::Timezones.local_name());
    let fetched = fetch_if_missing(source, &remote_name, &raw)?;
    if fetched || !exists(&sorted)? {
        let rows = write_sorted_timezones(&raw, &sorted)?;
        info!("sorted {rows} timezones into {sorted}");
    }
    Ok(sorted)
}

/// Ensure the country table exists in `dir`, fetching it if needed.
pub fn ensure_countries<S: DumpSource + ?Sized>(
    source: &S,
    dir: &Utf8Path,
) -> Result<Utf8PathBuf, AcquisitionError> {
    let file = SourceFile::Countries;
    let path = dir.join(file.local_name());
    fetch_if_missing(source, &file.remote_name(), &path)?;
    Ok(path)
}

/// Ensure the places file for `country_code` exists in `dir`.
///
/// The archive is only fetched when neither the extracted file nor the
/// archive is present locally.
pub fn ensure_places<S: DumpSource + ?Sized>(
    source: &S,
    dir: &Utf8Path,
    country_code: &str,
) -> Result<Utf8PathBuf, AcquisitionError> {
    let file = SourceFile::Places(country_code.to_owned());
    let text = dir.join(file.local_name());
    if exists(&text)? {
        debug!("reusing {text}");
        return Ok(text);
    }
    let remote_name = file.remote_name();
    let archive = dir.join(&remote_name);
    fetch_if_missing(source, &remote_name, &archive)?;
    let bytes = extract_member(&archive, &file.local_name(), &text)?;
    debug!("extracted {text} ({bytes} bytes)");
    Ok(text)
}

/// Write the header-stripped, deduplicated and sorted timezone table.
///
/// The first line of `raw` is treated as the header. When an identifier is
/// listed more than once the first row wins. Returns the number of rows
/// written.
pub fn write_sorted_timezones(
    raw: &Utf8Path,
    sorted: &Utf8Path,
) -> Result<usize, AcquisitionError> {
    let read_error = |source| AcquisitionError::Read {
        path: raw.to_path_buf(),
        source,
    };
    let file = open_utf8_file(raw).map_err(read_error)?;
    let mut rows: BTreeMap<String, String> = BTreeMap::new();
    for line in BufReader::new(file).lines().skip(1) {
        let line = line.map_err(read_error)?;
        let row = line.trim_end_matches('\r');
        if row.is_empty() {
            continue;
        }
        let key = row.split('\t').nth(1).unwrap_or_default().to_owned();
        rows.entry(key).or_insert_with(|| row.to_owned());
    }

    let count = rows.len();
    persist_atomically(sorted, |sink| {
        let mut written = 0u64;
        for row in rows.values() {
            writeln!(sink, "{row}").map_err(|source| AcquisitionError::Write {
                path: sorted.to_path_buf(),
                source,
            })?;
            written += u64::try_from(row.len()).unwrap_or(u64::MAX).saturating_add(1);
        }
        Ok(written)
    })?;
    Ok(count)
}

fn fetch_if_missing<S: DumpSource + ?Sized>(
    source: &S,
    file_name: &str,
    path: &Utf8Path,
) -> Result<bool, AcquisitionError> {
    if exists(path)? {
        debug!("reusing {path}");
        return Ok(false);
    }
    if let Some(parent) = path.parent() {
        ensure_dir(parent).map_err(|err| AcquisitionError::CreateDir {
            path: parent.to_path_buf(),
            source: err,
        })?;
    }
    info!("downloading {file_name} from {}", source.base_url());
    let bytes = persist_atomically(path, |sink| {
        source
            .download(file_name, sink)
            .map_err(|err| AcquisitionError::Download {
                file_name: file_name.to_owned(),
                source: err,
            })
    })?;
    info!("downloaded {file_name} ({bytes} bytes)");
    Ok(true)
}

fn exists(path: &Utf8Path) -> Result<bool, AcquisitionError> {
    file_is_file(path).map_err(|source| AcquisitionError::Read {
        path: path.to_path_buf(),
        source,
    })
}

/// Write through a temporary file in the destination directory and rename it
/// into place once `write` succeeds, so a failed transfer leaves no file.
pub(crate) fn persist_atomically<F>(
    destination: &Utf8Path,
    write: F,
) -> Result<u64, AcquisitionError>
where
    F: FnOnce(&mut dyn Write) -> Result<u64, AcquisitionError>,
{
    let write_error = |source| AcquisitionError::Write {
        path: destination.to_path_buf(),
        source,
    };
    let dir = match destination.parent() {
        Some(parent) if !parent.as_str().is_empty() => parent,
        _ => Utf8Path::new("."),
    };
    let mut temp = NamedTempFile::new_in(dir).map_err(write_error)?;
    let bytes = write(&mut temp)?;
    temp.flush().map_err(write_error)?;
    temp.persist(destination)
        .map_err(|err| write_error(err.error))?;
    Ok(bytes)
}
