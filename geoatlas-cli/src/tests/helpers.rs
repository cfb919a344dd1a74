//! Test helpers for staging working directories and sample atlases.

use super::*;
use geoatlas_data::dump::test_support::{StubSource, sample_place_line};
use tempfile::TempDir;

pub(super) struct Workspace {
    _dir: TempDir,
    root: Utf8PathBuf,
}

impl Workspace {
    pub(super) fn new() -> Self {
        let dir = TempDir::new().expect("tempdir");
        let root = Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).expect("utf-8 tempdir");
        Self { _dir: dir, root }
    }

    pub(super) fn root(&self) -> &camino::Utf8Path {
        &self.root
    }

    pub(super) fn atlas_path(&self) -> Utf8PathBuf {
        AtlasConfig::new(self.root.clone()).output_path()
    }

    /// Build the sample atlas in this workspace.
    pub(super) fn build_sample(&self) -> Utf8PathBuf {
        let config = AtlasConfig::new(self.root.clone()).with_country_codes(["ZZ"]);
        build_atlas(&config, &sample_source()).expect("build sample atlas");
        config.output_path()
    }
}

pub(super) fn sample_source() -> StubSource {
    let places = [
        sample_place_line(1, "Zed City", "ZZ", "25000", "Etc/Zulu"),
        sample_place_line(2, "Zed Harbour", "ZZ", "4000", ""),
        sample_place_line(3, "Outpost", "ZZ", "15", "Etc/Zulu"),
    ]
    .concat();
    StubSource::sample(&places).expect("build sample archive")
}

pub(super) fn output_of(buffer: Vec<u8>) -> String {
    String::from_utf8(buffer).expect("utf-8 output")
}
