//! Test helpers for writing CLI inputs into temporary workspaces.

use camino::{Utf8Path, Utf8PathBuf};
use tempfile::TempDir;

/// Strategy book shared by the CLI scenarios.
pub(super) const STRATEGIES_JSON: &str = r#"{
    "pursuit": {"weights": {"distance_to_start": -1.0}, "points_repeltion": 0},
    "spread": {"weights": {"speed_max": 1.0}, "points_repeltion": 1.0}
}"#;

/// Two nodes: a junction of a primary road and a residential street, and a
/// dead end on a tagged 30 km/h street.
pub(super) const NODES_JSON: &str = r#"[
    {"id": 1, "lon": 1.44, "lat": 43.60, "segments": [
        {"highway": "primary"},
        {"highway": "residential", "lanes": "2"}
    ]},
    {"id": 2, "lon": 1.45, "lat": 43.61, "segments": [
        {"highway": "residential", "maxspeed": "30"}
    ]}
]"#;

pub(super) fn write_utf8(path: &Utf8Path, contents: &[u8]) {
    std::fs::write(path.as_std_path(), contents).expect("write fixture file");
}

/// Temporary directory addressed through UTF-8 paths.
#[derive(Debug)]
pub(super) struct Workspace {
    _dir: TempDir,
    root: Utf8PathBuf,
}

impl Workspace {
    pub(super) fn new() -> Self {
        let dir = TempDir::new().expect("tempdir");
        let root = Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).expect("utf-8 workspace");
        Self { _dir: dir, root }
    }

    pub(super) fn root(&self) -> &Utf8Path {
        &self.root
    }

    pub(super) fn path(&self, name: &str) -> Utf8PathBuf {
        self.root.join(name)
    }

    pub(super) fn write(&self, name: &str, contents: &str) -> Utf8PathBuf {
        let path = self.path(name);
        write_utf8(&path, contents.as_bytes());
        path
    }
}
