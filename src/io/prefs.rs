//! Per-user board preferences: collapsed-card sets and the status filter.
//!
//! Stored as JSON files under `<config-dir>/prefs/<user>/<key>.json`, keyed
//! by the user extracted from the session token. This is a best-effort
//! cache, never a correctness dependency: load failures fall back to the
//! documented defaults and save failures are swallowed.

use std::collections::HashSet;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::model::project::StatusFilter;

pub const COLLAPSED_PROJECTS: &str = "collapsed-projects";
pub const COLLAPSED_PRODUCTS: &str = "collapsed-products";
const STATUS_FILTER: &str = "status-filter";

#[derive(Debug, Clone)]
pub struct PrefStore {
    root: PathBuf,
    user: String,
}

impl PrefStore {
    pub fn new(config_dir: &Path, user: &str) -> Self {
        PrefStore {
            root: config_dir.join("prefs"),
            user: user.to_string(),
        }
    }

    fn key_path(&self, key: &str) -> PathBuf {
        self.root.join(&self.user).join(format!("{key}.json"))
    }

    /// Load a collapsed-id set; missing or corrupt files yield an empty set.
    pub fn load_set(&self, key: &str) -> HashSet<String> {
        let content = match fs::read_to_string(self.key_path(key)) {
            Ok(c) => c,
            Err(_) => return HashSet::new(),
        };
        serde_json::from_str(&content).unwrap_or_default()
    }

    /// Persist a collapsed-id set, best effort. The file always holds a JSON
    /// array (sorted for stable diffs), `[]` when the set is empty.
    pub fn save_set(&self, key: &str, set: &HashSet<String>) {
        let mut ids: Vec<&String> = set.iter().collect();
        ids.sort();
        if let Ok(content) = serde_json::to_string(&ids) {
            let _ = write_atomic(&self.key_path(key), content.as_bytes());
        }
    }

    /// Load the status filter; missing or corrupt files yield all-visible.
    pub fn load_status_filter(&self) -> StatusFilter {
        let content = match fs::read_to_string(self.key_path(STATUS_FILTER)) {
            Ok(c) => c,
            Err(_) => return StatusFilter::default(),
        };
        serde_json::from_str(&content).unwrap_or_default()
    }

    pub fn save_status_filter(&self, filter: &StatusFilter) {
        if let Ok(content) = serde_json::to_string(filter) {
            let _ = write_atomic(&self.key_path(STATUS_FILTER), content.as_bytes());
        }
    }
}

/// Return a new set with `id` removed if present, added otherwise. The input
/// is untouched.
pub fn toggle(set: &HashSet<String>, id: &str) -> HashSet<String> {
    let mut out = set.clone();
    if !out.remove(id) {
        out.insert(id.to_string());
    }
    out
}

/// Write via a temp file in the target directory so readers never observe a
/// partial file.
fn write_atomic(path: &Path, bytes: &[u8]) -> std::io::Result<()> {
    let dir = path.parent().ok_or(std::io::ErrorKind::NotFound)?;
    fs::create_dir_all(dir)?;
    let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
    tmp.write_all(bytes)?;
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}
