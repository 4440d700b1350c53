//! State snapshot persistence.
//!
//! The whole tracker state serializes to one JSON document with a small
//! metadata header. Writes are atomic (tempfile then persist) so a crashed
//! save never leaves a torn snapshot; loads verify the format version and
//! rebuild the derived indexes.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::core::TrackerState;

/// Current snapshot format version.
pub const FORMAT_VERSION: u32 = 1;

/// Snapshot identity and format stamp.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreMeta {
    pub store_id: Uuid,
    pub format_version: u32,
}

impl StoreMeta {
    pub fn new() -> Self {
        Self {
            store_id: Uuid::new_v4(),
            format_version: FORMAT_VERSION,
        }
    }
}

impl Default for StoreMeta {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Serialize, Deserialize)]
struct Snapshot {
    meta: StoreMeta,
    state: TrackerState,
}

#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("snapshot io failed at {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("snapshot encode/decode failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("unsupported snapshot format version {found} (supported: {supported})")]
    UnsupportedVersion { found: u32, supported: u32 },
}

fn io_error(path: &Path, source: std::io::Error) -> SnapshotError {
    SnapshotError::Io {
        path: path.display().to_string(),
        source,
    }
}

/// Atomically write the state (plus metadata) to `path`.
pub fn save(path: &Path, meta: &StoreMeta, state: &TrackerState) -> Result<(), SnapshotError> {
    let dir = path.parent().unwrap_or_else(|| Path::new("."));
    fs::create_dir_all(dir).map_err(|e| io_error(dir, e))?;

    let snapshot = Snapshot {
        meta: meta.clone(),
        state: state.clone(),
    };
    let contents = serde_json::to_vec_pretty(&snapshot)?;

    let temp = tempfile::NamedTempFile::new_in(dir).map_err(|e| io_error(dir, e))?;
    fs::write(temp.path(), &contents).map_err(|e| io_error(temp.path(), e))?;
    temp.persist(path).map_err(|e| io_error(path, e.error))?;

    tracing::debug!(path = %path.display(), bytes = contents.len(), "snapshot saved");
    Ok(())
}

/// Load a snapshot, rebuilding derived indexes.
pub fn load(path: &Path) -> Result<(StoreMeta, TrackerState), SnapshotError> {
    let contents = fs::read(path).map_err(|e| io_error(path, e))?;
    let snapshot: Snapshot = serde_json::from_slice(&contents)?;
    if snapshot.meta.format_version != FORMAT_VERSION {
        return Err(SnapshotError::UnsupportedVersion {
            found: snapshot.meta.format_version,
            supported: FORMAT_VERSION,
        });
    }
    let mut state = snapshot.state;
    state.rebuild_indexes();
    Ok((snapshot.meta, state))
}
