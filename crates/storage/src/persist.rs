//! World-state export and import
//!
//! The CLI keeps the ledger between invocations in a single JSON file:
//!
//! ```json
//! {
//!   "format_version": 1,
//!   "version": 3,
//!   "clock": 1700000000000000,
//!   "entries": [
//!     { "key": "p1", "version": 3, "value": "eyJpZCI6InAxIiwuLi59" }
//!   ]
//! }
//! ```
//!
//! Values are base64 so arbitrary bytes survive. Saves go through a temp file
//! and a rename, so a crash mid-write leaves the previous file intact.
//! `clock` is the highest transaction timestamp in microseconds; files
//! without it load with the clock at the epoch.
//!
//! A load, execute, save cycle is not atomic on its own. Callers that share a
//! state file between processes hold a [`StateLock`] across the whole cycle.

use std::fs::{self, File, OpenOptions};
use std::path::{Path, PathBuf};

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use serde::{Deserialize, Serialize};
use supplychain_core::{Error, Result, Timestamp};
use tracing::debug;

use crate::stored_value::StoredValue;
use crate::world_state::WorldState;

const FORMAT_VERSION: u32 = 1;

#[derive(Debug, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
struct StateFile {
    format_version: u32,
    version: u64,
    #[serde(default)]
    clock: u64,
    entries: Vec<StateFileEntry>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
struct StateFileEntry {
    key: String,
    version: u64,
    value: String,
}

/// Write the committed world state to `path`
///
/// Parent directories are created as needed.
pub fn save_world_state(state: &WorldState, path: &Path) -> Result<()> {
    let file = StateFile {
        format_version: FORMAT_VERSION,
        version: state.current_version(),
        clock: state.clock().as_micros(),
        entries: state
            .entries()
            .into_iter()
            .map(|(key, sv)| StateFileEntry {
                key,
                version: sv.version(),
                value: STANDARD.encode(sv.value()),
            })
            .collect(),
    };

    let json = serde_json::to_vec_pretty(&file)
        .map_err(|e| Error::store(format!("failed to serialize world state: {}", e)))?;

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    let tmp = path.with_extension("tmp");
    fs::write(&tmp, json)?;
    fs::rename(&tmp, path)?;

    debug!(path = %path.display(), keys = file.entries.len(), "world state saved");
    Ok(())
}

/// Read a world state previously written by [`save_world_state`]
///
/// A missing file yields an empty world state.
pub fn load_world_state(path: &Path) -> Result<WorldState> {
    if !path.exists() {
        debug!(path = %path.display(), "no world state file, starting empty");
        return Ok(WorldState::new());
    }

    let raw = fs::read(path)?;
    let file: StateFile = serde_json::from_slice(&raw).map_err(|e| {
        Error::store(format!(
            "world state file {} is not valid: {}",
            path.display(),
            e
        ))
    })?;
    if file.format_version != FORMAT_VERSION {
        return Err(Error::store(format!(
            "world state file {} has format version {}, expected {}",
            path.display(),
            file.format_version,
            FORMAT_VERSION
        )));
    }

    let mut entries = Vec::with_capacity(file.entries.len());
    for entry in file.entries {
        let value = STANDARD.decode(&entry.value).map_err(|e| {
            Error::store(format!("value under key {} is not base64: {}", entry.key, e))
        })?;
        entries.push((entry.key, StoredValue::new(value, entry.version)));
    }

    debug!(path = %path.display(), keys = entries.len(), "world state loaded");
    Ok(WorldState::from_entries(entries, file.version)
        .with_clock(Timestamp::from_micros(file.clock)))
}

/// Exclusive hold on a world state file
///
/// Backed by an OS file lock on `<state>.lock` next to the state file. The
/// lock is released when the value is dropped or the process exits.
#[derive(Debug)]
pub struct StateLock {
    path: PathBuf,
    _file: File,
}

impl StateLock {
    /// Take the lock for the state file at `state_path` without blocking
    ///
    /// # Errors
    ///
    /// `Error::Store` if another holder already has the lock or the lock file
    /// cannot be opened.
    pub fn acquire(state_path: &Path) -> Result<Self> {
        if let Some(parent) = state_path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let path = state_path.with_extension("lock");
        let file = OpenOptions::new()
            .create(true)
            .truncate(false)
            .read(true)
            .write(true)
            .open(&path)
            .map_err(|e| Error::store(format!("failed to open lock file: {}", e)))?;
        fs2::FileExt::try_lock_exclusive(&file).map_err(|_| {
            Error::store(format!(
                "world state file {} is already in use by another process",
                state_path.display()
            ))
        })?;

        debug!(path = %path.display(), "world state lock acquired");
        Ok(Self { path, _file: file })
    }

    /// Path of the lock file
    pub fn path(&self) -> &Path {
        &self.path
    }
}
