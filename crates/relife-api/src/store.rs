//! JSON-file record store for run and meta records.
//!
//! Each record is one pretty-printed JSON file; writes go through a
//! temp-file rename and keep the previous version as a `.bak` so a crash
//! mid-write never leaves a truncated record behind.

use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use contracts::{MetaState, RunState};
use serde::Serialize;

#[derive(Debug)]
pub enum StoreError {
    Io(io::Error),
    Serde(serde_json::Error),
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(err) => write!(f, "store io error: {err}"),
            Self::Serde(err) => write!(f, "store serde error: {err}"),
        }
    }
}

impl std::error::Error for StoreError {}

impl From<io::Error> for StoreError {
    fn from(value: io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(value: serde_json::Error) -> Self {
        Self::Serde(value)
    }
}

#[derive(Debug)]
pub struct JsonStore {
    runs_dir: PathBuf,
    meta_path: PathBuf,
}

impl JsonStore {
    pub fn open(base_dir: impl AsRef<Path>) -> Result<Self, StoreError> {
        let base_dir = base_dir.as_ref().to_path_buf();
        let runs_dir = base_dir.join("runs");
        let meta_path = base_dir.join("meta.json");
        fs::create_dir_all(&runs_dir)?;

        Ok(Self {
            runs_dir,
            meta_path,
        })
    }

    /// Load the global meta record, seeding a durable default on first use.
    pub fn load_meta(&self) -> Result<MetaState, StoreError> {
        if !self.meta_path.exists() {
            let meta = MetaState::default();
            self.save_meta(&meta)?;
            return Ok(meta);
        }

        let raw = fs::read_to_string(&self.meta_path)?;
        Ok(serde_json::from_str(&raw)?)
    }

    pub fn save_meta(&self, meta: &MetaState) -> Result<(), StoreError> {
        atomic_write_json(&self.meta_path, meta)
    }

    pub fn load_run(&self, run_id: &str) -> Result<Option<RunState>, StoreError> {
        let Some(path) = self.run_path(run_id) else {
            return Ok(None);
        };
        if !path.exists() {
            return Ok(None);
        }

        let raw = fs::read_to_string(&path)?;
        Ok(Some(serde_json::from_str(&raw)?))
    }

    pub fn save_run(&self, run: &RunState) -> Result<(), StoreError> {
        let Some(path) = self.run_path(&run.run_id) else {
            return Err(StoreError::Io(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("run_id is not storable: {}", run.run_id),
            )));
        };
        atomic_write_json(&path, run)
    }

    // Run ids are opaque to the game rules but become file names here, so
    // only a safe alphabet maps onto the runs directory.
    fn run_path(&self, run_id: &str) -> Option<PathBuf> {
        let storable = !run_id.is_empty()
            && run_id
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        storable.then(|| self.runs_dir.join(format!("{run_id}.json")))
    }
}

fn atomic_write_json<T: Serialize>(path: &Path, value: &T) -> Result<(), StoreError> {
    let tmp_path = path.with_extension("json.tmp");
    let backup_path = path.with_extension("json.bak");

    let text = serde_json::to_string_pretty(value)?;
    fs::write(&tmp_path, text)?;
    if path.exists() {
        fs::rename(path, &backup_path)?;
    }
    fs::rename(&tmp_path, path)?;
    Ok(())
}
