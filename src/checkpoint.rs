//! Checkpoint store
//!
//! Durable record of which slugs have completed or failed, so a batch run
//! can be re-run safely after a crash or interruption. The store is an
//! injected abstraction: the orchestrator only sees the [`CheckpointStore`]
//! trait, so tests run against an in-memory impl and alternative backends
//! can replace the JSON file without touching pipeline logic.

use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// Checkpoint file name - hidden file to avoid cluttering the output directory
pub const CHECKPOINT_FILENAME: &str = ".brandprofiler-checkpoint.json";

/// Current checkpoint format version - bump when making breaking changes
pub const CHECKPOINT_VERSION: u32 = 1;

/// Per-slug processing state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlugState {
    Pending,
    Completed,
    Failed,
}

/// Which slugs have finished or failed. A slug is never in both sets.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Progress {
    /// Checkpoint format version for compatibility checking
    pub version: u32,

    /// UTC timestamp of the last save
    pub updated_at: DateTime<Utc>,

    /// Slugs whose profile artifact was written successfully
    pub completed: HashSet<String>,

    /// Slugs whose processing failed; retried on a later run
    pub failed: HashSet<String>,
}

impl Default for Progress {
    fn default() -> Self {
        Self {
            version: CHECKPOINT_VERSION,
            updated_at: Utc::now(),
            completed: HashSet::new(),
            failed: HashSet::new(),
        }
    }
}

impl Progress {
    /// Record a successful completion. Clears any earlier failure so the
    /// two sets stay mutually exclusive.
    pub fn mark_completed(&mut self, slug: &str) {
        self.completed.insert(slug.to_string());
        self.failed.remove(slug);
    }

    /// Record a failure. Completed slugs stay completed.
    pub fn mark_failed(&mut self, slug: &str) {
        if !self.completed.contains(slug) {
            self.failed.insert(slug.to_string());
        }
    }

    pub fn is_completed(&self, slug: &str) -> bool {
        self.completed.contains(slug)
    }

    pub fn state(&self, slug: &str) -> SlugState {
        if self.completed.contains(slug) {
            SlugState::Completed
        } else if self.failed.contains(slug) {
            SlugState::Failed
        } else {
            SlugState::Pending
        }
    }
}

/// Read/write interface the orchestrator depends on
pub trait CheckpointStore {
    /// Load progress; a store with no prior state returns the default
    fn load(&self) -> Result<Progress>;

    /// Persist progress durably
    fn save(&self, progress: &Progress) -> Result<()>;
}

/// JSON-file-backed store, one hidden file in the output directory
#[derive(Debug, Clone)]
pub struct JsonCheckpointStore {
    path: PathBuf,
}

impl JsonCheckpointStore {
    pub fn new(output_dir: &Path) -> Self {
        Self {
            path: output_dir.join(CHECKPOINT_FILENAME),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl CheckpointStore for JsonCheckpointStore {
    fn load(&self) -> Result<Progress> {
        if !self.path.exists() {
            return Ok(Progress::default());
        }
        let content = std::fs::read_to_string(&self.path)?;
        let progress: Progress = serde_json::from_str(&content)?;
        if progress.version != CHECKPOINT_VERSION {
            anyhow::bail!(
                "Incompatible checkpoint version: file has version {} but current version is {}. \
                 Delete {} to start fresh.",
                progress.version,
                CHECKPOINT_VERSION,
                self.path.display()
            );
        }
        Ok(progress)
    }

    /// Atomic save: write to a temp file, fsync, then rename so an
    /// interrupt mid-write can never corrupt the checkpoint.
    fn save(&self, progress: &Progress) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let temp_path = self.path.with_extension("tmp");

        let mut snapshot = progress.clone();
        snapshot.updated_at = Utc::now();
        let content = serde_json::to_string_pretty(&snapshot)?;

        {
            let mut file = std::fs::File::create(&temp_path)?;
            std::io::Write::write_all(&mut file, content.as_bytes())?;
            file.sync_all()?;
        }
        std::fs::rename(&temp_path, &self.path)?;

        Ok(())
    }
}

/// In-memory store for tests and dry runs
#[derive(Debug, Default)]
pub struct MemoryCheckpointStore {
    state: std::sync::Mutex<Progress>,
}

impl MemoryCheckpointStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl CheckpointStore for MemoryCheckpointStore {
    fn load(&self) -> Result<Progress> {
        Ok(self.state.lock().unwrap().clone())
    }

    fn save(&self, progress: &Progress) -> Result<()> {
        *self.state.lock().unwrap() = progress.clone();
        Ok(())
    }
}
