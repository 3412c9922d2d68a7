//! JSON-lines history store

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, warn};
use tempfile::NamedTempFile;
use uuid::Uuid;

use crate::config::HistoryConfig;
use crate::domain::{GoalPlan, Language};

/// Serializes read-modify-write cycles across every store in the process
static WRITE_LOCK: Mutex<()> = Mutex::new(());

fn write_lock() -> MutexGuard<'static, ()> {
    WRITE_LOCK.lock().unwrap_or_else(|e| e.into_inner())
}

/// Errors from reading or writing the history file
#[derive(Debug, Error)]
pub enum HistoryError {
    #[error("History I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to encode history entry: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("History id prefix '{0}' matches more than one entry")]
    AmbiguousId(String),
}

/// One recorded plan
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub id: String,
    pub goal: String,
    pub language: Language,
    pub plan: GoalPlan,
    pub created_at: DateTime<Utc>,
}

impl HistoryEntry {
    pub fn new(goal: impl Into<String>, language: Language, plan: GoalPlan) -> Self {
        Self {
            id: Uuid::now_v7().to_string(),
            goal: goal.into(),
            language,
            plan,
            created_at: Utc::now(),
        }
    }

    /// First eight characters of the id, enough to address an entry
    pub fn short_id(&self) -> &str {
        self.id.get(..8).unwrap_or(&self.id)
    }
}

/// Most recent plans, oldest line first on disk
pub struct HistoryStore {
    path: PathBuf,
    max_entries: usize,
}

impl HistoryStore {
    pub fn new(path: impl AsRef<Path>, max_entries: usize) -> Self {
        let path = path.as_ref().to_path_buf();
        debug!(?path, max_entries, "HistoryStore::new: called");
        Self { path, max_entries }
    }

    pub fn from_config(config: &HistoryConfig) -> Self {
        Self::new(&config.path, config.max_entries)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append a plan, keeping only the newest `max_entries`
    pub fn record(&self, goal: &str, language: Language, plan: &GoalPlan) -> Result<HistoryEntry, HistoryError> {
        debug!(goal_len = goal.len(), %language, "HistoryStore::record: called");
        let entry = HistoryEntry::new(goal.trim(), language, plan.clone());

        let _guard = write_lock();
        let mut entries = self.load()?;
        entries.push(entry.clone());
        if entries.len() > self.max_entries {
            let excess = entries.len() - self.max_entries;
            debug!(excess, "HistoryStore::record: pruning oldest entries");
            entries.drain(..excess);
        }
        self.save(&entries)?;

        Ok(entry)
    }

    /// Entries newest first
    pub fn recent(&self) -> Result<Vec<HistoryEntry>, HistoryError> {
        let mut entries = self.load()?;
        entries.reverse();
        Ok(entries)
    }

    /// Remove the entry whose id equals or uniquely starts with `id`
    ///
    /// Returns false when nothing matched.
    pub fn delete(&self, id: &str) -> Result<bool, HistoryError> {
        debug!(%id, "HistoryStore::delete: called");
        let id = id.trim();
        if id.is_empty() {
            return Ok(false);
        }

        let _guard = write_lock();
        let mut entries = self.load()?;
        let index = match entries.iter().position(|e| e.id == id) {
            Some(index) => index,
            None => {
                let matches: Vec<usize> = entries
                    .iter()
                    .enumerate()
                    .filter(|(_, e)| e.id.starts_with(id))
                    .map(|(i, _)| i)
                    .collect();
                match matches.as_slice() {
                    [] => return Ok(false),
                    [index] => *index,
                    _ => return Err(HistoryError::AmbiguousId(id.to_string())),
                }
            }
        };

        let removed = entries.remove(index);
        self.save(&entries)?;
        info!(id = %removed.id, "Deleted history entry");
        Ok(true)
    }

    fn load(&self) -> Result<Vec<HistoryEntry>, HistoryError> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }

        let content = fs::read_to_string(&self.path).map_err(|source| self.io_error(source))?;
        let mut entries = Vec::new();
        for line in content.lines() {
            if line.trim().is_empty() {
                continue;
            }
            match serde_json::from_str::<HistoryEntry>(line) {
                Ok(entry) => entries.push(entry),
                Err(e) => warn!(error = %e, "HistoryStore: skipping malformed line"),
            }
        }
        debug!(count = entries.len(), "HistoryStore::load: loaded entries");
        Ok(entries)
    }

    /// Rewrite the whole file via a uniquely named sibling temp file and rename
    fn save(&self, entries: &[HistoryEntry]) -> Result<(), HistoryError> {
        let parent = match self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            Some(parent) => {
                fs::create_dir_all(parent).map_err(|source| self.io_error(source))?;
                parent
            }
            None => Path::new("."),
        };

        let mut buf = Vec::new();
        for entry in entries {
            serde_json::to_writer(&mut buf, entry)?;
            buf.push(b'\n');
        }

        let mut tmp = NamedTempFile::new_in(parent).map_err(|source| self.io_error(source))?;
        tmp.write_all(&buf).map_err(|source| self.io_error(source))?;
        tmp.as_file().sync_all().map_err(|source| self.io_error(source))?;
        tmp.persist(&self.path).map_err(|e| self.io_error(e.error))?;
        Ok(())
    }

    fn io_error(&self, source: std::io::Error) -> HistoryError {
        HistoryError::Io {
            path: self.path.clone(),
            source,
        }
    }
}
