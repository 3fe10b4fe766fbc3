//! Replaying submission files against a roster persisted on disk.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tourney_core::{
    EngineConfig, PlayerRecord, RosterStorage, SortKey, StatsEngine, Submission, sort_roster,
};

#[derive(Debug, thiserror::Error)]
pub enum FileStorageError {
    #[error("could not read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("could not write {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("could not remove {}: {source}", .path.display())]
    Remove {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Key-value storage where each key is a JSON file inside `dir`.
#[derive(Debug, Clone)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// File backing `key`. Characters outside `[A-Za-z0-9_-]` become `_`.
    pub fn path_for(&self, key: &str) -> PathBuf {
        let file: String = key
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                    c
                } else {
                    '_'
                }
            })
            .collect();
        self.dir.join(format!("{file}.json"))
    }
}

impl RosterStorage for FileStorage {
    type Error = FileStorageError;

    fn read(&self, key: &str) -> Result<Option<String>, Self::Error> {
        let path = self.path_for(key);
        match fs::read_to_string(&path) {
            Ok(contents) => Ok(Some(contents)),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(source) => Err(FileStorageError::Read { path, source }),
        }
    }

    fn write(&self, key: &str, value: &str) -> Result<(), Self::Error> {
        let path = self.path_for(key);
        fs::create_dir_all(&self.dir)
            .and_then(|()| fs::write(&path, value))
            .map_err(|source| FileStorageError::Write { path, source })
    }

    fn remove(&self, key: &str) -> Result<(), Self::Error> {
        let path = self.path_for(key);
        match fs::remove_file(&path) {
            Err(err) if err.kind() != ErrorKind::NotFound => {
                Err(FileStorageError::Remove { path, source: err })
            }
            _ => Ok(()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rejection {
    /// 1-based position in the submission file.
    pub position: usize,
    pub player: String,
    pub reason: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReplaySummary {
    pub accepted: usize,
    pub rejected: Vec<Rejection>,
}

impl ReplaySummary {
    pub fn total(&self) -> usize {
        self.accepted + self.rejected.len()
    }
}

/// Read a JSON array of submissions.
pub fn load_submissions(path: &Path) -> Result<Vec<Submission>> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read submissions from {}", path.display()))?;
    serde_json::from_str(&raw)
        .with_context(|| format!("{} is not a JSON array of submissions", path.display()))
}

/// Submit each entry in order. Rejected entries are recorded and skipped.
pub fn replay<S: RosterStorage>(
    engine: &mut StatsEngine<S>,
    submissions: &[Submission],
) -> ReplaySummary {
    let mut summary = ReplaySummary::default();
    for (index, submission) in submissions.iter().enumerate() {
        match engine.submit(submission) {
            Ok(_) => summary.accepted += 1,
            Err(err) => {
                let player = submission.identity().to_string();
                log::info!("submission #{} for {player} rejected: {err}", index + 1);
                summary.rejected.push(Rejection {
                    position: index + 1,
                    player,
                    reason: err.to_string(),
                });
            }
        }
    }
    summary
}

/// Options for a replay run against an on-disk store.
#[derive(Debug, Clone)]
pub struct ReplayOptions {
    pub store_dir: PathBuf,
    pub submissions: Option<PathBuf>,
    pub clear_store: bool,
    pub sort_key: SortKey,
}

/// Open the store, optionally clear it and apply the submission file.
///
/// Returns the roster sorted for display, leaving the stored order as submitted, plus what
/// happened to each submission.
pub fn run_replay(
    options: &ReplayOptions,
    config: &EngineConfig,
) -> Result<(Vec<PlayerRecord>, ReplaySummary)> {
    let submissions = match &options.submissions {
        Some(path) => load_submissions(path)?,
        None => Vec::new(),
    };

    let storage = FileStorage::new(&options.store_dir);
    let mut engine = StatsEngine::open(storage, config.clone());
    if options.clear_store {
        engine.clear();
    }

    let summary = replay(&mut engine, &submissions);
    let roster = sort_roster(engine.roster(), options.sort_key);
    log::debug!(
        "replay stored {} players under {}",
        roster.len(),
        engine.store().storage().path_for(engine.store().key()).display()
    );
    Ok((roster, summary))
}
