//! Error types surfaced by the statistics engine.

use std::fmt;

/// Which per-event list an entry belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatField {
    Kills,
    Damages,
    Accuracies,
}

impl fmt::Display for StatField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Kills => write!(f, "kills"),
            Self::Damages => write!(f, "damages"),
            Self::Accuracies => write!(f, "accuracies"),
        }
    }
}

/// Reasons a submission is rejected. A rejected submission never touches the roster.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error(
        "The number of events must match the number of kills, damages, and accuracies entered."
    )]
    EventCountMismatch {
        events: u32,
        kills: usize,
        damages: usize,
        accuracies: usize,
    },
    #[error("Entry {} in {field} is not a number: {raw:?}", .index + 1)]
    InvalidEntry {
        field: StatField,
        index: usize,
        raw: String,
    },
    #[error("Values in {field} are too large to record.")]
    OutOfRange { field: StatField },
}

/// Malformed engine configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("storage key must not be empty")]
    EmptyStorageKey,
}
