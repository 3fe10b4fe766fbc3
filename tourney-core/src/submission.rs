//! Incoming stat submissions and their validation
use serde::{Deserialize, Serialize};

use crate::aggregate::parse_entry;
use crate::error::{StatField, ValidationError};
use crate::player::Identity;

/// One raw per-event entry: either a number or whatever text was typed into the field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EntryValue {
    Number(f64),
    Text(String),
}

impl From<f64> for EntryValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<i32> for EntryValue {
    fn from(value: i32) -> Self {
        Self::Number(f64::from(value))
    }
}

impl From<&str> for EntryValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for EntryValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl EntryValue {
    /// Text with nothing but whitespace.
    #[must_use]
    pub fn is_blank(&self) -> bool {
        matches!(self, Self::Text(text) if text.trim().is_empty())
    }
}

/// How non-numeric entries are treated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParsePolicy {
    /// Non-numeric entries count as zero.
    #[default]
    Lenient,
    /// The first blank or non-numeric entry rejects the submission.
    Strict,
}

/// A single form submission for one player. Never stored.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Submission {
    pub player_name: String,
    pub clan_name: String,
    #[serde(default)]
    pub kills: Vec<EntryValue>,
    #[serde(default)]
    pub damages: Vec<EntryValue>,
    #[serde(default)]
    pub accuracies: Vec<EntryValue>,
    pub events: u32,
}

impl Submission {
    #[must_use]
    pub fn new(player_name: impl Into<String>, clan_name: impl Into<String>) -> Self {
        Self {
            player_name: player_name.into(),
            clan_name: clan_name.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_kills<V: Into<EntryValue>>(mut self, values: impl IntoIterator<Item = V>) -> Self {
        self.kills = values.into_iter().map(Into::into).collect();
        self
    }

    #[must_use]
    pub fn with_damages<V: Into<EntryValue>>(
        mut self,
        values: impl IntoIterator<Item = V>,
    ) -> Self {
        self.damages = values.into_iter().map(Into::into).collect();
        self
    }

    #[must_use]
    pub fn with_accuracies<V: Into<EntryValue>>(
        mut self,
        values: impl IntoIterator<Item = V>,
    ) -> Self {
        self.accuracies = values.into_iter().map(Into::into).collect();
        self
    }

    #[must_use]
    pub const fn with_events(mut self, events: u32) -> Self {
        self.events = events;
        self
    }

    #[must_use]
    pub fn identity(&self) -> Identity {
        Identity::new(self.player_name.clone(), self.clan_name.clone())
    }

    fn fields(&self) -> [(StatField, &[EntryValue]); 3] {
        [
            (StatField::Kills, self.kills.as_slice()),
            (StatField::Damages, self.damages.as_slice()),
            (StatField::Accuracies, self.accuracies.as_slice()),
        ]
    }
}

/// Check a submission before any aggregation happens.
///
/// # Errors
///
/// Returns [`ValidationError::EventCountMismatch`] when the declared event count differs from
/// the length of any entry list, and (under [`ParsePolicy::Strict`]) [`ValidationError::InvalidEntry`]
/// for the first entry that is blank or does not parse as a number.
pub fn validate(submission: &Submission, policy: ParsePolicy) -> Result<(), ValidationError> {
    let events = usize::try_from(submission.events).unwrap_or(usize::MAX);
    if submission.fields().iter().any(|(_, list)| list.len() != events) {
        return Err(ValidationError::EventCountMismatch {
            events: submission.events,
            kills: submission.kills.len(),
            damages: submission.damages.len(),
            accuracies: submission.accuracies.len(),
        });
    }

    if policy == ParsePolicy::Strict {
        for (field, list) in submission.fields() {
            if let Some((index, entry)) = list
                .iter()
                .enumerate()
                .find(|(_, entry)| entry.is_blank() || parse_entry(entry).is_none())
            {
                let raw = match entry {
                    EntryValue::Number(n) => n.to_string(),
                    EntryValue::Text(text) => text.clone(),
                };
                return Err(ValidationError::InvalidEntry { field, index, raw });
            }
        }
    }

    Ok(())
}
