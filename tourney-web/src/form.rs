//! Input collector state
//!
//! `FormDraft` mirrors what is typed into the stats form, as raw text, and converts it
//! into a [`Submission`] on submit. It holds no browser types so it can be exercised natively.

use tourney_core::numbers::round_f64_to_i64;
use tourney_core::{EditDraft, EntryValue, StatField, Submission, ValidationError};

/// Every per-event list the form renders, in display order.
pub const FIELDS: [StatField; 3] = [StatField::Kills, StatField::Damages, StatField::Accuracies];

/// Section heading for a per-event list.
#[must_use]
pub const fn field_heading(field: StatField) -> &'static str {
    match field {
        StatField::Kills => "Kills",
        StatField::Damages => "Damage",
        StatField::Accuracies => "Accuracy",
    }
}

/// Singular noun used for placeholders and the add button.
#[must_use]
pub const fn field_noun(field: StatField) -> &'static str {
    match field {
        StatField::Kills => "Kill",
        StatField::Damages => "Damage",
        StatField::Accuracies => "Accuracy",
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormDraft {
    pub player_name: String,
    pub clan_name: String,
    pub kills: Vec<String>,
    pub damages: Vec<String>,
    pub accuracies: Vec<String>,
    pub events: String,
}

impl FormDraft {
    /// Prefill identity fields from an edit request. Per-event lists start empty.
    #[must_use]
    pub fn from_edit(draft: &EditDraft) -> Self {
        Self {
            player_name: draft.identity.player_name.clone(),
            clan_name: draft.identity.clan_name.clone(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn entries(&self, field: StatField) -> &[String] {
        match field {
            StatField::Kills => &self.kills,
            StatField::Damages => &self.damages,
            StatField::Accuracies => &self.accuracies,
        }
    }

    fn entries_mut(&mut self, field: StatField) -> &mut Vec<String> {
        match field {
            StatField::Kills => &mut self.kills,
            StatField::Damages => &mut self.damages,
            StatField::Accuracies => &mut self.accuracies,
        }
    }

    /// Append an empty entry to `field`.
    pub fn add_entry(&mut self, field: StatField) {
        self.entries_mut(field).push(String::new());
    }

    /// Remove entry `index` of `field`; out-of-range indices are ignored.
    pub fn remove_entry(&mut self, field: StatField, index: usize) {
        let entries = self.entries_mut(field);
        if index < entries.len() {
            entries.remove(index);
        }
    }

    /// Overwrite entry `index` of `field`; out-of-range indices are ignored.
    pub fn set_entry(&mut self, field: StatField, index: usize, value: impl Into<String>) {
        if let Some(slot) = self.entries_mut(field).get_mut(index) {
            *slot = value.into();
        }
    }

    /// Convert the typed values into a submission for the engine.
    ///
    /// The events field follows the numeric input's semantics: blank or non-numeric text
    /// counts as zero.
    ///
    /// # Errors
    ///
    /// A negative, fractional or out-of-range event count can never equal a list length, so it
    /// is reported as [`ValidationError::EventCountMismatch`] immediately.
    pub fn to_submission(&self) -> Result<Submission, ValidationError> {
        let events = parse_events(&self.events).ok_or_else(|| {
            let declared = self.events.trim().parse::<f64>().unwrap_or(0.0);
            ValidationError::EventCountMismatch {
                events: u32::try_from(round_f64_to_i64(declared).max(0)).unwrap_or(u32::MAX),
                kills: self.kills.len(),
                damages: self.damages.len(),
                accuracies: self.accuracies.len(),
            }
        })?;
        Ok(Submission {
            player_name: self.player_name.clone(),
            clan_name: self.clan_name.clone(),
            kills: to_entries(&self.kills),
            damages: to_entries(&self.damages),
            accuracies: to_entries(&self.accuracies),
            events,
        })
    }
}

fn to_entries(values: &[String]) -> Vec<EntryValue> {
    values.iter().map(|v| EntryValue::from(v.as_str())).collect()
}

/// Parse the events field. `None` means the value can never match a list length.
fn parse_events(raw: &str) -> Option<u32> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Some(0);
    }
    let Ok(value) = trimmed.parse::<f64>() else {
        return Some(0);
    };
    if value.is_nan() || value == 0.0 {
        return Some(0);
    }
    if value < 0.0 || value.fract() != 0.0 || value > f64::from(u32::MAX) {
        return None;
    }
    u32::try_from(round_f64_to_i64(value)).ok()
}
