//! Edit flow: pulling an existing record back into the input form
use serde::{Deserialize, Serialize};

use crate::player::{Identity, PlayerRecord};

/// Prefill data handed to the input collector when a row is edited.
///
/// Per-event entries are not retained by the roster, so only the identity and the
/// current aggregates come back; submitting new events with the same identity merges them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EditDraft {
    pub identity: Identity,
    pub current: PlayerRecord,
}

impl EditDraft {
    #[must_use]
    pub fn from_record(record: &PlayerRecord) -> Self {
        Self {
            identity: record.identity(),
            current: record.clone(),
        }
    }
}

/// Find the record for `identity` and build its draft.
#[must_use]
pub fn begin_edit(roster: &[PlayerRecord], identity: &Identity) -> Option<EditDraft> {
    roster
        .iter()
        .find(|record| record.matches(identity))
        .map(EditDraft::from_record)
}

/// Build a draft for the row at `index` of `roster` as currently ordered.
///
/// The position is resolved to an identity immediately; later re-sorts cannot retarget the edit.
#[must_use]
pub fn begin_edit_at(roster: &[PlayerRecord], index: usize) -> Option<EditDraft> {
    roster.get(index).map(EditDraft::from_record)
}
