//! Tourney Stats Engine
//!
//! Platform-agnostic player statistics aggregation for the ABC tourney assistant.
//! This crate owns the roster, validation, merge rules, ordering and persistence
//! without UI or platform-specific dependencies.

pub mod aggregate;
pub mod config;
pub mod edit;
pub mod error;
pub mod merge;
pub mod numbers;
pub mod player;
pub mod sort;
pub mod storage;
pub mod submission;

// Re-export commonly used types
pub use aggregate::{SubmissionTotals, average, parse_entry, sum};
pub use config::{DEFAULT_STORAGE_KEY, EngineConfig};
pub use edit::{EditDraft, begin_edit, begin_edit_at};
pub use error::{ConfigError, StatField, ValidationError};
pub use merge::MergePolicy;
pub use player::{Identity, PlayerRecord};
pub use sort::{SortKey, UnknownSortKey, sort_in_place, sort_roster};
pub use storage::{MemoryStorage, RosterStorage, RosterStore, decode_roster, encode_roster};
pub use submission::{EntryValue, ParsePolicy, Submission, validate};

/// Statistics engine owning the canonical roster.
///
/// Every mutating operation re-persists the full roster before returning.
pub struct StatsEngine<S>
where
    S: RosterStorage,
{
    store: RosterStore<S>,
    config: EngineConfig,
    roster: Vec<PlayerRecord>,
    sort_key: SortKey,
    editing: Option<Identity>,
}

impl<S> StatsEngine<S>
where
    S: RosterStorage,
{
    /// Open an engine over `storage`, restoring whatever roster it holds.
    pub fn open(storage: S, config: EngineConfig) -> Self {
        let store = RosterStore::new(storage, config.storage_key.clone());
        let roster = store.load();
        log::debug!(
            "restored {} roster entries from {:?}",
            roster.len(),
            store.key()
        );
        Self {
            store,
            sort_key: config.default_sort,
            config,
            roster,
            editing: None,
        }
    }

    /// Validate, aggregate and merge one submission.
    ///
    /// A submission whose identity matches an existing record merges into it; otherwise it
    /// is appended. Any active edit marker is cleared on success.
    ///
    /// # Errors
    ///
    /// Returns the validation failure; the roster is left untouched.
    pub fn submit(&mut self, submission: &Submission) -> Result<&[PlayerRecord], ValidationError> {
        validate(submission, self.config.parse_policy)?;
        let totals = SubmissionTotals::checked(submission)?;
        let identity = submission.identity();

        if let Some(existing) = self.roster.iter_mut().find(|r| r.matches(&identity)) {
            *existing = self.config.merge_policy.merge(existing, submission, &totals)?;
            log::debug!(
                "merged {} events into {identity} ({} total)",
                submission.events,
                existing.events
            );
        } else {
            self.roster
                .push(PlayerRecord::from_submission(submission, &totals));
            log::debug!("added {identity} with {} events", submission.events);
        }

        self.editing = None;
        self.persist();
        Ok(&self.roster)
    }

    /// Re-order the roster by `key` (descending, stable) and remember the key.
    pub fn sort_by(&mut self, key: SortKey) -> &[PlayerRecord] {
        self.sort_key = key;
        sort_in_place(&mut self.roster, key);
        self.persist();
        &self.roster
    }

    /// Start editing the record for `identity`.
    pub fn begin_edit(&mut self, identity: &Identity) -> Option<EditDraft> {
        let draft = begin_edit(&self.roster, identity)?;
        self.editing = Some(draft.identity.clone());
        Some(draft)
    }

    /// Start editing the row at `index` of the current ordering.
    pub fn begin_edit_at(&mut self, index: usize) -> Option<EditDraft> {
        let draft = begin_edit_at(&self.roster, index)?;
        self.editing = Some(draft.identity.clone());
        Some(draft)
    }

    pub fn cancel_edit(&mut self) {
        self.editing = None;
    }

    /// Identity currently being edited, if any.
    #[must_use]
    pub const fn editing(&self) -> Option<&Identity> {
        self.editing.as_ref()
    }

    /// Empty the roster and erase persisted state.
    pub fn clear(&mut self) {
        self.roster.clear();
        self.editing = None;
        self.store.clear();
        log::debug!("cleared roster under {:?}", self.store.key());
    }

    #[must_use]
    pub fn roster(&self) -> &[PlayerRecord] {
        &self.roster
    }

    #[must_use]
    pub const fn sort_key(&self) -> SortKey {
        self.sort_key
    }

    #[must_use]
    pub fn find(&self, identity: &Identity) -> Option<&PlayerRecord> {
        self.roster.iter().find(|r| r.matches(identity))
    }

    #[must_use]
    pub const fn config(&self) -> &EngineConfig {
        &self.config
    }

    #[must_use]
    pub const fn store(&self) -> &RosterStore<S> {
        &self.store
    }

    fn persist(&self) {
        self.store.save(&self.roster);
    }
}
