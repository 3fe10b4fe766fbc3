//! Roster persistence.
//!
//! Platforms provide a [`RosterStorage`] key-value backend; [`RosterStore`] layers the
//! never-fail semantics on top: unreadable data loads as an empty roster and write
//! failures are logged rather than surfaced.

use std::cell::RefCell;
use std::collections::HashMap;
use std::collections::HashSet;
use std::convert::Infallible;
use std::rc::Rc;

use crate::player::{Identity, PlayerRecord};

/// Trait for abstracting the key-value store the roster lives in.
/// Platform-specific implementations should provide this
pub trait RosterStorage {
    type Error: std::error::Error + 'static;

    /// Read the raw value stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing store cannot be read.
    fn read(&self, key: &str) -> Result<Option<String>, Self::Error>;

    /// Overwrite the value stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing store rejects the write.
    fn write(&self, key: &str, value: &str) -> Result<(), Self::Error>;

    /// Delete the value stored under `key`. Deleting a missing key succeeds.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing store rejects the removal.
    fn remove(&self, key: &str) -> Result<(), Self::Error>;
}

/// Serialize a roster to its stored JSON form.
///
/// # Errors
///
/// Returns an error if serialization fails.
pub fn encode_roster(roster: &[PlayerRecord]) -> Result<String, serde_json::Error> {
    serde_json::to_string(roster)
}

/// Parse a stored roster, keeping the first record for any repeated identity.
///
/// # Errors
///
/// Returns an error if `raw` is not a JSON array of records.
pub fn decode_roster(raw: &str) -> Result<Vec<PlayerRecord>, serde_json::Error> {
    let records: Vec<PlayerRecord> = serde_json::from_str(raw)?;
    let mut seen: HashSet<Identity> = HashSet::with_capacity(records.len());
    let total = records.len();
    let unique: Vec<PlayerRecord> = records
        .into_iter()
        .filter(|record| seen.insert(record.identity()))
        .collect();
    if unique.len() != total {
        log::warn!(
            "dropped {} duplicate roster entries while loading",
            total - unique.len()
        );
    }
    Ok(unique)
}

/// Roster persistence under a fixed key, tolerant of every storage failure.
#[derive(Debug, Clone)]
pub struct RosterStore<S> {
    storage: S,
    key: String,
}

impl<S: RosterStorage> RosterStore<S> {
    pub fn new(storage: S, key: impl Into<String>) -> Self {
        Self {
            storage,
            key: key.into(),
        }
    }

    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    #[must_use]
    pub const fn storage(&self) -> &S {
        &self.storage
    }

    /// Load the persisted roster; missing, unreadable or corrupt data yields an empty roster.
    #[must_use]
    pub fn load(&self) -> Vec<PlayerRecord> {
        match self.storage.read(&self.key) {
            Ok(None) => Vec::new(),
            Ok(Some(raw)) => decode_roster(&raw).unwrap_or_else(|err| {
                log::warn!("stored roster under {:?} is corrupt, starting empty: {err}", self.key);
                Vec::new()
            }),
            Err(err) => {
                log::warn!("could not read roster under {:?}: {err}", self.key);
                Vec::new()
            }
        }
    }

    /// Overwrite the persisted roster. Failures are logged and otherwise ignored.
    pub fn save(&self, roster: &[PlayerRecord]) {
        let encoded = match encode_roster(roster) {
            Ok(encoded) => encoded,
            Err(err) => {
                log::warn!("could not encode roster: {err}");
                return;
            }
        };
        if let Err(err) = self.storage.write(&self.key, &encoded) {
            log::warn!("could not persist roster under {:?}: {err}", self.key);
        }
    }

    /// Erase the persisted roster. Failures are logged and otherwise ignored.
    pub fn clear(&self) {
        if let Err(err) = self.storage.remove(&self.key) {
            log::warn!("could not clear roster under {:?}: {err}", self.key);
        }
    }
}

/// In-process storage; clones share the same map.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    values: Rc<RefCell<HashMap<String, String>>>,
}

impl MemoryStorage {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Raw stored value, for inspection.
    #[must_use]
    pub fn raw(&self, key: &str) -> Option<String> {
        self.values.borrow().get(key).cloned()
    }

    /// Place an arbitrary value under `key`, bypassing the roster codec.
    pub fn insert_raw(&self, key: &str, value: &str) {
        self.values
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
    }
}

impl RosterStorage for MemoryStorage {
    type Error = Infallible;

    fn read(&self, key: &str) -> Result<Option<String>, Self::Error> {
        Ok(self.raw(key))
    }

    fn write(&self, key: &str, value: &str) -> Result<(), Self::Error> {
        self.insert_raw(key, value);
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), Self::Error> {
        self.values.borrow_mut().remove(key);
        Ok(())
    }
}
