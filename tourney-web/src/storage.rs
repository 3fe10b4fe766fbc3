//! Browser persistence for the roster
//!
//! Implements the `tourney-core` storage seam over `window.localStorage`.

use tourney_core::{EngineConfig, RosterStorage, StatsEngine};

use crate::dom;

/// Roster storage backed by `localStorage`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WebRosterStorage;

#[derive(Debug, thiserror::Error)]
pub enum WebStorageError {
    #[error("Storage error: {0}")]
    Storage(String),
}

impl WebStorageError {
    fn from_js(context: &str, value: &wasm_bindgen::JsValue) -> Self {
        let message = format!("{context}: {}", dom::js_error_message(value));
        dom::console_error(&message);
        Self::Storage(message)
    }
}

impl RosterStorage for WebRosterStorage {
    type Error = WebStorageError;

    fn read(&self, key: &str) -> Result<Option<String>, Self::Error> {
        let storage = dom::local_storage().map_err(|e| WebStorageError::from_js("open", &e))?;
        storage
            .get_item(key)
            .map_err(|e| WebStorageError::from_js("read", &e))
    }

    fn write(&self, key: &str, value: &str) -> Result<(), Self::Error> {
        let storage = dom::local_storage().map_err(|e| WebStorageError::from_js("open", &e))?;
        storage
            .set_item(key, value)
            .map_err(|e| WebStorageError::from_js("write", &e))
    }

    fn remove(&self, key: &str) -> Result<(), Self::Error> {
        let storage = dom::local_storage().map_err(|e| WebStorageError::from_js("open", &e))?;
        storage
            .remove_item(key)
            .map_err(|e| WebStorageError::from_js("remove", &e))
    }
}

/// Create a browser engine restoring the roster from `localStorage`.
#[must_use]
pub fn create_web_engine() -> StatsEngine<WebRosterStorage> {
    StatsEngine::open(WebRosterStorage, EngineConfig::default_config())
}
