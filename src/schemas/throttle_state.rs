//! # Settings File Schema (`~/.linstall.json`)
//!
//! The settings file is a flat JSON object. Throttled actions store the UTC
//! time of their last successful run under their action key:
//!
//! ```json
//! {
//!   "apt_source_update_time": "2024-03-01 12:00:00.000000"
//! }
//! ```
//!
//! Entries this tool did not write (or cannot parse) are kept as-is when the
//! file is rewritten, so other data living in the same file survives.

use crate::errors::StoreError;
use crate::libs::utilities::timestamps::{format_settings_timestamp, parse_settings_timestamp};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::path::Path;

/// The whole settings file, held in memory.
///
/// `BTreeMap` keeps the key order stable so rewriting an unchanged store
/// produces an identical file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ThrottleState {
    entries: BTreeMap<String, Value>,
}

/// The last recorded run of one throttled action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionRecord {
    pub action_key: String,
    /// `None` when the stored value is not a valid timestamp.
    pub last_run_at: Option<DateTime<Utc>>,
}

impl ThrottleState {
    /// Returns an empty state, the equivalent of a missing settings file.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Looks up the last run of `key`.
    ///
    /// # Returns
    /// * `Ok(Some(_))` - the key holds a valid timestamp
    /// * `Ok(None)` - the key was never recorded
    /// * `Err(StoreError::InvalidTimestamp)` - the key holds something else;
    ///   `path` is only used to make the error message useful
    pub fn last_run_at(&self, key: &str, path: &Path) -> Result<Option<DateTime<Utc>>, StoreError> {
        let Some(value) = self.entries.get(key) else {
            return Ok(None);
        };
        value
            .as_str()
            .and_then(parse_settings_timestamp)
            .map(Some)
            .ok_or_else(|| StoreError::InvalidTimestamp {
                path: path.to_path_buf(),
                key: key.to_string(),
                value: value.to_string(),
            })
    }

    /// Upserts `key -> at`, replacing whatever was stored before.
    pub fn set_last_run_at(&mut self, key: &str, at: &DateTime<Utc>) {
        self.entries
            .insert(key.to_string(), Value::String(format_settings_timestamp(at)));
    }

    /// Lists every entry in key order. Values that are not timestamps come
    /// back with `last_run_at: None`.
    pub fn records(&self) -> Vec<ActionRecord> {
        self.entries
            .iter()
            .map(|(key, value)| ActionRecord {
                action_key: key.clone(),
                last_run_at: value.as_str().and_then(parse_settings_timestamp),
            })
            .collect()
    }
}
