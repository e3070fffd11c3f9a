//! # Throttled Action Cache
//!
//! Decides whether an idempotent action (refreshing a package index, say)
//! is due again, runs it through a caller-supplied closure, and records the
//! successful run in the settings file.
//!
//! Every action key is in one of two states:
//!
//! - **Due**: never recorded, or the last run is more than the queried
//!   interval in the past.
//! - **Cooling**: the last run is within the interval.
//!
//! The interval is a parameter of each query rather than part of the record,
//! so the same key can be checked against different thresholds.
//!
//! ```no_run
//! use xinstall::libs::state_management::ThrottleStore;
//! use xinstall::libs::throttle::{ActionKey, Interval, ThrottleCache};
//!
//! let cache = ThrottleCache::new(ThrottleStore::new("/tmp/settings.json"));
//! let key = ActionKey::new("apt_source_update_time").unwrap();
//! let ran = cache.run_if_due(&key, Interval::HALF_DAY, || -> Result<(), std::io::Error> {
//!     // refresh the index here
//!     Ok(())
//! });
//! ```

use crate::errors::{InvalidActionKey, RunError, StoreError};
use crate::libs::state_management::ThrottleStore;
use crate::libs::utilities::timestamps::{duration_from_seconds, elapsed_seconds};
use crate::schemas::throttle_state::ThrottleState;
use crate::{log_debug, log_info, log_warn};
use chrono::{DateTime, Utc};
use colored::Colorize;
use std::fmt;

/// Name of a throttled action, as stored in the settings file.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ActionKey(String);

impl ActionKey {
    /// Builds a key from `name`, trimming surrounding whitespace.
    /// Empty names are rejected.
    pub fn new(name: &str) -> Result<Self, InvalidActionKey> {
        let trimmed = name.trim();
        if trimmed.is_empty() {
            return Err(InvalidActionKey);
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ActionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::str::FromStr for ActionKey {
    type Err = InvalidActionKey;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

/// Minimum time between two runs of an action, in seconds.
///
/// Zero, negative and NaN values all mean "always run"; negative values are
/// how older callers forced a run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Interval(f64);

impl Interval {
    /// Twelve hours, the default spacing between package index refreshes.
    pub const HALF_DAY: Interval = Interval(43_200.0);
    pub const ALWAYS: Interval = Interval(0.0);

    pub fn from_seconds(seconds: f64) -> Self {
        Self(seconds)
    }

    pub fn seconds(&self) -> f64 {
        self.0
    }

    /// `true` if this interval never suppresses a run.
    pub fn is_always(&self) -> bool {
        // Written as a negated `>` so NaN lands here as well.
        !(self.0 > 0.0)
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_always() {
            write!(f, "always")
        } else {
            write!(f, "{}s", self.0)
        }
    }
}

/// Whether an action may run right now.
#[derive(Debug, Clone, PartialEq)]
pub enum ActionState {
    Due {
        /// The previous successful run, if one was recorded.
        last_run_at: Option<DateTime<Utc>>,
    },
    Cooling {
        last_run_at: DateTime<Utc>,
        /// First instant at which the action becomes due again. `None` when
        /// the interval is too large to represent as a date.
        due_after: Option<DateTime<Utc>>,
    },
}

impl ActionState {
    pub fn is_due(&self) -> bool {
        matches!(self, ActionState::Due { .. })
    }

    pub fn last_run_at(&self) -> Option<DateTime<Utc>> {
        match self {
            ActionState::Due { last_run_at } => *last_run_at,
            ActionState::Cooling { last_run_at, .. } => Some(*last_run_at),
        }
    }

    /// Classifies a single record against `interval` at `now`.
    ///
    /// Due when nothing was recorded, when the interval always runs, or when
    /// strictly more than `interval` seconds have elapsed. A record dated
    /// after `now` counts as Cooling.
    pub fn classify(last_run_at: Option<DateTime<Utc>>, interval: Interval, now: DateTime<Utc>) -> Self {
        let Some(last) = last_run_at else {
            return ActionState::Due { last_run_at: None };
        };
        if interval.is_always() || elapsed_seconds(&last, &now) > interval.seconds() {
            return ActionState::Due {
                last_run_at: Some(last),
            };
        }
        let due_after = duration_from_seconds(interval.seconds()).and_then(|d| last.checked_add_signed(d));
        ActionState::Cooling {
            last_run_at: last,
            due_after,
        }
    }
}

/// Result of evaluating one key: the decision plus any store problem that
/// was hit while reading.
#[derive(Debug)]
pub struct Evaluation {
    pub state: ActionState,
    /// Set when the settings file could not be used and the decision was
    /// made against an empty store instead.
    pub store_warning: Option<StoreError>,
}

impl Evaluation {
    pub fn is_due(&self) -> bool {
        self.state.is_due()
    }
}

/// The throttle cache. Owns the store handle it was given; there is no
/// process-wide state.
#[derive(Debug, Clone)]
pub struct ThrottleCache {
    store: ThrottleStore,
}

impl ThrottleCache {
    pub fn new(store: ThrottleStore) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &ThrottleStore {
        &self.store
    }

    /// Reads the store and classifies `key` at `now`. Never writes.
    ///
    /// An unreadable or corrupt store, or an unparseable value for this key,
    /// makes the key Due and is returned in `store_warning`.
    pub fn evaluate_at(&self, key: &ActionKey, interval: Interval, now: DateTime<Utc>) -> Evaluation {
        let (state, mut store_warning) = self.store.load_or_empty();

        let last_run_at = match state.last_run_at(key.as_str(), self.store.path()) {
            Ok(last) => last,
            Err(err) => {
                log_warn!("[Throttle] {}. Treating '{}' as never run.", err, key);
                store_warning.get_or_insert(err);
                None
            }
        };

        let state = ActionState::classify(last_run_at, interval, now);
        log_debug!("[Throttle] '{}' with interval {} is {:?}", key, interval, state);
        Evaluation { state, store_warning }
    }

    pub fn evaluate(&self, key: &ActionKey, interval: Interval) -> Evaluation {
        self.evaluate_at(key, interval, Utc::now())
    }

    /// `true` if the action behind `key` should run at `now`.
    pub fn should_run_at(&self, key: &ActionKey, interval: Interval, now: DateTime<Utc>) -> bool {
        self.evaluate_at(key, interval, now).is_due()
    }

    /// `true` if the action behind `key` should run now.
    pub fn should_run(&self, key: &ActionKey, interval: Interval) -> bool {
        self.should_run_at(key, interval, Utc::now())
    }

    /// Records a successful run of `key` at `at` and rewrites the whole
    /// settings file.
    ///
    /// The file is re-read first so keys written by other invocations since
    /// this process started are kept. A corrupt file is replaced by a store
    /// holding only this record. A file that exists but cannot be read is
    /// left alone and the read error is returned.
    pub fn record_run_at(&self, key: &ActionKey, at: DateTime<Utc>) -> Result<(), StoreError> {
        let mut state = match self.store.load() {
            Ok(state) => state,
            Err(err @ StoreError::Read { .. }) => return Err(err),
            Err(err) => {
                log_info!(
                    "[Throttle] Rewriting {} from scratch ({}).",
                    self.store.path().display().to_string().yellow(),
                    err
                );
                ThrottleState::new()
            }
        };
        state.set_last_run_at(key.as_str(), &at);
        self.store.save(&state)?;
        log_debug!("[Throttle] Recorded run of '{}' at {}", key, at);
        Ok(())
    }

    pub fn record_run(&self, key: &ActionKey) -> Result<(), StoreError> {
        self.record_run_at(key, Utc::now())
    }

    /// Runs `operation` if `key` is due at `now`, and records the run on
    /// success.
    ///
    /// # Returns
    /// * `Ok(true)` - the operation ran and its run was recorded
    /// * `Ok(false)` - the action is still cooling; the operation was not called
    /// * `Err(RunError::OperationFailed)` - the operation's own error; nothing recorded
    /// * `Err(RunError::StoreUnavailable)` - the operation succeeded but the
    ///   record could not be written
    pub fn run_if_due_at<F, E>(
        &self,
        key: &ActionKey,
        interval: Interval,
        now: DateTime<Utc>,
        operation: F,
    ) -> Result<bool, RunError<E>>
    where
        F: FnOnce() -> Result<(), E>,
    {
        let evaluation = self.evaluate_at(key, interval, now);
        if let ActionState::Cooling { last_run_at, due_after } = &evaluation.state {
            log_info!(
                "[Throttle] Skipping '{}': last run at {}, due again after {}.",
                key.to_string().cyan(),
                last_run_at.format("%Y-%m-%d %H:%M:%S UTC"),
                due_after
                    .map(|t| t.format("%Y-%m-%d %H:%M:%S UTC").to_string())
                    .unwrap_or_else(|| "never".to_string())
            );
            return Ok(false);
        }

        operation().map_err(RunError::OperationFailed)?;
        // The run is stamped with the evaluation time, before the operation started.
        self.record_run_at(key, now)
            .map_err(RunError::StoreUnavailable)?;
        Ok(true)
    }

    pub fn run_if_due<F, E>(&self, key: &ActionKey, interval: Interval, operation: F) -> Result<bool, RunError<E>>
    where
        F: FnOnce() -> Result<(), E>,
    {
        self.run_if_due_at(key, interval, Utc::now(), operation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};
    use tempfile::TempDir;

    fn cache_in(dir: &TempDir) -> ThrottleCache {
        ThrottleCache::new(ThrottleStore::new(dir.path().join("settings.json")))
    }

    fn key(name: &str) -> ActionKey {
        ActionKey::new(name).unwrap()
    }

    #[test]
    fn action_key_rejects_blank_names() {
        assert_eq!(ActionKey::new(""), Err(InvalidActionKey));
        assert_eq!(ActionKey::new("   "), Err(InvalidActionKey));
        assert_eq!(ActionKey::new(" apt ").unwrap().as_str(), "apt");
    }

    #[test]
    fn interval_always_covers_zero_negative_and_nan() {
        assert!(Interval::ALWAYS.is_always());
        assert!(Interval::from_seconds(-1.0).is_always());
        assert!(Interval::from_seconds(f64::NAN).is_always());
        assert!(!Interval::HALF_DAY.is_always());
    }

    #[test]
    fn classify_boundary_is_exclusive() {
        let t = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let interval = Interval::from_seconds(60.0);

        let at_boundary = ActionState::classify(Some(t), interval, t + Duration::seconds(60));
        assert!(!at_boundary.is_due());
        assert_eq!(
            at_boundary,
            ActionState::Cooling {
                last_run_at: t,
                due_after: Some(t + Duration::seconds(60)),
            }
        );

        let past = ActionState::classify(Some(t), interval, t + Duration::microseconds(60_000_001));
        assert!(past.is_due());
        assert_eq!(past.last_run_at(), Some(t));
    }

    #[test]
    fn classify_future_record_is_cooling() {
        let t = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let state = ActionState::classify(Some(t + Duration::hours(1)), Interval::from_seconds(1.0), t);
        assert!(!state.is_due());
    }

    #[test]
    fn classify_huge_interval_has_no_due_date() {
        let t = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let state = ActionState::classify(Some(t), Interval::from_seconds(f64::INFINITY), t);
        assert!(matches!(state, ActionState::Cooling { due_after: None, .. }));
    }

    #[test]
    fn should_run_does_not_touch_the_store() {
        let dir = TempDir::new().unwrap();
        let cache = cache_in(&dir);
        assert!(cache.should_run(&key("k"), Interval::HALF_DAY));
        assert!(!cache.store().path().exists());
    }

    #[test]
    fn should_run_leaves_corrupt_store_untouched() {
        let dir = TempDir::new().unwrap();
        let cache = cache_in(&dir);
        let garbage = b"{\"k\": \"2024-01-01 00:00";
        std::fs::write(cache.store().path(), garbage).unwrap();

        assert!(cache.should_run(&key("k"), Interval::HALF_DAY));
        assert_eq!(std::fs::read(cache.store().path()).unwrap(), garbage);
    }

    #[cfg(unix)]
    #[test]
    fn unreadable_store_is_not_overwritten_on_record() {
        let dir = TempDir::new().unwrap();
        // A directory where the settings file should be reads as an I/O error.
        let path = dir.path().join("settings.json");
        std::fs::create_dir(&path).unwrap();
        std::fs::write(path.join("keep"), "foreign").unwrap();
        let cache = ThrottleCache::new(ThrottleStore::new(&path));

        let t = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let err = cache.record_run_at(&key("k"), t).unwrap_err();
        assert!(matches!(err, StoreError::Read { .. }));
        assert_eq!(std::fs::read_to_string(path.join("keep")).unwrap(), "foreign");

        let mut ran = false;
        let result = cache.run_if_due_at(&key("k"), Interval::HALF_DAY, t, || {
            ran = true;
            Ok::<(), std::io::Error>(())
        });
        assert!(ran);
        assert!(matches!(
            result,
            Err(RunError::StoreUnavailable(StoreError::Read { .. }))
        ));
    }

    #[test]
    fn bad_value_for_key_is_due_with_warning() {
        let dir = TempDir::new().unwrap();
        let cache = cache_in(&dir);
        std::fs::write(cache.store().path(), r#"{"k": "not a time"}"#).unwrap();

        let evaluation = cache.evaluate(&key("k"), Interval::HALF_DAY);
        assert!(evaluation.is_due());
        assert!(matches!(
            evaluation.store_warning,
            Some(StoreError::InvalidTimestamp { .. })
        ));
    }

    #[test]
    fn record_overwrites_bad_value() {
        let dir = TempDir::new().unwrap();
        let cache = cache_in(&dir);
        std::fs::write(cache.store().path(), r#"{"k": 7, "other": "kept"}"#).unwrap();

        let t = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        cache.record_run_at(&key("k"), t).unwrap();

        let evaluation = cache.evaluate_at(&key("k"), Interval::HALF_DAY, t + Duration::hours(1));
        assert!(!evaluation.is_due());
        assert!(evaluation.store_warning.is_none());
        let raw = std::fs::read_to_string(cache.store().path()).unwrap();
        assert!(raw.contains("\"other\": \"kept\""));
    }

    #[test]
    fn run_error_reports_whether_operation_ran() {
        let op_failed: RunError<std::io::Error> =
            RunError::OperationFailed(std::io::Error::other("boom"));
        assert!(!op_failed.operation_ran());
        assert_eq!(op_failed.to_string(), "boom");
    }
}
