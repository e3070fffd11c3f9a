// This module is responsible for persisting the throttle settings file.
// It loads the `ThrottleState` from JSON (typically `~/.linstall.json`),
// treats a missing file as an empty state, and saves the full state back
// with a write-to-temp-then-rename so readers never see a partial file.
//
// Key functionalities include:
// - Deserializing `ThrottleState` from JSON.
// - Serializing `ThrottleState` to pretty-printed JSON.
// - Mapping I/O and parse failures to `StoreError`.
// - Ensuring parent directories exist before writing.

use crate::errors::StoreError;
use crate::schemas::throttle_state::ThrottleState;
use crate::{log_debug, log_warn};
use colored::Colorize;
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Handle on the settings file. Holds only the path; every load reads the
/// file again so changes made by other invocations are picked up.
#[derive(Debug, Clone)]
pub struct ThrottleStore {
    path: PathBuf,
}

impl ThrottleStore {
    /// Creates a handle for the settings file at `path`. Nothing is read or
    /// created until the first `load` or `save`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads the whole settings file into memory.
    ///
    /// # Returns
    /// * `Ok(ThrottleState)` - the parsed file, or an empty state when the
    ///   file does not exist or contains only whitespace
    /// * `Err(StoreError::Read)` - the file exists but cannot be read
    /// * `Err(StoreError::Corrupt)` - the content is not a JSON object, including
    ///   content that is not valid UTF-8
    pub fn load(&self) -> Result<ThrottleState, StoreError> {
        log_debug!(
            "[Store] Loading settings from {}",
            self.path.display().to_string().cyan()
        );

        let contents = match fs::read(&self.path) {
            Ok(contents) => contents,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                log_debug!("[Store] Settings file not found, starting with an empty store.");
                return Ok(ThrottleState::new());
            }
            Err(err) => {
                return Err(StoreError::Read {
                    path: self.path.clone(),
                    source: err,
                });
            }
        };

        if contents.iter().all(u8::is_ascii_whitespace) {
            log_debug!("[Store] Settings file is empty, starting with an empty store.");
            return Ok(ThrottleState::new());
        }

        let state: ThrottleState =
            serde_json::from_slice(&contents).map_err(|err| StoreError::Corrupt {
                path: self.path.clone(),
                source: err,
            })?;
        log_debug!("[Store] Loaded {} entries.", state.len());
        Ok(state)
    }

    /// Reads the settings file, degrading to an empty state on failure.
    ///
    /// The failure is logged as a warning and handed back so the caller can
    /// surface it too. It is never mistaken for a real "never run" record.
    pub fn load_or_empty(&self) -> (ThrottleState, Option<StoreError>) {
        match self.load() {
            Ok(state) => (state, None),
            Err(err) => {
                log_warn!(
                    "[Store] {}. Treating the settings store as empty; delete or fix {} to clear this warning.",
                    err,
                    self.path.display().to_string().yellow()
                );
                (ThrottleState::new(), Some(err))
            }
        }
    }

    /// Writes the full state to disk as pretty-printed JSON.
    ///
    /// The content goes to a temporary file in the same directory first and
    /// is then renamed over the target, so a concurrent reader sees either the
    /// old file or the new one. Parent directories are created as needed.
    pub fn save(&self, state: &ThrottleState) -> Result<(), StoreError> {
        log_debug!(
            "[Store] Saving {} entries to {}",
            state.len(),
            self.path.display().to_string().cyan()
        );

        let serialized = serde_json::to_string_pretty(state).map_err(|err| StoreError::Serialize {
            path: self.path.clone(),
            source: err,
        })?;

        let write_err = |err: std::io::Error| StoreError::Write {
            path: self.path.clone(),
            source: err,
        };

        let parent = match self.path.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => dir,
            _ => Path::new("."),
        };
        fs::create_dir_all(parent).map_err(write_err)?;

        let mut tmp = NamedTempFile::new_in(parent).map_err(write_err)?;
        tmp.write_all(serialized.as_bytes()).map_err(write_err)?;
        tmp.write_all(b"\n").map_err(write_err)?;
        tmp.as_file().sync_all().map_err(write_err)?;
        tmp.persist(&self.path).map_err(|err| write_err(err.error))?;

        log_debug!("[Store] Settings written.");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use tempfile::TempDir;

    #[test]
    fn missing_file_is_empty_store() {
        let dir = TempDir::new().unwrap();
        let store = ThrottleStore::new(dir.path().join("settings.json"));
        assert!(store.load().unwrap().is_empty());
        assert!(!store.path().exists(), "load must not create the file");
    }

    #[test]
    fn whitespace_file_is_empty_store() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("settings.json");
        fs::write(&path, "  \n").unwrap();
        assert!(ThrottleStore::new(&path).load().unwrap().is_empty());
    }

    #[test]
    fn corrupt_file_is_reported() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("settings.json");
        fs::write(&path, "{not json").unwrap();
        let store = ThrottleStore::new(&path);

        assert!(matches!(store.load(), Err(StoreError::Corrupt { .. })));

        let (state, warning) = store.load_or_empty();
        assert!(state.is_empty());
        assert!(matches!(warning, Some(StoreError::Corrupt { .. })));
    }

    #[test]
    fn invalid_utf8_is_corrupt_not_unreadable() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("settings.json");
        fs::write(&path, b"{\"theme\": \"\xff\"}").unwrap();
        assert!(matches!(
            ThrottleStore::new(&path).load(),
            Err(StoreError::Corrupt { .. })
        ));
    }

    #[test]
    fn array_root_is_corrupt() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("settings.json");
        fs::write(&path, "[1, 2]").unwrap();
        assert!(matches!(
            ThrottleStore::new(&path).load(),
            Err(StoreError::Corrupt { .. })
        ));
    }

    #[test]
    fn save_creates_parent_dirs_and_leaves_no_temp_files() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("settings.json");
        let store = ThrottleStore::new(&path);

        let mut state = ThrottleState::new();
        state.set_last_run_at("k", &Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap());
        store.save(&state).unwrap();

        assert_eq!(store.load().unwrap(), state);
        let files: Vec<_> = fs::read_dir(path.parent().unwrap()).unwrap().collect();
        assert_eq!(files.len(), 1);
    }

    #[test]
    fn save_into_missing_unwritable_location_fails() {
        let dir = TempDir::new().unwrap();
        // A regular file where a directory is expected.
        let blocker = dir.path().join("blocker");
        fs::write(&blocker, "").unwrap();
        let store = ThrottleStore::new(blocker.join("settings.json"));

        let err = store.save(&ThrottleState::new()).unwrap_err();
        assert!(matches!(err, StoreError::Write { .. }));
    }
}
