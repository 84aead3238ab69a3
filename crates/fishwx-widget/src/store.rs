//! Shared key-value store written by the main application.
//!
//! The widget layer only ever reads. Values are strings; a missing key is a
//! normal state, not an error.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use fishwx_core::StoreError;
use parking_lot::{Mutex, RwLock};

/// Read side of the cross-process snapshot store.
pub trait SharedStore: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;

    fn get_or(&self, key: &str, default: &str) -> String {
        self.get(key).unwrap_or_else(|| default.to_string())
    }
}

/// In-process store, used by tests and by hosts that push values directly.
#[derive(Debug, Default)]
pub struct MemoryStore {
    values: RwLock<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_values<I, K, V>(values: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let values = values
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        Self {
            values: RwLock::new(values),
        }
    }

    /// Replace the whole snapshot at once, the way the main application does.
    pub fn replace_all(&self, values: HashMap<String, String>) {
        *self.values.write() = values;
    }

    pub fn set(&self, key: impl Into<String>, value: impl Into<String>) {
        self.values.write().insert(key.into(), value.into());
    }

    pub fn clear(&self) {
        self.values.write().clear();
    }
}

impl SharedStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.read().get(key).cloned()
    }
}

#[derive(Debug, Default)]
struct FileState {
    modified: Option<SystemTime>,
    values: HashMap<String, String>,
}

/// Flat JSON object on disk, e.g. `{"temperature": "21°C", "score": "9"}`.
///
/// The file is re-read only when its modification time changes. A missing,
/// unreadable or malformed file reads as empty.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    state: Mutex<FileState>,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            state: Mutex::new(FileState::default()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Parse the file. Non-string scalar values are kept in their JSON text form.
    pub fn load(path: &Path) -> Result<HashMap<String, String>, StoreError> {
        let contents = std::fs::read_to_string(path)?;
        let value: serde_json::Value = serde_json::from_str(&contents)
            .map_err(|e| StoreError::Malformed(e.to_string()))?;

        let object = value
            .as_object()
            .ok_or_else(|| StoreError::Malformed("top level is not an object".to_string()))?;

        let values = object
            .iter()
            .filter_map(|(key, value)| {
                let text = match value {
                    serde_json::Value::String(s) => s.clone(),
                    serde_json::Value::Number(n) => n.to_string(),
                    serde_json::Value::Bool(b) => b.to_string(),
                    _ => return None,
                };
                Some((key.clone(), text))
            })
            .collect();

        Ok(values)
    }

    fn refresh(&self, state: &mut FileState) {
        let modified = match std::fs::metadata(&self.path).and_then(|m| m.modified()) {
            Ok(modified) => modified,
            Err(e) => {
                if state.modified.is_some() || !state.values.is_empty() {
                    tracing::debug!("Snapshot file unavailable ({}), reading as empty", e);
                }
                *state = FileState::default();
                return;
            }
        };

        if state.modified == Some(modified) {
            return;
        }

        match Self::load(&self.path) {
            Ok(values) => {
                tracing::debug!("Loaded {} snapshot keys from {}", values.len(), self.path.display());
                state.values = values;
            }
            Err(e) => {
                tracing::warn!("Ignoring snapshot file {}: {}", self.path.display(), e);
                state.values.clear();
            }
        }
        state.modified = Some(modified);
    }
}

impl SharedStore for JsonFileStore {
    fn get(&self, key: &str) -> Option<String> {
        let mut state = self.state.lock();
        self.refresh(&mut state);
        state.values.get(key).cloned()
    }
}
