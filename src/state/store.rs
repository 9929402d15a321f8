//! Key-value stores
//!
//! The character lives under one well-known key in a store that survives
//! restarts but is local to one machine. [`FileStore`] keeps one JSON file per
//! key; [`MemoryStore`] backs tests and can simulate a full or missing store.

use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use log::debug;
use walkdir::WalkDir;

use crate::error::{Result, SheetError};

/// Extension for entry files.
const ENTRY_EXTENSION: &str = ".json";

/// Suffix for the scratch file an entry is written to before it is renamed.
const PARTIAL_SUFFIX: &str = ".partial";

/// String-keyed, string-valued durable storage.
///
/// `set` is all-or-nothing: on error the previous value is left untouched.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&mut self, key: &str, value: &str) -> Result<()>;
    fn remove(&mut self, key: &str) -> Result<()>;
}

/// In-memory store with an optional byte quota.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
    quota_bytes: Option<usize>,
    unavailable: bool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reject writes that would push keys plus values past `quota_bytes`.
    pub fn with_quota(quota_bytes: usize) -> Self {
        Self {
            quota_bytes: Some(quota_bytes),
            ..Self::default()
        }
    }

    /// Make every operation fail, as a disabled browser store would.
    pub fn set_unavailable(&mut self, unavailable: bool) {
        self.unavailable = unavailable;
    }

    /// Bytes used by all keys and values.
    pub fn usage_bytes(&self) -> usize {
        self.entries.iter().map(|(k, v)| k.len() + v.len()).sum()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn check_available(&self) -> Result<()> {
        if self.unavailable {
            Err(SheetError::StoreUnavailable {
                reason: "storage is disabled".to_string(),
            })
        } else {
            Ok(())
        }
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        self.check_available()?;
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.check_available()?;

        if let Some(quota) = self.quota_bytes {
            let replaced = self.entries.get(key).map_or(0, |old| key.len() + old.len());
            let needed = self.usage_bytes() - replaced + key.len() + value.len();
            if needed > quota {
                return Err(SheetError::QuotaExceeded {
                    key: key.to_string(),
                    needed_bytes: needed,
                    quota_bytes: quota,
                });
            }
        }

        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        self.check_available()?;
        self.entries.remove(key);
        Ok(())
    }
}

/// Directory-backed store: each key is a `<key>.json` file.
#[derive(Debug, Clone)]
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    /// Open a store rooted at `root`, creating the directory if needed.
    pub fn open(root: &Path) -> Result<Self> {
        if !root.exists() {
            fs::create_dir_all(root).map_err(|e| SheetError::DirectoryCreateError {
                path: root.to_path_buf(),
                source: e,
            })?;
        }
        Ok(Self {
            root: root.to_path_buf(),
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path of the file holding `key`.
    pub fn entry_path(&self, key: &str) -> Result<PathBuf> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
        if !valid {
            return Err(SheetError::StoreUnavailable {
                reason: format!("'{}' is not a valid store key", key),
            });
        }
        Ok(self.root.join(format!("{}{}", key, ENTRY_EXTENSION)))
    }

    /// All keys currently stored, sorted.
    pub fn keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = WalkDir::new(&self.root)
            .max_depth(1)
            .into_iter()
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.file_type().is_file())
            .filter_map(|entry| {
                entry
                    .file_name()
                    .to_string_lossy()
                    .strip_suffix(ENTRY_EXTENSION)
                    .map(str::to_string)
            })
            .collect();
        keys.sort();
        keys
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let path = self.entry_path(key)?;
        if !path.exists() {
            return Ok(None);
        }

        match fs::read_to_string(&path) {
            Ok(content) => Ok(Some(content)),
            // Bytes that are not UTF-8 cannot be a JSON entry.
            Err(e) if e.kind() == ErrorKind::InvalidData => Err(SheetError::UnreadableEntry {
                key: key.to_string(),
                source: e,
            }),
            Err(e) => Err(SheetError::FileReadError { path, source: e }),
        }
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let path = self.entry_path(key)?;
        let partial = path.with_file_name(format!("{}{}{}", key, ENTRY_EXTENSION, PARTIAL_SUFFIX));

        // Write beside the entry, then rename over it in one step.
        fs::write(&partial, value).map_err(|e| SheetError::FileWriteError {
            path: partial.clone(),
            source: e,
        })?;

        if let Err(e) = fs::rename(&partial, &path) {
            let _ = fs::remove_file(&partial);
            return Err(SheetError::FileWriteError { path, source: e });
        }

        debug!("Stored {} bytes under '{}'", value.len(), key);
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        let path = self.entry_path(key)?;
        if path.exists() {
            fs::remove_file(&path).map_err(|e| SheetError::FileWriteError {
                path: path.clone(),
                source: e,
            })?;
        }
        Ok(())
    }
}
