//! Durable key/value storage for client-side state.
//!
//! The session only ever needs three operations on its backing store, so that is all
//! [`TokenStorage`] exposes. [`MemoryStorage`] backs tests; [`FileStorage`] is the
//! terminal app's equivalent of browser local storage.

use eyre::Context;
use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

/// A synchronous string key/value store.
pub trait TokenStorage {
    /// Returns the value stored under `key`, if any.
    fn get(&self, key: &str) -> eyre::Result<Option<String>>;

    /// Stores `value` under `key`, replacing any previous value.
    fn set(&mut self, key: &str, value: &str) -> eyre::Result<()>;

    /// Removes `key`. Removing a missing key is not an error.
    fn remove(&mut self, key: &str) -> eyre::Result<()>;
}

/// In-process storage that forgets everything when dropped.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    values: HashMap<String, String>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl TokenStorage for MemoryStorage {
    fn get(&self, key: &str) -> eyre::Result<Option<String>> {
        Ok(self.values.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> eyre::Result<()> {
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> eyre::Result<()> {
        self.values.remove(key);
        Ok(())
    }
}

/// Storage persisted as a flat JSON object in a single file.
///
/// Every write goes through a temporary sibling file followed by a rename, so a crash
/// mid-write leaves either the old or the new contents on disk.
#[derive(Debug, Clone)]
pub struct FileStorage {
    path: PathBuf,
}

impl FileStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The file's contents, or `None` when it is missing or blank.
    fn read(&self) -> eyre::Result<Option<String>> {
        match fs::read_to_string(&self.path) {
            Ok(raw) if raw.trim().is_empty() => Ok(None),
            Ok(raw) => Ok(Some(raw)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e).with_context(|| format!("read {}", self.path.display())),
        }
    }

    fn load(&self) -> eyre::Result<BTreeMap<String, String>> {
        let Some(raw) = self.read()? else {
            return Ok(BTreeMap::new());
        };
        serde_json::from_str(&raw).with_context(|| format!("parse {}", self.path.display()))
    }

    /// Like [`Self::load`], but a file that does not parse is treated as empty so the
    /// next save replaces it. The flag reports whether that happened.
    fn load_for_write(&self) -> eyre::Result<(BTreeMap<String, String>, bool)> {
        let Some(raw) = self.read()? else {
            return Ok((BTreeMap::new(), false));
        };
        match serde_json::from_str(&raw) {
            Ok(values) => Ok((values, false)),
            Err(e) => {
                tracing::warn!(
                    path = %self.path.display(),
                    "discarding unreadable storage file: {e}"
                );
                Ok((BTreeMap::new(), true))
            }
        }
    }

    fn save(&self, values: &BTreeMap<String, String>) -> eyre::Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("create storage directory {}", parent.display()))?;
        }

        let json = serde_json::to_string_pretty(values).context("serialize storage")?;
        let tmp = self.path.with_extension("json.tmp");
        {
            let mut file =
                fs::File::create(&tmp).with_context(|| format!("create {}", tmp.display()))?;
            file.write_all(json.as_bytes())
                .with_context(|| format!("write {}", tmp.display()))?;
            file.sync_all()
                .with_context(|| format!("sync {}", tmp.display()))?;
        }
        fs::rename(&tmp, &self.path)
            .with_context(|| format!("move {} into place", self.path.display()))
    }
}

impl TokenStorage for FileStorage {
    fn get(&self, key: &str) -> eyre::Result<Option<String>> {
        Ok(self.load()?.remove(key))
    }

    fn set(&mut self, key: &str, value: &str) -> eyre::Result<()> {
        let (mut values, _) = self.load_for_write()?;
        values.insert(key.to_string(), value.to_string());
        self.save(&values)
    }

    fn remove(&mut self, key: &str) -> eyre::Result<()> {
        let (mut values, discarded) = self.load_for_write()?;
        if values.remove(key).is_none() && !discarded {
            return Ok(());
        }
        self.save(&values)
    }
}
