use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Result;
use log::{debug, info};

// Persistence limits
const MAX_FILE_SIZE: u64 = 50 * 1024 * 1024; // 50 MB max for the store file
const STORE_FILE_NAME: &str = "store.json";

/// String-keyed text storage. Values are opaque serialized text.
pub trait KvStore {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&mut self, key: &str, value: &str) -> Result<()>;
}

impl<T: KvStore + ?Sized> KvStore for Box<T> {
    fn get(&self, key: &str) -> Result<Option<String>> {
        (**self).get(key)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        (**self).set(key, value)
    }
}

/// Volatile store used by tests and when no data directory is usable.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl KvStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// All entries live in one JSON object file, rewritten on every `set`.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    entries: BTreeMap<String, String>,
}

impl FileStore {
    /// Opens (or creates) `store.json` inside `dir`.
    pub fn open(dir: &Path) -> Result<Self> {
        fs::create_dir_all(dir)?;
        let path = dir.join(STORE_FILE_NAME);

        let entries = if path.exists() {
            // Security: Check file size before reading
            let metadata = fs::metadata(&path)?;
            if metadata.len() > MAX_FILE_SIZE {
                return Err(anyhow::anyhow!(
                    "Store file exceeds maximum size limit - possible corruption"
                ));
            }
            let text = fs::read_to_string(&path)?;
            if text.trim().is_empty() {
                BTreeMap::new()
            } else {
                serde_json::from_str(&text).map_err(|e| {
                    anyhow::anyhow!("Failed to read store file (file may be corrupted): {}", e)
                })?
            }
        } else {
            BTreeMap::new()
        };

        info!(
            "event=store_open module=store status=ok entries={} path={}",
            entries.len(),
            path.display()
        );
        Ok(Self { path, entries })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn flush(&self) -> Result<()> {
        let serialized = serde_json::to_vec_pretty(&self.entries)?;

        if serialized.len() > MAX_FILE_SIZE as usize {
            return Err(anyhow::anyhow!("Serialized store exceeds maximum size limit"));
        }

        // Write to temporary file first, then atomic rename
        let temp_path = self.path.with_extension("json.tmp");
        fs::write(&temp_path, serialized)?;
        fs::rename(temp_path, &self.path)?;
        Ok(())
    }
}

impl KvStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let previous = self.entries.insert(key.to_string(), value.to_string());
        if let Err(err) = self.flush() {
            // Keep memory and disk in step when the write fails.
            match previous {
                Some(old) => self.entries.insert(key.to_string(), old),
                None => self.entries.remove(key),
            };
            return Err(err);
        }
        debug!("event=store_set module=store status=ok key={key}");
        Ok(())
    }
}
