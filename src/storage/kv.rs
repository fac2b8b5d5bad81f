use anyhow::{Context, Result, anyhow};
use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;
use std::sync::Mutex;

/// String key-value persistence used by the registry
pub trait KeyValueStore: Send + Sync {
    /// Load the value stored under `key`, `None` if absent
    fn load(&self, key: &str) -> Result<Option<String>>;

    /// Store `value` under `key`, replacing any previous value
    fn save(&self, key: &str, value: &str) -> Result<()>;
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for &S {
    fn load(&self, key: &str) -> Result<Option<String>> {
        (**self).load(key)
    }

    fn save(&self, key: &str, value: &str) -> Result<()> {
        (**self).save(key, value)
    }
}

/// File-backed store: one `<key>.json` file per key inside a directory
/// Uses atomic write pattern with .tmp file for safety
pub struct FileKeyValueStore {
    dir: PathBuf,
}

impl FileKeyValueStore {
    pub fn new(dir: PathBuf) -> Self {
        FileKeyValueStore { dir }
    }

    /// Path of the file backing `key`
    pub fn path_for(&self, key: &str) -> Result<PathBuf> {
        if !is_valid_key(key) {
            return Err(anyhow!(
                "Invalid storage key '{}': use letters, digits, '.', '-' or '_'",
                key
            ));
        }
        Ok(self.dir.join(format!("{}.json", key)))
    }
}

impl KeyValueStore for FileKeyValueStore {
    fn load(&self, key: &str) -> Result<Option<String>> {
        let path = self.path_for(key)?;

        if !path.exists() {
            log::debug!("No stored value for '{}' at {:?}", key, path);
            return Ok(None);
        }

        let value = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read '{}' from {:?}", key, path))?;

        log::debug!("Loaded {} bytes for '{}' from {:?}", value.len(), key, path);
        Ok(Some(value))
    }

    fn save(&self, key: &str, value: &str) -> Result<()> {
        let path = self.path_for(key)?;
        let tmp_path = path.with_extension("json.tmp");

        fs::create_dir_all(&self.dir)
            .with_context(|| format!("Failed to create directory {:?}", self.dir))?;

        fs::write(&tmp_path, value)
            .with_context(|| format!("Failed to write to temporary file {:?}", tmp_path))?;

        fs::rename(&tmp_path, &path)
            .with_context(|| format!("Failed to rename {:?} to {:?}", tmp_path, path))?;

        log::debug!("Saved {} bytes for '{}' to {:?}", value.len(), key, path);
        Ok(())
    }
}

/// In-memory store, for tests and embedding
#[derive(Debug, Default)]
pub struct MemoryKeyValueStore {
    values: Mutex<HashMap<String, String>>,
}

impl MemoryKeyValueStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-populate a key
    pub fn with_value(key: &str, value: &str) -> Self {
        let store = Self::new();
        if let Ok(mut values) = store.values.lock() {
            values.insert(key.to_string(), value.to_string());
        }
        store
    }

    /// Keys currently holding a value, sorted
    pub fn keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self
            .values
            .lock()
            .map(|values| values.keys().cloned().collect())
            .unwrap_or_default();
        keys.sort();
        keys
    }
}

impl KeyValueStore for MemoryKeyValueStore {
    fn load(&self, key: &str) -> Result<Option<String>> {
        let values = self
            .values
            .lock()
            .map_err(|_| anyhow!("memory store lock poisoned"))?;
        Ok(values.get(key).cloned())
    }

    fn save(&self, key: &str, value: &str) -> Result<()> {
        let mut values = self
            .values
            .lock()
            .map_err(|_| anyhow!("memory store lock poisoned"))?;
        values.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Keys map to file names, so keep them to a safe character set
pub fn is_valid_key(key: &str) -> bool {
    !key.is_empty()
        && !key.starts_with('.')
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_'))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_keys() {
        assert!(is_valid_key("turnos"));
        assert!(is_valid_key("turnos.corrupted"));
        assert!(is_valid_key("clinic-a_2"));
        assert!(!is_valid_key(""));
        assert!(!is_valid_key("../etc"));
        assert!(!is_valid_key(".hidden"));
        assert!(!is_valid_key("a/b"));
    }

    #[test]
    fn test_memory_store() {
        let store = MemoryKeyValueStore::new();
        assert_eq!(store.load("turnos").unwrap(), None);

        store.save("turnos", "[]").unwrap();
        assert_eq!(store.load("turnos").unwrap().as_deref(), Some("[]"));

        store.save("turnos", "[1]").unwrap();
        assert_eq!(store.load("turnos").unwrap().as_deref(), Some("[1]"));

        store.save("other", "x").unwrap();
        assert_eq!(store.keys(), vec!["other".to_string(), "turnos".to_string()]);
    }

    #[test]
    fn test_file_store_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileKeyValueStore::new(dir.path().join("data"));

        assert_eq!(store.load("turnos").unwrap(), None);

        store.save("turnos", "[]").unwrap();
        assert_eq!(store.load("turnos").unwrap().as_deref(), Some("[]"));
        assert!(dir.path().join("data/turnos.json").exists());
        assert!(!dir.path().join("data/turnos.json.tmp").exists());
    }

    #[test]
    fn test_file_store_rejects_bad_key() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileKeyValueStore::new(dir.path().to_path_buf());

        assert!(store.save("../escape", "x").is_err());
        assert!(store.load("a/b").is_err());
    }
}
