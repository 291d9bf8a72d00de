//! Key-value backends the engine reads its tunables from
//!
//! Every read is best-effort: a missing key, an unparsable value or a poisoned
//! lock all resolve to the caller's default. Values are kept as strings, the
//! way a system settings table stores them, and parsed on read.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{PoisonError, RwLock};

use crate::{Error, Result};

/// Read-only view of a settings backend
pub trait SettingsStore: Send + Sync {
    fn get_float(&self, key: &str, default: f32) -> f32;

    fn get_int(&self, key: &str, default: i32) -> i32;

    fn get_string(&self, key: &str) -> Option<String>;
}

/// In-process settings table, writable at runtime
#[derive(Debug, Default)]
pub struct MemoryStore {
    values: RwLock<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn put_float(&self, key: impl Into<String>, value: f32) {
        self.put_string(key, value.to_string());
    }

    pub fn put_int(&self, key: impl Into<String>, value: i32) {
        self.put_string(key, value.to_string());
    }

    pub fn put_string(&self, key: impl Into<String>, value: impl Into<String>) {
        self.values
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.into(), value.into());
    }

    pub fn remove(&self, key: &str) -> Option<String> {
        self.values
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(key)
    }

    /// Replace the whole table at once
    pub fn replace_all(&self, values: HashMap<String, String>) {
        *self.values.write().unwrap_or_else(PoisonError::into_inner) = values;
    }

    pub fn len(&self) -> usize {
        self.values.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// All entries, sorted by key
    pub fn entries(&self) -> Vec<(String, String)> {
        let mut entries: Vec<_> = self
            .values
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();
        entries.sort();
        entries
    }

    /// Render as a flat TOML table, typing numbers where they parse
    pub fn to_toml_string(&self) -> Result<String> {
        let mut table = toml::Table::new();
        for (key, raw) in self.entries() {
            let value = if let Ok(i) = raw.parse::<i64>() {
                toml::Value::Integer(i)
            } else if let Ok(f) = raw.parse::<f64>() {
                toml::Value::Float(f)
            } else {
                toml::Value::String(raw)
            };
            table.insert(key, value);
        }
        toml::to_string(&table).map_err(|e| Error::Config(e.to_string()))
    }

    /// Write the table to `path`, creating parent directories
    pub fn save_toml(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, self.to_toml_string()?)?;
        Ok(())
    }

    fn raw(&self, key: &str) -> Option<String> {
        self.values
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .cloned()
    }
}

impl SettingsStore for MemoryStore {
    fn get_float(&self, key: &str, default: f32) -> f32 {
        match self.raw(key) {
            Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
                tracing::debug!(key, value = %raw, "Unparsable float setting, using default");
                default
            }),
            None => default,
        }
    }

    fn get_int(&self, key: &str, default: i32) -> i32 {
        match self.raw(key) {
            Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
                tracing::debug!(key, value = %raw, "Unparsable int setting, using default");
                default
            }),
            None => default,
        }
    }

    fn get_string(&self, key: &str) -> Option<String> {
        self.raw(key)
    }
}

/// Settings loaded from a flat TOML file of `key = value` pairs
///
/// ```toml
/// overscroll_stiffness = 450.0
/// overscroll_scale_mode = 1
/// overscroll_packages_config = "com.example.app:1:2.0:0"
/// ```
#[derive(Debug)]
pub struct TomlStore {
    path: PathBuf,
    inner: MemoryStore,
}

impl TomlStore {
    /// Load the file; fails only if it exists but cannot be read or parsed
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let store = Self {
            path: path.as_ref().to_path_buf(),
            inner: MemoryStore::new(),
        };
        store.reload()?;
        Ok(store)
    }

    /// Store over a file that may not exist yet; reads fall back to defaults
    pub fn load_or_empty(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref().to_path_buf();
        match Self::load(&path) {
            Ok(store) => store,
            Err(e) => {
                tracing::debug!(path = %path.display(), error = %e, "Settings file unavailable, using defaults");
                Self {
                    path,
                    inner: MemoryStore::new(),
                }
            }
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Re-read the file, replacing every value
    pub fn reload(&self) -> Result<()> {
        if !self.path.exists() {
            self.inner.replace_all(HashMap::new());
            return Ok(());
        }
        let content = std::fs::read_to_string(&self.path)?;
        let values = parse_flat_table(&content)?;
        tracing::debug!(path = %self.path.display(), keys = values.len(), "Loaded settings file");
        self.inner.replace_all(values);
        Ok(())
    }
}

impl SettingsStore for TomlStore {
    fn get_float(&self, key: &str, default: f32) -> f32 {
        self.inner.get_float(key, default)
    }

    fn get_int(&self, key: &str, default: i32) -> i32 {
        self.inner.get_int(key, default)
    }

    fn get_string(&self, key: &str) -> Option<String> {
        self.inner.get_string(key)
    }
}

fn parse_flat_table(content: &str) -> Result<HashMap<String, String>> {
    let table: toml::Table = toml::from_str(content)?;
    let mut values = HashMap::with_capacity(table.len());
    for (key, value) in table {
        let raw = match value {
            toml::Value::String(s) => s,
            toml::Value::Integer(i) => i.to_string(),
            toml::Value::Float(f) => f.to_string(),
            toml::Value::Boolean(b) => if b { "1" } else { "0" }.to_string(),
            other => {
                tracing::debug!(key = %key, kind = other.type_str(), "Skipping non-scalar setting");
                continue;
            }
        };
        values.insert(key, raw);
    }
    Ok(values)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_store_defaults() {
        let store = MemoryStore::new();
        assert_eq!(store.get_float("missing", 1.5), 1.5);
        assert_eq!(store.get_int("missing", 7), 7);
        assert_eq!(store.get_string("missing"), None);
    }

    #[test]
    fn test_memory_store_round_values() {
        let store = MemoryStore::new();
        store.put_float("f", 0.25);
        store.put_int("i", 2);
        store.put_string("s", "hello");
        assert_eq!(store.get_float("f", 0.0), 0.25);
        assert_eq!(store.get_int("i", 0), 2);
        assert_eq!(store.get_float("i", 0.0), 2.0);
        assert_eq!(store.get_string("s").as_deref(), Some("hello"));
    }

    #[test]
    fn test_memory_store_bad_values_fall_back() {
        let store = MemoryStore::new();
        store.put_string("f", "not-a-number");
        store.put_string("i", "1.5");
        assert_eq!(store.get_float("f", 3.0), 3.0);
        assert_eq!(store.get_int("i", 9), 9);
    }

    #[test]
    fn test_parse_flat_table() {
        let values = parse_flat_table(
            r#"
            overscroll_stiffness = 300.0
            overscroll_scale_mode = 2
            overscroll_invert_anchor = false
            overscroll_packages_config = "a.b:1:2.0"
            nested = { ignored = true }
            "#,
        )
        .unwrap();
        assert_eq!(values["overscroll_stiffness"], "300");
        assert_eq!(values["overscroll_scale_mode"], "2");
        assert_eq!(values["overscroll_invert_anchor"], "0");
        assert_eq!(values["overscroll_packages_config"], "a.b:1:2.0");
        assert!(!values.contains_key("nested"));
    }

    #[test]
    fn test_memory_store_saves_typed_toml() {
        let store = MemoryStore::new();
        store.put_float("overscroll_stiffness", 450.0);
        store.put_float("overscroll_damping", 0.7);
        store.put_int("overscroll_scale_mode", 1);
        store.put_string("overscroll_packages_config", "a.b:1:2.0:0");

        let path = std::env::temp_dir().join(format!(
            "overstretch-test-saved-{}.toml",
            std::process::id()
        ));
        store.save_toml(&path).unwrap();
        let loaded = TomlStore::load(&path).unwrap();
        assert_eq!(loaded.get_float("overscroll_stiffness", 0.0), 450.0);
        assert_eq!(loaded.get_float("overscroll_damping", 0.0), 0.7);
        assert_eq!(loaded.get_int("overscroll_scale_mode", 0), 1);
        assert_eq!(
            loaded.get_string("overscroll_packages_config").as_deref(),
            Some("a.b:1:2.0:0")
        );
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_toml_store_missing_file_is_empty() {
        let path = std::env::temp_dir().join("overstretch-test-missing-settings.toml");
        let _ = std::fs::remove_file(&path);
        let store = TomlStore::load(&path).unwrap();
        assert_eq!(store.get_float("overscroll_pull", 0.5), 0.5);
    }

    #[test]
    fn test_toml_store_reload() {
        let path = std::env::temp_dir().join(format!(
            "overstretch-test-settings-{}.toml",
            std::process::id()
        ));
        std::fs::write(&path, "overscroll_pull = 0.8\n").unwrap();
        let store = TomlStore::load(&path).unwrap();
        assert_eq!(store.get_float("overscroll_pull", 0.5), 0.8);

        std::fs::write(&path, "overscroll_pull = 1.2\n").unwrap();
        store.reload().unwrap();
        assert_eq!(store.get_float("overscroll_pull", 0.5), 1.2);

        std::fs::write(&path, "this is = = not toml").unwrap();
        assert!(store.reload().is_err());
        let fallback = TomlStore::load_or_empty(&path);
        assert_eq!(fallback.get_float("overscroll_pull", 0.5), 0.5);

        let _ = std::fs::remove_file(&path);
    }
}
