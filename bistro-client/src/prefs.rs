// bistro-client/src/prefs.rs
// 本地偏好存储 - 记住上次使用的桌号

use parking_lot::Mutex;
use std::collections::BTreeMap;
use std::fmt::Debug;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Key of the remembered table number
pub const LAST_TABLE_KEY: &str = "lastTableNumber";

/// Durable device-local key/value store
pub trait Preferences: Send + Sync + Debug {
    fn get(&self, key: &str) -> io::Result<Option<String>>;
    fn set(&self, key: &str, value: &str) -> io::Result<()>;
}

/// JSON file preferences
#[derive(Debug)]
pub struct FilePreferences {
    path: PathBuf,
    lock: Mutex<()>,
}

impl FilePreferences {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> io::Result<BTreeMap<String, String>> {
        if !self.path.exists() {
            return Ok(BTreeMap::new());
        }
        let json = fs::read_to_string(&self.path)?;
        serde_json::from_str(&json).map_err(io::Error::from)
    }
}

impl Preferences for FilePreferences {
    fn get(&self, key: &str) -> io::Result<Option<String>> {
        let _guard = self.lock.lock();
        Ok(self.load()?.remove(key))
    }

    fn set(&self, key: &str, value: &str) -> io::Result<()> {
        let _guard = self.lock.lock();
        // 文件损坏时从空表重建
        let mut map = self.load().unwrap_or_default();
        map.insert(key.to_string(), value.to_string());
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(&map)?;
        fs::write(&self.path, json)
    }
}

/// In-memory preferences
#[derive(Debug, Default)]
pub struct MemoryPreferences {
    values: Mutex<BTreeMap<String, String>>,
    unavailable: bool,
}

impl MemoryPreferences {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every read and write fails (storage disabled)
    pub fn unavailable() -> Self {
        Self {
            values: Mutex::new(BTreeMap::new()),
            unavailable: true,
        }
    }

    fn check(&self) -> io::Result<()> {
        if self.unavailable {
            return Err(io::Error::new(
                io::ErrorKind::PermissionDenied,
                "preference storage unavailable",
            ));
        }
        Ok(())
    }
}

impl Preferences for MemoryPreferences {
    fn get(&self, key: &str) -> io::Result<Option<String>> {
        self.check()?;
        Ok(self.values.lock().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> io::Result<()> {
        self.check()?;
        self.values.lock().insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Remembered table number; absence or failure yields `None`
pub fn last_table_number(prefs: &dyn Preferences) -> Option<u32> {
    match prefs.get(LAST_TABLE_KEY) {
        Ok(value) => value.and_then(|v| v.trim().parse().ok()).filter(|n| *n > 0),
        Err(e) => {
            tracing::warn!(error = %e, "Failed to read remembered table number");
            None
        }
    }
}

/// Remember the table number; failure is logged only
pub fn remember_table_number(prefs: &dyn Preferences, table: u32) {
    if let Err(e) = prefs.set(LAST_TABLE_KEY, &table.to_string()) {
        tracing::warn!(table, error = %e, "Failed to remember table number");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_file_preferences_roundtrip() {
        let temp_dir = TempDir::new().unwrap();
        let prefs = FilePreferences::new(temp_dir.path().join("nested").join("prefs.json"));

        assert_eq!(last_table_number(&prefs), None);
        remember_table_number(&prefs, 7);
        assert!(prefs.path().exists());
        assert_eq!(last_table_number(&prefs), Some(7));

        // 重新打开仍可读取
        let reopened = FilePreferences::new(prefs.path().to_path_buf());
        assert_eq!(last_table_number(&reopened), Some(7));
    }

    #[test]
    fn test_corrupt_file_is_non_fatal() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("prefs.json");
        fs::write(&path, "not json").unwrap();
        let prefs = FilePreferences::new(&path);

        assert_eq!(last_table_number(&prefs), None);
        remember_table_number(&prefs, 3);
        assert_eq!(last_table_number(&prefs), Some(3));
    }

    #[test]
    fn test_unavailable_preferences() {
        let prefs = MemoryPreferences::unavailable();
        remember_table_number(&prefs, 5);
        assert_eq!(last_table_number(&prefs), None);
    }
}
