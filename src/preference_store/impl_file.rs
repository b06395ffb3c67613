use crate::error::PreferenceError;
use crate::library::logger::interface::Logger;
use crate::preference_store::interface::PreferenceStore;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

/// String preferences kept as a flat TOML table.
pub struct PreferenceStoreFile {
    path: PathBuf,
    // serializes read-modify-write cycles
    lock: Mutex<()>,
    logger: Arc<dyn Logger + Send + Sync>,
}

impl PreferenceStoreFile {
    pub fn new(path: PathBuf, logger: Arc<dyn Logger + Send + Sync>) -> Self {
        Self {
            path,
            lock: Mutex::new(()),
            logger: logger.with_namespace("preferences").with_namespace("file"),
        }
    }

    /// `<config dir>/lucky-lens/preferences.toml`, when the platform has a config dir.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("lucky-lens").join("preferences.toml"))
    }

    fn read_all(&self) -> Result<BTreeMap<String, String>, PreferenceError> {
        let raw = match std::fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(BTreeMap::new()),
            Err(source) => return Err(io_error(&self.path, source)),
        };
        toml::from_str(&raw).map_err(|e| PreferenceError::Parse {
            path: self.path.display().to_string(),
            reason: e.to_string(),
        })
    }

    fn write_all(&self, values: &BTreeMap<String, String>) -> Result<(), PreferenceError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(|source| io_error(&self.path, source))?;
        }
        let raw = toml::to_string(values).map_err(|e| PreferenceError::Parse {
            path: self.path.display().to_string(),
            reason: e.to_string(),
        })?;
        std::fs::write(&self.path, raw).map_err(|source| io_error(&self.path, source))
    }
}

fn io_error(path: &Path, source: std::io::Error) -> PreferenceError {
    PreferenceError::Io {
        path: path.display().to_string(),
        source,
    }
}

impl PreferenceStore for PreferenceStoreFile {
    fn get(&self, key: &str) -> Result<Option<String>, PreferenceError> {
        let _guard = self.lock.lock().unwrap_or_else(|e| e.into_inner());
        Ok(self.read_all()?.remove(key))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), PreferenceError> {
        let _guard = self.lock.lock().unwrap_or_else(|e| e.into_inner());
        let mut values = self.read_all()?;
        values.insert(key.to_string(), value.to_string());
        self.write_all(&values)?;
        let _ = self
            .logger
            .info(&format!("Saved {}={} to {}", key, value, self.path.display()));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::library::logger::impl_fake::LoggerFake;

    #[test]
    fn test_missing_file_reads_as_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = PreferenceStoreFile::new(dir.path().join("prefs.toml"), Arc::new(LoggerFake::new()));

        assert_eq!(store.get("theme").unwrap(), None);
    }

    #[test]
    fn test_values_persist_across_instances() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("prefs.toml");
        let logger = Arc::new(LoggerFake::new());

        PreferenceStoreFile::new(path.clone(), logger.clone())
            .set("theme", "dark")
            .unwrap();
        let reopened = PreferenceStoreFile::new(path, logger);

        assert_eq!(reopened.get("theme").unwrap().as_deref(), Some("dark"));
    }

    #[test]
    fn test_malformed_file_is_a_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("prefs.toml");
        std::fs::write(&path, "theme = [").unwrap();
        let store = PreferenceStoreFile::new(path, Arc::new(LoggerFake::new()));

        assert!(matches!(store.get("theme"), Err(PreferenceError::Parse { .. })));
    }
}
