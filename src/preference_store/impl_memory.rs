use crate::error::PreferenceError;
use crate::preference_store::interface::PreferenceStore;
use std::collections::HashMap;
use std::sync::Mutex;

#[derive(Debug, Default)]
pub struct PreferenceStoreMemory {
    values: Mutex<HashMap<String, String>>,
}

impl PreferenceStoreMemory {
    pub fn new() -> Self {
        Self::default()
    }

    #[allow(dead_code)]
    pub fn with_value(key: &str, value: &str) -> Self {
        let store = Self::new();
        store
            .values
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .insert(key.to_string(), value.to_string());
        store
    }
}

impl PreferenceStore for PreferenceStoreMemory {
    fn get(&self, key: &str) -> Result<Option<String>, PreferenceError> {
        Ok(self
            .values
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .get(key)
            .cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), PreferenceError> {
        self.values
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .insert(key.to_string(), value.to_string());
        Ok(())
    }
}
