use crate::error::PreferenceError;

pub trait PreferenceStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, PreferenceError>;
    fn set(&self, key: &str, value: &str) -> Result<(), PreferenceError>;
}
