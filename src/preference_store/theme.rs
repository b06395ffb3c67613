use crate::error::PreferenceError;
use crate::preference_store::interface::PreferenceStore;

pub const THEME_KEY: &str = "theme";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    /// Anything other than `dark` reads as light.
    pub fn from_stored(value: Option<&str>) -> Self {
        match value {
            Some("dark") => Theme::Dark,
            _ => Theme::Light,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }

    pub fn toggled(&self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }
}

pub fn load_theme(store: &dyn PreferenceStore) -> Result<Theme, PreferenceError> {
    Ok(Theme::from_stored(store.get(THEME_KEY)?.as_deref()))
}

pub fn save_theme(store: &dyn PreferenceStore, theme: Theme) -> Result<(), PreferenceError> {
    store.set(THEME_KEY, theme.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::preference_store::impl_memory::PreferenceStoreMemory;

    #[test]
    fn test_absent_or_unknown_theme_is_light() {
        assert_eq!(Theme::from_stored(None), Theme::Light);
        assert_eq!(Theme::from_stored(Some("sepia")), Theme::Light);
        assert_eq!(Theme::from_stored(Some("dark")), Theme::Dark);
    }

    #[test]
    fn test_theme_round_trips_through_store() {
        let store = PreferenceStoreMemory::new();
        assert_eq!(load_theme(&store).unwrap(), Theme::Light);

        save_theme(&store, Theme::Dark).unwrap();

        assert_eq!(store.get(THEME_KEY).unwrap().as_deref(), Some("dark"));
        assert_eq!(load_theme(&store).unwrap(), Theme::Dark);
    }
}
