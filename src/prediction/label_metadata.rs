use std::collections::HashMap;

pub const GENERIC_MESSAGE: &str = "No description for this class yet.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Accent {
    /// The highlight color of the active theme.
    #[default]
    Default,
    /// The secondary text color of the active theme.
    Muted,
    Rgb([u8; 3]),
}

impl Accent {
    /// Parses `#rrggbb`.
    pub fn parse_hex(value: &str) -> Option<Accent> {
        let hex = value.strip_prefix('#')?;
        if hex.len() != 6 || !hex.is_ascii() {
            return None;
        }
        let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
        Some(Accent::Rgb([channel(0)?, channel(2)?, channel(4)?]))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LabelMetadata {
    pub display_label: String,
    pub message: String,
    pub accent: Accent,
}

impl LabelMetadata {
    pub fn fallback(raw_label: &str) -> Self {
        Self {
            display_label: raw_label.to_string(),
            message: GENERIC_MESSAGE.to_string(),
            accent: Accent::Default,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct LabelMetadataTable {
    entries: HashMap<String, LabelMetadata>,
}

impl LabelMetadataTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, raw_label: impl Into<String>, metadata: LabelMetadata) {
        self.entries.insert(raw_label.into(), metadata);
    }

    pub fn resolve(&self, raw_label: &str) -> LabelMetadata {
        self.entries
            .get(raw_label)
            .cloned()
            .unwrap_or_else(|| LabelMetadata::fallback(raw_label))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_label_resolves_to_default_record() {
        let table = LabelMetadataTable::new();

        let metadata = table.resolve("tabby");

        assert_eq!(metadata.display_label, "tabby");
        assert_eq!(metadata.message, GENERIC_MESSAGE);
        assert_eq!(metadata.accent, Accent::Default);
    }

    #[test]
    fn test_known_label_resolves_to_its_entry() {
        let mut table = LabelMetadataTable::new();
        table.insert(
            "class_1",
            LabelMetadata {
                display_label: "Puppy face".to_string(),
                message: "Friendly and energetic.".to_string(),
                accent: Accent::Rgb([255, 136, 0]),
            },
        );

        assert_eq!(table.resolve("class_1").display_label, "Puppy face");
        assert_eq!(table.resolve("class_2").display_label, "class_2");
    }

    #[test]
    fn test_parse_hex() {
        assert_eq!(Accent::parse_hex("#ff8800"), Some(Accent::Rgb([255, 136, 0])));
        assert_eq!(Accent::parse_hex("ff8800"), None);
        assert_eq!(Accent::parse_hex("#ff88"), None);
        assert_eq!(Accent::parse_hex("#gg8800"), None);
    }
}
