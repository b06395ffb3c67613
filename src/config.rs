use crate::device_camera::interface::CaptureSettings;
use crate::error::ConfigError;
use crate::image_classifier::model_descriptor::{ModelDescriptor, PixelNormalization, TensorLayout};
use crate::prediction::label_metadata::{Accent, LabelMetadata, LabelMetadataTable, GENERIC_MESSAGE};
use crate::prediction::rows::RowKeying;
use crate::sampler::generate::SampleRequest;
use chrono::Offset;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct Config {
    pub logger_timezone: chrono::FixedOffset,
    pub model: ModelDescriptor,
    pub capture: CaptureSettings,
    /// Delay between rendering a stream result and grabbing the next frame.
    pub frame_interval: Duration,
    pub sample: SampleRequest,
    pub reveal_delay: Duration,
    pub row_keying: RowKeying,
    pub label_metadata: LabelMetadataTable,
    pub preferences_path: Option<PathBuf>,
    /// Capture from the images in this directory instead of the synthetic camera.
    pub camera_frames_dir: Option<PathBuf>,
    pub fake_labels: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            logger_timezone: korea_standard_time(),
            model: ModelDescriptor::default(),
            capture: CaptureSettings::default(),
            frame_interval: Duration::from_millis(16),
            sample: SampleRequest::default(),
            reveal_delay: Duration::from_millis(200),
            row_keying: RowKeying::Label,
            label_metadata: LabelMetadataTable::new(),
            preferences_path: None,
            camera_frames_dir: None,
            fake_labels: vec!["Dog".to_string(), "Cat".to_string()],
        }
    }
}

fn korea_standard_time() -> chrono::FixedOffset {
    fixed_offset_hours(9).unwrap_or_else(|| chrono::Utc.fix())
}

fn fixed_offset_hours(hours: i32) -> Option<chrono::FixedOffset> {
    chrono::FixedOffset::east_opt(hours * 3600)
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    utc_offset_hours: Option<i32>,
    frame_interval_ms: Option<u64>,
    reveal_delay_ms: Option<u64>,
    row_keying: Option<RowKeying>,
    preferences_path: Option<PathBuf>,
    camera_frames_dir: Option<PathBuf>,
    fake_labels: Option<Vec<String>>,
    sample: Option<SampleRequest>,
    capture: Option<CaptureSettings>,
    model: Option<ModelFile>,
    #[serde(default)]
    labels: HashMap<String, LabelFile>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ModelFile {
    path: Option<PathBuf>,
    metadata_path: Option<PathBuf>,
    width: Option<u32>,
    height: Option<u32>,
    layout: Option<TensorLayout>,
    normalization: Option<PixelNormalization>,
    apply_softmax: Option<bool>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct LabelFile {
    display_label: Option<String>,
    message: Option<String>,
    accent: Option<String>,
}

impl Config {
    /// `<config dir>/lucky-lens/config.toml`
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("lucky-lens").join("config.toml"))
    }

    /// Defaults overlaid with `path`, or with the default config file when it exists.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let path = match path {
            Some(path) => path.to_path_buf(),
            None => match Self::default_path() {
                Some(path) if path.exists() => path,
                _ => return Ok(Self::default()),
            },
        };

        let raw = std::fs::read_to_string(&path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml(&raw, &path)
    }

    pub fn from_toml(raw: &str, path: &Path) -> Result<Self, ConfigError> {
        let file: ConfigFile = toml::from_str(raw).map_err(|source| ConfigError::Parse {
            path: path.display().to_string(),
            source,
        })?;
        Self::default().overlay(file)
    }

    fn overlay(mut self, file: ConfigFile) -> Result<Self, ConfigError> {
        if let Some(hours) = file.utc_offset_hours {
            self.logger_timezone = fixed_offset_hours(hours).ok_or_else(|| ConfigError::Invalid {
                field: "utc_offset_hours".to_string(),
                reason: format!("{} is out of range", hours),
            })?;
        }
        if let Some(ms) = file.frame_interval_ms {
            self.frame_interval = Duration::from_millis(ms);
        }
        if let Some(ms) = file.reveal_delay_ms {
            self.reveal_delay = Duration::from_millis(ms);
        }
        if let Some(row_keying) = file.row_keying {
            self.row_keying = row_keying;
        }
        if file.preferences_path.is_some() {
            self.preferences_path = file.preferences_path;
        }
        if file.camera_frames_dir.is_some() {
            self.camera_frames_dir = file.camera_frames_dir;
        }
        if let Some(labels) = file.fake_labels {
            if labels.is_empty() {
                return Err(ConfigError::Invalid {
                    field: "fake_labels".to_string(),
                    reason: "needs at least one label".to_string(),
                });
            }
            self.fake_labels = labels;
        }
        if let Some(sample) = file.sample {
            self.sample = sample;
        }
        if let Some(capture) = file.capture {
            if capture.width == 0 || capture.height == 0 {
                return Err(ConfigError::Invalid {
                    field: "capture".to_string(),
                    reason: "width and height must be positive".to_string(),
                });
            }
            self.capture = capture;
        }
        if let Some(model) = file.model {
            self.model = overlay_model(self.model, model)?;
        }
        for (raw_label, label) in file.labels {
            let metadata = overlay_label(&raw_label, label)?;
            self.label_metadata.insert(raw_label, metadata);
        }
        Ok(self)
    }
}

fn overlay_model(mut model: ModelDescriptor, file: ModelFile) -> Result<ModelDescriptor, ConfigError> {
    if let Some(path) = file.path {
        model.model_path = path;
    }
    if let Some(path) = file.metadata_path {
        model.metadata_path = path;
    }
    let width = file.width.unwrap_or(model.input_shape.0);
    let height = file.height.unwrap_or(model.input_shape.1);
    if width == 0 || height == 0 {
        return Err(ConfigError::Invalid {
            field: "model".to_string(),
            reason: "width and height must be positive".to_string(),
        });
    }
    model.input_shape = (width, height);
    if let Some(layout) = file.layout {
        model.layout = layout;
    }
    if let Some(normalization) = file.normalization {
        model.normalization = normalization;
    }
    if let Some(apply_softmax) = file.apply_softmax {
        model.apply_softmax = apply_softmax;
    }
    Ok(model)
}

fn overlay_label(raw_label: &str, file: LabelFile) -> Result<LabelMetadata, ConfigError> {
    let accent = match file.accent {
        Some(hex) => Accent::parse_hex(&hex).ok_or_else(|| ConfigError::Invalid {
            field: format!("labels.{}.accent", raw_label),
            reason: format!("{} is not a #rrggbb color", hex),
        })?,
        None => Accent::Default,
    };
    Ok(LabelMetadata {
        display_label: file.display_label.unwrap_or_else(|| raw_label.to_string()),
        message: file.message.unwrap_or_else(|| GENERIC_MESSAGE.to_string()),
        accent,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(raw: &str) -> Result<Config, ConfigError> {
        Config::from_toml(raw, Path::new("test.toml"))
    }

    #[test]
    fn test_defaults() {
        let config = Config::default();

        assert_eq!(config.sample, SampleRequest { min: 1, max: 45, count: 6 });
        assert_eq!(config.reveal_delay, Duration::from_millis(200));
        assert_eq!(config.row_keying, RowKeying::Label);
        assert_eq!(config.logger_timezone.local_minus_utc(), 9 * 3600);
        assert!(config.capture.mirrored);
        assert_eq!(config.camera_frames_dir, None);
    }

    #[test]
    fn test_file_overrides_individual_fields() {
        let config = parse(
            r##"
            reveal_delay_ms = 50
            row_keying = "rank"
            camera_frames_dir = "/tmp/frames"

            [sample]
            min = 1
            max = 10
            count = 3

            [model]
            path = "models/pets.onnx"
            layout = "nhwc"
            normalization = "minus_one_to_one"

            [labels.Dog]
            display_label = "Puppy"
            accent = "#ff8800"
            "##,
        )
        .unwrap();

        assert_eq!(config.reveal_delay, Duration::from_millis(50));
        assert_eq!(config.row_keying, RowKeying::Rank);
        assert_eq!(config.camera_frames_dir, Some(PathBuf::from("/tmp/frames")));
        assert_eq!(config.sample.count, 3);
        assert_eq!(config.model.model_path, PathBuf::from("models/pets.onnx"));
        assert_eq!(config.model.layout, TensorLayout::Nhwc);
        assert_eq!(config.model.normalization, PixelNormalization::MinusOneToOne);
        assert_eq!(config.model.input_shape, (224, 224));
        let dog = config.label_metadata.resolve("Dog");
        assert_eq!(dog.display_label, "Puppy");
        assert_eq!(dog.message, GENERIC_MESSAGE);
        assert_eq!(dog.accent, Accent::Rgb([255, 136, 0]));
        assert_eq!(config.frame_interval, Duration::from_millis(16));
    }

    #[test]
    fn test_invalid_values_are_rejected() {
        assert!(matches!(
            parse("[labels.Dog]\naccent = \"orange\""),
            Err(ConfigError::Invalid { .. })
        ));
        assert!(matches!(parse("utc_offset_hours = 99"), Err(ConfigError::Invalid { .. })));
        assert!(matches!(parse("unknown = 1"), Err(ConfigError::Parse { .. })));
    }

    #[test]
    fn test_load_reads_explicit_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "fake_labels = [\"A\", \"B\", \"C\"]").unwrap();

        let config = Config::load(Some(&path)).unwrap();

        assert_eq!(config.fake_labels, vec!["A", "B", "C"]);
        assert!(matches!(
            Config::load(Some(&dir.path().join("missing.toml"))),
            Err(ConfigError::Io { .. })
        ));
    }
}
