use crate::error::LoadError;
use serde::Deserialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TensorLayout {
    #[default]
    Nchw,
    Nhwc,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PixelNormalization {
    #[default]
    ZeroToOne,
    MinusOneToOne,
}

impl PixelNormalization {
    pub fn apply(&self, channel: u8) -> f32 {
        match self {
            PixelNormalization::ZeroToOne => channel as f32 / 255.0,
            PixelNormalization::MinusOneToOne => channel as f32 / 127.5 - 1.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ModelDescriptor {
    pub model_path: PathBuf,
    pub metadata_path: PathBuf,
    /// (width, height)
    pub input_shape: (u32, u32),
    pub layout: TensorLayout,
    pub normalization: PixelNormalization,
    pub apply_softmax: bool,
}

impl Default for ModelDescriptor {
    fn default() -> Self {
        Self {
            model_path: PathBuf::from("./model/model.onnx"),
            metadata_path: PathBuf::from("./model/metadata.json"),
            input_shape: (224, 224),
            layout: TensorLayout::Nchw,
            normalization: PixelNormalization::ZeroToOne,
            apply_softmax: false,
        }
    }
}

#[derive(Debug, Deserialize)]
struct ModelMetadata {
    labels: Vec<String>,
}

/// Reads the class labels from a `metadata.json` of the form `{"labels": [...]}`.
pub fn read_labels(path: &Path) -> Result<Vec<String>, LoadError> {
    let raw = std::fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.display().to_string(),
        source,
    })?;
    let metadata: ModelMetadata =
        serde_json::from_str(&raw).map_err(|e| LoadError::Metadata {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
    if metadata.labels.is_empty() {
        return Err(LoadError::NoClasses);
    }
    Ok(metadata.labels)
}
