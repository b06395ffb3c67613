use crate::error::DeviceError;
use image::DynamicImage;
use serde::Deserialize;
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct CaptureSettings {
    pub width: u32,
    pub height: u32,
    /// Flip frames horizontally, like a selfie preview.
    pub mirrored: bool,
}

impl Default for CaptureSettings {
    fn default() -> Self {
        Self {
            width: 200,
            height: 200,
            mirrored: true,
        }
    }
}

pub trait DeviceCamera: Send + Sync {
    fn open(
        &self,
        settings: &CaptureSettings,
    ) -> Result<Arc<dyn CaptureHandle + Send + Sync>, DeviceError>;
}

pub trait CaptureHandle: Send + Sync {
    fn next_frame(&self) -> Result<DynamicImage, DeviceError>;
    fn close(&self) -> Result<(), DeviceError>;
}
