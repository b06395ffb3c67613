use crate::device_camera::interface::{CaptureHandle, CaptureSettings, DeviceCamera};
use crate::error::DeviceError;
use crate::library::logger::interface::Logger;
use image::{imageops, DynamicImage};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

const FRAME_EXTENSIONS: [&str; 5] = ["png", "jpg", "jpeg", "bmp", "webp"];

/// Replays the images of a directory in file name order, looping at the end.
///
/// Point it at the output directory of a webcam snapshot tool (for example
/// `ffmpeg -i /dev/video0 -update 1 frames/latest.jpg`) to classify a live feed.
pub struct DeviceCameraFrameDirectory {
    directory: PathBuf,
    logger: Arc<dyn Logger + Send + Sync>,
}

impl DeviceCameraFrameDirectory {
    pub fn new(directory: PathBuf, logger: Arc<dyn Logger + Send + Sync>) -> Self {
        Self {
            directory,
            logger: logger.with_namespace("camera").with_namespace("frame_directory"),
        }
    }
}

fn is_frame(path: &Path) -> bool {
    path.extension()
        .and_then(|extension| extension.to_str())
        .map(|extension| FRAME_EXTENSIONS.contains(&extension.to_ascii_lowercase().as_str()))
        .unwrap_or(false)
}

fn list_frames(directory: &Path) -> Result<Vec<PathBuf>, DeviceError> {
    let entries = std::fs::read_dir(directory)
        .map_err(|e| DeviceError::Unavailable(format!("{}: {}", directory.display(), e)))?;

    let mut frames: Vec<PathBuf> = entries
        .filter_map(|entry| entry.ok().map(|entry| entry.path()))
        .filter(|path| path.is_file() && is_frame(path))
        .collect();
    frames.sort();
    Ok(frames)
}

impl DeviceCamera for DeviceCameraFrameDirectory {
    fn open(
        &self,
        settings: &CaptureSettings,
    ) -> Result<Arc<dyn CaptureHandle + Send + Sync>, DeviceError> {
        let _ = self
            .logger
            .info(&format!("Opening frame directory {}...", self.directory.display()));

        if list_frames(&self.directory)?.is_empty() {
            return Err(DeviceError::Unavailable(format!(
                "no frames in {}",
                self.directory.display()
            )));
        }

        Ok(Arc::new(CaptureHandleFrameDirectory {
            directory: self.directory.clone(),
            settings: *settings,
            position: AtomicUsize::new(0),
            closed: AtomicBool::new(false),
            logger: self.logger.clone(),
        }))
    }
}

pub struct CaptureHandleFrameDirectory {
    directory: PathBuf,
    settings: CaptureSettings,
    position: AtomicUsize,
    closed: AtomicBool,
    logger: Arc<dyn Logger + Send + Sync>,
}

impl CaptureHandle for CaptureHandleFrameDirectory {
    fn next_frame(&self) -> Result<DynamicImage, DeviceError> {
        if self.closed.load(Ordering::SeqCst) {
            return Err(DeviceError::Closed);
        }

        // listed per frame so snapshots written while capturing are picked up
        let frames = list_frames(&self.directory)?;
        if frames.is_empty() {
            return Err(DeviceError::Frame(format!(
                "no frames left in {}",
                self.directory.display()
            )));
        }
        let path = &frames[self.position.fetch_add(1, Ordering::SeqCst) % frames.len()];

        let frame = image::open(path)
            .map_err(|e| DeviceError::Frame(format!("{}: {}", path.display(), e)))?
            .resize_exact(
                self.settings.width,
                self.settings.height,
                imageops::FilterType::Triangle,
            );

        Ok(if self.settings.mirrored {
            frame.fliph()
        } else {
            frame
        })
    }

    fn close(&self) -> Result<(), DeviceError> {
        if !self.closed.swap(true, Ordering::SeqCst) {
            let _ = self.logger.info("Frame directory closed");
        }
        Ok(())
    }
}
