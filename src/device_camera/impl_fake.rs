use crate::device_camera::interface::{CaptureHandle, CaptureSettings, DeviceCamera};
use crate::error::DeviceError;
use crate::library::logger::interface::Logger;
use image::{imageops, DynamicImage, Rgb, RgbImage};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FakeAvailability {
    Available,
    Denied,
    Missing,
}

/// Renders a moving gradient instead of talking to real hardware.
pub struct DeviceCameraFake {
    availability: FakeAvailability,
    open_delay: Duration,
    handles: Mutex<Vec<Arc<CaptureHandleFake>>>,
    logger: Arc<dyn Logger + Send + Sync>,
}

impl DeviceCameraFake {
    pub fn new(logger: Arc<dyn Logger + Send + Sync>) -> Self {
        Self::with_availability(FakeAvailability::Available, logger)
    }

    pub fn with_availability(
        availability: FakeAvailability,
        logger: Arc<dyn Logger + Send + Sync>,
    ) -> Self {
        Self {
            availability,
            open_delay: Duration::ZERO,
            handles: Mutex::new(Vec::new()),
            logger: logger.with_namespace("camera").with_namespace("fake"),
        }
    }

    /// Makes `open` block, like hardware that takes a while to warm up.
    #[allow(dead_code)]
    pub fn with_open_delay(mut self, open_delay: Duration) -> Self {
        self.open_delay = open_delay;
        self
    }

    #[allow(dead_code)]
    pub fn opened(&self) -> usize {
        self.handles.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    #[allow(dead_code)]
    pub fn open_handles(&self) -> usize {
        self.handles
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .iter()
            .filter(|handle| !handle.is_closed())
            .count()
    }

    #[allow(dead_code)]
    pub fn frames_captured(&self) -> u64 {
        self.handles
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .iter()
            .map(|handle| handle.frames())
            .sum()
    }
}

impl DeviceCamera for DeviceCameraFake {
    fn open(
        &self,
        settings: &CaptureSettings,
    ) -> Result<Arc<dyn CaptureHandle + Send + Sync>, DeviceError> {
        let _ = self.logger.info(&format!(
            "Opening camera {}x{} (mirrored: {})...",
            settings.width, settings.height, settings.mirrored
        ));
        std::thread::sleep(self.open_delay);

        match self.availability {
            FakeAvailability::Denied => return Err(DeviceError::Denied),
            FakeAvailability::Missing => {
                return Err(DeviceError::Unavailable("no camera attached".to_string()))
            }
            FakeAvailability::Available => {}
        }

        let handle = Arc::new(CaptureHandleFake {
            settings: *settings,
            frames: AtomicU64::new(0),
            closed: AtomicBool::new(false),
            logger: self.logger.clone(),
        });
        self.handles
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(handle.clone());

        let _ = self.logger.info("Camera opened");
        Ok(handle)
    }
}

pub struct CaptureHandleFake {
    settings: CaptureSettings,
    frames: AtomicU64,
    closed: AtomicBool,
    logger: Arc<dyn Logger + Send + Sync>,
}

impl CaptureHandleFake {
    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }

    pub fn frames(&self) -> u64 {
        self.frames.load(Ordering::SeqCst)
    }
}

impl CaptureHandle for CaptureHandleFake {
    fn next_frame(&self) -> Result<DynamicImage, DeviceError> {
        if self.is_closed() {
            return Err(DeviceError::Closed);
        }

        let index = self.frames.fetch_add(1, Ordering::SeqCst);
        let shift = (index % 256) as u32;
        let CaptureSettings { width, height, .. } = self.settings;
        let frame = RgbImage::from_fn(width, height, |x, y| {
            let r = ((x * 255) / width.max(1)) as u8;
            let g = ((y * 255) / height.max(1)) as u8;
            Rgb([r, g, ((shift + x) % 256) as u8])
        });

        let frame = if self.settings.mirrored {
            imageops::flip_horizontal(&frame)
        } else {
            frame
        };

        Ok(DynamicImage::ImageRgb8(frame))
    }

    fn close(&self) -> Result<(), DeviceError> {
        if !self.closed.swap(true, Ordering::SeqCst) {
            let _ = self.logger.info("Camera closed");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::library::logger::impl_fake::LoggerFake;

    #[test]
    fn test_frames_match_settings_and_are_mirrored() {
        let camera = DeviceCameraFake::new(Arc::new(LoggerFake::new()));
        let plain = camera
            .open(&CaptureSettings {
                width: 8,
                height: 4,
                mirrored: false,
            })
            .unwrap();
        let mirrored = camera
            .open(&CaptureSettings {
                width: 8,
                height: 4,
                mirrored: true,
            })
            .unwrap();

        let plain = plain.next_frame().unwrap().to_rgb8();
        let mirrored = mirrored.next_frame().unwrap().to_rgb8();

        assert_eq!(plain.dimensions(), (8, 4));
        assert_eq!(plain.get_pixel(0, 0), mirrored.get_pixel(7, 0));
        assert_eq!(camera.frames_captured(), 2);
    }

    #[test]
    fn test_closed_handle_stops_producing_frames() {
        let camera = DeviceCameraFake::new(Arc::new(LoggerFake::new()));
        let handle = camera.open(&CaptureSettings::default()).unwrap();

        handle.close().unwrap();

        assert!(matches!(handle.next_frame(), Err(DeviceError::Closed)));
        assert_eq!(camera.open_handles(), 0);
        assert_eq!(camera.opened(), 1);
    }

    #[test]
    fn test_denied_camera_fails_to_open() {
        let camera =
            DeviceCameraFake::with_availability(FakeAvailability::Denied, Arc::new(LoggerFake::new()));

        assert!(matches!(
            camera.open(&CaptureSettings::default()),
            Err(DeviceError::Denied)
        ));
    }
}
