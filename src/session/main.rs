use crate::config::Config;
use crate::device_camera::interface::{CaptureHandle, DeviceCamera};
use crate::device_display::interface::DeviceDisplay;
use crate::image_classifier::interface::{ImageClassifier, ImageClassifierLoader};
use crate::library::logger::interface::Logger;
use crate::preference_store::interface::PreferenceStore;
use crate::sampler::random_source::interface::RandomSource;
use crate::session::core::{CaptureId, Event};
use std::collections::HashMap;
use std::sync::mpsc::{channel, Receiver, Sender};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

pub type SharedClassifier = Arc<dyn ImageClassifier + Send + Sync>;
pub type SharedCaptureHandle = Arc<dyn CaptureHandle + Send + Sync>;

/// Collaborators plus the handles that outlive a single event: the loaded
/// model and the open capture devices. The model/state itself lives in the
/// run loop.
#[derive(Clone)]
pub struct Session {
    pub config: Config,
    pub logger: Arc<dyn Logger + Send + Sync>,
    pub event_sender: Sender<Event>,
    pub event_receiver: Arc<Mutex<Receiver<Event>>>,
    pub image_classifier_loader: Arc<dyn ImageClassifierLoader + Send + Sync>,
    pub image_classifier: Arc<Mutex<Option<SharedClassifier>>>,
    pub device_camera: Arc<dyn DeviceCamera + Send + Sync>,
    pub capture_handles: Arc<Mutex<HashMap<CaptureId, SharedCaptureHandle>>>,
    /// Flipped under the `capture_handles` lock once the loop has released captures.
    pub captures_released: Arc<AtomicBool>,
    pub preference_store: Arc<dyn PreferenceStore + Send + Sync>,
    pub random_source: Arc<Mutex<Box<dyn RandomSource>>>,
    pub device_display: Arc<Mutex<dyn DeviceDisplay + Send + Sync>>,
}

impl Session {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        config: Config,
        logger: Arc<dyn Logger + Send + Sync>,
        image_classifier_loader: Arc<dyn ImageClassifierLoader + Send + Sync>,
        device_camera: Arc<dyn DeviceCamera + Send + Sync>,
        preference_store: Arc<dyn PreferenceStore + Send + Sync>,
        random_source: Box<dyn RandomSource>,
        device_display: Arc<Mutex<dyn DeviceDisplay + Send + Sync>>,
    ) -> Self {
        let (event_sender, event_receiver) = channel();

        Self {
            config,
            logger: logger.with_namespace("session"),
            event_sender,
            event_receiver: Arc::new(Mutex::new(event_receiver)),
            image_classifier_loader,
            image_classifier: Arc::new(Mutex::new(None)),
            device_camera,
            capture_handles: Arc::new(Mutex::new(HashMap::new())),
            captures_released: Arc::new(AtomicBool::new(false)),
            preference_store,
            random_source: Arc::new(Mutex::new(random_source)),
            device_display,
        }
    }

    /// Handle for presentation surfaces to push user triggers into the loop.
    pub fn sender(&self) -> Sender<Event> {
        self.event_sender.clone()
    }

    pub fn send(&self, event: Event) {
        if self.event_sender.send(event).is_err() {
            let _ = self.logger.warn("Session loop is gone, dropping event");
        }
    }

    /// Keeps a freshly opened handle, or closes it right away when the loop
    /// already released its captures.
    pub fn adopt_capture(&self, capture: CaptureId, handle: SharedCaptureHandle) {
        let mut handles = self
            .capture_handles
            .lock()
            .unwrap_or_else(|e| e.into_inner());
        if !self.captures_released.load(Ordering::SeqCst) {
            handles.insert(capture, handle);
            return;
        }
        drop(handles);

        let _ = self
            .logger
            .info(&format!("Capture {:?} opened after shutdown, closing it", capture));
        if let Err(e) = handle.close() {
            let _ = self
                .logger
                .error(&format!("Failed to release capture {:?}: {}", capture, e));
        }
    }

    pub fn release_captures(&self) {
        let handles: Vec<(CaptureId, SharedCaptureHandle)> = {
            let mut handles = self
                .capture_handles
                .lock()
                .unwrap_or_else(|e| e.into_inner());
            self.captures_released.store(true, Ordering::SeqCst);
            handles.drain().collect()
        };

        for (capture, handle) in handles {
            if let Err(e) = handle.close() {
                let _ = self
                    .logger
                    .error(&format!("Failed to release capture {:?}: {}", capture, e));
            }
        }
    }
}
