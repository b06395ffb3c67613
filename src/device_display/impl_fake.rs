use crate::device_display::interface::DeviceDisplay;
use crate::session::view::View;
use std::error::Error;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

#[derive(Clone, Default)]
pub struct DeviceDisplayFake {
    views: Arc<Mutex<Vec<View>>>,
}

impl DeviceDisplayFake {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn views(&self) -> Vec<View> {
        self.views.lock().unwrap().clone()
    }

    pub fn last(&self) -> Option<View> {
        self.views.lock().unwrap().last().cloned()
    }

    /// Polls until a rendered view satisfies `predicate`.
    pub fn wait_for(&self, timeout: Duration, predicate: impl Fn(&View) -> bool) -> Option<View> {
        let deadline = Instant::now() + timeout;
        while Instant::now() < deadline {
            if let Some(view) = self.views.lock().unwrap().iter().find(|v| predicate(v)) {
                return Some(view.clone());
            }
            std::thread::sleep(Duration::from_millis(2));
        }
        None
    }
}

impl DeviceDisplay for DeviceDisplayFake {
    fn render(&mut self, view: &View) -> Result<(), Box<dyn Error + Send + Sync>> {
        self.views.lock().unwrap().push(view.clone());
        Ok(())
    }
}
