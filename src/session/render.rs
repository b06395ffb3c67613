use crate::session::core::Model;
use crate::session::main::Session;
use crate::session::view::View;

impl Session {
    pub fn render(&self, model: &Model) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let view = View::from_model(model);
        let mut device_display = self
            .device_display
            .lock()
            .unwrap_or_else(|e| e.into_inner());
        device_display.render(&view)
    }
}
