use crate::session::view::View;
use std::error::Error;

/// Surface the session renders into after every transition.
pub trait DeviceDisplay: Send + Sync {
    fn render(&mut self, view: &View) -> Result<(), Box<dyn Error + Send + Sync>>;
}
