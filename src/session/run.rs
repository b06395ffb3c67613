use crate::session::core::{init, transition, Effect, Model};
use crate::session::main::Session;

impl Session {
    /// Processes events until a shutdown, returning the final model.
    pub fn run(&self) -> Result<Model, Box<dyn std::error::Error + Send + Sync>> {
        let (mut current_model, effects) = init();

        self.render_or_log(&current_model);
        self.run_effects(effects);

        loop {
            let event = self
                .event_receiver
                .lock()
                .unwrap_or_else(|e| e.into_inner())
                .recv()?;

            let _ = self.logger.info(&format!("event: {:?}", event));

            let (new_model, effects) = transition(&self.config, current_model, event);

            if !effects.is_empty() {
                let _ = self.logger.info(&format!("effects: {:?}", effects));
            }

            current_model = new_model;

            self.render_or_log(&current_model);

            if current_model.exiting {
                for effect in effects {
                    self.run_effect(effect);
                }
                self.release_captures();
                let _ = self.logger.info("Session stopped");
                return Ok(current_model);
            }

            self.run_effects(effects);
        }
    }

    fn render_or_log(&self, model: &Model) {
        if let Err(e) = self.render(model) {
            let _ = self.logger.error(&format!("Render failed: {}", e));
        }
    }

    fn run_effects(&self, effects: Vec<Effect>) {
        for effect in effects {
            let self_clone = self.clone();
            std::thread::spawn(move || self_clone.run_effect(effect));
        }
    }
}
