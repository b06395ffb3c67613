use crate::library::logger::interface::{join_namespace, Level, Logger};
use std::sync::{Arc, Mutex};

/// Keeps every line in memory so tests can assert on what was logged.
#[derive(Debug, Clone, Default)]
pub struct LoggerFake {
    namespace: Option<String>,
    lines: Arc<Mutex<Vec<(Level, String)>>>,
}

impl LoggerFake {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lines(&self) -> Vec<(Level, String)> {
        self.lines.lock().unwrap().clone()
    }

    pub fn count(&self, level: Level) -> usize {
        self.lines().iter().filter(|(l, _)| *l == level).count()
    }
}

impl Logger for LoggerFake {
    fn log(&self, level: Level, message: &str) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let line = match &self.namespace {
            Some(namespace) => format!("{}: {}", namespace, message),
            None => message.to_string(),
        };
        self.lines.lock().unwrap().push((level, line));
        Ok(())
    }

    fn with_namespace(&self, namespace: &str) -> Arc<dyn Logger + Send + Sync> {
        Arc::new(LoggerFake {
            namespace: Some(join_namespace(self.namespace.as_deref(), namespace)),
            lines: self.lines.clone(),
        })
    }
}
