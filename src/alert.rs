// src/alert.rs
use std::sync::Mutex;

/// Where blocking, user-facing failure messages go.
pub trait AlertSink: Send + Sync {
    fn alert(&self, message: &str);
}

/// Prints alerts to stderr for the terminal front-end.
#[derive(Debug, Default, Clone, Copy)]
pub struct ConsoleAlerts;

impl AlertSink for ConsoleAlerts {
    fn alert(&self, message: &str) {
        eprintln!("❌ {}", message);
    }
}

/// Collects alerts in memory.
#[derive(Debug, Default)]
pub struct MemoryAlerts {
    messages: Mutex<Vec<String>>,
}

impl MemoryAlerts {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn messages(&self) -> Vec<String> {
        self.messages.lock().map(|m| m.clone()).unwrap_or_default()
    }
}

impl AlertSink for MemoryAlerts {
    fn alert(&self, message: &str) {
        if let Ok(mut messages) = self.messages.lock() {
            messages.push(message.to_string());
        }
    }
}
