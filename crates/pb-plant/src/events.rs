//! Ordered, drainable event log.
//!
//! Every state transition, fault, and automatic actuation is appended here
//! for the reporting layer. The log is advisory; control decisions never
//! read it.

use tracing::debug;

#[derive(Debug, Default, Clone)]
pub struct EventLog {
    entries: Vec<String>,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, message: impl Into<String>) {
        let message = message.into();
        debug!(event = %message);
        self.entries.push(message);
    }

    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    /// Take all accumulated entries, leaving the log empty.
    pub fn drain(&mut self) -> Vec<String> {
        core::mem::take(&mut self.entries)
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
