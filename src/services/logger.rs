//! Logger service handed to controllers
//!
//! Controllers format their own context into the message; the HTTP trace
//! span around each request supplies method, path and timing.

/// Severity-tagged message sink
pub trait LoggerService: Send + Sync {
    fn log_info(&self, message: &str);
    fn log_warn(&self, message: &str);
    fn log_error(&self, message: &str);
}

/// Forwards messages to the `tracing` subscriber installed by the binary
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingLogger;

impl LoggerService for TracingLogger {
    fn log_info(&self, message: &str) {
        tracing::info!("{}", message);
    }

    fn log_warn(&self, message: &str) {
        tracing::warn!("{}", message);
    }

    fn log_error(&self, message: &str) {
        tracing::error!("{}", message);
    }
}

/// Keeps every message in memory, for assertions in tests
#[cfg(test)]
#[derive(Debug, Default)]
pub struct RecordingLogger {
    entries: std::sync::Mutex<Vec<(tracing::Level, String)>>,
}

#[cfg(test)]
impl RecordingLogger {
    pub fn entries(&self) -> Vec<(tracing::Level, String)> {
        self.entries.lock().unwrap().clone()
    }

    pub fn messages_at(&self, level: tracing::Level) -> Vec<String> {
        self.entries()
            .into_iter()
            .filter(|(l, _)| *l == level)
            .map(|(_, m)| m)
            .collect()
    }

    fn push(&self, level: tracing::Level, message: &str) {
        self.entries.lock().unwrap().push((level, message.to_string()));
    }
}

#[cfg(test)]
impl LoggerService for RecordingLogger {
    fn log_info(&self, message: &str) {
        self.push(tracing::Level::INFO, message);
    }

    fn log_warn(&self, message: &str) {
        self.push(tracing::Level::WARN, message);
    }

    fn log_error(&self, message: &str) {
        self.push(tracing::Level::ERROR, message);
    }
}
