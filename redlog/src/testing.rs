//! A sink that keeps records in memory, for tests.

use std::sync::{
    atomic::{AtomicBool, Ordering},
    Mutex, PoisonError,
};

use crate::{
    pipeline::{Level, LogRecord},
    sink::LogSink,
    value::Value,
};

/// An owned copy of a [`LogRecord`].
#[derive(Clone, Debug, PartialEq)]
pub struct CapturedRecord {
    /// Severity.
    pub level: Level,
    /// Unrendered template.
    pub template: String,
    /// Rendered message.
    pub message: String,
    /// `(path, value)` pairs in emission order.
    pub properties: Vec<(String, Value)>,
}

impl CapturedRecord {
    /// Looks up a property by exact path.
    pub fn get(&self, path: &str) -> Option<&Value> {
        self.properties
            .iter()
            .find(|(key, _)| key == path)
            .map(|(_, value)| value)
    }

    /// Paths in emission order.
    pub fn paths(&self) -> Vec<&str> {
        self.properties.iter().map(|(key, _)| key.as_str()).collect()
    }
}

/// Records everything it accepts. Can be switched off to test the gate.
#[derive(Debug)]
pub struct CapturingSink {
    enabled: AtomicBool,
    min_level: Level,
    records: Mutex<Vec<CapturedRecord>>,
}

impl CapturingSink {
    /// Enabled for every level.
    pub const fn new() -> Self {
        Self::with_min_level(Level::Trace)
    }

    /// Enabled for `min_level` and above.
    pub const fn with_min_level(min_level: Level) -> Self {
        Self {
            enabled: AtomicBool::new(true),
            min_level,
            records: Mutex::new(Vec::new()),
        }
    }

    /// Disabled for every level.
    pub const fn disabled() -> Self {
        Self {
            enabled: AtomicBool::new(false),
            min_level: Level::Trace,
            records: Mutex::new(Vec::new()),
        }
    }

    /// Turns the sink on or off.
    pub fn set_enabled(&self, enabled: bool) {
        self.enabled.store(enabled, Ordering::Relaxed);
    }

    /// Snapshot of the records captured so far.
    pub fn records(&self) -> Vec<CapturedRecord> {
        self.lock().clone()
    }

    /// Removes and returns the records captured so far.
    pub fn take(&self) -> Vec<CapturedRecord> {
        std::mem::take(&mut *self.lock())
    }

    /// Number of records captured so far.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Returns `true` if nothing was captured.
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<CapturedRecord>> {
        self.records.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for CapturingSink {
    fn default() -> Self {
        Self::new()
    }
}

impl LogSink for CapturingSink {
    fn is_enabled(&self, level: Level) -> bool {
        self.enabled.load(Ordering::Relaxed) && level >= self.min_level
    }

    fn accept(&self, record: &LogRecord<'_>) {
        let captured = CapturedRecord {
            level: record.level(),
            template: record.template().to_owned(),
            message: record.message().to_owned(),
            properties: record
                .properties()
                .iter()
                .map(|property| (property.path().to_owned(), property.value().clone()))
                .collect(),
        };
        self.lock().push(captured);
    }
}
