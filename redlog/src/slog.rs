//! Adapter that forwards redacted records to a `slog::Logger`.
//!
//! Each emitted property becomes one `slog` key-value pair keyed by its
//! dotted path, so the `dynamic-keys` feature of `slog` is required. Values
//! are emitted with their native `slog` types; markers are emitted as their
//! textual rendering, except [`Value::Absent`] which is emitted as `none`.
//!
//! The adapter never sees unredacted data: it is handed [`LogRecord`]s
//! produced by [`crate::LogPipeline`].

use slog::{Drain, Key, Record, Serializer, KV};

use crate::{
    extract::EmittedProperty,
    pipeline::{Level, LogRecord},
    sink::LogSink,
    value::Value,
};

/// Key under which the unrendered message template is emitted.
pub const TEMPLATE_KEY: &str = "template";

/// A [`LogSink`] backed by a `slog::Logger`.
///
/// The gate defers to the logger's drain, so a logger filtered with
/// `slog::LevelFilter` skips extraction entirely.
#[derive(Clone, Debug)]
pub struct SlogSink {
    logger: slog::Logger,
}

impl SlogSink {
    /// Wraps `logger`.
    pub const fn new(logger: slog::Logger) -> Self {
        Self { logger }
    }

    /// The wrapped logger.
    pub const fn logger(&self) -> &slog::Logger {
        &self.logger
    }
}

impl From<slog::Logger> for SlogSink {
    fn from(logger: slog::Logger) -> Self {
        Self::new(logger)
    }
}

/// Maps a pipeline level onto the `slog` level of the same severity.
pub const fn to_slog_level(level: Level) -> slog::Level {
    match level {
        Level::Trace => slog::Level::Trace,
        Level::Debug => slog::Level::Debug,
        Level::Info => slog::Level::Info,
        Level::Warning => slog::Level::Warning,
        Level::Error => slog::Level::Error,
        Level::Critical => slog::Level::Critical,
    }
}

impl LogSink for SlogSink {
    fn is_enabled(&self, level: Level) -> bool {
        self.logger.is_enabled(to_slog_level(level))
    }

    fn accept(&self, record: &LogRecord<'_>) {
        let static_record = slog::record_static!(to_slog_level(record.level()), "");
        let pairs = RecordPairs {
            template: record.template(),
            properties: record.properties(),
        };
        self.logger.log(&Record::new(
            &static_record,
            &format_args!("{}", record.message()),
            slog::BorrowedKV(&pairs),
        ));
    }
}

struct RecordPairs<'a> {
    template: &'a str,
    properties: &'a [EmittedProperty],
}

impl KV for RecordPairs<'_> {
    fn serialize(&self, _record: &Record<'_>, serializer: &mut dyn Serializer) -> slog::Result {
        serializer.emit_str(Key::from(TEMPLATE_KEY), self.template)?;
        for property in self.properties {
            emit_value(serializer, Key::from(property.path().to_owned()), property.value())?;
        }
        Ok(())
    }
}

fn emit_value(serializer: &mut dyn Serializer, key: Key, value: &Value) -> slog::Result {
    match value {
        Value::Str(text) => serializer.emit_str(key, text),
        Value::Bool(flag) => serializer.emit_bool(key, *flag),
        Value::I64(number) => serializer.emit_i64(key, *number),
        Value::U64(number) => serializer.emit_u64(key, *number),
        Value::F64(number) => serializer.emit_f64(key, *number),
        Value::Absent => serializer.emit_none(key),
        Value::ExtractionFailed | Value::Truncated => {
            serializer.emit_str(key, &value.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::to_slog_level;
    use crate::Level;

    #[test]
    fn levels_map_one_to_one() {
        assert_eq!(to_slog_level(Level::Trace), slog::Level::Trace);
        assert_eq!(to_slog_level(Level::Warning), slog::Level::Warning);
        assert_eq!(to_slog_level(Level::Critical), slog::Level::Critical);
    }
}
