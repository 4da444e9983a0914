//! Where redacted records go.
//!
//! A sink only ever sees [`LogRecord`]s whose values already went through
//! the redactor registry. Formatting and transport are its own business.

use std::sync::Arc;

use crate::pipeline::{Level, LogRecord};

/// Consumer of redacted log records.
pub trait LogSink {
    /// Cheap gate checked before any field is read.
    fn is_enabled(&self, level: Level) -> bool;

    /// Receives one record. Must not panic on I/O failure.
    fn accept(&self, record: &LogRecord<'_>);
}

impl<S> LogSink for &S
where
    S: LogSink + ?Sized,
{
    fn is_enabled(&self, level: Level) -> bool {
        (**self).is_enabled(level)
    }

    fn accept(&self, record: &LogRecord<'_>) {
        (**self).accept(record);
    }
}

impl<S> LogSink for Box<S>
where
    S: LogSink + ?Sized,
{
    fn is_enabled(&self, level: Level) -> bool {
        (**self).is_enabled(level)
    }

    fn accept(&self, record: &LogRecord<'_>) {
        (**self).accept(record);
    }
}

impl<S> LogSink for Arc<S>
where
    S: LogSink + ?Sized,
{
    fn is_enabled(&self, level: Level) -> bool {
        (**self).is_enabled(level)
    }

    fn accept(&self, record: &LogRecord<'_>) {
        (**self).accept(record);
    }
}

#[cfg(feature = "serde")]
pub use json::JsonSink;

#[cfg(feature = "serde")]
mod json {
    use std::{
        fmt,
        io::{self, Write},
        sync::Mutex,
    };

    use super::LogSink;
    use crate::pipeline::{Level, LogRecord};

    /// Writes each record as one JSON object per line.
    ///
    /// ```rust
    /// use redlog::{JsonSink, Level, LogSink};
    ///
    /// let sink = JsonSink::new(Vec::new()).with_min_level(Level::Warning);
    /// assert!(!sink.is_enabled(Level::Info));
    /// assert!(sink.is_enabled(Level::Error));
    /// ```
    pub struct JsonSink<W> {
        writer: Mutex<W>,
        min_level: Level,
    }

    impl JsonSink<io::Stdout> {
        /// A sink writing to standard output at [`Level::Info`] and above.
        pub fn stdout() -> Self {
            Self::new(io::stdout())
        }
    }

    impl<W> JsonSink<W>
    where
        W: Write,
    {
        /// Wraps `writer`. The minimum level defaults to [`Level::Info`].
        pub const fn new(writer: W) -> Self {
            Self {
                writer: Mutex::new(writer),
                min_level: Level::Info,
            }
        }

        /// Drops records below `min_level`.
        #[must_use]
        pub const fn with_min_level(mut self, min_level: Level) -> Self {
            self.min_level = min_level;
            self
        }

        /// Returns the wrapped writer.
        pub fn into_inner(self) -> W {
            self.writer
                .into_inner()
                .unwrap_or_else(std::sync::PoisonError::into_inner)
        }

        fn write_record(&self, record: &LogRecord<'_>) -> io::Result<()> {
            let mut line = serde_json::to_vec(record)?;
            line.push(b'\n');
            let mut writer = self
                .writer
                .lock()
                .unwrap_or_else(std::sync::PoisonError::into_inner);
            writer.write_all(&line)?;
            writer.flush()
        }
    }

    impl<W> LogSink for JsonSink<W>
    where
        W: Write,
    {
        fn is_enabled(&self, level: Level) -> bool {
            level >= self.min_level
        }

        fn accept(&self, record: &LogRecord<'_>) {
            if let Err(err) = self.write_record(record) {
                tracing::warn!(error = %err, "failed to write log record");
            }
        }
    }

    impl<W> fmt::Debug for JsonSink<W> {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.debug_struct("JsonSink")
                .field("min_level", &self.min_level)
                .finish_non_exhaustive()
        }
    }
}
