//! Log sinks that the logging reactions write to

use crate::template::{LogValue, Template};
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Severity of a log record.
///
/// `None` disables logging: a logging reaction configured with it stays
/// registered but never reaches the sink.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    Trace,
    Debug,
    Information,
    Warning,
    Error,
    Critical,
    None,
}

impl Default for Level {
    fn default() -> Self {
        Self::Trace
    }
}

/// A destination for structured log records.
///
/// Implementors provide [`log`](LogSink::log); the per-level entry points
/// forward to it unless overridden.
pub trait LogSink {
    /// Whether records at `level` would be emitted.
    fn is_enabled(&self, level: Level) -> bool;

    /// Emit `template` with its positional `args`.
    fn log(&self, level: Level, template: &str, args: &[LogValue]);

    /// Emit at `Trace`.
    fn trace(&self, template: &str, args: &[LogValue]) {
        self.log(Level::Trace, template, args);
    }

    /// Emit at `Debug`.
    fn debug(&self, template: &str, args: &[LogValue]) {
        self.log(Level::Debug, template, args);
    }

    /// Emit at `Information`.
    fn info(&self, template: &str, args: &[LogValue]) {
        self.log(Level::Information, template, args);
    }

    /// Emit at `Warning`.
    fn warn(&self, template: &str, args: &[LogValue]) {
        self.log(Level::Warning, template, args);
    }

    /// Emit at `Error`.
    fn error(&self, template: &str, args: &[LogValue]) {
        self.log(Level::Error, template, args);
    }

    /// Emit at `Critical`.
    fn critical(&self, template: &str, args: &[LogValue]) {
        self.log(Level::Critical, template, args);
    }
}

impl<S: LogSink + ?Sized> LogSink for &S {
    fn is_enabled(&self, level: Level) -> bool {
        (**self).is_enabled(level)
    }

    fn log(&self, level: Level, template: &str, args: &[LogValue]) {
        (**self).log(level, template, args)
    }
}

impl<S: LogSink + ?Sized> LogSink for Box<S> {
    fn is_enabled(&self, level: Level) -> bool {
        (**self).is_enabled(level)
    }

    fn log(&self, level: Level, template: &str, args: &[LogValue]) {
        (**self).log(level, template, args)
    }
}

impl<S: LogSink + ?Sized> LogSink for Arc<S> {
    fn is_enabled(&self, level: Level) -> bool {
        (**self).is_enabled(level)
    }

    fn log(&self, level: Level, template: &str, args: &[LogValue]) {
        (**self).log(level, template, args)
    }
}

/// A record captured by [`MemorySink`].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LogRecord {
    pub level: Level,
    pub template: String,
    pub args: Vec<LogValue>,
    /// The template rendered with `args`, or the raw template if they don't fit
    pub message: String,
}

/// A sink that keeps records in memory.
#[derive(Debug, Default)]
pub struct MemorySink {
    records: Mutex<Vec<LogRecord>>,
    min_level: Level,
}

impl MemorySink {
    /// Create a sink accepting every level.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a sink that ignores records below `level`.
    pub fn with_min_level(level: Level) -> Self {
        Self {
            records: Mutex::new(Vec::new()),
            min_level: level,
        }
    }

    /// Snapshot of the records captured so far.
    pub fn records(&self) -> Vec<LogRecord> {
        self.lock().clone()
    }

    /// Number of records captured so far.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Whether no record has been captured.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drop all captured records.
    pub fn clear(&self) {
        self.lock().clear();
    }

    // A panicking writer can't leave a half-pushed record, so poisoned data is still valid
    fn lock(&self) -> MutexGuard<'_, Vec<LogRecord>> {
        self.records.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl LogSink for MemorySink {
    fn is_enabled(&self, level: Level) -> bool {
        level != Level::None && level >= self.min_level
    }

    fn log(&self, level: Level, template: &str, args: &[LogValue]) {
        if !self.is_enabled(level) {
            return;
        }

        let message = Template::new(template)
            .render(args)
            .unwrap_or_else(|_| template.to_string());

        self.lock().push(LogRecord {
            level,
            template: template.to_string(),
            args: args.to_vec(),
            message,
        });
    }
}

/// A sink forwarding records to `tracing` under the `timeit` target.
///
/// `Critical` is emitted at `ERROR`, the most severe `tracing` level.
#[cfg(feature = "tracing-sink")]
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

#[cfg(feature = "tracing-sink")]
impl LogSink for TracingSink {
    fn is_enabled(&self, level: Level) -> bool {
        match level {
            Level::Trace => tracing::enabled!(target: "timeit", tracing::Level::TRACE),
            Level::Debug => tracing::enabled!(target: "timeit", tracing::Level::DEBUG),
            Level::Information => tracing::enabled!(target: "timeit", tracing::Level::INFO),
            Level::Warning => tracing::enabled!(target: "timeit", tracing::Level::WARN),
            Level::Error | Level::Critical => {
                tracing::enabled!(target: "timeit", tracing::Level::ERROR)
            }
            Level::None => false,
        }
    }

    fn log(&self, level: Level, template: &str, args: &[LogValue]) {
        let message = Template::new(template)
            .render(args)
            .unwrap_or_else(|_| template.to_string());

        match level {
            Level::Trace => tracing::trace!(target: "timeit", template, "{}", message),
            Level::Debug => tracing::debug!(target: "timeit", template, "{}", message),
            Level::Information => tracing::info!(target: "timeit", template, "{}", message),
            Level::Warning => tracing::warn!(target: "timeit", template, "{}", message),
            Level::Error => tracing::error!(target: "timeit", template, "{}", message),
            Level::Critical => {
                tracing::error!(target: "timeit", template, critical = true, "{}", message)
            }
            Level::None => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_memory_sink_records_rendered_message() {
        let sink = MemorySink::new();
        sink.info("Loaded {Count} books in {Elapsed}", &[12u64.into(), Duration::from_millis(3).into()]);

        let records = sink.records();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].level, Level::Information);
        assert_eq!(records[0].message, "Loaded 12 books in 3ms");
    }

    #[test]
    fn test_memory_sink_min_level() {
        let sink = MemorySink::with_min_level(Level::Warning);
        assert!(!sink.is_enabled(Level::Debug));
        assert!(sink.is_enabled(Level::Critical));
        assert!(!sink.is_enabled(Level::None));

        sink.debug("ignored {Elapsed}", &[Duration::ZERO.into()]);
        assert!(sink.is_empty());
        sink.critical("kept {Elapsed}", &[Duration::ZERO.into()]);
        assert_eq!(sink.len(), 1);

        sink.clear();
        assert!(sink.is_empty());
    }

    #[test]
    fn test_memory_sink_survives_poisoned_lock() {
        let sink = Arc::new(MemorySink::new());
        sink.info("before {Elapsed}", &[Duration::ZERO.into()]);

        let poisoner = Arc::clone(&sink);
        let result = std::thread::spawn(move || {
            let _records = poisoner.records.lock().unwrap();
            panic!("writer crashed");
        })
        .join();
        assert!(result.is_err());
        assert!(sink.records.is_poisoned());

        assert_eq!(sink.len(), 1);
        assert_eq!(sink.records().len(), 1);
        assert!(!sink.is_empty());

        sink.info("after {Elapsed}", &[Duration::ZERO.into()]);
        assert_eq!(sink.len(), 2);
        assert_eq!(sink.records().len(), sink.len());
    }

    #[test]
    fn test_sink_through_arc_and_reference() {
        let sink = Arc::new(MemorySink::new());
        let shared = Arc::clone(&sink);
        shared.warn("a {Elapsed}", &[Duration::ZERO.into()]);
        (&*sink).error("b {Elapsed}", &[Duration::ZERO.into()]);

        let levels: Vec<_> = sink.records().into_iter().map(|r| r.level).collect();
        assert_eq!(levels, vec![Level::Warning, Level::Error]);
    }

    #[test]
    fn test_level_serde() {
        assert_eq!(serde_json::to_string(&Level::Information).unwrap(), "\"information\"");
        let level: Level = serde_json::from_str("\"none\"").unwrap();
        assert_eq!(level, Level::None);
    }

    #[cfg(feature = "tracing-sink")]
    #[test]
    fn test_tracing_sink_emits_event() {
        use std::io::Write;
        use tracing_subscriber::fmt::MakeWriter;

        #[derive(Clone, Default)]
        struct Buffer(Arc<Mutex<Vec<u8>>>);

        impl Write for Buffer {
            fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
                self.0.lock().unwrap().extend_from_slice(buf);
                Ok(buf.len())
            }

            fn flush(&mut self) -> std::io::Result<()> {
                Ok(())
            }
        }

        impl<'a> MakeWriter<'a> for Buffer {
            type Writer = Buffer;

            fn make_writer(&'a self) -> Self::Writer {
                self.clone()
            }
        }

        let buffer = Buffer::default();
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::INFO)
            .with_ansi(false)
            .with_writer(buffer.clone())
            .finish();

        tracing::subscriber::with_default(subscriber, || {
            assert!(TracingSink.is_enabled(Level::Information));
            assert!(!TracingSink.is_enabled(Level::Debug));
            TracingSink.info("Finished in {Elapsed}", &[Duration::from_millis(7).into()]);
        });

        let output = String::from_utf8(buffer.0.lock().unwrap().clone()).unwrap();
        assert!(output.contains("INFO"), "unexpected output: {}", output);
        assert!(output.contains("Finished in 7ms"), "unexpected output: {}", output);
    }
}
