//! Common reactions: pass-through, threshold signalling and JSON dumps

use crate::error::{TimeItError, TimeItResult};
use crate::setup::Setup;
use crate::template::duration_ms;
use crate::timer::RestartableTimer;
use serde::Serialize;
use std::io::Write;
use std::time::Duration;

/// One line written by [`Setup::dump_json`].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DumpRecord {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub elapsed_ms: f64,
}

impl<'a, T: RestartableTimer> Setup<'a, T> {
    /// Configure no action. Effectively a pass-through, so instrumentation
    /// can be switched off without changing the call site.
    pub fn do_nothing(self) -> Self {
        self.push(|_| Ok(()))
    }

    /// Fail with [`TimeItError::ThresholdExceeded`] if the region takes
    /// strictly longer than `threshold`.
    ///
    /// ```rust
    /// use std::time::Duration;
    /// use timeit::{TimeIt, TimeItError};
    ///
    /// let result = TimeIt::then()
    ///     .signal_if_longer_than(Duration::from_millis(1))
    ///     .run(|| std::thread::sleep(Duration::from_millis(20)));
    /// assert!(matches!(result, Err(TimeItError::ThresholdExceeded { .. })));
    /// ```
    pub fn signal_if_longer_than(self, threshold: Duration) -> Self {
        self.push(move |elapsed| {
            if elapsed > threshold {
                return Err(TimeItError::ThresholdExceeded { elapsed, threshold });
            }
            Ok(())
        })
    }

    /// Like [`signal_if_longer_than`](Setup::signal_if_longer_than) with the
    /// threshold in milliseconds.
    ///
    /// Negative, NaN or infinite thresholds are rejected before the region
    /// starts.
    pub fn signal_if_longer_than_ms(self, ms: f64) -> TimeItResult<Self> {
        let threshold = Duration::try_from_secs_f64(ms / 1000.0).map_err(|_| {
            TimeItError::InvalidConfiguration(format!(
                "threshold must be a finite, non-negative number of milliseconds, got {}",
                ms
            ))
        })?;
        Ok(self.signal_if_longer_than(threshold))
    }

    /// Write the elapsed time to `writer` as one JSON line, then flush.
    ///
    /// Write and serialization failures are returned from the dispatch.
    pub fn dump_json<W>(self, mut writer: W, title: Option<&str>) -> Self
    where
        W: Write + Send + 'a,
    {
        let title = title.map(str::to_string);
        self.push(move |elapsed| {
            let record = DumpRecord {
                title: title.clone(),
                elapsed_ms: duration_ms(elapsed),
            };
            serde_json::to_writer(&mut writer, &record)?;
            writer.write_all(b"\n")?;
            writer.flush()?;
            Ok(())
        })
    }
}
