//! Scoped Code-Region Timing
//!
//! Measure how long a block of code takes and react once it finishes:
//! - Log the elapsed time through a [`LogSink`] with a message template
//! - Fail with [`TimeItError::ThresholdExceeded`] when a time limit is exceeded
//! - Dump the elapsed time as JSON to any writer
//! - Run any custom callback with the elapsed time
//!
//! Reactions run once, in the order they were configured, when the handle
//! returned by [`TimeIt::then`] is released. Release happens on every exit
//! path, including early returns and panics.
//!
//! # Feature Flags
//!
//! - `tracing-sink` (default): Enables [`TracingSink`], forwarding logs to `tracing`
//!
//! # Example
//!
//! ```rust
//! use std::time::Duration;
//! use timeit::prelude::*;
//!
//! let sink = MemorySink::new();
//! let sorted = TimeIt::then()
//!     .log_with(&sink, Level::Information, "Sorted {Count} books in {Elapsed}", [3u64])
//!     .and()
//!     .signal_if_longer_than(Duration::from_secs(1))
//!     .run(|| {
//!         let mut books = vec!["Ulysses", "Emma", "Dracula"];
//!         books.sort();
//!         books
//!     })
//!     .expect("sorting three books is fast");
//!
//! assert_eq!(sorted, ["Dracula", "Emma", "Ulysses"]);
//! assert_eq!(sink.len(), 1);
//! ```

mod config;
mod error;
mod logging;
mod reactions;
mod setup;
mod sink;
mod template;
mod timer;

pub use config::*;
pub use error::{TimeItError, TimeItResult};
pub use reactions::DumpRecord;
pub use setup::{Chainable, Reaction, RegionState, Setup};
pub use sink::*;
pub use template::{LogValue, Template};
pub use timer::*;

/// Re-export for convenience
pub use std::time::Duration;

/// Entry point for timing code regions.
#[derive(Debug, Clone, Copy)]
pub struct TimeIt;

impl TimeIt {
    /// A fresh registry backed by a monotonic timer.
    ///
    /// Every call is independent. With the default settings the timer starts
    /// when the first reaction is configured.
    pub fn then<'a>() -> Setup<'a> {
        Setup::new(MonotonicTimer::new())
    }

    /// A fresh registry using `config`.
    pub fn with_config<'a>(config: &TimeItConfig) -> Setup<'a> {
        Setup::with_config(MonotonicTimer::new(), config.clone())
    }
}

/// Bind a configured handle for the rest of the enclosing block.
///
/// Reactions run when the block ends.
///
/// # Example
///
/// ```rust
/// use timeit::{time_scope, MemorySink, TimeIt};
///
/// let sink = MemorySink::new();
/// {
///     time_scope!(TimeIt::then().log(&sink));
///     // ... work ...
/// }
/// assert_eq!(sink.len(), 1);
/// ```
#[macro_export]
macro_rules! time_scope {
    ($setup:expr) => {
        let _time_scope_guard = $setup;
    };
}

/// A prelude for the most common types.
pub mod prelude {
    pub use crate::time_scope;
    pub use crate::{Chainable, Level, LogSink, MemorySink, Setup, TimeIt, TimeItError};

    #[cfg(feature = "tracing-sink")]
    pub use crate::TracingSink;
}
