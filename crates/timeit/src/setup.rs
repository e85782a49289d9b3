//! The reaction registry and its scope guard
//!
//! A [`Setup`] owns one timer and an ordered list of reactions. It is also
//! the guard for the timed region: releasing it stops the timer and runs
//! every reaction, in the order they were configured, with the same elapsed
//! time. The first failing reaction ends the dispatch.

use crate::config::{RestartPolicy, TimeItConfig};
use crate::error::{TimeItError, TimeItResult};
use crate::template::duration_ms;
use crate::timer::{MonotonicTimer, RestartableTimer};
use std::fmt;
use std::future::Future;
use std::time::Duration;

/// A configured reaction to the elapsed time of a region.
pub type Reaction<'a> = Box<dyn FnMut(Duration) -> TimeItResult<()> + Send + 'a>;

/// Lifecycle of a registry. There is no way back from `Released`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegionState {
    /// No reaction configured and the timer not started yet
    Unconfigured,
    /// Timer running, reactions being appended
    Configuring,
    /// Timer stopped and reactions dispatched
    Released,
}

/// Gives access to the object a handle is chained to.
pub trait Chainable: Sized {
    type Target;

    /// Continue configuring.
    fn and(self) -> Self::Target;
}

/// Measures a region of code and reacts to how long it took.
///
/// Configure reactions, keep the handle alive for the duration of the
/// region, then let it go out of scope (or call [`finish`](Setup::finish)).
/// Reactions should only be added before the region starts.
///
/// # Release and errors
///
/// [`finish`](Setup::finish), [`run`](Setup::run) and
/// [`run_async`](Setup::run_async) return the first reaction error.
/// Dropping the handle dispatches too; a reaction error there is raised as
/// a panic whose payload is the [`TimeItError`]. If the thread is already
/// panicking the error is logged instead and the original panic continues.
///
/// # Example
///
/// ```rust
/// use std::time::Duration;
/// use timeit::{Chainable, MemorySink, Level, TimeIt};
///
/// let sink = MemorySink::new();
/// {
///     let _guard = TimeIt::then()
///         .log_at(&sink, Level::Information)
///         .and()
///         .signal_if_longer_than(Duration::from_secs(5));
///     // ... timed work ...
/// }
/// assert_eq!(sink.len(), 1);
/// ```
pub struct Setup<'a, T: RestartableTimer = MonotonicTimer> {
    timer: T,
    reactions: Vec<Reaction<'a>>,
    state: RegionState,
    config: TimeItConfig,
}

impl<'a, T: RestartableTimer> Setup<'a, T> {
    /// Create a registry over `timer` with default settings.
    pub fn new(timer: T) -> Self {
        Self::with_config(timer, TimeItConfig::default())
    }

    /// Create a registry over `timer` with the given settings.
    pub fn with_config(mut timer: T, config: TimeItConfig) -> Self {
        let state = match config.restart_policy {
            RestartPolicy::OnConstruction => {
                timer.restart();
                RegionState::Configuring
            }
            RestartPolicy::OnFirstReaction => RegionState::Unconfigured,
        };

        Self {
            timer,
            reactions: Vec::new(),
            state,
            config,
        }
    }

    /// Current lifecycle state.
    pub fn state(&self) -> RegionState {
        self.state
    }

    /// Number of configured reactions.
    pub fn len(&self) -> usize {
        self.reactions.len()
    }

    /// Whether no reaction has been configured.
    pub fn is_empty(&self) -> bool {
        self.reactions.is_empty()
    }

    /// Settings this registry was created with.
    pub fn config(&self) -> &TimeItConfig {
        &self.config
    }

    /// Configure an action to perform with the elapsed time.
    ///
    /// ```rust
    /// use std::time::Duration;
    /// use timeit::TimeIt;
    ///
    /// let mut measured = Duration::ZERO;
    /// TimeIt::then()
    ///     .configure(|elapsed| measured = elapsed)
    ///     .run(|| std::thread::sleep(Duration::from_millis(1)))
    ///     .unwrap();
    /// assert!(measured >= Duration::from_millis(1));
    /// ```
    pub fn configure<F>(self, mut reaction: F) -> Self
    where
        F: FnMut(Duration) + Send + 'a,
    {
        self.push(move |elapsed| {
            reaction(elapsed);
            Ok(())
        })
    }

    /// Configure an action that may fail.
    ///
    /// An error stops the dispatch; reactions configured after this one
    /// don't run.
    pub fn try_configure<F, E>(self, mut reaction: F) -> Self
    where
        F: FnMut(Duration) -> Result<(), E> + Send + 'a,
        E: Into<TimeItError>,
    {
        self.push(move |elapsed| reaction(elapsed).map_err(Into::into))
    }

    pub(crate) fn push<F>(mut self, reaction: F) -> Self
    where
        F: FnMut(Duration) -> TimeItResult<()> + Send + 'a,
    {
        if self.state == RegionState::Unconfigured {
            self.timer.restart();
            self.state = RegionState::Configuring;
        }
        self.reactions.push(Box::new(reaction));
        self
    }

    /// End the region now and dispatch.
    pub fn finish(mut self) -> TimeItResult<()> {
        self.release()
    }

    /// Time `region`, then dispatch.
    ///
    /// If `region` panics the reactions still run while unwinding.
    pub fn run<R>(mut self, region: impl FnOnce() -> R) -> TimeItResult<R> {
        let output = region();
        self.release()?;
        Ok(output)
    }

    /// Time a future until it completes, then dispatch.
    ///
    /// Dropping the returned future before completion still dispatches.
    pub async fn run_async<F: Future>(mut self, region: F) -> TimeItResult<F::Output> {
        let output = region.await;
        self.release()?;
        Ok(output)
    }

    fn release(&mut self) -> TimeItResult<()> {
        if self.state == RegionState::Released {
            return Ok(());
        }

        self.timer.stop();
        self.state = RegionState::Released;
        let elapsed = self.timer.elapsed();

        tracing::trace!(
            target: "timeit",
            elapsed_ms = duration_ms(elapsed),
            reactions = self.reactions.len(),
            "region completed"
        );

        for reaction in self.reactions.iter_mut() {
            reaction(elapsed)?;
        }
        Ok(())
    }
}

impl<'a, T: RestartableTimer> Chainable for Setup<'a, T> {
    type Target = Self;

    fn and(self) -> Self {
        self
    }
}

impl<T: RestartableTimer> Drop for Setup<'_, T> {
    fn drop(&mut self) {
        if let Err(err) = self.release() {
            if std::thread::panicking() {
                tracing::error!(
                    target: "timeit",
                    error = %err,
                    "reaction failed while the region was unwinding"
                );
            } else {
                std::panic::panic_any(err);
            }
        }
    }
}

impl<T: RestartableTimer> fmt::Debug for Setup<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Setup")
            .field("state", &self.state)
            .field("reactions", &self.reactions.len())
            .field("restart_policy", &self.config.restart_policy)
            .finish_non_exhaustive()
    }
}
