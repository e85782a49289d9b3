//! Logging reactions
//!
//! The elapsed time is always the last positional argument. Templates are
//! only checked when the region is released: a template whose placeholder
//! count isn't `args + 1` fails the dispatch with
//! [`TimeItError::TemplateArgumentMismatch`] and the sink is not called.

use crate::error::TimeItError;
use crate::setup::Setup;
use crate::sink::{Level, LogSink};
use crate::template::{LogValue, Template};
use crate::timer::RestartableTimer;

impl<'a, T: RestartableTimer> Setup<'a, T> {
    /// Log the elapsed time with the default level and template.
    ///
    /// ```rust
    /// use timeit::{MemorySink, TimeIt};
    ///
    /// let sink = MemorySink::new();
    /// TimeIt::then().log(&sink).finish().unwrap();
    /// assert!(sink.records()[0].message.starts_with("Code region executed in"));
    /// ```
    pub fn log<S>(self, sink: S) -> Self
    where
        S: LogSink + Send + 'a,
    {
        let level = self.config().default_level;
        let template = self.config().default_template.clone();
        self.log_with(sink, level, template, Vec::<LogValue>::new())
    }

    /// Log the elapsed time at `level` with the default template.
    pub fn log_at<S>(self, sink: S, level: Level) -> Self
    where
        S: LogSink + Send + 'a,
    {
        let template = self.config().default_template.clone();
        self.log_with(sink, level, template, Vec::<LogValue>::new())
    }

    /// Log the elapsed time with a custom template at the default level.
    ///
    /// The template should hold exactly one placeholder.
    pub fn log_template<S>(self, sink: S, template: impl Into<String>) -> Self
    where
        S: LogSink + Send + 'a,
    {
        let level = self.config().default_level;
        self.log_with(sink, level, template, Vec::<LogValue>::new())
    }

    /// Log `template` at `level` with `args` followed by the elapsed time.
    ///
    /// [`Level::None`] registers a reaction that does nothing.
    ///
    /// ```rust
    /// use timeit::{Level, MemorySink, TimeIt};
    ///
    /// let sink = MemorySink::new();
    /// TimeIt::then()
    ///     .log_with(&sink, Level::Debug, "Sorted {Count} books in {Elapsed}", [120u64])
    ///     .finish()
    ///     .unwrap();
    /// assert!(sink.records()[0].message.starts_with("Sorted 120 books in"));
    /// ```
    pub fn log_with<S, I, V>(self, sink: S, level: Level, template: impl Into<String>, args: I) -> Self
    where
        S: LogSink + Send + 'a,
        I: IntoIterator<Item = V>,
        V: Into<LogValue>,
    {
        if level == Level::None {
            return self.do_nothing();
        }

        let template = template.into();
        let args: Vec<LogValue> = args.into_iter().map(Into::into).collect();

        self.push(move |elapsed| {
            let placeholders = Template::new(&template).placeholder_count();
            if placeholders != args.len() + 1 {
                return Err(TimeItError::TemplateArgumentMismatch {
                    placeholders,
                    arguments: args.len(),
                });
            }

            let mut values = Vec::with_capacity(args.len() + 1);
            values.extend(args.iter().cloned());
            values.push(LogValue::Elapsed(elapsed));

            match level {
                Level::Trace => sink.trace(&template, &values),
                Level::Debug => sink.debug(&template, &values),
                Level::Information => sink.info(&template, &values),
                Level::Warning => sink.warn(&template, &values),
                Level::Error => sink.error(&template, &values),
                Level::Critical => sink.critical(&template, &values),
                Level::None => {}
            }
            Ok(())
        })
    }
}
