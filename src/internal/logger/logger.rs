// src/internal/logger/logger.rs

use std::backtrace::Backtrace;
use std::fmt;
use std::io;
use std::panic::Location;
use std::sync::Arc;

use tracing::field::{display, DisplayValue};
use tracing::{Dispatch, Level, Span};

type FlushFn = Box<dyn Fn() -> io::Result<()> + Send + Sync>;

/// Subscriber stack shared by a logger and every logger derived from it.
struct Backend {
    dispatch: Dispatch,
    flush: FlushFn,
    capture_caller: bool,
    capture_stacktrace: bool,
}

impl fmt::Debug for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Backend")
            .field("dispatch", &self.dispatch)
            .field("capture_caller", &self.capture_caller)
            .field("capture_stacktrace", &self.capture_stacktrace)
            .finish_non_exhaustive()
    }
}

/// Fields stamped on every record a handle emits. Built by
/// [`Logger::record_context`] at the call site; used by the `log_*!` macros.
#[doc(hidden)]
pub struct RecordContext<'a> {
    pub logger: Option<&'a str>,
    pub caller: Option<DisplayValue<&'static Location<'static>>>,
    pub stacktrace: Option<DisplayValue<Backtrace>>,
}

/// Handle that emits leveled, structured records to its own subscriber.
///
/// Records never go through the thread or global default subscriber, so
/// several independently configured loggers can live in one process.
/// Cloning is cheap; clones and named derivatives share one backend.
#[derive(Debug, Clone)]
pub struct Logger {
    backend: Arc<Backend>,
    name: Option<Arc<str>>,
    fields: Option<Span>,
}

impl Logger {
    pub(crate) fn new(
        dispatch: Dispatch,
        flush: impl Fn() -> io::Result<()> + Send + Sync + 'static,
        capture_caller: bool,
        capture_stacktrace: bool,
    ) -> Self {
        Self {
            backend: Arc::new(Backend {
                dispatch,
                flush: Box::new(flush),
                capture_caller,
                capture_stacktrace,
            }),
            name: None,
            fields: None,
        }
    }

    /// Dotted name of this logger, `None` for a root logger.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Derive a logger whose records carry `name` appended to this logger's
    /// name (`"http"` then `"client"` gives `"http.client"`). Bound fields
    /// are kept.
    pub fn named(&self, name: &str) -> Logger {
        let name = match (&self.name, name) {
            (parent, "") => parent.clone(),
            (None, name) => Some(Arc::from(name)),
            (Some(parent), name) => Some(Arc::from(format!("{parent}.{name}"))),
        };
        Logger {
            backend: Arc::clone(&self.backend),
            name,
            fields: self.fields.clone(),
        }
    }

    /// Derive a logger that emits every record inside `fields`.
    ///
    /// The span must be created through [`Logger::enter`] on this logger so
    /// it belongs to the same subscriber and nests under fields bound
    /// earlier; [`log_with!`](crate::log_with) does both.
    pub fn with(&self, fields: Span) -> Logger {
        Logger {
            backend: Arc::clone(&self.backend),
            name: self.name.clone(),
            fields: Some(fields),
        }
    }

    /// True when both handles write through the same subscriber.
    pub fn shares_backend(&self, other: &Logger) -> bool {
        Arc::ptr_eq(&self.backend, &other.backend)
    }

    /// Whether a record at `level` would pass this logger's filter.
    pub fn enabled(&self, level: Level) -> bool {
        self.enter(|| match level {
            Level::ERROR => tracing::enabled!(Level::ERROR),
            Level::WARN => tracing::enabled!(Level::WARN),
            Level::INFO => tracing::enabled!(Level::INFO),
            Level::DEBUG => tracing::enabled!(Level::DEBUG),
            _ => tracing::enabled!(Level::TRACE),
        })
    }

    /// Run `f` with this logger's subscriber as the thread default, so plain
    /// `tracing` macros inside it are routed here.
    ///
    /// Records emitted this way sit inside the bound fields and, for a named
    /// logger, inside a `logger` span carrying the name.
    pub fn in_scope<T>(&self, f: impl FnOnce() -> T) -> T {
        self.enter(|| match self.name() {
            // error level so the span passes every filter
            Some(name) => tracing::error_span!("logger", logger = name).in_scope(f),
            None => f(),
        })
    }

    /// Run `f` on this logger's subscriber inside its bound fields.
    #[doc(hidden)]
    pub fn enter<T>(&self, f: impl FnOnce() -> T) -> T {
        tracing::dispatcher::with_default(&self.backend.dispatch, || match &self.fields {
            Some(span) => span.in_scope(f),
            None => f(),
        })
    }

    #[doc(hidden)]
    #[track_caller]
    pub fn record_context(&self, level: Level) -> RecordContext<'_> {
        let caller = if self.backend.capture_caller {
            Some(display(Location::caller()))
        } else {
            None
        };
        let stacktrace = if level == Level::ERROR && self.backend.capture_stacktrace {
            Some(display(Backtrace::force_capture()))
        } else {
            None
        };
        RecordContext {
            logger: self.name(),
            caller,
            stacktrace,
        }
    }

    /// Flush the outputs this logger writes to.
    pub fn flush(&self) -> io::Result<()> {
        (self.backend.flush)()
    }

    #[track_caller]
    pub fn log(&self, level: Level, message: &str) {
        match level {
            Level::ERROR => crate::log_event!(self, Level::ERROR, message = message),
            Level::WARN => crate::log_event!(self, Level::WARN, message = message),
            Level::INFO => crate::log_event!(self, Level::INFO, message = message),
            Level::DEBUG => crate::log_event!(self, Level::DEBUG, message = message),
            _ => crate::log_event!(self, Level::TRACE, message = message),
        }
    }

    #[track_caller]
    pub fn trace(&self, message: &str) {
        self.log(Level::TRACE, message);
    }

    #[track_caller]
    pub fn debug(&self, message: &str) {
        self.log(Level::DEBUG, message);
    }

    #[track_caller]
    pub fn info(&self, message: &str) {
        self.log(Level::INFO, message);
    }

    #[track_caller]
    pub fn warn(&self, message: &str) {
        self.log(Level::WARN, message);
    }

    #[track_caller]
    pub fn error(&self, message: &str) {
        self.log(Level::ERROR, message);
    }
}

/// Emit one record through a logger, with `tracing` field syntax:
/// `log_event!(logger, Level::INFO, user = 7, "saved {}", id)`.
///
/// The level must be a constant. The record carries the logger's name,
/// caller and stack trace like the `Logger` methods do.
#[macro_export]
macro_rules! log_event {
    ($logger:expr, $lvl:expr, $($arg:tt)+) => {{
        let logger: &$crate::Logger = &$logger;
        let ctx = logger.record_context($lvl);
        logger.enter(|| {
            $crate::__tracing::event!(
                $lvl,
                logger = ctx.logger,
                caller = ctx.caller,
                stacktrace = ctx.stacktrace,
                $($arg)+
            )
        })
    }};
}

/// Debug record: `log_debug!(logger, "x = {}", x)` or
/// `log_debug!(logger, key = value, "message")`.
#[macro_export]
macro_rules! log_debug {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log_event!($logger, $crate::Level::DEBUG, $($arg)+)
    };
}

#[macro_export]
macro_rules! log_info {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log_event!($logger, $crate::Level::INFO, $($arg)+)
    };
}

#[macro_export]
macro_rules! log_warn {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log_event!($logger, $crate::Level::WARN, $($arg)+)
    };
}

#[macro_export]
macro_rules! log_error {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log_event!($logger, $crate::Level::ERROR, $($arg)+)
    };
}

/// Derive a logger with pre-bound fields:
/// `let req = log_with!(logger, request_id = 42);`.
#[macro_export]
macro_rules! log_with {
    ($logger:expr, $($fields:tt)+) => {{
        let logger: &$crate::Logger = &$logger;
        let fields = logger.enter(|| $crate::__tracing::error_span!("fields", $($fields)+));
        logger.with(fields)
    }};
}
