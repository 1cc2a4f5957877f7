pub mod cli;
pub mod internal;

// Re-export commonly used types
pub use internal::config::LoggerConfig;
pub use internal::logger::{build, build_with_writer, BuildError, Logger};
pub use internal::registry::{get, global, init, named, LoggerProvider, LoggerRegistry};
pub use tracing::{Level, Span};

// Used by the log_* macros so callers don't need their own tracing dependency.
#[doc(hidden)]
pub use tracing as __tracing;
