// src/internal/registry/process.rs

use std::sync::LazyLock;

use super::registry::LoggerRegistry;
use crate::internal::config::LoggerConfig;
use crate::internal::logger::{BuildError, Logger};

static GLOBAL: LazyLock<LoggerRegistry> = LazyLock::new(LoggerRegistry::new);

/// The process-wide registry.
pub fn global() -> &'static LoggerRegistry {
    &GLOBAL
}

/// Initialize the process-wide default logger. Optional: the first call to
/// [`get`] or [`named`] falls back to [`LoggerConfig::fallback`].
pub fn init(config: LoggerConfig) -> Result<(), BuildError> {
    global().initialize(config)
}

/// The process-wide default logger. Panics if the fallback cannot be built.
pub fn get() -> Logger {
    global().default_logger()
}

/// A named logger derived from the process-wide default.
pub fn named(name: &str) -> Logger {
    global().named(name)
}
