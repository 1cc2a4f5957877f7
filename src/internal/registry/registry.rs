// src/internal/registry/registry.rs

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::internal::config::LoggerConfig;
use crate::internal::logger::{self, BuildError, Logger};

/// Source of default and named loggers. Call sites depend on this rather
/// than on a concrete registry so tests can hand them an isolated one.
pub trait LoggerProvider: Send + Sync {
    /// Build a logger from `config` and make it the default.
    fn initialize(&self, config: LoggerConfig) -> Result<(), BuildError>;

    /// The default logger, built from the fallback config on first use.
    fn default_logger(&self) -> Logger;

    /// A logger derived from the default and named `name`, built once per name.
    fn named(&self, name: &str) -> Logger;
}

#[derive(Default)]
struct State {
    default: Option<Logger>,
    named: HashMap<String, Logger>,
}

/// Thread-safe holder of one default logger and its named derivatives.
///
/// Re-initializing replaces the default and empties the named cache, so
/// loggers requested afterwards derive from the new default. Handles that
/// were already handed out keep writing through the old one.
pub struct LoggerRegistry {
    fallback: LoggerConfig,
    state: RwLock<State>,
}

impl Default for LoggerRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl LoggerRegistry {
    pub fn new() -> Self {
        Self::with_fallback(LoggerConfig::fallback())
    }

    /// Registry whose implicit initialization uses `fallback`.
    pub fn with_fallback(fallback: LoggerConfig) -> Self {
        Self {
            fallback,
            state: RwLock::new(State::default()),
        }
    }

    /// Build a logger from `config` and install it as the default.
    ///
    /// On failure the previous default, if any, stays in place.
    pub fn initialize(&self, config: LoggerConfig) -> Result<(), BuildError> {
        let logger = logger::build(&config)?;
        self.install(logger);
        Ok(())
    }

    /// Install an already built logger as the default.
    pub fn install(&self, logger: Logger) {
        let mut state = self.write();
        state.default = Some(logger);
        state.named.clear();
    }

    /// The current default logger.
    ///
    /// # Panics
    ///
    /// When no default exists yet and the fallback config cannot be built.
    /// A process that cannot log is not allowed to carry on silently.
    pub fn default_logger(&self) -> Logger {
        if let Some(logger) = &self.read().default {
            return logger.clone();
        }
        let mut state = self.write();
        self.ensure_default(&mut state)
    }

    /// Logger named `name`, derived from the default.
    ///
    /// # Panics
    ///
    /// Same as [`LoggerRegistry::default_logger`].
    pub fn named(&self, name: &str) -> Logger {
        if let Some(logger) = self.read().named.get(name) {
            return logger.clone();
        }

        let mut state = self.write();
        // another caller may have filled the entry between the two locks
        if let Some(logger) = state.named.get(name) {
            return logger.clone();
        }
        let logger = self.ensure_default(&mut state).named(name);
        state.named.insert(name.to_string(), logger.clone());
        logger
    }

    pub fn is_initialized(&self) -> bool {
        self.read().default.is_some()
    }

    /// Names currently cached, sorted.
    pub fn cached_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.read().named.keys().cloned().collect();
        names.sort();
        names
    }

    fn ensure_default(&self, state: &mut State) -> Logger {
        if let Some(logger) = &state.default {
            return logger.clone();
        }
        let logger = logger::build(&self.fallback)
            .unwrap_or_else(|err| panic!("cannot build the fallback logger: {err}"));
        state.default = Some(logger.clone());
        logger
    }

    // State changes are single assignments, so a poisoned lock still guards
    // a consistent value.
    fn read(&self) -> RwLockReadGuard<'_, State> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, State> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }
}

impl LoggerProvider for LoggerRegistry {
    fn initialize(&self, config: LoggerConfig) -> Result<(), BuildError> {
        LoggerRegistry::initialize(self, config)
    }

    fn default_logger(&self) -> Logger {
        LoggerRegistry::default_logger(self)
    }

    fn named(&self, name: &str) -> Logger {
        LoggerRegistry::named(self, name)
    }
}
