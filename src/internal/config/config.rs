use config::{Config, ConfigError, Environment};
use serde::{Deserialize, Serialize};

/// Prefix of the environment variables read by [`LoggerConfig::from_env`].
pub const ENV_PREFIX: &str = "LOGHUB";

/// Options a logger is built from.
///
/// The value is immutable once built: every setter consumes `self` and
/// returns a new config, so re-initializing a registry always means
/// handing it a fresh value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggerConfig {
    #[serde(default)]
    outputs: Vec<String>,
    #[serde(default)]
    strict: bool,
    #[serde(default)]
    production: bool,
    #[serde(default = "default_true")]
    enable_stacktrace: bool,
}

fn default_true() -> bool {
    true
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self::fallback()
    }
}

impl LoggerConfig {
    /// Configuration used when a logger is requested before any explicit
    /// initialization: console output, debug level, stack traces on.
    pub fn fallback() -> Self {
        Self {
            outputs: Vec::new(),
            strict: false,
            production: false,
            enable_stacktrace: true,
        }
    }

    pub fn with_outputs<I, S>(mut self, outputs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.outputs = outputs.into_iter().map(Into::into).collect();
        self
    }

    /// Append a single output target.
    pub fn with_output(mut self, output: impl Into<String>) -> Self {
        self.outputs.push(output.into());
        self
    }

    /// Raise the minimum level to warn.
    pub fn strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    /// Switch to JSON records written to the configured outputs, without
    /// caller locations.
    pub fn production(mut self, production: bool) -> Self {
        self.production = production;
        self
    }

    pub fn enable_stacktrace(mut self, enable: bool) -> Self {
        self.enable_stacktrace = enable;
        self
    }

    pub fn outputs(&self) -> &[String] {
        &self.outputs
    }

    pub fn is_strict(&self) -> bool {
        self.strict
    }

    pub fn is_production(&self) -> bool {
        self.production
    }

    pub fn stacktrace_enabled(&self) -> bool {
        self.enable_stacktrace
    }

    /// Load the configuration from `LOGHUB_*` environment variables.
    ///
    /// `LOGHUB_OUTPUTS` is a comma separated list; the flags accept
    /// `true`/`false`. Unset variables keep their fallback values.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::load(Environment::with_prefix(ENV_PREFIX))
    }

    fn load(env: Environment) -> Result<Self, ConfigError> {
        let fallback = Self::fallback();
        let config = Config::builder()
            .set_default("outputs", fallback.outputs)?
            .set_default("strict", fallback.strict)?
            .set_default("production", fallback.production)?
            .set_default("enable_stacktrace", fallback.enable_stacktrace)?
            .add_source(
                env.prefix_separator("_")
                    .try_parsing(true)
                    .list_separator(",")
                    .with_list_parse_key("outputs"),
            )
            .build()?;

        config.try_deserialize()
    }
}
