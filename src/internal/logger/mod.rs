// src/internal/logger/mod.rs

pub mod factory;
pub mod logger;
mod sink;

pub use factory::{build, build_with_writer, TIMESTAMP_FORMAT};
pub use logger::Logger;

// The log_* macros are exported at the crate root via #[macro_export]:
// `loghub::log_info!(logger, user = 7, "...")`, `loghub::log_with!(logger, request_id = 42)`.

/// Failure to construct a logger. Nothing is retried and nothing is kept
/// from a failed build.
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    #[error("cannot open log output {target:?}: {source}")]
    OpenOutput {
        target: String,
        #[source]
        source: std::io::Error,
    },
    #[error("unsupported log output {0:?}")]
    UnsupportedOutput(String),
}
