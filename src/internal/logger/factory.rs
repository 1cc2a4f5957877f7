// src/internal/logger/factory.rs

use std::io::{self, Write};
use std::sync::Arc;

use tracing::Dispatch;
use tracing_subscriber::{
    fmt::{self, time::ChronoLocal, MakeWriter},
    layer::SubscriberExt,
    EnvFilter,
};

use super::logger::Logger;
use super::sink::OutputWriter;
use super::BuildError;
use crate::internal::config::LoggerConfig;

/// ISO 8601 with milliseconds and numeric offset.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.3f%z";

/// Build a logger from `config`.
///
/// Production loggers write JSON to every configured output, opening them
/// all before anything is returned. Other loggers write human readable lines
/// to stderr and ignore the outputs.
pub fn build(config: &LoggerConfig) -> Result<Logger, BuildError> {
    if config.is_production() {
        let writer = OutputWriter::open(config.outputs())?;
        Ok(build_with_writer(config, writer))
    } else {
        Ok(build_with_writer(config, io::stderr))
    }
}

/// Build a logger from `config` that writes to `writer` instead of the
/// configured outputs. [`Logger::flush`] flushes a writer made by `writer`.
pub fn build_with_writer<W>(config: &LoggerConfig, writer: W) -> Logger
where
    W: for<'a> MakeWriter<'a> + Send + Sync + 'static,
{
    let writer = SharedWriter(Arc::new(writer));
    let flusher = writer.clone();
    let filter = EnvFilter::new(min_level(config));
    let timer = ChronoLocal::new(TIMESTAMP_FORMAT.to_string());

    let dispatch = if config.is_production() {
        let layer = fmt::layer()
            .json()
            .flatten_event(true)
            .with_current_span(false)
            .with_span_list(true)
            .with_target(false)
            .with_timer(timer)
            .with_writer(writer);
        Dispatch::new(tracing_subscriber::registry().with(filter).with(layer))
    } else {
        let layer = fmt::layer()
            .with_ansi(false)
            .with_level(true)
            .with_target(false)
            .with_thread_ids(false)
            .with_thread_names(false)
            .with_timer(timer)
            .with_writer(writer);
        Dispatch::new(tracing_subscriber::registry().with(filter).with(layer))
    };

    Logger::new(
        dispatch,
        move || flusher.make_writer().flush(),
        !config.is_production(),
        config.stacktrace_enabled(),
    )
}

/// Lets the logger keep a handle on the writer the fmt layer owns.
struct SharedWriter<W>(Arc<W>);

impl<W> Clone for SharedWriter<W> {
    fn clone(&self) -> Self {
        Self(Arc::clone(&self.0))
    }
}

impl<'a, W: MakeWriter<'a>> MakeWriter<'a> for SharedWriter<W> {
    type Writer = W::Writer;

    fn make_writer(&'a self) -> Self::Writer {
        W::make_writer(&self.0)
    }
}

fn min_level(config: &LoggerConfig) -> &'static str {
    if config.is_strict() {
        "warn"
    } else {
        "debug"
    }
}
