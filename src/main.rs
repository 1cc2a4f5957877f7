use anyhow::Context;
use loghub::cli::{build_cli, logger_names, parse_config};
use loghub::{log_debug, log_error, log_info, log_warn, log_with, Logger};

fn emit_samples(logger: &Logger) {
    let source = logger.name().unwrap_or("default");
    log_debug!(logger, source, "debug record");
    log_info!(logger, source, "info record");
    log_warn!(logger, source, "warn record");
    log_error!(logger, source, "error record");
}

fn main() -> anyhow::Result<()> {
    let matches = build_cli().get_matches();
    let config = parse_config(&matches).context("failed to load configuration")?;

    loghub::init(config).context("failed to initialize logger")?;

    let logger = loghub::get();
    let run = log_with!(logger, version = env!("CARGO_PKG_VERSION"));
    log_info!(run, "loghub started");
    emit_samples(&logger);

    for name in logger_names(&matches) {
        emit_samples(&loghub::named(&name));
    }

    logger.flush().context("failed to flush log outputs")?;
    Ok(())
}
