use clap::{Arg, ArgAction, ArgMatches, Command};

use crate::internal::config::LoggerConfig;

pub fn build_cli() -> Command {
    Command::new("loghub")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Emit sample records through the process-wide logger registry")
        .arg(
            Arg::new("out")
                .long("out")
                .short('o')
                .action(ArgAction::Append)
                .help("Output target: stdout, stderr, a file path or a file:// URL (production only)")
        )
        .arg(
            Arg::new("strict")
                .long("strict")
                .action(ArgAction::SetTrue)
                .help("Only emit warn and error records")
        )
        .arg(
            Arg::new("production")
                .long("production")
                .action(ArgAction::SetTrue)
                .help("Write JSON records to the configured outputs")
        )
        .arg(
            Arg::new("no-stacktrace")
                .long("no-stacktrace")
                .action(ArgAction::SetTrue)
                .help("Do not attach stack traces to error records")
        )
        .arg(
            Arg::new("name")
                .long("name")
                .short('n')
                .action(ArgAction::Append)
                .help("Also emit through a logger with this name")
        )
}

/// Start from the `LOGHUB_*` environment and apply the command line on top.
pub fn parse_config(matches: &ArgMatches) -> anyhow::Result<LoggerConfig> {
    let mut config = LoggerConfig::from_env()?;

    if let Some(outputs) = matches.get_many::<String>("out") {
        config = config.with_outputs(outputs.cloned());
    }
    if matches.get_flag("strict") {
        config = config.strict(true);
    }
    if matches.get_flag("production") {
        config = config.production(true);
    }
    if matches.get_flag("no-stacktrace") {
        config = config.enable_stacktrace(false);
    }

    Ok(config)
}

pub fn logger_names(matches: &ArgMatches) -> Vec<String> {
    matches
        .get_many::<String>("name")
        .map(|names| names.cloned().collect())
        .unwrap_or_default()
}
