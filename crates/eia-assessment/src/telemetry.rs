use crate::config::TelemetryConfig;
use std::io::IsTerminal;
use tracing_subscriber::filter::ParseError;
use tracing_subscriber::EnvFilter;

/// Targets the configured level applies to: this library and the `eia` binary.
const TOOL_TARGETS: [&str; 2] = ["eia_assessment", "eia"];
/// Level for everything else (lopdf, csv, ...).
const DEPENDENCY_LEVEL: &str = "warn";
const FALLBACK_LEVEL: &str = "info";

#[derive(Debug, thiserror::Error)]
pub enum TelemetryError {
    #[error("invalid log filter '{directives}'")]
    Filter {
        directives: String,
        #[source]
        source: ParseError,
    },
    #[error("failed to install log subscriber: {0}")]
    Subscriber(Box<dyn std::error::Error + Send + Sync>),
}

/// Turns `EIA_LOG_LEVEL` into filter directives.
///
/// A bare level (`debug`) is scoped to the tool's own crates while
/// dependencies stay at `warn`. Anything that already reads as a directive
/// list (`lopdf=debug,eia=trace`) is used as written.
pub fn directives(log_level: &str) -> String {
    let level = match log_level.trim() {
        "" => FALLBACK_LEVEL,
        level => level,
    };
    if level.contains('=') || level.contains(',') {
        return level.to_string();
    }

    std::iter::once(DEPENDENCY_LEVEL.to_string())
        .chain(TOOL_TARGETS.iter().map(|target| format!("{target}={level}")))
        .collect::<Vec<_>>()
        .join(",")
}

fn configured_filter(config: &TelemetryConfig) -> Result<EnvFilter, TelemetryError> {
    let directives = directives(&config.log_level);
    match EnvFilter::try_new(&directives) {
        Ok(filter) => Ok(filter),
        Err(source) => Err(TelemetryError::Filter { directives, source }),
    }
}

/// Installs the global subscriber on stderr so stdout stays free for command
/// output. `RUST_LOG`, when set, replaces the configured directives entirely.
pub fn init(config: &TelemetryConfig) -> Result<(), TelemetryError> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => configured_filter(config)?,
    };
    let stderr = std::io::stderr();
    let ansi = stderr.is_terminal();

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(ansi)
        .with_target(false)
        .compact()
        .try_init()
        .map_err(TelemetryError::Subscriber)
}
