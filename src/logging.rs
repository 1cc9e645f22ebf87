//! Logging setup
//!
//! Installs the global `tracing` subscriber for the binaries from the
//! `[logging]` config section. `RUST_LOG` wins over the configured level.
//! Output goes to stderr unless a log file is configured, so CLI output on
//! stdout stays machine-readable.

use std::fs::{File, OpenOptions};
use std::path::Path;
use std::str::FromStr;
use std::sync::Mutex;

use tracing::Subscriber;
use tracing_subscriber::{
    layer::SubscriberExt, registry::LookupSpan, util::SubscriberInitExt, EnvFilter, Layer,
};

use crate::config::LoggingConfig;

#[derive(Debug, thiserror::Error)]
pub enum LoggingError {
    #[error("Invalid log filter: {0}")]
    Filter(String),

    #[error("Unknown log format: {0} (expected pretty or json)")]
    Format(String),

    #[error("Failed to open log file {path}: {source}")]
    File {
        path: String,
        source: std::io::Error,
    },

    #[error("Logging already initialised: {0}")]
    Init(#[from] tracing_subscriber::util::TryInitError),
}

/// Output format of the fmt layer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Pretty,
    Json,
}

impl FromStr for LogFormat {
    type Err = LoggingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pretty" | "text" => Ok(LogFormat::Pretty),
            "json" => Ok(LogFormat::Json),
            other => Err(LoggingError::Format(other.to_string())),
        }
    }
}

/// Initialise the global subscriber
pub fn init(config: &LoggingConfig) -> Result<(), LoggingError> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(default_directives(&config.level))
            .map_err(|e| LoggingError::Filter(e.to_string()))?,
    };

    let format: LogFormat = config.format.parse()?;
    let layer = fmt_layer(format, config.file.as_deref())?;

    tracing_subscriber::registry()
        .with(layer)
        .with(filter)
        .try_init()?;

    Ok(())
}

/// A bare level applies to this crate and the HTTP middleware; anything
/// else is taken as a full filter directive
fn default_directives(level: &str) -> String {
    let level = level.trim();
    if level.contains('=') || level.contains(',') {
        level.to_string()
    } else {
        format!("aftersales={level},tower_http={level},warn", level = level)
    }
}

fn fmt_layer<S>(
    format: LogFormat,
    file: Option<&str>,
) -> Result<Box<dyn Layer<S> + Send + Sync + 'static>, LoggingError>
where
    S: Subscriber + for<'a> LookupSpan<'a>,
{
    let layer = tracing_subscriber::fmt::layer();

    Ok(match (format, file) {
        (LogFormat::Pretty, None) => layer.with_writer(std::io::stderr).boxed(),
        (LogFormat::Json, None) => layer.json().with_writer(std::io::stderr).boxed(),
        (LogFormat::Pretty, Some(path)) => layer
            .with_ansi(false)
            .with_writer(Mutex::new(open_log_file(path)?))
            .boxed(),
        (LogFormat::Json, Some(path)) => layer
            .json()
            .with_writer(Mutex::new(open_log_file(path)?))
            .boxed(),
    })
}

fn open_log_file(path: &str) -> Result<File, LoggingError> {
    let to_error = |source| LoggingError::File {
        path: path.to_string(),
        source,
    };

    if let Some(parent) = Path::new(path).parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(to_error)?;
    }

    OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(to_error)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_log_format_parse() {
        assert_eq!("pretty".parse::<LogFormat>().unwrap(), LogFormat::Pretty);
        assert_eq!(" JSON ".parse::<LogFormat>().unwrap(), LogFormat::Json);
        assert!(matches!(
            "xml".parse::<LogFormat>(),
            Err(LoggingError::Format(_))
        ));
    }

    #[test]
    fn test_default_directives() {
        assert_eq!(
            default_directives("debug"),
            "aftersales=debug,tower_http=debug,warn"
        );
        assert_eq!(default_directives("aftersales=trace"), "aftersales=trace");
        assert!(EnvFilter::try_new(default_directives("info")).is_ok());
    }

    #[test]
    fn test_log_file_parent_is_created() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("logs").join("server.log");

        open_log_file(path.to_str().unwrap()).unwrap();
        assert!(path.exists());
    }
}
