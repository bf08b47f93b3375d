use std::fmt;
use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use thiserror::Error;
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::fmt::format::Writer;
use tracing_subscriber::fmt::{FmtContext, FormatEvent, FormatFields};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::util::{SubscriberInitExt, TryInitError};
use tracing_subscriber::{EnvFilter, Layer};

use crate::config::LogConfig;

#[derive(Debug, Error)]
pub enum LoggingError {
    #[error("failed to create log file {path}: {source}")]
    CreateFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to install global tracing subscriber: {0}")]
    Install(#[source] TryInitError),
}

pub fn init_logging(config: &LogConfig) -> Result<(), LoggingError> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.default_filter.as_str()));
    let file_layer = match &config.file {
        Some(path) => Some(file_layer(create_log_file(path)?)),
        None => None,
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_thread_names(true)
                .compact(),
        )
        .with(file_layer)
        .try_init()
        .map_err(LoggingError::Install)
}

pub fn file_layer<S>(file: File) -> impl Layer<S>
where
    S: Subscriber + for<'a> LookupSpan<'a>,
{
    tracing_subscriber::fmt::layer()
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .event_format(LogFileFormat)
}

pub fn level_prefix(level: Level) -> &'static str {
    if level == Level::ERROR {
        "ERROR: "
    } else if level == Level::WARN {
        "WARNING: "
    } else {
        ""
    }
}

fn create_log_file(path: &Path) -> Result<File, LoggingError> {
    File::create(path).map_err(|source| LoggingError::CreateFile {
        path: path.to_path_buf(),
        source,
    })
}

struct LogFileFormat;

impl<S, N> FormatEvent<S, N> for LogFileFormat
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        ctx: &FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &Event<'_>,
    ) -> fmt::Result {
        write!(writer, "{}", level_prefix(*event.metadata().level()))?;
        ctx.field_format().format_fields(writer.by_ref(), event)?;
        writeln!(writer)
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tracing::{error, info, warn};

    use super::*;

    #[test]
    fn prefixes_follow_severity() {
        assert_eq!(level_prefix(Level::ERROR), "ERROR: ");
        assert_eq!(level_prefix(Level::WARN), "WARNING: ");
        assert_eq!(level_prefix(Level::INFO), "");
        assert_eq!(level_prefix(Level::DEBUG), "");
    }

    #[test]
    fn file_layer_writes_one_prefixed_line_per_event() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("log.txt");
        let file = File::create(&path).expect("log file");

        let subscriber = tracing_subscriber::registry().with(file_layer(file));
        tracing::subscriber::with_default(subscriber, || {
            info!("framework started");
            warn!("display refresh rate unknown");
            error!(width = 640, "failed to create display");
        });

        let contents = fs::read_to_string(&path).expect("read log");
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "framework started");
        assert_eq!(lines[1], "WARNING: display refresh rate unknown");
        assert!(lines[2].starts_with("ERROR: "));
        assert!(lines[2].contains("failed to create display"));
        assert!(lines[2].contains("width=640"));
    }

    #[test]
    fn unwritable_log_path_is_reported() {
        let dir = tempfile::tempdir().expect("tempdir");
        let config = LogConfig {
            file: Some(dir.path().join("missing_dir").join("log.txt")),
            default_filter: "info".to_string(),
        };
        let error = init_logging(&config).expect_err("missing parent dir");
        assert!(matches!(error, LoggingError::CreateFile { .. }));
    }
}
