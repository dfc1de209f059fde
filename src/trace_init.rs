//! Trace output for applications embedding the engine.
//!
//! Without the `trace` feature [`init_tracing`] accepts the configuration
//! and installs nothing.

use std::path::PathBuf;

/// File name of the trace log before any rotation suffix.
pub const DEFAULT_FILE_PREFIX: &str = "cjk-reading-trace.jsonl";
/// Directives used when `RUST_LOG` is unset or unparsable.
pub const DEFAULT_FILTER: &str = "cjk_reading=debug,reading_core=debug";

/// How often the trace file is rolled over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TraceRotation {
    #[default]
    Never,
    Daily,
    Hourly,
}

/// Where trace output goes and which spans it keeps.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TraceConfig {
    pub log_dir: PathBuf,
    pub file_prefix: String,
    pub rotation: TraceRotation,
    /// `EnvFilter` directives. `RUST_LOG` takes precedence when it parses.
    pub filter: String,
}

impl TraceConfig {
    pub fn new(log_dir: impl Into<PathBuf>) -> Self {
        Self {
            log_dir: log_dir.into(),
            file_prefix: DEFAULT_FILE_PREFIX.to_string(),
            rotation: TraceRotation::Never,
            filter: DEFAULT_FILTER.to_string(),
        }
    }

    pub fn with_rotation(mut self, rotation: TraceRotation) -> Self {
        self.rotation = rotation;
        self
    }

    pub fn with_filter(mut self, filter: impl Into<String>) -> Self {
        self.filter = filter.into();
        self
    }

    /// Path of the trace file while it is not rotated.
    pub fn file_path(&self) -> PathBuf {
        self.log_dir.join(&self.file_prefix)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum TraceError {
    #[error("invalid trace filter '{filter}': {message}")]
    Filter { filter: String, message: String },
    #[error("cannot open trace file in {dir}: {message}")]
    Appender { dir: PathBuf, message: String },
    #[error("a global trace subscriber is already installed")]
    AlreadyInstalled,
}

#[cfg(feature = "trace")]
mod install {
    use std::sync::OnceLock;

    use tracing_appender::non_blocking::WorkerGuard;
    use tracing_appender::rolling::{RollingFileAppender, Rotation};
    use tracing_subscriber::fmt::format::FmtSpan;
    use tracing_subscriber::EnvFilter;

    use super::{TraceConfig, TraceError, TraceRotation};

    /// The writer thread flushes until its guard drops.
    static GUARD: OnceLock<WorkerGuard> = OnceLock::new();

    /// `RUST_LOG` when it parses, else the configured directives.
    pub(super) fn resolve_filter(env: Option<&str>, configured: &str) -> Result<EnvFilter, TraceError> {
        if let Some(filter) = env.and_then(|directives| EnvFilter::try_new(directives).ok()) {
            return Ok(filter);
        }
        EnvFilter::try_new(configured).map_err(|e| TraceError::Filter {
            filter: configured.to_string(),
            message: e.to_string(),
        })
    }

    pub(super) fn init(config: &TraceConfig) -> Result<(), TraceError> {
        if GUARD.get().is_some() {
            return Err(TraceError::AlreadyInstalled);
        }
        let env = std::env::var(EnvFilter::DEFAULT_ENV).ok();
        let filter = resolve_filter(env.as_deref(), &config.filter)?;

        let rotation = match config.rotation {
            TraceRotation::Never => Rotation::NEVER,
            TraceRotation::Daily => Rotation::DAILY,
            TraceRotation::Hourly => Rotation::HOURLY,
        };
        let appender = RollingFileAppender::builder()
            .rotation(rotation)
            .filename_prefix(&config.file_prefix)
            .build(&config.log_dir)
            .map_err(|e| TraceError::Appender {
                dir: config.log_dir.clone(),
                message: e.to_string(),
            })?;
        let (writer, guard) = tracing_appender::non_blocking(appender);

        tracing_subscriber::fmt()
            .json()
            .with_writer(writer)
            .with_target(true)
            .with_span_events(FmtSpan::CLOSE)
            .with_env_filter(filter)
            .try_init()
            .map_err(|_| TraceError::AlreadyInstalled)?;
        let _ = GUARD.set(guard);
        Ok(())
    }
}

/// Install a JSON subscriber writing to the file described by `config`.
/// Fails on a bad filter, an unwritable directory, or a second call.
#[cfg(feature = "trace")]
pub fn init_tracing(config: &TraceConfig) -> Result<(), TraceError> {
    install::init(config)
}

#[cfg(not(feature = "trace"))]
pub fn init_tracing(_config: &TraceConfig) -> Result<(), TraceError> {
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_defaults() {
        let config = TraceConfig::new("/tmp/logs");
        assert_eq!(config.rotation, TraceRotation::Never);
        assert_eq!(config.filter, DEFAULT_FILTER);
        assert_eq!(config.file_path(), PathBuf::from("/tmp/logs/cjk-reading-trace.jsonl"));
    }

    #[test]
    fn test_config_builders() {
        let config = TraceConfig::new("logs")
            .with_rotation(TraceRotation::Daily)
            .with_filter("reading_core=trace");
        assert_eq!(config.rotation, TraceRotation::Daily);
        assert_eq!(config.filter, "reading_core=trace");
    }

    #[cfg(not(feature = "trace"))]
    #[test]
    fn test_init_without_feature_installs_nothing() {
        assert!(init_tracing(&TraceConfig::new("logs")).is_ok());
    }

    #[cfg(feature = "trace")]
    #[test]
    fn test_filter_resolution() {
        assert!(install::resolve_filter(None, DEFAULT_FILTER).is_ok());
        assert!(install::resolve_filter(Some("not a [filter"), DEFAULT_FILTER).is_ok());
        let err = install::resolve_filter(None, "reading_core=loud").unwrap_err();
        assert!(matches!(err, TraceError::Filter { .. }), "{err}");
    }
}
