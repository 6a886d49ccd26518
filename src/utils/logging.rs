//! Logging setup on top of tracing-subscriber

use tracing_subscriber::EnvFilter;

use crate::domain::config::LoggingSection;
use crate::error::{StepDocError, StepDocResult};

/// Log line layout
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// Multi-line human readable output
    Pretty,
    /// Single-line human readable output
    Compact,
    /// One JSON object per event
    Json,
}

impl LogFormat {
    pub fn parse(value: &str) -> StepDocResult<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "pretty" => Ok(LogFormat::Pretty),
            "compact" => Ok(LogFormat::Compact),
            "json" => Ok(LogFormat::Json),
            other => Err(StepDocError::ConfigError {
                message: format!("Unknown log format '{}'", other),
            }),
        }
    }
}

/// Logging system manager
pub struct LoggingSystem {
    level: String,
    format: LogFormat,
}

impl LoggingSystem {
    pub fn new(section: &LoggingSection) -> StepDocResult<Self> {
        Ok(Self {
            level: section.level.trim().to_ascii_lowercase(),
            format: LogFormat::parse(&section.format)?,
        })
    }

    /// Filter from `RUST_LOG` when set, else the configured level
    fn filter(&self) -> StepDocResult<EnvFilter> {
        match EnvFilter::try_from_default_env() {
            Ok(filter) => Ok(filter),
            Err(_) => EnvFilter::try_new(&self.level).map_err(|e| StepDocError::ConfigError {
                message: format!("Invalid log level '{}': {}", self.level, e),
            }),
        }
    }

    /// Install the global subscriber; a second call keeps the first subscriber
    pub fn initialize(&self) -> StepDocResult<()> {
        let builder = tracing_subscriber::fmt()
            .with_env_filter(self.filter()?)
            .with_writer(std::io::stderr);

        let _ = match self.format {
            LogFormat::Pretty => builder.pretty().try_init(),
            LogFormat::Compact => builder.compact().try_init(),
            LogFormat::Json => builder.json().try_init(),
        };
        Ok(())
    }

    /// Log system information
    pub fn log_system_info(&self) {
        tracing::debug!("stepdoc {}", env!("CARGO_PKG_VERSION"));
        tracing::debug!("Platform: {} {}", std::env::consts::OS, std::env::consts::ARCH);
        tracing::debug!("Logging level: {}, format: {:?}", self.level, self.format);
    }
}
