//! Application configuration values
//!
//! A single [`AppConfig`] is resolved at startup (defaults, file, environment,
//! CLI) and handed to each component explicitly.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::domain::errors::DomainError;

/// Complete application configuration
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub paths: PathsConfig,
    pub sampling: SamplingConfig,
    pub grouping: GroupingConfig,
    pub content: ContentConfig,
    pub output: OutputConfig,
    pub logging: LoggingSection,
}

/// Job discovery locations and expected input file names
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PathsConfig {
    pub input_dir: PathBuf,
    pub output_dir: PathBuf,
    pub video_file: String,
    pub captions_file: String,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            input_dir: PathBuf::from("input"),
            output_dir: PathBuf::from("output"),
            video_file: "video.mp4".to_string(),
            captions_file: "transkript.srt".to_string(),
        }
    }
}

/// Frame sampling parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SamplingConfig {
    /// Seconds between sampled frames
    pub interval_sec: f64,
}

impl Default for SamplingConfig {
    fn default() -> Self {
        Self { interval_sec: 5.0 }
    }
}

/// Segment merging parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GroupingConfig {
    /// Captions shorter than this (in characters) are folded into the current step
    pub min_text_length: usize,
    /// Maximum fingerprint distance still considered the same screen
    pub similarity_threshold: u32,
    /// Fail the job when the caption track yields no intervals
    pub require_captions: bool,
}

impl Default for GroupingConfig {
    fn default() -> Self {
        Self {
            min_text_length: 25,
            similarity_threshold: 5,
            require_captions: true,
        }
    }
}

/// Content provider selection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContentConfig {
    /// Provider variant name (MOCK, GEMINI)
    pub provider: String,
    pub model: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    /// Simulated latency of the mock provider
    pub mock_latency_ms: u64,
    pub request_timeout_sec: u64,
    /// Attach the representative image to each generation request
    pub send_images: bool,
}

impl Default for ContentConfig {
    fn default() -> Self {
        Self {
            provider: "MOCK".to_string(),
            model: "gemini-1.5-pro".to_string(),
            api_key: None,
            base_url: None,
            mock_latency_ms: 0,
            request_timeout_sec: 60,
            send_images: true,
        }
    }
}

/// Document builders to run for each job
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub builders: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            builders: vec!["MARKDOWN".to_string()],
            title: None,
        }
    }
}

/// Log output settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSection {
    pub level: String,
    /// pretty, compact or json
    pub format: String,
}

impl Default for LoggingSection {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}

impl AppConfig {
    /// Validate value ranges that serde cannot express
    pub fn validate(&self) -> Result<(), DomainError> {
        if !self.sampling.interval_sec.is_finite() || self.sampling.interval_sec <= 0.0 {
            return Err(DomainError::ConfigFail(format!(
                "sampling.interval_sec must be a positive number, got {}",
                self.sampling.interval_sec
            )));
        }

        if self.content.provider.trim().is_empty() {
            return Err(DomainError::ConfigFail(
                "content.provider cannot be empty".to_string(),
            ));
        }

        match self.logging.format.to_lowercase().as_str() {
            "pretty" | "compact" | "json" => {}
            other => {
                return Err(DomainError::ConfigFail(format!(
                    "Invalid logging.format: {}. Valid formats: pretty, compact, json",
                    other
                )))
            }
        }

        match self.logging.level.to_lowercase().as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => {}
            other => {
                return Err(DomainError::ConfigFail(format!(
                    "Invalid logging.level: {}. Valid levels: trace, debug, info, warn, error",
                    other
                )))
            }
        }

        Ok(())
    }
}
