//! Error handling module for StepDoc

use std::path::PathBuf;

use thiserror::Error;

use crate::domain::errors::DomainError;

/// Main error type for StepDoc operations
#[derive(Error, Debug)]
pub enum StepDocError {
    /// Video source not found
    #[error("Video source not found: {}", path.display())]
    SourceNotFound { path: PathBuf },

    /// Video source exists but cannot be opened or decoded
    #[error("Cannot open video source {}: {message}", path.display())]
    SourceUnopenable { path: PathBuf, message: String },

    /// Reported frame rate is zero or not a number
    #[error("Invalid frame rate {fps} reported by {}", path.display())]
    InvalidFrameRate { path: PathBuf, fps: f64 },

    /// Sampling interval is zero, negative or not a number
    #[error("Invalid sampling interval: {interval_sec}s")]
    InvalidInterval { interval_sec: f64 },

    /// Video decoded but yielded no frames to sample
    #[error("No frames could be sampled from {}", path.display())]
    NoFramesSampled { path: PathBuf },

    /// Caption timecode is malformed
    #[error("Invalid timecode: {timecode}. Expected HH:MM:SS,mmm")]
    InvalidTimecode { timecode: String },

    /// Caption file is missing while captions are required
    #[error("Caption file not found: {}", path.display())]
    CaptionsNotFound { path: PathBuf },

    /// Caption file contains no usable blocks while captions are required
    #[error("No usable caption blocks in {}", path.display())]
    CaptionsEmpty { path: PathBuf },

    /// Output location cannot be prepared
    #[error("Failed to prepare output directory {}: {message}", path.display())]
    OutputError { path: PathBuf, message: String },

    /// Configuration error
    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    /// FFmpeg initialization error
    #[error("Failed to initialize FFmpeg: {message}")]
    FFmpegInitError { message: String },

    /// Error raised by a port adapter
    #[error(transparent)]
    Domain(#[from] DomainError),

    /// I/O error
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

impl StepDocError {
    /// Whether the error aborts the current job rather than the whole run
    pub fn is_job_fatal(&self) -> bool {
        !matches!(
            self,
            StepDocError::ConfigError { .. } | StepDocError::FFmpegInitError { .. }
        )
    }
}

/// Result type alias for StepDoc operations
pub type StepDocResult<T> = std::result::Result<T, StepDocError>;
