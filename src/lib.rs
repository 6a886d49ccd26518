//! stepdoc library
//!
//! Turns a screen-capture video and its time-coded captions into an ordered
//! list of instructional steps (a representative screenshot plus narrative)
//! and renders them as documents.

pub mod adapters;
pub mod app;
pub mod cli;
pub mod config_initialization;
pub mod domain;
pub mod engine;
pub mod error;
pub mod ports;
pub mod utils;

// Re-export commonly used types
pub use domain::config::AppConfig;
pub use domain::errors::DomainError;
pub use domain::model::{AlignedFrame, CaptionInterval, Frame, Step};
pub use error::{StepDocError, StepDocResult};

/// Initialize stepdoc library
pub fn init() -> StepDocResult<()> {
    ffmpeg_next::init().map_err(|e| StepDocError::FFmpegInitError {
        message: e.to_string(),
    })?;

    Ok(())
}
