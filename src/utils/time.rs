//! Caption timecode parsing and formatting utilities

use crate::error::{StepDocError, StepDocResult};

/// Parser for SubRip style `HH:MM:SS,mmm` timecodes
pub struct TimecodeParser;

impl TimecodeParser {
    /// Create a new timecode parser
    #[allow(clippy::new_without_default)]
    pub fn new() -> Self {
        Self
    }
}

impl Default for TimecodeParser {
    fn default() -> Self {
        Self::new()
    }
}

impl TimecodeParser {
    /// Parse `HH:MM:SS,mmm` to seconds
    pub fn parse_timecode(&self, timecode: &str) -> StepDocResult<f64> {
        let timecode = timecode.trim();
        let invalid = || StepDocError::InvalidTimecode {
            timecode: timecode.to_string(),
        };

        let (clock, millis) = timecode.split_once(',').ok_or_else(invalid)?;
        let parts: Vec<&str> = clock.split(':').collect();
        if parts.len() != 3 || millis.len() != 3 {
            return Err(invalid());
        }

        let hours: u32 = parts[0].parse().map_err(|_| invalid())?;
        let minutes: u32 = parts[1].parse().map_err(|_| invalid())?;
        let seconds: u32 = parts[2].parse().map_err(|_| invalid())?;
        let milliseconds: u32 = millis.parse().map_err(|_| invalid())?;

        if minutes >= 60 || seconds >= 60 {
            return Err(invalid());
        }

        Ok(Self::to_seconds(hours, minutes, seconds, milliseconds))
    }

    /// `h*3600 + m*60 + s + ms/1000`
    pub fn to_seconds(hours: u32, minutes: u32, seconds: u32, milliseconds: u32) -> f64 {
        hours as f64 * 3600.0 + minutes as f64 * 60.0 + seconds as f64 + milliseconds as f64 / 1000.0
    }

    /// Format seconds as `HH:MM:SS` or `MM:SS` for document headings
    pub fn format_clock(&self, seconds: f64) -> String {
        let total = seconds.max(0.0).round() as u64;
        let hours = total / 3600;
        let minutes = (total % 3600) / 60;
        let secs = total % 60;

        if hours > 0 {
            format!("{:02}:{:02}:{:02}", hours, minutes, secs)
        } else {
            format!("{:02}:{:02}", minutes, secs)
        }
    }
}
