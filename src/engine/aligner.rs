//! Frame to caption alignment

use tracing::info;

use crate::domain::model::{AlignedFrame, CaptionInterval, Frame};

/// Assigns each frame the text of the caption interval covering its timestamp
pub struct FrameAligner;

impl FrameAligner {
    pub fn new() -> Self {
        Self
    }

    /// One aligned frame per input frame; the first covering interval wins,
    /// uncovered frames get empty text
    pub fn align(&self, frames: &[Frame], intervals: &[CaptionInterval]) -> Vec<AlignedFrame> {
        let aligned: Vec<AlignedFrame> = frames
            .iter()
            .map(|frame| {
                let text = intervals
                    .iter()
                    .find(|interval| interval.contains(frame.timestamp_sec))
                    .map(|interval| interval.text.clone())
                    .unwrap_or_default();
                AlignedFrame::new(frame.clone(), text)
            })
            .collect();

        let matched = aligned.iter().filter(|a| !a.text.is_empty()).count();
        info!(
            "Aligned {} frames with captions ({} matched)",
            aligned.len(),
            matched
        );
        aligned
    }
}

impl Default for FrameAligner {
    fn default() -> Self {
        Self::new()
    }
}
