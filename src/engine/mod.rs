//! Core step extraction engine
//!
//! Four stages run in strict order: sampling, caption parsing, alignment and
//! merging. Each stage consumes the full output of the previous one.

pub mod aligner;
pub mod merger;
pub mod sampler;
pub mod subtitles;

pub use aligner::FrameAligner;
pub use merger::{MergeDecision, SegmentMerger};
pub use sampler::FrameSampler;
pub use subtitles::SubtitleParser;
