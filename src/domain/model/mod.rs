// Domain models - Core types and data structures

use std::collections::BTreeMap;
use std::fmt;
use std::ops::Range;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

use crate::domain::errors::DomainError;

/// A still image sampled from the video, referenced by path
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Frame {
    pub image_path: PathBuf,
    pub timestamp_sec: f64,
}

impl Frame {
    pub fn new(image_path: impl Into<PathBuf>, timestamp_sec: f64) -> Self {
        Self {
            image_path: image_path.into(),
            timestamp_sec,
        }
    }
}

/// A time range of the caption track with its text
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CaptionInterval {
    pub start_sec: f64,
    pub end_sec: f64,
    pub text: String,
}

impl CaptionInterval {
    pub fn new(start_sec: f64, end_sec: f64, text: impl Into<String>) -> Self {
        Self {
            start_sec,
            end_sec,
            text: text.into(),
        }
    }

    /// Inclusive on both ends
    pub fn contains(&self, timestamp_sec: f64) -> bool {
        self.start_sec <= timestamp_sec && timestamp_sec <= self.end_sec
    }

    pub fn duration(&self) -> f64 {
        (self.end_sec - self.start_sec).max(0.0)
    }
}

/// A sampled frame paired with the caption shown at its timestamp
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlignedFrame {
    pub frame: Frame,
    /// Matched caption text, empty when no interval covers the frame
    pub text: String,
}

impl AlignedFrame {
    pub fn new(frame: Frame, text: impl Into<String>) -> Self {
        Self {
            frame,
            text: text.into(),
        }
    }

    pub fn image_path(&self) -> &Path {
        &self.frame.image_path
    }

    pub fn timestamp_sec(&self) -> f64 {
        self.frame.timestamp_sec
    }

    /// Caption length in characters, not bytes
    pub fn text_len(&self) -> usize {
        self.text.chars().count()
    }
}

/// One merged unit of output: a representative image and the text of every
/// aligned frame folded into it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Step {
    pub representative_image: PathBuf,
    pub combined_text: String,
    /// Half-open range of aligned-frame indices covered by this step
    pub frame_range: Range<usize>,
    pub start_sec: f64,
    pub end_sec: f64,
}

impl Step {
    pub fn frame_count(&self) -> usize {
        self.frame_range.len()
    }
}

/// Compact visual signature of an image, compared by bit distance
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Fingerprint(Vec<u8>);

impl Fingerprint {
    pub fn from_bytes(bytes: impl Into<Vec<u8>>) -> Self {
        Self(bytes.into())
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Number of differing bits; bytes present in only one side count fully
    pub fn hamming_distance(&self, other: &Fingerprint) -> u32 {
        let (short, long) = if self.0.len() <= other.0.len() {
            (&self.0, &other.0)
        } else {
            (&other.0, &self.0)
        };

        let shared: u32 = short
            .iter()
            .zip(long.iter())
            .map(|(a, b)| (a ^ b).count_ones())
            .sum();
        let tail: u32 = long[short.len()..].iter().map(|b| b.count_ones()).sum();
        shared + tail
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for byte in &self.0 {
            write!(f, "{:02x}", byte)?;
        }
        Ok(())
    }
}

/// A sampled frame that could not be persisted
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DroppedFrame {
    pub frame_index: u64,
    pub timestamp_sec: f64,
    pub image_path: PathBuf,
    pub reason: String,
}

/// Result of sampling one video
#[derive(Debug, Clone, Default, Serialize)]
pub struct SamplingReport {
    pub frames: Vec<Frame>,
    pub dropped: Vec<DroppedFrame>,
    pub frame_rate: f64,
    pub stride: u64,
    pub decoded_frames: u64,
    /// Decoder error that ended the stream before its end, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub truncated: Option<String>,
}

/// A caption block that was skipped during parsing
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SkippedBlock {
    /// 1-based position of the block in the payload
    pub block: usize,
    /// 1-based line where the block starts
    pub line: usize,
    pub reason: String,
}

/// Result of parsing one caption payload
#[derive(Debug, Clone, Default, Serialize)]
pub struct TranscriptReport {
    pub intervals: Vec<CaptionInterval>,
    pub skipped: Vec<SkippedBlock>,
}

impl TranscriptReport {
    pub fn is_empty(&self) -> bool {
        self.intervals.is_empty()
    }
}

/// Result of grouping an aligned sequence into steps
#[derive(Debug, Clone, Default, Serialize)]
pub struct MergeReport {
    pub steps: Vec<Step>,
    /// Images whose fingerprint could not be computed
    pub unfingerprinted: Vec<PathBuf>,
}

/// A step together with the narrative produced for it
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InstructionStep {
    /// 1-based step number
    pub index: usize,
    pub step: Step,
    pub narrative: String,
}

/// Overall state of one job run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobState {
    Processing,
    Completed,
    Failed,
}

/// Outcome of one document builder within a job
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BuilderState {
    Succeeded,
    Failed,
}

/// Persisted run status of a job
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobStatus {
    pub state: JobState,
    pub updated_at: DateTime<Local>,
    #[serde(default)]
    pub builders: BTreeMap<String, BuilderState>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl JobStatus {
    pub fn new(state: JobState) -> Self {
        Self {
            state,
            updated_at: Local::now(),
            builders: BTreeMap::new(),
            error: None,
        }
    }

    /// Move to a new state, keeping builder results
    pub fn transition(&mut self, state: JobState) {
        self.state = state;
        self.updated_at = Local::now();
    }

    pub fn record_builder(&mut self, builder: &str, state: BuilderState) {
        self.builders.insert(builder.to_string(), state);
        self.updated_at = Local::now();
    }

    pub fn fail(&mut self, message: impl Into<String>) {
        self.error = Some(message.into());
        self.transition(JobState::Failed);
    }

    pub fn is_completed(&self) -> bool {
        self.state == JobState::Completed
    }
}

/// Input files of one job
#[derive(Debug, Clone, PartialEq)]
pub struct JobSpec {
    pub name: String,
    pub video_path: PathBuf,
    pub captions_path: PathBuf,
    pub output_dir: PathBuf,
}

impl JobSpec {
    pub fn new(
        name: impl Into<String>,
        video_path: impl Into<PathBuf>,
        captions_path: impl Into<PathBuf>,
        output_dir: impl Into<PathBuf>,
    ) -> Result<Self, DomainError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(DomainError::BadArgs("Job name cannot be empty".to_string()));
        }
        Ok(Self {
            name,
            video_path: video_path.into(),
            captions_path: captions_path.into(),
            output_dir: output_dir.into(),
        })
    }

    pub fn status_file(&self) -> PathBuf {
        self.output_dir.join("status.json")
    }

    pub fn screenshots_dir(&self) -> PathBuf {
        self.output_dir.join("screenshots")
    }
}
