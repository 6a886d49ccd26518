// Step interactor - Runs the four core stages for one video/caption pair

use std::path::Path;
use std::sync::Arc;

use serde::Serialize;
use tracing::info;

use crate::domain::config::AppConfig;
use crate::domain::model::*;
use crate::engine::{FrameAligner, FrameSampler, SegmentMerger, SubtitleParser};
use crate::error::{StepDocError, StepDocResult};
use crate::ports::*;

/// Parameters of one core run, taken from the resolved configuration
#[derive(Debug, Clone, PartialEq)]
pub struct StepSettings {
    pub interval_sec: f64,
    pub min_text_length: usize,
    pub similarity_threshold: u32,
    pub require_captions: bool,
}

impl From<&AppConfig> for StepSettings {
    fn from(config: &AppConfig) -> Self {
        Self {
            interval_sec: config.sampling.interval_sec,
            min_text_length: config.grouping.min_text_length,
            similarity_threshold: config.grouping.similarity_threshold,
            require_captions: config.grouping.require_captions,
        }
    }
}

impl Default for StepSettings {
    fn default() -> Self {
        Self::from(&AppConfig::default())
    }
}

/// Everything the core produced for one run
#[derive(Debug, Clone, Serialize)]
pub struct StepOutcome {
    pub sampling: SamplingReport,
    pub transcript: TranscriptReport,
    pub aligned: Vec<AlignedFrame>,
    pub merge: MergeReport,
}

impl StepOutcome {
    pub fn steps(&self) -> &[Step] {
        &self.merge.steps
    }
}

/// Interactor for the sample, parse, align and merge pipeline
pub struct StepInteractor {
    sampler: FrameSampler,
    parser: SubtitleParser,
    aligner: FrameAligner,
    merger: SegmentMerger,
}

impl StepInteractor {
    /// Create new step interactor with injected ports
    pub fn new(
        decode_port: Arc<dyn DecodePort>,
        store_port: Arc<dyn FrameStorePort>,
        fingerprint_port: Arc<dyn FingerprintPort>,
    ) -> Self {
        Self {
            sampler: FrameSampler::new(decode_port, store_port),
            parser: SubtitleParser::new(),
            aligner: FrameAligner::new(),
            merger: SegmentMerger::new(fingerprint_port),
        }
    }

    /// Enable per-frame debug logging in the sampler
    pub fn with_debug(mut self) -> Self {
        self.sampler = self.sampler.with_debug();
        self
    }

    /// Run the core once, writing sampled frames into `screenshots_dir`
    pub fn extract(
        &self,
        video: &Path,
        captions: &Path,
        screenshots_dir: &Path,
        settings: &StepSettings,
    ) -> StepDocResult<StepOutcome> {
        let sampling = self.sampler.sample(video, screenshots_dir, settings.interval_sec)?;
        if sampling.frames.is_empty() {
            return Err(StepDocError::NoFramesSampled {
                path: video.to_path_buf(),
            });
        }

        if settings.require_captions && !captions.exists() {
            return Err(StepDocError::CaptionsNotFound {
                path: captions.to_path_buf(),
            });
        }
        let transcript = self.parser.parse_file(captions);
        if settings.require_captions && transcript.is_empty() {
            return Err(StepDocError::CaptionsEmpty {
                path: captions.to_path_buf(),
            });
        }

        let aligned = self.aligner.align(&sampling.frames, &transcript.intervals);
        let merge = self.merger.merge(
            &aligned,
            settings.min_text_length,
            settings.similarity_threshold,
        );

        info!(
            "Extracted {} steps from {} frames and {} captions",
            merge.steps.len(),
            sampling.frames.len(),
            transcript.intervals.len()
        );

        Ok(StepOutcome {
            sampling,
            transcript,
            aligned,
            merge,
        })
    }
}
