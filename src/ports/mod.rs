// Ports - Interface definitions (contracts)

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use image::RgbImage;

use crate::domain::errors::*;
use crate::domain::model::*;

/// Port for opening a video as a stream of decoded frames
pub trait DecodePort: Send + Sync {
    /// Open the video at `source`; fails with `DecodeFail` when it cannot be decoded
    fn open(&self, source: &Path) -> Result<Box<dyn FrameStream>, DomainError>;
}

/// A sequence of decoded frames in presentation order
pub trait FrameStream {
    /// Frame rate reported by the container, possibly zero or imprecise
    fn frame_rate(&self) -> f64;

    /// Next decoded frame, `Ok(None)` at end of stream; an error ends the stream early
    fn next_frame(&mut self) -> Result<Option<RgbImage>, DomainError>;
}

/// Port for persisting sampled frames
pub trait FrameStorePort: Send + Sync {
    /// Write `image` to `path`, overwriting any existing file
    fn store(&self, image: &RgbImage, path: &Path) -> Result<(), DomainError>;
}

/// Port for perceptual image fingerprinting
pub trait FingerprintPort: Send + Sync {
    /// Compute the fingerprint of the image at `path`
    fn fingerprint(&self, path: &Path) -> Result<Fingerprint, DomainError>;

    /// Symmetric distance, 0 for identical images
    fn distance(&self, a: &Fingerprint, b: &Fingerprint) -> u32 {
        a.hamming_distance(b)
    }
}

/// Port for generative content providers
#[async_trait]
pub trait ContentPort: Send + Sync {
    /// Human readable provider name
    fn name(&self) -> &str;

    /// Produce narrative text for a prompt, optionally grounded on an image
    async fn generate(&self, prompt: &str, image: Option<&Path>) -> Result<String, DomainError>;
}

/// Port for document builders
pub trait DocumentPort: Send + Sync {
    /// Variant name used in configuration
    fn name(&self) -> &str;

    /// Directory name under the job output directory
    fn dir_name(&self) -> &str;

    /// Assemble the document into `output_dir` and return the written file
    fn build(
        &self,
        title: &str,
        steps: &[InstructionStep],
        output_dir: &Path,
    ) -> Result<PathBuf, DomainError>;
}

/// Port for job run status persistence
pub trait StatusPort: Send + Sync {
    /// Read the status of a job; `None` when absent or unreadable
    fn load(&self, status_file: &Path) -> Option<JobStatus>;

    /// Persist the status of a job
    fn save(&self, status_file: &Path, status: &JobStatus) -> Result<(), DomainError>;
}
