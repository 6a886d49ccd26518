//! Frame sampling at a fixed interval

use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, info, warn};

use crate::domain::model::{DroppedFrame, Frame, SamplingReport};
use crate::error::{StepDocError, StepDocResult};
use crate::ports::{DecodePort, FrameStorePort};
use crate::utils::path::PathUtils;

/// Samples every `stride`-th decoded frame of a video and writes it to disk
pub struct FrameSampler {
    decoder: Arc<dyn DecodePort>,
    store: Arc<dyn FrameStorePort>,
    /// Enable per-frame debug logging
    debug: bool,
}

impl FrameSampler {
    /// Create a new sampler over the given decoder and frame store
    pub fn new(decoder: Arc<dyn DecodePort>, store: Arc<dyn FrameStorePort>) -> Self {
        Self {
            decoder,
            store,
            debug: false,
        }
    }

    /// Enable debug logging
    pub fn with_debug(mut self) -> Self {
        self.debug = true;
        self
    }

    /// Frame-count stride for a sampling interval, never less than one frame
    pub fn compute_stride(fps: f64, interval_sec: f64) -> u64 {
        (fps * interval_sec).round().max(1.0) as u64
    }

    /// Sample `source` every `interval_sec` seconds into `output_dir`
    pub fn sample(
        &self,
        source: &Path,
        output_dir: &Path,
        interval_sec: f64,
    ) -> StepDocResult<SamplingReport> {
        let started = Instant::now();

        if !interval_sec.is_finite() || interval_sec <= 0.0 {
            return Err(StepDocError::InvalidInterval { interval_sec });
        }

        if !source.exists() {
            return Err(StepDocError::SourceNotFound {
                path: source.to_path_buf(),
            });
        }

        let mut stream = self
            .decoder
            .open(source)
            .map_err(|e| StepDocError::SourceUnopenable {
                path: source.to_path_buf(),
                message: e.to_string(),
            })?;

        let fps = stream.frame_rate();
        if !fps.is_finite() || fps <= 0.0 {
            return Err(StepDocError::InvalidFrameRate {
                path: source.to_path_buf(),
                fps,
            });
        }

        std::fs::create_dir_all(output_dir).map_err(|e| StepDocError::OutputError {
            path: output_dir.to_path_buf(),
            message: e.to_string(),
        })?;

        let stride = Self::compute_stride(fps, interval_sec);
        info!(
            "Sampling {} every {}s ({} frames at {:.3} fps)",
            source.display(),
            interval_sec,
            stride,
            fps
        );

        let mut report = SamplingReport {
            frame_rate: fps,
            stride,
            ..Default::default()
        };

        let mut frame_index = 0u64;
        loop {
            let image = match stream.next_frame() {
                Ok(Some(image)) => image,
                Ok(None) => break,
                Err(e) => {
                    warn!(
                        "Decoding of {} stopped after {} frames: {}",
                        source.display(),
                        frame_index,
                        e
                    );
                    report.truncated = Some(e.to_string());
                    break;
                }
            };

            if frame_index % stride == 0 {
                let ordinal = frame_index / stride;
                let timestamp_sec = frame_index as f64 / fps;
                let image_path = output_dir.join(PathUtils::frame_file_name(ordinal));

                match self.store.store(&image, &image_path) {
                    Ok(()) => {
                        if self.debug {
                            debug!(
                                "Saved frame {} at {:.3}s to {}",
                                frame_index,
                                timestamp_sec,
                                image_path.display()
                            );
                        }
                        report.frames.push(Frame::new(image_path, timestamp_sec));
                    }
                    Err(e) => {
                        warn!(
                            "Could not write frame {} ({:.3}s), skipping: {}",
                            frame_index, timestamp_sec, e
                        );
                        report.dropped.push(DroppedFrame {
                            frame_index,
                            timestamp_sec,
                            image_path,
                            reason: e.to_string(),
                        });
                    }
                }
            }
            frame_index += 1;
        }

        report.decoded_frames = frame_index;
        info!(
            "Sampled {} frames ({} dropped) from {} decoded in {:.2}s",
            report.frames.len(),
            report.dropped.len(),
            frame_index,
            started.elapsed().as_secs_f64()
        );

        Ok(report)
    }
}
