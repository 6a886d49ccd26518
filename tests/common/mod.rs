//! Shared fixtures for integration tests

#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::sync::Arc;

use image::{Rgb, RgbImage};
use stepdoc::adapters::{PerceptualHashAdapter, PngFrameStore};
use stepdoc::app::StepInteractor;
use stepdoc::ports::{DecodePort, FrameStream};
use stepdoc::DomainError;

/// Deterministic grey-level noise; distinct seeds give unrelated screens
pub fn noise_image(seed: u32) -> RgbImage {
    let mut state = seed.wrapping_mul(2_654_435_761).wrapping_add(0x9e37_79b9);
    RgbImage::from_fn(64, 64, |_, _| {
        state ^= state << 13;
        state ^= state >> 17;
        state ^= state << 5;
        let v = (state >> 24) as u8;
        Rgb([v, v, v])
    })
}

/// Decoder replaying a fixed list of frames at a fixed rate
pub struct ScriptedDecoder {
    pub fps: f64,
    pub frames: Vec<RgbImage>,
}

impl ScriptedDecoder {
    /// One frame per screen seed
    pub fn from_screens(fps: f64, seeds: &[u32]) -> Self {
        Self {
            fps,
            frames: seeds.iter().map(|s| noise_image(*s)).collect(),
        }
    }
}

struct ScriptedStream {
    fps: f64,
    frames: std::vec::IntoIter<RgbImage>,
}

impl FrameStream for ScriptedStream {
    fn frame_rate(&self) -> f64 {
        self.fps
    }

    fn next_frame(&mut self) -> Result<Option<RgbImage>, DomainError> {
        Ok(self.frames.next())
    }
}

impl DecodePort for ScriptedDecoder {
    fn open(&self, _source: &Path) -> Result<Box<dyn FrameStream>, DomainError> {
        Ok(Box::new(ScriptedStream {
            fps: self.fps,
            frames: self.frames.clone().into_iter(),
        }))
    }
}

/// Step interactor over scripted frames with the real PNG store and pHash fingerprinter
pub fn scripted_interactor(fps: f64, seeds: &[u32]) -> StepInteractor {
    StepInteractor::new(
        Arc::new(ScriptedDecoder::from_screens(fps, seeds)),
        Arc::new(PngFrameStore::new()),
        Arc::new(PerceptualHashAdapter::new()),
    )
}

/// Render caption entries `(start_sec, end_sec, text)` as SRT
pub fn srt(entries: &[(u32, u32, &str)]) -> String {
    entries
        .iter()
        .enumerate()
        .map(|(i, (start, end, text))| {
            format!(
                "{}\n00:00:{:02},000 --> 00:00:{:02},000\n{}\n",
                i + 1,
                start,
                end,
                text
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Write a placeholder video file and a caption file into `dir`
pub fn write_job_inputs(dir: &Path, captions: Option<&str>) -> (PathBuf, PathBuf) {
    std::fs::create_dir_all(dir).unwrap();
    let video = dir.join("video.mp4");
    std::fs::write(&video, b"scripted").unwrap();
    let srt_path = dir.join("transkript.srt");
    if let Some(content) = captions {
        std::fs::write(&srt_path, content).unwrap();
    }
    (video, srt_path)
}
