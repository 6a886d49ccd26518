//! Greedy similarity-based grouping of aligned frames into steps
//!
//! The merger walks the aligned sequence once, left to right. Each group keeps
//! the image of its first frame as a fixed representative; a later frame joins
//! the open group when its caption is short or its image is close to the
//! representative, otherwise it closes the group and opens a new one. Merge
//! decisions are never revisited.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::domain::model::{AlignedFrame, Fingerprint, MergeReport, Step};
use crate::ports::FingerprintPort;

/// Why a frame was folded into the open group or started a new one
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergeDecision {
    /// Caption shorter than the minimum text length
    ShortText,
    /// Image within the similarity threshold of the representative
    SimilarImage { distance: u32 },
    /// Neither trigger fired; `None` when either fingerprint is unavailable
    NewStep { distance: Option<u32> },
}

impl MergeDecision {
    pub fn merges(&self) -> bool {
        !matches!(self, MergeDecision::NewStep { .. })
    }
}

/// The group currently accumulating frames
struct OpenGroup {
    first_index: usize,
    representative: PathBuf,
    fingerprint: Option<Fingerprint>,
    texts: Vec<String>,
    start_sec: f64,
    end_sec: f64,
}

impl OpenGroup {
    fn seed(index: usize, frame: &AlignedFrame, fingerprint: Option<Fingerprint>) -> Self {
        Self {
            first_index: index,
            representative: frame.image_path().to_path_buf(),
            fingerprint,
            texts: vec![frame.text.clone()],
            start_sec: frame.timestamp_sec(),
            end_sec: frame.timestamp_sec(),
        }
    }

    fn absorb(&mut self, frame: &AlignedFrame) {
        self.texts.push(frame.text.clone());
        self.end_sec = frame.timestamp_sec();
    }

    fn close(self, end_index: usize) -> Step {
        let combined_text = self
            .texts
            .iter()
            .filter(|text| !text.is_empty())
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(" ");

        Step {
            representative_image: self.representative,
            combined_text,
            frame_range: self.first_index..end_index,
            start_sec: self.start_sec,
            end_sec: self.end_sec,
        }
    }
}

/// Fold state: closed steps plus at most one open group
#[derive(Default)]
struct FoldState {
    closed: Vec<Step>,
    open: Option<OpenGroup>,
    unfingerprinted: Vec<PathBuf>,
}

/// Collapses an aligned frame sequence into instructional steps
pub struct SegmentMerger {
    fingerprinter: Arc<dyn FingerprintPort>,
}

impl SegmentMerger {
    pub fn new(fingerprinter: Arc<dyn FingerprintPort>) -> Self {
        Self { fingerprinter }
    }

    /// Group `aligned` into steps. Empty input yields no steps; otherwise every
    /// frame lands in exactly one step and step order follows input order.
    pub fn merge(
        &self,
        aligned: &[AlignedFrame],
        min_text_length: usize,
        similarity_threshold: u32,
    ) -> MergeReport {
        info!(
            "Grouping {} aligned frames (min_text_length={}, similarity_threshold={})",
            aligned.len(),
            min_text_length,
            similarity_threshold
        );

        let state = aligned
            .iter()
            .enumerate()
            .fold(FoldState::default(), |mut state, (index, frame)| {
                let fingerprint = self.fingerprint(frame.image_path(), &mut state.unfingerprinted);

                state.open = Some(match state.open.take() {
                    None => OpenGroup::seed(index, frame, fingerprint),
                    Some(mut group) => {
                        let decision = self.decide(
                            group.fingerprint.as_ref(),
                            frame,
                            fingerprint.as_ref(),
                            min_text_length,
                            similarity_threshold,
                        );
                        debug!("Frame {} at {:.3}s: {:?}", index, frame.timestamp_sec(), decision);

                        if decision.merges() {
                            group.absorb(frame);
                            group
                        } else {
                            state.closed.push(group.close(index));
                            OpenGroup::seed(index, frame, fingerprint)
                        }
                    }
                });
                state
            });

        let mut steps = state.closed;
        steps.extend(state.open.map(|group| group.close(aligned.len())));

        info!(
            "Grouped {} frames into {} steps",
            aligned.len(),
            steps.len()
        );

        MergeReport {
            steps,
            unfingerprinted: state.unfingerprinted,
        }
    }

    /// Apply the two independent merge triggers
    fn decide(
        &self,
        representative: Option<&Fingerprint>,
        frame: &AlignedFrame,
        fingerprint: Option<&Fingerprint>,
        min_text_length: usize,
        similarity_threshold: u32,
    ) -> MergeDecision {
        let distance = match (representative, fingerprint) {
            (Some(representative), Some(current)) => {
                Some(self.fingerprinter.distance(representative, current))
            }
            _ => None,
        };

        if frame.text_len() < min_text_length {
            return MergeDecision::ShortText;
        }

        match distance {
            Some(distance) if distance <= similarity_threshold => {
                MergeDecision::SimilarImage { distance }
            }
            distance => MergeDecision::NewStep { distance },
        }
    }

    fn fingerprint(&self, path: &Path, unfingerprinted: &mut Vec<PathBuf>) -> Option<Fingerprint> {
        match self.fingerprinter.fingerprint(path) {
            Ok(fingerprint) => Some(fingerprint),
            Err(e) => {
                warn!(
                    "Could not fingerprint {}, treating it as dissimilar: {}",
                    path.display(),
                    e
                );
                if !unfingerprinted.iter().any(|p| p == path) {
                    unfingerprinted.push(path.to_path_buf());
                }
                None
            }
        }
    }
}
