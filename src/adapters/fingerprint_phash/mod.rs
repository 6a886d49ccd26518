//! Perceptual hash fingerprinting
//!
//! DCT-based perceptual hash over an 8x8 grid of low frequencies, 64 bits per
//! image, compared by Hamming distance.

use std::path::Path;

use image_hasher::{HashAlg, Hasher, HasherConfig};

use crate::domain::errors::DomainError;
use crate::domain::model::Fingerprint;
use crate::ports::FingerprintPort;

/// Fingerprinter computing pHash values with `image_hasher`
pub struct PerceptualHashAdapter {
    hasher: Hasher,
}

impl PerceptualHashAdapter {
    pub fn new() -> Self {
        Self::with_hash_size(8)
    }

    /// Hash grid of `size` x `size` bits
    pub fn with_hash_size(size: u32) -> Self {
        let hasher = HasherConfig::new()
            .hash_alg(HashAlg::Median)
            .preproc_dct()
            .hash_size(size, size)
            .to_hasher();
        Self { hasher }
    }
}

impl Default for PerceptualHashAdapter {
    fn default() -> Self {
        Self::new()
    }
}

impl FingerprintPort for PerceptualHashAdapter {
    fn fingerprint(&self, path: &Path) -> Result<Fingerprint, DomainError> {
        let image = image::open(path).map_err(|e| {
            DomainError::FingerprintFail(format!("Cannot read {}: {}", path.display(), e))
        })?;
        let hash = self.hasher.hash_image(&image);
        Ok(Fingerprint::from_bytes(hash.as_bytes().to_vec()))
    }
}
