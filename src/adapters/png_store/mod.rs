// PNG frame store - Writes sampled frames as lossless PNG files

use std::path::Path;

use image::{ImageFormat, RgbImage};

use crate::domain::errors::DomainError;
use crate::ports::FrameStorePort;

/// Frame store writing PNG files with the `image` crate
pub struct PngFrameStore;

impl PngFrameStore {
    pub fn new() -> Self {
        Self
    }
}

impl Default for PngFrameStore {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameStorePort for PngFrameStore {
    fn store(&self, image: &RgbImage, path: &Path) -> Result<(), DomainError> {
        image
            .save_with_format(path, ImageFormat::Png)
            .map_err(|e| DomainError::FsFail(format!("Failed to write {}: {}", path.display(), e)))
    }
}
