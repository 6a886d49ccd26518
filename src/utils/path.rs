//! Path utilities for frame files and generated documents

use std::path::{Component, Path, PathBuf};

/// Path helpers shared by the sampler and the document builders
pub struct PathUtils;

impl PathUtils {
    /// Zero-padded sequential frame file name. Lexical order equals sampling order
    /// up to ordinal 99_999 (about 139 hours at a 5 s interval); past that the
    /// name widens and only numeric order holds.
    pub fn frame_file_name(ordinal: u64) -> String {
        format!("frame_{:05}.png", ordinal)
    }

    /// Express `target` relative to `base` when both share a prefix, otherwise return it unchanged
    pub fn relative_to(target: &Path, base: &Path) -> PathBuf {
        let target_parts: Vec<Component> = target.components().collect();
        let base_parts: Vec<Component> = base.components().collect();

        let common = target_parts
            .iter()
            .zip(base_parts.iter())
            .take_while(|(a, b)| a == b)
            .count();

        if common == 0 {
            return target.to_path_buf();
        }

        let mut relative = PathBuf::new();
        for _ in common..base_parts.len() {
            relative.push("..");
        }
        for part in &target_parts[common..] {
            relative.push(part.as_os_str());
        }
        relative
    }

    /// Render a path with forward slashes for Markdown and HTML links
    pub fn to_link(path: &Path) -> String {
        path.to_string_lossy().replace('\\', "/")
    }
}
