// Markdown document builder - One section per step with image link and narrative

use std::path::{Path, PathBuf};

use tracing::info;

use crate::domain::errors::DomainError;
use crate::domain::model::InstructionStep;
use crate::ports::DocumentPort;
use crate::utils::path::PathUtils;
use crate::utils::time::TimecodeParser;

/// Render the steps as a Markdown document whose image links are relative to `base_dir`
pub fn render_markdown(title: &str, steps: &[InstructionStep], base_dir: &Path) -> String {
    let clock = TimecodeParser::new();
    let mut out = format!("# {}\n\n", title);

    for item in steps {
        let image = PathUtils::relative_to(&item.step.representative_image, base_dir);
        out.push_str(&format!("## Step {}\n\n", item.index));
        out.push_str(&format!(
            "![Step {}]({})\n\n",
            item.index,
            PathUtils::to_link(&image)
        ));
        out.push_str(&format!(
            "*{} - {}*\n\n",
            clock.format_clock(item.step.start_sec),
            clock.format_clock(item.step.end_sec)
        ));
        out.push_str(item.narrative.trim());
        out.push_str("\n\n");
    }

    out
}

/// Writes `steps.md`
pub struct MarkdownDocumentBuilder;

impl MarkdownDocumentBuilder {
    pub fn new() -> Self {
        Self
    }
}

impl Default for MarkdownDocumentBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl DocumentPort for MarkdownDocumentBuilder {
    fn name(&self) -> &str {
        "MARKDOWN"
    }

    fn dir_name(&self) -> &str {
        "markdown"
    }

    fn build(
        &self,
        title: &str,
        steps: &[InstructionStep],
        output_dir: &Path,
    ) -> Result<PathBuf, DomainError> {
        std::fs::create_dir_all(output_dir)
            .map_err(|e| DomainError::FsFail(format!("Failed to create {}: {}", output_dir.display(), e)))?;

        let path = output_dir.join("steps.md");
        std::fs::write(&path, render_markdown(title, steps, output_dir))
            .map_err(|e| DomainError::DocumentFail(format!("Failed to write {}: {}", path.display(), e)))?;

        info!("Wrote Markdown document with {} steps to {}", steps.len(), path.display());
        Ok(path)
    }
}
