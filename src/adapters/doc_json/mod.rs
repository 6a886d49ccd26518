// JSON document builder - Machine-readable step list

use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::info;

use crate::domain::errors::DomainError;
use crate::domain::model::InstructionStep;
use crate::ports::DocumentPort;
use crate::utils::path::PathUtils;

#[derive(Serialize)]
struct JsonDocument<'a> {
    title: &'a str,
    steps: Vec<JsonStep<'a>>,
}

#[derive(Serialize)]
struct JsonStep<'a> {
    index: usize,
    image: String,
    start_sec: f64,
    end_sec: f64,
    frames: usize,
    captions: &'a str,
    narrative: &'a str,
}

/// Writes `steps.json`
pub struct JsonDocumentBuilder;

impl JsonDocumentBuilder {
    pub fn new() -> Self {
        Self
    }
}

impl Default for JsonDocumentBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl DocumentPort for JsonDocumentBuilder {
    fn name(&self) -> &str {
        "JSON"
    }

    fn dir_name(&self) -> &str {
        "json"
    }

    fn build(
        &self,
        title: &str,
        steps: &[InstructionStep],
        output_dir: &Path,
    ) -> Result<PathBuf, DomainError> {
        std::fs::create_dir_all(output_dir)
            .map_err(|e| DomainError::FsFail(format!("Failed to create {}: {}", output_dir.display(), e)))?;

        let document = JsonDocument {
            title,
            steps: steps
                .iter()
                .map(|item| JsonStep {
                    index: item.index,
                    image: PathUtils::to_link(&PathUtils::relative_to(
                        &item.step.representative_image,
                        output_dir,
                    )),
                    start_sec: item.step.start_sec,
                    end_sec: item.step.end_sec,
                    frames: item.step.frame_count(),
                    captions: &item.step.combined_text,
                    narrative: &item.narrative,
                })
                .collect(),
        };

        let json = serde_json::to_string_pretty(&document)
            .map_err(|e| DomainError::DocumentFail(format!("JSON serialization failed: {}", e)))?;

        let path = output_dir.join("steps.json");
        std::fs::write(&path, json)
            .map_err(|e| DomainError::DocumentFail(format!("Failed to write {}: {}", path.display(), e)))?;

        info!("Wrote JSON document with {} steps to {}", steps.len(), path.display());
        Ok(path)
    }
}
