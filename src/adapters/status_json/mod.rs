// JSON status store - Per-job run status in status.json

use std::path::Path;

use tracing::warn;

use crate::domain::errors::DomainError;
use crate::domain::model::JobStatus;
use crate::ports::StatusPort;

/// Status store writing pretty-printed JSON files
pub struct JsonStatusStore;

impl JsonStatusStore {
    pub fn new() -> Self {
        Self
    }
}

impl Default for JsonStatusStore {
    fn default() -> Self {
        Self::new()
    }
}

impl StatusPort for JsonStatusStore {
    fn load(&self, status_file: &Path) -> Option<JobStatus> {
        let content = std::fs::read_to_string(status_file).ok()?;
        match serde_json::from_str(&content) {
            Ok(status) => Some(status),
            Err(e) => {
                warn!("Ignoring corrupt status file {}: {}", status_file.display(), e);
                None
            }
        }
    }

    fn save(&self, status_file: &Path, status: &JobStatus) -> Result<(), DomainError> {
        if let Some(parent) = status_file.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                DomainError::FsFail(format!("Failed to create {}: {}", parent.display(), e))
            })?;
        }

        let json = serde_json::to_string_pretty(status)
            .map_err(|e| DomainError::ProcessingError(format!("Status serialization failed: {}", e)))?;
        std::fs::write(status_file, json).map_err(|e| {
            DomainError::FsFail(format!("Failed to write {}: {}", status_file.display(), e))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::{BuilderState, JobState};
    use tempfile::TempDir;

    #[test]
    fn test_save_then_load() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("job").join("status.json");
        let store = JsonStatusStore::new();

        let mut status = JobStatus::new(JobState::Processing);
        status.record_builder("MARKDOWN", BuilderState::Succeeded);
        status.transition(JobState::Completed);
        store.save(&file, &status).unwrap();

        let loaded = store.load(&file).unwrap();
        assert!(loaded.is_completed());
        assert_eq!(loaded.builders.get("MARKDOWN"), Some(&BuilderState::Succeeded));
    }

    #[test]
    fn test_missing_or_corrupt_file_loads_none() {
        let dir = TempDir::new().unwrap();
        let store = JsonStatusStore::new();
        assert!(store.load(&dir.path().join("status.json")).is_none());

        let corrupt = dir.path().join("corrupt.json");
        std::fs::write(&corrupt, "{ not json").unwrap();
        assert!(store.load(&corrupt).is_none());
    }
}
