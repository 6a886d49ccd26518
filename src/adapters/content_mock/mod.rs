// Mock content provider - Deterministic placeholder narratives for offline runs

use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;
use tracing::debug;

use crate::domain::errors::DomainError;
use crate::ports::ContentPort;

/// Placeholder text returned for every prompt
pub const MOCK_NARRATIVE: &str = "[MOCK NARRATIVE]\n\
1. This step was generated without a content provider.\n\
2. Configure a GEMINI provider and API key for real narratives.";

/// Content provider that needs no network access or credentials
pub struct MockContentProvider {
    latency: Duration,
}

impl MockContentProvider {
    pub fn new() -> Self {
        Self {
            latency: Duration::ZERO,
        }
    }

    /// Simulate a request round-trip before answering
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }
}

impl Default for MockContentProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ContentPort for MockContentProvider {
    fn name(&self) -> &str {
        "MOCK"
    }

    async fn generate(&self, prompt: &str, image: Option<&Path>) -> Result<String, DomainError> {
        debug!(
            "Mock generation for {} prompt chars (image: {})",
            prompt.chars().count(),
            image.is_some()
        );
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
        Ok(MOCK_NARRATIVE.to_string())
    }
}
