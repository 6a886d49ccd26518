// Adapters - External system implementations

pub mod content_gemini;
pub mod content_mock;
pub mod decode_libav;
pub mod doc_html;
pub mod doc_json;
pub mod doc_markdown;
pub mod fingerprint_phash;
pub mod png_store;
pub mod status_json;
pub mod toml_config;

use std::sync::Arc;
use std::time::Duration;

use tracing::{info, warn};

use crate::domain::config::ContentConfig;
use crate::ports::{ContentPort, DocumentPort};

// Re-export adapters
pub use content_gemini::GeminiContentProvider;
pub use content_mock::MockContentProvider;
pub use decode_libav::LibavDecodeAdapter;
pub use doc_html::HtmlDocumentBuilder;
pub use doc_json::JsonDocumentBuilder;
pub use doc_markdown::MarkdownDocumentBuilder;
pub use fingerprint_phash::PerceptualHashAdapter;
pub use png_store::PngFrameStore;
pub use status_json::JsonStatusStore;
pub use toml_config::TomlConfigAdapter;

/// Content provider for the configured variant name
///
/// Unknown names and a GEMINI selection without an API key fall back to MOCK.
pub fn create_content_provider(config: &ContentConfig) -> Arc<dyn ContentPort> {
    let mock = || -> Arc<dyn ContentPort> {
        Arc::new(MockContentProvider::new().with_latency(Duration::from_millis(config.mock_latency_ms)))
    };

    let provider: Arc<dyn ContentPort> = match config.provider.trim().to_ascii_uppercase().as_str() {
        "MOCK" => mock(),
        "GEMINI" => match config.api_key.as_deref().filter(|key| !key.trim().is_empty()) {
            None => {
                warn!("GEMINI selected but no API key is configured, using MOCK");
                mock()
            }
            Some(key) => {
                match GeminiContentProvider::new(
                    key,
                    config.model.clone(),
                    Duration::from_secs(config.request_timeout_sec),
                ) {
                    Ok(gemini) => match &config.base_url {
                        Some(url) => Arc::new(gemini.with_base_url(url.clone())),
                        None => Arc::new(gemini),
                    },
                    Err(e) => {
                        warn!("Could not initialise GEMINI provider, using MOCK: {}", e);
                        mock()
                    }
                }
            }
        },
        other => {
            warn!("Unknown content provider '{}', using MOCK", other);
            mock()
        }
    };

    info!("Content provider: {}", provider.name());
    provider
}

/// Document builder for a variant name, `None` when the name is unknown
pub fn create_document_builder(name: &str) -> Option<Arc<dyn DocumentPort>> {
    match name.trim().to_ascii_uppercase().as_str() {
        "MARKDOWN" | "MD" => Some(Arc::new(MarkdownDocumentBuilder::new())),
        "HTML" => Some(Arc::new(HtmlDocumentBuilder::new())),
        "JSON" => Some(Arc::new(JsonDocumentBuilder::new())),
        _ => None,
    }
}
