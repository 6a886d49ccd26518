use std::sync::Arc;

use tracing::warn;

use crate::adapters::{
    create_content_provider, create_document_builder, JsonStatusStore, LibavDecodeAdapter,
    PerceptualHashAdapter, PngFrameStore,
};
use crate::app::{job_runner::JobRunner, step_interactor::StepInteractor};
use crate::domain::config::AppConfig;
use crate::domain::errors::DomainError;
use crate::ports::{DecodePort, DocumentPort, FingerprintPort, FrameStorePort, StatusPort};

pub trait AppContainer: Send + Sync {
    fn step_interactor(&self) -> Arc<StepInteractor>;
    fn job_runner(&self) -> Arc<JobRunner>;
}

pub struct DefaultAppContainer {
    step_interactor: Arc<StepInteractor>,
    job_runner: Arc<JobRunner>,
}

impl DefaultAppContainer {
    pub fn new(config: &AppConfig) -> Result<Self, DomainError> {
        let decode_port = Arc::new(LibavDecodeAdapter::new()?);
        let store_port = Arc::new(PngFrameStore::new());
        let fingerprint_port = Arc::new(PerceptualHashAdapter::new());

        let mut steps = StepInteractor::new(
            Arc::clone(&decode_port) as Arc<dyn DecodePort>,
            Arc::clone(&store_port) as Arc<dyn FrameStorePort>,
            Arc::clone(&fingerprint_port) as Arc<dyn FingerprintPort>,
        );
        if matches!(config.logging.level.to_ascii_lowercase().as_str(), "debug" | "trace") {
            steps = steps.with_debug();
        }
        let step_interactor = Arc::new(steps);

        let job_runner = Arc::new(JobRunner::new(
            Arc::clone(&step_interactor),
            create_content_provider(&config.content),
            Arc::new(JsonStatusStore::new()) as Arc<dyn StatusPort>,
            Self::document_builders(&config.output.builders),
            config.clone(),
        ));

        Ok(Self {
            step_interactor,
            job_runner,
        })
    }

    /// Builders for the configured names; unknown names are skipped
    pub fn document_builders(names: &[String]) -> Vec<Arc<dyn DocumentPort>> {
        names
            .iter()
            .filter_map(|name| {
                let builder = create_document_builder(name);
                if builder.is_none() {
                    warn!("Unknown document builder '{}', skipping", name);
                }
                builder
            })
            .collect()
    }
}

impl AppContainer for DefaultAppContainer {
    fn step_interactor(&self) -> Arc<StepInteractor> {
        Arc::clone(&self.step_interactor)
    }

    fn job_runner(&self) -> Arc<JobRunner> {
        Arc::clone(&self.job_runner)
    }
}
