// Job runner - Drives the step factory over a tree of job directories

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use tracing::{error, info, warn};
use walkdir::WalkDir;

use crate::app::step_interactor::{StepInteractor, StepSettings};
use crate::domain::config::AppConfig;
use crate::domain::model::*;
use crate::error::{StepDocError, StepDocResult};
use crate::ports::*;

/// Prompt sent to the content provider for one step
pub fn build_prompt(transcript: &str) -> String {
    let transcript = if transcript.trim().is_empty() {
        "(no narration for this screen)"
    } else {
        transcript.trim()
    };
    format!(
        "You are writing a step of a software tutorial. The attached screenshot shows the \
screen for this step and the transcript below is what the presenter said meanwhile.\n\
Rewrite it as short, numbered, imperative instructions a reader can follow. \
Do not invent actions that are not supported by the transcript or screenshot.\n\n\
TRANSCRIPT: \"{}\"",
        transcript
    )
}

/// Result of running one job
#[derive(Debug, Clone, PartialEq)]
pub enum JobOutcome {
    Completed {
        steps: usize,
        documents: Vec<PathBuf>,
    },
    /// Already completed by an earlier run
    Skipped,
    Failed(String),
}

/// Totals of one runner invocation
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunSummary {
    pub completed: Vec<String>,
    pub skipped: Vec<String>,
    /// Job name and failure message
    pub failed: Vec<(String, String)>,
}

impl RunSummary {
    pub fn total(&self) -> usize {
        self.completed.len() + self.skipped.len() + self.failed.len()
    }

    fn record(&mut self, name: &str, outcome: &JobOutcome) {
        match outcome {
            JobOutcome::Completed { .. } => self.completed.push(name.to_string()),
            JobOutcome::Skipped => self.skipped.push(name.to_string()),
            JobOutcome::Failed(message) => self.failed.push((name.to_string(), message.clone())),
        }
    }
}

/// Interactor for the job factory
pub struct JobRunner {
    steps: Arc<StepInteractor>,
    content_port: Arc<dyn ContentPort>,
    status_port: Arc<dyn StatusPort>,
    builders: Vec<Arc<dyn DocumentPort>>,
    config: AppConfig,
}

impl JobRunner {
    /// Create new job runner with injected ports
    pub fn new(
        steps: Arc<StepInteractor>,
        content_port: Arc<dyn ContentPort>,
        status_port: Arc<dyn StatusPort>,
        builders: Vec<Arc<dyn DocumentPort>>,
        config: AppConfig,
    ) -> Self {
        Self {
            steps,
            content_port,
            status_port,
            builders,
            config,
        }
    }

    /// One job per immediate sub-directory of the input root, sorted by name
    pub fn discover_jobs(&self) -> StepDocResult<Vec<JobSpec>> {
        let paths = &self.config.paths;
        if !paths.input_dir.is_dir() {
            return Err(StepDocError::SourceNotFound {
                path: paths.input_dir.clone(),
            });
        }

        let mut jobs = Vec::new();
        for entry in WalkDir::new(&paths.input_dir)
            .min_depth(1)
            .max_depth(1)
            .sort_by_file_name()
        {
            let entry = entry.map_err(|e| StepDocError::IoError(e.into()))?;
            if !entry.file_type().is_dir() {
                continue;
            }

            let name = entry.file_name().to_string_lossy().to_string();
            let dir = entry.path();
            jobs.push(JobSpec::new(
                name.clone(),
                dir.join(&paths.video_file),
                dir.join(&paths.captions_file),
                paths.output_dir.join(&name),
            )?);
        }

        info!("Discovered {} jobs in {}", jobs.len(), paths.input_dir.display());
        Ok(jobs)
    }

    /// Run every discovered job, one after another
    pub async fn run_all(&self) -> StepDocResult<RunSummary> {
        let started = Instant::now();
        let jobs = self.discover_jobs()?;
        let mut summary = RunSummary::default();

        for job in &jobs {
            let outcome = self.run_job(job).await?;
            summary.record(&job.name, &outcome);
        }

        info!(
            "Finished {} jobs in {:.1}s: {} completed, {} skipped, {} failed",
            summary.total(),
            started.elapsed().as_secs_f64(),
            summary.completed.len(),
            summary.skipped.len(),
            summary.failed.len()
        );
        Ok(summary)
    }

    /// Run one job; job-level failures are recorded in its status and returned as
    /// [`JobOutcome::Failed`], only run-level failures are returned as errors
    pub async fn run_job(&self, job: &JobSpec) -> StepDocResult<JobOutcome> {
        let status_file = job.status_file();

        if let Some(previous) = self.status_port.load(&status_file) {
            if previous.is_completed() {
                info!("[{}] Already completed, skipping", job.name);
                return Ok(JobOutcome::Skipped);
            }
        }

        info!("[{}] Starting job", job.name);
        let mut status = JobStatus::new(JobState::Processing);
        if let Err(e) = self.status_port.save(&status_file, &status) {
            error!("[{}] Cannot write job status: {}", job.name, e);
            return Ok(JobOutcome::Failed(format!("Cannot write job status: {}", e)));
        }

        let outcome = match self.process(job, &mut status).await {
            Ok(outcome) => outcome,
            Err(e) if e.is_job_fatal() => {
                error!("[{}] Job failed: {}", job.name, e);
                status.fail(e.to_string());
                JobOutcome::Failed(e.to_string())
            }
            Err(e) => return Err(e),
        };

        match self.status_port.save(&status_file, &status) {
            Ok(()) => Ok(outcome),
            Err(e) => {
                error!("[{}] Cannot write final job status: {}", job.name, e);
                match outcome {
                    JobOutcome::Failed(message) => Ok(JobOutcome::Failed(message)),
                    _ => Ok(JobOutcome::Failed(format!("Cannot write job status: {}", e))),
                }
            }
        }
    }

    async fn process(&self, job: &JobSpec, status: &mut JobStatus) -> StepDocResult<JobOutcome> {
        Self::check_input(&job.video_path, || StepDocError::SourceNotFound {
            path: job.video_path.clone(),
        })?;
        if self.config.grouping.require_captions {
            Self::check_input(&job.captions_path, || StepDocError::CaptionsNotFound {
                path: job.captions_path.clone(),
            })?;
        }

        let settings = StepSettings::from(&self.config);
        let outcome = self.steps.extract(
            &job.video_path,
            &job.captions_path,
            &job.screenshots_dir(),
            &settings,
        )?;

        let instructions = self.narrate(&job.name, outcome.steps()).await;
        let title = self.config.output.title.clone().unwrap_or_else(|| job.name.clone());

        let mut documents = Vec::new();
        let mut failed_builders = Vec::new();
        for builder in &self.builders {
            let dir = job.output_dir.join(builder.dir_name());
            match builder.build(&title, &instructions, &dir) {
                Ok(path) => {
                    status.record_builder(builder.name(), BuilderState::Succeeded);
                    documents.push(path);
                }
                Err(e) => {
                    warn!("[{}] Builder {} failed: {}", job.name, builder.name(), e);
                    status.record_builder(builder.name(), BuilderState::Failed);
                    failed_builders.push(format!("{}: {}", builder.name(), e));
                }
            }
        }

        if !failed_builders.is_empty() {
            let message = format!("Document builders failed: {}", failed_builders.join("; "));
            status.fail(message.clone());
            return Ok(JobOutcome::Failed(message));
        }

        status.transition(JobState::Completed);
        info!(
            "[{}] Completed with {} steps and {} documents",
            job.name,
            instructions.len(),
            documents.len()
        );
        Ok(JobOutcome::Completed {
            steps: instructions.len(),
            documents,
        })
    }

    fn check_input(path: &Path, missing: impl FnOnce() -> StepDocError) -> StepDocResult<()> {
        if path.is_file() {
            Ok(())
        } else {
            Err(missing())
        }
    }

    /// Ask the content provider for every step, keeping the captions when a call fails
    pub async fn narrate(&self, job_name: &str, steps: &[Step]) -> Vec<InstructionStep> {
        let mut instructions = Vec::with_capacity(steps.len());

        for (i, step) in steps.iter().enumerate() {
            let prompt = build_prompt(&step.combined_text);
            let image = self
                .config
                .content
                .send_images
                .then_some(step.representative_image.as_path());

            let narrative = match self.content_port.generate(&prompt, image).await {
                Ok(text) => text,
                Err(e) => {
                    warn!(
                        "[{}] Generation failed for step {}, keeping captions: {}",
                        job_name,
                        i + 1,
                        e
                    );
                    step.combined_text.clone()
                }
            };

            info!("[{}] Step {}/{} narrated", job_name, i + 1, steps.len());
            instructions.push(InstructionStep {
                index: i + 1,
                step: step.clone(),
                narrative,
            });
        }

        instructions
    }
}
