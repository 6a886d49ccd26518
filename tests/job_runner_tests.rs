//! Integration tests for the job factory: discovery, status, narration and builders

mod common;

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use common::{scripted_interactor, srt, write_job_inputs};
use stepdoc::adapters::content_mock::MOCK_NARRATIVE;
use stepdoc::adapters::{
    JsonDocumentBuilder, JsonStatusStore, MarkdownDocumentBuilder, MockContentProvider,
};
use stepdoc::app::{JobOutcome, JobRunner};
use stepdoc::domain::model::{BuilderState, InstructionStep, JobSpec, JobState};
use stepdoc::ports::{ContentPort, DocumentPort, StatusPort};
use stepdoc::{AppConfig, DomainError};
use tempfile::TempDir;

const FIRST: &str = "Open the settings menu from the top bar";
const SECOND: &str = "Select the privacy tab on the left side";

struct FailingProvider;

#[async_trait]
impl ContentPort for FailingProvider {
    fn name(&self) -> &str {
        "FAILING"
    }

    async fn generate(&self, _prompt: &str, _image: Option<&Path>) -> Result<String, DomainError> {
        Err(DomainError::ContentFail("quota exceeded".to_string()))
    }
}

/// Remembers whether each request carried an image
#[derive(Default)]
struct RecordingProvider {
    images: Mutex<Vec<bool>>,
}

#[async_trait]
impl ContentPort for RecordingProvider {
    fn name(&self) -> &str {
        "RECORDING"
    }

    async fn generate(&self, prompt: &str, image: Option<&Path>) -> Result<String, DomainError> {
        self.images.lock().unwrap().push(image.is_some());
        Ok(format!("narrated: {}", prompt.len()))
    }
}

struct BrokenBuilder;

impl DocumentPort for BrokenBuilder {
    fn name(&self) -> &str {
        "BROKEN"
    }

    fn dir_name(&self) -> &str {
        "broken"
    }

    fn build(
        &self,
        _title: &str,
        _steps: &[InstructionStep],
        _output_dir: &Path,
    ) -> Result<PathBuf, DomainError> {
        Err(DomainError::DocumentFail("disk full".to_string()))
    }
}

struct Workspace {
    _dir: TempDir,
    config: AppConfig,
}

impl Workspace {
    /// Input root with a valid job `alpha` and a job `beta` missing its captions
    fn new() -> Self {
        let dir = TempDir::new().unwrap();
        let mut config = AppConfig::default();
        config.paths.input_dir = dir.path().join("input");
        config.paths.output_dir = dir.path().join("output");
        config.sampling.interval_sec = 1.0;

        let captions = srt(&[(0, 0, FIRST), (1, 1, "Ok"), (2, 2, SECOND)]);
        write_job_inputs(&config.paths.input_dir.join("alpha"), Some(&captions));
        write_job_inputs(&config.paths.input_dir.join("beta"), None);

        Self { _dir: dir, config }
    }

    fn output(&self, job: &str) -> PathBuf {
        self.config.paths.output_dir.join(job)
    }

    fn runner(&self, content: Arc<dyn ContentPort>, builders: Vec<Arc<dyn DocumentPort>>) -> JobRunner {
        JobRunner::new(
            Arc::new(scripted_interactor(1.0, &[1, 2, 3])),
            content,
            Arc::new(JsonStatusStore::new()),
            builders,
            self.config.clone(),
        )
    }

    fn default_runner(&self) -> JobRunner {
        self.runner(
            Arc::new(MockContentProvider::new()),
            vec![
                Arc::new(MarkdownDocumentBuilder::new()),
                Arc::new(JsonDocumentBuilder::new()),
            ],
        )
    }
}

#[test]
fn test_discover_jobs_sorted_directories_only() {
    let ws = Workspace::new();
    std::fs::write(ws.config.paths.input_dir.join("notes.txt"), "ignored").unwrap();

    let jobs = ws.default_runner().discover_jobs().unwrap();

    let names: Vec<&str> = jobs.iter().map(|j| j.name.as_str()).collect();
    assert_eq!(names, vec!["alpha", "beta"]);
    assert_eq!(
        jobs[0].video_path,
        ws.config.paths.input_dir.join("alpha").join("video.mp4")
    );
    assert_eq!(jobs[0].output_dir, ws.output("alpha"));
}

#[test]
fn test_discover_jobs_missing_input_dir() {
    let mut ws = Workspace::new();
    ws.config.paths.input_dir = ws.config.paths.input_dir.join("absent");

    assert!(ws.default_runner().discover_jobs().is_err());
}

#[tokio::test]
async fn test_run_all_completes_valid_job_and_fails_incomplete_one() {
    let ws = Workspace::new();

    let summary = ws.default_runner().run_all().await.unwrap();

    assert_eq!(summary.completed, vec!["alpha"]);
    assert!(summary.skipped.is_empty());
    assert_eq!(summary.failed.len(), 1);
    assert_eq!(summary.failed[0].0, "beta");

    let store = JsonStatusStore::new();
    let alpha = store.load(&ws.output("alpha").join("status.json")).unwrap();
    assert_eq!(alpha.state, JobState::Completed);
    assert_eq!(alpha.builders.get("MARKDOWN"), Some(&BuilderState::Succeeded));
    assert_eq!(alpha.builders.get("JSON"), Some(&BuilderState::Succeeded));

    let beta = store.load(&ws.output("beta").join("status.json")).unwrap();
    assert_eq!(beta.state, JobState::Failed);
    assert!(beta.error.is_some());

    let markdown = std::fs::read_to_string(ws.output("alpha").join("markdown/steps.md")).unwrap();
    assert!(markdown.starts_with("# alpha\n"));
    assert!(markdown.contains("## Step 1"));
    assert!(markdown.contains("## Step 2"));
    assert!(markdown.contains("](../screenshots/frame_00000.png)"));
    assert!(markdown.contains("](../screenshots/frame_00002.png)"));
    assert!(markdown.contains("[MOCK NARRATIVE]"));

    let json: serde_json::Value = serde_json::from_str(
        &std::fs::read_to_string(ws.output("alpha").join("json/steps.json")).unwrap(),
    )
    .unwrap();
    assert_eq!(json["steps"].as_array().unwrap().len(), 2);
    assert_eq!(json["steps"][0]["captions"], format!("{} Ok", FIRST));
    assert_eq!(json["steps"][1]["narrative"], MOCK_NARRATIVE);
}

#[tokio::test]
async fn test_rerun_skips_completed_jobs() {
    let ws = Workspace::new();
    let runner = ws.default_runner();

    runner.run_all().await.unwrap();
    let second = runner.run_all().await.unwrap();

    assert_eq!(second.skipped, vec!["alpha"]);
    assert!(second.completed.is_empty());
    assert_eq!(second.failed.len(), 1);
}

#[tokio::test]
async fn test_failed_generation_keeps_captions() {
    let ws = Workspace::new();
    let runner = ws.runner(
        Arc::new(FailingProvider),
        vec![Arc::new(JsonDocumentBuilder::new())],
    );
    let job = runner.discover_jobs().unwrap().remove(0);

    let outcome = runner.run_job(&job).await.unwrap();

    assert!(matches!(outcome, JobOutcome::Completed { steps: 2, .. }));
    let json: serde_json::Value = serde_json::from_str(
        &std::fs::read_to_string(ws.output("alpha").join("json/steps.json")).unwrap(),
    )
    .unwrap();
    assert_eq!(json["steps"][0]["narrative"], format!("{} Ok", FIRST));
    assert_eq!(json["steps"][1]["narrative"], SECOND);
}

#[tokio::test]
async fn test_images_attached_only_when_enabled() {
    let mut ws = Workspace::new();

    let recorder = Arc::new(RecordingProvider::default());
    let runner = ws.runner(recorder.clone(), vec![]);
    let job = runner.discover_jobs().unwrap().remove(0);
    runner.run_job(&job).await.unwrap();
    assert_eq!(*recorder.images.lock().unwrap(), vec![true, true]);

    ws.config.content.send_images = false;
    let recorder = Arc::new(RecordingProvider::default());
    let runner = ws.runner(recorder.clone(), vec![]);
    let job = JobSpec::new(
        "alpha-again",
        job.video_path.clone(),
        job.captions_path.clone(),
        ws.output("alpha-again"),
    )
    .unwrap();
    runner.run_job(&job).await.unwrap();
    assert_eq!(*recorder.images.lock().unwrap(), vec![false, false]);
}

#[tokio::test]
async fn test_builder_failure_fails_job_and_allows_rerun() {
    let ws = Workspace::new();
    let runner = ws.runner(
        Arc::new(MockContentProvider::new()),
        vec![
            Arc::new(MarkdownDocumentBuilder::new()),
            Arc::new(BrokenBuilder),
        ],
    );
    let job = runner.discover_jobs().unwrap().remove(0);

    let outcome = runner.run_job(&job).await.unwrap();
    match outcome {
        JobOutcome::Failed(message) => assert!(message.contains("BROKEN")),
        other => panic!("expected failure, got {:?}", other),
    }

    let status = JsonStatusStore::new().load(&job.status_file()).unwrap();
    assert_eq!(status.state, JobState::Failed);
    assert_eq!(status.builders.get("MARKDOWN"), Some(&BuilderState::Succeeded));
    assert_eq!(status.builders.get("BROKEN"), Some(&BuilderState::Failed));
    assert!(ws.output("alpha").join("markdown/steps.md").exists());

    let again = runner.run_job(&job).await.unwrap();
    assert!(matches!(again, JobOutcome::Failed(_)));
}

#[tokio::test]
async fn test_unwritable_job_output_does_not_stop_the_run() {
    let ws = Workspace::new();
    let captions = srt(&[(0, 0, FIRST), (1, 1, SECOND)]);
    write_job_inputs(&ws.config.paths.input_dir.join("beta"), Some(&captions));
    std::fs::create_dir_all(&ws.config.paths.output_dir).unwrap();
    std::fs::write(ws.output("alpha"), "not a directory").unwrap();

    let summary = ws.default_runner().run_all().await.unwrap();

    assert_eq!(summary.failed.len(), 1);
    assert_eq!(summary.failed[0].0, "alpha");
    assert!(summary.failed[0].1.contains("status"));
    assert_eq!(summary.completed, vec!["beta"]);
    assert!(ws.output("beta").join("markdown/steps.md").exists());
}

#[tokio::test]
async fn test_missing_video_fails_job() {
    let ws = Workspace::new();
    let runner = ws.default_runner();
    let job = JobSpec::new(
        "ghost",
        ws.config.paths.input_dir.join("ghost/video.mp4"),
        ws.config.paths.input_dir.join("ghost/transkript.srt"),
        ws.output("ghost"),
    )
    .unwrap();

    let outcome = runner.run_job(&job).await.unwrap();

    assert!(matches!(outcome, JobOutcome::Failed(_)));
    let status = JsonStatusStore::new().load(&job.status_file()).unwrap();
    assert_eq!(status.state, JobState::Failed);
}
