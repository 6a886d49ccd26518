// Application layer - Use case interactors

pub mod container;
pub mod job_runner;
pub mod step_interactor;

// Re-export interactors
pub use job_runner::{JobOutcome, JobRunner, RunSummary};
pub use step_interactor::{StepInteractor, StepOutcome, StepSettings};
