//! Progress notification port
//!
//! Defines the interface for reporting progress during a deliberation.
//! Implementations live in the presentation layer (console, etc.).

use council_domain::Stage;

/// Callback for progress updates during a council run
pub trait ProgressNotifier: Send + Sync {
    /// Called when a stage starts, with the number of calls it will dispatch
    fn on_stage_start(&self, stage: &Stage, total_tasks: usize);

    /// Called when one call within a stage settles
    fn on_task_complete(&self, stage: &Stage, model_name: &str, success: bool);

    /// Called when a stage's barrier is released
    fn on_stage_complete(&self, stage: &Stage);

    /// Called when a stage is skipped entirely (fast mode)
    fn on_stage_skipped(&self, _stage: &Stage) {}
}

/// No-op progress notifier for when progress reporting is not needed
pub struct NoProgress;

impl ProgressNotifier for NoProgress {
    fn on_stage_start(&self, _stage: &Stage, _total_tasks: usize) {}
    fn on_task_complete(&self, _stage: &Stage, _model_name: &str, _success: bool) {}
    fn on_stage_complete(&self, _stage: &Stage) {}
}
