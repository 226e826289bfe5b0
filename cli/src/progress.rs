//! Console progress reporting
//!
//! Writes stage-by-stage progress to stderr so stdout stays clean JSON.

use colored::Colorize;
use council_application::ProgressNotifier;
use council_domain::Stage;

pub struct ConsoleProgress;

impl ProgressNotifier for ConsoleProgress {
    fn on_stage_start(&self, stage: &Stage, total_tasks: usize) {
        let calls = if total_tasks == 1 { "call" } else { "calls" };
        eprintln!(
            "{} ({} {})",
            stage.display_name().bold().cyan(),
            total_tasks,
            calls
        );
    }

    fn on_task_complete(&self, _stage: &Stage, model_name: &str, success: bool) {
        let mark = if success { "ok".green() } else { "failed".red() };
        eprintln!("  [{mark}] {model_name}");
    }

    fn on_stage_complete(&self, _stage: &Stage) {
        eprintln!();
    }

    fn on_stage_skipped(&self, stage: &Stage) {
        eprintln!("{} {}\n", stage.display_name().dimmed(), "skipped".yellow());
    }
}
