pub mod orchestrator;
pub mod report;

pub use orchestrator::{
    execute, plan, run, run_with, DuplicateAction, DuplicateOutcome, ExclusionReason,
    GroupOutcome, RunMode, RunOptions, RunResult, RunStats,
};
pub use report::{render_report, write_report};
