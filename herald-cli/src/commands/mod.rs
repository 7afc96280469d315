pub mod engine;
pub mod publish;
pub mod redirect;
pub mod report;
pub mod schedule;

use clap::Args;

/// Flags shared by every job-producing command.
#[derive(Args, Debug, Clone, Copy, Default)]
pub struct DispatchFlags {
    /// Print the jobs that would be enqueued instead of running them.
    #[arg(long)]
    pub dry_run: bool,

    /// Emit machine-readable JSON.
    #[arg(long)]
    pub json: bool,
}
