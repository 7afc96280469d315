//! Human and JSON output for dispatch results.

use anyhow::Result;
use colored::Colorize;
use serde_json::json;
use tabled::{settings::Style, Table, Tabled};

use herald_sync::{DispatchOutcome, JobTask, SyncJob};
use herald_worker::WorkerStats;

use super::DispatchFlags;

#[derive(Tabled)]
struct JobRow {
    #[tabled(rename = "queue")]
    queue: String,
    #[tabled(rename = "job")]
    kind: String,
    #[tabled(rename = "subject")]
    subject: String,
    #[tabled(rename = "detail")]
    detail: String,
}

impl From<&SyncJob> for JobRow {
    fn from(job: &SyncJob) -> Self {
        let (subject, detail) = match &job.task {
            JobTask::Publish {
                entity,
                update_type,
                locale,
                ..
            } => (entity.to_string(), format!("{locale} · {update_type}")),
            JobTask::Schedule {
                base_path,
                publish_time,
            } => (base_path.clone(), publish_time.to_rfc3339()),
            JobTask::ComingSoon { edition_id, locale } => {
                (format!("content_item:{edition_id}"), locale.to_string())
            }
            JobTask::Unschedule { base_path } | JobTask::Gone { base_path } => {
                (base_path.clone(), String::new())
            }
        };
        Self {
            queue: job.queue.to_string(),
            kind: job.kind().to_string(),
            subject,
            detail,
        }
    }
}

pub fn print_outcome(
    label: &str,
    outcome: &DispatchOutcome,
    stats: Option<WorkerStats>,
    flags: DispatchFlags,
) -> Result<()> {
    if flags.json {
        let (skipped, jobs) = match outcome {
            DispatchOutcome::Skipped(reason) => (Some(reason.to_string()), Vec::new()),
            DispatchOutcome::Enqueued { jobs } => (None, jobs.clone()),
        };
        let value = json!({
            "operation": label,
            "dry_run": flags.dry_run,
            "skipped": skipped,
            "jobs": jobs,
            "stats": stats,
        });
        println!("{}", serde_json::to_string_pretty(&value)?);
        return Ok(());
    }

    let prefix = if flags.dry_run { "[dry-run] " } else { "" };
    match outcome {
        DispatchOutcome::Skipped(reason) => {
            println!("{prefix}{} {label} skipped: {reason}", "·".yellow().bold());
        }
        DispatchOutcome::Enqueued { jobs } if jobs.is_empty() => {
            println!("{prefix}{} {label}: nothing to do", "✓".green().bold());
        }
        DispatchOutcome::Enqueued { jobs } => {
            let verb = if flags.dry_run { "would enqueue" } else { "enqueued" };
            println!("{prefix}{} {label}: {verb} {} job(s)", "✓".green().bold(), jobs.len());
            let mut table = Table::new(jobs.iter().map(JobRow::from));
            table.with(Style::rounded());
            println!("{table}");
        }
    }

    if let Some(stats) = stats {
        let summary = format!(
            "{} delivered, {} missing, {} retried, {} failed, {} dropped",
            stats.delivered, stats.missing, stats.retried, stats.failed, stats.dropped
        );
        if stats.failed > 0 || stats.dropped > 0 {
            println!("{}", summary.red());
        } else {
            println!("{summary}");
        }
    }
    Ok(())
}
