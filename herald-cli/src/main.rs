//! Herald: publishing sync engine CLI.
//!
//! # Usage
//!
//! ```text
//! herald publish <ENTITY> [--draft] [--update-type T] [--queue Q] [--dry-run] [--json]
//! herald republish <ENTITY> [--update-type T] [--queue Q] [--dry-run] [--json]
//! herald schedule <EDITION_ID> [--dry-run] [--json]
//! herald unschedule <EDITION_ID> [--dry-run] [--json]
//! herald redirect <BASE_PATH> <DESTINATION> [--prefix]
//! ```
//!
//! `ENTITY` is `content_item:<id>` (or `edition:<id>`) or `unpublishing:<id>`.

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};

use commands::{
    publish::{PublishArgs, RepublishArgs},
    redirect::RedirectArgs,
    schedule::{ScheduleArgs, UnscheduleArgs},
};

#[derive(Parser, Debug)]
#[command(
    name = "herald",
    version,
    about = "Push content changes to the publishing API",
    long_about = None,
)]
struct Cli {
    /// Emit logs as JSON lines on stderr.
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Publish every locale of a content item or unpublishing.
    Publish(PublishArgs),

    /// Re-send publicly visible content with update type `republish`.
    Republish(RepublishArgs),

    /// Announce a scheduled edition: publish intents and coming-soon pages.
    Schedule(ScheduleArgs),

    /// Withdraw a scheduled edition's intents and mark its paths gone.
    Unschedule(UnscheduleArgs),

    /// Publish a redirect immediately.
    Redirect(RedirectArgs),
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    herald_worker::init_tracing(cli.log_json);
    match cli.command {
        Commands::Publish(args) => args.run(),
        Commands::Republish(args) => args.run(),
        Commands::Schedule(args) => args.run(),
        Commands::Unschedule(args) => args.run(),
        Commands::Redirect(args) => args.run(),
    }
}
