//! `herald publish` and `herald republish`.

use anyhow::Result;
use clap::Args;

use herald_core::EntityRef;
use herald_sync::DispatchOptions;

use super::engine::Engine;
use super::DispatchFlags;

/// Arguments for `herald publish`.
#[derive(Args, Debug)]
pub struct PublishArgs {
    /// `content_item:<id>`, `edition:<id>` or `unpublishing:<id>`.
    pub entity: EntityRef,

    /// Send to the draft content store instead of live.
    #[arg(long)]
    pub draft: bool,

    /// Update type sent with every payload (default: major).
    #[arg(long)]
    pub update_type: Option<String>,

    /// Queue to enqueue jobs on (default: from config).
    #[arg(long)]
    pub queue: Option<String>,

    #[command(flatten)]
    pub flags: DispatchFlags,
}

impl PublishArgs {
    pub fn run(self) -> Result<()> {
        let engine = Engine::load()?;
        let entity = engine.publishable(self.entity)?;
        let options = options(self.update_type, self.queue);

        if self.draft {
            engine.dispatch("publish draft", self.flags, |publisher| {
                publisher.publish_draft_async(&entity, options)
            })
        } else {
            engine.dispatch("publish", self.flags, |publisher| {
                publisher.publish_async(&entity, options)
            })
        }
    }
}

/// Arguments for `herald republish`.
#[derive(Args, Debug)]
pub struct RepublishArgs {
    /// `content_item:<id>`, `edition:<id>` or `unpublishing:<id>`.
    pub entity: EntityRef,

    /// Update type sent with every payload (default: republish).
    #[arg(long)]
    pub update_type: Option<String>,

    /// Queue to enqueue jobs on (default: from config).
    #[arg(long)]
    pub queue: Option<String>,

    #[command(flatten)]
    pub flags: DispatchFlags,
}

impl RepublishArgs {
    pub fn run(self) -> Result<()> {
        let engine = Engine::load()?;
        let entity = engine.publishable(self.entity)?;
        let options = options(self.update_type, self.queue);
        engine.dispatch("republish", self.flags, |publisher| {
            publisher.republish_async(&entity, options)
        })
    }
}

fn options(update_type: Option<String>, queue: Option<String>) -> DispatchOptions {
    let mut options = DispatchOptions::new();
    if let Some(update_type) = update_type {
        options = options.update_type(update_type);
    }
    if let Some(queue) = queue {
        options = options.queue(queue);
    }
    options
}
