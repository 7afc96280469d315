//! `herald schedule` and `herald unschedule`.

use anyhow::Result;
use clap::Args;

use herald_core::EditionId;

use super::engine::Engine;
use super::DispatchFlags;

/// Arguments for `herald schedule`.
#[derive(Args, Debug)]
pub struct ScheduleArgs {
    /// Edition to announce.
    pub edition_id: u64,

    #[command(flatten)]
    pub flags: DispatchFlags,
}

impl ScheduleArgs {
    pub fn run(self) -> Result<()> {
        let engine = Engine::load()?;
        let item = engine.content_item(EditionId(self.edition_id))?;
        engine.dispatch("schedule", self.flags, |publisher| publisher.schedule_async(&item))
    }
}

/// Arguments for `herald unschedule`.
#[derive(Args, Debug)]
pub struct UnscheduleArgs {
    /// Edition whose schedule is withdrawn.
    pub edition_id: u64,

    #[command(flatten)]
    pub flags: DispatchFlags,
}

impl UnscheduleArgs {
    pub fn run(self) -> Result<()> {
        let engine = Engine::load()?;
        let item = engine.content_item(EditionId(self.edition_id))?;
        engine.dispatch("unschedule", self.flags, |publisher| publisher.unschedule_async(&item))
    }
}
