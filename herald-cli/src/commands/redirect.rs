//! `herald redirect`: published synchronously, no jobs.

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;

use herald_core::{Redirect, RedirectRoute, RouteType};

use super::engine::Engine;

/// Arguments for `herald redirect`.
#[derive(Args, Debug)]
pub struct RedirectArgs {
    /// Path to redirect from.
    pub base_path: String,

    /// Path or URL to redirect to.
    pub destination: String,

    /// Redirect every path under `base_path`, not just the exact path.
    #[arg(long)]
    pub prefix: bool,
}

impl RedirectArgs {
    pub fn run(self) -> Result<()> {
        let engine = Engine::load()?;
        let route_type = if self.prefix {
            RouteType::Prefix
        } else {
            RouteType::Exact
        };
        let redirect = Redirect::new(
            self.base_path.clone(),
            vec![RedirectRoute {
                path: self.base_path.clone(),
                route_type,
                destination: self.destination.clone(),
            }],
        );

        engine
            .publisher()
            .publish_redirect(&redirect)
            .with_context(|| format!("redirect failed for '{}'", self.base_path))?;
        println!(
            "{} {} → {}",
            "✓".green().bold(),
            self.base_path,
            self.destination
        );
        Ok(())
    }
}
