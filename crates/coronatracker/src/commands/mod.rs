//! Command dispatch: bridges CLI args -> view models -> output formatting.

pub mod config_cmd;
pub mod countries;
pub mod global;
pub mod local;
pub mod util;
pub mod watch;

use coronatracker_core::Tracker;

use crate::cli::{Command, GlobalOpts, OutputFormat};
use crate::error::CliError;

/// Everything a network-bound handler needs.
pub struct Context<'a> {
    pub tracker: &'a Tracker,
    pub global: &'a GlobalOpts,
    pub format: OutputFormat,
    pub color: bool,
}

/// Dispatch a network-bound command to the appropriate handler.
pub async fn dispatch(cmd: Command, ctx: &Context<'_>) -> Result<(), CliError> {
    match cmd {
        Command::Global => global::handle(ctx).await,
        Command::Local(args) => local::handle(ctx, args).await,
        Command::Countries(args) => countries::handle(ctx, args).await,
        Command::Watch(args) => watch::handle(ctx, args).await,
        // Config and Completions are handled before dispatch
        Command::Config(_) | Command::Completions(_) => unreachable!(),
    }
}
