//! Command dispatch: bridges CLI args -> `ClashReview` calls -> output formatting.

pub mod clashes;
pub mod config_cmd;
pub mod rules;
pub mod runs;
pub mod tests;
pub mod util;

use clashscope_core::ClashReview;

use crate::cli::{Command, GlobalOpts};
use crate::config::RunDefaults;
use crate::error::CliError;

/// State shared by every service-bound handler.
pub struct Context {
    pub review: ClashReview,
    pub project_id: Option<String>,
    pub run_defaults: RunDefaults,
}

impl Context {
    /// The selected project, or a usage error naming the ways to set one.
    pub fn project(&self) -> Result<&str, CliError> {
        self.project_id.as_deref().ok_or(CliError::NoProject)
    }
}

/// Dispatch a service-bound command to the appropriate handler.
pub async fn dispatch(cmd: Command, ctx: &Context, global: &GlobalOpts) -> Result<(), CliError> {
    match cmd {
        Command::Tests(args) => tests::handle(ctx, args, global).await,
        Command::Rules(args) => rules::handle(ctx, args, global).await,
        Command::Runs(args) => runs::handle(ctx, args, global).await,
        Command::Clashes(args) => clashes::handle(ctx, args, global).await,
        // Config and Completions are handled before dispatch
        Command::Config(_) | Command::Completions(_) => unreachable!(),
    }
}
