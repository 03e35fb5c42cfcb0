//! `jira issue` — issue subcommands.

use clap::{Args, Subcommand};

use jira_core::config::Config;

use super::Globals;
use super::worklog::{self, WorklogArgs};

/// Arguments for the `issue` subcommand.
#[derive(Args, Debug)]
pub struct IssueArgs {
    /// Issue operation.
    #[command(subcommand)]
    pub command: IssueCommand,
}

/// Subcommands under `issue`.
#[derive(Subcommand, Debug)]
pub enum IssueCommand {
    /// Manage issue worklogs
    #[command(visible_alias = "worklogs")]
    Worklog(WorklogArgs),
}

/// Dispatch an `issue` subcommand.
pub fn cmd_issue(args: IssueArgs, globals: Globals, config: &Config) -> anyhow::Result<()> {
    match args.command {
        IssueCommand::Worklog(args) => worklog::cmd_worklog(args, globals, config),
    }
}
