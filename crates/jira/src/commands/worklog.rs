//! Worklog commands — thin CLI layer over `jira_core::worklog`.

use std::time::Duration;

use anyhow::Context;
use chrono::Local;
use clap::{Args, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use owo_colors::OwoColorize;
use tracing::{debug, instrument};

use jira_core::api::{ClientConfig, JiraClient};
use jira_core::browser;
use jira_core::config::Config;
use jira_core::worklog::{self, AddFlags, Defaults, Submission, WorklogParams};

use super::Globals;
use crate::prompt::InquirePrompter;

const SPINNER_TICKS: &[&str] = &["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", " "];

const ADD_EXAMPLES: &str = "\
EXAMPLES:
    # Prompt for everything
    $ jira issue worklog add

    # Pass required parameters to skip prompts
    $ jira issue worklog add ISSUE-1 60m \"My worklog\" 2022-02-02 13:35

    # Multi-line worklog
    $ jira issue worklog add ISSUE-1 2h $'Supports\\n\\nNew line'

    # Load worklog body from a template file
    $ jira issue worklog add ISSUE-1 --template /path/to/template.tmpl

    # Read worklog body from standard input
    $ jira issue worklog add ISSUE-1 --template -
    $ echo \"Worklog from stdin\" | jira issue worklog add ISSUE-1

    # A body argument takes precedence over --template
    $ jira issue worklog add ISSUE-1 1h \"worklog from arg\" --template /path/to/template.tmpl
";

/// Arguments for the `worklog` subcommand.
#[derive(Args, Debug)]
pub struct WorklogArgs {
    /// Worklog operation.
    #[command(subcommand)]
    pub command: WorklogCommand,
}

/// Subcommands under `worklog`.
#[derive(Subcommand, Debug)]
pub enum WorklogCommand {
    /// Add a worklog to an issue
    #[command(after_help = ADD_EXAMPLES)]
    Add(AddArgs),
}

/// Arguments for `worklog add`.
#[derive(Args, Debug, Default)]
pub struct AddArgs {
    /// Issue key, e.g. ISSUE-1 (or just 1 with a configured project key)
    #[arg(value_name = "ISSUE-KEY")]
    pub issue_key: Option<String>,

    /// Time spent, e.g. '30m' or '4h 20m'
    #[arg(value_name = "TIME_SPENT")]
    pub time_spent: Option<String>,

    /// Body of the worklog
    #[arg(value_name = "WORKLOG_BODY")]
    pub comment: Option<String>,

    /// Start date, e.g. '2022-05-15'
    #[arg(value_name = "STARTED_DATE")]
    pub started_date: Option<String>,

    /// Start time, e.g. '15:55'
    #[arg(value_name = "STARTED_TIME")]
    pub started_time: Option<String>,

    /// Open issue in web browser after adding worklog
    #[arg(long)]
    pub web: bool,

    /// Path to a file to read worklog body from ('-' for stdin)
    #[arg(short = 'T', long, value_name = "FILE")]
    pub template: Option<String>,

    /// Disable prompt for non-required fields
    #[arg(long)]
    pub no_input: bool,
}

impl AddArgs {
    /// Positionals in order, up to the first one not given.
    fn positionals(&self) -> Vec<&str> {
        [
            &self.issue_key,
            &self.time_spent,
            &self.comment,
            &self.started_date,
            &self.started_time,
        ]
        .into_iter()
        .map_while(|arg| arg.as_deref())
        .collect()
    }
}

/// Dispatch a `worklog` subcommand.
pub fn cmd_worklog(args: WorklogArgs, globals: Globals, config: &Config) -> anyhow::Result<()> {
    match args.command {
        WorklogCommand::Add(args) => cmd_worklog_add(args, globals, config),
    }
}

/// Execute `worklog add`.
#[instrument(name = "cmd_worklog_add", skip_all, fields(json_output = globals.json))]
pub fn cmd_worklog_add(args: AddArgs, globals: Globals, config: &Config) -> anyhow::Result<()> {
    let project_key = config.project_key();
    let stdin_piped = super::stdin_has_data();
    debug!(stdin_piped, web = args.web, "executing worklog add command");

    let flags = AddFlags {
        template: args.template.clone(),
        no_input: args.no_input,
        debug: globals.debug,
    };
    let mut params = WorklogParams::resolve(&args.positionals(), flags, project_key)?;
    params.enforce_input_mode(stdin_piped)?;

    let server = config.server_url()?.to_string();
    let client_config = ClientConfig::from_config(config)?.with_debug(params.debug);
    let client = JiraClient::new(client_config).context("failed to build API client")?;

    let body = params.read_body(stdin_piped, &mut std::io::stdin().lock())?;

    let mut prompter = InquirePrompter;
    worklog::complete(
        &mut params,
        body,
        &Defaults::now(),
        project_key,
        &mut prompter,
    )?;
    worklog::confirm(&params, &mut prompter)?;

    let submission = with_spinner("Adding worklog", || {
        worklog::submit(&params, &client, &server, &Local)
    })?;

    print_submission(&submission, globals.json)?;

    if args.web {
        browser::open(&submission.browse_url).context("failed to open browser")?;
    }

    Ok(())
}

fn print_submission(submission: &Submission, json: bool) -> anyhow::Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(submission)?);
    } else {
        println!(
            "{} Worklog added to issue \"{}\"",
            "✓".green(),
            submission.issue_key
        );
        println!("{}", submission.browse_url.cyan());
    }
    Ok(())
}

/// Run `f` while a spinner shows `message` on stderr.
fn with_spinner<T>(message: &str, f: impl FnOnce() -> T) -> T {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::with_template("  {spinner:.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_strings(SPINNER_TICKS),
    );
    spinner.set_message(format!("{message}..."));
    spinner.enable_steady_tick(Duration::from_millis(80));

    let result = f();
    spinner.finish_and_clear();
    result
}
