//! Argument resolution for `worklog add`.

use std::io::Read;

use tracing::{debug, instrument};

use super::{WorklogError, WorklogResult};
use crate::issue;

/// Template value that means "read the body from stdin".
pub const STDIN_TEMPLATE: &str = "-";

/// Positionals accepted: issue key, time spent, comment, date, time.
pub const MAX_POSITIONAL_ARGS: usize = 5;

/// Flags that feed into [`WorklogParams::resolve`].
#[derive(Debug, Clone, Default)]
pub struct AddFlags {
    /// `--template`: file to read the body from, or `-` for stdin.
    pub template: Option<String>,
    /// `--no-input`: skip prompts for non-required fields.
    pub no_input: bool,
    /// `--debug`: verbose API logging.
    pub debug: bool,
}

/// Everything needed to create one worklog entry.
///
/// Empty strings mean "not provided yet".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WorklogParams {
    /// Full issue key, e.g. `PROJ-1`.
    pub issue_key: String,
    /// Duration in Jira syntax, e.g. `2h 30m`.
    pub time_spent: String,
    /// Worklog comment body.
    pub comment: String,
    /// `YYYY-MM-DD`.
    pub started_date: String,
    /// `HH:MM`.
    pub started_time: String,
    /// Template path from `--template`.
    pub template: Option<String>,
    /// Non-interactive mode.
    pub no_input: bool,
    /// Verbose API logging.
    pub debug: bool,
}

impl WorklogParams {
    /// Map positionals onto fields in order: issue key, time spent, comment,
    /// started date, started time.
    ///
    /// The issue key is expanded with `project_key` (see [`issue::issue_key`]).
    /// Durations and dates are passed through untouched.
    #[instrument(skip(args), fields(nargs = args.len()))]
    pub fn resolve<S: AsRef<str>>(
        args: &[S],
        flags: AddFlags,
        project_key: Option<&str>,
    ) -> WorklogResult<Self> {
        if args.len() > MAX_POSITIONAL_ARGS {
            return Err(WorklogError::TooManyArguments(args.len()));
        }

        let arg = |i: usize| args.get(i).map(|a| a.as_ref().to_string()).unwrap_or_default();

        let params = Self {
            issue_key: args
                .first()
                .map(|k| issue::issue_key(project_key, k.as_ref()))
                .unwrap_or_default(),
            time_spent: arg(1),
            comment: arg(2),
            started_date: arg(3),
            started_time: arg(4),
            template: flags.template.filter(|t| !t.is_empty()),
            no_input: flags.no_input,
            debug: flags.debug,
        };
        debug!(issue_key = %params.issue_key, "resolved arguments");
        Ok(params)
    }

    /// Whether the invocation can't be interactive: stdin is piped, or the
    /// body is explicitly requested from stdin.
    pub fn is_non_interactive(&self, stdin_piped: bool) -> bool {
        stdin_piped || self.template.as_deref() == Some(STDIN_TEMPLATE)
    }

    /// Switch to non-interactive mode when required and check that the
    /// mandatory issue key is present.
    ///
    /// # Errors
    ///
    /// [`WorklogError::MissingIssueKey`] in non-interactive mode without a key.
    pub fn enforce_input_mode(&mut self, stdin_piped: bool) -> WorklogResult<()> {
        if self.is_non_interactive(stdin_piped) {
            self.no_input = true;
            if self.issue_key.is_empty() {
                return Err(WorklogError::MissingIssueKey);
            }
        }
        Ok(())
    }

    /// Read the worklog body from the template file or stdin.
    ///
    /// Returns `None` when a comment argument was given (it always wins) or
    /// when there is no body source at all. Trailing whitespace, such as the
    /// newline `echo` appends, is trimmed.
    pub fn read_body<R: Read>(
        &self,
        stdin_piped: bool,
        stdin: &mut R,
    ) -> WorklogResult<Option<String>> {
        if !self.comment.is_empty() {
            return Ok(None);
        }

        let mut body = String::new();
        match self.template.as_deref() {
            Some(STDIN_TEMPLATE) => read_stdin(stdin, &mut body)?,
            Some(path) => {
                body = std::fs::read_to_string(path).map_err(|source| WorklogError::Template {
                    source_name: path.to_string(),
                    source,
                })?;
            }
            None if stdin_piped => read_stdin(stdin, &mut body)?,
            None => return Ok(None),
        }

        let trimmed = body.trim_end().to_string();
        debug!(bytes = trimmed.len(), "read worklog body");
        Ok(Some(trimmed))
    }
}

fn read_stdin<R: Read>(stdin: &mut R, body: &mut String) -> WorklogResult<()> {
    stdin
        .read_to_string(body)
        .map(|_| ())
        .map_err(|source| WorklogError::Template {
            source_name: "stdin".to_string(),
            source,
        })
}
