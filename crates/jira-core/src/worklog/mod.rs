//! Adding worklogs to issues.
//!
//! All orchestration logic lives here. The CLI only supplies a [`Prompter`]
//! and a [`WorklogApi`](crate::api::WorklogApi) and renders the outcome.
//!
//! # Workflow
//!
//! 1. **Resolve** ([`WorklogParams::resolve`]) — map positional arguments and
//!    flags onto a parameter set.
//! 2. **Input mode** ([`WorklogParams::enforce_input_mode`]) — piped stdin or
//!    `--template -` switches to non-interactive mode, which requires an
//!    issue key up front.
//! 3. **Body** ([`WorklogParams::read_body`]) — read the template file or
//!    stdin when no comment argument was given.
//! 4. **Complete** ([`complete`]) — fill every still-empty field, either by
//!    prompting or from its default.
//! 5. **Confirm** ([`confirm`]) — submit or cancel, interactive mode only.
//! 6. **Submit** ([`submit`]) — build the start timestamp and call the API.

mod complete;
mod params;
mod submit;

use thiserror::Error;

use crate::api::ApiError;

pub use complete::{
    Action, DEFAULT_COMMENT, DEFAULT_TIME_SPENT, Defaults, Field, PromptError, Prompter,
    Question, QuestionKind, Step, complete, confirm, plan,
};
pub use params::{AddFlags, MAX_POSITIONAL_ARGS, STDIN_TEMPLATE, WorklogParams};
pub use submit::{Submission, offset_at, started_timestamp, submit};

/// Errors from the worklog workflow.
#[derive(Error, Debug)]
pub enum WorklogError {
    /// Non-interactive mode without an issue key.
    #[error("`ISSUE-KEY` is mandatory when using a non-interactive mode")]
    MissingIssueKey,

    /// The issue key was still empty after prompting.
    #[error("`ISSUE-KEY` must not be empty")]
    EmptyIssueKey,

    /// More positional arguments than the command accepts.
    #[error("expected at most {MAX_POSITIONAL_ARGS} arguments, got {0}")]
    TooManyArguments(usize),

    /// The template file or stdin could not be read.
    #[error("failed to read worklog body from {source_name}: {source}")]
    Template {
        /// File path, or `stdin`.
        source_name: String,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// Collecting an answer failed.
    #[error(transparent)]
    Prompt(#[from] PromptError),

    /// The user chose to cancel at the confirmation step.
    #[error("Action aborted")]
    Aborted,

    /// The server rejected the worklog or could not be reached.
    #[error(transparent)]
    Api(#[from] ApiError),
}

/// Result alias for worklog operations.
pub type WorklogResult<T> = Result<T, WorklogError>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{ApiResult, WorklogApi};
    use chrono::{FixedOffset, NaiveDate};
    use std::cell::Cell;
    use std::io::Cursor;

    /// Fails the test on any prompt.
    struct NoPrompts;

    impl Prompter for NoPrompts {
        fn ask(&mut self, question: &Question) -> Result<String, PromptError> {
            panic!("unexpected prompt for {:?}", question.field);
        }

        fn choose(&mut self, _message: &str, _actions: &[Action]) -> Result<Action, PromptError> {
            panic!("unexpected confirmation prompt");
        }
    }

    /// Remembers the last call.
    #[derive(Default)]
    struct LastCall {
        calls: Cell<usize>,
        sent: std::cell::RefCell<Option<(String, String, String, String)>>,
    }

    impl WorklogApi for LastCall {
        fn add_issue_worklog(
            &self,
            issue_key: &str,
            comment: &str,
            started: &str,
            time_spent: &str,
        ) -> ApiResult<()> {
            self.calls.set(self.calls.get() + 1);
            *self.sent.borrow_mut() = Some((
                issue_key.to_string(),
                comment.to_string(),
                started.to_string(),
                time_spent.to_string(),
            ));
            Ok(())
        }
    }

    fn defaults() -> Defaults {
        Defaults::at(
            NaiveDate::from_ymd_opt(2024, 1, 2)
                .unwrap()
                .and_hms_opt(8, 30, 0)
                .unwrap(),
        )
    }

    fn utc() -> FixedOffset {
        FixedOffset::east_opt(0).unwrap()
    }

    /// Drive the whole workflow the way the CLI does.
    fn run(
        args: &[&str],
        flags: AddFlags,
        stdin_piped: bool,
        stdin: &str,
        api: &LastCall,
    ) -> WorklogResult<Submission> {
        let mut params = WorklogParams::resolve(args, flags, Some("PROJ"))?;
        params.enforce_input_mode(stdin_piped)?;
        let body = params.read_body(stdin_piped, &mut Cursor::new(stdin.to_string()))?;
        complete(&mut params, body, &defaults(), Some("PROJ"), &mut NoPrompts)?;
        confirm(&params, &mut NoPrompts)?;
        submit(&params, api, "https://jira.example.com", &utc())
    }

    #[test]
    fn non_interactive_without_key_never_reaches_api() {
        let api = LastCall::default();
        let err = run(&[], AddFlags::default(), true, "Fixed bug", &api).unwrap_err();
        assert!(matches!(err, WorklogError::MissingIssueKey));
        assert_eq!(api.calls.get(), 0);
    }

    #[test]
    fn piped_body_is_submitted_without_prompts() {
        let api = LastCall::default();
        let submission = run(&["PROJ-1"], AddFlags::default(), true, "Fixed bug\n", &api).unwrap();

        let sent = api.sent.borrow().clone().unwrap();
        assert_eq!(
            sent,
            (
                "PROJ-1".to_string(),
                "Fixed bug".to_string(),
                "2024-01-02T08:30:00.000+0000".to_string(),
                "60m".to_string(),
            )
        );
        assert_eq!(submission.browse_url, "https://jira.example.com/browse/PROJ-1");
    }

    #[test]
    fn explicit_arguments_reach_the_api_unchanged() {
        let api = LastCall::default();
        let flags = AddFlags {
            template: Some("-".to_string()),
            ..AddFlags::default()
        };

        run(
            &["PROJ-1", "2h", "Did work", "2023-01-01", "09:00"],
            flags,
            false,
            "ignored template body",
            &api,
        )
        .unwrap();

        let (key, body, started, spent) = api.sent.borrow().clone().unwrap();
        assert_eq!(key, "PROJ-1");
        assert_eq!(body, "Did work");
        assert_eq!(started, "2023-01-01T09:00:00.000+0000");
        assert_eq!(spent, "2h");
    }

    #[test]
    fn numeric_key_is_expanded_end_to_end() {
        let api = LastCall::default();
        let submission = run(&["12", "30m"], AddFlags::default(), true, "", &api).unwrap();
        assert_eq!(submission.issue_key, "PROJ-12");
    }
}
