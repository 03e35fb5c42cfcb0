//! Filling in missing fields and the submit/cancel gate.
//!
//! [`plan`] turns the current parameters into a list of [`Step`]s: one per
//! empty field, either a question for the [`Prompter`] or a silent default.
//! [`complete`] runs the steps. Fields that already hold a value never get
//! a step, so explicit arguments are never overwritten.

use std::fmt;

use chrono::{Local, NaiveDateTime};
use thiserror::Error;
use tracing::{debug, instrument};

use super::{WorklogError, WorklogParams, WorklogResult};
use crate::issue;

/// Default duration offered for time spent.
pub const DEFAULT_TIME_SPENT: &str = "60m";

/// Default text offered in the comment editor.
pub const DEFAULT_COMMENT: &str = "Implementation";

/// Default answers for the completer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Defaults {
    /// Offered duration.
    pub time_spent: String,
    /// Offered comment.
    pub comment: String,
    /// Offered start date, `YYYY-MM-DD`.
    pub started_date: String,
    /// Offered start time, `HH:MM`.
    pub started_time: String,
}

impl Defaults {
    /// Defaults anchored at `now`.
    pub fn at(now: NaiveDateTime) -> Self {
        Self {
            time_spent: DEFAULT_TIME_SPENT.to_string(),
            comment: DEFAULT_COMMENT.to_string(),
            started_date: now.format("%Y-%m-%d").to_string(),
            started_time: now.format("%H:%M").to_string(),
        }
    }

    /// Defaults anchored at the current local time.
    pub fn now() -> Self {
        Self::at(Local::now().naive_local())
    }
}

/// A field of [`WorklogParams`] the completer may fill.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    /// Issue key.
    IssueKey,
    /// Time spent.
    TimeSpent,
    /// Comment body.
    Comment,
    /// Start date.
    StartedDate,
    /// Start time.
    StartedTime,
}

impl Field {
    fn slot(self, params: &mut WorklogParams) -> &mut String {
        match self {
            Self::IssueKey => &mut params.issue_key,
            Self::TimeSpent => &mut params.time_spent,
            Self::Comment => &mut params.comment,
            Self::StartedDate => &mut params.started_date,
            Self::StartedTime => &mut params.started_time,
        }
    }
}

/// How a question should be asked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuestionKind {
    /// Single line, blank answers rejected.
    Required,
    /// Single line, blank answer takes the default.
    Input,
    /// Multi-line editor, blank answers rejected.
    Editor,
}

/// One prompt for a missing field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Question {
    /// Field the answer goes into.
    pub field: Field,
    /// Prompt text.
    pub message: &'static str,
    /// Prefilled or fallback answer.
    pub default: Option<String>,
    /// Prompt style.
    pub kind: QuestionKind,
}

/// One fill-if-empty step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    /// Ask the user.
    Ask(Question),
    /// Use a value without asking.
    Fill {
        /// Target field.
        field: Field,
        /// Value to store.
        value: String,
    },
}

/// Failure collecting an answer.
#[derive(Error, Debug)]
pub enum PromptError {
    /// The user pressed Esc or Ctrl-C.
    #[error("prompt cancelled")]
    Cancelled,

    /// No terminal to prompt on, or the input stream closed.
    #[error("cannot prompt: {0}")]
    Unavailable(String),
}

/// Next action offered at the confirmation gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Send the worklog.
    Submit,
    /// Abort without sending.
    Cancel,
}

impl Action {
    /// Options in display order.
    pub const ALL: [Self; 2] = [Self::Submit, Self::Cancel];
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Submit => f.write_str("Submit"),
            Self::Cancel => f.write_str("Cancel"),
        }
    }
}

/// Source of answers. The CLI implements this with terminal prompts.
pub trait Prompter {
    /// Ask one question and return the raw answer.
    fn ask(&mut self, question: &Question) -> Result<String, PromptError>;

    /// Pick one of `actions`.
    fn choose(&mut self, message: &str, actions: &[Action]) -> Result<Action, PromptError>;
}

/// Work out how each empty field gets its value.
///
/// `body` is the template/stdin body from
/// [`WorklogParams::read_body`]. In `no_input` mode only a missing issue key
/// is asked for; every other field falls back to its default (the comment
/// falls back to `body`, possibly empty).
pub fn plan(params: &WorklogParams, body: Option<&str>, defaults: &Defaults) -> Vec<Step> {
    let mut steps = Vec::new();

    if params.issue_key.is_empty() {
        steps.push(Step::Ask(Question {
            field: Field::IssueKey,
            message: "Issue key",
            default: None,
            kind: QuestionKind::Required,
        }));
    }

    if params.time_spent.is_empty() {
        steps.push(optional_step(
            params.no_input,
            Field::TimeSpent,
            "Worklog time spent",
            &defaults.time_spent,
        ));
    }

    if params.comment.is_empty() {
        steps.push(match body {
            Some(body) if params.no_input || !body.is_empty() => Step::Fill {
                field: Field::Comment,
                value: body.to_string(),
            },
            None if params.no_input => Step::Fill {
                field: Field::Comment,
                value: String::new(),
            },
            _ => Step::Ask(Question {
                field: Field::Comment,
                message: "Worklog comment",
                default: Some(defaults.comment.clone()),
                kind: QuestionKind::Editor,
            }),
        });
    }

    if params.started_date.is_empty() {
        steps.push(optional_step(
            params.no_input,
            Field::StartedDate,
            "Worklog started date (YYYY-MM-DD)",
            &defaults.started_date,
        ));
    }

    if params.started_time.is_empty() {
        steps.push(optional_step(
            params.no_input,
            Field::StartedTime,
            "Worklog started time (hh:mm)",
            &defaults.started_time,
        ));
    }

    steps
}

fn optional_step(no_input: bool, field: Field, message: &'static str, default: &str) -> Step {
    if no_input {
        Step::Fill {
            field,
            value: default.to_string(),
        }
    } else {
        Step::Ask(Question {
            field,
            message,
            default: Some(default.to_string()),
            kind: QuestionKind::Input,
        })
    }
}

/// Fill every empty field of `params`, prompting where [`plan`] says so.
///
/// A blank answer to an optional question takes the question's default.
/// An issue key typed at the prompt is expanded with `project_key`.
///
/// # Errors
///
/// [`WorklogError::EmptyIssueKey`] when no issue key came out of the steps,
/// e.g. a prompter that hands back a blank answer.
#[instrument(skip_all, fields(no_input = params.no_input))]
pub fn complete<P: Prompter + ?Sized>(
    params: &mut WorklogParams,
    body: Option<String>,
    defaults: &Defaults,
    project_key: Option<&str>,
    prompter: &mut P,
) -> WorklogResult<()> {
    let steps = plan(params, body.as_deref(), defaults);
    debug!(steps = steps.len(), "completing worklog parameters");

    for step in steps {
        let (field, value) = match step {
            Step::Fill { field, value } => (field, value),
            Step::Ask(question) => {
                let answer = prompter.ask(&question)?;
                let answer = if answer.trim().is_empty() {
                    question.default.clone().unwrap_or_default()
                } else {
                    answer
                };
                let answer = match question.field {
                    Field::IssueKey => issue::issue_key(project_key, &answer),
                    Field::Comment => answer.trim_end().to_string(),
                    _ => answer.trim().to_string(),
                };
                (question.field, answer)
            }
        };

        let slot = field.slot(params);
        if slot.is_empty() {
            *slot = value;
        }
    }

    if params.issue_key.is_empty() {
        return Err(WorklogError::EmptyIssueKey);
    }

    Ok(())
}

/// Ask whether to submit. Skipped in `no_input` mode.
///
/// # Errors
///
/// [`WorklogError::Aborted`] when the user picks [`Action::Cancel`].
pub fn confirm<P: Prompter + ?Sized>(
    params: &WorklogParams,
    prompter: &mut P,
) -> WorklogResult<()> {
    if params.no_input {
        return Ok(());
    }

    match prompter.choose("What's next?", &Action::ALL)? {
        Action::Submit => Ok(()),
        Action::Cancel => Err(WorklogError::Aborted),
    }
}
