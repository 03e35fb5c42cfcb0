//! Terminal prompts for the worklog completer.
//!
//! The question flow lives in `jira_core::worklog`; this module only renders
//! questions with inquire.

use inquire::validator::Validation;
use inquire::{Editor, InquireError, Select, Text};
use jira_core::worklog::{Action, PromptError, Prompter, Question, QuestionKind};

/// [`Prompter`] backed by inquire.
#[derive(Debug, Default, Clone, Copy)]
pub struct InquirePrompter;

impl Prompter for InquirePrompter {
    fn ask(&mut self, question: &Question) -> Result<String, PromptError> {
        let default = question.default.as_deref().unwrap_or_default();
        let answer = match question.kind {
            QuestionKind::Required => Text::new(question.message)
                .with_validator(not_blank)
                .prompt(),
            QuestionKind::Input => Text::new(question.message).with_default(default).prompt(),
            QuestionKind::Editor => Editor::new(question.message)
                .with_predefined_text(default)
                .with_validator(not_blank)
                .prompt(),
        };
        answer.map_err(prompt_error)
    }

    fn choose(&mut self, message: &str, actions: &[Action]) -> Result<Action, PromptError> {
        Select::new(message, actions.to_vec())
            .prompt()
            .map_err(prompt_error)
    }
}

fn not_blank(input: &str) -> Result<Validation, inquire::CustomUserError> {
    if input.trim().is_empty() {
        Ok(Validation::Invalid("A value is required".into()))
    } else {
        Ok(Validation::Valid)
    }
}

fn prompt_error(err: InquireError) -> PromptError {
    match err {
        InquireError::OperationCanceled | InquireError::OperationInterrupted => {
            PromptError::Cancelled
        }
        other => PromptError::Unavailable(other.to_string()),
    }
}
