use devassist_common::{DevAssistError, Result};

use crate::task::Task;

/// Default maximum request length in characters
pub const MAX_INPUT_CHARS: usize = 1000;

/// Rejects blank and oversized request text
#[derive(Debug, Clone, Copy)]
pub struct InputValidator {
    subject: &'static str,
    max_chars: usize,
}

impl InputValidator {
    /// Validator for `task` with a custom length limit
    pub fn new(task: Task, max_chars: usize) -> Self {
        Self {
            subject: task.subject(),
            max_chars,
        }
    }

    /// Return `text` unchanged if it is usable as model input.
    ///
    /// Length is counted in characters, not bytes.
    pub fn validate<'a>(&self, text: &'a str) -> Result<&'a str> {
        if text.trim().is_empty() {
            return Err(DevAssistError::invalid_input(format!(
                "Input {} cannot be empty.",
                self.subject
            )));
        }

        if text.chars().count() > self.max_chars {
            return Err(DevAssistError::invalid_input(format!(
                "Text exceeds maximum length of {} characters.",
                self.max_chars
            )));
        }

        Ok(text)
    }
}
