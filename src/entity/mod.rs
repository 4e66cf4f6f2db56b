mod choice;
mod question;

pub use choice::Choice;
pub use question::Question;

use crate::error::{PollboxError, Result};

/// Maximum length of `question_text` and `choice_text`.
pub const MAX_TEXT_LENGTH: usize = 200;

/// Validate a bounded text field: required, non-empty, at most
/// [`MAX_TEXT_LENGTH`] characters.
pub fn validate_text(field: &str, text: &str) -> Result<()> {
    if text.trim().is_empty() {
        return Err(PollboxError::Validation {
            field: field.to_string(),
            message: "must not be empty".to_string(),
        });
    }
    let len = text.chars().count();
    if len > MAX_TEXT_LENGTH {
        return Err(PollboxError::Validation {
            field: field.to_string(),
            message: format!("{} characters exceeds maximum of {}", len, MAX_TEXT_LENGTH),
        });
    }
    Ok(())
}
