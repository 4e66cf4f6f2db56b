use thiserror::Error;

#[derive(Error, Debug)]
pub enum PollboxError {
    #[error("Not in a pollbox project. Run 'pollbox init' first.")]
    NotInitialized,

    #[error("Already initialized. Remove .pollbox/ to reinitialize.")]
    AlreadyInitialized,

    #[error("Question not found: {0}")]
    QuestionNotFound(String),

    #[error("Choice not found: {0}")]
    ChoiceNotFound(String),

    #[error("Choice {choice_id} does not belong to question {question_id}")]
    InvalidChoice {
        question_id: String,
        choice_id: String,
    },

    #[error("No choice selected")]
    NoChoiceSelected,

    #[error("Validation failed for field '{field}': {message}")]
    Validation { field: String, message: String },

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, PollboxError>;
