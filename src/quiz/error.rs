use thiserror::Error;

use crate::progress::StoreError;

pub type QuizResult<T> = std::result::Result<T, QuizError>;

/// Input problems. The session stays where it was.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("an answer is required")]
    EmptyAnswer,
    #[error("answer has the wrong shape for a {question_type} question")]
    AnswerShape { question_type: &'static str },
}

#[derive(Debug, Error)]
pub enum QuizError {
    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),
    #[error("cannot {action} while in {state}")]
    InvalidTransition {
        action: &'static str,
        state: &'static str,
    },
    #[error("storage error: {0}")]
    Storage(#[from] StoreError),
}
