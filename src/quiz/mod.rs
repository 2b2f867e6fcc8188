//! Lesson/quiz state machine: `Content -> Quiz(i) -> Explanation(i) -> ... -> Complete`.

mod answer;
pub use answer::Answer;

mod engine;
pub use engine::{CompletionReceipt, QuestionResult, QuizSession, QuizState, QuizSummary};

mod error;
pub use error::{QuizError, QuizResult, ValidationError};
