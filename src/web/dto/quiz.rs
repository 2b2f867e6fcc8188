use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::quiz::{Answer, CompletionReceipt, QuestionResult, QuizSession, QuizState, QuizSummary};
use crate::web::dto::lessons::QuestionView;

#[derive(Debug, Clone, Deserialize, utoipa::ToSchema)]
pub struct OpenSessionRequest {
    pub lesson_id: String,
}

#[derive(Debug, Clone, Deserialize, utoipa::ToSchema)]
pub struct SubmitAnswerRequest {
    /// A string, or a list of strings for matching questions.
    pub answer: Answer,
}

/// Verdict for the question being explained, with the answer key revealed.
#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
pub struct AnswerFeedback {
    #[serde(flatten)]
    result: QuestionResult,
    correct_answer: Answer,
    explanation: String,
}

#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
pub struct SessionView {
    session_id: Uuid,
    lesson_id: String,
    state: QuizState,
    progress_percent: u8,
    question_count: usize,
    question: Option<QuestionView>,
    feedback: Option<AnswerFeedback>,
    summary: Option<QuizSummary>,
    receipt: Option<CompletionReceipt>,
}

impl From<&QuizSession> for SessionView {
    fn from(session: &QuizSession) -> Self {
        let question = session.current_question();
        let feedback = session
            .last_result()
            .zip(question)
            .map(|(result, q)| AnswerFeedback {
                result: result.clone(),
                correct_answer: q.expected_answer(),
                explanation: q.explanation().to_string(),
            });
        let complete = session.state() == QuizState::Complete;

        Self {
            session_id: session.id(),
            lesson_id: session.lesson().id().to_string(),
            state: session.state(),
            progress_percent: session.progress_percent(),
            question_count: session.lesson().questions().len(),
            question: question.map(QuestionView::from),
            feedback,
            summary: complete.then(|| session.summary()),
            receipt: session.receipt().cloned(),
        }
    }
}
