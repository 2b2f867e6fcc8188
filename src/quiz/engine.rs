use std::collections::BTreeSet;

use serde::Serialize;
use uuid::Uuid;

use crate::course::{Course, Lesson, Question};
use crate::model::{ResourceType, ResourceTyped};
use crate::progress::{CompletionOutcome, CompletionRecord, ProgressStore};
use crate::quiz::{Answer, QuizError, QuizResult};
use crate::unlock;
use crate::utils::Clock;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, utoipa::ToSchema)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum QuizState {
    /// Reading the lesson body.
    Content,
    /// Waiting for an answer to question `index`.
    Quiz { index: usize },
    /// Showing the verdict and explanation for question `index`.
    Explanation { index: usize },
    Complete,
}

impl QuizState {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Content => "content",
            Self::Quiz { .. } => "quiz",
            Self::Explanation { .. } => "explanation",
            Self::Complete => "complete",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, utoipa::ToSchema)]
pub struct QuestionResult {
    pub question_id: String,
    pub correct: bool,
    pub user_answer: Answer,
    pub points_awarded: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, utoipa::ToSchema)]
pub struct QuizSummary {
    /// Sum of points of correctly answered questions. This is the XP credited.
    pub earned_points: u32,
    pub total_points: u32,
    pub correct_count: usize,
    pub question_count: usize,
    /// Percentage of questions answered correctly.
    pub score: u8,
}

#[derive(Debug, Clone, PartialEq, Serialize, utoipa::ToSchema)]
pub struct CompletionReceipt {
    pub lesson_id: String,
    pub summary: QuizSummary,
    pub outcome: CompletionOutcome,
    pub newly_unlocked: BTreeSet<String>,
}

/// One learner's run through a lesson and its quiz.
///
/// Correctness is decided once, on submit, and never revisited. The completion is
/// written by [`QuizSession::commit`]; a failed write leaves the session in
/// `Complete` with its results intact so the commit can be retried.
#[derive(Debug, Clone)]
pub struct QuizSession {
    id: Uuid,
    owner: Uuid,
    lesson: Lesson,
    state: QuizState,
    results: Vec<QuestionResult>,
    receipt: Option<CompletionReceipt>,
}

impl ResourceTyped for QuizSession {
    fn get_resource_type() -> ResourceType {
        ResourceType::QuizSession
    }
}

impl QuizSession {
    pub fn new(owner: Uuid, lesson: &Lesson) -> Self {
        Self {
            id: Uuid::new_v4(),
            owner,
            lesson: lesson.clone(),
            state: QuizState::Content,
            results: Vec::new(),
            receipt: None,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn owner(&self) -> Uuid {
        self.owner
    }

    pub fn lesson(&self) -> &Lesson {
        &self.lesson
    }

    pub fn state(&self) -> QuizState {
        self.state
    }

    pub fn results(&self) -> &[QuestionResult] {
        &self.results
    }

    pub fn receipt(&self) -> Option<&CompletionReceipt> {
        self.receipt.as_ref()
    }

    pub fn current_question(&self) -> Option<&Question> {
        match self.state {
            QuizState::Quiz { index } | QuizState::Explanation { index } => {
                self.lesson.questions().get(index)
            }
            _ => None,
        }
    }

    /// Verdict for the question currently being explained.
    pub fn last_result(&self) -> Option<&QuestionResult> {
        match self.state {
            QuizState::Explanation { index } => self.results.get(index),
            _ => None,
        }
    }

    pub fn progress_percent(&self) -> u8 {
        let total = self.lesson.questions().len();
        if total == 0 {
            return if self.state == QuizState::Complete { 100 } else { 0 };
        }
        (self.results.len() * 100 / total) as u8
    }

    /// `Content -> Quiz(0)`.
    pub fn start(&mut self) -> QuizResult<QuizState> {
        self.require("start", matches!(self.state, QuizState::Content))?;

        self.results.clear();
        self.state = if self.lesson.questions().is_empty() {
            QuizState::Complete
        } else {
            QuizState::Quiz { index: 0 }
        };
        Ok(self.state)
    }

    /// `Quiz(i) -> Explanation(i)`. Refused answers leave the session untouched.
    pub fn submit(&mut self, answer: Answer) -> QuizResult<&QuestionResult> {
        let QuizState::Quiz { index } = self.state else {
            return Err(self.invalid("submit"));
        };

        let question = &self.lesson.questions()[index];
        let answer = answer.normalized()?;
        let correct = question.is_correct(&answer)?;

        self.results.push(QuestionResult {
            question_id: question.id().to_string(),
            correct,
            user_answer: answer,
            points_awarded: if correct { question.points() } else { 0 },
        });
        self.state = QuizState::Explanation { index };

        tracing::debug!(session = %self.id, index, correct, "answer submitted");
        Ok(&self.results[index])
    }

    /// `Explanation(i) -> Quiz(i+1)`, or `Complete` after the last question.
    pub fn next(&mut self) -> QuizResult<QuizState> {
        let QuizState::Explanation { index } = self.state else {
            return Err(self.invalid("advance"));
        };

        self.state = if index + 1 < self.lesson.questions().len() {
            QuizState::Quiz { index: index + 1 }
        } else {
            QuizState::Complete
        };
        Ok(self.state)
    }

    pub fn summary(&self) -> QuizSummary {
        let question_count = self.lesson.questions().len();
        let correct_count = self.results.iter().filter(|r| r.correct).count();
        let score = if question_count == 0 {
            0
        } else {
            (correct_count * 100 / question_count) as u8
        };

        QuizSummary {
            earned_points: self.results.iter().map(|r| r.points_awarded).sum(),
            total_points: self.lesson.total_points(),
            correct_count,
            question_count,
            score,
        }
    }

    /// Writes the completion to `store` once and resolves the next unlock.
    ///
    /// After a successful write the receipt is cached and returned on every later
    /// call without touching the store again.
    #[tracing::instrument(skip_all, fields(session = %self.id, lesson = %self.lesson.id()))]
    pub async fn commit(
        &mut self,
        course: &Course,
        store: &dyn ProgressStore,
        clock: &Clock,
    ) -> QuizResult<CompletionReceipt> {
        self.require("commit", self.state == QuizState::Complete)?;

        if let Some(receipt) = &self.receipt {
            return Ok(receipt.clone());
        }

        let summary = self.summary();
        let completion = CompletionRecord {
            lesson_id: self.lesson.id().to_string(),
            score: summary.score,
            xp_earned: summary.earned_points,
            completed_at: clock.now(),
        };

        let outcome = store.record_completion(self.owner, completion).await?;
        // the write decides whether this was the first completion
        let newly_unlocked = if outcome.first_completion {
            unlock::newly_unlocked(course, &BTreeSet::new(), self.lesson.id())
        } else {
            BTreeSet::new()
        };

        tracing::info!(
            xp = outcome.xp_credited,
            unlocked = ?newly_unlocked,
            "lesson completed"
        );

        let receipt = CompletionReceipt {
            lesson_id: self.lesson.id().to_string(),
            summary,
            outcome,
            newly_unlocked,
        };
        self.receipt = Some(receipt.clone());
        Ok(receipt)
    }

    fn require(&self, action: &'static str, ok: bool) -> QuizResult<()> {
        if ok { Ok(()) } else { Err(self.invalid(action)) }
    }

    fn invalid(&self, action: &'static str) -> QuizError {
        QuizError::InvalidTransition {
            action,
            state: self.state.name(),
        }
    }
}
