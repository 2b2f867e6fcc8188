use serde::Serialize;

use crate::course::{Lesson, Question};
use crate::unlock::UnlockState;

/// A question without its answer key or explanation.
#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
pub struct QuestionView {
    id: String,
    #[serde(rename = "type")]
    question_type: String,
    prompt: String,
    options: Option<Vec<String>>,
    points: u32,
}

impl From<&Question> for QuestionView {
    fn from(q: &Question) -> Self {
        Self {
            id: q.id().to_string(),
            question_type: q.kind().type_name().to_string(),
            prompt: q.prompt().to_string(),
            options: q.kind().options().map(<[String]>::to_vec),
            points: q.points(),
        }
    }
}

#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
pub struct LessonResponse {
    id: String,
    title: String,
    description: String,
    content: String,
    icon: String,
    estimated_time: String,
    xp_reward: u32,
    total_points: u32,
    is_unlocked: bool,
    is_completed: bool,
    questions: Vec<QuestionView>,
}

impl LessonResponse {
    pub fn new(lesson: &Lesson, unlock: &UnlockState) -> Self {
        Self {
            id: lesson.id().to_string(),
            title: lesson.title().to_string(),
            description: lesson.description().to_string(),
            content: lesson.content().to_string(),
            icon: lesson.icon().to_string(),
            estimated_time: lesson.estimated_time().to_string(),
            xp_reward: lesson.xp_reward(),
            total_points: lesson.total_points(),
            is_unlocked: unlock.is_unlocked(lesson.id()),
            is_completed: unlock.is_completed(lesson.id()),
            questions: lesson.questions().iter().map(QuestionView::from).collect(),
        }
    }
}
