use serde::Serialize;

use crate::course::{Course, Lesson, Unit};
use crate::unlock::UnlockState;

/// Catalog as seen by one learner.
#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
pub struct CourseResponse {
    units: Vec<UnitResponse>,
}

#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
pub struct UnitResponse {
    id: String,
    title: String,
    description: String,
    total_xp: u32,
    lessons: Vec<LessonSummary>,
}

#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
pub struct LessonSummary {
    id: String,
    title: String,
    description: String,
    icon: String,
    estimated_time: String,
    xp_reward: u32,
    question_count: usize,
    is_unlocked: bool,
    is_completed: bool,
}

impl LessonSummary {
    pub fn new(lesson: &Lesson, unlock: &UnlockState) -> Self {
        Self {
            id: lesson.id().to_string(),
            title: lesson.title().to_string(),
            description: lesson.description().to_string(),
            icon: lesson.icon().to_string(),
            estimated_time: lesson.estimated_time().to_string(),
            xp_reward: lesson.xp_reward(),
            question_count: lesson.questions().len(),
            is_unlocked: unlock.is_unlocked(lesson.id()),
            is_completed: unlock.is_completed(lesson.id()),
        }
    }
}

impl UnitResponse {
    fn new(unit: &Unit, unlock: &UnlockState) -> Self {
        Self {
            id: unit.id().to_string(),
            title: unit.title().to_string(),
            description: unit.description().to_string(),
            total_xp: unit.total_xp(),
            lessons: unit
                .lessons()
                .iter()
                .map(|l| LessonSummary::new(l, unlock))
                .collect(),
        }
    }
}

impl CourseResponse {
    pub fn new(course: &Course, unlock: &UnlockState) -> Self {
        Self {
            units: course
                .units()
                .iter()
                .map(|u| UnitResponse::new(u, unlock))
                .collect(),
        }
    }
}
