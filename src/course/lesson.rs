use serde::{Deserialize, Serialize};

use crate::course::Question;
use crate::model::{ResourceType, ResourceTyped};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Lesson {
    id: String,
    title: String,
    description: String,
    content: String,
    icon: String,
    estimated_time: String,
    xp_reward: u32,
    questions: Vec<Question>,
    // derived per user, the stored value is never trusted
    #[serde(default)]
    is_completed: bool,
    #[serde(default)]
    is_unlocked: bool,
}

impl ResourceTyped for Lesson {
    fn get_resource_type() -> ResourceType {
        ResourceType::Lesson
    }
}

impl Lesson {
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn icon(&self) -> &str {
        &self.icon
    }

    pub fn estimated_time(&self) -> &str {
        &self.estimated_time
    }

    /// Nominal reward shown in the catalog. Credited XP comes from question points.
    pub fn xp_reward(&self) -> u32 {
        self.xp_reward
    }

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    /// Default lock flag from the catalog, before any user progress is applied.
    pub fn unlocked_by_default(&self) -> bool {
        self.is_unlocked
    }

    pub fn total_points(&self) -> u32 {
        self.questions.iter().map(Question::points).sum()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Unit {
    id: String,
    title: String,
    description: String,
    lessons: Vec<Lesson>,
}

impl Unit {
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn lessons(&self) -> &[Lesson] {
        &self.lessons
    }

    pub fn total_xp(&self) -> u32 {
        self.lessons.iter().map(Lesson::xp_reward).sum()
    }
}
