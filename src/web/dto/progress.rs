use std::collections::BTreeSet;

use serde::Serialize;

use crate::progress::ProgressSnapshot;
use crate::unlock::UnlockState;

#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
pub struct ProgressResponse {
    #[serde(flatten)]
    snapshot: ProgressSnapshot,
    unlocked_lesson_ids: BTreeSet<String>,
    lesson_count: usize,
}

impl ProgressResponse {
    pub fn new(snapshot: ProgressSnapshot, unlock: &UnlockState, lesson_count: usize) -> Self {
        Self {
            snapshot,
            unlocked_lesson_ids: unlock.unlocked().clone(),
            lesson_count,
        }
    }
}
