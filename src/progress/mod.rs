//! Per-user progress: completed lessons, XP and study streaks.
//!
//! [`ProgressStore`] is the single contract callers use. Which adapter backs it
//! (a local JSON directory, PostgreSQL, or memory) is chosen by
//! [`crate::config::StorageConfig`].

use std::collections::BTreeSet;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{config::StorageConfig, model::Page, utils::Clock};

mod error;
pub use error::{StoreError, StoreResult};

mod ledger;
pub use ledger::{ProgressLedger, merge_completion};

pub mod streak;

mod local;
pub use local::LocalProgressStore;

mod memory;
pub use memory::MemoryProgressStore;

mod remote;
pub use remote::RemoteProgressStore;

/// One user's authoritative completion of one lesson.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct ProgressRecord {
    pub lesson_id: String,
    /// Percentage of questions answered correctly.
    pub score: u8,
    pub xp_earned: u32,
    pub completed_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct UserStats {
    pub total_xp: u64,
    pub lessons_completed: u32,
    pub current_streak: u32,
    pub best_streak: u32,
    pub last_study_date: Option<NaiveDate>,
}

/// What a quiz run submits to the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompletionRecord {
    pub lesson_id: String,
    pub score: u8,
    pub xp_earned: u32,
    pub completed_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct CompletionOutcome {
    pub first_completion: bool,
    /// XP actually added to the total by this completion.
    pub xp_credited: u32,
    pub stats: UserStats,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct ProgressSnapshot {
    pub completed_lesson_ids: BTreeSet<String>,
    pub total_xp: u64,
    pub lessons_completed: u32,
    pub current_streak: u32,
    pub best_streak: u32,
    pub last_study_date: Option<NaiveDate>,
    pub records: Vec<ProgressRecord>,
}

impl ProgressSnapshot {
    pub fn from_parts(records: Vec<ProgressRecord>, stats: &UserStats, today: NaiveDate) -> Self {
        Self {
            completed_lesson_ids: records.iter().map(|r| r.lesson_id.clone()).collect(),
            total_xp: stats.total_xp,
            lessons_completed: stats.lessons_completed,
            current_streak: streak::effective(stats.current_streak, stats.last_study_date, today),
            best_streak: stats.best_streak,
            last_study_date: stats.last_study_date,
            records,
        }
    }

    pub fn is_completed(&self, lesson_id: &str) -> bool {
        self.completed_lesson_ids.contains(lesson_id)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct LeaderboardEntry {
    pub rank: i64,
    pub user_id: Uuid,
    pub total_xp: u64,
    pub lessons_completed: u32,
    pub current_streak: u32,
}

#[async_trait]
pub trait ProgressStore: Send + Sync {
    /// Progress of `user_id`; a user without data gets the zero-value snapshot.
    async fn load_progress(&self, user_id: Uuid) -> StoreResult<ProgressSnapshot>;

    async fn record_completion(
        &self,
        user_id: Uuid,
        completion: CompletionRecord,
    ) -> StoreResult<CompletionOutcome>;

    /// Users ordered by total XP, highest first.
    async fn leaderboard(&self, limit: i64, offset: i64) -> StoreResult<Page<LeaderboardEntry>>;
}

/// Builds the adapter selected by configuration.
#[tracing::instrument(skip_all)]
pub async fn open_store(
    config: &StorageConfig,
    clock: Clock,
) -> StoreResult<Arc<dyn ProgressStore>> {
    let store: Arc<dyn ProgressStore> = match config {
        StorageConfig::Local { dir } => {
            let store = LocalProgressStore::open(dir.clone(), clock).await?;
            tracing::info!("using local progress store at {}", store.dir().display());
            Arc::new(store)
        }
        StorageConfig::Remote { database_uri } => {
            tracing::info!("using remote progress store");
            Arc::new(RemoteProgressStore::connect(database_uri, clock).await?)
        }
        StorageConfig::Memory => {
            tracing::warn!("using in-memory progress store, progress will not survive restarts");
            Arc::new(MemoryProgressStore::with_clock(clock))
        }
    };
    Ok(store)
}

/// Orders ledger-style entries the same way the SQL adapter does.
pub(crate) fn rank_entries(
    mut entries: Vec<(Uuid, UserStats)>,
    today: NaiveDate,
    limit: i64,
    offset: i64,
) -> Page<LeaderboardEntry> {
    entries.sort_by(|(a_id, a), (b_id, b)| b.total_xp.cmp(&a.total_xp).then(a_id.cmp(b_id)));
    let total = entries.len() as i64;

    let items = entries
        .into_iter()
        .enumerate()
        .skip(offset.max(0) as usize)
        .take(limit.max(0) as usize)
        .map(|(i, (user_id, stats))| LeaderboardEntry {
            rank: i as i64 + 1,
            user_id,
            total_xp: stats.total_xp,
            lessons_completed: stats.lessons_completed,
            current_streak: streak::effective(stats.current_streak, stats.last_study_date, today),
        })
        .collect();

    Page::new(items, total, limit, offset)
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_rank_entries_orders_by_xp_then_id() {
        let today = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();
        let a = Uuid::from_u128(1);
        let b = Uuid::from_u128(2);
        let c = Uuid::from_u128(3);
        let stats = |xp| UserStats {
            total_xp: xp,
            ..Default::default()
        };

        let page = rank_entries(vec![(c, stats(10)), (b, stats(50)), (a, stats(10))], today, 2, 1);

        assert_eq!(page.total, 3);
        assert_eq!(page.items.len(), 2);
        assert_eq!(page.items[0].user_id, a);
        assert_eq!(page.items[0].rank, 2);
        assert_eq!(page.items[1].user_id, c);
        assert_eq!(page.items[1].rank, 3);
    }
}
