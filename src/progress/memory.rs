use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use uuid::Uuid;

use crate::model::Page;
use crate::progress::{
    CompletionOutcome, CompletionRecord, LeaderboardEntry, ProgressLedger, ProgressSnapshot,
    ProgressStore, StoreError, StoreResult, rank_entries,
};
use crate::utils::Clock;

/// Process-local store for tests and throwaway runs.
#[derive(Debug, Clone, Default)]
pub struct MemoryProgressStore {
    ledgers: Arc<Mutex<HashMap<Uuid, ProgressLedger>>>,
    clock: Clock,
}

impl MemoryProgressStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_clock(clock: Clock) -> Self {
        Self {
            ledgers: Arc::default(),
            clock,
        }
    }

    fn lock(&self) -> StoreResult<std::sync::MutexGuard<'_, HashMap<Uuid, ProgressLedger>>> {
        self.ledgers
            .lock()
            .map_err(|e| StoreError::StorageUnavailable(e.to_string()))
    }
}

#[async_trait]
impl ProgressStore for MemoryProgressStore {
    async fn load_progress(&self, user_id: Uuid) -> StoreResult<ProgressSnapshot> {
        let guard = self.lock()?;
        let today = self.clock.today();
        Ok(guard
            .get(&user_id)
            .map(|ledger| ledger.snapshot(today))
            .unwrap_or_default())
    }

    async fn record_completion(
        &self,
        user_id: Uuid,
        completion: CompletionRecord,
    ) -> StoreResult<CompletionOutcome> {
        let mut guard = self.lock()?;
        Ok(guard.entry(user_id).or_default().record(&completion))
    }

    async fn leaderboard(&self, limit: i64, offset: i64) -> StoreResult<Page<LeaderboardEntry>> {
        let guard = self.lock()?;
        let entries = guard
            .iter()
            .map(|(id, ledger)| (*id, ledger.stats().clone()))
            .collect();
        Ok(rank_entries(entries, self.clock.today(), limit, offset))
    }
}

#[cfg(test)]
mod test {
    use chrono::{DateTime, Utc};

    use super::*;

    fn completion(lesson: &str, xp: u32) -> CompletionRecord {
        CompletionRecord {
            lesson_id: lesson.to_string(),
            score: 100,
            xp_earned: xp,
            completed_at: DateTime::<Utc>::from_timestamp(1_700_000_000, 0).unwrap(),
        }
    }

    #[tokio::test]
    async fn test_unknown_user_gets_zero_value() {
        let store = MemoryProgressStore::new();
        let snapshot = store.load_progress(Uuid::new_v4()).await.unwrap();

        assert!(snapshot.completed_lesson_ids.is_empty());
        assert_eq!(snapshot.total_xp, 0);
        assert_eq!(snapshot.current_streak, 0);
        assert_eq!(snapshot.last_study_date, None);
    }

    #[tokio::test]
    async fn test_record_then_load() {
        let clock = Clock::fixed(DateTime::<Utc>::from_timestamp(1_700_000_000, 0).unwrap());
        let store = MemoryProgressStore::with_clock(clock);
        let user = Uuid::new_v4();

        store.record_completion(user, completion("u1-l1", 25)).await.unwrap();
        let snapshot = store.load_progress(user).await.unwrap();

        assert!(snapshot.is_completed("u1-l1"));
        assert_eq!(snapshot.total_xp, 25);
        assert_eq!(snapshot.lessons_completed, 1);
        assert_eq!(snapshot.current_streak, 1);
    }

    #[tokio::test]
    async fn test_leaderboard() {
        let store = MemoryProgressStore::new();
        let (a, b) = (Uuid::new_v4(), Uuid::new_v4());
        store.record_completion(a, completion("u1-l1", 10)).await.unwrap();
        store.record_completion(b, completion("u1-l1", 30)).await.unwrap();

        let page = store.leaderboard(10, 0).await.unwrap();
        assert_eq!(page.total, 2);
        assert_eq!(page.items[0].user_id, b);
        assert_eq!(page.items[1].user_id, a);
    }
}
