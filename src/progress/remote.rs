use async_trait::async_trait;
use uuid::Uuid;

use crate::model::entity::{ProgressRecordRow, UserStatsRow};
use crate::model::{DatabaseError, DbConnection, ModelManager, Page};
use crate::progress::{
    CompletionOutcome, CompletionRecord, LeaderboardEntry, ProgressSnapshot, ProgressStore,
    StoreResult, merge_completion, streak,
};
use crate::utils::Clock;

/// Hosted store backed by PostgreSQL.
#[derive(Debug, Clone)]
pub struct RemoteProgressStore {
    mm: ModelManager,
    clock: Clock,
}

impl RemoteProgressStore {
    /// Connects lazily and applies pending migrations.
    pub async fn connect(database_uri: &str, clock: Clock) -> StoreResult<Self> {
        let db = DbConnection::connect(database_uri)?;
        let store = Self::new(ModelManager::new(db), clock);
        store.mm.migrate().await?;
        Ok(store)
    }

    pub fn new(mm: ModelManager, clock: Clock) -> Self {
        Self { mm, clock }
    }
}

#[async_trait]
impl ProgressStore for RemoteProgressStore {
    async fn load_progress(&self, user_id: Uuid) -> StoreResult<ProgressSnapshot> {
        let (stats, records) = tokio::try_join!(
            UserStatsRow::find_by_user(&self.mm, user_id),
            ProgressRecordRow::all_by_user(&self.mm, user_id),
        )?;

        let Some(stats) = stats else {
            return Ok(ProgressSnapshot::default());
        };

        let records = records.iter().map(ProgressRecordRow::to_record).collect();
        Ok(ProgressSnapshot::from_parts(
            records,
            &stats.to_stats(),
            self.clock.today(),
        ))
    }

    #[tracing::instrument(skip(self, completion), fields(lesson = %completion.lesson_id))]
    async fn record_completion(
        &self,
        user_id: Uuid,
        completion: CompletionRecord,
    ) -> StoreResult<CompletionOutcome> {
        let mut tx = self
            .mm
            .executor()
            .begin()
            .await
            .map_err(DatabaseError::from)?;

        let stats = UserStatsRow::lock_for_update(&mut tx, user_id).await?;
        let previous = ProgressRecordRow::find(&mut tx, user_id, &completion.lesson_id)
            .await?
            .map(|row| row.to_record());

        let (record, stats, outcome) =
            merge_completion(previous.as_ref(), &stats.to_stats(), &completion);

        ProgressRecordRow::upsert(&mut tx, user_id, &record).await?;
        UserStatsRow::store(&mut tx, user_id, &stats).await?;
        tx.commit().await.map_err(DatabaseError::from)?;

        Ok(outcome)
    }

    async fn leaderboard(&self, limit: i64, offset: i64) -> StoreResult<Page<LeaderboardEntry>> {
        let (rows, total) = tokio::try_join!(
            UserStatsRow::list_by_xp(&self.mm, limit, offset),
            UserStatsRow::count(&self.mm),
        )?;

        let today = self.clock.today();
        let items = rows
            .iter()
            .enumerate()
            .map(|(i, row)| {
                let stats = row.to_stats();
                LeaderboardEntry {
                    rank: offset + i as i64 + 1,
                    user_id: row.user_id(),
                    total_xp: stats.total_xp,
                    lessons_completed: stats.lessons_completed,
                    current_streak: streak::effective(
                        stats.current_streak,
                        stats.last_study_date,
                        today,
                    ),
                }
            })
            .collect();

        Ok(Page::new(items, total, limit, offset))
    }
}
