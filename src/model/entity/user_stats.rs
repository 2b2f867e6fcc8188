use chrono::NaiveDate;
use sqlx::PgConnection;
use sqlx::prelude::FromRow;
use uuid::Uuid;

use crate::model::entity::column_value;
use crate::model::{ModelManager, error::DatabaseResult};
use crate::progress::UserStats;

#[derive(Debug, Clone, FromRow)]
pub struct UserStatsRow {
    user_id: Uuid,
    total_xp: i64,
    lessons_completed: i32,
    current_streak: i32,
    best_streak: i32,
    last_study_date: Option<NaiveDate>,
}

impl UserStatsRow {
    pub fn user_id(&self) -> Uuid {
        self.user_id
    }

    pub fn to_stats(&self) -> UserStats {
        UserStats {
            total_xp: self.total_xp.max(0) as u64,
            lessons_completed: self.lessons_completed.max(0) as u32,
            current_streak: self.current_streak.max(0) as u32,
            best_streak: self.best_streak.max(0) as u32,
            last_study_date: self.last_study_date,
        }
    }
}

impl UserStatsRow {
    pub async fn find_by_user(mm: &ModelManager, user_id: Uuid) -> DatabaseResult<Option<Self>> {
        let result = sqlx::query_as("SELECT * FROM user_stats WHERE user_id = $1")
            .bind(user_id)
            .fetch_optional(mm.executor())
            .await?;
        Ok(result)
    }

    /// Ensures the row exists and locks it until the surrounding transaction ends.
    pub async fn lock_for_update(conn: &mut PgConnection, user_id: Uuid) -> DatabaseResult<Self> {
        sqlx::query("INSERT INTO user_stats (user_id) VALUES ($1) ON CONFLICT (user_id) DO NOTHING")
            .bind(user_id)
            .execute(&mut *conn)
            .await?;

        let row = sqlx::query_as("SELECT * FROM user_stats WHERE user_id = $1 FOR UPDATE")
            .bind(user_id)
            .fetch_one(&mut *conn)
            .await?;
        Ok(row)
    }

    pub async fn store(
        conn: &mut PgConnection,
        user_id: Uuid,
        stats: &UserStats,
    ) -> DatabaseResult<()> {
        let total_xp: i64 = column_value(stats.total_xp, "total_xp")?;
        let lessons_completed: i32 = column_value(stats.lessons_completed, "lessons_completed")?;
        let current_streak: i32 = column_value(stats.current_streak, "current_streak")?;
        let best_streak: i32 = column_value(stats.best_streak, "best_streak")?;

        sqlx::query(
            r#"
            UPDATE user_stats
            SET total_xp = $2,
                lessons_completed = $3,
                current_streak = $4,
                best_streak = $5,
                last_study_date = $6
            WHERE user_id = $1
            "#,
        )
        .bind(user_id)
        .bind(total_xp)
        .bind(lessons_completed)
        .bind(current_streak)
        .bind(best_streak)
        .bind(stats.last_study_date)
        .execute(&mut *conn)
        .await?;
        Ok(())
    }

    pub async fn list_by_xp(mm: &ModelManager, limit: i64, offset: i64) -> DatabaseResult<Vec<Self>> {
        let result = sqlx::query_as(
            "SELECT * FROM user_stats ORDER BY total_xp DESC, user_id ASC LIMIT $1 OFFSET $2",
        )
        .bind(limit)
        .bind(offset)
        .fetch_all(mm.executor())
        .await?;
        Ok(result)
    }

    pub async fn count(mm: &ModelManager) -> DatabaseResult<i64> {
        let result: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM user_stats")
            .fetch_one(mm.executor())
            .await?;
        Ok(result)
    }
}
