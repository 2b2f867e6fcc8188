use chrono::{DateTime, Utc};
use sqlx::PgConnection;
use sqlx::prelude::FromRow;
use uuid::Uuid;

use crate::model::entity::column_value;
use crate::model::{ModelManager, error::DatabaseResult};
use crate::progress::ProgressRecord;

#[derive(Debug, Clone, FromRow)]
pub struct ProgressRecordRow {
    user_id: Uuid,
    lesson_id: String,
    score: i16,
    xp_earned: i32,
    completed_at: DateTime<Utc>,
}

impl ProgressRecordRow {
    pub fn user_id(&self) -> Uuid {
        self.user_id
    }

    pub fn to_record(&self) -> ProgressRecord {
        ProgressRecord {
            lesson_id: self.lesson_id.clone(),
            score: self.score.clamp(0, 100) as u8,
            xp_earned: self.xp_earned.max(0) as u32,
            completed_at: self.completed_at,
        }
    }
}

impl ProgressRecordRow {
    pub async fn all_by_user(mm: &ModelManager, user_id: Uuid) -> DatabaseResult<Vec<Self>> {
        let result = sqlx::query_as(
            "SELECT * FROM progress_records WHERE user_id = $1 ORDER BY completed_at ASC",
        )
        .bind(user_id)
        .fetch_all(mm.executor())
        .await?;
        Ok(result)
    }

    pub async fn find(
        conn: &mut PgConnection,
        user_id: Uuid,
        lesson_id: &str,
    ) -> DatabaseResult<Option<Self>> {
        let result =
            sqlx::query_as("SELECT * FROM progress_records WHERE user_id = $1 AND lesson_id = $2")
                .bind(user_id)
                .bind(lesson_id)
                .fetch_optional(&mut *conn)
                .await?;
        Ok(result)
    }

    pub async fn upsert(
        conn: &mut PgConnection,
        user_id: Uuid,
        record: &ProgressRecord,
    ) -> DatabaseResult<()> {
        sqlx::query(
            r#"
            INSERT INTO progress_records (user_id, lesson_id, score, xp_earned, completed_at)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (user_id, lesson_id) DO UPDATE
            SET score = EXCLUDED.score,
                xp_earned = EXCLUDED.xp_earned,
                completed_at = EXCLUDED.completed_at
            "#,
        )
        .bind(user_id)
        .bind(&record.lesson_id)
        .bind(i16::from(record.score))
        .bind(column_value::<_, i32>(record.xp_earned, "xp_earned")?)
        .bind(record.completed_at)
        .execute(&mut *conn)
        .await?;
        Ok(())
    }
}
