use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::model::Page;
use crate::progress::{
    CompletionOutcome, CompletionRecord, LeaderboardEntry, ProgressLedger, ProgressSnapshot,
    ProgressStore, StoreResult, rank_entries,
};
use crate::utils::Clock;

/// Device-local store: one JSON document per user in `dir`.
#[derive(Debug)]
pub struct LocalProgressStore {
    dir: PathBuf,
    clock: Clock,
    // serializes read-modify-write of the user documents
    write_lock: Mutex<()>,
}

impl LocalProgressStore {
    pub async fn open(dir: PathBuf, clock: Clock) -> StoreResult<Self> {
        tokio::fs::create_dir_all(&dir).await?;
        Ok(Self {
            dir,
            clock,
            write_lock: Mutex::new(()),
        })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn user_path(&self, user_id: Uuid) -> PathBuf {
        self.dir.join(format!("{user_id}.json"))
    }

    async fn read_ledger(&self, path: &Path) -> StoreResult<ProgressLedger> {
        match tokio::fs::read(path).await {
            Ok(bytes) => Ok(serde_json::from_slice(&bytes)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(ProgressLedger::default()),
            Err(e) => Err(e.into()),
        }
    }

    async fn write_ledger(&self, path: &Path, ledger: &ProgressLedger) -> StoreResult<()> {
        let bytes = serde_json::to_vec_pretty(ledger)?;
        let tmp = path.with_extension("json.tmp");
        tokio::fs::write(&tmp, bytes).await?;
        tokio::fs::rename(&tmp, path).await?;
        Ok(())
    }
}

#[async_trait]
impl ProgressStore for LocalProgressStore {
    async fn load_progress(&self, user_id: Uuid) -> StoreResult<ProgressSnapshot> {
        let ledger = self.read_ledger(&self.user_path(user_id)).await?;
        Ok(ledger.snapshot(self.clock.today()))
    }

    #[tracing::instrument(skip(self, completion), fields(lesson = %completion.lesson_id))]
    async fn record_completion(
        &self,
        user_id: Uuid,
        completion: CompletionRecord,
    ) -> StoreResult<CompletionOutcome> {
        let _guard = self.write_lock.lock().await;
        let path = self.user_path(user_id);

        let mut ledger = self.read_ledger(&path).await?;
        let outcome = ledger.record(&completion);
        self.write_ledger(&path, &ledger).await?;

        tracing::debug!("progress written to {}", path.display());
        Ok(outcome)
    }

    async fn leaderboard(&self, limit: i64, offset: i64) -> StoreResult<Page<LeaderboardEntry>> {
        let mut entries = Vec::new();
        let mut dir = tokio::fs::read_dir(&self.dir).await?;

        while let Some(entry) = dir.next_entry().await? {
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            let Some(user_id) = path
                .file_stem()
                .and_then(|s| s.to_str())
                .and_then(|s| s.parse::<Uuid>().ok())
            else {
                continue;
            };

            match self.read_ledger(&path).await {
                Ok(ledger) => entries.push((user_id, ledger.stats().clone())),
                Err(e) => tracing::warn!("skipping {} in leaderboard: {}", path.display(), e),
            }
        }

        Ok(rank_entries(entries, self.clock.today(), limit, offset))
    }
}
