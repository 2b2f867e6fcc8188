use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::progress::{
    CompletionOutcome, CompletionRecord, ProgressRecord, ProgressSnapshot, UserStats, streak,
};

/// Folds one completion into a user's existing record and stats.
///
/// The first completion of a lesson credits its XP in full and counts the lesson.
/// A repeat keeps the best score and XP seen so far and credits only the XP
/// improvement, so aggregates never double count.
pub fn merge_completion(
    previous: Option<&ProgressRecord>,
    stats: &UserStats,
    completion: &CompletionRecord,
) -> (ProgressRecord, UserStats, CompletionOutcome) {
    let study_day = completion.completed_at.date_naive();

    let (record, xp_credited) = match previous {
        None => (
            ProgressRecord {
                lesson_id: completion.lesson_id.clone(),
                score: completion.score,
                xp_earned: completion.xp_earned,
                completed_at: completion.completed_at,
            },
            completion.xp_earned,
        ),
        Some(prev) => (
            ProgressRecord {
                lesson_id: prev.lesson_id.clone(),
                score: prev.score.max(completion.score),
                xp_earned: prev.xp_earned.max(completion.xp_earned),
                completed_at: completion.completed_at,
            },
            completion.xp_earned.saturating_sub(prev.xp_earned),
        ),
    };

    let current_streak = streak::advance(stats.current_streak, stats.last_study_date, study_day);
    let last_study_date = match stats.last_study_date {
        Some(last) if last > study_day => Some(last),
        _ => Some(study_day),
    };

    let stats = UserStats {
        total_xp: stats.total_xp + u64::from(xp_credited),
        lessons_completed: stats.lessons_completed + u32::from(previous.is_none()),
        current_streak,
        best_streak: stats.best_streak.max(current_streak),
        last_study_date,
    };

    let outcome = CompletionOutcome {
        first_completion: previous.is_none(),
        xp_credited,
        stats: stats.clone(),
    };

    (record, stats, outcome)
}

/// Everything stored for one user by the document-style adapters.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProgressLedger {
    #[serde(default)]
    records: BTreeMap<String, ProgressRecord>,
    #[serde(default)]
    stats: UserStats,
}

impl ProgressLedger {
    pub fn record(&mut self, completion: &CompletionRecord) -> CompletionOutcome {
        let (record, stats, outcome) =
            merge_completion(self.records.get(&completion.lesson_id), &self.stats, completion);
        self.records.insert(record.lesson_id.clone(), record);
        self.stats = stats;
        outcome
    }

    pub fn stats(&self) -> &UserStats {
        &self.stats
    }

    pub fn snapshot(&self, today: NaiveDate) -> ProgressSnapshot {
        ProgressSnapshot::from_parts(self.records.values().cloned().collect(), &self.stats, today)
    }
}

#[cfg(test)]
mod test {
    use chrono::{DateTime, Duration, Utc};

    use super::*;

    fn at(days: i64) -> DateTime<Utc> {
        DateTime::<Utc>::from_timestamp(1_700_000_000, 0).unwrap() + Duration::days(days)
    }

    fn completion(lesson: &str, score: u8, xp: u32, day: i64) -> CompletionRecord {
        CompletionRecord {
            lesson_id: lesson.to_string(),
            score,
            xp_earned: xp,
            completed_at: at(day),
        }
    }

    #[test]
    fn test_first_completion_credits_everything() {
        let mut ledger = ProgressLedger::default();
        let outcome = ledger.record(&completion("l1", 66, 25, 0));

        assert!(outcome.first_completion);
        assert_eq!(outcome.xp_credited, 25);
        assert_eq!(ledger.stats().total_xp, 25);
        assert_eq!(ledger.stats().lessons_completed, 1);
        assert_eq!(ledger.stats().current_streak, 1);
        assert_eq!(ledger.stats().last_study_date, Some(at(0).date_naive()));
    }

    #[test]
    fn test_recompletion_credits_only_improvement() {
        let mut ledger = ProgressLedger::default();
        ledger.record(&completion("l1", 66, 25, 0));
        let worse = ledger.record(&completion("l1", 33, 10, 0));
        assert_eq!(worse.xp_credited, 0);
        assert!(!worse.first_completion);

        let better = ledger.record(&completion("l1", 100, 35, 0));
        assert_eq!(better.xp_credited, 10);
        assert_eq!(ledger.stats().total_xp, 35);
        assert_eq!(ledger.stats().lessons_completed, 1);

        let snapshot = ledger.snapshot(at(0).date_naive());
        assert_eq!(snapshot.records.len(), 1);
        assert_eq!(snapshot.records[0].score, 100);
    }

    #[test]
    fn test_streak_over_consecutive_days() {
        let mut ledger = ProgressLedger::default();
        ledger.record(&completion("l1", 100, 10, 0));
        ledger.record(&completion("l2", 100, 10, 1));
        ledger.record(&completion("l3", 100, 10, 2));
        assert_eq!(ledger.stats().current_streak, 3);

        ledger.record(&completion("l4", 100, 10, 5));
        assert_eq!(ledger.stats().current_streak, 1);
        assert_eq!(ledger.stats().best_streak, 3);
    }

    #[test]
    fn test_out_of_order_completion_keeps_stats_consistent() {
        let mut ledger = ProgressLedger::default();
        ledger.record(&completion("l1", 100, 10, 0));
        ledger.record(&completion("l2", 100, 10, 1));
        ledger.record(&completion("l3", 100, 10, 0));

        assert_eq!(ledger.stats().current_streak, 2);
        assert_eq!(ledger.stats().best_streak, 2);
        assert_eq!(ledger.stats().last_study_date, Some(at(1).date_naive()));
        assert_eq!(ledger.stats().total_xp, 30);
    }

    #[test]
    fn test_snapshot_reports_broken_streak_as_zero() {
        let mut ledger = ProgressLedger::default();
        ledger.record(&completion("l1", 100, 10, 0));
        ledger.record(&completion("l2", 100, 10, 1));

        let snapshot = ledger.snapshot(at(4).date_naive());
        assert_eq!(snapshot.current_streak, 0);
        assert_eq!(snapshot.best_streak, 2);
        assert_eq!(snapshot.total_xp, 20);
    }
}
