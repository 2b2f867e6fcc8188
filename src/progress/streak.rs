//! Consecutive study-day counting.

use chrono::NaiveDate;

/// Streak after studying on `today`, given the previous streak and study date.
pub fn advance(current: u32, last_study: Option<NaiveDate>, today: NaiveDate) -> u32 {
    match last_study {
        Some(last) if last == today => current.max(1),
        // out-of-order day, e.g. after clock skew
        Some(last) if last > today => current,
        Some(last) if last.succ_opt() == Some(today) => current + 1,
        _ => 1,
    }
}

/// Streak as seen on `today`: a streak whose last study day is before yesterday is broken.
pub fn effective(current: u32, last_study: Option<NaiveDate>, today: NaiveDate) -> u32 {
    match last_study {
        None => 0,
        Some(last) if last.succ_opt().is_some_and(|next| next < today) => 0,
        Some(_) => current,
    }
}
