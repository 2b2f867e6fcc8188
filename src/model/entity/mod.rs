use crate::model::{DatabaseError, DatabaseResult};

mod user_stats;
pub use user_stats::UserStatsRow;

mod progress_record;
pub use progress_record::ProgressRecordRow;

/// Converts a domain counter into its column type, refusing values that would wrap.
pub(crate) fn column_value<T, U>(value: T, column: &'static str) -> DatabaseResult<U>
where
    U: TryFrom<T>,
{
    U::try_from(value).map_err(|_| DatabaseError::OutOfRange { column })
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_column_value_in_range() {
        let v: i32 = column_value(42u32, "score").unwrap();
        assert_eq!(v, 42);
    }

    #[test]
    fn test_column_value_refuses_wrap() {
        let err = column_value::<u32, i32>(u32::MAX, "xp_earned").unwrap_err();
        assert!(matches!(err, DatabaseError::OutOfRange { column: "xp_earned" }));

        let store_err = crate::progress::StoreError::from(err);
        assert!(!store_err.is_retryable());
    }
}
