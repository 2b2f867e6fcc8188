use thiserror::Error;

pub type StoreResult<T> = std::result::Result<T, StoreError>;

#[derive(Debug, Error)]
pub enum StoreError {
    /// Backing storage could not be read or written. Safe to retry.
    #[error("storage unavailable: {0}")]
    StorageUnavailable(String),
    #[error("corrupted progress data: {0}")]
    Corrupted(String),
}

impl StoreError {
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::StorageUnavailable(_))
    }
}

impl From<std::io::Error> for StoreError {
    fn from(e: std::io::Error) -> Self {
        Self::StorageUnavailable(format!("io error: {e}"))
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(e: serde_json::Error) -> Self {
        Self::Corrupted(e.to_string())
    }
}

impl From<crate::model::DatabaseError> for StoreError {
    fn from(e: crate::model::DatabaseError) -> Self {
        match e {
            crate::model::DatabaseError::OutOfRange { .. } => Self::Corrupted(e.to_string()),
            _ => Self::StorageUnavailable(format!("database error: {e}")),
        }
    }
}
