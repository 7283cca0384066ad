use rusqlite::ErrorCode;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, StoreError>;

/// Failures surfaced by the query layer. A lookup that matches nothing is
/// not an error; it comes back as `Ok(None)` or an empty list.
#[derive(Debug, Error)]
pub enum StoreError {
    /// A UNIQUE, NOT NULL, CHECK or foreign key constraint rejected a write.
    #[error("constraint violated: {0}")]
    Constraint(String),

    #[error("database error: {0}")]
    Backend(rusqlite::Error),

    #[error("{0} connection lock poisoned")]
    PoolPoisoned(&'static str),

    #[error("blocking query task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

impl StoreError {
    pub fn is_constraint(&self) -> bool {
        matches!(self, StoreError::Constraint(_))
    }
}

impl From<rusqlite::Error> for StoreError {
    fn from(err: rusqlite::Error) -> Self {
        match err {
            rusqlite::Error::SqliteFailure(ref failure, ref message)
                if failure.code == ErrorCode::ConstraintViolation =>
            {
                StoreError::Constraint(message.clone().unwrap_or_else(|| failure.to_string()))
            }
            other => StoreError::Backend(other),
        }
    }
}
