use thiserror::Error;

/// Errors surfaced by repository implementations
///
/// Store failures are propagated unchanged to the caller. Nothing in the
/// repository layer retries or recovers from them.
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Failed to decode query result: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Team not found: {0}")]
    TeamNotFound(i64),

    #[error("{entity} already persisted with id {id}")]
    AlreadyPersisted { entity: &'static str, id: i64 },
}

pub type RepositoryResult<T> = Result<T, RepositoryError>;
