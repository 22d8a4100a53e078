use sea_orm::DbErr;
use thiserror::Error;

/// Failure taxonomy shared by all domain services.
///
/// `Gateway` failures (mail dispatch, file storage) are recovered at the
/// notification/upload boundary and never escape a create or update
/// operation; the remaining variants propagate to the API layer.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("resource not found")]
    NotFound,

    #[error("{0}")]
    Validation(String),

    #[error("authentication required")]
    AuthRequired,

    #[error("storage backend error: {0}")]
    Store(DbErr),

    #[error("gateway error: {0}")]
    Gateway(String),
}

impl From<DbErr> for ServiceError {
    fn from(err: DbErr) -> Self {
        match err {
            DbErr::RecordNotFound(_) => ServiceError::NotFound,
            other => ServiceError::Store(other),
        }
    }
}
