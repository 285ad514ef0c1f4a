use sea_orm::DbErr;
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum HrError {
    /// Missing or malformed input.
    #[error("{0}")]
    Validation(String),
    #[error("employee {0} not found")]
    NotFound(Uuid),
    #[error("{0}")]
    Store(#[from] DbErr),
    /// The prediction service could not produce a score. Never fails a request.
    #[error("risk service: {0}")]
    ExternalService(String),
}

pub type HrResult<T> = Result<T, HrError>;

impl HrError {
    pub(crate) fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }
}
