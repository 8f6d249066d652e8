use crate::domain::error::DomainError;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error("storage read failed: {0}")]
    StorageRead(#[source] Box<dyn std::error::Error + Send + Sync>),

    #[error("storage write failed: {0}")]
    StorageWrite(#[source] Box<dyn std::error::Error + Send + Sync>),
}
