use crate::domain::errors::RepositoryError;
use crate::domain::shared::dates::InvalidDateError;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProductError {
    #[error("product.not_found")]
    NotFound,
    #[error("product.validation_rejected")]
    ValidationRejected,
    #[error("product.server_error")]
    Server,
    #[error("product.unavailable")]
    Unavailable,
    /// The local form still has failing rules; nothing was sent.
    #[error("product.invalid_form")]
    InvalidForm,
    /// A save for this form is still running; nothing was sent.
    #[error("product.save_in_progress")]
    SaveInProgress,
    #[error("product.invalid_date")]
    InvalidDate(#[from] InvalidDateError),
}

impl From<RepositoryError> for ProductError {
    fn from(error: RepositoryError) -> Self {
        match error {
            RepositoryError::NotFound => ProductError::NotFound,
            RepositoryError::Rejected => ProductError::ValidationRejected,
            RepositoryError::Server => ProductError::Server,
            RepositoryError::Network => ProductError::Unavailable,
        }
    }
}
