use async_trait::async_trait;

use crate::domain::errors::RepositoryError;
use crate::domain::shared::value_objects::ProductId;

/// Service port answering whether an id is already taken.
#[async_trait]
pub trait IdVerificationService: Send + Sync {
    async fn exists(&self, id: &ProductId) -> Result<bool, RepositoryError>;
}

/// Navigation port used after a successful create.
pub trait Navigator: Send + Sync {
    fn to_list(&self);
}
