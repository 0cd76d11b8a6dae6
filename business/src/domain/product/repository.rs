use async_trait::async_trait;

use crate::domain::errors::RepositoryError;
use crate::domain::shared::value_objects::ProductId;

use super::model::{Product, ProductUpdate};

/// Remote product catalog. Every operation is atomic on the remote side.
#[async_trait]
pub trait ProductRepository: Send + Sync {
    async fn get_all(&self) -> Result<Vec<Product>, RepositoryError>;
    async fn get_by_id(&self, id: &ProductId) -> Result<Product, RepositoryError>;
    async fn create(&self, product: &Product) -> Result<Product, RepositoryError>;
    async fn update(&self, id: &ProductId, update: &ProductUpdate)
    -> Result<Product, RepositoryError>;
    async fn delete(&self, id: &ProductId) -> Result<(), RepositoryError>;
}
