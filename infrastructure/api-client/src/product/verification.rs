use async_trait::async_trait;

use business::domain::errors::RepositoryError;
use business::domain::product::services::IdVerificationService;
use business::domain::shared::value_objects::ProductId;

use crate::client::{ApiClient, read_json, transport_error};

/// Answers id availability from `bp/products/verification/{id}`, which
/// replies with a bare JSON boolean.
pub struct IdVerificationApi {
    api: ApiClient,
}

impl IdVerificationApi {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }
}

#[async_trait]
impl IdVerificationService for IdVerificationApi {
    async fn exists(&self, id: &ProductId) -> Result<bool, RepositoryError> {
        let response = self
            .api
            .client
            .get(self.api.verification_url(id)?)
            .send()
            .await
            .map_err(transport_error)?;

        read_json::<bool>(response).await
    }
}
