use async_trait::async_trait;
use serde_json::Value;

use business::domain::errors::RepositoryError;
use business::domain::product::model::{
    Product, ProductPayload, ProductUpdate, ProductUpdatePayload,
};
use business::domain::product::repository::ProductRepository;
use business::domain::shared::dates::DateEngine;
use business::domain::shared::value_objects::ProductId;

use crate::client::{ApiClient, ensure_success, read_json, transport_error};
use crate::envelope::ApiResponse;

pub struct ProductRepositoryApi {
    api: ApiClient,
    engine: DateEngine,
}

impl ProductRepositoryApi {
    pub fn new(api: ApiClient, engine: DateEngine) -> Self {
        Self { api, engine }
    }

    fn into_domain(&self, payload: ProductPayload) -> Result<Product, RepositoryError> {
        let id = payload.id.clone();
        payload.into_product(&self.engine).map_err(|e| {
            tracing::warn!("Product '{}' carries an unreadable date: {}", id, e);
            RepositoryError::Network
        })
    }

    /// The update endpoint is loosely typed: `data` may hold the product, a
    /// list around it, or nothing. Falls back to the values that were sent.
    fn updated_product(
        &self,
        data: Option<Value>,
        id: &ProductId,
        update: &ProductUpdate,
    ) -> Product {
        let candidate = match data {
            Some(Value::Array(items)) => items.into_iter().next(),
            other => other,
        };
        candidate
            .and_then(|value| serde_json::from_value::<ProductPayload>(value).ok())
            .and_then(|payload| payload.into_product(&self.engine).ok())
            .unwrap_or_else(|| {
                Product::from_repository(
                    id.clone(),
                    update.name.clone(),
                    update.description.clone(),
                    update.logo.clone(),
                    update.date_release,
                    update.date_revision,
                )
            })
    }
}

#[async_trait]
impl ProductRepository for ProductRepositoryApi {
    async fn get_all(&self) -> Result<Vec<Product>, RepositoryError> {
        let response = self
            .api
            .client
            .get(self.api.products_url()?)
            .send()
            .await
            .map_err(transport_error)?;
        let body: ApiResponse<Vec<ProductPayload>> = read_json(response).await?;

        // One malformed row should not hide the rest of the catalog.
        Ok(body
            .data
            .into_iter()
            .filter_map(|payload| self.into_domain(payload).ok())
            .collect())
    }

    async fn get_by_id(&self, id: &ProductId) -> Result<Product, RepositoryError> {
        let response = self
            .api
            .client
            .get(self.api.product_url(id)?)
            .send()
            .await
            .map_err(transport_error)?;
        let body: ApiResponse<ProductPayload> = read_json(response).await?;

        self.into_domain(body.data)
    }

    async fn create(&self, product: &Product) -> Result<Product, RepositoryError> {
        let response = self
            .api
            .client
            .post(self.api.products_url()?)
            .json(&ProductPayload::from(product))
            .send()
            .await
            .map_err(transport_error)?;
        let body: ApiResponse<ProductPayload> = read_json(response).await?;
        if let Some(message) = &body.message {
            tracing::debug!("Create answered: {}", message);
        }

        self.into_domain(body.data)
    }

    async fn update(
        &self,
        id: &ProductId,
        update: &ProductUpdate,
    ) -> Result<Product, RepositoryError> {
        let response = self
            .api
            .client
            .put(self.api.product_url(id)?)
            .json(&ProductUpdatePayload::from(update))
            .send()
            .await
            .map_err(transport_error)?;
        let body: Value = read_json(response).await?;

        Ok(self.updated_product(body.get("data").cloned(), id, update))
    }

    async fn delete(&self, id: &ProductId) -> Result<(), RepositoryError> {
        let response = self
            .api
            .client
            .delete(self.api.product_url(id)?)
            .send()
            .await
            .map_err(transport_error)?;
        ensure_success(response)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use business::domain::product::model::NewProductProps;
    use chrono::NaiveDate;
    use serde_json::json;
    use std::time::Duration;

    fn repository() -> ProductRepositoryApi {
        ProductRepositoryApi::new(
            ApiClient::new("http://localhost:3002", Duration::from_secs(1)).unwrap(),
            DateEngine::default(),
        )
    }

    fn update() -> ProductUpdate {
        let product = Product::new(NewProductProps {
            id: ProductId::new("trj-crd"),
            name: "Tarjeta credito".to_string(),
            description: "Tarjeta de consumo".to_string(),
            logo: "https://example.com/card.png".to_string(),
            date_release: NaiveDate::from_ymd_opt(2025, 8, 16).unwrap(),
        })
        .unwrap();
        ProductUpdate::from(&product)
    }

    fn wire_product(name: &str) -> Value {
        json!({
            "id": "trj-crd",
            "name": name,
            "description": "Tarjeta de consumo",
            "logo": "https://example.com/card.png",
            "date_release": "16/08/2025",
            "date_revision": "16/08/2026"
        })
    }

    #[test]
    fn should_read_product_object_from_update_response() {
        let id = ProductId::new("trj-crd");

        let product = repository().updated_product(Some(wire_product("Server name")), &id, &update());

        assert_eq!(product.name, "Server name");
        assert_eq!(product.date_release, NaiveDate::from_ymd_opt(2025, 8, 16).unwrap());
    }

    #[test]
    fn should_read_first_item_when_update_response_is_a_list() {
        let id = ProductId::new("trj-crd");

        let product = repository().updated_product(
            Some(json!([wire_product("Listed name")])),
            &id,
            &update(),
        );

        assert_eq!(product.name, "Listed name");
    }

    #[test]
    fn should_fall_back_to_sent_values_when_update_response_is_empty() {
        let id = ProductId::new("trj-crd");
        let sent = update();

        let product = repository().updated_product(None, &id, &sent);

        assert_eq!(product.id, id);
        assert_eq!(product.name, sent.name);
        assert_eq!(product.date_revision, sent.date_revision);
    }

    #[test]
    fn should_map_unreadable_wire_date_to_network_error() {
        let payload: ProductPayload = serde_json::from_value(json!({
            "id": "abc",
            "name": "Savings",
            "description": "Savings account",
            "logo": "https://example.com/s.png",
            "date_release": "31/02/2025",
            "date_revision": "2026-02-28"
        }))
        .unwrap();

        assert_eq!(repository().into_domain(payload), Err(RepositoryError::Network));
    }
}
