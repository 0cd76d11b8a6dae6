use std::time::Duration;

use reqwest::{Client, Response, Url};
use serde::de::DeserializeOwned;

use business::domain::errors::RepositoryError;
use business::domain::shared::value_objects::ProductId;

const PRODUCTS_PATH: [&str; 2] = ["bp", "products"];

/// Shared HTTP client configuration for the products API.
#[derive(Clone)]
pub struct ApiClient {
    pub client: Client,
    pub base_url: String,
}

impl ApiClient {
    /// Fails when the TLS backend or system configuration cannot be loaded.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            base_url: base_url.into(),
        })
    }

    fn endpoint(&self, extra: &[&str]) -> Result<Url, RepositoryError> {
        let mut url = Url::parse(&self.base_url).map_err(|e| {
            tracing::error!("Invalid API base url '{}': {}", self.base_url, e);
            RepositoryError::Network
        })?;
        url.path_segments_mut()
            .map_err(|_| RepositoryError::Network)?
            .pop_if_empty()
            .extend(PRODUCTS_PATH)
            .extend(extra);
        Ok(url)
    }

    /// `{base}/bp/products`
    pub fn products_url(&self) -> Result<Url, RepositoryError> {
        self.endpoint(&[])
    }

    /// `{base}/bp/products/{id}`, with the id percent-encoded.
    pub fn product_url(&self, id: &ProductId) -> Result<Url, RepositoryError> {
        self.endpoint(&[id.as_str()])
    }

    pub fn verification_url(&self, id: &ProductId) -> Result<Url, RepositoryError> {
        self.endpoint(&["verification", id.as_str()])
    }
}

pub(crate) fn transport_error(error: reqwest::Error) -> RepositoryError {
    tracing::warn!("Products API request failed: {}", error);
    RepositoryError::Network
}

/// Maps a non-success status onto the repository error kinds.
pub(crate) fn ensure_success(response: Response) -> Result<Response, RepositoryError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    tracing::warn!("Products API answered {} for {}", status, response.url());
    Err(RepositoryError::from_status(status.as_u16()))
}

pub(crate) async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T, RepositoryError> {
    ensure_success(response)?.json::<T>().await.map_err(|e| {
        tracing::warn!("Could not decode products API response: {}", e);
        RepositoryError::Network
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(base: &str) -> ApiClient {
        ApiClient::new(base, Duration::from_secs(30)).unwrap()
    }

    #[test]
    fn should_build_collection_url() {
        let url = client("http://localhost:3002").products_url().unwrap();
        assert_eq!(url.as_str(), "http://localhost:3002/bp/products");
    }

    #[test]
    fn should_tolerate_trailing_slash_in_base_url() {
        let url = client("http://localhost:3002/")
            .product_url(&ProductId::new("trj-crd"))
            .unwrap();
        assert_eq!(url.as_str(), "http://localhost:3002/bp/products/trj-crd");
    }

    #[test]
    fn should_keep_base_path_prefix() {
        let url = client("https://api.example.com/v1")
            .verification_url(&ProductId::new("abc"))
            .unwrap();
        assert_eq!(url.as_str(), "https://api.example.com/v1/bp/products/verification/abc");
    }

    #[test]
    fn should_percent_encode_ids() {
        let url = client("http://localhost:3002")
            .product_url(&ProductId::new("a b/c"))
            .unwrap();
        assert_eq!(url.as_str(), "http://localhost:3002/bp/products/a%20b%2Fc");
    }

    #[test]
    fn should_fail_with_network_error_on_broken_base_url() {
        let result = client("not a url").products_url();
        assert_eq!(result, Err(RepositoryError::Network));
    }

    #[test]
    fn should_return_client_instead_of_falling_back_to_default() {
        let api = ApiClient::new("http://localhost:3002", Duration::from_millis(250));

        assert!(api.is_ok_and(|api| api.base_url == "http://localhost:3002"));
    }
}
