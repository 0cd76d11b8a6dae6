use std::env;
use std::time::Duration;

/// Remote products API access
#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub base_url: String,
    pub timeout: Duration,
}

impl ApiConfig {
    /// Load API configuration from environment variables
    ///
    /// Environment variables:
    /// - API_URL: Base URL the `bp/products` paths hang from (default: "http://localhost:3002")
    /// - API_TIMEOUT_SECS: Per-request timeout in seconds (default: 30)
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let base_url = lookup("API_URL")
            .filter(|url| !url.trim().is_empty())
            .unwrap_or_else(|| "http://localhost:3002".to_string());
        let timeout = lookup("API_TIMEOUT_SECS")
            .and_then(|secs| secs.trim().parse::<u64>().ok())
            .unwrap_or(30);

        Self {
            base_url,
            timeout: Duration::from_secs(timeout),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_use_defaults_when_unset() {
        // Arrange & Act
        let config = ApiConfig::from_lookup(|_| None);

        // Assert
        assert_eq!(config.base_url, "http://localhost:3002");
        assert_eq!(config.timeout, Duration::from_secs(30));
    }

    #[test]
    fn should_read_values_and_ignore_bad_timeout() {
        // Arrange
        let lookup = |key: &str| match key {
            "API_URL" => Some("https://bank.example.com".to_string()),
            "API_TIMEOUT_SECS" => Some("soon".to_string()),
            _ => None,
        };

        // Act
        let config = ApiConfig::from_lookup(lookup);

        // Assert
        assert_eq!(config.base_url, "https://bank.example.com");
        assert_eq!(config.timeout, Duration::from_secs(30));
    }
}
