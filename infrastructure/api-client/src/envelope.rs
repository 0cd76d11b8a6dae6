use serde::Deserialize;

/// `{ message, data }` wrapper around every products API payload.
#[derive(Debug, Deserialize)]
pub struct ApiResponse<T> {
    #[serde(default)]
    pub message: Option<String>,
    pub data: T,
}
