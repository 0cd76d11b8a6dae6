/// Errors reported by the remote product API ports.
/// Use code-style identifiers for all error variants for i18n compatibility.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RepositoryError {
    #[error("repository.not_found")]
    NotFound,
    /// The API refused the payload (HTTP 400).
    #[error("repository.rejected")]
    Rejected,
    #[error("repository.server_error")]
    Server,
    /// Transport or decoding failure; the request may never have reached the API.
    #[error("repository.network")]
    Network,
}

impl RepositoryError {
    /// Maps an HTTP status code of a failed response to an error kind.
    pub fn from_status(status: u16) -> Self {
        match status {
            400 => RepositoryError::Rejected,
            404 => RepositoryError::NotFound,
            _ => RepositoryError::Server,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_map_status_codes_to_kinds() {
        assert_eq!(RepositoryError::from_status(400), RepositoryError::Rejected);
        assert_eq!(RepositoryError::from_status(404), RepositoryError::NotFound);
        assert_eq!(RepositoryError::from_status(500), RepositoryError::Server);
        assert_eq!(RepositoryError::from_status(503), RepositoryError::Server);
    }

    #[test]
    fn should_render_code_style_messages() {
        assert_eq!(RepositoryError::NotFound.to_string(), "repository.not_found");
        assert_eq!(RepositoryError::Network.to_string(), "repository.network");
    }
}
