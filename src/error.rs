use thiserror::Error;

use crate::config::ConfigError;
use crate::core::status::ApiError;
use crate::providers::porkbun::TransportError;

#[derive(Error, Debug)]
pub enum Error {
    #[error("building HTTP client failed: {0}")]
    Client(#[source] reqwest::Error),

    #[error("marshaling request body failed: {0}")]
    Serialize(#[source] serde_json::Error),

    #[error("creating request object failed: {0}")]
    Request(String),

    #[error("parsing base URL failed: {0}")]
    Url(#[from] url::ParseError),

    #[error("HTTP request failed: {0}")]
    Transport(#[from] TransportError),

    #[error("unmarshaling response body failed (HTTP {http_status}): {source}")]
    Decode {
        http_status: u16,
        #[source]
        source: serde_json::Error,
    },

    #[error(transparent)]
    Api(#[from] ApiError),

    /// The API reported success but returned no record.
    #[error("DNS record not found: {domain}/{id}")]
    RecordNotFound { domain: String, id: String },

    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
}

impl Error {
    pub fn api_error(&self) -> Option<&ApiError> {
        match self {
            Error::Api(err) => Some(err),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::RecordNotFound { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use std::error::Error as _;

    #[test]
    fn test_api_error_is_transparent() {
        let err = Error::from(ApiError {
            status: "ERROR".into(),
            message: "Record not found.".into(),
        });
        assert_eq!(err.to_string(), "ERROR: Record not found.");
        assert_eq!(err.api_error().map(|e| e.message.as_str()), Some("Record not found."));
        assert!(!err.is_not_found());
    }

    #[test]
    fn test_decode_keeps_source() {
        let source = serde_json::from_str::<serde_json::Value>("<html>").unwrap_err();
        let err = Error::Decode {
            http_status: 502,
            source,
        };
        assert!(err.to_string().contains("HTTP 502"));
        assert!(err.source().is_some());
        assert!(err.api_error().is_none());
    }

    #[test]
    fn test_not_found_sentinel() {
        let err = Error::RecordNotFound {
            domain: "example.com".into(),
            id: "42".into(),
        };
        assert!(err.is_not_found());
        assert_eq!(err.to_string(), "DNS record not found: example.com/42");
    }

    #[test]
    fn test_url_parse_error_keeps_source() {
        let parse = reqwest::Url::parse("http://").unwrap_err();
        let err = Error::from(parse);
        assert_matches!(
            err.source().and_then(|s| s.downcast_ref::<url::ParseError>()),
            Some(url::ParseError::EmptyHost)
        );
        assert!(err.to_string().starts_with("parsing base URL failed"));
    }
}
