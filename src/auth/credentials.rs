use serde::{Deserialize, Serialize};
use std::fmt;

/// API key pair sent in the body of every request.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    #[serde(rename = "apikey")]
    api_key: String,
    #[serde(rename = "secretapikey")]
    secret_api_key: String,
}

impl Credentials {
    pub fn new(api_key: impl Into<String>, secret_api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            secret_api_key: secret_api_key.into(),
        }
    }

    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    pub fn secret_api_key(&self) -> &str {
        &self.secret_api_key
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("api_key", &"<redacted>")
            .field("secret_api_key", &"<redacted>")
            .finish()
    }
}
