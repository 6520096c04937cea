//! Credential-injecting JSON client for the Porkbun DNS API, plus an
//! in-process fake of the same API for tests.

pub mod auth;
pub mod config;
pub mod core;
pub mod error;
pub mod mock_server;
pub mod providers;

pub use crate::auth::credentials::Credentials;
pub use crate::config::{Config, ConfigError, DEFAULT_MAX_RETRIES};
pub use crate::core::record::{DEFAULT_TTL, DnsRecord, DnsRecordType, MIN_TTL};
pub use crate::core::status::{ApiError, Status};
pub use crate::error::Error;
pub use crate::mock_server::MockApiServer;
pub use crate::providers::porkbun::{
    DEFAULT_BASE_URL, DEFAULT_NAMESERVERS, DEFAULT_TIMEOUT, HttpTransport, PorkbunClient,
    RetryTransport, Transport, TransportError, TransportResponse,
};
