//! Porkbun JSON API client

pub mod client;
pub mod retry;
pub mod transport;
pub mod types;


pub use client::{DEFAULT_BASE_URL, PorkbunClient};
pub use retry::RetryTransport;
pub use transport::{DEFAULT_TIMEOUT, HttpTransport, Transport, TransportError, TransportResponse};

/// Nameservers the registrar assigns to a domain by default.
pub const DEFAULT_NAMESERVERS: [&str; 4] = [
    "maceio.ns.porkbun.com",
    "curitiba.ns.porkbun.com",
    "salvador.ns.porkbun.com",
    "fortaleza.ns.porkbun.com",
];
