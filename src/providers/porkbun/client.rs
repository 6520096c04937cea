use log::debug;
use reqwest::Url;
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::sync::Arc;

use crate::auth::credentials::Credentials;
use crate::config::Config;
use crate::core::record::DnsRecord;
use crate::core::status::Status;
use crate::error::Error;
use crate::providers::porkbun::retry::RetryTransport;
use crate::providers::porkbun::transport::{DEFAULT_TIMEOUT, HttpTransport, Transport};
use crate::providers::porkbun::types::*;

pub const DEFAULT_BASE_URL: &str = "https://api.porkbun.com/api/json/v3";

/// Client for the Porkbun JSON API.
///
/// Holds only immutable state, so one instance can be shared across tasks.
/// Every operation is a single POST; dropping the returned future aborts the
/// request in flight.
#[derive(Clone)]
pub struct PorkbunClient {
    credentials: Credentials,
    base_url: Url,
    transport: Arc<dyn Transport>,
}

impl PorkbunClient {
    pub fn new(
        api_key: impl Into<String>,
        secret_api_key: impl Into<String>,
    ) -> Result<Self, Error> {
        Self::from_parts(
            Credentials::new(api_key, secret_api_key),
            Arc::new(HttpTransport::new(DEFAULT_TIMEOUT)?),
        )
    }

    /// Builds a client from environment-derived settings: configured timeout,
    /// retries when `max_retries > 0`, and the custom base URL if any.
    pub fn from_config(config: &Config) -> Result<Self, Error> {
        let mut transport: Arc<dyn Transport> = Arc::new(HttpTransport::new(config.timeout)?);
        if config.max_retries > 0 {
            transport = Arc::new(RetryTransport::new(transport, config.max_retries));
        }

        let client = Self::from_parts(config.credentials.clone(), transport)?;
        Ok(match &config.base_url {
            Some(base_url) => client.with_base_url(base_url.clone()),
            None => client,
        })
    }

    fn from_parts(credentials: Credentials, transport: Arc<dyn Transport>) -> Result<Self, Error> {
        let base_url = Url::parse(DEFAULT_BASE_URL)?;
        Ok(Self {
            credentials,
            base_url,
            transport,
        })
    }

    pub fn with_base_url(mut self, base_url: Url) -> Self {
        self.base_url = base_url;
        self
    }

    /// Replaces the transport, e.g. with a [`RetryTransport`] around the default one.
    pub fn with_transport(mut self, transport: Arc<dyn Transport>) -> Self {
        self.transport = transport;
        self
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url, Error> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| Error::Request(format!("{} cannot be a base URL", self.base_url)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn call<P, R>(&self, segments: &[&str], payload: &P) -> Result<R, Error>
    where
        P: Serialize,
        R: DeserializeOwned,
    {
        let url = self.endpoint(segments)?;
        let body = serde_json::to_string(&ApiRequest {
            credentials: &self.credentials,
            payload,
        })
        .map_err(Error::Serialize)?;

        debug!("POST {}", url.path());
        let response = self.transport.post(url, body).await?;
        debug!("HTTP {} from /{}", response.status, segments.join("/"));

        serde_json::from_str(&response.body).map_err(|source| Error::Decode {
            http_status: response.status,
            source,
        })
    }

    /// Checks the credentials and returns the caller's IP as seen by the API.
    pub async fn ping(&self) -> Result<String, Error> {
        let response: PingResponse = self.call(&["ping"], &NoPayload {}).await?;
        response.status.check()?;
        Ok(response.your_ip)
    }

    /// Creates a record and returns its newly assigned identifier.
    pub async fn create_dns_record(&self, domain: &str, record: &DnsRecord) -> Result<String, Error> {
        let response: CreateDnsRecordResponse =
            self.call(&["dns", "create", domain], record).await?;
        response.status.check()?;
        Ok(response.id)
    }

    /// Fetches one record by identifier.
    ///
    /// An empty record list with a successful status becomes
    /// [`Error::RecordNotFound`].
    pub async fn retrieve_dns_record(&self, domain: &str, id: &str) -> Result<DnsRecord, Error> {
        let response: RetrieveDnsRecordResponse = self
            .call(&["dns", "retrieve", domain, id], &NoPayload {})
            .await?;
        response.status.check()?;
        response
            .records
            .into_iter()
            .next()
            .ok_or_else(|| Error::RecordNotFound {
                domain: domain.to_string(),
                id: id.to_string(),
            })
    }

    /// Sends a partial record; empty fields are left untouched remotely.
    pub async fn edit_dns_record(
        &self,
        domain: &str,
        id: &str,
        record: &DnsRecord,
    ) -> Result<(), Error> {
        let status: Status = self.call(&["dns", "edit", domain, id], record).await?;
        status.check()?;
        Ok(())
    }

    pub async fn delete_dns_record(&self, domain: &str, id: &str) -> Result<(), Error> {
        let status: Status = self
            .call(&["dns", "delete", domain, id], &NoPayload {})
            .await?;
        status.check()?;
        Ok(())
    }

    pub async fn get_nameservers(&self, domain: &str) -> Result<Vec<String>, Error> {
        let response: GetNameserversResponse = self
            .call(&["domain", "getNs", domain], &NoPayload {})
            .await?;
        response.status.check()?;
        Ok(response.ns)
    }

    /// Replaces the whole nameserver list of `domain`.
    pub async fn update_nameservers<S: AsRef<str>>(
        &self,
        domain: &str,
        nameservers: &[S],
    ) -> Result<(), Error> {
        let payload = UpdateNameserversPayload {
            ns: nameservers.iter().map(|ns| ns.as_ref().to_string()).collect(),
        };
        let status: Status = self.call(&["domain", "updateNs", domain], &payload).await?;
        status.check()?;
        Ok(())
    }
}
