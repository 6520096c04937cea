//! In-process fake of the Porkbun API.
//!
//! Serves the same endpoints and JSON shapes as the real service from
//! in-memory maps, so the client can be exercised end to end without
//! network access. Each server owns its own state; it is empty on start and
//! gone once the server is closed or dropped.
//!
//! ```no_run
//! # async fn demo() -> Result<(), Box<dyn std::error::Error>> {
//! use porkbun_dns::MockApiServer;
//!
//! let server = MockApiServer::start().await?;
//! server.set_nameservers("example.com", ["ns1.example"]).await;
//!
//! let client = server.client("pk1_test", "sk1_test")?;
//! assert_eq!(client.get_nameservers("example.com").await?, vec!["ns1.example"]);
//!
//! server.close().await;
//! # Ok(())
//! # }
//! ```

mod handlers;
mod state;

pub use handlers::{DOMAIN_NOT_FOUND, INVALID_API_KEY, INVALID_BODY, RECORD_NOT_FOUND};
pub use state::IdGenerator;

use log::{error, info};
use reqwest::Url;
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;

use crate::auth::credentials::Credentials;
use crate::core::record::DnsRecord;
use crate::error::Error;
use crate::providers::porkbun::PorkbunClient;
use state::MockState;

pub struct MockApiServer {
    addr: SocketAddr,
    state: MockState,
    shutdown_tx: Option<oneshot::Sender<()>>,
    task: Option<JoinHandle<()>>,
}

impl MockApiServer {
    /// Binds an ephemeral port on localhost and starts serving.
    pub async fn start() -> std::io::Result<Self> {
        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        let state = MockState::default();
        let app = handlers::router(state.clone());

        let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();
        let task = tokio::spawn(async move {
            let server = axum::serve(
                listener,
                app.into_make_service_with_connect_info::<SocketAddr>(),
            )
            .with_graceful_shutdown(async move {
                let _ = shutdown_rx.await;
            });
            if let Err(err) = server.await {
                error!("mock API server on {addr} failed: {err}");
            }
        });
        info!("mock API server listening on {addr}");

        Ok(Self {
            addr,
            state,
            shutdown_tx: Some(shutdown_tx),
            task: Some(task),
        })
    }

    /// Base URL to hand to [`PorkbunClient::with_base_url`].
    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// A client already pointed at this server.
    pub fn client(
        &self,
        api_key: impl Into<String>,
        secret_api_key: impl Into<String>,
    ) -> Result<PorkbunClient, Error> {
        let base_url = Url::parse(&self.url())?;
        Ok(PorkbunClient::new(api_key, secret_api_key)?.with_base_url(base_url))
    }

    /// Registers `domain` with the given nameservers. Unregistered domains
    /// fail both nameserver endpoints.
    pub async fn set_nameservers<I, S>(&self, domain: &str, nameservers: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let nameservers = nameservers.into_iter().map(Into::into).collect();
        self.state
            .store
            .write()
            .await
            .nameservers
            .insert(domain.to_string(), nameservers);
    }

    pub async fn set_dns_records(&self, domain: &str, records: Vec<DnsRecord>) {
        self.state
            .store
            .write()
            .await
            .dns_records
            .insert(domain.to_string(), records);
    }

    pub async fn nameservers(&self, domain: &str) -> Option<Vec<String>> {
        self.state.store.read().await.nameservers.get(domain).cloned()
    }

    pub async fn dns_records(&self, domain: &str) -> Vec<DnsRecord> {
        self.state
            .store
            .read()
            .await
            .dns_records
            .get(domain)
            .cloned()
            .unwrap_or_default()
    }

    /// From now on, reject requests that don't carry exactly these credentials.
    pub async fn require_credentials(&self, credentials: Credentials) {
        self.state.store.write().await.credentials = Some(credentials);
    }

    /// Replaces the policy that assigns identifiers to created records.
    pub async fn set_id_generator<F>(&self, generator: F)
    where
        F: FnMut(&str, &DnsRecord) -> String + Send + Sync + 'static,
    {
        self.state.store.write().await.id_generator = Box::new(generator);
    }

    /// Stops accepting connections and waits for the server task to finish.
    pub async fn close(mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
        if let Some(task) = self.task.take() {
            if let Err(err) = task.await {
                error!("mock API server task on {} panicked: {err}", self.addr);
            }
        }
        info!("mock API server on {} closed", self.addr);
    }
}

impl Drop for MockApiServer {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}
