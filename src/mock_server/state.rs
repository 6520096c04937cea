use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::auth::credentials::Credentials;
use crate::core::record::DnsRecord;

/// Assigns the identifier of a newly created record.
pub type IdGenerator = Box<dyn FnMut(&str, &DnsRecord) -> String + Send + Sync>;

const FIRST_ID: u64 = 100_000_000;

fn sequential_ids() -> IdGenerator {
    let mut next = FIRST_ID;
    Box::new(move |_, _| {
        next += 1;
        next.to_string()
    })
}

/// Everything the fake API knows about. Handlers hold the lock for the whole
/// request, so operations on one domain never interleave.
pub(crate) struct Store {
    pub nameservers: HashMap<String, Vec<String>>,
    pub dns_records: HashMap<String, Vec<DnsRecord>>,
    pub credentials: Option<Credentials>,
    pub id_generator: IdGenerator,
}

impl Default for Store {
    fn default() -> Self {
        Self {
            nameservers: HashMap::new(),
            dns_records: HashMap::new(),
            credentials: None,
            id_generator: sequential_ids(),
        }
    }
}

impl Store {
    pub fn next_id(&mut self, domain: &str, record: &DnsRecord) -> String {
        (self.id_generator)(domain, record)
    }

    pub fn record(&self, domain: &str, id: &str) -> Option<&DnsRecord> {
        self.dns_records.get(domain)?.iter().find(|r| r.id == id)
    }

    pub fn record_mut(&mut self, domain: &str, id: &str) -> Option<&mut DnsRecord> {
        self.dns_records.get_mut(domain)?.iter_mut().find(|r| r.id == id)
    }

    pub fn remove_record(&mut self, domain: &str, id: &str) -> Option<DnsRecord> {
        let records = self.dns_records.get_mut(domain)?;
        let index = records.iter().position(|r| r.id == id)?;
        Some(records.remove(index))
    }

    /// Whether a request carrying `presented` passes the credential check.
    pub fn accepts(&self, presented: Option<&Credentials>) -> bool {
        match &self.credentials {
            None => true,
            Some(expected) => presented == Some(expected),
        }
    }
}

#[derive(Clone, Default)]
pub(crate) struct MockState {
    pub store: Arc<RwLock<Store>>,
}
