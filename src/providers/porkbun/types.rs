//! Request and response envelopes for each endpoint.
//!
//! Requests are the credential pair flattened together with an
//! operation-specific payload. Responses are the `Status` flattened together
//! with whatever extra fields the endpoint returns. The mock server encodes
//! the same response types.

use serde::{Deserialize, Serialize};

use crate::auth::credentials::Credentials;
use crate::core::record::{DnsRecord, lenient_string};
use crate::core::status::Status;

#[derive(Serialize)]
pub(crate) struct ApiRequest<'a, P: Serialize> {
    #[serde(flatten)]
    pub credentials: &'a Credentials,
    #[serde(flatten)]
    pub payload: &'a P,
}

/// Payload for endpoints that take nothing besides the credentials.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct NoPayload {}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateNameserversPayload {
    pub ns: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PingResponse {
    #[serde(flatten)]
    pub status: Status,
    #[serde(rename = "yourIp", default)]
    pub your_ip: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GetNameserversResponse {
    #[serde(flatten)]
    pub status: Status,
    #[serde(default)]
    pub ns: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateDnsRecordResponse {
    #[serde(flatten)]
    pub status: Status,
    #[serde(default, deserialize_with = "lenient_string")]
    pub id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetrieveDnsRecordResponse {
    #[serde(flatten)]
    pub status: Status,
    #[serde(default)]
    pub records: Vec<DnsRecord>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_request_flattens_credentials_and_payload() {
        let credentials = Credentials::new("pk1_abc", "sk1_def");
        let record = DnsRecord {
            name: "www".into(),
            record_type: "A".into(),
            content: "1.2.3.4".into(),
            ..Default::default()
        };
        let body = serde_json::to_value(ApiRequest {
            credentials: &credentials,
            payload: &record,
        })
        .unwrap();
        assert_eq!(
            body,
            json!({
                "apikey": "pk1_abc",
                "secretapikey": "sk1_def",
                "name": "www",
                "type": "A",
                "content": "1.2.3.4",
            })
        );
    }

    #[test]
    fn test_request_without_payload_is_just_credentials() {
        let credentials = Credentials::new("pk1_abc", "sk1_def");
        let body = serde_json::to_value(ApiRequest {
            credentials: &credentials,
            payload: &NoPayload {},
        })
        .unwrap();
        assert_eq!(body, json!({ "apikey": "pk1_abc", "secretapikey": "sk1_def" }));
    }

    #[test]
    fn test_create_response_accepts_numeric_id() {
        let response: CreateDnsRecordResponse =
            serde_json::from_str(r#"{"status":"SUCCESS","id":106926652}"#).unwrap();
        assert!(!response.status.has_failed());
        assert_eq!(response.id, "106926652");
    }

    #[test]
    fn test_failed_response_without_extra_fields() {
        let response: RetrieveDnsRecordResponse =
            serde_json::from_str(r#"{"status":"ERROR","message":"Record not found."}"#).unwrap();
        assert!(response.status.has_failed());
        assert!(response.records.is_empty());
    }
}
