use axum::body::Bytes;
use axum::extract::{ConnectInfo, Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::{Json, Router};
use log::warn;
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::net::SocketAddr;

use super::state::{MockState, Store};
use crate::auth::credentials::Credentials;
use crate::core::record::DnsRecord;
use crate::core::status::Status;
use crate::providers::porkbun::types::{
    CreateDnsRecordResponse, GetNameserversResponse, PingResponse, RetrieveDnsRecordResponse,
    UpdateNameserversPayload,
};

pub const DOMAIN_NOT_FOUND: &str = "Domain not found.";
pub const RECORD_NOT_FOUND: &str = "Record not found.";
pub const INVALID_API_KEY: &str = "Invalid API key. (002)";
pub const INVALID_BODY: &str = "Invalid request body.";

pub(crate) fn router(state: MockState) -> Router {
    Router::new()
        .route("/ping", post(ping))
        .route("/domain/getNs/:domain", post(get_nameservers))
        .route("/domain/updateNs/:domain", post(update_nameservers))
        .route("/dns/create/:domain", post(create_dns_record))
        .route("/dns/retrieve/:domain/:id", post(retrieve_dns_record))
        .route("/dns/edit/:domain/:id", post(edit_dns_record))
        .route("/dns/delete/:domain/:id", post(delete_dns_record))
        .with_state(state)
}

fn success<T: Serialize>(body: T) -> Response {
    (StatusCode::OK, Json(body)).into_response()
}

fn failure(message: &str) -> Response {
    (StatusCode::BAD_REQUEST, Json(Status::failure(message))).into_response()
}

fn decode<T: DeserializeOwned>(path: &str, body: &[u8]) -> Option<T> {
    match serde_json::from_slice(body) {
        Ok(value) => Some(value),
        Err(e) => {
            warn!("mock API: failed to decode {path} request: {e}");
            None
        }
    }
}

/// Rejects the request when the store requires credentials the body lacks.
fn authorize(store: &Store, body: &[u8]) -> Result<(), Response> {
    let presented = serde_json::from_slice::<Credentials>(body).ok();
    if store.accepts(presented.as_ref()) {
        Ok(())
    } else {
        Err(failure(INVALID_API_KEY))
    }
}

async fn ping(
    State(state): State<MockState>,
    ConnectInfo(peer): ConnectInfo<SocketAddr>,
    body: Bytes,
) -> Response {
    let store = state.store.read().await;
    if let Err(denied) = authorize(&store, &body) {
        return denied;
    }
    success(PingResponse {
        status: Status::success(),
        your_ip: peer.ip().to_string(),
    })
}

async fn get_nameservers(
    State(state): State<MockState>,
    Path(domain): Path<String>,
    body: Bytes,
) -> Response {
    let store = state.store.read().await;
    if let Err(denied) = authorize(&store, &body) {
        return denied;
    }
    match store.nameservers.get(&domain) {
        Some(ns) => success(GetNameserversResponse {
            status: Status::success(),
            ns: ns.clone(),
        }),
        None => failure(DOMAIN_NOT_FOUND),
    }
}

async fn update_nameservers(
    State(state): State<MockState>,
    Path(domain): Path<String>,
    body: Bytes,
) -> Response {
    let mut store = state.store.write().await;
    if let Err(denied) = authorize(&store, &body) {
        return denied;
    }
    let Some(current) = store.nameservers.get_mut(&domain) else {
        return failure(DOMAIN_NOT_FOUND);
    };
    let Some(payload) = decode::<UpdateNameserversPayload>("updateNs", &body) else {
        return failure(INVALID_BODY);
    };
    *current = payload.ns;
    success(Status::success())
}

async fn create_dns_record(
    State(state): State<MockState>,
    Path(domain): Path<String>,
    body: Bytes,
) -> Response {
    let mut store = state.store.write().await;
    if let Err(denied) = authorize(&store, &body) {
        return denied;
    }
    let Some(mut record) = decode::<DnsRecord>("dns/create", &body) else {
        return failure(INVALID_BODY);
    };

    record.id = store.next_id(&domain, &record);
    if record.name.is_empty() {
        record.name = domain.clone();
    }
    let id = record.id.clone();
    store.dns_records.entry(domain).or_default().push(record);

    success(CreateDnsRecordResponse {
        status: Status::success(),
        id,
    })
}

async fn retrieve_dns_record(
    State(state): State<MockState>,
    Path((domain, id)): Path<(String, String)>,
    body: Bytes,
) -> Response {
    let store = state.store.read().await;
    if let Err(denied) = authorize(&store, &body) {
        return denied;
    }
    match store.record(&domain, &id) {
        Some(record) => success(RetrieveDnsRecordResponse {
            status: Status::success(),
            records: vec![record.clone()],
        }),
        None => failure(RECORD_NOT_FOUND),
    }
}

async fn edit_dns_record(
    State(state): State<MockState>,
    Path((domain, id)): Path<(String, String)>,
    body: Bytes,
) -> Response {
    let mut store = state.store.write().await;
    if let Err(denied) = authorize(&store, &body) {
        return denied;
    }
    let Some(mut update) = decode::<DnsRecord>("dns/edit", &body) else {
        return failure(RECORD_NOT_FOUND);
    };
    // The path addresses the record; an id in the body must not move it.
    update.id.clear();

    match store.record_mut(&domain, &id) {
        Some(record) => {
            *record = record.merge(&update);
            success(Status::success())
        }
        None => failure(RECORD_NOT_FOUND),
    }
}

async fn delete_dns_record(
    State(state): State<MockState>,
    Path((domain, id)): Path<(String, String)>,
    body: Bytes,
) -> Response {
    let mut store = state.store.write().await;
    if let Err(denied) = authorize(&store, &body) {
        return denied;
    }
    match store.remove_record(&domain, &id) {
        Some(_) => success(Status::success()),
        None => failure(RECORD_NOT_FOUND),
    }
}
