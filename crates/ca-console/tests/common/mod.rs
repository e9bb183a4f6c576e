//! Shared helpers for the console integration tests

#![allow(dead_code)]

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use ca_config::ApiConfig;
use ca_console::session::MemorySessionStore;
use ca_console::{AdminClient, Role, SessionStore};
use chrono::Utc;
use std::sync::Arc;
use wiremock::MockServer;

/// Unsigned token that expires `offset_secs` from now
pub fn token_expiring_in(offset_secs: i64) -> String {
    let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"HS256","typ":"JWT"}"#);
    let claims = serde_json::json!({ "sub": "user-1", "exp": Utc::now().timestamp() + offset_secs });
    let payload = URL_SAFE_NO_PAD.encode(claims.to_string());
    format!("{header}.{payload}.signature")
}

pub fn live_token() -> String {
    token_expiring_in(3600)
}

pub fn api_config(server: &MockServer) -> ApiConfig {
    let addr = server.address();
    ApiConfig {
        host: format!("http://{}", addr.ip()),
        port: addr.port(),
        timeout_secs: 5,
        ..ApiConfig::default()
    }
}

/// Client against `server` with a fresh in-memory store
pub fn client_with_store(server: &MockServer) -> (AdminClient, Arc<MemorySessionStore>) {
    let store = Arc::new(MemorySessionStore::new());
    let dyn_store: Arc<dyn SessionStore> = store.clone();
    let client = AdminClient::new(&api_config(server), dyn_store).unwrap();
    (client, store)
}

/// Client already signed in as `role` with a live token
pub fn signed_in(server: &MockServer, role: Role) -> (AdminClient, Arc<MemorySessionStore>, String) {
    let (client, store) = client_with_store(server);
    let token = live_token();
    store.set(role, &token).unwrap();
    (client, store, token)
}
