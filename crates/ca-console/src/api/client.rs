//! Backend REST client
//!
//! Attaches the role's bearer token, turns 401/403 into session
//! invalidation and normalizes every body through [`decode_envelope`].
//! Network failures are returned as-is; nothing is retried.

use super::envelope::{decode_envelope, Envelope};
use crate::error::{Error, Result};
use crate::session::{FileSessionStore, Role, SessionGuard, SessionStore};
use ca_config::{ApiConfig, AppConfig};
use reqwest::{Method, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

/// Successful payload with the backend's optional message
#[derive(Debug, Clone, PartialEq)]
pub struct Reply<T> {
    pub data: T,
    pub message: Option<String>,
}

/// Casino backend API client
#[derive(Clone)]
pub struct AdminClient {
    base_url: Arc<str>,
    http: reqwest::Client,
    guard: SessionGuard,
}

impl AdminClient {
    /// Create a client for `config` whose sessions live in `store`
    pub fn new(config: &ApiConfig, store: Arc<dyn SessionStore>) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs.max(1)))
            .user_agent(&config.user_agent)
            .build()?;

        Ok(Self {
            base_url: config.base_url().into(),
            http,
            guard: SessionGuard::new(store),
        })
    }

    /// Create a client with the file-backed session store named by `config`
    pub fn from_config(config: &AppConfig) -> Result<Self> {
        let store = FileSessionStore::open(&config.session.store_path)?;
        Self::new(&config.api, Arc::new(store))
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn guard(&self) -> &SessionGuard {
        &self.guard
    }

    pub fn store(&self) -> &Arc<dyn SessionStore> {
        self.guard.store()
    }

    /// Request builder for `path`, authenticated as `role` when given
    pub fn request(&self, method: Method, path: &str, role: Option<Role>) -> Result<RequestBuilder> {
        let url = format!("{}{}", self.base_url, path);
        let builder = self.http.request(method, url);
        match role {
            Some(role) => Ok(builder.bearer_auth(self.guard.authorize(role)?)),
            None => Ok(builder),
        }
    }

    /// Send a prepared request and decode its envelope
    pub async fn execute<T: DeserializeOwned>(
        &self,
        role: Option<Role>,
        builder: RequestBuilder,
    ) -> Result<Reply<T>> {
        let response = builder.send().await.map_err(|e| {
            warn!(error = %e, "Request did not reach the backend");
            Error::Network(e)
        })?;

        let status = response.status();
        let url = response.url().path().to_string();
        debug!(%status, path = %url, "Backend responded");

        if let Some(role) = role {
            if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
                warn!(%role, %status, path = %url, "Backend rejected session");
                return Err(self.guard.invalidate(role));
            }
        }

        let body = response.bytes().await?;
        match decode_envelope::<T>(status, &body)? {
            Envelope::Ok { data, message } => Ok(Reply { data, message }),
            Envelope::Err(errors) => Err(Error::from_status(status, errors)),
        }
    }

    pub async fn get<T: DeserializeOwned>(&self, role: Role, path: &str) -> Result<T> {
        let builder = self.request(Method::GET, path, Some(role))?;
        Ok(self.execute(Some(role), builder).await?.data)
    }

    pub async fn get_query<T, Q>(&self, role: Role, path: &str, query: &Q) -> Result<T>
    where
        T: DeserializeOwned,
        Q: Serialize + ?Sized,
    {
        let builder = self.request(Method::GET, path, Some(role))?.query(query);
        Ok(self.execute(Some(role), builder).await?.data)
    }

    /// Authenticated call with a JSON body, returning the full reply
    pub async fn send_json<T, B>(
        &self,
        method: Method,
        role: Role,
        path: &str,
        body: &B,
    ) -> Result<Reply<T>>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let builder = self.request(method, path, Some(role))?.json(body);
        self.execute(Some(role), builder).await
    }

    pub async fn post<T, B>(&self, role: Role, path: &str, body: &B) -> Result<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        Ok(self.send_json(Method::POST, role, path, body).await?.data)
    }

    /// Mutation whose only interesting output is the backend's message
    pub async fn command<B>(&self, method: Method, role: Role, path: &str, body: &B) -> Result<Option<String>>
    where
        B: Serialize + ?Sized,
    {
        let reply: Reply<serde_json::Value> = self.send_json(method, role, path, body).await?;
        Ok(reply.message)
    }

    pub async fn delete(&self, role: Role, path: &str) -> Result<Option<String>> {
        let builder = self.request(Method::DELETE, path, Some(role))?;
        let reply: Reply<serde_json::Value> = self.execute(Some(role), builder).await?;
        Ok(reply.message)
    }

    /// Unauthenticated call used by the login and registration forms
    pub async fn post_public<T, B>(&self, path: &str, body: &B) -> Result<Reply<T>>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let builder = self.request(Method::POST, path, None)?.json(body);
        self.execute(None, builder).await
    }
}

impl std::fmt::Debug for AdminClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdminClient")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}
