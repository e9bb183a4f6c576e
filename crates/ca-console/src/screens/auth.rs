//! Sign-in, affiliate registration and sign-out.
//!
//! A successful login stores the returned token under the role's key; the
//! guard and every later request read it from there.

use crate::api::AdminClient;
use crate::error::{Error, Result};
use crate::session::{GuardDecision, Role};
use crate::token::{self, Lifetime};
use crate::validation::{self, FormErrors};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

#[derive(Debug, Deserialize)]
struct TokenPayload {
    #[serde(alias = "accessToken", alias = "access_token")]
    token: String,
}

#[derive(Serialize)]
struct Credentials<'a> {
    email: &'a str,
    password: &'a str,
}

/// Where the caller should navigate after a login attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginOutcome {
    SignedIn { redirect_to: &'static str, message: Option<String> },
    /// A valid session already existed; no request was sent
    AlreadySignedIn { redirect_to: &'static str },
}

/// Affiliate self-registration form
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistrationForm {
    pub username: String,
    pub full_name: String,
    pub email: String,
    pub password: String,
    pub promotion_methods: Vec<String>,
}

impl RegistrationForm {
    /// Errors are keyed by the serialized field names, the same keys the
    /// backend uses in its `errors[].param`
    pub fn validate(&self) -> std::result::Result<(), FormErrors> {
        let mut errors = FormErrors::new();
        validation::check_required(&mut errors, "username", &self.username);
        validation::check_required(&mut errors, "fullName", &self.full_name);
        validation::check_email(&mut errors, "email", &self.email);
        validation::check_password(&mut errors, "password", &self.password);
        if self.promotion_methods.iter().all(|m| m.trim().is_empty()) {
            errors.add("promotionMethods", "Select at least one promotion method");
        }
        errors.into_result()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionStatus {
    pub role: Role,
    pub signed_in: bool,
    pub remaining: Option<Lifetime>,
}

fn login_endpoint(role: Role) -> &'static str {
    match role {
        Role::Admin => "/api/admin/login",
        Role::Affiliate => "/api/affiliate/login",
    }
}

const REGISTER_ENDPOINT: &str = "/api/affiliate/register";

#[derive(Debug, Clone)]
pub struct AuthService {
    client: AdminClient,
}

impl AuthService {
    pub fn new(client: AdminClient) -> Self {
        Self { client }
    }

    pub async fn login(&self, role: Role, email: &str, password: &str) -> Result<LoginOutcome> {
        if let GuardDecision::Redirect { to } = self.client.guard().public_only(role) {
            return Ok(LoginOutcome::AlreadySignedIn { redirect_to: to });
        }
        validation::validate_login(email, password).map_err(Error::Validation)?;

        let reply = self
            .client
            .post_public::<TokenPayload, _>(login_endpoint(role), &Credentials { email, password })
            .await?;

        let token = reply.data.token;
        if !token::is_valid(Some(&token)) {
            warn!(%role, "Backend issued a token that is malformed or already expired");
            return Err(Error::Rejected(FormErrors::banner(
                "Login failed: the server returned an unusable token",
            )));
        }

        self.client.store().set(role, &token)?;
        info!(%role, "Signed in");
        Ok(LoginOutcome::SignedIn {
            redirect_to: role.home_route(),
            message: reply.message,
        })
    }

    /// Register a new affiliate account; the account still has to sign in
    pub async fn register(&self, form: &RegistrationForm) -> Result<Option<String>> {
        form.validate().map_err(Error::Validation)?;
        let reply = self
            .client
            .post_public::<serde_json::Value, _>(REGISTER_ENDPOINT, form)
            .await?;
        info!(username = %form.username, "Affiliate registered");
        Ok(reply.message)
    }

    pub fn logout(&self, role: Role) -> Result<&'static str> {
        self.client.store().clear(role)?;
        info!(%role, "Signed out");
        Ok(role.login_route())
    }

    pub fn status(&self, role: Role) -> SessionStatus {
        self.status_at(role, Utc::now())
    }

    pub fn status_at(&self, role: Role, now: DateTime<Utc>) -> SessionStatus {
        let stored = self.client.store().get(role);
        let signed_in = token::is_valid_at(stored.as_deref(), now);
        let remaining = stored
            .as_deref()
            .filter(|_| signed_in)
            .and_then(|t| token::remaining_lifetime_at(t, now));
        SessionStatus { role, signed_in, remaining }
    }
}
