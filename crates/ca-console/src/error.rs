//! Error types for the console

use crate::session::Role;
use crate::validation::FormErrors;
use thiserror::Error;

/// Result type alias for console operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for the console
#[derive(Error, Debug)]
pub enum Error {
    /// Session missing, expired or rejected by the backend (401/403)
    #[error("Session expired for {role}, sign in again at {redirect_to}")]
    SessionExpired {
        role: Role,
        redirect_to: &'static str,
    },

    /// Backend rejected the request with a validation or business-rule message
    #[error("Rejected: {0}")]
    Rejected(FormErrors),

    /// Input failed client-side validation before any request was sent
    #[error("Invalid input: {0}")]
    Validation(FormErrors),

    /// Resource not found (404)
    #[error("Not found: {0}")]
    NotFound(String),

    /// Server error (5xx)
    #[error("Server error: {0}")]
    Server(String),

    /// Request never produced a response
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Response body could not be decoded
    #[error("Decode error: {0}")]
    Decode(#[from] serde_json::Error),

    /// Session store could not be read or written
    #[error("Session storage error: {0}")]
    Storage(#[from] std::io::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] ca_config::ConfigError),
}

impl Error {
    /// Session errors are handled by redirecting, never by an in-page banner
    pub fn is_session_error(&self) -> bool {
        matches!(self, Error::SessionExpired { .. })
    }

    /// Route the front-end should navigate to, if any
    pub fn redirect_to(&self) -> Option<&'static str> {
        match self {
            Error::SessionExpired { redirect_to, .. } => Some(redirect_to),
            _ => None,
        }
    }

    /// Per-field messages carried by validation and rejection errors
    pub fn form_errors(&self) -> Option<&FormErrors> {
        match self {
            Error::Rejected(errors) | Error::Validation(errors) => Some(errors),
            _ => None,
        }
    }

    /// Create an error from a failed response's status and decoded errors
    ///
    /// Anything that is neither 404 nor 5xx is the backend rejecting the
    /// request, including `success: false` on a 2xx.
    pub fn from_status(status: reqwest::StatusCode, errors: FormErrors) -> Self {
        match status.as_u16() {
            404 => Error::NotFound(errors.to_string()),
            500..=599 => Error::Server(errors.to_string()),
            _ => Error::Rejected(errors),
        }
    }

    /// Banner text for screens that surface failures inline
    pub fn banner(&self) -> String {
        match self {
            Error::Rejected(errors) | Error::Validation(errors) => errors.to_string(),
            Error::Network(_) => "Unable to reach the server. Check your connection and retry.".into(),
            other => other.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_status_mapping() {
        use reqwest::StatusCode;

        assert!(matches!(
            Error::from_status(StatusCode::NOT_FOUND, FormErrors::banner("gone")),
            Error::NotFound(ref m) if m == "gone"
        ));
        assert!(matches!(
            Error::from_status(StatusCode::BAD_GATEWAY, FormErrors::banner("upstream")),
            Error::Server(_)
        ));

        let mut errors = FormErrors::new();
        errors.add("email", "Email already registered");
        let err = Error::from_status(StatusCode::CONFLICT, errors);
        assert_eq!(err.form_errors().unwrap().field("email"), Some("Email already registered"));

        let err = Error::from_status(StatusCode::OK, FormErrors::banner("Commission locked"));
        assert!(matches!(err, Error::Rejected(_)));
    }

    #[test]
    fn test_session_error_carries_redirect() {
        let err = Error::SessionExpired {
            role: Role::Affiliate,
            redirect_to: Role::Affiliate.login_route(),
        };
        assert!(err.is_session_error());
        assert_eq!(err.redirect_to(), Some("/affiliate/login"));
        assert!(err.form_errors().is_none());
    }
}
