//! Form error collection and client-side input checks.
//!
//! The backend re-validates everything; these checks only spare a round trip
//! for input that is certain to be rejected.

use regex::Regex;
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::OnceLock;

/// Upper bound of an affiliate commission, in percent
pub const MAX_COMMISSION_PERCENT: f64 = 4.0;

/// Upper bound of the platform fee, in percent
pub const MAX_PLATFORM_FEE_PERCENT: f64 = 100.0;

pub const MIN_PASSWORD_LEN: usize = 8;

/// Field-level messages plus an optional page-level banner
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FormErrors {
    pub fields: BTreeMap<String, String>,
    pub banner: Option<String>,
}

impl FormErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn banner(message: impl Into<String>) -> Self {
        Self {
            fields: BTreeMap::new(),
            banner: Some(message.into()),
        }
    }

    /// Record a message for `field`; the first message per field wins
    pub fn add(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.fields.entry(field.into()).or_insert_with(|| message.into());
    }

    /// Append a page-level message
    pub fn add_banner(&mut self, message: impl Into<String>) {
        let message = message.into();
        self.banner = Some(match self.banner.take() {
            Some(existing) => format!("{existing}; {message}"),
            None => message,
        });
    }

    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty() && self.banner.is_none()
    }

    /// `Ok(())` when nothing was recorded
    pub fn into_result(self) -> Result<(), FormErrors> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

impl std::fmt::Display for FormErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut parts: Vec<String> = Vec::new();
        if let Some(banner) = &self.banner {
            parts.push(banner.clone());
        }
        parts.extend(self.fields.iter().map(|(field, msg)| format!("{field}: {msg}")));
        if parts.is_empty() {
            write!(f, "request rejected")
        } else {
            write!(f, "{}", parts.join("; "))
        }
    }
}

fn email_regex() -> &'static Regex {
    static EMAIL: OnceLock<Regex> = OnceLock::new();
    EMAIL.get_or_init(|| {
        Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern is valid")
    })
}

pub fn check_email(errors: &mut FormErrors, field: &str, email: &str) {
    if email.trim().is_empty() {
        errors.add(field, "Email is required");
    } else if !email_regex().is_match(email.trim()) {
        errors.add(field, "Enter a valid email address");
    }
}

/// At least eight characters with upper case, lower case and a digit
pub fn check_password(errors: &mut FormErrors, field: &str, password: &str) {
    if password.is_empty() {
        errors.add(field, "Password is required");
    } else if password.chars().count() < MIN_PASSWORD_LEN {
        errors.add(field, format!("Password must be at least {MIN_PASSWORD_LEN} characters"));
    } else if !password.chars().any(|c| c.is_ascii_uppercase())
        || !password.chars().any(|c| c.is_ascii_lowercase())
        || !password.chars().any(|c| c.is_ascii_digit())
    {
        errors.add(
            field,
            "Password must contain an upper case letter, a lower case letter and a digit",
        );
    }
}

pub fn check_required(errors: &mut FormErrors, field: &str, value: &str) {
    if value.trim().is_empty() {
        errors.add(field, "This field is required");
    }
}

pub fn check_percent(errors: &mut FormErrors, field: &str, value: f64, max: f64) {
    if !value.is_finite() || !(0.0..=max).contains(&value) {
        errors.add(field, format!("Must be between 0 and {max}%"));
    }
}

pub fn check_positive_amount(errors: &mut FormErrors, field: &str, amount: f64) {
    if !amount.is_finite() || amount <= 0.0 {
        errors.add(field, "Amount must be greater than zero");
    }
}

pub fn validate_login(email: &str, password: &str) -> Result<(), FormErrors> {
    let mut errors = FormErrors::new();
    check_email(&mut errors, "email", email);
    if password.is_empty() {
        errors.add("password", "Password is required");
    }
    errors.into_result()
}

pub fn validate_commission(rate_percent: f64) -> Result<(), FormErrors> {
    let mut errors = FormErrors::new();
    check_percent(&mut errors, "commission", rate_percent, MAX_COMMISSION_PERCENT);
    errors.into_result()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_commission_bounds() {
        assert!(validate_commission(0.0).is_ok());
        assert!(validate_commission(4.0).is_ok());
        assert!(validate_commission(4.01).is_err());
        assert!(validate_commission(-0.5).is_err());
        assert!(validate_commission(f64::NAN).is_err());
    }

    #[test]
    fn test_login_collects_field_errors() {
        let errors = validate_login("not-an-email", "").unwrap_err();
        assert_eq!(errors.field("email"), Some("Enter a valid email address"));
        assert_eq!(errors.field("password"), Some("Password is required"));
        assert!(errors.banner.is_none());
    }

    #[test]
    fn test_password_policy() {
        let check = |pw: &str| {
            let mut errors = FormErrors::new();
            check_password(&mut errors, "password", pw);
            errors.is_empty()
        };
        assert!(check("Secret123"));
        assert!(!check("Sec1"));
        assert!(!check("secret123"));
        assert!(!check("SECRETSECRET"));
    }

    #[test]
    fn test_first_message_per_field_wins() {
        let mut errors = FormErrors::new();
        errors.add("amount", "first");
        errors.add("amount", "second");
        errors.add_banner("one");
        errors.add_banner("two");
        assert_eq!(errors.field("amount"), Some("first"));
        assert_eq!(errors.to_string(), "one; two; amount: first");
    }
}
