//! Session handling: roles, persisted bearer tokens and route guards.

mod guard;
mod store;

pub use guard::{GuardDecision, SessionGuard};
pub use store::{FileSessionStore, MemorySessionStore, SessionStore};

use serde::{Deserialize, Serialize};

/// The two kinds of signed-in user the console serves
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Affiliate,
}

impl Role {
    /// Key the role's token is persisted under
    pub fn storage_key(&self) -> &'static str {
        match self {
            Role::Admin => "admin_token",
            Role::Affiliate => "affiliate_token",
        }
    }

    pub fn login_route(&self) -> &'static str {
        match self {
            Role::Admin => "/login",
            Role::Affiliate => "/affiliate/login",
        }
    }

    pub fn home_route(&self) -> &'static str {
        match self {
            Role::Admin => "/dashboard",
            Role::Affiliate => "/affiliate/dashboard",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Role::Admin => write!(f, "admin"),
            Role::Affiliate => write!(f, "affiliate"),
        }
    }
}

impl std::str::FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "admin" => Ok(Role::Admin),
            "affiliate" => Ok(Role::Affiliate),
            other => Err(format!("unknown role '{}', expected admin or affiliate", other)),
        }
    }
}
