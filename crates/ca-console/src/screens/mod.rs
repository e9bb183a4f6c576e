//! Console screens.
//!
//! Listing screens are [`ListingScreen`] instances configured by a
//! [`ScreenSpec`]; the remaining modules wrap single-form backend calls.

pub mod affiliates;
pub mod auth;
pub mod banners;
pub mod earnings;
pub mod fees;
pub mod kyc;
mod listing;
pub mod payouts;
pub mod players;
pub mod referrals;
pub mod transactions;

pub use listing::{ListingScreen, LoadOutcome, ScreenSpec, ScreenStatus, ScreenView};

use crate::error::Error;
use crate::validation::FormErrors;
use serde::{Deserialize, Serialize};

/// Account status shared by players and affiliates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccountStatus {
    Active,
    Inactive,
    Blocked,
}

impl AccountStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AccountStatus::Active => "active",
            AccountStatus::Inactive => "inactive",
            AccountStatus::Blocked => "blocked",
        }
    }
}

impl std::fmt::Display for AccountStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for AccountStatus {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "active" => Ok(AccountStatus::Active),
            "inactive" => Ok(AccountStatus::Inactive),
            "blocked" => Ok(AccountStatus::Blocked),
            other => {
                let mut errors = FormErrors::new();
                errors.add("status", format!("Unknown status '{}'", other));
                Err(Error::Validation(errors))
            }
        }
    }
}

/// Backend numbers sometimes arrive as strings (`"125.50"`)
pub(crate) mod string_or_number {
    use serde::{de, Deserialize, Deserializer};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum StringOrNum {
        Num(f64),
        Str(String),
    }

    pub fn deserialize_f64<'de, D>(deserializer: D) -> Result<f64, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Option::<StringOrNum>::deserialize(deserializer)? {
            Some(StringOrNum::Num(n)) => Ok(n),
            Some(StringOrNum::Str(s)) if s.trim().is_empty() => Ok(0.0),
            Some(StringOrNum::Str(s)) => s.trim().parse().map_err(de::Error::custom),
            None => Ok(0.0),
        }
    }

    /// Like [`deserialize_f64`] but keeps an absent or null value as `None`
    pub fn deserialize_opt_f64<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Option::<StringOrNum>::deserialize(deserializer)? {
            Some(StringOrNum::Num(n)) => Ok(Some(n)),
            Some(StringOrNum::Str(s)) if s.trim().is_empty() => Ok(None),
            Some(StringOrNum::Str(s)) => s.trim().parse().map(Some).map_err(de::Error::custom),
            None => Ok(None),
        }
    }

    /// Counts; negative or fractional values are clamped to whole numbers
    pub fn deserialize_u64<'de, D>(deserializer: D) -> Result<u64, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserialize_f64(deserializer).map(to_count)
    }

    pub fn deserialize_opt_u64<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserialize_opt_f64(deserializer).map(|n| n.map(to_count))
    }

    fn to_count(n: f64) -> u64 {
        if n.is_finite() && n > 0.0 {
            n.trunc() as u64
        } else {
            0
        }
    }
}

/// User reference some endpoints embed instead of flat fields
///
/// Arrives either expanded into an object or as the bare id string.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(from = "UserRefRepr")]
pub(crate) struct UserRefDto {
    pub id: String,
    pub username: String,
    pub full_name: String,
    pub email: String,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum UserRefRepr {
    Id(String),
    Expanded(ExpandedUserRef),
    Missing(()),
}

#[derive(Default, Deserialize)]
#[serde(default)]
struct ExpandedUserRef {
    #[serde(rename = "_id", alias = "id")]
    id: String,
    username: String,
    #[serde(rename = "fullName", alias = "fullname", alias = "full_name")]
    full_name: String,
    email: String,
}

impl From<UserRefRepr> for UserRefDto {
    fn from(repr: UserRefRepr) -> Self {
        match repr {
            UserRefRepr::Id(id) => Self {
                id,
                ..Self::default()
            },
            UserRefRepr::Expanded(user) => Self {
                id: user.id,
                username: user.username,
                full_name: user.full_name,
                email: user.email,
            },
            UserRefRepr::Missing(()) => Self::default(),
        }
    }
}
