//! Users referred by the signed-in affiliate.

use super::listing::{ListingScreen, ScreenSpec};
use super::string_or_number;
use crate::session::Role;
use crate::table::{FieldValue, Order, Record};
use chrono::{DateTime, Utc};
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReferredUserDto {
    #[serde(rename = "_id", alias = "id")]
    pub id: String,
    #[serde(default)]
    pub username: String,
    #[serde(default, alias = "fullname")]
    pub full_name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default, deserialize_with = "string_or_number::deserialize_f64")]
    pub total_deposits: f64,
    #[serde(default, deserialize_with = "string_or_number::deserialize_f64")]
    pub commission_earned: f64,
    #[serde(default)]
    pub joined_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReferredUser {
    pub id: String,
    pub username: String,
    pub full_name: String,
    pub email: String,
    pub status: String,
    pub total_deposits: f64,
    pub commission_earned: f64,
    pub joined_at: Option<DateTime<Utc>>,
}

impl From<ReferredUserDto> for ReferredUser {
    fn from(dto: ReferredUserDto) -> Self {
        Self {
            id: dto.id,
            username: dto.username,
            full_name: dto.full_name,
            email: dto.email,
            status: dto
                .status
                .map(|s| s.to_ascii_lowercase())
                .unwrap_or_else(|| "active".to_string()),
            total_deposits: dto.total_deposits,
            commission_earned: dto.commission_earned,
            joined_at: dto.joined_at.or(dto.created_at),
        }
    }
}

impl Record for ReferredUser {
    fn id(&self) -> &str {
        &self.id
    }

    fn field(&self, name: &str) -> Option<FieldValue> {
        match name {
            "id" => Some(self.id.as_str().into()),
            "username" => Some(self.username.as_str().into()),
            "full_name" => Some(self.full_name.as_str().into()),
            "email" => Some(self.email.as_str().into()),
            "status" => Some(self.status.as_str().into()),
            "total_deposits" => Some(self.total_deposits.into()),
            "commission_earned" => Some(self.commission_earned.into()),
            "joined_at" => self.joined_at.map(FieldValue::Timestamp),
            _ => None,
        }
    }

    fn search_fields() -> &'static [&'static str] {
        &["username", "full_name", "email"]
    }
}

pub struct ReferralsScreen;

impl ScreenSpec for ReferralsScreen {
    type Dto = ReferredUserDto;
    type Row = ReferredUser;

    const NAME: &'static str = "referrals";
    const ROLE: Role = Role::Affiliate;
    const ENDPOINT: &'static str = "/api/affiliate/referrals";
    const DEFAULT_ORDER_BY: &'static str = "joined_at";
    const DEFAULT_ORDER: Order = Order::Desc;
}

pub type Referrals = ListingScreen<ReferralsScreen>;
