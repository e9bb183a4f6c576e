//! Affiliates listing (admin) with status and commission control.

use super::listing::{ListingScreen, ScreenSpec};
use super::{string_or_number, AccountStatus};
use crate::error::{Error, Result};
use crate::session::Role;
use crate::table::{FieldValue, Order, Record};
use crate::validation;
use chrono::{DateTime, Utc};
use reqwest::Method;
use serde::Deserialize;
use serde_json::json;
use tracing::info;

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AffiliateDto {
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
    #[serde(default)]
    pub promotion_methods: Option<Vec<String>>,
    #[serde(default)]
    pub promotion_method: Option<Vec<String>>,
    #[serde(default, deserialize_with = "string_or_number::deserialize_opt_f64")]
    pub commission_rate: Option<f64>,
    #[serde(default, deserialize_with = "string_or_number::deserialize_opt_f64")]
    pub commission: Option<f64>,
    #[serde(default)]
    pub referral_code: String,
    #[serde(default, deserialize_with = "string_or_number::deserialize_opt_u64")]
    pub total_referrals: Option<u64>,
    #[serde(default, deserialize_with = "string_or_number::deserialize_opt_u64")]
    pub referral_count: Option<u64>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// Affiliate row; `commission_rate` is in percent
#[derive(Debug, Clone, PartialEq)]
pub struct Affiliate {
    pub id: String,
    pub username: String,
    pub full_name: String,
    pub email: String,
    pub status: String,
    pub promotion_methods: Vec<String>,
    pub commission_rate: f64,
    pub referral_code: String,
    pub total_referrals: u64,
    pub created_at: Option<DateTime<Utc>>,
}

impl From<AffiliateDto> for Affiliate {
    fn from(dto: AffiliateDto) -> Self {
        Self {
            id: dto.id,
            username: dto.username,
            full_name: dto.full_name,
            email: dto.email,
            status: dto
                .status
                .map(|s| s.to_ascii_lowercase())
                .unwrap_or_else(|| AccountStatus::Inactive.to_string()),
            promotion_methods: dto
                .promotion_methods
                .or(dto.promotion_method)
                .unwrap_or_default()
                .into_iter()
                .map(|m| m.trim().to_ascii_lowercase())
                .filter(|m| !m.is_empty())
                .collect(),
            commission_rate: dto.commission_rate.or(dto.commission).unwrap_or(0.0),
            referral_code: dto.referral_code,
            total_referrals: dto.total_referrals.or(dto.referral_count).unwrap_or(0),
            created_at: dto.created_at,
        }
    }
}

impl Record for Affiliate {
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
            "promotion_methods" => Some(self.promotion_methods.clone().into()),
            "commission_rate" => Some(self.commission_rate.into()),
            "referral_code" => Some(self.referral_code.as_str().into()),
            "total_referrals" => Some((self.total_referrals as f64).into()),
            "created_at" => self.created_at.map(FieldValue::Timestamp),
            _ => None,
        }
    }

    fn search_fields() -> &'static [&'static str] {
        &["username", "full_name", "email", "referral_code"]
    }
}

pub struct AffiliatesScreen;

impl ScreenSpec for AffiliatesScreen {
    type Dto = AffiliateDto;
    type Row = Affiliate;

    const NAME: &'static str = "affiliates";
    const ROLE: Role = Role::Admin;
    const ENDPOINT: &'static str = "/api/admin/affiliates";
    const DEFAULT_ORDER_BY: &'static str = "created_at";
    const DEFAULT_ORDER: Order = Order::Desc;
}

pub type Affiliates = ListingScreen<AffiliatesScreen>;

impl ListingScreen<AffiliatesScreen> {
    /// Approve, suspend or block an affiliate
    pub async fn set_status(&self, id: &str, status: AccountStatus) -> Result<Option<String>> {
        let path = format!("{}/{}/status", AffiliatesScreen::ENDPOINT, id);
        let message = self
            .client()
            .command(Method::PATCH, Role::Admin, &path, &json!({ "status": status }))
            .await?;

        info!(affiliate_id = id, %status, "Affiliate status changed");
        self.patch(id, |affiliate| affiliate.status = status.to_string());
        Ok(message)
    }

    /// Set an affiliate's commission, in percent
    ///
    /// Values outside 0–4 % are rejected before any request is sent.
    pub async fn set_commission(&self, id: &str, rate_percent: f64) -> Result<Option<String>> {
        validation::validate_commission(rate_percent).map_err(Error::Validation)?;

        let path = format!("{}/{}/commission", AffiliatesScreen::ENDPOINT, id);
        let message = self
            .client()
            .command(Method::PUT, Role::Admin, &path, &json!({ "commissionRate": rate_percent }))
            .await?;

        info!(affiliate_id = id, rate_percent, "Affiliate commission changed");
        self.patch(id, |affiliate| affiliate.commission_rate = rate_percent);
        Ok(message)
    }
}
