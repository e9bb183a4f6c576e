//! Payout requests: admin processing and affiliate self-service.

use super::listing::{ListingScreen, ScreenSpec};
use super::{string_or_number, UserRefDto};
use crate::error::{Error, Result};
use crate::session::Role;
use crate::table::{FieldValue, Order, Record};
use crate::validation::{self, FormErrors};
use chrono::{DateTime, Utc};
use reqwest::Method;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::info;

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PayoutRequestDto {
    #[serde(rename = "_id", alias = "id")]
    pub id: String,
    #[serde(default, alias = "affiliateId")]
    pub affiliate: UserRefDto,
    #[serde(default, deserialize_with = "string_or_number::deserialize_f64")]
    pub amount: f64,
    #[serde(default)]
    pub currency: Option<String>,
    #[serde(default)]
    pub method: Option<String>,
    #[serde(default)]
    pub payment_method: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub transaction_ref: Option<String>,
    #[serde(default)]
    pub requested_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// Payout request row
#[derive(Debug, Clone, PartialEq)]
pub struct PayoutRequest {
    pub id: String,
    pub affiliate_id: String,
    pub affiliate_username: String,
    pub affiliate_email: String,
    pub amount: f64,
    pub currency: String,
    pub method: String,
    pub status: String,
    pub transaction_ref: Option<String>,
    pub requested_at: Option<DateTime<Utc>>,
}

impl From<PayoutRequestDto> for PayoutRequest {
    fn from(dto: PayoutRequestDto) -> Self {
        Self {
            id: dto.id,
            affiliate_id: dto.affiliate.id,
            affiliate_username: dto.affiliate.username,
            affiliate_email: dto.affiliate.email,
            amount: dto.amount,
            currency: dto.currency.unwrap_or_default().to_ascii_uppercase(),
            method: dto
                .method
                .or(dto.payment_method)
                .unwrap_or_default()
                .to_ascii_lowercase(),
            status: dto
                .status
                .map(|s| s.to_ascii_lowercase())
                .unwrap_or_else(|| PayoutStatus::Pending.to_string()),
            transaction_ref: dto.transaction_ref.filter(|r| !r.is_empty()),
            requested_at: dto.requested_at.or(dto.created_at),
        }
    }
}

impl Record for PayoutRequest {
    fn id(&self) -> &str {
        &self.id
    }

    fn field(&self, name: &str) -> Option<FieldValue> {
        match name {
            "id" => Some(self.id.as_str().into()),
            "affiliate_username" => Some(self.affiliate_username.as_str().into()),
            "affiliate_email" => Some(self.affiliate_email.as_str().into()),
            "amount" => Some(self.amount.into()),
            "currency" => Some(self.currency.as_str().into()),
            "method" => Some(self.method.as_str().into()),
            "status" => Some(self.status.as_str().into()),
            "transaction_ref" => self.transaction_ref.as_deref().map(FieldValue::from),
            "requested_at" => self.requested_at.map(FieldValue::Timestamp),
            _ => None,
        }
    }

    fn search_fields() -> &'static [&'static str] {
        &["affiliate_username", "affiliate_email", "transaction_ref"]
    }
}

/// Payout lifecycle states the console can move a request into
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PayoutStatus {
    Pending,
    Approved,
    Rejected,
    Paid,
}

impl std::fmt::Display for PayoutStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            PayoutStatus::Pending => "pending",
            PayoutStatus::Approved => "approved",
            PayoutStatus::Rejected => "rejected",
            PayoutStatus::Paid => "paid",
        };
        f.write_str(s)
    }
}

/// All payout requests (admin)
pub struct PayoutRequestsScreen;

impl ScreenSpec for PayoutRequestsScreen {
    type Dto = PayoutRequestDto;
    type Row = PayoutRequest;

    const NAME: &'static str = "payout-requests";
    const ROLE: Role = Role::Admin;
    const ENDPOINT: &'static str = "/api/admin/payouts";
    const DEFAULT_ORDER_BY: &'static str = "requested_at";
    const DEFAULT_ORDER: Order = Order::Desc;
}

pub type PayoutRequests = ListingScreen<PayoutRequestsScreen>;

impl ListingScreen<PayoutRequestsScreen> {
    pub async fn approve(&self, id: &str) -> Result<Option<String>> {
        self.transition(id, "approve", PayoutStatus::Approved, json!({}))
            .await
    }

    pub async fn reject(&self, id: &str, reason: &str) -> Result<Option<String>> {
        let mut errors = FormErrors::new();
        validation::check_required(&mut errors, "reason", reason);
        errors.into_result().map_err(Error::Validation)?;

        self.transition(id, "reject", PayoutStatus::Rejected, json!({ "reason": reason.trim() }))
            .await
    }

    /// Record that the money left the platform
    pub async fn mark_paid(&self, id: &str, transaction_ref: Option<&str>) -> Result<Option<String>> {
        let transaction_ref = transaction_ref.map(str::trim).filter(|r| !r.is_empty());
        let message = self
            .transition(
                id,
                "mark-paid",
                PayoutStatus::Paid,
                json!({ "transactionRef": transaction_ref }),
            )
            .await?;

        if let Some(reference) = transaction_ref {
            self.patch(id, |payout| payout.transaction_ref = Some(reference.to_string()));
        }
        Ok(message)
    }

    async fn transition(
        &self,
        id: &str,
        action: &str,
        status: PayoutStatus,
        body: serde_json::Value,
    ) -> Result<Option<String>> {
        let path = format!("{}/{}/{}", PayoutRequestsScreen::ENDPOINT, id, action);
        let message = self
            .client()
            .command(Method::POST, Role::Admin, &path, &body)
            .await?;

        info!(payout_id = id, %status, "Payout request updated");
        self.patch(id, |payout| payout.status = status.to_string());
        Ok(message)
    }
}

/// The signed-in affiliate's own payout requests
pub struct MyPayoutsScreen;

impl ScreenSpec for MyPayoutsScreen {
    type Dto = PayoutRequestDto;
    type Row = PayoutRequest;

    const NAME: &'static str = "my-payouts";
    const ROLE: Role = Role::Affiliate;
    const ENDPOINT: &'static str = "/api/affiliate/payouts";
    const DEFAULT_ORDER_BY: &'static str = "requested_at";
    const DEFAULT_ORDER: Order = Order::Desc;
}

pub type MyPayouts = ListingScreen<MyPayoutsScreen>;

/// New payout request form
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PayoutRequestForm {
    pub amount: f64,
    pub method: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub account_details: Option<String>,
}

impl PayoutRequestForm {
    pub fn validate(&self) -> std::result::Result<(), FormErrors> {
        let mut errors = FormErrors::new();
        validation::check_positive_amount(&mut errors, "amount", self.amount);
        validation::check_required(&mut errors, "method", &self.method);
        errors.into_result()
    }
}

impl ListingScreen<MyPayoutsScreen> {
    /// Submit a payout request, then refresh the list from the backend
    pub async fn request_payout(&self, form: &PayoutRequestForm) -> Result<Option<String>> {
        form.validate().map_err(Error::Validation)?;

        let reply = self
            .client()
            .send_json::<serde_json::Value, _>(Method::POST, Role::Affiliate, MyPayoutsScreen::ENDPOINT, form)
            .await?;

        info!(amount = form.amount, method = %form.method, "Payout requested");
        self.load().await?;
        Ok(reply.message)
    }
}
