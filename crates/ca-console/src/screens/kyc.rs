//! Pending KYC review (admin).

use super::listing::{ListingScreen, ScreenSpec};
use super::UserRefDto;
use crate::error::{Error, Result};
use crate::session::Role;
use crate::table::{FieldValue, Order, Record};
use crate::validation::{self, FormErrors};
use chrono::{DateTime, Utc};
use reqwest::Method;
use serde::Deserialize;
use serde_json::json;
use tracing::info;

/// KYC submission as the backend sends it, with the player embedded
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KycSubmissionDto {
    #[serde(rename = "_id", alias = "id")]
    pub id: String,
    #[serde(default, alias = "userId")]
    pub user: UserRefDto,
    #[serde(default)]
    pub document_type: String,
    #[serde(default)]
    pub document_number: String,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub submitted_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// Flattened KYC row
#[derive(Debug, Clone, PartialEq)]
pub struct KycSubmission {
    pub id: String,
    pub player_id: String,
    pub username: String,
    pub full_name: String,
    pub email: String,
    pub document_type: String,
    pub document_number: String,
    pub status: String,
    pub submitted_at: Option<DateTime<Utc>>,
}

impl From<KycSubmissionDto> for KycSubmission {
    fn from(dto: KycSubmissionDto) -> Self {
        Self {
            id: dto.id,
            player_id: dto.user.id,
            username: dto.user.username,
            full_name: dto.user.full_name,
            email: dto.user.email,
            document_type: dto.document_type.to_ascii_lowercase(),
            document_number: dto.document_number,
            status: dto
                .status
                .map(|s| s.to_ascii_lowercase())
                .unwrap_or_else(|| "pending".to_string()),
            submitted_at: dto.submitted_at.or(dto.created_at),
        }
    }
}

impl Record for KycSubmission {
    fn id(&self) -> &str {
        &self.id
    }

    fn field(&self, name: &str) -> Option<FieldValue> {
        match name {
            "id" => Some(self.id.as_str().into()),
            "player_id" => Some(self.player_id.as_str().into()),
            "username" => Some(self.username.as_str().into()),
            "full_name" => Some(self.full_name.as_str().into()),
            "email" => Some(self.email.as_str().into()),
            "document_type" => Some(self.document_type.as_str().into()),
            "status" => Some(self.status.as_str().into()),
            "submitted_at" => self.submitted_at.map(FieldValue::Timestamp),
            _ => None,
        }
    }

    fn search_fields() -> &'static [&'static str] {
        &["username", "full_name", "email"]
    }
}

pub struct PendingKycScreen;

impl ScreenSpec for PendingKycScreen {
    type Dto = KycSubmissionDto;
    type Row = KycSubmission;

    const NAME: &'static str = "pending-kyc";
    const ROLE: Role = Role::Admin;
    const ENDPOINT: &'static str = "/api/admin/kyc/pending";
    const DEFAULT_ORDER_BY: &'static str = "submitted_at";
    const DEFAULT_ORDER: Order = Order::Asc;
}

pub type PendingKyc = ListingScreen<PendingKycScreen>;

impl ListingScreen<PendingKycScreen> {
    /// Approve a submission; it leaves the pending list
    pub async fn approve(&self, id: &str) -> Result<Option<String>> {
        let path = format!("/api/admin/kyc/{}/approve", id);
        let message = self
            .client()
            .command(Method::POST, Role::Admin, &path, &json!({}))
            .await?;

        info!(submission_id = id, "KYC approved");
        self.remove(id);
        Ok(message)
    }

    /// Reject a submission with a reason shown to the player
    pub async fn reject(&self, id: &str, reason: &str) -> Result<Option<String>> {
        let mut errors = FormErrors::new();
        validation::check_required(&mut errors, "reason", reason);
        errors.into_result().map_err(Error::Validation)?;

        let path = format!("/api/admin/kyc/{}/reject", id);
        let message = self
            .client()
            .command(Method::POST, Role::Admin, &path, &json!({ "reason": reason.trim() }))
            .await?;

        info!(submission_id = id, "KYC rejected");
        self.remove(id);
        Ok(message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_embedded_user_is_flattened() {
        let dto: KycSubmissionDto = serde_json::from_value(json!({
            "_id": "k1",
            "userId": {"_id": "p9", "username": "jane", "fullname": "Jane Roe", "email": "jane@example.com"},
            "documentType": "PASSPORT",
            "createdAt": "2024-06-01T09:30:00Z"
        }))
        .unwrap();

        let row = KycSubmission::from(dto);
        assert_eq!(row.player_id, "p9");
        assert_eq!(row.full_name, "Jane Roe");
        assert_eq!(row.document_type, "passport");
        assert_eq!(row.status, "pending");
        assert!(row.submitted_at.is_some());
    }

    #[test]
    fn test_both_timestamps_prefers_submission_time() {
        let dto: KycSubmissionDto = serde_json::from_value(json!({
            "_id": "k2",
            "userId": "p1",
            "submittedAt": "2024-06-02T08:00:00Z",
            "createdAt": "2024-06-01T08:00:00Z",
            "updatedAt": "2024-06-03T08:00:00Z"
        }))
        .unwrap();

        let row = KycSubmission::from(dto);
        assert_eq!(row.player_id, "p1");
        assert!(row.username.is_empty());
        assert_eq!(
            row.submitted_at.map(|t| t.to_rfc3339()),
            Some("2024-06-02T08:00:00+00:00".to_string())
        );
    }
}
