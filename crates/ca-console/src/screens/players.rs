//! Players listing (admin).

use super::listing::{ListingScreen, ScreenSpec};
use super::{string_or_number, AccountStatus};
use crate::error::Result;
use crate::session::Role;
use crate::table::{FieldValue, Order, Record};
use chrono::{DateTime, Utc};
use reqwest::Method;
use serde::Deserialize;
use serde_json::json;
use tracing::info;

/// Player as the backend sends it
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerDto {
    #[serde(rename = "_id", alias = "id")]
    pub id: String,
    #[serde(default)]
    pub username: String,
    #[serde(default, alias = "fullname")]
    pub full_name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub phone_number: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub currency: Option<String>,
    #[serde(default, deserialize_with = "string_or_number::deserialize_f64")]
    pub balance: f64,
    #[serde(default)]
    pub kyc_status: Option<String>,
    #[serde(default)]
    pub is_verified: Option<bool>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// Player row
#[derive(Debug, Clone, PartialEq)]
pub struct Player {
    pub id: String,
    pub username: String,
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub status: String,
    pub currency: String,
    pub balance: f64,
    pub kyc_status: String,
    pub created_at: Option<DateTime<Utc>>,
}

impl From<PlayerDto> for Player {
    fn from(dto: PlayerDto) -> Self {
        let kyc_status = match (dto.kyc_status, dto.is_verified) {
            (Some(status), _) if !status.is_empty() => status.to_ascii_lowercase(),
            (_, Some(true)) => "verified".to_string(),
            _ => "unverified".to_string(),
        };

        Self {
            id: dto.id,
            username: dto.username,
            full_name: dto.full_name,
            email: dto.email,
            phone: dto
                .phone
                .filter(|p| !p.trim().is_empty())
                .or(dto.phone_number)
                .unwrap_or_default(),
            status: dto
                .status
                .map(|s| s.to_ascii_lowercase())
                .unwrap_or_else(|| AccountStatus::Active.to_string()),
            currency: dto.currency.unwrap_or_default().to_ascii_uppercase(),
            balance: dto.balance,
            kyc_status,
            created_at: dto.created_at,
        }
    }
}

impl Record for Player {
    fn id(&self) -> &str {
        &self.id
    }

    fn field(&self, name: &str) -> Option<FieldValue> {
        match name {
            "id" => Some(self.id.as_str().into()),
            "username" => Some(self.username.as_str().into()),
            "full_name" => Some(self.full_name.as_str().into()),
            "email" => Some(self.email.as_str().into()),
            "phone" => Some(self.phone.as_str().into()),
            "status" => Some(self.status.as_str().into()),
            "currency" => Some(self.currency.as_str().into()),
            "balance" => Some(self.balance.into()),
            "kyc_status" => Some(self.kyc_status.as_str().into()),
            "created_at" => self.created_at.map(FieldValue::Timestamp),
            _ => None,
        }
    }

    fn search_fields() -> &'static [&'static str] {
        &["username", "full_name", "email"]
    }
}

pub struct PlayersScreen;

impl ScreenSpec for PlayersScreen {
    type Dto = PlayerDto;
    type Row = Player;

    const NAME: &'static str = "players";
    const ROLE: Role = Role::Admin;
    const ENDPOINT: &'static str = "/api/admin/players";
    const DEFAULT_ORDER_BY: &'static str = "created_at";
    const DEFAULT_ORDER: Order = Order::Desc;
}

pub type Players = ListingScreen<PlayersScreen>;

impl ListingScreen<PlayersScreen> {
    /// Change a player's account status
    pub async fn set_status(&self, id: &str, status: AccountStatus) -> Result<Option<String>> {
        let path = format!("{}/{}/status", PlayersScreen::ENDPOINT, id);
        let message = self
            .client()
            .command(Method::PATCH, Role::Admin, &path, &json!({ "status": status }))
            .await?;

        info!(player_id = id, %status, "Player status changed");
        self.patch(id, |player| player.status = status.to_string());
        Ok(message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dto_maps_backend_names() {
        let dto: PlayerDto = serde_json::from_value(json!({
            "_id": "p1",
            "username": "jdoe",
            "fullname": "John Doe",
            "email": "john@example.com",
            "status": "Blocked",
            "currency": "inr",
            "balance": "150.25",
            "isVerified": true,
            "createdAt": "2024-05-01T10:00:00Z"
        }))
        .unwrap();

        let player = Player::from(dto);
        assert_eq!(player.id, "p1");
        assert_eq!(player.full_name, "John Doe");
        assert_eq!(player.status, "blocked");
        assert_eq!(player.currency, "INR");
        assert_eq!(player.balance, 150.25);
        assert_eq!(player.kyc_status, "verified");
        assert!(player.created_at.is_some());
    }

    #[test]
    fn test_defaults_for_sparse_dto() {
        let dto: PlayerDto = serde_json::from_value(json!({"id": "p2"})).unwrap();
        let player = Player::from(dto);
        assert_eq!(player.status, "active");
        assert_eq!(player.kyc_status, "unverified");
        assert!(player.field("created_at").is_none());
    }

    #[test]
    fn test_phone_from_either_key() {
        let dto: PlayerDto =
            serde_json::from_value(json!({"_id": "p3", "phone": "", "phoneNumber": "+15550100"})).unwrap();
        assert_eq!(Player::from(dto).phone, "+15550100");

        let dto: PlayerDto =
            serde_json::from_value(json!({"_id": "p4", "phone": "+4420", "phoneNumber": "+15550100"})).unwrap();
        assert_eq!(Player::from(dto).phone, "+4420");
    }
}
