//! Transaction ledger (admin, read-only).

use super::listing::{ListingScreen, ScreenSpec};
use super::{string_or_number, UserRefDto};
use crate::session::Role;
use crate::table::{FieldValue, Order, Record};
use chrono::{DateTime, Utc};
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionDto {
    #[serde(rename = "_id", alias = "id")]
    pub id: String,
    #[serde(default, alias = "userId")]
    pub user: UserRefDto,
    #[serde(default, rename = "type", alias = "kind")]
    pub kind: String,
    #[serde(default, deserialize_with = "string_or_number::deserialize_f64")]
    pub amount: f64,
    #[serde(default)]
    pub currency: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub reference: String,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// Ledger row
#[derive(Debug, Clone, PartialEq)]
pub struct Transaction {
    pub id: String,
    pub username: String,
    pub email: String,
    pub kind: String,
    pub amount: f64,
    pub currency: String,
    pub status: String,
    pub reference: String,
    pub created_at: Option<DateTime<Utc>>,
}

impl From<TransactionDto> for Transaction {
    fn from(dto: TransactionDto) -> Self {
        Self {
            id: dto.id,
            username: dto.user.username,
            email: dto.user.email,
            kind: dto.kind.to_ascii_lowercase(),
            amount: dto.amount,
            currency: dto.currency.unwrap_or_default().to_ascii_uppercase(),
            status: dto
                .status
                .map(|s| s.to_ascii_lowercase())
                .unwrap_or_else(|| "completed".to_string()),
            reference: dto.reference,
            created_at: dto.created_at,
        }
    }
}

impl Record for Transaction {
    fn id(&self) -> &str {
        &self.id
    }

    fn field(&self, name: &str) -> Option<FieldValue> {
        match name {
            "id" => Some(self.id.as_str().into()),
            "username" => Some(self.username.as_str().into()),
            "email" => Some(self.email.as_str().into()),
            "kind" => Some(self.kind.as_str().into()),
            "amount" => Some(self.amount.into()),
            "currency" => Some(self.currency.as_str().into()),
            "status" => Some(self.status.as_str().into()),
            "reference" => Some(self.reference.as_str().into()),
            "created_at" => self.created_at.map(FieldValue::Timestamp),
            _ => None,
        }
    }

    fn search_fields() -> &'static [&'static str] {
        &["username", "email", "reference", "id"]
    }
}

pub struct TransactionsScreen;

impl ScreenSpec for TransactionsScreen {
    type Dto = TransactionDto;
    type Row = Transaction;

    const NAME: &'static str = "transactions";
    const ROLE: Role = Role::Admin;
    const ENDPOINT: &'static str = "/api/admin/transactions";
    const DEFAULT_ORDER_BY: &'static str = "created_at";
    const DEFAULT_ORDER: Order = Order::Desc;
}

pub type Transactions = ListingScreen<TransactionsScreen>;
