//! Earnings summary of the signed-in affiliate.

use super::string_or_number;
use crate::api::AdminClient;
use crate::error::Result;
use crate::session::Role;
use serde::Deserialize;

const ENDPOINT: &str = "/api/affiliate/earnings";

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EarningsSummary {
    #[serde(deserialize_with = "string_or_number::deserialize_f64")]
    pub total_earned: f64,
    #[serde(deserialize_with = "string_or_number::deserialize_f64")]
    pub pending_payout: f64,
    #[serde(deserialize_with = "string_or_number::deserialize_f64")]
    pub paid_out: f64,
    #[serde(deserialize_with = "string_or_number::deserialize_f64")]
    pub available_balance: f64,
    #[serde(deserialize_with = "string_or_number::deserialize_f64")]
    pub commission_rate: f64,
    #[serde(deserialize_with = "string_or_number::deserialize_u64")]
    pub total_referrals: u64,
    #[serde(deserialize_with = "string_or_number::deserialize_u64")]
    pub active_referrals: u64,
    pub currency: String,
}

impl Default for EarningsSummary {
    fn default() -> Self {
        Self {
            total_earned: 0.0,
            pending_payout: 0.0,
            paid_out: 0.0,
            available_balance: 0.0,
            commission_rate: 0.0,
            total_referrals: 0,
            active_referrals: 0,
            currency: "USD".to_string(),
        }
    }
}

pub async fn fetch_earnings(client: &AdminClient) -> Result<EarningsSummary> {
    client.get(Role::Affiliate, ENDPOINT).await
}
