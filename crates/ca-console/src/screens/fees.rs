//! Platform fee setting (admin).

use super::string_or_number;
use crate::api::AdminClient;
use crate::error::{Error, Result};
use crate::session::Role;
use crate::validation::{self, FormErrors, MAX_PLATFORM_FEE_PERCENT};
use chrono::{DateTime, Utc};
use reqwest::Method;
use serde::Deserialize;
use serde_json::json;
use tracing::info;

const ENDPOINT: &str = "/api/admin/platform-fee";

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlatformFee {
    #[serde(alias = "fee", alias = "feePercent", deserialize_with = "string_or_number::deserialize_f64")]
    pub percent: f64,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone)]
pub struct PlatformFees {
    client: AdminClient,
}

impl PlatformFees {
    pub fn new(client: AdminClient) -> Self {
        Self { client }
    }

    pub async fn get(&self) -> Result<PlatformFee> {
        self.client.get(Role::Admin, ENDPOINT).await
    }

    pub async fn update(&self, percent: f64) -> Result<Option<String>> {
        let mut errors = FormErrors::new();
        validation::check_percent(&mut errors, "percent", percent, MAX_PLATFORM_FEE_PERCENT);
        errors.into_result().map_err(Error::Validation)?;

        let message = self
            .client
            .command(Method::PUT, Role::Admin, ENDPOINT, &json!({ "percent": percent }))
            .await?;
        info!(percent, "Platform fee updated");
        Ok(message)
    }
}
