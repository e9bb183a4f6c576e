//! Promotional banners (admin).

use crate::api::AdminClient;
use crate::error::{Error, Result};
use crate::session::Role;
use crate::validation::{self, FormErrors};
use reqwest::Method;
use serde::{Deserialize, Serialize};
use tracing::info;

const ENDPOINT: &str = "/api/admin/banners";

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Banner {
    #[serde(rename = "_id", alias = "id")]
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default, alias = "image")]
    pub image_url: String,
    #[serde(default)]
    pub link: Option<String>,
    #[serde(default = "default_active", alias = "isActive")]
    pub active: bool,
}

fn default_active() -> bool {
    true
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BannerForm {
    pub title: String,
    pub image_url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
    pub active: bool,
}

impl BannerForm {
    pub fn validate(&self) -> std::result::Result<(), FormErrors> {
        let mut errors = FormErrors::new();
        validation::check_required(&mut errors, "title", &self.title);
        if !is_http_url(&self.image_url) {
            errors.add("image_url", "Image URL must start with http:// or https://");
        }
        if let Some(link) = &self.link {
            if !link.trim().is_empty() && !is_http_url(link) {
                errors.add("link", "Link must start with http:// or https://");
            }
        }
        errors.into_result()
    }
}

fn is_http_url(value: &str) -> bool {
    let value = value.trim();
    value.starts_with("http://") || value.starts_with("https://")
}

/// Banner management calls
#[derive(Debug, Clone)]
pub struct BannerAdmin {
    client: AdminClient,
}

impl BannerAdmin {
    pub fn new(client: AdminClient) -> Self {
        Self { client }
    }

    pub async fn list(&self) -> Result<Vec<Banner>> {
        self.client.get(Role::Admin, ENDPOINT).await
    }

    pub async fn create(&self, form: &BannerForm) -> Result<Option<String>> {
        form.validate().map_err(Error::Validation)?;
        let message = self
            .client
            .command(Method::POST, Role::Admin, ENDPOINT, form)
            .await?;
        info!(title = %form.title, "Banner created");
        Ok(message)
    }

    pub async fn delete(&self, id: &str) -> Result<Option<String>> {
        let message = self
            .client
            .delete(Role::Admin, &format!("{}/{}", ENDPOINT, id))
            .await?;
        info!(banner_id = id, "Banner deleted");
        Ok(message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_banner_form_validation() {
        let form = BannerForm {
            title: "".into(),
            image_url: "ftp://cdn/banner.png".into(),
            link: Some("javascript:alert(1)".into()),
            active: true,
        };
        let errors = form.validate().unwrap_err();
        assert!(errors.field("title").is_some());
        assert!(errors.field("image_url").is_some());
        assert!(errors.field("link").is_some());

        let ok = BannerForm {
            title: "Welcome bonus".into(),
            image_url: "https://cdn.example.com/welcome.png".into(),
            link: None,
            active: false,
        };
        assert!(ok.validate().is_ok());
    }

    #[test]
    fn test_banner_defaults_to_active() {
        let banner: Banner =
            serde_json::from_str(r#"{"_id": "b1", "title": "Spin", "image": "https://x/y.png"}"#).unwrap();
        assert!(banner.active);
        assert_eq!(banner.image_url, "https://x/y.png");
    }
}
