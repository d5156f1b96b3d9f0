//! Version badge fetched from the app's `/api/version` endpoint.

use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::error;
use url::Url;

/// Path of the version endpoint on the app origin.
pub const VERSION_PATH: &str = "/api/version";

/// Body of `/api/version`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionInfo {
    pub version: String,
    pub deployment: String,
}

/// What the page footer shows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VersionBadge {
    pub text: String,
    pub show_beta_warning: bool,
}

impl VersionInfo {
    /// Pre-release deployments get their name appended and the beta warning.
    pub fn badge(&self) -> VersionBadge {
        match self.deployment.as_str() {
            "beta" | "dev" => VersionBadge {
                text: format!("{} ({} build)", self.version, self.deployment),
                show_beta_warning: true,
            },
            _ => VersionBadge {
                text: self.version.clone(),
                show_beta_warning: false,
            },
        }
    }
}

/// Fetches the version from `base` and renders the badge.
///
/// Any failure is logged and yields `None`; the badge is cosmetic.
pub async fn fetch_version(client: &Client, base: &Url) -> Option<VersionBadge> {
    match try_fetch_version(client, base).await {
        Ok(info) => Some(info.badge()),
        Err(e) => {
            error!("Failed to fetch version: {}", e);
            None
        }
    }
}

async fn try_fetch_version(client: &Client, base: &Url) -> anyhow::Result<VersionInfo> {
    let url = base.join(VERSION_PATH)?;
    let info = client
        .get(url)
        .send()
        .await?
        .error_for_status()?
        .json::<VersionInfo>()
        .await?;
    Ok(info)
}
