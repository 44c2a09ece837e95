use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, instrument};

use super::download::DownloadRequest;
use crate::config::ReleaseConfig;
use crate::error::{InstallError, Result};

/// Somewhere the latest update package for a device can be found.
#[async_trait]
pub trait ReleaseServer: Send + Sync {
    async fn request_latest_release(&self, device: &str) -> Result<DownloadRequest>;
}

/// The subset of a GitHub release the installer reads.
#[derive(Debug, Clone, Deserialize)]
pub struct Release {
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub tag_name: String,
    #[serde(default)]
    pub draft: bool,
    #[serde(default)]
    pub assets: Vec<ReleaseAsset>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ReleaseAsset {
    pub name: String,
    #[serde(default)]
    pub size: u64,
    pub browser_download_url: String,
}

/// Update packages are named `*-update-<device>-*.zip`.
pub fn asset_marker(device: &str) -> String {
    format!("-update-{device}-")
}

/// Picks the update asset for `device` from `releases`, which the server
/// returns newest first.
///
/// Stops at the first published release that has a matching asset, even if
/// an older release would also match.
pub fn select_latest_asset<'a>(releases: &'a [Release], device: &str) -> Option<&'a ReleaseAsset> {
    let marker = asset_marker(device);
    releases
        .iter()
        .filter(|r| !r.draft)
        .find_map(|r| r.assets.iter().find(|a| a.name.contains(&marker)))
}

pub struct GitHubClient {
    client: reqwest::Client,
    endpoint: String,
    org: String,
    repo: String,
}

impl GitHubClient {
    pub fn new(client: reqwest::Client, cfg: &ReleaseConfig) -> Self {
        Self {
            client,
            endpoint: cfg.endpoint.trim_end_matches('/').to_string(),
            org: cfg.org.clone(),
            repo: cfg.repo.clone(),
        }
    }

    pub fn releases_url(&self) -> String {
        format!("{}/repos/{}/{}/releases", self.endpoint, self.org, self.repo)
    }

    #[instrument(skip(self), err)]
    pub async fn releases(&self) -> Result<Vec<Release>> {
        let body = self
            .client
            .get(self.releases_url())
            .header(reqwest::header::ACCEPT, "application/vnd.github+json")
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;
        let releases: Vec<Release> = serde_json::from_str(&body)?;
        debug!(count = releases.len(), "fetched releases");
        Ok(releases)
    }
}

#[async_trait]
impl ReleaseServer for GitHubClient {
    async fn request_latest_release(&self, device: &str) -> Result<DownloadRequest> {
        let releases = self.releases().await?;
        let asset = select_latest_asset(&releases, device)
            .ok_or_else(|| InstallError::NoRelease(device.to_string()))?;
        debug!(asset = %asset.name, size = asset.size, "selected update package");
        DownloadRequest::new(&asset.browser_download_url)
    }
}
