pub mod download;
pub mod recovery;
pub mod release;

pub use download::{DownloadRequest, Fetched};
pub use recovery::RecoveryImageSource;
pub use release::{GitHubClient, Release, ReleaseAsset, ReleaseServer};

use crate::config::ReleaseConfig;
use crate::error::Result;

/// Shared HTTP client. GitHub refuses API calls without a User-Agent.
pub fn http_client(cfg: &ReleaseConfig) -> Result<reqwest::Client> {
    Ok(reqwest::Client::builder().user_agent(cfg.user_agent.as_str()).build()?)
}
