use reqwest::header::REFERER;

use super::download::DownloadRequest;
use crate::config::RecoveryConfig;
use crate::error::Result;

/// Builds download requests for per-device TWRP recovery images.
#[derive(Debug, Clone)]
pub struct RecoveryImageSource {
    endpoint: String,
    version_prefix: String,
    extension: String,
}

impl RecoveryImageSource {
    pub fn new(cfg: &RecoveryConfig) -> Self {
        Self {
            endpoint: cfg.endpoint.trim_end_matches('/').to_string(),
            version_prefix: cfg.version_prefix.clone(),
            extension: cfg.extension.clone(),
        }
    }

    pub fn image_url(&self, device: &str) -> String {
        format!(
            "{}/{device}/{}{device}{}",
            self.endpoint, self.version_prefix, self.extension
        )
    }

    pub fn request(&self, device: &str) -> Result<DownloadRequest> {
        let url = self.image_url(device);
        let mut req = DownloadRequest::new(&url)?;
        // the server only starts the download when referred from its own page
        req.add_header(REFERER, &url)?;
        Ok(req)
    }
}
