use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::Url;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::{debug, info, instrument};

use crate::error::{InstallError, Result};
use crate::progress::ProgressReporter;

/// A single file to fetch over HTTP.
///
/// Built by a resolver, then dressed up (headers, progress) by whoever
/// executes it. Executing consumes the request.
pub struct DownloadRequest {
    url: String,
    filename: String,
    headers: HeaderMap,
    progress: Option<Arc<dyn ProgressReporter>>,
}

/// Where a fetched artifact came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Fetched {
    /// Already present in the working directory; nothing was requested.
    Cached(PathBuf),
    Downloaded(PathBuf),
}

impl fmt::Debug for DownloadRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DownloadRequest")
            .field("url", &self.url)
            .field("filename", &self.filename)
            .field("headers", &self.headers)
            .field("progress", &self.progress.is_some())
            .finish()
    }
}

impl DownloadRequest {
    /// The destination file name is the last path segment of `url`.
    pub fn new(url: &str) -> Result<Self> {
        let parsed = Url::parse(url).map_err(|_| InstallError::InvalidUrl(url.to_string()))?;
        let filename = parsed
            .path_segments()
            .and_then(|segments| segments.filter(|s| !s.is_empty()).last())
            .map(str::to_string)
            .ok_or_else(|| InstallError::InvalidUrl(url.to_string()))?;

        Ok(Self {
            url: url.to_string(),
            filename,
            headers: HeaderMap::new(),
            progress: None,
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn filename(&self) -> &str {
        &self.filename
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    pub fn add_header(&mut self, name: HeaderName, value: &str) -> Result<()> {
        let value = HeaderValue::from_str(value)
            .map_err(|_| InstallError::InvalidHeader(format!("{name}: {value:?}")))?;
        self.headers.append(name, value);
        Ok(())
    }

    pub fn set_progress(&mut self, reporter: Arc<dyn ProgressReporter>) {
        self.progress = Some(reporter);
    }

    pub fn destination(&self, dir: &Path) -> PathBuf {
        dir.join(&self.filename)
    }

    /// Downloads into `dir` unless a file with the resolved name is already
    /// there. Reruns after a later failure reuse what was fetched before.
    pub async fn fetch(self, client: &reqwest::Client, dir: &Path) -> Result<Fetched> {
        let dest = self.destination(dir);
        if fs::try_exists(&dest).await? {
            info!(path = %dest.display(), "artifact already downloaded");
            return Ok(Fetched::Cached(dest));
        }
        self.download(client, dir).await.map(Fetched::Downloaded)
    }

    /// Streams the body to `<name>.part` and renames it into place once
    /// complete, so a partial file never passes for a finished one.
    #[instrument(skip(self, client), fields(url = %self.url), err)]
    pub async fn download(self, client: &reqwest::Client, dir: &Path) -> Result<PathBuf> {
        let dest = self.destination(dir);
        let part = dir.join(format!("{}.part", self.filename));

        let mut resp = client
            .get(&self.url)
            .headers(self.headers.clone())
            .send()
            .await?
            .error_for_status()?;
        let total = resp.content_length();
        debug!(?total, "response received");

        fs::create_dir_all(dir).await?;
        let mut file = fs::File::create(&part).await?;
        if let Some(p) = &self.progress {
            p.on_start(&self.filename, total);
        }

        let mut downloaded: u64 = 0;
        while let Some(chunk) = resp.chunk().await? {
            file.write_all(&chunk).await?;
            downloaded += chunk.len() as u64;
            if let Some(p) = &self.progress {
                p.on_progress(&self.filename, downloaded, total);
            }
        }
        file.flush().await?;
        drop(file);

        fs::rename(&part, &dest).await?;
        if let Some(p) = &self.progress {
            p.on_complete(&self.filename, downloaded);
        }
        info!(path = %dest.display(), bytes = downloaded, "download complete");
        Ok(dest)
    }
}
