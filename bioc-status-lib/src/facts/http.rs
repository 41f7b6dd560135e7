//! Cached page fetching.
//!
//! All Bioconductor pages go through [`PageFetcher`]. Requests use a fixed timeout and
//! are never retried; a failed request surfaces to the caller, which decides whether the
//! failure is fatal.

use crate::Result;
use crate::facts::cache::{Cache, CacheResult};
use crate::facts::path_utils::page_cache_filename;
use core::time::Duration;
use ohno::{IntoAppError, bail};
use reqwest::StatusCode;
use url::Url;

const LOG_TARGET: &str = "     pages";
const USER_AGENT: &str = concat!("bioc-status/", env!("CARGO_PKG_VERSION"));

/// Fetches text pages over HTTP, keeping a copy of each in the page cache.
#[derive(Debug, Clone)]
pub struct PageFetcher {
    client: reqwest::Client,
    cache: Cache,
}

impl PageFetcher {
    pub fn new(timeout: Duration, cache: Cache) -> Result<Self> {
        let client = reqwest::Client::builder().user_agent(USER_AGENT).timeout(timeout).build()?;
        Ok(Self { client, cache })
    }

    #[must_use]
    pub const fn cache(&self) -> &Cache {
        &self.cache
    }

    /// Fetch a page that must exist.
    ///
    /// Any failure, including a 404, is an error naming the URL.
    pub async fn fetch(&self, url: &Url) -> Result<String> {
        let filename = page_cache_filename(url);
        match self.cache.load::<String>(&filename) {
            CacheResult::Data(page) => return Ok(page),
            CacheResult::NoData(reason) => bail!("could not fetch {url}: {reason}"),
            CacheResult::Miss => {}
        }

        let Some(page) = self.download(url).await? else {
            bail!("could not fetch {url}: not found (HTTP 404)");
        };

        self.store(&filename, &page);
        Ok(page)
    }

    /// Fetch a page that may legitimately be absent.
    ///
    /// Returns `None` for a 404, and remembers the absence in the cache.
    pub async fn fetch_optional(&self, url: &Url) -> Result<Option<String>> {
        let filename = page_cache_filename(url);
        match self.cache.load::<String>(&filename) {
            CacheResult::Data(page) => return Ok(Some(page)),
            CacheResult::NoData(reason) => {
                log::debug!(target: LOG_TARGET, "{url} is known to be unavailable: {reason}");
                return Ok(None);
            }
            CacheResult::Miss => {}
        }

        let page = self.download(url).await?;
        match &page {
            Some(page) => self.store(&filename, page),
            None => {
                if let Err(e) = self.cache.save_no_data(&filename, "not found (HTTP 404)") {
                    log::debug!(target: LOG_TARGET, "Could not cache the absence of {url}: {e:#}");
                }
            }
        }

        Ok(page)
    }

    async fn download(&self, url: &Url) -> Result<Option<String>> {
        log::info!(target: LOG_TARGET, "Fetching {url}");

        let resp = self
            .client
            .get(url.clone())
            .send()
            .await
            .into_app_err_with(|| format!("could not fetch {url}"))?;

        let status = resp.status();
        if status == StatusCode::NOT_FOUND {
            log::debug!(target: LOG_TARGET, "{url} does not exist");
            return Ok(None);
        }

        if !status.is_success() {
            bail!("could not fetch {url}: HTTP {status}");
        }

        let body = resp.text().await.into_app_err_with(|| format!("could not read the body of {url}"))?;
        Ok(Some(body))
    }

    fn store(&self, filename: &str, page: &str) {
        if let Err(e) = self.cache.save(filename, &page) {
            log::debug!(target: LOG_TARGET, "Could not cache {filename}: {e:#}");
        }
    }
}
