use log::{info, warn};
use reqwest::header::{self, HeaderMap, HeaderValue};
use reqwest::StatusCode;
use tokio::time::sleep;
use url::Url;

use crate::config::RetryPolicy;

const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";
const ACCEPT: &str = "text/html,application/xhtml+xml,application/xml;q=0.9,image/webp,*/*;q=0.8";
const ACCEPT_LANGUAGE: &str = "en-US,en;q=0.5";
const ACCEPT_ENCODING: &str = "gzip, deflate";
const CONNECTION: &str = "keep-alive";

#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("Server returned {status} for {url}")]
    Status { url: Url, status: StatusCode },
}

/// Something that can retrieve the markup of a page, performing exactly one attempt per call.
#[allow(async_fn_in_trait)]
pub trait PageSource {
    async fn fetch_page(&self, url: &Url) -> Result<String, FetchError>;
}

pub struct FestivalClient {
    client: reqwest::Client,
}

impl FestivalClient {
    pub fn new(policy: &RetryPolicy) -> reqwest::Result<Self> {
        let client = reqwest::Client::builder()
            .default_headers(browser_headers())
            .timeout(policy.timeout)
            .build()?;
        Ok(Self { client })
    }
}

fn browser_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(header::USER_AGENT, HeaderValue::from_static(USER_AGENT));
    headers.insert(header::ACCEPT, HeaderValue::from_static(ACCEPT));
    headers.insert(
        header::ACCEPT_LANGUAGE,
        HeaderValue::from_static(ACCEPT_LANGUAGE),
    );
    headers.insert(
        header::ACCEPT_ENCODING,
        HeaderValue::from_static(ACCEPT_ENCODING),
    );
    headers.insert(header::CONNECTION, HeaderValue::from_static(CONNECTION));
    headers
}

impl PageSource for FestivalClient {
    async fn fetch_page(&self, url: &Url) -> Result<String, FetchError> {
        let response = self.client.get(url.clone()).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.clone(),
                status,
            });
        }
        Ok(response.text().await?)
    }
}

/// Fetches `url`, retrying with exponential backoff until `policy.max_attempts` attempts are spent.
///
/// The error of the last attempt is returned as is.
/// After a successful fetch, sleeps for `policy.request_interval` before returning.
pub async fn fetch_with_retry<S: PageSource>(
    source: &S,
    url: &Url,
    policy: &RetryPolicy,
) -> Result<String, FetchError> {
    let max_attempts = policy.max_attempts.max(1);
    let mut attempt = 0;
    loop {
        info!("Fetching {url} (attempt {}/{max_attempts})", attempt + 1);
        match source.fetch_page(url).await {
            Ok(html) => {
                sleep(policy.request_interval).await;
                return Ok(html);
            }
            Err(e) if attempt + 1 >= max_attempts => return Err(e),
            Err(e) => {
                let delay = policy.backoff(attempt);
                warn!(
                    "Attempt {} failed for {url}: {e}.  Retrying in {delay:?}...",
                    attempt + 1
                );
                sleep(delay).await;
                attempt += 1;
            }
        }
    }
}
