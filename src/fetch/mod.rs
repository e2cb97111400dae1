//! HTTP fetcher for index pages, detail pages, and raw resources.
//!
//! The target site serves its full markup only to requests that look like a
//! desktop browser with an existing session, so every request carries a
//! fixed browser header set (Accept, Accept-Language, Cache-Control,
//! Connection, Upgrade-Insecure-Requests, a browser User-Agent) plus a
//! session cookie, with `Referer` set per request to the originating page.
//!
//! # Example
//!
//! ```no_run
//! use faqgrab::fetch::{DEFAULT_SESSION_COOKIE, PageClient};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = PageClient::new(DEFAULT_SESSION_COOKIE);
//! let page = client
//!     .fetch_page("http://site/game/faqs/", "http://site/game/faqs/")
//!     .await?;
//! println!("{} bytes, charset {:?}", page.body.len(), page.encoding);
//! # Ok(())
//! # }
//! ```

mod error;

pub use error::FetchError;

use std::path::Path;
use std::time::Duration;

use futures_util::StreamExt;
use reqwest::Client;
use reqwest::header::{self, HeaderMap, HeaderValue};
use tokio::fs::File;
use tokio::io::{AsyncWriteExt, BufWriter};
use tracing::{debug, instrument};
use url::Url;

/// Connect timeout for all requests.
const CONNECT_TIMEOUT_SECS: u64 = 10;

/// Read timeout; FAQ resources are small, a minute is generous.
const READ_TIMEOUT_SECS: u64 = 60;

/// Desktop-browser User-Agent sent on every request.
pub const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) \
    AppleWebKit/537.36 (KHTML, like Gecko) Chrome/131.0.0.0 Safari/537.36";

/// Default session cookie sent with every request.
///
/// Session-scoped: the site rotates these, so a stale value may start
/// serving reduced markup. Override with `--cookie` instead of rebuilding.
pub const DEFAULT_SESSION_COOKIE: &str = "ns=1t2ilpdrkr49s1tbl9rgp801b5";

const ACCEPT_VALUE: &str =
    "text/html,application/xhtml+xml,application/xml;q=0.9,image/webp,*/*;q=0.8";
const ACCEPT_LANGUAGE_VALUE: &str = "en-US,en;q=0.8,de;q=0.6,nl;q=0.4";

/// A fetched text page: decoded body plus the charset the server declared.
#[derive(Debug, Clone)]
pub struct FetchedPage {
    /// Decoded page body.
    pub body: String,
    /// Charset declared in the `Content-Type` header, if any.
    pub encoding: Option<String>,
}

/// HTTP client for fetching pages and downloading resources.
///
/// Created once per run and reused for every request, taking advantage of
/// connection pooling.
#[derive(Debug, Clone)]
pub struct PageClient {
    client: Client,
    session_cookie: String,
}

impl PageClient {
    /// Creates a new client carrying the fixed browser header set and the
    /// given session cookie, with default timeouts.
    ///
    /// # Panics
    ///
    /// Panics if the HTTP client builder fails to build with the static
    /// configuration. This should never happen in practice.
    #[must_use]
    pub fn new(session_cookie: impl Into<String>) -> Self {
        Self::with_timeouts(session_cookie, CONNECT_TIMEOUT_SECS, READ_TIMEOUT_SECS)
    }

    /// Creates a new client with explicit timeout values.
    ///
    /// # Panics
    ///
    /// Panics if the HTTP client builder fails to build with the supplied
    /// timeout configuration.
    #[must_use]
    #[allow(clippy::expect_used)]
    pub fn with_timeouts(
        session_cookie: impl Into<String>,
        connect_timeout_secs: u64,
        read_timeout_secs: u64,
    ) -> Self {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(connect_timeout_secs))
            .timeout(Duration::from_secs(read_timeout_secs))
            .gzip(true)
            .user_agent(BROWSER_USER_AGENT)
            .default_headers(fixed_headers())
            .build()
            .expect("failed to build HTTP client with static configuration");
        Self {
            client,
            session_cookie: session_cookie.into(),
        }
    }

    /// Fetches a page as text, surfacing the charset the server declared.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError`] if the URL is invalid, the request fails
    /// (network error, timeout), or the server returns a non-success status.
    #[instrument(skip(self), fields(url = %url))]
    pub async fn fetch_page(&self, url: &str, referer: &str) -> Result<FetchedPage, FetchError> {
        let response = self.get(url, referer).await?;
        let encoding = declared_charset(response.headers());
        let body = response
            .text()
            .await
            .map_err(|e| FetchError::network(url, e))?;
        debug!(bytes = body.len(), charset = ?encoding, "page fetched");
        Ok(FetchedPage { body, encoding })
    }

    /// Downloads a resource, streaming the response body to `dest`.
    ///
    /// Returns the number of bytes written. A partially written file is
    /// removed when the stream fails mid-transfer.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError`] if the URL is invalid, the request or stream
    /// fails, the server returns a non-success status, or writing to disk
    /// fails.
    #[must_use = "byte count confirms the resource was actually written"]
    #[instrument(skip(self), fields(url = %url, dest = %dest.display()))]
    pub async fn download_resource(
        &self,
        url: &str,
        referer: &str,
        dest: &Path,
    ) -> Result<u64, FetchError> {
        let response = self.get(url, referer).await?;

        let mut file = File::create(dest)
            .await
            .map_err(|e| FetchError::io(dest, e))?;

        let stream_result = stream_to_file(&mut file, response, url, dest).await;
        if stream_result.is_err() {
            debug!("cleaning up partial file after error");
            let _ = tokio::fs::remove_file(dest).await;
        }
        let bytes_written = stream_result?;

        debug!(bytes = bytes_written, "resource saved");
        Ok(bytes_written)
    }

    async fn get(&self, url: &str, referer: &str) -> Result<reqwest::Response, FetchError> {
        // Validate URL up front so malformed hrefs surface as InvalidUrl
        // rather than an opaque builder error at send time.
        Url::parse(url).map_err(|_| FetchError::invalid_url(url))?;

        let response = self
            .client
            .get(url)
            .header(header::REFERER, referer)
            .header(header::COOKIE, self.session_cookie.as_str())
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    FetchError::timeout(url)
                } else {
                    FetchError::network(url, e)
                }
            })?;

        if !response.status().is_success() {
            return Err(FetchError::http_status(url, response.status().as_u16()));
        }

        Ok(response)
    }
}

/// The request headers sent with every request, minus the per-request ones
/// (`Referer`, `Cookie`) and the User-Agent set on the builder.
fn fixed_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(header::ACCEPT, HeaderValue::from_static(ACCEPT_VALUE));
    headers.insert(
        header::ACCEPT_LANGUAGE,
        HeaderValue::from_static(ACCEPT_LANGUAGE_VALUE),
    );
    headers.insert(header::CACHE_CONTROL, HeaderValue::from_static("max-age=0"));
    headers.insert(header::CONNECTION, HeaderValue::from_static("keep-alive"));
    headers.insert(
        header::UPGRADE_INSECURE_REQUESTS,
        HeaderValue::from_static("1"),
    );
    headers
}

/// Extracts the charset parameter from a `Content-Type` header, if any.
fn declared_charset(headers: &HeaderMap) -> Option<String> {
    let content_type = headers.get(header::CONTENT_TYPE)?.to_str().ok()?;
    content_type
        .split(';')
        .filter_map(|part| {
            part.trim()
                .to_ascii_lowercase()
                .strip_prefix("charset=")
                .map(|v| v.trim_matches('"').to_string())
        })
        .next()
        .filter(|v| !v.is_empty())
}

/// Streams response body to file, returning bytes written.
///
/// This is extracted to enable cleanup on error in the caller.
async fn stream_to_file(
    file: &mut File,
    response: reqwest::Response,
    url: &str,
    file_path: &Path,
) -> Result<u64, FetchError> {
    let mut writer = BufWriter::new(file);
    let mut stream = response.bytes_stream();
    let mut bytes_written: u64 = 0;

    while let Some(chunk_result) = stream.next().await {
        let chunk = chunk_result.map_err(|e| FetchError::network(url, e))?;

        writer
            .write_all(&chunk)
            .await
            .map_err(|e| FetchError::io(file_path.to_path_buf(), e))?;

        bytes_written += chunk.len() as u64;
    }

    writer
        .flush()
        .await
        .map_err(|e| FetchError::io(file_path.to_path_buf(), e))?;

    Ok(bytes_written)
}
