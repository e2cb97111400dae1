//! The grab orchestrator: two-hop fetch sequence and save-to-disk.
//!
//! One run walks the index page, then each FAQ in turn: fetch the detail
//! page, classify it, and either save the detail page itself (inline HTML
//! guides) or download the resource it points at. Links are processed
//! strictly one at a time; a link that fails to fetch or parse is logged
//! and counted, never fatal to the batch. Only the index page itself is
//! load-bearing for the run.
//!
//! Output files land directly under the target directory, named by the last
//! path segment of the URL they came from. A later resource with the same
//! basename overwrites an earlier one; re-running a grab refreshes files in
//! place.

mod report;

pub use report::RunReport;

use std::path::{Path, PathBuf};

use thiserror::Error;
use tokio::fs;
use tracing::{debug, info, instrument, warn};
use url::Url;

use crate::fetch::{FetchError, PageClient};
use crate::naming::{absolutize_url, filename_from_url};
use crate::page::{self, FaqLink, PageError, ResourceKind};

/// Marker an index URL must carry to be accepted.
const FAQS_URL_MARKER: &str = "/faqs";

/// Basename under which the raw index page is dumped in debug mode.
const DEBUG_INDEX_BASENAME: &str = "00_faqs.html";

/// Configuration for one grab run.
///
/// Immutable once the [`Grabber`] is built; there is no global mutable
/// state.
#[derive(Debug, Clone)]
pub struct GrabConfig {
    /// URL of the FAQ index page.
    pub index_url: String,
    /// Directory all output files are written beneath.
    pub target_dir: PathBuf,
    /// Dump every fetched page verbatim into the target directory.
    pub debug: bool,
    /// Save binary resource kinds only.
    pub only_binaries: bool,
    /// Session cookie value sent with every request.
    pub session_cookie: String,
}

impl GrabConfig {
    /// Creates a config with the default session cookie and both switches
    /// off.
    #[must_use]
    pub fn new(index_url: impl Into<String>, target_dir: impl Into<PathBuf>) -> Self {
        Self {
            index_url: index_url.into(),
            target_dir: target_dir.into(),
            debug: false,
            only_binaries: false,
            session_cookie: crate::fetch::DEFAULT_SESSION_COOKIE.to_string(),
        }
    }
}

/// Errors that can occur during a grab run.
///
/// Only startup and index-page problems surface here; per-link failures are
/// absorbed into the [`RunReport`].
#[derive(Debug, Error)]
pub enum GrabError {
    /// The index URL does not point at a FAQ listing.
    #[error("not a FAQ listing URL (missing /faqs): {url}")]
    InvalidIndexUrl {
        /// The rejected URL.
        url: String,
    },

    /// A page or resource could not be fetched.
    #[error(transparent)]
    Fetch(#[from] FetchError),

    /// A page's markup did not match the convention its marker implies.
    #[error("inspecting {url} failed: {source}")]
    Page {
        /// The detail page being inspected.
        url: String,
        /// The underlying inspection error.
        #[source]
        source: PageError,
    },

    /// File system error outside the streaming download path.
    #[error("IO error at {path}: {source}")]
    Io {
        /// The path where the error occurred.
        path: PathBuf,
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
    },
}

impl GrabError {
    /// Creates an invalid-index-URL error.
    pub fn invalid_index_url(url: impl Into<String>) -> Self {
        Self::InvalidIndexUrl { url: url.into() }
    }

    /// Creates a page-inspection error.
    pub fn page(url: impl Into<String>, source: PageError) -> Self {
        Self::Page {
            url: url.into(),
            source,
        }
    }

    /// Creates an IO error.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// What happened to one link.
#[derive(Debug)]
enum LinkOutcome {
    Saved { path: PathBuf, kind: ResourceKind },
    SkippedUnknown,
    SkippedNonBinary,
}

/// Orchestrates one grab run.
pub struct Grabber {
    client: PageClient,
    config: GrabConfig,
}

impl Grabber {
    /// Creates a grabber for the given config.
    #[must_use]
    pub fn new(config: GrabConfig) -> Self {
        Self {
            client: PageClient::new(config.session_cookie.clone()),
            config,
        }
    }

    /// Runs the whole grab: fetch index, collect links, process each link
    /// to completion before the next.
    ///
    /// # Errors
    ///
    /// Returns [`GrabError`] for the startup-fatal cases only: an index URL
    /// without `/faqs`, a target directory that cannot be created, or an
    /// index page that cannot be fetched. Per-link failures are counted in
    /// the returned [`RunReport`] instead.
    #[instrument(skip(self), fields(index_url = %self.config.index_url))]
    pub async fn run(&self) -> Result<RunReport, GrabError> {
        if !self.config.index_url.contains(FAQS_URL_MARKER) {
            return Err(GrabError::invalid_index_url(&self.config.index_url));
        }

        fs::create_dir_all(&self.config.target_dir)
            .await
            .map_err(|e| GrabError::io(&self.config.target_dir, e))?;

        info!(dir = %self.config.target_dir.display(), "grabbing FAQ index");
        let index = self
            .client
            .fetch_page(&self.config.index_url, &self.config.index_url)
            .await?;

        if self.config.debug {
            self.dump_page(DEBUG_INDEX_BASENAME, &index.body).await?;
        }

        let links = page::collect_faq_links(&index.body);
        if links.is_empty() {
            warn!("no FAQ links found on the index page");
        } else {
            info!(count = links.len(), "found FAQ links");
        }

        let mut report = RunReport::new();
        for link in &links {
            match self.grab_one(link).await {
                Ok(LinkOutcome::Saved { path, kind }) => {
                    info!(url = %link.href, kind = %kind, path = %path.display(), "saved");
                    report.record_saved();
                }
                Ok(LinkOutcome::SkippedUnknown) => {
                    warn!(url = %link.href, "unknown resource format; skipping");
                    report.record_skipped_unknown();
                }
                Ok(LinkOutcome::SkippedNonBinary) => {
                    debug!(url = %link.href, "non-binary resource; skipping");
                    report.record_skipped_non_binary();
                }
                Err(error) => {
                    warn!(url = %link.href, error = %error, "link failed; continuing");
                    report.record_failed();
                }
            }
        }

        info!(
            saved = report.saved(),
            skipped_unknown = report.skipped_unknown(),
            skipped_non_binary = report.skipped_non_binary(),
            failed = report.failed(),
            total = report.total(),
            "grab complete"
        );

        Ok(report)
    }

    /// Processes a single FAQ link to completion.
    async fn grab_one(&self, link: &FaqLink) -> Result<LinkOutcome, GrabError> {
        debug!(url = %link.href, title = %link.title, "grabbing FAQ");
        let detail = self
            .client
            .fetch_page(&link.href, &self.config.index_url)
            .await?;

        if self.config.debug {
            self.dump_page(&filename_from_url(&link.href), &detail.body)
                .await?;
        }

        let classified =
            page::classify(&detail.body).map_err(|source| GrabError::page(&link.href, source))?;
        debug!(kind = %classified.kind, resource = ?classified.resource_url, "classified");

        if self.config.only_binaries && !classified.is_binary() {
            return Ok(LinkOutcome::SkippedNonBinary);
        }

        if classified.kind == ResourceKind::Unknown {
            return Ok(LinkOutcome::SkippedUnknown);
        }

        if classified.kind == ResourceKind::Html {
            // The detail page itself is the content; store it as-is.
            let path = output_path(&self.config.target_dir, &link.href);
            fs::write(&path, detail.body.as_bytes())
                .await
                .map_err(|e| GrabError::io(&path, e))?;
            return Ok(LinkOutcome::Saved {
                path,
                kind: classified.kind,
            });
        }

        let resource_url = classified
            .resource_url
            .ok_or_else(|| GrabError::page(&link.href, PageError::missing("resource URL", "classified page")))?;
        let resource_url = self.absolutize(&resource_url, &link.href);

        let path = output_path(&self.config.target_dir, &resource_url);
        self.client
            .download_resource(&resource_url, &link.href, &path)
            .await?;

        Ok(LinkOutcome::Saved {
            path,
            kind: classified.kind,
        })
    }

    /// Resolves a possibly relative resource URL against the detail page URL.
    fn absolutize(&self, resource_url: &str, detail_url: &str) -> String {
        Url::parse(detail_url)
            .ok()
            .and_then(|base| absolutize_url(resource_url, &base))
            .unwrap_or_else(|| resource_url.to_string())
    }

    /// Writes a fetched page verbatim into the target directory.
    async fn dump_page(&self, basename: &str, body: &str) -> Result<(), GrabError> {
        let path = self.config.target_dir.join(basename);
        debug!(path = %path.display(), "writing debug dump");
        fs::write(&path, body.as_bytes())
            .await
            .map_err(|e| GrabError::io(&path, e))
    }
}

/// The output path a resource fetched from `source_url` is saved to.
#[must_use]
pub fn output_path(target_dir: &Path, source_url: &str) -> PathBuf {
    target_dir.join(filename_from_url(source_url))
}
