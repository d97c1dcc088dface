//! Fetch a remote price feed and stream it into the product store.

use std::io::{self, Read};
use std::sync::OnceLock;
use std::time::{Duration, Instant};

use chrono::Utc;
use reqwest::StatusCode;
use thiserror::Error;

use crate::domain::types::FeedUrl;
use crate::repository::ProductWriter;
use crate::services::ingest::{FeedIngestor, IngestError, IngestReport};

use super::{ServiceError, ServiceResult};

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("send request: {0}")]
    Transport(#[source] reqwest::Error),
    #[error("wrong status: {0}")]
    Status(u16),
    #[error("fetch deadline exceeded")]
    TimedOut,
    #[error("reading csv: {0}")]
    Ingest(#[from] IngestError),
}

impl From<FetchError> for ServiceError {
    fn from(val: FetchError) -> Self {
        match val {
            FetchError::TimedOut => ServiceError::DeadlineExceeded,
            FetchError::Ingest(err) => err.into(),
            FetchError::Transport(_) | FetchError::Status(_) => {
                ServiceError::Internal(val.to_string())
            }
        }
    }
}

/// Downloads feeds with a single deadline covering both the HTTP exchange and
/// the ingestion of the body.
///
/// One HTTP client is shared by every fetch. It is built lazily by the first
/// fetch, which runs on a blocking worker.
#[derive(Debug, Clone)]
pub struct FeedFetcher {
    timeout: Duration,
    client: OnceLock<reqwest::blocking::Client>,
}

impl Default for FeedFetcher {
    fn default() -> Self {
        Self::new(Duration::from_secs(30))
    }
}

impl FeedFetcher {
    pub fn new(timeout: Duration) -> Self {
        Self {
            timeout,
            client: OnceLock::new(),
        }
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Issue a GET for `url` and ingest the response body as it arrives.
    ///
    /// Blocks the calling thread; run it on a blocking pool from async code.
    pub fn fetch<W>(&self, url: &FeedUrl, repo: &W) -> Result<IngestReport, FetchError>
    where
        W: ProductWriter + ?Sized,
    {
        let deadline = Instant::now() + self.timeout;

        let response = self
            .client()?
            .get(url.as_str())
            .timeout(self.timeout)
            .send()
            .map_err(|e| {
                if e.is_timeout() {
                    FetchError::TimedOut
                } else {
                    FetchError::Transport(e)
                }
            })?;

        if response.status() != StatusCode::OK {
            return Err(FetchError::Status(response.status().as_u16()));
        }

        let body = DeadlineReader::new(response, deadline);
        let report = FeedIngestor::new(repo, Utc::now().naive_utc())
            .with_deadline(deadline)
            .ingest(body)?;

        Ok(report)
    }

    fn client(&self) -> Result<&reqwest::blocking::Client, FetchError> {
        if let Some(client) = self.client.get() {
            return Ok(client);
        }
        let client = reqwest::blocking::Client::builder()
            .build()
            .map_err(FetchError::Transport)?;
        Ok(self.client.get_or_init(|| client))
    }
}

/// Refuses reads past `deadline` and reports client timeouts as
/// [`io::ErrorKind::TimedOut`].
struct DeadlineReader<R> {
    inner: R,
    deadline: Instant,
}

impl<R> DeadlineReader<R> {
    fn new(inner: R, deadline: Instant) -> Self {
        Self { inner, deadline }
    }
}

impl<R: Read> Read for DeadlineReader<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if Instant::now() >= self.deadline {
            return Err(io::Error::new(
                io::ErrorKind::TimedOut,
                "feed deadline exceeded",
            ));
        }

        self.inner.read(buf).map_err(|e| {
            if is_client_timeout(&e) {
                io::Error::new(io::ErrorKind::TimedOut, e)
            } else {
                e
            }
        })
    }
}

fn is_client_timeout(err: &io::Error) -> bool {
    err.kind() == io::ErrorKind::TimedOut
        || err
            .get_ref()
            .and_then(|inner| inner.downcast_ref::<reqwest::Error>())
            .is_some_and(reqwest::Error::is_timeout)
}

/// Core business logic for the Fetch operation.
///
/// Validates the URL, downloads the feed and saves every row. Failures are
/// logged and converted into `ServiceError` so that the HTTP route can remain
/// a thin wrapper.
pub fn fetch_feed<W>(url: &str, repo: &W, fetcher: &FeedFetcher) -> ServiceResult<IngestReport>
where
    W: ProductWriter + ?Sized,
{
    let url = match FeedUrl::new(url) {
        Ok(url) => url,
        Err(e) => return Err(ServiceError::InvalidArgument(format!("url: {e}"))),
    };

    match fetcher.fetch(&url, repo) {
        Ok(report) => {
            log::info!(
                "Ingested {url}: {} rows, {} created, {} updated, {} unchanged",
                report.rows,
                report.created,
                report.updated,
                report.unchanged
            );
            Ok(report)
        }
        Err(e) => {
            log::error!("Failed to fetch {url}: {e}");
            Err(e.into())
        }
    }
}
