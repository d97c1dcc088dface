//! Streaming ingestion of `;`-separated product price feeds.
//!
//! The feed must start with the exact header `PRODUCT NAME;PRICE`. Every
//! following row is saved immediately, in file order, so a failure part way
//! through leaves the rows before it persisted.

use std::io::{self, Read};
use std::time::Instant;

use chrono::NaiveDateTime;
use serde::Serialize;
use thiserror::Error;

use crate::domain::product::{NewProduct, SaveOutcome};
use crate::domain::types::{ProductName, ProductPrice};
use crate::repository::ProductWriter;
use crate::repository::errors::RepositoryError;

use super::ServiceError;

/// Header row every feed must start with.
pub const FEED_HEADERS: [&str; 2] = ["PRODUCT NAME", "PRICE"];

const FEED_DELIMITER: u8 = b';';

#[derive(Debug, Error)]
pub enum IngestError {
    #[error("invalid header, expected `{}`", FEED_HEADERS.join(";"))]
    InvalidHeader,
    #[error("row {row}: expected {} fields, found {found}", FEED_HEADERS.len())]
    FieldCount { row: usize, found: usize },
    #[error("row {row}: product name is empty")]
    InvalidName { row: usize },
    #[error("row {row}: invalid price {value:?} for {name}")]
    InvalidPrice {
        row: usize,
        name: String,
        value: String,
    },
    #[error("failed to read feed: {0}")]
    Csv(csv::Error),
    #[error("failed to save product: {0}")]
    Repository(#[from] RepositoryError),
    #[error("ingestion deadline exceeded")]
    TimedOut,
}

impl From<csv::Error> for IngestError {
    fn from(err: csv::Error) -> Self {
        match err.kind() {
            csv::ErrorKind::Io(e) if e.kind() == io::ErrorKind::TimedOut => Self::TimedOut,
            _ => Self::Csv(err),
        }
    }
}

impl From<IngestError> for ServiceError {
    fn from(val: IngestError) -> Self {
        match val {
            IngestError::TimedOut => ServiceError::DeadlineExceeded,
            IngestError::Repository(_) => ServiceError::Internal(val.to_string()),
            IngestError::Csv(ref err) if err.is_io_error() => {
                ServiceError::Internal(val.to_string())
            }
            IngestError::InvalidHeader
            | IngestError::FieldCount { .. }
            | IngestError::InvalidName { .. }
            | IngestError::InvalidPrice { .. }
            | IngestError::Csv(_) => ServiceError::Format(val.to_string()),
        }
    }
}

/// Aggregated ingestion outcome.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct IngestReport {
    pub rows: usize,
    pub created: usize,
    pub updated: usize,
    pub unchanged: usize,
}

impl IngestReport {
    fn record(&mut self, outcome: SaveOutcome) {
        self.rows += 1;
        match outcome {
            SaveOutcome::Created(_) => self.created += 1,
            SaveOutcome::Updated(_) => self.updated += 1,
            SaveOutcome::Unchanged(_) => self.unchanged += 1,
        }
    }
}

/// Feeds parsed rows into a [`ProductWriter`] one at a time.
pub struct FeedIngestor<'a, W: ?Sized> {
    repo: &'a W,
    updated_at: NaiveDateTime,
    deadline: Option<Instant>,
}

impl<'a, W> FeedIngestor<'a, W>
where
    W: ProductWriter + ?Sized,
{
    /// All rows of one run are stamped with the same `updated_at`.
    pub fn new(repo: &'a W, updated_at: NaiveDateTime) -> Self {
        Self {
            repo,
            updated_at,
            deadline: None,
        }
    }

    /// Stop with [`IngestError::TimedOut`] once `deadline` has passed.
    pub fn with_deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(deadline);
        self
    }

    pub fn ingest<R: Read>(&self, reader: R) -> Result<IngestReport, IngestError> {
        let mut reader = csv::ReaderBuilder::new()
            .delimiter(FEED_DELIMITER)
            .trim(csv::Trim::None)
            .flexible(true)
            .from_reader(reader);

        let headers = reader.headers()?;
        if headers.len() != FEED_HEADERS.len() || !headers.iter().eq(FEED_HEADERS) {
            return Err(IngestError::InvalidHeader);
        }

        let mut report = IngestReport::default();

        for (idx, record) in reader.records().enumerate() {
            let record = record?;
            let row = idx + 2;

            if record.len() != FEED_HEADERS.len() {
                return Err(IngestError::FieldCount {
                    row,
                    found: record.len(),
                });
            }
            let (name, price) = (&record[0], &record[1]);

            let product = NewProduct {
                name: ProductName::new(name).map_err(|_| IngestError::InvalidName { row })?,
                price: parse_price(price).ok_or_else(|| IngestError::InvalidPrice {
                    row,
                    name: name.to_string(),
                    value: price.to_string(),
                })?,
                updated_at: self.updated_at,
            };

            if self.deadline.is_some_and(|deadline| Instant::now() >= deadline) {
                return Err(IngestError::TimedOut);
            }

            let outcome = self.repo.save_product(&product)?;
            log::debug!("Row {row}: {} -> {outcome:?}", product.name);
            report.record(outcome);
        }

        Ok(report)
    }
}

fn parse_price(value: &str) -> Option<ProductPrice> {
    value
        .parse::<f64>()
        .ok()
        .and_then(|price| ProductPrice::new(price).ok())
}
