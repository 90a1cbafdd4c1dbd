//! HTTP client for the read-only inventory feed.
//!
//! The feed proxies each inventory sheet as CSV at `/api/sheet/{name}`,
//! padding every record to four cells. The client pulls a sheet and turns
//! it into a [`Table`] for the inventory reader.

use claimdesk_core::Table;
use thiserror::Error;
use tracing::info;

#[derive(Error, Debug)]
pub enum SyncError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("server returned {status}: {body}")]
    Server { status: u16, body: String },
    #[error("CSV parse error: {0}")]
    Csv(#[from] csv::Error),
    #[error("feed returned an empty table")]
    EmptyTable,
}

/// Client for the inventory feed endpoints.
pub struct FeedClient {
    client: reqwest::Client,
    base_url: String,
}

impl FeedClient {
    /// Create a feed client for the given base URL.
    ///
    /// `base_url` should be like `http://localhost:8000` (no trailing slash).
    pub fn new(base_url: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Pull one sheet as a table. The first CSV record is the header.
    pub async fn fetch_sheet(&self, sheet: &str) -> Result<Table, SyncError> {
        let url = format!("{}/api/sheet/{}", self.base_url, sheet);

        info!(url = %url, "pulling inventory sheet");
        let resp = self.client.get(&url).send().await?;
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(SyncError::Server {
                status: status.as_u16(),
                body,
            });
        }

        let body = resp.text().await?;
        let table = parse_csv_table(&body)?;
        info!(sheet, rows = table.len(), "pulled inventory sheet");
        Ok(table)
    }
}

/// Parse a CSV payload into a table, padding records to four cells as the
/// feed does.
pub fn parse_csv_table(body: &str) -> Result<Table, SyncError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(body.as_bytes());

    let mut records = Vec::new();
    for result in reader.records() {
        let record = result?;
        let mut row: Vec<String> = record.iter().map(|c| c.to_string()).collect();
        if row.len() < 4 {
            row.resize(4, String::new());
        }
        records.push(row);
    }

    if records.is_empty() {
        return Err(SyncError::EmptyTable);
    }
    let header = records.remove(0);
    Ok(Table::new(header, records))
}
