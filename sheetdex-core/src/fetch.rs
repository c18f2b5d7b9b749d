use crate::error::DatasetError;
use crate::io::parse_dataset;
use crate::models::RawDataset;
use chrono::{DateTime, Utc};
use reqwest::blocking::Client;
use tracing::{debug, info};
use url::Url;

/// Append a `t=<unix millis>` query pair so intermediate caches never serve
/// a stale export
pub fn cache_busted(url: &Url, now: DateTime<Utc>) -> Url {
    let mut busted = url.clone();
    busted
        .query_pairs_mut()
        .append_pair("t", &now.timestamp_millis().to_string());
    busted
}

/// GET a document as text. Any non-success status is an error.
pub fn fetch_text(client: &Client, url: &Url) -> Result<String, DatasetError> {
    debug!(%url, "requesting");
    let response = client.get(url.clone()).send()?;

    let status = response.status();
    if !status.is_success() {
        return Err(DatasetError::Status(status.as_u16()));
    }

    Ok(response.text()?)
}

/// Fetch and parse a dataset document, bypassing caches
pub fn fetch_dataset(client: &Client, url: &Url) -> Result<RawDataset, DatasetError> {
    let busted = cache_busted(url, Utc::now());
    let contents = fetch_text(client, &busted)?;
    let dataset = parse_dataset(&contents)?;
    info!(%url, categories = dataset.len(), "fetched dataset");
    Ok(dataset)
}
