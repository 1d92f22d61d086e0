//! Star Wars API client
//!
//! Minimal client for fetching resources and running searches against a
//! SWAPI-compatible endpoint.

use super::{Fetch, FetchError};
use crate::records::Record;
use core::time::Duration;
use serde_json::Value;
use strum::{Display, EnumIter};

const LOG_TARGET: &str = "     fetch";

pub const DEFAULT_ENDPOINT: &str = "https://swapi.dev/api";

/// A resource collection of the remote catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter)]
#[strum(serialize_all = "lowercase")]
pub enum Collection {
    Planets,
    People,
    Starships,
    Vehicles,
    Species,
}

/// Client for a SWAPI-compatible REST endpoint
#[derive(Debug, Clone)]
pub struct SwapiClient {
    client: reqwest::Client,
    endpoint: String,
}

impl SwapiClient {
    /// Create a client for `endpoint`, giving up on any single request after `timeout`.
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> crate::Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent("echo-base")
            .timeout(timeout)
            .build()?;

        let endpoint = endpoint.into().trim_end_matches('/').to_string();

        Ok(Self { client, endpoint })
    }

    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// URL of a collection, with the trailing slash the API expects.
    #[must_use]
    pub fn collection_url(&self, collection: Collection) -> String {
        format!("{}/{collection}/", self.endpoint)
    }

    /// Search `collection` for `term` and return the first match.
    pub async fn search(&self, collection: Collection, term: &str) -> Result<Record, FetchError> {
        let url = self.collection_url(collection);
        let page = self.fetch(&url, &[("search", term)]).await?;
        let record = first_result(page).ok_or_else(|| FetchError::NoResults {
            url,
            term: term.to_string(),
        })?;

        log::debug!(target: LOG_TARGET, "Search of {collection} for '{term}' matched '{}'", display_name(&record));
        Ok(record)
    }
}

impl Fetch for SwapiClient {
    async fn fetch(&self, url: &str, query: &[(&str, &str)]) -> Result<Record, FetchError> {
        log::debug!(target: LOG_TARGET, "GET {url} {query:?}");

        let mut request = self.client.get(url);
        if !query.is_empty() {
            request = request.query(query);
        }

        let resp = request.send().await.map_err(|source| FetchError::Transport {
            url: url.to_string(),
            source,
        })?;

        let status = resp.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status,
            });
        }

        let body = resp.bytes().await.map_err(|source| FetchError::Transport {
            url: url.to_string(),
            source,
        })?;

        let value: Value = serde_json::from_slice(&body).map_err(|source| FetchError::Decode {
            url: url.to_string(),
            source,
        })?;

        Record::from_value(value).ok_or_else(|| FetchError::NotAnObject { url: url.to_string() })
    }
}

/// The first element of a search page's `results` list, if it is an object.
fn first_result(mut page: Record) -> Option<Record> {
    match page.get_mut("results")?.take() {
        Value::Array(results) => results.into_iter().next().and_then(Record::from_value),
        _ => None,
    }
}

fn display_name(record: &Record) -> &str {
    record.get("name").and_then(Value::as_str).unwrap_or("<unnamed>")
}
