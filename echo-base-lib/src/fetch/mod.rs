//! Retrieval of remote records
//!
//! The normalizer needs one capability from the outside world: turn a URL into
//! the JSON object it names. That capability is the [`Fetch`] trait, so tests
//! can stand up an in-memory catalog while the application uses
//! [`SwapiClient`], a thin `reqwest` client for the Star Wars API.
//!
//! Fetching is deliberately plain. There is no retry, no cache, and no rate
//! limiting: every call issues exactly one GET request and any failure comes
//! back as a [`FetchError`].

mod client;
mod fetch_error;

pub use client::{Collection, DEFAULT_ENDPOINT, SwapiClient};
pub use fetch_error::FetchError;

use crate::records::Record;

/// Source of remote records.
pub trait Fetch {
    /// Retrieves the JSON object at `url`, adding `query` as query parameters.
    ///
    /// The record comes back exactly as the remote side describes it: unfiltered
    /// and with scalar fields typically encoded as strings.
    fn fetch(&self, url: &str, query: &[(&str, &str)]) -> impl Future<Output = Result<Record, FetchError>>;
}

impl<T: Fetch + ?Sized> Fetch for &T {
    fn fetch(&self, url: &str, query: &[(&str, &str)]) -> impl Future<Output = Result<Record, FetchError>> {
        (**self).fetch(url, query)
    }
}
