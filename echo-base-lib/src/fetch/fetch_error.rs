use core::fmt;

/// Failure to retrieve a remote record.
#[derive(Debug)]
pub enum FetchError {
    /// The request could not be sent or its body could not be read.
    Transport { url: String, source: reqwest::Error },

    /// The server answered with a non-success status.
    Status { url: String, status: reqwest::StatusCode },

    /// The response body is not valid JSON.
    Decode { url: String, source: serde_json::Error },

    /// The response body is JSON but not an object.
    NotAnObject { url: String },

    /// A search returned no usable result.
    NoResults { url: String, term: String },
}

impl FetchError {
    /// The URL of the request that failed.
    #[must_use]
    pub fn url(&self) -> &str {
        match self {
            Self::Transport { url, .. }
            | Self::Status { url, .. }
            | Self::Decode { url, .. }
            | Self::NotAnObject { url }
            | Self::NoResults { url, .. } => url,
        }
    }
}

impl fmt::Display for FetchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Transport { url, .. } => write!(f, "could not fetch '{url}'"),
            Self::Status { url, status } => write!(f, "fetching '{url}' returned HTTP {status}"),
            Self::Decode { url, .. } => write!(f, "response from '{url}' is not valid JSON"),
            Self::NotAnObject { url } => write!(f, "response from '{url}' is not a JSON object"),
            Self::NoResults { url, term } => write!(f, "searching '{url}' for '{term}' returned no results"),
        }
    }
}

impl core::error::Error for FetchError {
    fn source(&self) -> Option<&(dyn core::error::Error + 'static)> {
        match self {
            Self::Transport { source, .. } => Some(source),
            Self::Decode { source, .. } => Some(source),
            Self::Status { .. } | Self::NotAnObject { .. } | Self::NoResults { .. } => None,
        }
    }
}
