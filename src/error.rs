use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("GitHub API error ({status}): {message}")]
    Remote { status: u16, message: String },

    #[error("Rate limit exceeded, retry after {0} seconds")]
    RateLimited(u64),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Cache error: {0}")]
    Cache(String),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Invalid header value: {0}")]
    InvalidHeader(#[from] reqwest::header::InvalidHeaderValue),

    #[error("Failed to fetch GitHub stats for {username} and no cached snapshot is available: {source}")]
    Aggregation {
        username: String,
        #[source]
        source: Box<Error>,
    },
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// The HTTP status behind a remote failure, if there was one.
    pub fn status(&self) -> Option<u16> {
        match self {
            Error::Remote { status, .. } => Some(*status),
            Error::Network(e) => e.status().map(|s| s.as_u16()),
            Error::Aggregation { source, .. } => source.status(),
            _ => None,
        }
    }
}

/// Why the contribution calendar came back empty. Never fatal.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DegradedFetch {
    #[error("contribution query transport failed: {0}")]
    Transport(String),

    #[error("contribution query returned status {0}")]
    Status(u16),

    #[error("contribution calendar missing from response")]
    MissingCalendar,

    #[error("malformed contribution response: {0}")]
    Malformed(String),
}

/// Non-fatal conditions absorbed while producing a snapshot.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Warning {
    #[error(transparent)]
    DegradedFetch(#[from] DegradedFetch),

    #[error("cache unavailable: {0}")]
    CacheIo(String),
}
