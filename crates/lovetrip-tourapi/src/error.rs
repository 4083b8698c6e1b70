use thiserror::Error;

/// Errors returned by the Tour API client.
#[derive(Debug, Error)]
pub enum TourApiError {
    /// Network or TLS failure from the underlying HTTP client.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The base URL from configuration could not be parsed.
    #[error("invalid Tour API base URL '{url}': {reason}")]
    InvalidBaseUrl { url: String, reason: String },

    /// Non-2xx HTTP status on a response whose envelope carried no error code.
    #[error("unexpected HTTP status {status} from {url}")]
    UnexpectedStatus { status: u16, url: String },

    /// `resultCode` 0003: the service key was rejected.
    #[error("Tour API rejected the service key: {0}")]
    InvalidServiceKey(String),

    /// `resultCode` 0005/0006: daily or monthly traffic quota exhausted.
    #[error("Tour API quota exceeded [{code}]: {message}")]
    QuotaExceeded { code: String, message: String },

    /// Any other non-"0000" result code.
    #[error("Tour API error [{code}]: {message}")]
    Api { code: String, message: String },

    /// The response body could not be deserialized into the expected shape.
    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },
}
