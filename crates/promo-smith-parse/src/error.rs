use promo_smith::StoreError;

/// Parse error code for a value that violates a unique index.
pub const DUPLICATE_VALUE_CODE: i64 = 137;

/// Errors building a [`ParseStore`](crate::ParseStore).
#[derive(thiserror::Error, Debug)]
pub enum ParseError {
    /// A configured value cannot be sent as an HTTP header.
    #[error("invalid value for header {header}")]
    InvalidHeader { header: &'static str },

    /// The HTTP client could not be created.
    #[error("failed to build HTTP client: {0}")]
    Client(#[from] reqwest::Error),
}

/// Classifies a transport-level failure.
pub(crate) fn store_error(err: &reqwest::Error) -> StoreError {
    if err.is_timeout() {
        StoreError::Timeout
    } else if err.is_decode() {
        StoreError::Decode {
            context: err.to_string(),
        }
    } else {
        StoreError::Transport {
            context: err.to_string(),
        }
    }
}
