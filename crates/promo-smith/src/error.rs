//! Error types for promo code allocation.
//!
//! ## Error Cases
//! - [`StoreError`]: a fault reported by the remote store (transport, timeout,
//!   bad status, undecodable body, uniqueness violation).
//! - [`AllocationError`]: why one user did not receive a code.
//! - [`ValidationError`]: the raw user list was rejected before allocation.

pub type Result<T, E = AllocationError> = core::result::Result<T, E>;

/// A fault reported by a [`PromoStore`](crate::PromoStore).
#[derive(Clone, thiserror::Error, Debug, PartialEq, Eq)]
pub enum StoreError {
    /// The request never completed (connection refused, DNS, TLS, ...).
    #[error("transport error: {context}")]
    Transport { context: String },

    /// The request did not complete within the configured timeout.
    #[error("request timed out")]
    Timeout,

    /// The store answered with a non-success status.
    #[error("store returned status {status}: {body}")]
    Status { status: u16, body: String },

    /// The response body could not be decoded.
    #[error("malformed response: {context}")]
    Decode { context: String },

    /// The store rejected an insert because the key is already taken.
    ///
    /// Only reported by backends that enforce a unique key.
    #[error("promo code {code} already exists")]
    Duplicate { code: String },
}

/// Why a single user's allocation failed.
#[derive(Clone, thiserror::Error, Debug, PartialEq, Eq)]
pub enum AllocationError {
    /// Every attempt collided with an existing code. The code space is not
    /// exhausted; the attempt bound was reached.
    #[error("could not find an unused promo code after {attempts} attempts")]
    CollisionRetryExhausted { attempts: usize },

    /// The remote store failed while checking or inserting.
    #[error("store fault: {0}")]
    StoreFault(#[from] StoreError),

    /// The batch was cancelled before this user was processed.
    #[error("cancelled before allocation started")]
    Cancelled,
}

impl AllocationError {
    /// `true` if the failure came from the store rather than code contention.
    pub const fn is_store_fault(&self) -> bool {
        matches!(self, Self::StoreFault(_))
    }
}

/// The raw user list could not be turned into a batch.
#[derive(Clone, thiserror::Error, Debug, PartialEq, Eq)]
pub enum ValidationError {
    #[error("enter at least one email or phone, separated with commas")]
    Empty,

    #[error("use commas to separate entries; line breaks are not separators")]
    LineBreakSeparated,

    /// Up to the first five offending identifiers.
    #[error("these look invalid: {}", .invalid.join(", "))]
    Invalid { invalid: Vec<String> },

    #[error("custom days must be a positive number of days, got `{raw}`")]
    CustomDays { raw: String },
}
