//! Error types for webcache.
//!
//! One `thiserror` enum covers the whole workspace. Errors from the fetch
//! function and the key-value store propagate to the caller wrapped with the
//! failing operation's identity; nothing is retried or silently degraded on
//! the way up.

use thiserror::Error;

/// Result type alias using `WebCacheError`.
pub type Result<T> = std::result::Result<T, WebCacheError>;

/// The store primitive that failed, carried inside [`WebCacheError::Store`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StoreOperation {
    /// Reading a key.
    Get,
    /// Writing a key with an expiry.
    SetWithExpiry,
    /// Atomically incrementing a counter key.
    Increment,
    /// Establishing the store connection.
    Connect,
}

impl std::fmt::Display for StoreOperation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StoreOperation::Get => write!(f, "GET"),
            StoreOperation::SetWithExpiry => write!(f, "SET"),
            StoreOperation::Increment => write!(f, "INCR"),
            StoreOperation::Connect => write!(f, "CONNECT"),
        }
    }
}

/// Main error type for all webcache operations.
#[derive(Debug, Error)]
pub enum WebCacheError {
    // ═══════════════════════════════════════════════════════════════════════════
    // FETCH ERRORS
    // ═══════════════════════════════════════════════════════════════════════════
    /// The fetch function failed or was cancelled before producing content.
    #[error("fetch failed for '{url}': {reason}")]
    Fetch {
        /// The URL that was being fetched.
        url: String,
        /// Description of the underlying cause.
        reason: String,
        /// True when the fetch was cancelled or timed out rather than
        /// rejected by the remote side.
        cancelled: bool,
    },

    /// The fetch completed but the server answered with a non-success status.
    #[error("fetch for '{url}' returned HTTP status {status}")]
    FetchStatus {
        /// The URL that was fetched.
        url: String,
        /// The HTTP status code the server returned.
        status: u16,
    },

    // ═══════════════════════════════════════════════════════════════════════════
    // STORE ERRORS
    // ═══════════════════════════════════════════════════════════════════════════
    /// The key-value store was unreachable or a command failed.
    #[error("store {operation} failed on '{key}': {reason}")]
    Store {
        /// The store primitive that failed.
        operation: StoreOperation,
        /// The key the operation targeted, or the server URL for
        /// connection failures.
        key: String,
        /// Description of the underlying cause.
        reason: String,
    },

    /// An access counter held a value that does not parse as an integer.
    #[error("corrupt access counter at key '{key}': {reason}")]
    CorruptCounter {
        /// The counter key that was read.
        key: String,
        /// Why the stored value was rejected.
        reason: String,
    },

    // ═══════════════════════════════════════════════════════════════════════════
    // VALIDATION ERRORS
    // ═══════════════════════════════════════════════════════════════════════════
    /// The caller passed a URL this component refuses outright.
    #[error("invalid URL: {0}")]
    InvalidUrl(String),

    /// A key namespace prefix failed validation.
    #[error("invalid key prefix: {0}")]
    InvalidKeyPrefix(String),

    /// A cache expiry failed validation.
    #[error("invalid cache TTL: {0}")]
    InvalidTtl(String),
}

impl WebCacheError {
    /// Returns true if retrying the whole call could plausibly succeed.
    ///
    /// Fetch and store failures are transient from the caller's point of
    /// view; validation failures and corrupt counters are not.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            WebCacheError::Fetch { .. }
                | WebCacheError::FetchStatus { .. }
                | WebCacheError::Store { .. }
        )
    }

    /// Returns true if this error came from a cancelled or timed-out fetch.
    pub fn is_cancelled(&self) -> bool {
        matches!(self, WebCacheError::Fetch { cancelled: true, .. })
    }

    /// Returns true if the key-value store (rather than the fetch function)
    /// failed.
    pub fn is_store_error(&self) -> bool {
        matches!(self, WebCacheError::Store { .. })
    }
}
