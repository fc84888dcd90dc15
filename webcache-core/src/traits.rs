//! Common traits for webcache.
//!
//! These traits define the two collaborators of the cached fetcher, enabling
//! pluggable backends and testing with stubs.

use std::time::Duration;

use async_trait::async_trait;

use crate::error::Result;

// ═══════════════════════════════════════════════════════════════════════════════
// KEY-VALUE STORE TRAIT
// ═══════════════════════════════════════════════════════════════════════════════

/// Interface to an external key-value store.
///
/// The cached fetcher only needs three primitives, all of which the store
/// must provide atomically. Implementations might use:
/// - In-memory storage (for testing/development)
/// - Redis (the production backend)
///
/// Expiry is the store's responsibility: once a value written with
/// [`set_with_expiry`](KeyValueStore::set_with_expiry) ages past its TTL,
/// [`get`](KeyValueStore::get) must report it absent.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Reads the value at `key`.
    ///
    /// Returns `None` when the key was never written or its TTL has elapsed.
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>>;

    /// Writes `value` at `key`, replacing any previous value, valid for
    /// `ttl` from now.
    ///
    /// `ttl` must be at least one millisecond; Redis cannot represent
    /// anything shorter.
    async fn set_with_expiry(&self, key: &str, value: Vec<u8>, ttl: Duration) -> Result<()>;

    /// Atomically increments the integer at `key` by one and returns the new
    /// value.
    ///
    /// An absent key is created at 0 and then incremented. A key holding a
    /// non-integer value is an error.
    async fn increment(&self, key: &str) -> Result<i64>;
}

// ═══════════════════════════════════════════════════════════════════════════════
// PAGE FETCHER TRAIT
// ═══════════════════════════════════════════════════════════════════════════════

/// Interface for the injected URL → content operation.
///
/// The production implementation performs an HTTP GET; tests inject stubs.
/// URL well-formedness is this function's concern. The cached fetcher only
/// rejects empty URLs.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// Fetches the content behind `url`.
    ///
    /// Implementations must honor their configured deadline: a timed-out or
    /// cancelled fetch fails with [`WebCacheError::Fetch`] and
    /// `cancelled == true`.
    ///
    /// [`WebCacheError::Fetch`]: crate::error::WebCacheError::Fetch
    async fn fetch(&self, url: &str) -> Result<Vec<u8>>;
}
