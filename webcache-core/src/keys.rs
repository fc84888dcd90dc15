//! Key derivation for the shared store key space.
//!
//! Cache entries and access counters live in the same key-value store. A
//! [`KeyScheme`] pins down the two namespace prefixes and guarantees, by
//! construction, that the two key spaces can never produce the same key.

use crate::constants::{CACHE_KEY_PREFIX, COUNTER_KEY_PREFIX};
use crate::error::{Result, WebCacheError};

/// Derives store keys for cached content and access counters.
///
/// The constructor enforces the one invariant the derivation relies on:
/// neither prefix is a prefix of the other. With that established,
/// `cache_key(u1) == counter_key(u2)` is impossible for any pair of URLs,
/// because the concatenated strings already differ inside the prefix region.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct KeyScheme {
    cache_prefix: String,
    counter_prefix: String,
}

impl KeyScheme {
    /// Creates a key scheme with custom namespace prefixes.
    ///
    /// Fails when either prefix is empty or when one prefix is a prefix of
    /// the other (including equal prefixes), since that would let a crafted
    /// URL collide a counter key with a cache key.
    pub fn new(
        cache_prefix: impl Into<String>,
        counter_prefix: impl Into<String>,
    ) -> Result<Self> {
        let cache_prefix = cache_prefix.into();
        let counter_prefix = counter_prefix.into();

        if cache_prefix.is_empty() {
            return Err(WebCacheError::InvalidKeyPrefix(
                "cache key prefix cannot be empty".into(),
            ));
        }
        if counter_prefix.is_empty() {
            return Err(WebCacheError::InvalidKeyPrefix(
                "counter key prefix cannot be empty".into(),
            ));
        }
        if cache_prefix.starts_with(&counter_prefix) || counter_prefix.starts_with(&cache_prefix) {
            return Err(WebCacheError::InvalidKeyPrefix(format!(
                "prefixes '{}' and '{}' overlap: one is a prefix of the other",
                cache_prefix, counter_prefix
            )));
        }

        Ok(Self {
            cache_prefix,
            counter_prefix,
        })
    }

    /// Returns the store key holding the cached content for `url`.
    pub fn cache_key(&self, url: &str) -> String {
        format!("{}{}", self.cache_prefix, url)
    }

    /// Returns the store key holding the access counter for `url`.
    pub fn counter_key(&self, url: &str) -> String {
        format!("{}{}", self.counter_prefix, url)
    }

    /// The namespace prefix for cached content.
    pub fn cache_prefix(&self) -> &str {
        &self.cache_prefix
    }

    /// The namespace prefix for access counters.
    pub fn counter_prefix(&self) -> &str {
        &self.counter_prefix
    }
}

impl Default for KeyScheme {
    fn default() -> Self {
        Self {
            cache_prefix: CACHE_KEY_PREFIX.to_string(),
            counter_prefix: COUNTER_KEY_PREFIX.to_string(),
        }
    }
}
