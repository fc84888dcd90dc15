//! Counted, TTL-cached fetching.
//!
//! The fetch path is deliberately small: bump the URL's access counter,
//! consult the cache, fall through to the real fetcher on a miss, store
//! what came back with a TTL. All state lives in the key-value store, so
//! any number of processes can share one cache and one set of counters.

use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use webcache_core::constants::{CACHE_KEY_PREFIX, COUNTER_KEY_PREFIX, DEFAULT_TTL_SECONDS};
use webcache_core::error::{Result, WebCacheError};
use webcache_core::keys::KeyScheme;
use webcache_core::traits::{KeyValueStore, PageFetcher};

/// Smallest accepted expiry. Redis cannot represent a TTL below one
/// millisecond.
const MIN_TTL: Duration = Duration::from_millis(1);

/// Cached fetcher configuration.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct FetcherConfig {
    /// How long cached content stays valid, in seconds.
    pub ttl_seconds: u64,
    /// Key namespace prefix for cached content.
    pub cache_key_prefix: String,
    /// Key namespace prefix for access counters.
    pub counter_key_prefix: String,
}

impl Default for FetcherConfig {
    fn default() -> Self {
        Self {
            ttl_seconds: DEFAULT_TTL_SECONDS,
            cache_key_prefix: CACHE_KEY_PREFIX.to_string(),
            counter_key_prefix: COUNTER_KEY_PREFIX.to_string(),
        }
    }
}

impl FetcherConfig {
    /// Sets how long cached content stays valid.
    pub fn with_ttl_seconds(mut self, ttl_seconds: u64) -> Self {
        self.ttl_seconds = ttl_seconds;
        self
    }

    /// Sets the key namespace prefixes.
    pub fn with_prefixes(
        mut self,
        cache_prefix: impl Into<String>,
        counter_prefix: impl Into<String>,
    ) -> Self {
        self.cache_key_prefix = cache_prefix.into();
        self.counter_key_prefix = counter_prefix.into();
        self
    }
}

/// What a cached fetch produced and where the content came from.
#[derive(Clone, Debug)]
pub struct FetchOutcome {
    /// The URL that was requested.
    pub url: String,
    /// The content body.
    pub body: Vec<u8>,
    /// True when the body came from the cache rather than upstream.
    pub from_cache: bool,
    /// The access count for this URL as observed by this call.
    pub access_count: i64,
}

/// Fetches URLs through a key-value cache, counting every access.
///
/// The counter is bumped before the cache is consulted, so it reflects
/// demand rather than upstream load: hits, misses, and calls whose fetch
/// later fails all count. Failures pass through unchanged; nothing is
/// cached, rolled back, or retried on the way up.
///
/// Concurrent calls for the same missing URL each fetch upstream. The
/// writes race, but every writer stores what it fetched, so the cache
/// ends up with one valid copy either way.
pub struct CachedFetcher {
    store: Arc<dyn KeyValueStore>,
    fetcher: Arc<dyn PageFetcher>,
    keys: KeyScheme,
    ttl: Duration,
}

impl CachedFetcher {
    /// Creates a cached fetcher with the default configuration.
    pub fn new(store: Arc<dyn KeyValueStore>, fetcher: Arc<dyn PageFetcher>) -> Self {
        Self {
            store,
            fetcher,
            keys: KeyScheme::default(),
            ttl: Duration::from_secs(DEFAULT_TTL_SECONDS),
        }
    }

    /// Creates a cached fetcher from a config.
    ///
    /// Fails when the configured key prefixes are empty or could collide,
    /// or when the TTL is zero.
    pub fn with_config(
        store: Arc<dyn KeyValueStore>,
        fetcher: Arc<dyn PageFetcher>,
        config: FetcherConfig,
    ) -> Result<Self> {
        let keys = KeyScheme::new(&config.cache_key_prefix, &config.counter_key_prefix)?;
        let ttl = validate_ttl(Duration::from_secs(config.ttl_seconds))?;

        Ok(Self {
            store,
            fetcher,
            keys,
            ttl,
        })
    }

    /// Overrides the TTL applied to newly cached content.
    ///
    /// Fails when `ttl` is below one millisecond.
    pub fn with_ttl(mut self, ttl: Duration) -> Result<Self> {
        self.ttl = validate_ttl(ttl)?;
        Ok(self)
    }

    /// The TTL applied to newly cached content.
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// The key scheme in use.
    pub fn key_scheme(&self) -> &KeyScheme {
        &self.keys
    }

    /// Fetches `url` through the cache and returns its content.
    ///
    /// Every call counts as an access, cache hit or not.
    pub async fn fetch(&self, url: &str) -> Result<Vec<u8>> {
        self.fetch_with_stats(url).await.map(|outcome| outcome.body)
    }

    /// Fetches `url` through the cache, reporting where the content came
    /// from and the access count this call observed.
    #[instrument(skip(self))]
    pub async fn fetch_with_stats(&self, url: &str) -> Result<FetchOutcome> {
        if url.is_empty() {
            return Err(WebCacheError::InvalidUrl("URL cannot be empty".into()));
        }

        // Count the access before looking at the cache. A call whose fetch
        // fails later has still asked for the URL.
        let access_count = self.store.increment(&self.keys.counter_key(url)).await?;

        let cache_key = self.keys.cache_key(url);
        if let Some(body) = self.store.get(&cache_key).await? {
            debug!(url, access_count, "Cache hit");
            return Ok(FetchOutcome {
                url: url.to_string(),
                body,
                from_cache: true,
                access_count,
            });
        }

        debug!(url, access_count, "Cache miss, fetching upstream");
        let body = self.fetcher.fetch(url).await?;

        self.store
            .set_with_expiry(&cache_key, body.clone(), self.ttl)
            .await?;

        Ok(FetchOutcome {
            url: url.to_string(),
            body,
            from_cache: false,
            access_count,
        })
    }

    /// Returns how many times `url` has been requested.
    ///
    /// A URL never requested reports zero.
    #[instrument(skip(self))]
    pub async fn access_count(&self, url: &str) -> Result<i64> {
        let key = self.keys.counter_key(url);

        match self.store.get(&key).await? {
            Some(raw) => {
                let text =
                    std::str::from_utf8(&raw).map_err(|_| WebCacheError::CorruptCounter {
                        key: key.clone(),
                        reason: "value is not valid UTF-8".into(),
                    })?;
                text.trim()
                    .parse()
                    .map_err(|_| WebCacheError::CorruptCounter {
                        key: key.clone(),
                        reason: format!("'{}' is not an integer", text),
                    })
            }
            None => Ok(0),
        }
    }
}

impl std::fmt::Debug for CachedFetcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CachedFetcher")
            .field("keys", &self.keys)
            .field("ttl", &self.ttl)
            .finish()
    }
}

fn validate_ttl(ttl: Duration) -> Result<Duration> {
    if ttl < MIN_TTL {
        return Err(WebCacheError::InvalidTtl(
            "must be at least one millisecond".into(),
        ));
    }
    Ok(ttl)
}
