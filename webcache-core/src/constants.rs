//! Defaults shared across the webcache crates.

// ═══════════════════════════════════════════════════════════════════════════════
// CACHE BEHAVIOR
// ═══════════════════════════════════════════════════════════════════════════════

/// Default number of seconds a cached page stays valid.
///
/// The cache absorbs request bursts for the same URL; it is not a
/// long-term content store.
pub const DEFAULT_TTL_SECONDS: u64 = 10;

// ═══════════════════════════════════════════════════════════════════════════════
// KEY NAMESPACES
// ═══════════════════════════════════════════════════════════════════════════════
// Cache entries and access counters share one store. Each gets its own
// prefix; `KeyScheme::new` rejects prefix pairs that could ever collide.

/// Namespace prefix for cached page content.
pub const CACHE_KEY_PREFIX: &str = "result:";

/// Namespace prefix for per-URL access counters.
pub const COUNTER_KEY_PREFIX: &str = "count:";

// ═══════════════════════════════════════════════════════════════════════════════
// HTTP
// ═══════════════════════════════════════════════════════════════════════════════

/// Default request timeout for the HTTP fetcher, in seconds.
pub const DEFAULT_HTTP_TIMEOUT_SECONDS: u64 = 30;
