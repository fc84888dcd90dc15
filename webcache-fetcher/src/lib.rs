//! # webcache Fetcher
//!
//! Counted, TTL-cached URL fetching.
//!
//! [`CachedFetcher`] wraps any [`PageFetcher`] with a key-value cache and
//! a per-URL access counter. Every call counts as an access, whether the
//! content comes from the cache or from upstream. [`HttpFetcher`] is the
//! production fetcher, a single GET per call over `reqwest`.
//!
//! ## Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use webcache_fetcher::{CachedFetcher, HttpFetcher};
//! use webcache_store::MemoryStore;
//!
//! let cached = CachedFetcher::new(
//!     Arc::new(MemoryStore::new()),
//!     Arc::new(HttpFetcher::new()),
//! );
//!
//! let outcome = cached.fetch_with_stats("http://example.test/").await?;
//! println!("{} bytes, access #{}", outcome.body.len(), outcome.access_count);
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms)]

mod cached;
mod http;

pub use cached::{CachedFetcher, FetchOutcome, FetcherConfig};
pub use http::{HttpConfig, HttpFetcher};

// Re-export the fetch trait from core
pub use webcache_core::traits::PageFetcher;
