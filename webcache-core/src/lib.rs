//! # webcache core
//!
//! Shared foundation for the webcache crates: the error type, the traits the
//! collaborators implement, and the key scheme that namespaces cache entries
//! and access counters inside a shared key-value store.
//!
//! This crate performs no I/O. Store backends live in `webcache-store`, the
//! HTTP fetch function and the cached fetcher in `webcache-fetcher`.
//!
//! ## Example
//!
//! ```rust
//! use webcache_core::KeyScheme;
//!
//! let keys = KeyScheme::default();
//! assert_eq!(keys.cache_key("http://example.test/page"), "result:http://example.test/page");
//! assert_eq!(keys.counter_key("http://example.test/page"), "count:http://example.test/page");
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms, clippy::all)]

pub mod constants;
pub mod error;
pub mod keys;
pub mod traits;

// Re-export commonly used items at crate root
pub use constants::*;
pub use error::{Result, StoreOperation, WebCacheError};
pub use keys::KeyScheme;
pub use traits::{KeyValueStore, PageFetcher};
