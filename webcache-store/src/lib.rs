//! # webcache Store
//!
//! Key-value storage backends for webcache.
//!
//! This crate provides two backends implementing the
//! [`KeyValueStore`] trait:
//!
//! - **Memory**: Fast in-process storage for development and testing
//! - **Redis**: Shared storage for anything beyond a single process
//!
//! ## Example
//!
//! ```rust,ignore
//! use std::time::Duration;
//! use webcache_store::{KeyValueStore, MemoryStore};
//!
//! let store = MemoryStore::new();
//!
//! // Cache a value for ten seconds
//! store
//!     .set_with_expiry("result:http://example.test/", b"<html>".to_vec(), Duration::from_secs(10))
//!     .await?;
//!
//! // Count an access
//! let count = store.increment("count:http://example.test/").await?;
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms)]

mod memory;
mod redis;

pub use self::memory::MemoryStore;
pub use self::redis::RedisStore;

// Re-export the trait from core
pub use webcache_core::traits::KeyValueStore;
