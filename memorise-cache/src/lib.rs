//! Bounded LRU cache with TTL expiry.
//!
//! Default backing store for memoized functions. Least-recently-used ordering
//! comes from the `lru` crate; entry age is checked on every read.

#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms)]

mod cache;
mod config;

pub use cache::{CacheStats, LruTtlCache};
pub use config::CacheConfig;
