//! # memorise
//!
//! Memoize sync and async functions over a bounded, time-aware cache.
//!
//! A memoized function resolves a string key from its arguments, returns the
//! cached value when the key is live, and otherwise invokes the original
//! function and stores the result. The default cache holds 1000 entries,
//! evicts the least recently used one when full, and never expires entries
//! unless a time-to-live is configured.
//!
//! - [`memoize`]: infallible functions, `call(args) -> R`
//! - [`try_memoize`]: fallible functions; `Err` results are never stored
//! - [`memoize_async`]: async functions; the pending future itself is stored,
//!   so concurrent callers share one computation and its outcome
//!
//! Arguments are passed as a single value, usually a tuple, and keyed through
//! [`ToArgs`](memorise_core::ToArgs) unless a custom resolver is configured.
//!
//! ## Example
//!
//! ```rust
//! use std::time::Duration;
//! use memorise::{memoize, MemoizeOptions};
//!
//! let lookup = memoize(
//!     |(user, page): (String, u32)| format!("{user}:{page}"),
//!     MemoizeOptions::new()
//!         .capacity(100)
//!         .time_to_live(Duration::from_secs(60)),
//! );
//!
//! assert_eq!(lookup.call(("alice".into(), 1)), "alice:1");
//! assert_eq!(lookup.cache().keys(), vec!["\"alice\"/1".to_string()]);
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms)]

mod memoize;
mod options;

pub use memoize::{memoize, memoize_async, try_memoize, Memoized, Pending};
pub use options::{KeyResolverFn, MemoizeOptions, OnHitFn, SharedCache};

pub use memorise_cache::{CacheConfig, CacheStats, LruTtlCache};
pub use memorise_core::{
    cache_key, resolve_key, Arg, BoundedCache, MemoriseError, ToArg, ToArgs,
};
