//! # memorise core
//!
//! Argument model, key resolver and cache traits shared by the memorise crates.
//!
//! - **Types**: [`Arg`] and the [`ToArg`] / [`ToArgs`] conversions
//! - **Key**: the default cache-key algorithm ([`cache_key`], [`resolve_key`])
//! - **Traits**: [`BoundedCache`], the contract a backing cache must honour
//! - **Errors**: configuration and parsing errors
//!
//! ## Example
//!
//! ```rust
//! use memorise_core::{resolve_key, NO_ARGS_KEY};
//!
//! assert_eq!(resolve_key(&()), NO_ARGS_KEY);
//! assert_eq!(resolve_key(&(1u32, "a")), "1/\"a\"");
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms, clippy::all)]

pub mod constants;
pub mod error;
pub mod key;
pub mod traits;
pub mod types;

// Re-export commonly used items at crate root
pub use constants::*;
pub use error::{MemoriseError, Result};
pub use key::{cache_key, resolve_key};
pub use traits::*;
pub use types::*;
