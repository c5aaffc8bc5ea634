//! Argument types for memorise.
//!
//! - [`Arg`]: tagged argument value consumed by the key resolver
//! - [`ToArg`] / [`ToArgs`]: conversions from ordinary Rust values

mod arg;

pub use arg::*;
