//! Constants shared by the key resolver and the cache layer.
//!
//! The key tokens are part of the observable key format: changing any of them
//! changes every derived key.

// ═══════════════════════════════════════════════════════════════════════════════
// CACHE DEFAULTS
// ═══════════════════════════════════════════════════════════════════════════════

/// Number of entries a freshly created cache holds before evicting.
pub const DEFAULT_CAPACITY: usize = 1000;

// ═══════════════════════════════════════════════════════════════════════════════
// KEY TOKENS
// ═══════════════════════════════════════════════════════════════════════════════

/// Key for a call made with no arguments.
///
/// Cannot be produced by any serialized argument: strings are always quoted and
/// no other token starts with `<`.
pub const NO_ARGS_KEY: &str = "<no-args>";

/// Token for an absent value.
pub const UNDEFINED_TOKEN: &str = "undefined";

/// Token for an explicit no-value marker.
pub const NULL_TOKEN: &str = "null";

/// Separator between top-level arguments.
pub const ARG_SEPARATOR: char = '/';

/// Separator between elements of a sequence or entries of a map.
pub const ELEMENT_SEPARATOR: char = ',';

/// Separator between a map key and its value.
pub const ENTRY_SEPARATOR: char = ':';
