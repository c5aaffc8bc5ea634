//! Default cache-key resolver.
//!
//! Turns an argument list into a single string. The key is the only identity
//! the cache knows about: argument lists with equal keys are treated as the
//! same call.
//!
//! ## Format
//!
//! | argument            | rendering                            |
//! |---------------------|--------------------------------------|
//! | no arguments at all | `<no-args>`                          |
//! | `Undefined`         | `undefined`                          |
//! | `Null`              | `null`                               |
//! | `Seq`               | `[a,b,...]`                          |
//! | `Map`               | `{"k1":v1,"k2":v2}` in key order     |
//! | `Scalar`            | compact JSON (`0`, `false`, `"0"`)   |
//!
//! Top-level arguments are joined with `/`.
//!
//! ## Collisions
//!
//! Distinct Rust values can lower to the same [`Arg`] and therefore the same
//! key: `None` and `NaN` both become `null`, a `Vec<u8>` and a `[u8; N]` with
//! the same elements are both sequences, and so on. A colliding call is a cache
//! hit. Supply a custom resolver when that is not acceptable.

use serde_json::Value;

use crate::constants::{
    ARG_SEPARATOR, ELEMENT_SEPARATOR, ENTRY_SEPARATOR, NO_ARGS_KEY, NULL_TOKEN, UNDEFINED_TOKEN,
};
use crate::types::{Arg, ToArgs};

/// Derives the key for an argument list.
pub fn cache_key(args: &[Arg]) -> String {
    if args.is_empty() {
        return NO_ARGS_KEY.to_string();
    }

    let mut out = String::new();
    for (i, arg) in args.iter().enumerate() {
        if i > 0 {
            out.push(ARG_SEPARATOR);
        }
        write_arg(&mut out, arg);
    }
    out
}

/// Lowers `args` and derives its key.
pub fn resolve_key<A: ToArgs + ?Sized>(args: &A) -> String {
    cache_key(&args.to_args())
}

fn write_arg(out: &mut String, arg: &Arg) {
    match arg {
        Arg::Undefined => out.push_str(UNDEFINED_TOKEN),
        Arg::Null => out.push_str(NULL_TOKEN),
        Arg::Seq(items) => {
            out.push('[');
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push(ELEMENT_SEPARATOR);
                }
                write_arg(out, item);
            }
            out.push(']');
        }
        Arg::Map(entries) => {
            out.push('{');
            for (i, (key, value)) in entries.iter().enumerate() {
                if i > 0 {
                    out.push(ELEMENT_SEPARATOR);
                }
                out.push_str(&Value::String(key.clone()).to_string());
                out.push(ENTRY_SEPARATOR);
                write_arg(out, value);
            }
            out.push('}');
        }
        Arg::Scalar(value) => out.push_str(&value.to_string()),
    }
}
