//! Argument model used for key derivation.
//!
//! A memoized function takes a single argument value, usually a tuple. Before
//! a key can be derived, that value is lowered into an ordered list of [`Arg`]s:
//!
//! - [`Arg`]: tagged value (absent, null, sequence, keyed map, scalar)
//! - [`ToArg`]: lowers one value into an [`Arg`]
//! - [`ToArgs`]: lowers a whole argument list (tuples, `()`, `Vec<Arg>`)

use std::collections::{BTreeMap, HashMap, VecDeque};
use std::hash::BuildHasher;
use std::rc::Rc;
use std::sync::Arc;

use serde::Serialize;
use serde_json::Value;

use crate::error::Result;

// ═══════════════════════════════════════════════════════════════════════════════
// ARG
// ═══════════════════════════════════════════════════════════════════════════════

/// A single argument, as seen by the key resolver.
#[derive(Clone, Debug, PartialEq)]
pub enum Arg {
    /// Absent value.
    Undefined,
    /// Explicit no-value marker.
    Null,
    /// Ordered sequence; element order is significant.
    Seq(Vec<Arg>),
    /// Keyed mapping; iteration is always in ascending key order.
    Map(BTreeMap<String, Arg>),
    /// Bool, number or string.
    Scalar(Value),
}

impl Arg {
    /// Lowers any serializable value through its JSON representation.
    ///
    /// Fails for values JSON cannot represent, such as maps with non-string keys.
    pub fn from_serialize<T: Serialize + ?Sized>(value: &T) -> Result<Self> {
        Ok(Self::from(serde_json::to_value(value)?))
    }

    /// Builds a string scalar.
    pub fn string(s: impl Into<String>) -> Self {
        Arg::Scalar(Value::String(s.into()))
    }

    /// Returns true for [`Arg::Undefined`] and [`Arg::Null`].
    pub fn is_nullish(&self) -> bool {
        matches!(self, Arg::Undefined | Arg::Null)
    }
}

impl From<Value> for Arg {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => Arg::Null,
            Value::Array(items) => Arg::Seq(items.into_iter().map(Arg::from).collect()),
            Value::Object(map) => {
                Arg::Map(map.into_iter().map(|(k, v)| (k, Arg::from(v))).collect())
            }
            scalar => Arg::Scalar(scalar),
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// TO ARG
// ═══════════════════════════════════════════════════════════════════════════════

/// Conversion of a single value into an [`Arg`].
pub trait ToArg {
    /// Lowers `self` into the key model.
    fn to_arg(&self) -> Arg;
}

impl ToArg for Arg {
    fn to_arg(&self) -> Arg {
        self.clone()
    }
}

impl ToArg for Value {
    fn to_arg(&self) -> Arg {
        Arg::from(self.clone())
    }
}

impl ToArg for () {
    fn to_arg(&self) -> Arg {
        Arg::Undefined
    }
}

impl ToArg for bool {
    fn to_arg(&self) -> Arg {
        Arg::Scalar(Value::Bool(*self))
    }
}

macro_rules! impl_to_arg_number {
    ($($t:ty),*) => {
        $(
            impl ToArg for $t {
                fn to_arg(&self) -> Arg {
                    Arg::from(Value::from(*self))
                }
            }
        )*
    };
}

// Non-finite floats become `Value::Null` and therefore render like `null`.
impl_to_arg_number!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize, f32, f64);

impl ToArg for char {
    fn to_arg(&self) -> Arg {
        Arg::string(self.to_string())
    }
}

impl ToArg for str {
    fn to_arg(&self) -> Arg {
        Arg::string(self)
    }
}

impl ToArg for String {
    fn to_arg(&self) -> Arg {
        Arg::string(self.as_str())
    }
}

impl<T: ToArg> ToArg for Option<T> {
    fn to_arg(&self) -> Arg {
        match self {
            Some(value) => value.to_arg(),
            None => Arg::Null,
        }
    }
}

impl<T: ToArg> ToArg for [T] {
    fn to_arg(&self) -> Arg {
        Arg::Seq(self.iter().map(ToArg::to_arg).collect())
    }
}

impl<T: ToArg, const N: usize> ToArg for [T; N] {
    fn to_arg(&self) -> Arg {
        self.as_slice().to_arg()
    }
}

impl<T: ToArg> ToArg for Vec<T> {
    fn to_arg(&self) -> Arg {
        self.as_slice().to_arg()
    }
}

impl<T: ToArg> ToArg for VecDeque<T> {
    fn to_arg(&self) -> Arg {
        Arg::Seq(self.iter().map(ToArg::to_arg).collect())
    }
}

impl<K: AsRef<str>, V: ToArg> ToArg for BTreeMap<K, V> {
    fn to_arg(&self) -> Arg {
        Arg::Map(
            self.iter()
                .map(|(k, v)| (k.as_ref().to_owned(), v.to_arg()))
                .collect(),
        )
    }
}

impl<K: AsRef<str>, V: ToArg, S: BuildHasher> ToArg for HashMap<K, V, S> {
    fn to_arg(&self) -> Arg {
        Arg::Map(
            self.iter()
                .map(|(k, v)| (k.as_ref().to_owned(), v.to_arg()))
                .collect(),
        )
    }
}

impl<T: ToArg + ?Sized> ToArg for &T {
    fn to_arg(&self) -> Arg {
        (**self).to_arg()
    }
}

impl<T: ToArg + ?Sized> ToArg for Box<T> {
    fn to_arg(&self) -> Arg {
        (**self).to_arg()
    }
}

impl<T: ToArg + ?Sized> ToArg for Arc<T> {
    fn to_arg(&self) -> Arg {
        (**self).to_arg()
    }
}

impl<T: ToArg + ?Sized> ToArg for Rc<T> {
    fn to_arg(&self) -> Arg {
        (**self).to_arg()
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// TO ARGS
// ═══════════════════════════════════════════════════════════════════════════════

/// Conversion of a whole argument list into ordered [`Arg`]s.
///
/// `()` is the empty list. Tuples map position for position, so a
/// single-argument function takes `(x,)`.
pub trait ToArgs {
    /// Lowers the argument list, preserving order.
    fn to_args(&self) -> Vec<Arg>;
}

impl ToArgs for () {
    fn to_args(&self) -> Vec<Arg> {
        Vec::new()
    }
}

impl ToArgs for [Arg] {
    fn to_args(&self) -> Vec<Arg> {
        self.to_vec()
    }
}

impl ToArgs for Vec<Arg> {
    fn to_args(&self) -> Vec<Arg> {
        self.clone()
    }
}

impl<T: ToArgs + ?Sized> ToArgs for &T {
    fn to_args(&self) -> Vec<Arg> {
        (**self).to_args()
    }
}

macro_rules! impl_to_args_tuple {
    ($($name:ident),+) => {
        impl<$($name: ToArg),+> ToArgs for ($($name,)+) {
            #[allow(non_snake_case)]
            fn to_args(&self) -> Vec<Arg> {
                let ($($name,)+) = self;
                vec![$($name.to_arg()),+]
            }
        }
    };
}

impl_to_args_tuple!(A);
impl_to_args_tuple!(A, B);
impl_to_args_tuple!(A, B, C);
impl_to_args_tuple!(A, B, C, D);
impl_to_args_tuple!(A, B, C, D, E);
impl_to_args_tuple!(A, B, C, D, E, F);
impl_to_args_tuple!(A, B, C, D, E, F, G);
impl_to_args_tuple!(A, B, C, D, E, F, G, H);

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_scalars_keep_their_type() {
        assert_eq!(0u8.to_arg(), Arg::Scalar(json!(0)));
        assert_eq!(false.to_arg(), Arg::Scalar(json!(false)));
        assert_eq!("0".to_arg(), Arg::Scalar(json!("0")));
        assert_ne!(0i32.to_arg(), "0".to_arg());
    }

    #[test]
    fn test_option_and_unit() {
        assert_eq!(None::<u32>.to_arg(), Arg::Null);
        assert_eq!(Some(3u32).to_arg(), Arg::Scalar(json!(3)));
        assert_eq!(().to_arg(), Arg::Undefined);
        assert!(Arg::Null.is_nullish());
        assert!(!Arg::string("").is_nullish());
    }

    #[test]
    fn test_non_finite_float_is_null() {
        assert_eq!(f64::NAN.to_arg(), Arg::Null);
        assert_eq!(f64::INFINITY.to_arg(), Arg::Null);
        assert_eq!(1.5f64.to_arg(), Arg::Scalar(json!(1.5)));
    }

    #[test]
    fn test_from_json_value() {
        let arg = Arg::from(json!({"b": [1, null], "a": "x"}));
        let mut expected = BTreeMap::new();
        expected.insert("a".to_string(), Arg::string("x"));
        expected.insert(
            "b".to_string(),
            Arg::Seq(vec![Arg::Scalar(json!(1)), Arg::Null]),
        );
        assert_eq!(arg, Arg::Map(expected));
    }

    #[test]
    fn test_from_serialize() {
        #[derive(Serialize)]
        struct Query<'a> {
            name: &'a str,
            limit: Option<u32>,
        }

        let arg = Arg::from_serialize(&Query { name: "alice", limit: None }).unwrap();
        assert_eq!(arg, Arg::from(json!({"name": "alice", "limit": null})));
    }

    #[test]
    fn test_from_serialize_rejects_non_string_keys() {
        let mut map = HashMap::new();
        map.insert(vec![1u8], 1u8);
        assert!(Arg::from_serialize(&map).is_err());
    }

    #[test]
    fn test_hash_map_and_btree_map_agree() {
        let mut hashed = HashMap::new();
        hashed.insert("z", 1u32);
        hashed.insert("a", 2u32);
        let ordered: BTreeMap<_, _> = hashed.iter().map(|(k, v)| (*k, *v)).collect();
        assert_eq!(hashed.to_arg(), ordered.to_arg());
    }

    #[test]
    fn test_tuple_order_is_preserved() {
        let args = ("test", "the", 1u32).to_args();
        assert_eq!(
            args,
            vec![Arg::string("test"), Arg::string("the"), Arg::Scalar(json!(1))]
        );
        assert!(().to_args().is_empty());
        assert_eq!(((),).to_args(), vec![Arg::Undefined]);
    }

    #[test]
    fn test_nested_sequences() {
        let arg = vec![vec![1u8], vec![]].to_arg();
        assert_eq!(
            arg,
            Arg::Seq(vec![Arg::Seq(vec![Arg::Scalar(json!(1))]), Arg::Seq(vec![])])
        );
    }
}
