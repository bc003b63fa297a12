//! The owning bencode tree value.

use core::fmt;
use std::collections::BTreeMap;

use bstr::{BString, ByteSlice};

use crate::{
    events::{EventConsumer, EventProducer},
    kind::Kind,
    view::BView,
};

/// Map type backing [`Value::Dict`]; keys iterate in sorted order, which is
/// what canonical encoding wants.
pub type Dict = BTreeMap<BString, Value>;

/// A materialized bencode value.
///
/// Unlike a view, a `Value` owns its payload and outlives the buffer it was
/// decoded from. Replacing a value's payload is plain assignment: the old
/// payload is dropped.
///
/// # Examples
///
/// ```
/// use bencodec::Value;
///
/// let mut value = Value::from("spam");
/// assert_eq!(value.as_bytes().map(|b| b.as_ref()), Some(b"spam".as_slice()));
///
/// value = Value::Integer(7);
/// assert_eq!(value.as_integer(), Some(7));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub enum Value {
    /// A signed 64-bit integer.
    Integer(i64),
    /// A byte string; not necessarily valid UTF-8.
    Bytes(BString),
    /// An ordered list of values.
    List(Vec<Value>),
    /// A dictionary with byte string keys.
    Dict(Dict),
}

impl Value {
    /// Creates a byte string value from a UTF-8 string.
    #[must_use]
    pub fn string(s: &str) -> Self {
        Value::Bytes(BString::from(s))
    }

    /// The kind of this value.
    #[must_use]
    pub fn kind(&self) -> Kind {
        match self {
            Value::Integer(_) => Kind::Integer,
            Value::Bytes(_) => Kind::String,
            Value::List(_) => Kind::List,
            Value::Dict(_) => Kind::Dict,
        }
    }

    /// Returns `true` if the value is an integer.
    #[must_use]
    pub fn is_integer(&self) -> bool {
        matches!(self, Value::Integer(_))
    }

    /// Returns `true` if the value is a byte string.
    #[must_use]
    pub fn is_bytes(&self) -> bool {
        matches!(self, Value::Bytes(_))
    }

    /// Returns `true` if the value is a list.
    #[must_use]
    pub fn is_list(&self) -> bool {
        matches!(self, Value::List(_))
    }

    /// Returns `true` if the value is a dict.
    #[must_use]
    pub fn is_dict(&self) -> bool {
        matches!(self, Value::Dict(_))
    }

    /// The integer payload, if this is an integer.
    #[must_use]
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Value::Integer(v) => Some(*v),
            _ => None,
        }
    }

    /// The byte string payload, if this is a byte string.
    #[must_use]
    pub fn as_bytes(&self) -> Option<&BString> {
        match self {
            Value::Bytes(b) => Some(b),
            _ => None,
        }
    }

    /// The payload as UTF-8, if this is a byte string holding valid UTF-8.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Bytes(b) => b.to_str().ok(),
            _ => None,
        }
    }

    /// The list payload, if this is a list.
    #[must_use]
    pub fn as_list(&self) -> Option<&Vec<Value>> {
        match self {
            Value::List(l) => Some(l),
            _ => None,
        }
    }

    /// Mutable access to the list payload.
    #[must_use]
    pub fn as_list_mut(&mut self) -> Option<&mut Vec<Value>> {
        match self {
            Value::List(l) => Some(l),
            _ => None,
        }
    }

    /// The dict payload, if this is a dict.
    #[must_use]
    pub fn as_dict(&self) -> Option<&Dict> {
        match self {
            Value::Dict(d) => Some(d),
            _ => None,
        }
    }

    /// Mutable access to the dict payload.
    #[must_use]
    pub fn as_dict_mut(&mut self) -> Option<&mut Dict> {
        match self {
            Value::Dict(d) => Some(d),
            _ => None,
        }
    }
}

// Human-readable rendering; byte strings print lossily. The wire form comes
// from `encode`, not from here.
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Integer(v) => write!(f, "{v}"),
            Value::Bytes(b) => write!(f, "\"{b}\""),
            Value::List(items) => {
                f.write_str("[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{item}")?;
                }
                f.write_str("]")
            }
            Value::Dict(map) => {
                f.write_str("{")?;
                for (i, (key, value)) in map.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "\"{key}\": {value}")?;
                }
                f.write_str("}")
            }
        }
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Integer(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::string(v)
    }
}

impl From<&[u8]> for Value {
    fn from(v: &[u8]) -> Self {
        Value::Bytes(BString::from(v))
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Bytes(BString::from(v))
    }
}

impl From<BString> for Value {
    fn from(v: BString) -> Self {
        Value::Bytes(v)
    }
}

impl From<Vec<Value>> for Value {
    fn from(v: Vec<Value>) -> Self {
        Value::List(v)
    }
}

impl From<Dict> for Value {
    fn from(v: Dict) -> Self {
        Value::Dict(v)
    }
}

impl EventProducer for Value {
    fn connect<C: EventConsumer>(&self, consumer: &mut C) -> Result<(), C::Error> {
        match self {
            Value::Integer(v) => consumer.integer(*v),
            Value::Bytes(b) => consumer.string(b.as_slice()),
            Value::List(items) => {
                consumer.begin_list(Some(items.len()))?;
                for item in items {
                    item.connect(consumer)?;
                    consumer.list_item()?;
                }
                consumer.end_list(Some(items.len()))
            }
            Value::Dict(map) => {
                consumer.begin_dict(Some(map.len()))?;
                for (key, value) in map {
                    consumer.string(key.as_slice())?;
                    consumer.dict_key()?;
                    value.connect(consumer)?;
                    consumer.dict_value()?;
                }
                consumer.end_dict(Some(map.len()))
            }
        }
    }
}

// Structural comparison against a view, without materializing either side.
// Dict entries are matched by key lookup rather than position, so a view
// with non-canonical key order still compares equal to its built value.
// Views with duplicate keys carry more pairs than any map and never match.
impl PartialEq<BView<'_>> for Value {
    fn eq(&self, other: &BView<'_>) -> bool {
        match self {
            Value::Integer(v) => other.as_integer().is_some_and(|iv| iv.value() == *v),
            Value::Bytes(b) => other.as_string().is_some_and(|sv| sv.as_bytes() == b.as_slice()),
            Value::List(items) => other.as_list().is_some_and(|lv| {
                lv.len() == items.len() && items.iter().zip(lv.iter()).all(|(a, b)| *a == b)
            }),
            Value::Dict(map) => other.as_dict().is_some_and(|dv| {
                dv.len() == map.len()
                    && map
                        .iter()
                        .all(|(key, value)| dv.get(key.as_slice()).is_some_and(|v| *value == v))
            }),
        }
    }
}

impl PartialEq<Value> for BView<'_> {
    fn eq(&self, other: &Value) -> bool {
        other == self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decode_view;

    #[test]
    fn accessors() {
        let value = Value::from("spam");
        assert_eq!(value.kind(), Kind::String);
        assert_eq!(value.as_str(), Some("spam"));
        assert_eq!(value.as_integer(), None);

        let mut list = Value::List(vec![Value::Integer(1)]);
        list.as_list_mut().unwrap().push(Value::Integer(2));
        assert_eq!(list.as_list().unwrap().len(), 2);
    }

    #[test]
    fn replacement_discards_the_old_payload() {
        let mut value = Value::List(vec![Value::Integer(1), Value::Integer(2)]);
        value = Value::Integer(0);
        assert_eq!(value, Value::Integer(0));
    }

    #[test]
    fn display_renders_readably() {
        let value = crate::decode_value(b"d1:al1:xi7ee1:zi-1ee").unwrap();
        assert_eq!(value.to_string(), r#"{"a": ["x", 7], "z": -1}"#);
    }

    #[test]
    fn view_comparison_ignores_key_order() {
        let table = decode_view(b"d1:zi1e1:ai2ee").unwrap();
        let value = crate::to_value(&table.root()).unwrap();
        assert!(value == table.root());
        assert!(table.root() == value);

        // A duplicate key collapses in the map, so the pair counts differ.
        let duplicated = decode_view(b"d1:ai1e1:ai2ee").unwrap();
        let collapsed = crate::to_value(&duplicated.root()).unwrap();
        assert_eq!(collapsed.as_dict().unwrap().len(), 1);
        assert!(collapsed != duplicated.root());
    }

    #[test]
    fn compares_against_views() {
        let table = decode_view(b"d1:al1:x1:yee").unwrap();
        let mut dict = Dict::new();
        dict.insert(
            BString::from("a"),
            Value::List(vec![Value::from("x"), Value::from("y")]),
        );
        let value = Value::Dict(dict);
        assert!(value == table.root());

        let other = decode_view(b"i7e").unwrap();
        assert!(value != other.root());
        assert!(other.root() == Value::Integer(7));
    }
}
