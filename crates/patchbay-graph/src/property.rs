//! Typed per-node metadata.
//!
//! Every node carries a [`Properties`] bag: an ordered mapping from string
//! keys to [`PropertyValue`]s, a closed union of the four types the document
//! format can carry. The graph and window layers agree on a handful of
//! well-known keys (see [`keys`]); everything else in the bag is opaque and
//! serialized generically.

use std::collections::BTreeMap;

/// Well-known property keys with documented semantics.
pub mod keys {
    /// Normalized horizontal position in `[0, 1]` (float).
    pub const X: &str = "x";
    /// Normalized vertical position in `[0, 1]` (float).
    pub const Y: &str = "y";
    /// Factory index the node's unit was constructed from (int).
    pub const FACTORY_ID: &str = "factoryId";
    /// Per-factory-index instance counter, 0 for the first unit created from
    /// a given factory entry (int).
    pub const INSTANCE_ID: &str = "instanceId";
    /// Node identity as recorded in the document format (int). Not stored in
    /// the bag itself; the node's [`NodeId`](crate::NodeId) is authoritative.
    pub const NODE_ID: &str = "uid";
}

/// One typed metadata value.
#[derive(Debug, Clone, PartialEq)]
pub enum PropertyValue {
    /// Integer value.
    Int(i64),
    /// Floating-point value.
    Float(f64),
    /// String value.
    Str(String),
    /// Boolean value.
    Bool(bool),
}

impl PropertyValue {
    /// The `type` tag used by the document format.
    pub fn type_tag(&self) -> &'static str {
        match self {
            PropertyValue::Int(_) => "int",
            PropertyValue::Float(_) => "float",
            PropertyValue::Str(_) => "string",
            PropertyValue::Bool(_) => "bool",
        }
    }

    /// String-encodes the value for the document format.
    pub fn encode(&self) -> String {
        match self {
            PropertyValue::Int(v) => v.to_string(),
            PropertyValue::Float(v) => v.to_string(),
            PropertyValue::Str(v) => v.clone(),
            PropertyValue::Bool(v) => v.to_string(),
        }
    }

    /// Decodes a document-format `type`/`value` pair.
    ///
    /// Returns `None` for unknown tags or values that do not parse as the
    /// tagged type.
    pub fn decode(type_tag: &str, value: &str) -> Option<Self> {
        match type_tag {
            "int" => value.parse().ok().map(PropertyValue::Int),
            "float" => value.parse().ok().map(PropertyValue::Float),
            "string" => Some(PropertyValue::Str(value.to_string())),
            "bool" => value.parse().ok().map(PropertyValue::Bool),
            _ => None,
        }
    }

    /// The value as an integer, when it is one.
    pub fn as_int(&self) -> Option<i64> {
        match self {
            PropertyValue::Int(v) => Some(*v),
            _ => None,
        }
    }

    /// The value as a float. Integers coerce.
    pub fn as_float(&self) -> Option<f64> {
        match self {
            PropertyValue::Float(v) => Some(*v),
            PropertyValue::Int(v) => Some(*v as f64),
            _ => None,
        }
    }

    /// The value as a string slice, when it is one.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            PropertyValue::Str(v) => Some(v),
            _ => None,
        }
    }

    /// The value's truthiness. Booleans read directly, integers are truthy
    /// when non-zero; other types have none.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            PropertyValue::Bool(v) => Some(*v),
            PropertyValue::Int(v) => Some(*v != 0),
            _ => None,
        }
    }
}

impl From<i64> for PropertyValue {
    fn from(v: i64) -> Self {
        PropertyValue::Int(v)
    }
}

impl From<f64> for PropertyValue {
    fn from(v: f64) -> Self {
        PropertyValue::Float(v)
    }
}

impl From<&str> for PropertyValue {
    fn from(v: &str) -> Self {
        PropertyValue::Str(v.to_string())
    }
}

impl From<String> for PropertyValue {
    fn from(v: String) -> Self {
        PropertyValue::Str(v)
    }
}

impl From<bool> for PropertyValue {
    fn from(v: bool) -> Self {
        PropertyValue::Bool(v)
    }
}

/// Ordered string-keyed bag of typed metadata.
///
/// Iteration (and therefore serialization) order is lexicographic by key, so
/// documents are deterministic.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Properties {
    entries: BTreeMap<String, PropertyValue>,
}

impl Properties {
    /// Creates an empty bag.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a value, replacing any previous value under the key.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<PropertyValue>) {
        self.entries.insert(key.into(), value.into());
    }

    /// Looks up a value.
    pub fn get(&self, key: &str) -> Option<&PropertyValue> {
        self.entries.get(key)
    }

    /// Whether the key is present.
    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Removes a value, returning it if present.
    pub fn remove(&mut self, key: &str) -> Option<PropertyValue> {
        self.entries.remove(key)
    }

    /// Iterates entries in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &PropertyValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the bag is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
