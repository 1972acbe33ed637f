//! Common types used across Actionizer.

use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Named fields of an outcome, or the named arguments of a call.
pub type Fields = serde_json::Map<String, Value>;

/// Arguments handed to an entry point.
pub type Args = Fields;

/// Normalize a field or parameter key to its canonical spelling.
///
/// `":foo"` (symbol style) and `"foo"` name the same key.
pub fn normalize_key(key: &str) -> Cow<'_, str> {
    match key.strip_prefix(':') {
        Some(rest) if !rest.is_empty() => Cow::Owned(rest.to_string()),
        _ => Cow::Borrowed(key),
    }
}

/// Re-key a map so that every key is canonical.
pub fn normalize_fields(fields: Fields) -> Fields {
    fields
        .into_iter()
        .map(|(key, value)| (normalize_key(&key).into_owned(), value))
        .collect()
}

/// Conversion into a set of named fields.
///
/// Conversion never fails: shapes that carry no named entries convert to an
/// empty set.
pub trait IntoFields {
    fn into_fields(self) -> Fields;
}

impl IntoFields for Fields {
    fn into_fields(self) -> Fields {
        normalize_fields(self)
    }
}

impl IntoFields for Value {
    fn into_fields(self) -> Fields {
        match self {
            Value::Object(map) => normalize_fields(map),
            _ => Fields::new(),
        }
    }
}

impl IntoFields for () {
    fn into_fields(self) -> Fields {
        Fields::new()
    }
}

impl<K: AsRef<str>, V: Into<Value>> IntoFields for Vec<(K, V)> {
    fn into_fields(self) -> Fields {
        self.into_iter()
            .map(|(k, v)| (normalize_key(k.as_ref()).into_owned(), v.into()))
            .collect()
    }
}

impl<K: AsRef<str>, V: Into<Value>, const N: usize> IntoFields for [(K, V); N] {
    fn into_fields(self) -> Fields {
        self.into_iter()
            .map(|(k, v)| (normalize_key(k.as_ref()).into_owned(), v.into()))
            .collect()
    }
}

/// Type tag a parameter value can be checked against.
///
/// Tags form a small hierarchy rooted at [`TypeTag::Any`]; `Integer` and
/// `Float` descend from `Numeric`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TypeTag {
    Any,
    Null,
    Boolean,
    Numeric,
    Integer,
    Float,
    String,
    Array,
    Map,
}

impl TypeTag {
    pub const ALL: [TypeTag; 9] = [
        TypeTag::Any,
        TypeTag::Null,
        TypeTag::Boolean,
        TypeTag::Numeric,
        TypeTag::Integer,
        TypeTag::Float,
        TypeTag::String,
        TypeTag::Array,
        TypeTag::Map,
    ];

    /// The runtime tag of a value.
    pub fn of(value: &Value) -> Self {
        match value {
            Value::Null => TypeTag::Null,
            Value::Bool(_) => TypeTag::Boolean,
            Value::Number(n) if n.is_i64() || n.is_u64() => TypeTag::Integer,
            Value::Number(_) => TypeTag::Float,
            Value::String(_) => TypeTag::String,
            Value::Array(_) => TypeTag::Array,
            Value::Object(_) => TypeTag::Map,
        }
    }

    /// The direct ancestor, `None` for the root.
    pub fn parent(&self) -> Option<TypeTag> {
        match self {
            TypeTag::Any => None,
            TypeTag::Integer | TypeTag::Float => Some(TypeTag::Numeric),
            _ => Some(TypeTag::Any),
        }
    }

    /// Returns true if this tag is `ancestor` or one of its descendants.
    pub fn descends_from(&self, ancestor: TypeTag) -> bool {
        let mut current = Some(*self);
        while let Some(tag) = current {
            if tag == ancestor {
                return true;
            }
            current = tag.parent();
        }
        false
    }

    /// Returns true if the runtime tag of `value` descends from this tag.
    pub fn admits(&self, value: &Value) -> bool {
        TypeTag::of(value).descends_from(*self)
    }

    pub fn name(&self) -> &'static str {
        match self {
            TypeTag::Any => "Any",
            TypeTag::Null => "Null",
            TypeTag::Boolean => "Boolean",
            TypeTag::Numeric => "Numeric",
            TypeTag::Integer => "Integer",
            TypeTag::Float => "Float",
            TypeTag::String => "String",
            TypeTag::Array => "Array",
            TypeTag::Map => "Map",
        }
    }
}

impl fmt::Display for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Error returned when a string does not name a [`TypeTag`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownTypeTag(pub String);

impl FromStr for TypeTag {
    type Err = UnknownTypeTag;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TypeTag::ALL
            .iter()
            .copied()
            .find(|tag| tag.name() == s)
            .ok_or_else(|| UnknownTypeTag(s.to_string()))
    }
}
