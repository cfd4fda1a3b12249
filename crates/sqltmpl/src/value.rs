//! Template argument values.
//!
//! [`Value`] is the tagged model every positional argument is converted into
//! before rendering. The [`Value::Skip`] variant is the sentinel that drops
//! the enclosing conditional block.

use crate::error::{TemplateError, TemplateResult};
use indexmap::IndexMap;
use serde::ser::{Serialize, SerializeMap, Serializer};
use std::collections::{BTreeMap, HashMap};

/// JSON key used to spell the skip sentinel in JSON input.
pub const SKIP_JSON_KEY: &str = "$skip";

/// A single positional template argument.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Value {
    /// SQL `NULL`.
    #[default]
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    /// Ordered list of scalars (`?a` value lists, `?#` column lists).
    List(Vec<Value>),
    /// Column name to value mapping; insertion order is preserved in output.
    Map(IndexMap<String, Value>),
    /// Skip sentinel: drops the conditional block holding its placeholder.
    Skip,
}

/// Return the skip sentinel.
pub fn skip() -> Value {
    Value::Skip
}

impl Value {
    /// Short type name used in error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::Str(_) => "string",
            Value::List(_) => "list",
            Value::Map(_) => "map",
            Value::Skip => "skip",
        }
    }

    pub fn is_skip(&self) -> bool {
        matches!(self, Value::Skip)
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Convert a JSON value.
    ///
    /// Objects become [`Value::Map`] (key order kept), arrays become
    /// [`Value::List`], and the object `{"$skip": true}` becomes
    /// [`Value::Skip`].
    pub fn from_json(v: &serde_json::Value) -> TemplateResult<Self> {
        Ok(match v {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(*b),
            serde_json::Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Value::Int(i)
                } else if n.is_u64() {
                    return Err(TemplateError::json(format!(
                        "integer {n} does not fit in i64"
                    )));
                } else if let Some(f) = n.as_f64() {
                    Value::Float(f)
                } else {
                    return Err(TemplateError::json(format!("unsupported number {n}")));
                }
            }
            serde_json::Value::String(s) => Value::Str(s.clone()),
            serde_json::Value::Array(items) => {
                Value::List(items.iter().map(Value::from_json).collect::<TemplateResult<_>>()?)
            }
            serde_json::Value::Object(obj) => {
                if obj.len() == 1 && obj.get(SKIP_JSON_KEY) == Some(&serde_json::Value::Bool(true))
                {
                    return Ok(Value::Skip);
                }
                let mut map = IndexMap::with_capacity(obj.len());
                for (k, v) in obj {
                    map.insert(k.clone(), Value::from_json(v)?);
                }
                Value::Map(map)
            }
        })
    }

    /// Convert a JSON array into an argument list.
    pub fn args_from_json(v: &serde_json::Value) -> TemplateResult<Vec<Value>> {
        match v {
            serde_json::Value::Array(items) => items.iter().map(Value::from_json).collect(),
            other => Err(TemplateError::json(format!(
                "expected a JSON array of arguments, got {}",
                json_kind(other)
            ))),
        }
    }

    /// Parse a JSON document holding an argument array.
    pub fn args_from_json_str(s: &str) -> TemplateResult<Vec<Value>> {
        let json: serde_json::Value = serde_json::from_str(s)?;
        Value::args_from_json(&json)
    }
}

fn json_kind(v: &serde_json::Value) -> &'static str {
    match v {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "bool",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Value::Null => serializer.serialize_unit(),
            Value::Bool(b) => serializer.serialize_bool(*b),
            Value::Int(i) => serializer.serialize_i64(*i),
            Value::Float(f) => serializer.serialize_f64(*f),
            Value::Str(s) => serializer.serialize_str(s),
            Value::List(items) => items.serialize(serializer),
            Value::Map(map) => map.serialize(serializer),
            Value::Skip => {
                let mut m = serializer.serialize_map(Some(1))?;
                m.serialize_entry(SKIP_JSON_KEY, &true)?;
                m.end()
            }
        }
    }
}

macro_rules! impl_from_int {
    ($($t:ty),*) => {
        $(
            impl From<$t> for Value {
                fn from(v: $t) -> Self {
                    Value::Int(i64::from(v))
                }
            }
        )*
    };
}

impl_from_int!(i8, i16, i32, i64, u8, u16, u32);

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<f32> for Value {
    fn from(v: f32) -> Self {
        Value::Float(f64::from(v))
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Str(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Str(v)
    }
}

impl From<&String> for Value {
    fn from(v: &String) -> Self {
        Value::Str(v.clone())
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Value::Null, Into::into)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(v: Vec<T>) -> Self {
        Value::List(v.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Value> + Clone> From<&[T]> for Value {
    fn from(v: &[T]) -> Self {
        Value::List(v.iter().cloned().map(Into::into).collect())
    }
}

impl<K: Into<String>, V: Into<Value>> From<IndexMap<K, V>> for Value {
    fn from(v: IndexMap<K, V>) -> Self {
        Value::Map(v.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

impl<K: Into<String>, V: Into<Value>> From<BTreeMap<K, V>> for Value {
    fn from(v: BTreeMap<K, V>) -> Self {
        Value::Map(v.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

impl<K: Into<String>, V: Into<Value>> From<HashMap<K, V>> for Value {
    fn from(v: HashMap<K, V>) -> Self {
        Value::Map(v.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Value {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Value::Map(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

impl TryFrom<serde_json::Value> for Value {
    type Error = TemplateError;

    fn try_from(v: serde_json::Value) -> TemplateResult<Self> {
        Value::from_json(&v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn json_object_keeps_key_order() {
        let v = Value::from_json(&json!({"zeta": 1, "alpha": "a"})).unwrap();
        let Value::Map(map) = v else {
            panic!("expected map");
        };
        let keys: Vec<&str> = map.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["zeta", "alpha"]);
    }

    #[test]
    fn json_skip_object_is_sentinel() {
        assert_eq!(Value::from_json(&json!({"$skip": true})).unwrap(), Value::Skip);
        // Extra keys make it a regular map.
        let v = Value::from_json(&json!({"$skip": true, "x": 1})).unwrap();
        assert_eq!(v.kind(), "map");
    }

    #[test]
    fn json_numbers() {
        assert_eq!(Value::from_json(&json!(7)).unwrap(), Value::Int(7));
        assert_eq!(Value::from_json(&json!(1.5)).unwrap(), Value::Float(1.5));
        assert!(Value::from_json(&json!(u64::MAX)).is_err());
    }

    #[test]
    fn args_must_be_array() {
        assert!(Value::args_from_json(&json!({"a": 1})).is_err());
        let args = Value::args_from_json_str(r#"[1, "x", null]"#).unwrap();
        assert_eq!(
            args,
            vec![Value::Int(1), Value::Str("x".into()), Value::Null]
        );
    }

    #[test]
    fn skip_serializes_as_marker_object() {
        let s = serde_json::to_string(&Value::Skip).unwrap();
        assert_eq!(s, r#"{"$skip":true}"#);
    }

    #[test]
    fn option_and_vec_conversions() {
        assert_eq!(Value::from(None::<i32>), Value::Null);
        assert_eq!(Value::from(Some("a")), Value::Str("a".into()));
        assert_eq!(
            Value::from(vec![1, 2]),
            Value::List(vec![Value::Int(1), Value::Int(2)])
        );
    }
}
