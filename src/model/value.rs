//! Bound data values
//!
//! A [`Value`] is only meaningful next to the [`Shape`] it was produced for:
//! record values are positional and carry no field names of their own.

use chrono::{DateTime, Utc};
use std::fmt;

use super::shape::Shape;

/// Date-time layout used whenever a timestamp is printed
pub const DATE_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Bool(bool),
    Int(i64),
    Uint(u64),
    Float(f64),
    Char(char),
    Str(String),
    Date(DateTime<Utc>),
    List(Vec<Value>),
    /// Key/value pairs in insertion order
    Map(Vec<(Value, Value)>),
    /// Field values in declaration order
    Record(Vec<Value>),
    Optional(Option<Box<Value>>),
}

impl Value {
    pub fn some(value: Value) -> Self {
        Value::Optional(Some(Box::new(value)))
    }

    pub fn none() -> Self {
        Value::Optional(None)
    }

    /// Number of elements, entries or characters
    pub fn len(&self) -> Option<usize> {
        match self {
            Value::Str(text) => Some(text.chars().count()),
            Value::List(items) => Some(items.len()),
            Value::Map(entries) => Some(entries.len()),
            _ => None,
        }
    }

    /// Structural equality that ignores numeric representation
    ///
    /// `Int(3)` equals `Uint(3)` and optionals compare by what they point to.
    pub fn loosely_equals(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Optional(Some(a)), b) => a.loosely_equals(b),
            (a, Value::Optional(Some(b))) => a.loosely_equals(b),
            (Value::Optional(None), Value::Optional(None)) => true,
            (Value::Int(a), Value::Uint(b)) | (Value::Uint(b), Value::Int(a)) => {
                u64::try_from(*a).is_ok_and(|a| a == *b)
            }
            (Value::List(a), Value::List(b)) | (Value::Record(a), Value::Record(b)) => {
                a.len() == b.len() && a.iter().zip(b).all(|(x, y)| x.loosely_equals(y))
            }
            (Value::Map(a), Value::Map(b)) => {
                a.len() == b.len()
                    && a.iter().all(|(key, value)| {
                        b.iter()
                            .find(|(other_key, _)| other_key.loosely_equals(key))
                            .is_some_and(|(_, other_value)| other_value.loosely_equals(value))
                    })
            }
            (a, b) => a == b,
        }
    }

    /// JSON encoding, using wire names for record fields
    pub fn to_json(&self, shape: &Shape) -> serde_json::Value {
        use serde_json::Value as Json;

        match (self, shape) {
            (Value::Bool(flag), _) => Json::Bool(*flag),
            (Value::Int(number), _) => Json::from(*number),
            (Value::Uint(number), _) => Json::from(*number),
            (Value::Float(number), _) => serde_json::Number::from_f64(*number)
                .map(Json::Number)
                .unwrap_or(Json::Null),
            (Value::Char(c), _) => Json::String(c.to_string()),
            (Value::Str(text), _) => Json::String(text.clone()),
            (Value::Date(date), _) => Json::String(date.to_rfc3339()),
            (Value::List(items), _) => {
                let element = match shape.pointee() {
                    Shape::List(element) => element.as_ref(),
                    other => other,
                };
                Json::Array(items.iter().map(|item| item.to_json(element)).collect())
            }
            (Value::Map(entries), _) => {
                let value_shape = match shape.pointee() {
                    Shape::Map { value, .. } => value.as_ref(),
                    other => other,
                };
                let object = entries
                    .iter()
                    .map(|(key, value)| (key.to_string(), value.to_json(value_shape)))
                    .collect();
                Json::Object(object)
            }
            (Value::Record(values), _) => {
                let Some(record) = (match shape.pointee() {
                    Shape::Record(record) => record.get(),
                    _ => None,
                }) else {
                    return Json::Array(values.iter().map(|v| v.to_json(shape)).collect());
                };
                let object = record
                    .fields()
                    .iter()
                    .zip(values)
                    .map(|(field, value)| {
                        (
                            field.label(crate::types::NamingStyle::Json).to_string(),
                            value.to_json(field.shape()),
                        )
                    })
                    .collect();
                Json::Object(object)
            }
            (Value::Optional(None), _) => Json::Null,
            (Value::Optional(Some(inner)), shape) => {
                let inner_shape = match shape {
                    Shape::Optional(inner_shape) => inner_shape.as_ref(),
                    other => other,
                };
                inner.to_json(inner_shape)
            }
        }
    }
}

/// Generic textual form used by `:value` and `:other` outside JSON mode
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Bool(flag) => write!(f, "{flag}"),
            Value::Int(number) => write!(f, "{number}"),
            Value::Uint(number) => write!(f, "{number}"),
            Value::Float(number) => write!(f, "{number}"),
            Value::Char(c) => write!(f, "{c}"),
            Value::Str(text) => f.write_str(text),
            Value::Date(date) => write!(f, "{}", date.format(DATE_TIME_FORMAT)),
            Value::List(items) | Value::Record(items) => {
                f.write_str("[")?;
                for (idx, item) in items.iter().enumerate() {
                    if idx > 0 {
                        f.write_str(" ")?;
                    }
                    write!(f, "{item}")?;
                }
                f.write_str("]")
            }
            Value::Map(entries) => {
                f.write_str("{")?;
                for (idx, (key, value)) in entries.iter().enumerate() {
                    if idx > 0 {
                        f.write_str(" ")?;
                    }
                    write!(f, "{key}:{value}")?;
                }
                f.write_str("}")
            }
            Value::Optional(None) => f.write_str("null"),
            Value::Optional(Some(inner)) => write!(f, "{inner}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::shape::{FieldShape, IntWidth, RecordRef, RecordShape};
    use serde_json::json;

    #[test]
    fn test_len() {
        assert_eq!(Value::Str("héllo".into()).len(), Some(5));
        assert_eq!(Value::List(vec![Value::Int(1)]).len(), Some(1));
        assert_eq!(Value::Int(3).len(), None);
    }

    #[test]
    fn test_loosely_equals_crosses_signedness_and_optionals() {
        assert!(Value::Int(3).loosely_equals(&Value::Uint(3)));
        assert!(!Value::Int(-3).loosely_equals(&Value::Uint(3)));
        assert!(Value::some(Value::Str("a".into())).loosely_equals(&Value::Str("a".into())));
        assert!(Value::none().loosely_equals(&Value::none()));
        assert!(!Value::none().loosely_equals(&Value::Str(String::new())));
    }

    #[test]
    fn test_display() {
        let list = Value::List(vec![Value::Int(1), Value::Str("two".into())]);
        assert_eq!(list.to_string(), "[1 two]");
        assert_eq!(Value::none().to_string(), "null");
    }

    #[test]
    fn test_to_json_uses_wire_names() {
        let handle = RecordRef::pending("User");
        handle.define(
            RecordShape::new("User")
                .field(FieldShape::new("user_name", Shape::Str).json("userName"))
                .field(FieldShape::new("age", Shape::optional(Shape::Int(IntWidth::I32)))),
        );
        let shape = Shape::Record(handle);
        let value = Value::Record(vec![Value::Str("ada".into()), Value::none()]);

        assert_eq!(value.to_json(&shape), json!({"userName": "ada", "age": null}));
    }
}
