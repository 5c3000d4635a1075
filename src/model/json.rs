//! Decoding JSON documents into bound values
//!
//! Missing and `null` entries become unset optionals when the declared type
//! allows it and the zero value of the declared type otherwise.

use serde_json::Value as Json;

use super::shape::{RecordShape, Shape};
use super::value::Value;
use crate::error::DecodeError;
use crate::rules::dates;
use crate::types::NamingStyle;

/// Zero values of self-referential records stop here
const MAX_ZERO_DEPTH: usize = 32;

impl Value {
    /// Decodes `json` as a value of `shape`
    ///
    /// Record fields are looked up by their wire (json) name. Keys the record
    /// does not declare are ignored.
    ///
    /// # Errors
    ///
    /// Returns a [`DecodeError`] when the document does not fit the shape.
    pub fn from_json(shape: &Shape, json: &Json) -> Result<Value, DecodeError> {
        decode(shape, json, &mut Vec::new())
    }

    /// The value a missing entry of `shape` takes
    pub fn zero(shape: &Shape) -> Value {
        zero_at(shape, 0)
    }
}

fn zero_at(shape: &Shape, depth: usize) -> Value {
    match shape {
        Shape::Bool => Value::Bool(false),
        Shape::Int(_) => Value::Int(0),
        Shape::Uint(_) => Value::Uint(0),
        Shape::Float(_) => Value::Float(0.0),
        Shape::Char => Value::Char('\0'),
        Shape::Str => Value::Str(String::new()),
        Shape::Date => Value::Date(chrono::DateTime::<chrono::Utc>::default()),
        Shape::List(_) => Value::List(Vec::new()),
        Shape::Map { .. } => Value::Map(Vec::new()),
        Shape::Optional(_) => Value::Optional(None),
        Shape::Record(record) => {
            let Some(record) = record.get() else {
                return Value::Record(Vec::new());
            };
            if depth >= MAX_ZERO_DEPTH {
                return Value::Record(Vec::new());
            }
            Value::Record(
                record
                    .fields()
                    .iter()
                    .map(|field| zero_at(field.shape(), depth + 1))
                    .collect(),
            )
        }
    }
}

fn render_path(path: &[String]) -> String {
    if path.is_empty() {
        "<root>".to_string()
    } else {
        path.join(".")
    }
}

fn json_kind(json: &Json) -> &'static str {
    match json {
        Json::Null => "null",
        Json::Bool(_) => "boolean",
        Json::Number(_) => "number",
        Json::String(_) => "string",
        Json::Array(_) => "array",
        Json::Object(_) => "object",
    }
}

fn mismatch(shape: &Shape, json: &Json, path: &[String]) -> DecodeError {
    DecodeError::TypeMismatch {
        path: render_path(path),
        expected: shape.describe(),
        found: json_kind(json).to_string(),
    }
}

fn out_of_range(shape: &Shape, json: &Json, path: &[String]) -> DecodeError {
    DecodeError::OutOfRange {
        path: render_path(path),
        value: json.to_string(),
        expected: shape.describe(),
    }
}

fn decode(shape: &Shape, json: &Json, path: &mut Vec<String>) -> Result<Value, DecodeError> {
    if let Shape::Optional(inner) = shape {
        return match json {
            Json::Null => Ok(Value::Optional(None)),
            other => Ok(Value::some(decode(inner, other, path)?)),
        };
    }

    if json.is_null() {
        return Ok(Value::zero(shape));
    }

    match shape {
        Shape::Bool => json
            .as_bool()
            .map(Value::Bool)
            .ok_or_else(|| mismatch(shape, json, path)),
        Shape::Int(width) => {
            if !json.is_number() {
                return Err(mismatch(shape, json, path));
            }
            match json.as_i64() {
                Some(number) if width.contains(number) => Ok(Value::Int(number)),
                Some(_) => Err(out_of_range(shape, json, path)),
                None if json.is_u64() => Err(out_of_range(shape, json, path)),
                None => Err(mismatch(shape, json, path)),
            }
        }
        Shape::Uint(width) => {
            if !json.is_number() {
                return Err(mismatch(shape, json, path));
            }
            match json.as_u64() {
                Some(number) if width.contains(number) => Ok(Value::Uint(number)),
                Some(_) => Err(out_of_range(shape, json, path)),
                None if json.is_i64() => Err(out_of_range(shape, json, path)),
                None => Err(mismatch(shape, json, path)),
            }
        }
        Shape::Float(_) => json
            .as_f64()
            .map(Value::Float)
            .ok_or_else(|| mismatch(shape, json, path)),
        Shape::Char => {
            let text = json.as_str().ok_or_else(|| mismatch(shape, json, path))?;
            let mut chars = text.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) => Ok(Value::Char(c)),
                _ => Err(mismatch(shape, json, path)),
            }
        }
        Shape::Str => json
            .as_str()
            .map(|text| Value::Str(text.to_string()))
            .ok_or_else(|| mismatch(shape, json, path)),
        Shape::Date => {
            let parsed = match json {
                Json::String(text) => dates::parse_structured(text),
                Json::Number(number) => number.as_i64().and_then(dates::from_unix),
                _ => None,
            };
            parsed.map(Value::Date).ok_or_else(|| mismatch(shape, json, path))
        }
        Shape::List(element) => {
            let items = json.as_array().ok_or_else(|| mismatch(shape, json, path))?;
            let mut values = Vec::with_capacity(items.len());
            for (index, item) in items.iter().enumerate() {
                path.push(index.to_string());
                let decoded = decode(element, item, path);
                path.pop();
                values.push(decoded?);
            }
            Ok(Value::List(values))
        }
        Shape::Map { key, value } => {
            let object = json.as_object().ok_or_else(|| mismatch(shape, json, path))?;
            let mut entries = Vec::with_capacity(object.len());
            for (raw_key, item) in object {
                let parsed_key = decode_key(key, raw_key).ok_or_else(|| DecodeError::InvalidKey {
                    path: render_path(path),
                    key: raw_key.clone(),
                })?;
                path.push(raw_key.clone());
                let decoded = decode(value, item, path);
                path.pop();
                entries.push((parsed_key, decoded?));
            }
            Ok(Value::Map(entries))
        }
        Shape::Record(record) => {
            let object = json.as_object().ok_or_else(|| mismatch(shape, json, path))?;
            match record.get() {
                Some(record) => decode_record(record, object, path),
                None => Ok(Value::Record(Vec::new())),
            }
        }
        Shape::Optional(inner) => decode(inner, json, path).map(Value::some),
    }
}

fn decode_record(
    record: &RecordShape,
    object: &serde_json::Map<String, Json>,
    path: &mut Vec<String>,
) -> Result<Value, DecodeError> {
    let mut values = Vec::with_capacity(record.fields().len());
    for field in record.fields() {
        let label = field.label(NamingStyle::Json);
        let value = match object.get(label) {
            Some(item) => {
                path.push(label.to_string());
                let decoded = decode(field.shape(), item, path);
                path.pop();
                decoded?
            }
            None => Value::zero(field.shape()),
        };
        values.push(value);
    }
    Ok(Value::Record(values))
}

/// Parses an object key into the declared key type
///
/// Shared with the field resolver, which addresses map entries the same way.
pub fn decode_key(shape: &Shape, raw: &str) -> Option<Value> {
    match shape.pointee() {
        Shape::Bool => match raw {
            "true" => Some(Value::Bool(true)),
            "false" => Some(Value::Bool(false)),
            _ => None,
        },
        Shape::Int(width) => raw
            .parse::<i64>()
            .ok()
            .filter(|number| width.contains(*number))
            .map(Value::Int),
        Shape::Uint(width) => raw
            .parse::<u64>()
            .ok()
            .filter(|number| width.contains(*number))
            .map(Value::Uint),
        Shape::Str => Some(Value::Str(raw.to_string())),
        _ => None,
    }
}
