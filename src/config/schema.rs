#![forbid(unsafe_code)]

//! Record shapes declared in configuration
//!
//! Field types are written as small type expressions such as `string`,
//! `list<optional<Item>>` or `map<string, u32>`. Record names may refer to any
//! record of the same schema, including the record itself.

use std::collections::BTreeMap;

use super::fieldrules_toml::{FieldConfig, RecordConfig};
use crate::error::SchemaError;
use crate::model::{FieldShape, FloatWidth, IntWidth, RecordRef, RecordShape, Shape, UintWidth};

/// Records built from configuration, ready for validation
#[derive(Debug, Clone)]
pub struct Schema {
    records: BTreeMap<String, RecordRef>,
}

impl Schema {
    /// Builds every record, resolving record names between them
    ///
    /// # Errors
    ///
    /// Returns a [`SchemaError`] for malformed type expressions, unknown
    /// record names, unsupported map keys and duplicate field names.
    pub fn build(records: &BTreeMap<String, RecordConfig>) -> Result<Self, SchemaError> {
        let handles: BTreeMap<String, RecordRef> = records
            .keys()
            .map(|name| (name.clone(), RecordRef::pending(name)))
            .collect();

        for (name, record) in records {
            let mut shape = RecordShape::new(name.as_str());
            for field in &record.fields {
                if shape.position(&field.name).is_some() {
                    return Err(SchemaError::DuplicateField {
                        record: name.clone(),
                        field: field.name.clone(),
                    });
                }
                shape.push(field_shape(field, &handles)?);
            }
            if let Some(handle) = handles.get(name) {
                handle.define(shape);
            }
        }

        Ok(Self { records: handles })
    }

    /// The shape of a declared record
    pub fn record(&self, name: &str) -> Option<Shape> {
        self.records.get(name).cloned().map(Shape::Record)
    }

    /// Declared record names, sorted
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.records.keys().map(String::as_str)
    }
}

fn field_shape(
    field: &FieldConfig,
    records: &BTreeMap<String, RecordRef>,
) -> Result<FieldShape, SchemaError> {
    let mut shape = FieldShape::new(field.name.as_str(), parse_type(&field.type_expr, records)?)
        .rules(field.rules.as_str())
        .inner(field.inner.as_str());
    if let Some(json) = &field.json {
        shape = shape.json(json.as_str());
    }
    if let Some(form) = &field.form {
        shape = shape.form(form.as_str());
    }
    Ok(shape)
}

/// Parses a type expression, resolving record names through `records`
///
/// # Errors
///
/// Returns a [`SchemaError`] when the expression cannot be parsed or names
/// an unknown record.
pub fn parse_type(expr: &str, records: &BTreeMap<String, RecordRef>) -> Result<Shape, SchemaError> {
    let trimmed = expr.trim();
    let malformed = |message: &str| SchemaError::Malformed {
        expr: expr.to_string(),
        message: message.to_string(),
    };

    if trimmed.is_empty() {
        return Err(malformed("empty type"));
    }

    if let Some((name, rest)) = trimmed.split_once('<') {
        let Some(inner) = rest.strip_suffix('>') else {
            return Err(malformed("missing closing '>'"));
        };
        let args = split_arguments(inner).ok_or_else(|| malformed("unbalanced '<' and '>'"))?;

        return match (name.trim(), args.as_slice()) {
            ("list", [element]) => Ok(Shape::list(parse_type(element, records)?)),
            ("optional", [inner]) => Ok(Shape::optional(parse_type(inner, records)?)),
            ("map", [key, value]) => {
                let key = parse_type(key, records)?;
                if !matches!(key, Shape::Bool | Shape::Int(_) | Shape::Uint(_) | Shape::Str) {
                    return Err(SchemaError::UnsupportedMapKey(expr.to_string()));
                }
                Ok(Shape::map(key, parse_type(value, records)?))
            }
            ("list" | "optional", _) => Err(malformed("expected one type argument")),
            ("map", _) => Err(malformed("expected two type arguments")),
            (other, _) => Err(malformed(&format!("unknown generic type '{other}'"))),
        };
    }
    if trimmed.contains('>') || trimmed.contains(',') {
        return Err(malformed("unexpected '>' or ','"));
    }

    if let Some(shape) = primitive(trimmed) {
        return Ok(shape);
    }
    records
        .get(trimmed)
        .map(|record| Shape::Record(record.clone()))
        .ok_or_else(|| SchemaError::UnknownRecord(trimmed.to_string()))
}

fn primitive(name: &str) -> Option<Shape> {
    let shape = match name {
        "bool" => Shape::Bool,
        "char" => Shape::Char,
        "string" => Shape::Str,
        "date" => Shape::Date,
        "i8" => Shape::Int(IntWidth::I8),
        "i16" => Shape::Int(IntWidth::I16),
        "i32" => Shape::Int(IntWidth::I32),
        "i64" | "int" => Shape::Int(IntWidth::I64),
        "u8" => Shape::Uint(UintWidth::U8),
        "u16" => Shape::Uint(UintWidth::U16),
        "u32" => Shape::Uint(UintWidth::U32),
        "u64" | "uint" => Shape::Uint(UintWidth::U64),
        "f32" => Shape::Float(FloatWidth::F32),
        "f64" | "float" => Shape::Float(FloatWidth::F64),
        _ => return None,
    };
    Some(shape)
}

/// Splits generic arguments on top-level commas
fn split_arguments(inner: &str) -> Option<Vec<&str>> {
    let mut args = Vec::new();
    let mut depth = 0_usize;
    let mut start = 0;

    for (index, c) in inner.char_indices() {
        match c {
            '<' => depth += 1,
            '>' => depth = depth.checked_sub(1)?,
            ',' if depth == 0 => {
                args.push(&inner[start..index]);
                start = index + 1;
            }
            _ => {}
        }
    }
    if depth != 0 {
        return None;
    }
    args.push(&inner[start..]);
    Some(args)
}
