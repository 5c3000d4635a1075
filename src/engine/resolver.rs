#![forbid(unsafe_code)]

//! Field lookup by dotted path
//!
//! Paths address other data from inside a rule:
//!
//! - `password` or `items.1.name` resolve from the root value
//! - `.name` resolves against the container of the field under validation
//! - `..name` goes one container further up, and so on
//! - `""` is the root itself and `.` is the current container
//!
//! Relativity is the number of leading dots, so an empty path never counts
//! as relative.
//!
//! A lookup that reaches an unset reference keeps resolving by type, so the
//! caller still learns the declared shape of a field that has no value.

use crate::locator::Locator;
use crate::model::{Shape, Value, decode_key};

use super::path_stack::PathStack;

/// Splits a path into its relativity (leading dots) and field segments
///
/// Returns None when a segment after the leading dots is empty.
fn split_path(path: &str) -> Option<(usize, Vec<&str>)> {
    let path = path.trim();
    let rest = path.trim_start_matches('.');
    let relativity = path.len() - rest.len();

    if rest.is_empty() {
        return Some((relativity, Vec::new()));
    }

    let mut parts = Vec::new();
    for part in rest.split('.') {
        let part = part.trim();
        if part.is_empty() {
            return None;
        }
        parts.push(part);
    }
    Some((relativity, parts))
}

/// Resolves `path` from the position described by `stack`
///
/// # Arguments
///
/// * `root` - The locator of the value the validation started from
/// * `stack` - The ancestry of the field under validation
/// * `path` - Dotted path, relative when it starts with `.`
///
/// # Returns
///
/// The located field, or None when the path does not exist
pub fn resolve<'a>(root: Locator<'a>, stack: &PathStack<'a>, path: &str) -> Option<Locator<'a>> {
    let (relativity, parts) = split_path(path)?;

    if relativity == 0 || stack.is_empty() || relativity > stack.len() {
        return resolve_from(root, &parts);
    }

    let element = stack.elements()[stack.len() - relativity];
    resolve_from(element.container, &parts)
}

/// Resolves `parts` below an already located value or type
pub fn resolve_from<'a>(start: Locator<'a>, parts: &[&str]) -> Option<Locator<'a>> {
    match start {
        Locator::Bound(shape, value) => by_value(shape, value, parts),
        Locator::TypeOnly(shape) => by_type(shape, parts),
    }
}

fn by_value<'a>(shape: &'a Shape, value: &'a Value, parts: &[&str]) -> Option<Locator<'a>> {
    let Some((part, rest)) = parts.split_first() else {
        return Some(Locator::Bound(shape, value));
    };

    let mut located = Locator::Bound(shape, value);
    if !located.unwrap_references() {
        return by_type(located.shape(), parts);
    }
    let (shape, value) = match located {
        Locator::Bound(shape, value) => (shape, value),
        Locator::TypeOnly(shape) => return by_type(shape, parts),
    };

    match (shape, value) {
        (Shape::Record(handle), Value::Record(values)) => {
            let record = handle.get()?;
            let position = record.position(part)?;
            let field = &record.fields()[position];
            match values.get(position) {
                Some(child) => by_value(field.shape(), child, rest),
                None => by_type(field.shape(), rest),
            }
        }
        (Shape::List(element), Value::List(items)) => {
            let index: usize = part.parse().ok()?;
            if items.is_empty() {
                return by_type(element, rest);
            }
            by_value(element, items.get(index)?, rest)
        }
        (Shape::Map { key, value: entry }, Value::Map(entries)) => {
            let wanted = decode_key(key, part)?;
            match entries.iter().find(|(candidate, _)| candidate.loosely_equals(&wanted)) {
                Some((_, child)) => by_value(entry, child, rest),
                None => by_type(entry, rest),
            }
        }
        _ => None,
    }
}

fn by_type<'a>(shape: &'a Shape, parts: &[&str]) -> Option<Locator<'a>> {
    let Some((part, rest)) = parts.split_first() else {
        return Some(Locator::TypeOnly(shape));
    };

    match shape.pointee() {
        Shape::Record(handle) => {
            let record = handle.get()?;
            let position = record.position(part)?;
            by_type(record.fields()[position].shape(), rest)
        }
        _ => None,
    }
}
