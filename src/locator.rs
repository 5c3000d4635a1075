#![forbid(unsafe_code)]

//! The value locator: a declared type with an optional bound value
//!
//! Traversal reaches fields that sit behind an unset reference. Those fields
//! still have a declared type, so a [`Locator`] always carries a [`Shape`] and
//! only sometimes a [`Value`]. Rules inspect the field through the typed
//! accessors below, which report a [`Conversion`] failure instead of panicking.

use chrono::{DateTime, Utc};
use std::borrow::Cow;

use crate::model::{Shape, Value};
use crate::rules::dates;
use crate::rules::{Hint, Outcome};

/// Handle to a field under validation
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Locator<'a> {
    /// Only the declared type is known
    TypeOnly(&'a Shape),
    /// Declared type plus the value found in the data
    Bound(&'a Shape, &'a Value),
}

/// Why a typed accessor produced nothing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Conversion {
    /// The declared type cannot produce the requested kind
    WrongType,
    /// No value is bound
    Absent,
    /// The value exists but could not be interpreted
    Unparseable,
}

impl Conversion {
    /// The rule outcome conventionally associated with this failure
    ///
    /// Absence passes: most rules treat a missing value as not applicable.
    pub fn outcome(self) -> Outcome {
        match self {
            Conversion::WrongType => Err(Hint::InvalidType),
            Conversion::Unparseable => Err(Hint::Invalid),
            Conversion::Absent => Ok(()),
        }
    }
}

impl<'a> Locator<'a> {
    pub fn shape(&self) -> &'a Shape {
        match *self {
            Locator::TypeOnly(shape) | Locator::Bound(shape, _) => shape,
        }
    }

    pub fn value(&self) -> Option<&'a Value> {
        match *self {
            Locator::TypeOnly(_) => None,
            Locator::Bound(_, value) => Some(value),
        }
    }

    pub fn has_value(&self) -> bool {
        matches!(self, Locator::Bound(..))
    }

    /// Collapses a chain of optional references
    ///
    /// An unset reference drops the bound value and keeps resolving the
    /// pointee type. Returns whether a value is still bound.
    pub fn unwrap_references(&mut self) -> bool {
        loop {
            *self = match *self {
                Locator::Bound(Shape::Optional(inner), Value::Optional(Some(value))) => {
                    Locator::Bound(inner.as_ref(), value.as_ref())
                }
                Locator::Bound(Shape::Optional(inner), Value::Optional(None)) => {
                    Locator::TypeOnly(inner.as_ref())
                }
                Locator::Bound(shape, Value::Optional(Some(value))) => {
                    Locator::Bound(shape, value.as_ref())
                }
                Locator::Bound(shape, Value::Optional(None)) => Locator::TypeOnly(shape.pointee()),
                Locator::TypeOnly(Shape::Optional(inner)) => Locator::TypeOnly(inner.as_ref()),
                _ => break,
            };
        }
        self.has_value()
    }

    /// Copy of this locator with references unwrapped
    pub fn unwrapped(mut self) -> Self {
        self.unwrap_references();
        self
    }

    pub fn is_int(&self) -> bool {
        self.shape().is_int()
    }

    pub fn is_uint(&self) -> bool {
        self.shape().is_uint()
    }

    pub fn is_float(&self) -> bool {
        self.shape().is_float()
    }

    pub fn is_numeric(&self) -> bool {
        self.shape().is_numeric()
    }

    pub fn is_list(&self) -> bool {
        self.shape().is_list()
    }

    pub fn is_str(&self) -> bool {
        matches!(self.shape(), Shape::Str)
    }

    pub fn has_len(&self) -> bool {
        self.shape().has_len()
    }

    /// The bound string
    pub fn string(&self) -> Result<&'a str, Conversion> {
        if !self.is_str() {
            return Err(Conversion::WrongType);
        }
        match self.value() {
            None => Err(Conversion::Absent),
            Some(Value::Str(text)) => Ok(text.as_str()),
            Some(_) => Err(Conversion::WrongType),
        }
    }

    /// Anything readable as text: strings, chars, bytes and their lists
    pub fn string_like(&self) -> Result<Cow<'a, str>, Conversion> {
        let textual = match self.shape() {
            Shape::Str | Shape::Char => true,
            Shape::Uint(crate::model::UintWidth::U8) => true,
            Shape::List(element) => matches!(
                element.as_ref(),
                Shape::Char | Shape::Uint(crate::model::UintWidth::U8)
            ),
            _ => false,
        };
        if !textual {
            return Err(Conversion::WrongType);
        }

        match self.value() {
            None => Err(Conversion::Absent),
            Some(Value::Str(text)) => Ok(Cow::Borrowed(text.as_str())),
            Some(Value::Char(c)) => Ok(Cow::Owned(c.to_string())),
            Some(Value::Uint(byte)) => u8::try_from(*byte)
                .map(|byte| Cow::Owned(char::from(byte).to_string()))
                .map_err(|_| Conversion::Unparseable),
            Some(Value::List(items)) => {
                let mut bytes = Vec::with_capacity(items.len());
                let mut text = String::new();
                for item in items {
                    match item {
                        Value::Char(c) => text.push(*c),
                        Value::Uint(byte) => {
                            bytes.push(u8::try_from(*byte).map_err(|_| Conversion::Unparseable)?)
                        }
                        _ => return Err(Conversion::WrongType),
                    }
                }
                if bytes.is_empty() {
                    Ok(Cow::Owned(text))
                } else {
                    Ok(Cow::Owned(String::from_utf8_lossy(&bytes).into_owned()))
                }
            }
            Some(_) => Err(Conversion::WrongType),
        }
    }

    pub fn bool(&self) -> Result<bool, Conversion> {
        if !matches!(self.shape(), Shape::Bool) {
            return Err(Conversion::WrongType);
        }
        match self.value() {
            None => Err(Conversion::Absent),
            Some(Value::Bool(flag)) => Ok(*flag),
            Some(_) => Err(Conversion::WrongType),
        }
    }

    /// Any integer as `i64`; unsigned values above `i64::MAX` are unparseable
    pub fn int(&self) -> Result<i64, Conversion> {
        if !self.is_int() && !self.is_uint() {
            return Err(Conversion::WrongType);
        }
        match self.value() {
            None => Err(Conversion::Absent),
            Some(Value::Int(number)) => Ok(*number),
            Some(Value::Uint(number)) => {
                i64::try_from(*number).map_err(|_| Conversion::Unparseable)
            }
            Some(_) => Err(Conversion::WrongType),
        }
    }

    pub fn uint(&self) -> Result<u64, Conversion> {
        if !self.is_uint() {
            return Err(Conversion::WrongType);
        }
        match self.value() {
            None => Err(Conversion::Absent),
            Some(Value::Uint(number)) => Ok(*number),
            Some(_) => Err(Conversion::WrongType),
        }
    }

    /// Any number widened to `f64`
    pub fn float(&self) -> Result<f64, Conversion> {
        if !self.is_numeric() {
            return Err(Conversion::WrongType);
        }
        match self.value() {
            None => Err(Conversion::Absent),
            Some(Value::Float(number)) => Ok(*number),
            Some(Value::Int(number)) => Ok(*number as f64),
            Some(Value::Uint(number)) => Ok(*number as f64),
            Some(_) => Err(Conversion::WrongType),
        }
    }

    /// Timestamps, date strings and unix times
    pub fn date(&self) -> Result<DateTime<Utc>, Conversion> {
        if !matches!(self.shape(), Shape::Date | Shape::Str | Shape::Int(_)) {
            return Err(Conversion::WrongType);
        }
        match self.value() {
            None => Err(Conversion::Absent),
            Some(Value::Date(date)) => Ok(*date),
            Some(Value::Str(text)) => dates::parse_structured(text).ok_or(Conversion::Unparseable),
            Some(Value::Int(number)) => dates::from_unix(*number).ok_or(Conversion::Unparseable),
            Some(_) => Err(Conversion::WrongType),
        }
    }

    /// Characters of a string, elements of a list or entries of a map
    pub fn len(&self) -> Result<usize, Conversion> {
        if !self.has_len() {
            return Err(Conversion::WrongType);
        }
        match self.value() {
            None => Err(Conversion::Absent),
            Some(value) => value.len().ok_or(Conversion::WrongType),
        }
    }
}
