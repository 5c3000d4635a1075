//! Static type descriptions of validated data
//!
//! A [`Shape`] is always available during traversal, even when no value is
//! bound, so rules on fields behind an unset reference can still run.

use std::fmt;
use std::sync::{Arc, OnceLock};

use crate::types::NamingStyle;

/// Signed integer widths, used to range-check parsed map keys
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IntWidth {
    I8,
    I16,
    I32,
    I64,
    Isize,
}

impl IntWidth {
    pub fn bounds(self) -> (i64, i64) {
        match self {
            IntWidth::I8 => (i8::MIN as i64, i8::MAX as i64),
            IntWidth::I16 => (i16::MIN as i64, i16::MAX as i64),
            IntWidth::I32 => (i32::MIN as i64, i32::MAX as i64),
            IntWidth::I64 | IntWidth::Isize => (i64::MIN, i64::MAX),
        }
    }

    pub fn contains(self, value: i64) -> bool {
        let (min, max) = self.bounds();
        (min..=max).contains(&value)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            IntWidth::I8 => "i8",
            IntWidth::I16 => "i16",
            IntWidth::I32 => "i32",
            IntWidth::I64 => "i64",
            IntWidth::Isize => "isize",
        }
    }
}

/// Unsigned integer widths
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UintWidth {
    U8,
    U16,
    U32,
    U64,
    Usize,
}

impl UintWidth {
    pub fn max(self) -> u64 {
        match self {
            UintWidth::U8 => u8::MAX as u64,
            UintWidth::U16 => u16::MAX as u64,
            UintWidth::U32 => u32::MAX as u64,
            UintWidth::U64 | UintWidth::Usize => u64::MAX,
        }
    }

    pub fn contains(self, value: u64) -> bool {
        value <= self.max()
    }

    pub fn as_str(self) -> &'static str {
        match self {
            UintWidth::U8 => "u8",
            UintWidth::U16 => "u16",
            UintWidth::U32 => "u32",
            UintWidth::U64 => "u64",
            UintWidth::Usize => "usize",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FloatWidth {
    F32,
    F64,
}

/// Declared type of a value
#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    Bool,
    Int(IntWidth),
    Uint(UintWidth),
    Float(FloatWidth),
    Char,
    Str,
    Date,
    List(Box<Shape>),
    Map { key: Box<Shape>, value: Box<Shape> },
    Record(RecordRef),
    /// A reference that may be unset
    Optional(Box<Shape>),
}

impl Shape {
    pub fn list(element: Shape) -> Self {
        Shape::List(Box::new(element))
    }

    pub fn optional(inner: Shape) -> Self {
        Shape::Optional(Box::new(inner))
    }

    pub fn map(key: Shape, value: Shape) -> Self {
        Shape::Map {
            key: Box::new(key),
            value: Box::new(value),
        }
    }

    /// Follows `Optional` wrappers down to the pointee type
    pub fn pointee(&self) -> &Shape {
        let mut shape = self;
        while let Shape::Optional(inner) = shape {
            shape = inner;
        }
        shape
    }

    pub fn is_int(&self) -> bool {
        matches!(self, Shape::Int(_))
    }

    pub fn is_uint(&self) -> bool {
        matches!(self, Shape::Uint(_))
    }

    pub fn is_float(&self) -> bool {
        matches!(self, Shape::Float(_))
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self, Shape::Int(_) | Shape::Uint(_) | Shape::Float(_))
    }

    pub fn is_list(&self) -> bool {
        matches!(self, Shape::List(_))
    }

    /// Types whose values have a length (strings, lists and maps)
    pub fn has_len(&self) -> bool {
        matches!(self, Shape::Str | Shape::List(_) | Shape::Map { .. })
    }

    /// Short human-readable type name, used in decode errors
    pub fn describe(&self) -> String {
        match self {
            Shape::Bool => "bool".to_string(),
            Shape::Int(width) => width.as_str().to_string(),
            Shape::Uint(width) => width.as_str().to_string(),
            Shape::Float(FloatWidth::F32) => "f32".to_string(),
            Shape::Float(FloatWidth::F64) => "f64".to_string(),
            Shape::Char => "char".to_string(),
            Shape::Str => "string".to_string(),
            Shape::Date => "date".to_string(),
            Shape::List(element) => format!("list<{}>", element.describe()),
            Shape::Map { key, value } => format!("map<{}, {}>", key.describe(), value.describe()),
            Shape::Record(record) => record.name().to_string(),
            Shape::Optional(inner) => format!("optional<{}>", inner.describe()),
        }
    }
}

/// One declared field of a record
#[derive(Debug, Clone, PartialEq)]
pub struct FieldShape {
    name: String,
    json: String,
    form: String,
    rules: String,
    inner: String,
    shape: Shape,
}

impl FieldShape {
    /// A field whose wire and form names default to its machine name
    pub fn new(name: impl Into<String>, shape: Shape) -> Self {
        let name = name.into();
        Self {
            json: name.clone(),
            form: name.clone(),
            name,
            rules: String::new(),
            inner: String::new(),
            shape,
        }
    }

    /// Rule chain applied to the field itself
    pub fn rules(mut self, chain: impl Into<String>) -> Self {
        self.rules = chain.into();
        self
    }

    /// Rule chain applied to every element of a list field
    pub fn inner(mut self, chain: impl Into<String>) -> Self {
        self.inner = chain.into();
        self
    }

    /// Wire name; an empty name or `-` keeps the machine name
    pub fn json(mut self, name: impl Into<String>) -> Self {
        let name = name.into();
        if !name.is_empty() && name != "-" {
            self.json = name;
        }
        self
    }

    /// Form name; an empty name or `-` keeps the machine name
    pub fn form(mut self, name: impl Into<String>) -> Self {
        let name = name.into();
        if !name.is_empty() && name != "-" {
            self.form = name;
        }
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn label(&self, style: NamingStyle) -> &str {
        match style {
            NamingStyle::Field => &self.name,
            NamingStyle::Json => &self.json,
            NamingStyle::Form => &self.form,
        }
    }

    pub fn rule_chain(&self) -> &str {
        &self.rules
    }

    pub fn inner_chain(&self) -> &str {
        &self.inner
    }

    pub fn shape(&self) -> &Shape {
        &self.shape
    }

    /// True when the field declares its own or an element rule chain
    pub fn has_rules(&self) -> bool {
        !self.rules.is_empty() || !self.inner.is_empty()
    }
}

/// Ordered field list of a composite record type
#[derive(Debug, Clone, PartialEq)]
pub struct RecordShape {
    name: String,
    fields: Vec<FieldShape>,
}

impl RecordShape {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fields: Vec::new(),
        }
    }

    pub fn field(mut self, field: FieldShape) -> Self {
        self.fields.push(field);
        self
    }

    pub fn push(&mut self, field: FieldShape) {
        self.fields.push(field);
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn fields(&self) -> &[FieldShape] {
        &self.fields
    }

    /// Position of a field by machine name
    pub fn position(&self, name: &str) -> Option<usize> {
        self.fields.iter().position(|field| field.name == name)
    }
}

/// Lazily dereferenced handle to a [`RecordShape`]
///
/// Record types may refer to themselves, so a shape never embeds a record's
/// fields directly. Static handles come from [`crate::describe_record!`];
/// shared handles are created empty and defined once every record of a schema
/// is known.
#[derive(Clone)]
pub struct RecordRef {
    name: Arc<str>,
    source: RecordSource,
}

#[derive(Clone)]
enum RecordSource {
    Static(fn() -> &'static RecordShape),
    Shared(Arc<OnceLock<RecordShape>>),
}

impl RecordRef {
    pub fn from_static(name: &str, accessor: fn() -> &'static RecordShape) -> Self {
        Self {
            name: Arc::from(name),
            source: RecordSource::Static(accessor),
        }
    }

    /// A handle whose record is supplied later through [`RecordRef::define`]
    pub fn pending(name: &str) -> Self {
        Self {
            name: Arc::from(name),
            source: RecordSource::Shared(Arc::new(OnceLock::new())),
        }
    }

    /// Fills a pending handle; returns false when already defined or static
    pub fn define(&self, record: RecordShape) -> bool {
        match &self.source {
            RecordSource::Static(_) => false,
            RecordSource::Shared(slot) => slot.set(record).is_ok(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// The record, or None for a pending handle that was never defined
    pub fn get(&self) -> Option<&RecordShape> {
        match &self.source {
            RecordSource::Static(accessor) => Some(accessor()),
            RecordSource::Shared(slot) => slot.get(),
        }
    }
}

impl fmt::Debug for RecordRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("RecordRef").field(&self.name).finish()
    }
}

impl PartialEq for RecordRef {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}
