//! The "describe my fields" capability
//!
//! Validated types implement [`Describe`] to expose their static [`Shape`]
//! and a bound [`Value`]. Records usually get it from [`crate::describe_record!`].

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use std::collections::{BTreeMap, HashMap};
use std::rc::Rc;
use std::sync::Arc;

use super::shape::{FloatWidth, IntWidth, Shape, UintWidth};
use super::value::Value;
use crate::messages::CustomMessage;

pub trait Describe {
    /// Type-only description, available without an instance
    fn shape() -> Shape
    where
        Self: Sized;

    /// Snapshot of this instance as a bound value
    fn to_value(&self) -> Value;

    /// Custom-message overrides for this record instance
    ///
    /// Consulted at most once per validation call, and only for the root.
    fn custom_messages(&self) -> Vec<CustomMessage> {
        Vec::new()
    }
}

/// Shape of a field, inferred from an accessor closure
///
/// Lets [`crate::describe_record!`] describe fields without naming their types.
pub fn shape_of<R, T, F>(_accessor: F) -> Shape
where
    T: Describe,
    F: Fn(&R) -> &T,
{
    T::shape()
}

macro_rules! describe_signed {
    ($($ty:ty => $width:expr),* $(,)?) => {
        $(
            impl Describe for $ty {
                fn shape() -> Shape {
                    Shape::Int($width)
                }

                fn to_value(&self) -> Value {
                    Value::Int(*self as i64)
                }
            }
        )*
    };
}

macro_rules! describe_unsigned {
    ($($ty:ty => $width:expr),* $(,)?) => {
        $(
            impl Describe for $ty {
                fn shape() -> Shape {
                    Shape::Uint($width)
                }

                fn to_value(&self) -> Value {
                    Value::Uint(*self as u64)
                }
            }
        )*
    };
}

describe_signed!(
    i8 => IntWidth::I8,
    i16 => IntWidth::I16,
    i32 => IntWidth::I32,
    i64 => IntWidth::I64,
    isize => IntWidth::Isize,
);

describe_unsigned!(
    u8 => UintWidth::U8,
    u16 => UintWidth::U16,
    u32 => UintWidth::U32,
    u64 => UintWidth::U64,
    usize => UintWidth::Usize,
);

impl Describe for f32 {
    fn shape() -> Shape {
        Shape::Float(FloatWidth::F32)
    }

    fn to_value(&self) -> Value {
        Value::Float(*self as f64)
    }
}

impl Describe for f64 {
    fn shape() -> Shape {
        Shape::Float(FloatWidth::F64)
    }

    fn to_value(&self) -> Value {
        Value::Float(*self)
    }
}

impl Describe for bool {
    fn shape() -> Shape {
        Shape::Bool
    }

    fn to_value(&self) -> Value {
        Value::Bool(*self)
    }
}

impl Describe for char {
    fn shape() -> Shape {
        Shape::Char
    }

    fn to_value(&self) -> Value {
        Value::Char(*self)
    }
}

impl Describe for String {
    fn shape() -> Shape {
        Shape::Str
    }

    fn to_value(&self) -> Value {
        Value::Str(self.clone())
    }
}

impl Describe for &'static str {
    fn shape() -> Shape {
        Shape::Str
    }

    fn to_value(&self) -> Value {
        Value::Str((*self).to_string())
    }
}

impl Describe for DateTime<Utc> {
    fn shape() -> Shape {
        Shape::Date
    }

    fn to_value(&self) -> Value {
        Value::Date(*self)
    }
}

impl Describe for NaiveDateTime {
    fn shape() -> Shape {
        Shape::Date
    }

    fn to_value(&self) -> Value {
        Value::Date(self.and_utc())
    }
}

impl Describe for NaiveDate {
    fn shape() -> Shape {
        Shape::Date
    }

    fn to_value(&self) -> Value {
        Value::Date(self.and_time(chrono::NaiveTime::MIN).and_utc())
    }
}

impl<T: Describe> Describe for Option<T> {
    fn shape() -> Shape {
        Shape::optional(T::shape())
    }

    fn to_value(&self) -> Value {
        Value::Optional(self.as_ref().map(|inner| Box::new(inner.to_value())))
    }
}

impl<T: Describe> Describe for Box<T> {
    fn shape() -> Shape {
        T::shape()
    }

    fn to_value(&self) -> Value {
        self.as_ref().to_value()
    }

    fn custom_messages(&self) -> Vec<CustomMessage> {
        self.as_ref().custom_messages()
    }
}

impl<T: Describe> Describe for Rc<T> {
    fn shape() -> Shape {
        T::shape()
    }

    fn to_value(&self) -> Value {
        self.as_ref().to_value()
    }

    fn custom_messages(&self) -> Vec<CustomMessage> {
        self.as_ref().custom_messages()
    }
}

impl<T: Describe> Describe for Arc<T> {
    fn shape() -> Shape {
        T::shape()
    }

    fn to_value(&self) -> Value {
        self.as_ref().to_value()
    }

    fn custom_messages(&self) -> Vec<CustomMessage> {
        self.as_ref().custom_messages()
    }
}

impl<T: Describe> Describe for Vec<T> {
    fn shape() -> Shape {
        Shape::list(T::shape())
    }

    fn to_value(&self) -> Value {
        Value::List(self.iter().map(Describe::to_value).collect())
    }
}

impl<T: Describe, const N: usize> Describe for [T; N] {
    fn shape() -> Shape {
        Shape::list(T::shape())
    }

    fn to_value(&self) -> Value {
        Value::List(self.iter().map(Describe::to_value).collect())
    }
}

impl<K: Describe, V: Describe, S> Describe for HashMap<K, V, S> {
    fn shape() -> Shape {
        Shape::map(K::shape(), V::shape())
    }

    fn to_value(&self) -> Value {
        Value::Map(
            self.iter()
                .map(|(key, value)| (key.to_value(), value.to_value()))
                .collect(),
        )
    }
}

impl<K: Describe, V: Describe> Describe for BTreeMap<K, V> {
    fn shape() -> Shape {
        Shape::map(K::shape(), V::shape())
    }

    fn to_value(&self) -> Value {
        Value::Map(
            self.iter()
                .map(|(key, value)| (key.to_value(), value.to_value()))
                .collect(),
        )
    }
}

/// Implements [`Describe`] for a plain struct
///
/// Each listed field may carry `rules`, `inner`, `json` and `form` settings.
/// Field types are inferred, and fields left out of the list are invisible to
/// validation. An optional trailing `messages = path` names a
/// `fn(&Self) -> Vec<CustomMessage>` supplying custom-message overrides.
///
/// ```
/// use fieldrules::describe_record;
///
/// struct Signup {
///     email: String,
///     tags: Vec<String>,
/// }
///
/// describe_record!(Signup {
///     email { rules: "required|email" },
///     tags { inner: "filled", json: "labels" },
/// });
/// ```
#[macro_export]
macro_rules! describe_record {
    (
        $ty:ident {
            $( $field:ident $({ $( $key:ident : $val:expr ),* $(,)? })? ),* $(,)?
        }
        $( messages = $messages:path )?
    ) => {
        impl $crate::Describe for $ty {
            fn shape() -> $crate::Shape {
                fn record() -> &'static $crate::RecordShape {
                    static SHAPE: ::std::sync::OnceLock<$crate::RecordShape> =
                        ::std::sync::OnceLock::new();
                    SHAPE.get_or_init(|| {
                        $crate::RecordShape::new(stringify!($ty))
                            $(
                                .field(
                                    $crate::FieldShape::new(
                                        stringify!($field),
                                        $crate::model::shape_of(|record: &$ty| &record.$field),
                                    )
                                    $( $( .$key($val) )* )?
                                )
                            )*
                    })
                }
                $crate::Shape::Record($crate::RecordRef::from_static(stringify!($ty), record))
            }

            fn to_value(&self) -> $crate::Value {
                $crate::Value::Record(vec![
                    $( $crate::Describe::to_value(&self.$field) ),*
                ])
            }

            $(
                fn custom_messages(&self) -> ::std::vec::Vec<$crate::CustomMessage> {
                    $messages(self)
                }
            )?
        }
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::messages::MessageResolver;
    use crate::types::NamingStyle;

    struct Node {
        label: String,
        next: Option<Box<Node>>,
    }

    crate::describe_record!(Node {
        label { rules: "required", json: "nodeLabel" },
        next,
    });

    struct Tagged {
        tags: Vec<u8>,
    }

    impl Tagged {
        fn overrides(&self) -> Vec<CustomMessage> {
            vec![CustomMessage::new("tags", MessageResolver::fixed("bad tags"))]
        }
    }

    crate::describe_record!(Tagged {
        tags { inner: "min:1" },
    } messages = Tagged::overrides);

    #[test]
    fn test_recursive_record_shape_is_lazy() {
        let shape = Node::shape();
        let Shape::Record(record) = &shape else {
            panic!("expected a record shape");
        };
        let record = record.get().unwrap();
        assert_eq!(record.name(), "Node");
        assert_eq!(record.fields().len(), 2);
        assert_eq!(record.fields()[0].label(NamingStyle::Json), "nodeLabel");
        assert_eq!(record.fields()[0].rule_chain(), "required");

        let Shape::Optional(next) = record.fields()[1].shape() else {
            panic!("expected optional next");
        };
        assert!(matches!(next.as_ref(), Shape::Record(inner) if inner.name() == "Node"));
    }

    #[test]
    fn test_record_value_is_positional() {
        let node = Node {
            label: "a".into(),
            next: Some(Box::new(Node {
                label: "b".into(),
                next: None,
            })),
        };

        let expected = Value::Record(vec![
            Value::Str("a".into()),
            Value::some(Value::Record(vec![Value::Str("b".into()), Value::none()])),
        ]);
        assert_eq!(node.to_value(), expected);
    }

    #[test]
    fn test_messages_hook() {
        let tagged = Tagged { tags: vec![1] };
        let messages = tagged.custom_messages();
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].key(), "tags");
    }

    #[test]
    fn test_primitive_shapes() {
        assert_eq!(<Option<Vec<i16>>>::shape(), Shape::optional(Shape::list(Shape::Int(IntWidth::I16))));
        assert_eq!(<Box<String>>::shape(), Shape::Str);
        assert_eq!(<[u8; 4]>::shape(), Shape::list(Shape::Uint(UintWidth::U8)));
        assert_eq!(
            <BTreeMap<String, bool>>::shape(),
            Shape::map(Shape::Str, Shape::Bool)
        );
    }

    #[test]
    fn test_naive_date_is_midnight_utc() {
        let date = NaiveDate::from_ymd_opt(2024, 2, 29).unwrap();
        let Value::Date(stamp) = date.to_value() else {
            panic!("expected a date");
        };
        assert_eq!(stamp.to_rfc3339(), "2024-02-29T00:00:00+00:00");
    }
}
