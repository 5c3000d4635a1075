#![forbid(unsafe_code)]

//! Position tracking during traversal
//!
//! The stack records every record field and list index between the root and
//! the field under validation. Each element keeps a locator for the container
//! it was found in, which is what relative field lookups resolve against.

use std::borrow::Cow;

use crate::locator::Locator;
use crate::model::FieldShape;
use crate::types::NamingStyle;

/// What one step of a path addresses
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Segment<'a> {
    /// A declared record field
    Object(&'a FieldShape),
    /// A list position
    List(usize),
}

/// One step from a container into a child
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PathElement<'a> {
    pub segment: Segment<'a>,
    /// The record or list this step was taken from
    pub container: Locator<'a>,
}

impl<'a> PathElement<'a> {
    /// Label under `style`; list positions render as their index
    pub fn label(&self, style: NamingStyle) -> Cow<'a, str> {
        match self.segment {
            Segment::Object(field) => Cow::Borrowed(field.label(style)),
            Segment::List(index) => Cow::Owned(index.to_string()),
        }
    }

    pub fn is_list(&self) -> bool {
        matches!(self.segment, Segment::List(_))
    }
}

/// Ordered ancestry of the field under validation
#[derive(Debug, Clone, Default)]
pub struct PathStack<'a> {
    elements: Vec<PathElement<'a>>,
}

impl<'a> PathStack<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_field(&mut self, field: &'a FieldShape, container: Locator<'a>) {
        self.elements.push(PathElement {
            segment: Segment::Object(field),
            container,
        });
    }

    pub fn push_index(&mut self, index: usize, container: Locator<'a>) {
        self.elements.push(PathElement {
            segment: Segment::List(index),
            container,
        });
    }

    pub fn pop(&mut self) -> Option<PathElement<'a>> {
        self.elements.pop()
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn elements(&self) -> &[PathElement<'a>] {
        &self.elements
    }

    pub fn last(&self) -> Option<&PathElement<'a>> {
        self.elements.last()
    }

    /// Dotted path under `style`, skipping empty labels
    pub fn render(&self, style: NamingStyle) -> String {
        let mut path = String::new();
        for element in &self.elements {
            let label = element.label(style);
            if label.is_empty() {
                continue;
            }
            if !path.is_empty() {
                path.push('.');
            }
            path.push_str(&label);
        }
        path
    }

    /// The path under every style, in [`NamingStyle::ALL`] order
    pub fn render_all(&self) -> [String; 3] {
        NamingStyle::ALL.map(|style| self.render(style))
    }

    /// Label of the innermost element, or empty at the root
    pub fn attribute(&self, style: NamingStyle) -> Cow<'a, str> {
        self.elements
            .last()
            .map(|element| element.label(style))
            .unwrap_or(Cow::Borrowed(""))
    }

    /// Machine name of the innermost element when it is a record field
    pub fn field_name(&self) -> Option<&'a str> {
        match self.elements.last()?.segment {
            Segment::Object(field) => Some(field.name()),
            Segment::List(_) => None,
        }
    }

    /// Matches a custom-message key against the current position
    ///
    /// The key is a dotted list of machine field names, list indexes and `*`
    /// wildcards, optionally ending in `rule`. Field names skip over list
    /// positions, so `items.name` matches `items.3.name`. Once the key is
    /// used up, the remaining elements may only be list positions plus at
    /// most one field literally named `rule`.
    pub fn loose_match(&self, pattern: &str, rule: &str) -> bool {
        let mut parts: Vec<&str> = if pattern.is_empty() {
            Vec::new()
        } else {
            pattern.split('.').collect()
        };
        if parts.last() == Some(&rule) {
            parts.pop();
        }

        let mut rest = self.elements.as_slice();
        for part in parts {
            let Some(next) = rest.first() else {
                return false;
            };

            if let Ok(index) = part.parse::<usize>() {
                match next.segment {
                    Segment::List(position) if position == index => rest = &rest[1..],
                    _ => return false,
                }
                continue;
            }

            if part == "*" {
                if !next.is_list() {
                    return false;
                }
                rest = &rest[1..];
                continue;
            }

            // A field name: the first record field ahead must carry it
            let ahead = rest.iter().position(|element| !element.is_list());
            if let Some(offset) = ahead {
                match rest[offset].segment {
                    Segment::Object(field) if field.name() == part => rest = &rest[offset + 1..],
                    _ => return false,
                }
            }
        }

        let mut rule_seen = false;
        for element in rest {
            match element.segment {
                Segment::List(_) => {}
                Segment::Object(field) if field.name() == rule && !rule_seen => rule_seen = true,
                Segment::Object(_) => return false,
            }
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Shape;

    struct Fixture {
        container: Shape,
        foo: FieldShape,
        bar: FieldShape,
        name: FieldShape,
        odd: FieldShape,
        required: FieldShape,
    }

    fn fixture() -> Fixture {
        Fixture {
            container: Shape::Str,
            foo: FieldShape::new("Foo", Shape::Str).json("foo").form("foo_form"),
            bar: FieldShape::new("Bar", Shape::Str).json("bar"),
            name: FieldShape::new("Name", Shape::Str),
            odd: FieldShape::new("SussyBakka", Shape::Str),
            required: FieldShape::new("required", Shape::Str),
        }
    }

    fn nested(f: &Fixture) -> PathStack<'_> {
        let container = Locator::TypeOnly(&f.container);
        let mut stack = PathStack::new();
        stack.push_field(&f.foo, container);
        stack.push_index(1, container);
        stack.push_field(&f.bar, container);
        stack.push_index(2, container);
        stack
    }

    #[test]
    fn test_render_per_style() {
        let f = fixture();
        let stack = nested(&f);
        assert_eq!(stack.render(NamingStyle::Field), "Foo.1.Bar.2");
        assert_eq!(stack.render(NamingStyle::Json), "foo.1.bar.2");
        assert_eq!(
            stack.render_all(),
            [
                "Foo.1.Bar.2".to_string(),
                "foo.1.bar.2".to_string(),
                "foo_form.1.Bar.2".to_string()
            ]
        );
        assert_eq!(PathStack::new().render(NamingStyle::Json), "");
    }

    #[test]
    fn test_attribute_and_field_name() {
        let f = fixture();
        let mut stack = nested(&f);
        assert_eq!(stack.attribute(NamingStyle::Json), "2");
        assert_eq!(stack.field_name(), None);

        stack.pop();
        assert_eq!(stack.attribute(NamingStyle::Json), "bar");
        assert_eq!(stack.field_name(), Some("Bar"));
        assert_eq!(PathStack::new().attribute(NamingStyle::Json), "");
    }

    #[test]
    fn test_loose_match_simple() {
        let f = fixture();
        let container = Locator::TypeOnly(&f.container);

        assert!(PathStack::new().loose_match("", "required"));

        let mut stack = PathStack::new();
        stack.push_field(&f.name, container);
        assert!(stack.loose_match("Name", "required"));

        let mut stack = PathStack::new();
        stack.push_field(&f.odd, container);
        assert!(!stack.loose_match("Name", "required"));
    }

    #[test]
    fn test_loose_match_nested() {
        let f = fixture();
        let stack = nested(&f);

        assert!(!stack.loose_match("Foo", "required"));
        assert!(stack.loose_match("Foo.Bar", "required"));
        assert!(stack.loose_match("Foo.1.Bar.2", "required"));
        assert!(stack.loose_match("Foo.*.Bar.*", "required"));
        assert!(stack.loose_match("Foo.Bar.required", "required"));
        // no field left ahead, so the trailing segment consumes nothing
        assert!(stack.loose_match("Foo.Bar.min", "required"));
    }

    #[test]
    fn test_loose_match_rejects_wrong_index() {
        let f = fixture();
        let stack = nested(&f);

        assert!(!stack.loose_match("Foo.0.Bar", "required"));
        assert!(!stack.loose_match("*.Bar", "required"));
        assert!(!stack.loose_match("Foo.Bar.2.3", "required"));
    }

    #[test]
    fn test_loose_match_uses_machine_names() {
        let f = fixture();
        let stack = nested(&f);
        assert!(!stack.loose_match("foo.bar", "required"));
    }

    #[test]
    fn test_loose_match_allows_one_trailing_rule_field() {
        let f = fixture();
        let container = Locator::TypeOnly(&f.container);
        let mut stack = PathStack::new();
        stack.push_field(&f.name, container);
        stack.push_field(&f.required, container);

        assert!(stack.loose_match("Name", "required"));
        assert!(!stack.loose_match("Name", "min"));
    }
}
