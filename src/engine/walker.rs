#![forbid(unsafe_code)]

//! Recursive traversal and rule execution
//!
//! The walker visits every record field and list element reachable from the
//! root. Fields behind an unset reference are still visited by type, but only
//! when they carry rules of their own, so a missing optional record can
//! still report `required` on its members.

use chrono::Utc;
use tracing::debug;

use crate::locator::Locator;
use crate::messages::{CustomMessage, FALLBACK_MESSAGE, Placeholder, render};
use crate::model::{DATE_TIME_FORMAT, Shape, Value};
use crate::output::{FieldErrors, RuleError};
use crate::rules::dates;
use crate::rules::parser::RuleCall;
use crate::rules::{Hint, RuleRegistry};
use crate::types::{LanguageTag, NamingStyle};

use super::cancel::CancelToken;
use super::context::{RuleContext, ValidationState};
use super::path_stack::PathStack;

/// Stack depth past which traversal stops descending
pub const MAX_DEPTH: usize = 100;

/// Custom-message overrides, fetched from the root the first time a rule fails
enum Overrides<'a> {
    Pending(Box<dyn FnOnce() -> Vec<CustomMessage> + 'a>),
    Ready(Vec<CustomMessage>),
}

/// One validation session
pub(crate) struct Walker<'a> {
    registry: &'a RuleRegistry,
    root: Locator<'a>,
    naming: NamingStyle,
    languages: &'a [LanguageTag],
    cancel: &'a CancelToken,
    overrides: Overrides<'a>,
    errors: Vec<FieldErrors>,
}

impl<'a> Walker<'a> {
    pub(crate) fn new(
        registry: &'a RuleRegistry,
        root: Locator<'a>,
        naming: NamingStyle,
        languages: &'a [LanguageTag],
        cancel: &'a CancelToken,
        overrides: impl FnOnce() -> Vec<CustomMessage> + 'a,
    ) -> Self {
        Self {
            registry,
            root,
            naming,
            languages,
            cancel,
            overrides: Overrides::Pending(Box::new(overrides)),
            errors: Vec::new(),
        }
    }

    /// Walks the whole value and returns the collected field errors
    pub(crate) fn run(mut self) -> Vec<FieldErrors> {
        let mut stack = PathStack::new();
        let mut root = self.root;

        if !root.unwrap_references() {
            self.walk_absent(&mut stack, root.shape());
            return self.errors;
        }

        match root.shape() {
            Shape::Record(_) => self.walk_record(&mut stack, root),
            Shape::List(_) => self.walk_list(&mut stack, root, ""),
            _ => {}
        }
        self.errors
    }

    fn too_deep(&self, stack: &PathStack<'a>) -> bool {
        if stack.len() > MAX_DEPTH {
            debug!(
                path = %stack.render(self.naming),
                "maximum depth reached, not descending further"
            );
            return true;
        }
        false
    }

    fn walk_record(&mut self, stack: &mut PathStack<'a>, record: Locator<'a>) {
        if self.too_deep(stack) {
            return;
        }
        let (Shape::Record(handle), Some(Value::Record(values))) = (record.shape(), record.value())
        else {
            return;
        };
        let Some(shape) = handle.get() else {
            debug!(record = handle.name(), "record type has no definition");
            return;
        };

        for (position, field) in shape.fields().iter().enumerate() {
            stack.push_field(field, record);

            let mut child = match values.get(position) {
                Some(value) => Locator::Bound(field.shape(), value),
                None => Locator::TypeOnly(field.shape()),
            };
            if field.has_rules() {
                self.run_chain(stack, child, field.rule_chain());
            }

            if child.unwrap_references() {
                match child.shape() {
                    Shape::Record(_) => self.walk_record(stack, child),
                    Shape::List(_) => self.walk_list(stack, child, field.inner_chain()),
                    _ => {}
                }
            } else {
                self.walk_absent(stack, child.shape());
            }

            stack.pop();
        }
    }

    /// Runs `inner` on every element, then descends into the elements
    ///
    /// `required` on the list itself belongs to the owning field's chain.
    fn walk_list(&mut self, stack: &mut PathStack<'a>, list: Locator<'a>, inner: &'a str) {
        if self.too_deep(stack) {
            return;
        }
        let (Shape::List(element), Some(Value::List(items))) = (list.shape(), list.value()) else {
            return;
        };

        for (index, item) in items.iter().enumerate() {
            stack.push_index(index, list);

            let mut child = Locator::Bound(element.as_ref(), item);
            self.run_chain(stack, child, inner);

            if child.unwrap_references() {
                match child.shape() {
                    Shape::Record(_) => self.walk_record(stack, child),
                    Shape::List(_) => self.walk_list(stack, child, ""),
                    _ => {}
                }
            } else {
                self.walk_absent(stack, child.shape());
            }

            stack.pop();
        }
    }

    /// Visits the ruled fields of a record type that has no value
    fn walk_absent(&mut self, stack: &mut PathStack<'a>, shape: &'a Shape) {
        if self.too_deep(stack) {
            return;
        }
        let shape = shape.pointee();
        let Shape::Record(handle) = shape else {
            return;
        };
        let Some(record) = handle.get() else {
            return;
        };

        for field in record.fields().iter().filter(|field| field.has_rules()) {
            stack.push_field(field, Locator::TypeOnly(shape));

            self.run_chain(stack, Locator::TypeOnly(field.shape()), field.rule_chain());
            if matches!(field.shape().pointee(), Shape::Record(_)) {
                self.walk_absent(stack, field.shape());
            }

            stack.pop();
        }
    }

    /// Runs one field's chain and records its failures
    fn run_chain(&mut self, stack: &PathStack<'a>, locator: Locator<'a>, chain: &str) {
        if chain.is_empty() {
            return;
        }
        let registry = self.registry;
        let calls = registry.parse_chain(chain);
        if calls.is_empty() {
            return;
        }

        let mut state = ValidationState::new();
        let mut errors = Vec::new();
        for call in &calls {
            let mut ctx =
                RuleContext::new(locator, &call.args, &mut state, stack, self.root, self.cancel);
            let Err(hint) = call.entry.rule().check(&mut ctx) else {
                continue;
            };
            let checked = ctx.locator();
            let other = ctx.last_field();

            let message = self.message(call, hint, stack, checked, other);
            errors.push(RuleError {
                rule: call.name.to_string(),
                hint: Some(hint),
                message,
            });
            if state.bail_status() {
                break;
            }
        }

        if !errors.is_empty() {
            self.errors.push(FieldErrors {
                path: stack.render(self.naming),
                errors,
            });
        }
    }

    fn message(
        &mut self,
        call: &RuleCall<'a>,
        hint: Hint,
        stack: &PathStack<'a>,
        checked: Locator<'a>,
        other: Option<Locator<'a>>,
    ) -> String {
        let template = self.template(call, hint, stack);
        let naming = self.naming;

        render(&template, |placeholder| match placeholder {
            Placeholder::Attribute => stack.attribute(naming).into_owned(),
            Placeholder::Value => encode(checked, naming),
            Placeholder::Other => other.map(|other| encode(other, naming)).unwrap_or_default(),
            Placeholder::Date => call
                .args
                .first()
                .and_then(|arg| dates::parse_expression(arg, Utc::now()))
                .map(|date| date.format(DATE_TIME_FORMAT).to_string())
                .unwrap_or_default(),
            args => args.from_args(&call.args).unwrap_or_default(),
        })
    }

    /// Picks the message template: custom override, then catalog, then fallback
    fn template(&mut self, call: &RuleCall<'a>, hint: Hint, stack: &PathStack<'a>) -> String {
        let custom = self
            .overrides()
            .iter()
            .find(|custom| stack.loose_match(custom.key(), call.name));
        if let Some(custom) = custom {
            debug!(key = custom.key(), rule = call.name, "using custom message");
            return custom.resolver().resolve(Some(hint)).to_string();
        }

        for language in self.languages {
            let Some(resolver) = call.entry.message(language) else {
                continue;
            };
            let template = resolver.resolve(Some(hint));
            if template.is_empty() {
                break;
            }
            return template.to_string();
        }

        FALLBACK_MESSAGE.to_string()
    }

    fn overrides(&mut self) -> &[CustomMessage] {
        if let Overrides::Pending(_) = self.overrides {
            let pending = std::mem::replace(&mut self.overrides, Overrides::Ready(Vec::new()));
            if let Overrides::Pending(fetch) = pending {
                self.overrides = Overrides::Ready(fetch());
            }
        }
        match &self.overrides {
            Overrides::Ready(overrides) => overrides,
            Overrides::Pending(_) => &[],
        }
    }
}

/// Text for `:value` and `:other`; JSON when paths use wire names
fn encode(locator: Locator<'_>, naming: NamingStyle) -> String {
    let Some(value) = locator.value() else {
        return String::new();
    };
    match naming {
        NamingStyle::Json => value.to_json(locator.shape()).to_string(),
        NamingStyle::Field | NamingStyle::Form => value.to_string(),
    }
}
