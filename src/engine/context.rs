#![forbid(unsafe_code)]

//! What a rule sees while it runs

use chrono::{DateTime, Utc};
use std::any::Any;
use std::collections::HashMap;
use std::ops::{Deref, DerefMut};

use crate::locator::{Conversion, Locator};
use crate::rules::dates;

use super::cancel::CancelToken;
use super::path_stack::PathStack;
use super::resolver;

/// State key under which `date_format` leaves the date it parsed
pub const PARSED_DATE_KEY: &str = "parsed_date";

/// State shared by the rules of one field's chain
///
/// Created fresh for every field, so nothing leaks between siblings.
#[derive(Default)]
pub struct ValidationState {
    bail: bool,
    values: HashMap<String, Box<dyn Any>>,
}

impl ValidationState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn bail_status(&self) -> bool {
        self.bail
    }
}

/// Execution context handed to [`crate::Rule::check`]
///
/// Dereferences to the [`Locator`] of the field under validation, so the
/// typed accessors (`ctx.string()`, `ctx.int()`, ...) are available directly.
pub struct RuleContext<'s, 'a> {
    locator: Locator<'a>,
    args: &'s [String],
    state: &'s mut ValidationState,
    stack: &'s PathStack<'a>,
    root: Locator<'a>,
    cancel: &'s CancelToken,
    last_field: Option<Locator<'a>>,
}

impl<'s, 'a> RuleContext<'s, 'a> {
    pub(crate) fn new(
        locator: Locator<'a>,
        args: &'s [String],
        state: &'s mut ValidationState,
        stack: &'s PathStack<'a>,
        root: Locator<'a>,
        cancel: &'s CancelToken,
    ) -> Self {
        Self {
            locator,
            args,
            state,
            stack,
            root,
            cancel,
            last_field: None,
        }
    }

    /// The field under validation, as unwrapped so far by this rule
    pub fn locator(&self) -> Locator<'a> {
        self.locator
    }

    pub fn args(&self) -> &'s [String] {
        self.args
    }

    pub fn arg(&self, index: usize) -> Option<&'s str> {
        self.args.get(index).map(String::as_str)
    }

    /// Stops the remaining rules of this field after the next failure
    pub fn bail(&mut self) {
        self.state.bail = true;
    }

    pub fn unbail(&mut self) {
        self.state.bail = false;
    }

    pub fn bail_status(&self) -> bool {
        self.state.bail
    }

    /// Stores a value for later rules of the same field
    pub fn set_state<T: Any>(&mut self, key: impl Into<String>, value: T) {
        self.state.values.insert(key.into(), Box::new(value));
    }

    /// A value stored by an earlier rule, if present with type `T`
    pub fn state<T: Any>(&self, key: &str) -> Option<&T> {
        self.state.values.get(key)?.downcast_ref()
    }

    /// Looks up another field; see [`crate::engine::resolver`] for path syntax
    ///
    /// A successful lookup becomes the `:other` value of this rule's message.
    pub fn field(&mut self, path: &str) -> Option<Locator<'a>> {
        let found = resolver::resolve(self.root, self.stack, path)?;
        self.last_field = Some(found);
        Some(found)
    }

    /// The field most recently returned by [`RuleContext::field`]
    pub fn last_field(&self) -> Option<Locator<'a>> {
        self.last_field
    }

    pub fn stack(&self) -> &'s PathStack<'a> {
        self.stack
    }

    /// Machine name of the field under validation; None inside a list
    pub fn field_name(&self) -> Option<&'a str> {
        self.stack.field_name()
    }

    /// The field as a date, preferring one parsed earlier by `date_format`
    pub fn date(&self) -> Result<DateTime<Utc>, Conversion> {
        if let Some(parsed) = self.state::<DateTime<Utc>>(PARSED_DATE_KEY) {
            return Ok(*parsed);
        }
        self.locator.date()
    }

    /// Rule argument `index` read as a date expression such as `tomorrow`
    pub fn date_from_arg(&self, index: usize) -> Option<DateTime<Utc>> {
        dates::parse_expression(self.arg(index)?, Utc::now())
    }

    pub fn cancel_token(&self) -> &'s CancelToken {
        self.cancel
    }
}

impl<'a> Deref for RuleContext<'_, 'a> {
    type Target = Locator<'a>;

    fn deref(&self) -> &Self::Target {
        &self.locator
    }
}

impl DerefMut for RuleContext<'_, '_> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.locator
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Shape, Value};
    use chrono::TimeZone;

    #[test]
    fn test_state_is_typed() {
        let shape = Shape::Str;
        let value = Value::Str("x".into());
        let locator = Locator::Bound(&shape, &value);
        let stack = PathStack::new();
        let cancel = CancelToken::new();
        let mut state = ValidationState::new();
        let args = Vec::new();

        let mut ctx = RuleContext::new(locator, &args, &mut state, &stack, locator, &cancel);
        ctx.set_state("count", 3_usize);
        assert_eq!(ctx.state::<usize>("count"), Some(&3));
        assert_eq!(ctx.state::<String>("count"), None);
        assert_eq!(ctx.state::<usize>("missing"), None);

        assert!(!ctx.bail_status());
        ctx.bail();
        assert!(ctx.bail_status());
        ctx.unbail();
        assert!(!ctx.bail_status());
    }

    #[test]
    fn test_date_prefers_parsed_state() {
        let shape = Shape::Str;
        let value = Value::Str("15/05/2024".into());
        let locator = Locator::Bound(&shape, &value);
        let stack = PathStack::new();
        let cancel = CancelToken::new();
        let mut state = ValidationState::new();
        let args = vec!["tomorrow".to_string()];

        let mut ctx = RuleContext::new(locator, &args, &mut state, &stack, locator, &cancel);
        assert_eq!(ctx.date(), Err(Conversion::Unparseable));

        let parsed = Utc.with_ymd_and_hms(2024, 5, 15, 0, 0, 0).unwrap();
        ctx.set_state(PARSED_DATE_KEY, parsed);
        assert_eq!(ctx.date(), Ok(parsed));

        assert!(ctx.date_from_arg(0).is_some_and(|date| date > Utc::now()));
        assert!(ctx.date_from_arg(1).is_none());
    }

    #[test]
    fn test_field_remembers_last_lookup() {
        let shape = Shape::Str;
        let value = Value::Str("root".into());
        let locator = Locator::Bound(&shape, &value);
        let stack = PathStack::new();
        let cancel = CancelToken::new();
        let mut state = ValidationState::new();
        let args = Vec::new();

        let mut ctx = RuleContext::new(locator, &args, &mut state, &stack, locator, &cancel);
        assert!(ctx.field("missing").is_none());
        assert!(ctx.last_field().is_none());
        assert_eq!(ctx.field(""), Some(locator));
        assert_eq!(ctx.last_field(), Some(locator));
        assert_eq!(ctx.field_name(), None);
    }
}
