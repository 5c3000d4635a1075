//! English message catalog for the builtin rules

use super::resolver::MessageResolver;
use crate::rules::Hint;

fn sized(
    fallback: &str,
    numeric: &str,
    string: &str,
    array: &str,
) -> MessageResolver {
    MessageResolver::hinted(
        fallback,
        [
            (Hint::Numeric, numeric),
            (Hint::String, string),
            (Hint::Array, array),
        ],
    )
}

/// Messages registered for `en`, `en-us` and `en-gb`
pub fn english() -> Vec<(&'static str, MessageResolver)> {
    use MessageResolver as M;

    vec![
        ("accepted", M::fixed("The :attribute field must be accepted.")),
        ("after", M::fixed("The :attribute field must be a date after :date.")),
        (
            "after_or_equal",
            M::fixed("The :attribute field must be a date after or equal to :date."),
        ),
        ("alpha", M::fixed("The :attribute field must only contain letters.")),
        (
            "alpha_dash",
            M::fixed(
                "The :attribute field must only contain letters, numbers, dashes, and underscores.",
            ),
        ),
        (
            "alpha_numeric",
            M::fixed("The :attribute field must only contain letters and numbers."),
        ),
        (
            "ascii",
            M::fixed(
                "The :attribute field must only contain single-byte alphanumeric characters and symbols.",
            ),
        ),
        ("bail", M::fixed("The :attribute field must pass.")),
        ("before", M::fixed("The :attribute field must be a date before :date.")),
        (
            "before_or_equal",
            M::fixed("The :attribute field must be a date before or equal to :date."),
        ),
        (
            "between",
            sized(
                "The :attribute field must be between :arg0 and :arg1.",
                "The :attribute field must be between :arg0 and :arg1.",
                "The :attribute field must be between :arg0 and :arg1 characters.",
                "The :attribute field must have between :arg0 and :arg1 items.",
            ),
        ),
        ("boolean", M::fixed("The :attribute field must be true or false.")),
        ("confirmed", M::fixed("The :attribute field confirmation does not match.")),
        ("date", M::fixed("The :attribute field must be a valid date.")),
        ("date_format", M::fixed("The :attribute field must match the format :arg.")),
        ("declined", M::fixed("The :attribute field must be declined.")),
        ("digits", M::fixed("The :attribute field must be :arg digits.")),
        (
            "digits_between",
            M::fixed("The :attribute field must be between :arg0 and :arg1 digits."),
        ),
        ("email", M::fixed("The :attribute field must be a valid email address.")),
        (
            "ends_with",
            M::fixed("The :attribute field must end with one of the following: :args."),
        ),
        (
            "extensions",
            M::fixed("The :attribute field must have one of the following extensions: :args."),
        ),
        ("filled", M::fixed("The :attribute field must have a value.")),
        (
            "gt",
            sized(
                "The :attribute field must be greater than :other.",
                "The :attribute field must be greater than :other.",
                "The :attribute field must have more characters than :other.",
                "The :attribute field must have more items than :other.",
            ),
        ),
        (
            "gte",
            sized(
                "The :attribute field must be greater than or equal to :other.",
                "The :attribute field must be greater than or equal to :other.",
                "The :attribute field must have at least as many characters as :other.",
                "The :attribute field must have at least as many items as :other.",
            ),
        ),
        ("hex_color", M::fixed("The :attribute field must be a valid hexadecimal color.")),
        ("in", M::fixed("The selected :attribute is invalid.")),
        ("ip", M::fixed("The :attribute field must be a valid IP address.")),
        ("ipv4", M::fixed("The :attribute field must be a valid IPv4 address.")),
        ("ipv6", M::fixed("The :attribute field must be a valid IPv6 address.")),
        ("json", M::fixed("The :attribute field must be a valid JSON string.")),
        ("lowercase", M::fixed("The :attribute field must be lowercase.")),
        (
            "lt",
            sized(
                "The :attribute field must be less than :other.",
                "The :attribute field must be less than :other.",
                "The :attribute field must have fewer characters than :other.",
                "The :attribute field must have fewer items than :other.",
            ),
        ),
        (
            "lte",
            sized(
                "The :attribute field must be less than or equal to :other.",
                "The :attribute field must be less than or equal to :other.",
                "The :attribute field must not have more characters than :other.",
                "The :attribute field must not have more items than :other.",
            ),
        ),
        ("mac_address", M::fixed("The :attribute field must be a valid MAC address.")),
        (
            "max",
            sized(
                "The :attribute field must not be greater than :arg.",
                "The :attribute field must not be greater than :arg.",
                "The :attribute field must not be greater than :arg characters.",
                "The :attribute field must not have more than :arg items.",
            ),
        ),
        (
            "max_digits",
            M::fixed("The :attribute field must not have more than :arg digits."),
        ),
        ("mimetypes", M::fixed("The :attribute field must be a file of type: :args.")),
        (
            "min",
            sized(
                "The :attribute field must be at least :arg.",
                "The :attribute field must be at least :arg.",
                "The :attribute field must be at least :arg characters.",
                "The :attribute field must have at least :arg items.",
            ),
        ),
        ("min_digits", M::fixed("The :attribute field must have at least :arg digits.")),
        ("not_in", M::fixed("The selected :attribute is invalid.")),
        ("not_nil", M::fixed("The :attribute field must not be nil.")),
        ("not_regex", M::fixed("The :attribute field format is invalid.")),
        ("numeric", M::fixed("The :attribute field must be a number.")),
        ("regex", M::fixed("The :attribute field format is invalid.")),
        ("required", M::fixed("The :attribute field is required.")),
        (
            "size",
            sized(
                "The :attribute field must be of size :arg.",
                "The :attribute field must be :arg.",
                "The :attribute field must be :arg characters.",
                "The :attribute field must contain :arg items.",
            ),
        ),
        (
            "starts_with",
            M::fixed("The :attribute field must start with one of the following: :args."),
        ),
        ("uppercase", M::fixed("The :attribute field must be uppercase.")),
        ("url", M::fixed("The :attribute field must be a valid URL.")),
        ("uuid", M::fixed("The :attribute field must be a valid UUID.")),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_catalog_has_unique_rule_names() {
        let catalog = english();
        let names: HashSet<_> = catalog.iter().map(|(name, _)| *name).collect();
        assert_eq!(names.len(), catalog.len());
    }

    #[test]
    fn test_sized_messages_pick_by_hint() {
        let catalog = english();
        let (_, min) = catalog.iter().find(|(name, _)| *name == "min").unwrap();
        assert_eq!(
            min.resolve(Some(Hint::String)),
            "The :attribute field must be at least :arg characters."
        );
        assert_eq!(min.resolve(Some(Hint::UnsupportedType)), "The :attribute field must be at least :arg.");
    }
}
