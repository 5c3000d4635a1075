#![forbid(unsafe_code)]

//! Builtin rule predicates
//!
//! Each predicate is a plain function over the [`RuleContext`]. Unless a rule
//! is about presence (`required`, `not_nil`, `accepted`, `declined`), an
//! absent value passes, and so does a rule whose arguments cannot be parsed.

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use regex::Regex;
use std::cmp::Ordering;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};
use std::sync::LazyLock;
use tracing::warn;

use crate::engine::{PARSED_DATE_KEY, RuleContext};
use crate::locator::{Conversion, Locator};
use crate::model::{Shape, Value};
use crate::rules::registry::RuleRegistry;
use crate::rules::{Hint, Outcome};

/// Signature shared by every builtin predicate
pub type Predicate = fn(&mut RuleContext<'_, '_>) -> Outcome;

/// Builtin rules by name
pub const BUILTIN_RULES: &[(&str, Predicate)] = &[
    ("accepted", accepted),
    ("after", after),
    ("after_or_equal", after_or_equal),
    ("alpha", alpha),
    ("alpha_dash", alpha_dash),
    ("alpha_numeric", alpha_numeric),
    ("ascii", ascii),
    ("bail", bail),
    ("before", before),
    ("before_or_equal", before_or_equal),
    ("between", between),
    ("boolean", boolean),
    ("confirmed", confirmed),
    ("date", date),
    ("date_format", date_format),
    ("declined", declined),
    ("digits", digits),
    ("digits_between", digits_between),
    ("email", email),
    ("ends_with", ends_with),
    ("extensions", extensions),
    ("filled", filled),
    ("gt", gt),
    ("gte", gte),
    ("hex_color", hex_color),
    ("in", is_in),
    ("ip", ip),
    ("ipv4", ipv4),
    ("ipv6", ipv6),
    ("json", json),
    ("lowercase", lowercase),
    ("lt", lt),
    ("lte", lte),
    ("mac_address", mac_address),
    ("max", max),
    ("max_digits", max_digits),
    ("mimetypes", mimetypes),
    ("min", min),
    ("min_digits", min_digits),
    ("not_in", not_in),
    ("not_nil", not_nil),
    ("not_regex", not_regex),
    ("numeric", numeric),
    ("regex", regex),
    ("required", required),
    ("size", size),
    ("starts_with", starts_with),
    ("uppercase", uppercase),
    ("url", url),
    ("uuid", uuid),
];

/// Registers every builtin rule, without messages
pub fn register_all(registry: &mut RuleRegistry) {
    for (name, predicate) in BUILTIN_RULES {
        if let Err(error) = registry.register(name, *predicate) {
            warn!(%error, "skipping builtin rule");
        }
    }
}

fn fail(hint: Hint) -> Outcome {
    Err(hint)
}

/// Unwraps a conversion result, mapping failures to their outcome
macro_rules! convert {
    ($expr:expr) => {
        match $expr {
            Ok(value) => value,
            Err(conversion) => return conversion.outcome(),
        }
    };
}

// Presence

pub fn required(ctx: &mut RuleContext<'_, '_>) -> Outcome {
    ctx.unwrap_references();
    match ctx.value() {
        None => fail(Hint::Required),
        Some(Value::Str(text)) if text.is_empty() => fail(Hint::Required),
        Some(Value::List(items)) if items.is_empty() => fail(Hint::Required),
        Some(Value::Map(entries)) if entries.is_empty() => fail(Hint::Required),
        Some(_) => Ok(()),
    }
}

pub fn not_nil(ctx: &mut RuleContext<'_, '_>) -> Outcome {
    if !ctx.unwrap_references() {
        return fail(Hint::Nil);
    }
    Ok(())
}

pub fn filled(ctx: &mut RuleContext<'_, '_>) -> Outcome {
    ctx.unwrap_references();
    match ctx.value() {
        Some(Value::Str(text)) if text.is_empty() => fail(Hint::Required),
        Some(Value::List(items)) if items.is_empty() => fail(Hint::Required),
        Some(Value::Map(entries)) if entries.is_empty() => fail(Hint::Required),
        _ => Ok(()),
    }
}

pub fn bail(ctx: &mut RuleContext<'_, '_>) -> Outcome {
    ctx.bail();
    Ok(())
}

// Booleans

fn is_boolish(locator: &Locator<'_>) -> bool {
    matches!(locator.shape(), Shape::Bool | Shape::Str) || locator.is_int() || locator.is_uint()
}

fn acceptance(ctx: &mut RuleContext<'_, '_>, accept: bool) -> Outcome {
    ctx.unwrap_references();
    if !is_boolish(ctx) {
        return fail(Hint::InvalidType);
    }
    let words: &[&str] = if accept {
        &["yes", "on", "1", "true"]
    } else {
        &["no", "off", "0", "false"]
    };
    let expected_number = u64::from(accept);

    let matched = match ctx.value() {
        None => false,
        Some(Value::Bool(flag)) => *flag == accept,
        Some(Value::Str(text)) => words.contains(&text.as_str()),
        Some(Value::Int(number)) => u64::try_from(*number).is_ok_and(|n| n == expected_number),
        Some(Value::Uint(number)) => *number == expected_number,
        Some(_) => return fail(Hint::InvalidType),
    };
    if matched {
        Ok(())
    } else {
        fail(Hint::Unacceptable)
    }
}

pub fn accepted(ctx: &mut RuleContext<'_, '_>) -> Outcome {
    acceptance(ctx, true)
}

pub fn declined(ctx: &mut RuleContext<'_, '_>) -> Outcome {
    acceptance(ctx, false)
}

pub fn boolean(ctx: &mut RuleContext<'_, '_>) -> Outcome {
    ctx.unwrap_references();
    if !is_boolish(ctx) {
        return fail(Hint::InvalidType);
    }
    let valid = match ctx.value() {
        None | Some(Value::Bool(_)) => true,
        Some(Value::Str(text)) => matches!(
            text.as_str(),
            "yes" | "on" | "1" | "true" | "no" | "off" | "0" | "false"
        ),
        Some(Value::Int(number)) => matches!(number, 0 | 1),
        Some(Value::Uint(number)) => matches!(number, 0 | 1),
        Some(_) => return fail(Hint::InvalidType),
    };
    if valid {
        Ok(())
    } else {
        fail(Hint::NotABoolean)
    }
}

// Numbers and sizes

pub fn numeric(ctx: &mut RuleContext<'_, '_>) -> Outcome {
    ctx.unwrap_references();
    if ctx.is_numeric() {
        return Ok(());
    }
    if !ctx.is_str() {
        return fail(Hint::NotNumeric);
    }
    let text = convert!(ctx.string());
    match text.parse::<i64>() {
        Ok(_) => Ok(()),
        Err(_) => fail(Hint::NotNumeric),
    }
}

/// A numeric value or a length, ready for comparison against arguments
enum Measure {
    Float(f64),
    Whole(i128, Hint),
}

impl Measure {
    /// Measures the field; None when it has no value
    fn of(ctx: &RuleContext<'_, '_>, allow_float: bool) -> Result<Option<Self>, Hint> {
        let supported = ctx.is_int() || ctx.is_uint() || ctx.has_len() || (allow_float && ctx.is_float());
        if !supported {
            return Err(Hint::UnsupportedType);
        }
        if !ctx.has_value() {
            return Ok(None);
        }

        if ctx.is_float() {
            return Ok(ctx.float().ok().map(Measure::Float));
        }
        if let Ok(number) = ctx.int() {
            return Ok(Some(Measure::Whole(i128::from(number), Hint::Numeric)));
        }
        if let Ok(number) = ctx.uint() {
            return Ok(Some(Measure::Whole(i128::from(number), Hint::Numeric)));
        }
        let hint = if ctx.is_str() { Hint::String } else { Hint::Array };
        Ok(ctx
            .len()
            .ok()
            .map(|len| Measure::Whole(len as i128, hint)))
    }

    /// Checks the measure against the bounds parsed from `args`
    ///
    /// `accept` gets the measure and the parsed bounds, as floats or whole
    /// numbers depending on the measure.
    fn check(
        self,
        args: &[String],
        accept_float: impl Fn(f64, &[f64]) -> bool,
        accept_whole: impl Fn(i128, &[i128]) -> bool,
    ) -> Outcome {
        match self {
            Measure::Float(value) => {
                let Ok(bounds) = args.iter().map(|arg| arg.trim().parse::<f64>()).collect::<Result<Vec<_>, _>>()
                else {
                    return Ok(());
                };
                if accept_float(value, &bounds) {
                    Ok(())
                } else {
                    fail(Hint::Numeric)
                }
            }
            Measure::Whole(value, hint) => {
                let Ok(bounds) = args.iter().map(|arg| arg.trim().parse::<i128>()).collect::<Result<Vec<_>, _>>()
                else {
                    return Ok(());
                };
                if accept_whole(value, &bounds) {
                    Ok(())
                } else {
                    fail(hint)
                }
            }
        }
    }
}

pub fn min(ctx: &mut RuleContext<'_, '_>) -> Outcome {
    ctx.unwrap_references();
    let measure = match Measure::of(ctx, true) {
        Ok(Some(measure)) => measure,
        Ok(None) => return Ok(()),
        Err(hint) => return fail(hint),
    };
    let Some(bound) = ctx.args().first() else {
        return Ok(());
    };
    measure.check(
        std::slice::from_ref(bound),
        |value, bounds| value >= bounds[0],
        |value, bounds| value >= bounds[0],
    )
}

pub fn max(ctx: &mut RuleContext<'_, '_>) -> Outcome {
    ctx.unwrap_references();
    let measure = match Measure::of(ctx, true) {
        Ok(Some(measure)) => measure,
        Ok(None) => return Ok(()),
        Err(hint) => return fail(hint),
    };
    let Some(bound) = ctx.args().first() else {
        return Ok(());
    };
    measure.check(
        std::slice::from_ref(bound),
        |value, bounds| value <= bounds[0],
        |value, bounds| value <= bounds[0],
    )
}

pub fn between(ctx: &mut RuleContext<'_, '_>) -> Outcome {
    ctx.unwrap_references();
    let measure = match Measure::of(ctx, true) {
        Ok(Some(measure)) => measure,
        Ok(None) => return Ok(()),
        Err(hint) => return fail(hint),
    };
    let args = ctx.args();
    if args.len() < 2 {
        return Ok(());
    }
    measure.check(
        &args[..2],
        |value, bounds| value >= bounds[0] && value <= bounds[1],
        |value, bounds| value >= bounds[0] && value <= bounds[1],
    )
}

/// Exact integer value, string length or item count; floats are unsupported
pub fn size(ctx: &mut RuleContext<'_, '_>) -> Outcome {
    ctx.unwrap_references();
    let measure = match Measure::of(ctx, false) {
        Ok(Some(measure)) => measure,
        Ok(None) => return Ok(()),
        Err(hint) => return fail(hint),
    };
    let Some(bound) = ctx.args().first() else {
        return Ok(());
    };
    measure.check(
        std::slice::from_ref(bound),
        |value, bounds| value == bounds[0],
        |value, bounds| value == bounds[0],
    )
}

// Digits

/// Number of digits before any decimal separator or exponent
fn digit_count(ctx: &RuleContext<'_, '_>) -> Result<Option<usize>, Hint> {
    let supported = ctx.is_str() || ctx.is_numeric();
    if !supported {
        return Err(Hint::InvalidType);
    }
    let text = match ctx.value() {
        None => return Ok(None),
        Some(Value::Str(text)) => {
            if text.trim().parse::<i64>().is_err() {
                return Err(Hint::StringWithoutDigits);
            }
            text.clone()
        }
        Some(Value::Int(number)) => number.to_string(),
        Some(Value::Uint(number)) => number.to_string(),
        Some(Value::Float(number)) => number.to_string(),
        Some(_) => return Err(Hint::InvalidType),
    };

    let count = text
        .chars()
        .take_while(|c| !matches!(c, '.' | ',' | 'e' | 'E'))
        .filter(char::is_ascii_digit)
        .count();
    Ok(Some(count))
}

fn with_digits(
    ctx: &mut RuleContext<'_, '_>,
    check: impl Fn(usize, &[String]) -> Outcome,
) -> Outcome {
    ctx.unwrap_references();
    match digit_count(ctx) {
        Ok(Some(count)) => check(count, ctx.args()),
        Ok(None) => Ok(()),
        Err(hint) => fail(hint),
    }
}

fn first_usize(args: &[String]) -> Option<usize> {
    args.first()?.trim().parse().ok()
}

pub fn digits(ctx: &mut RuleContext<'_, '_>) -> Outcome {
    with_digits(ctx, |count, args| match first_usize(args) {
        Some(expected) if count != expected => fail(Hint::Digits),
        _ => Ok(()),
    })
}

pub fn min_digits(ctx: &mut RuleContext<'_, '_>) -> Outcome {
    with_digits(ctx, |count, args| match first_usize(args) {
        Some(bound) if count < bound => fail(Hint::Min),
        _ => Ok(()),
    })
}

pub fn max_digits(ctx: &mut RuleContext<'_, '_>) -> Outcome {
    with_digits(ctx, |count, args| match first_usize(args) {
        Some(bound) if count > bound => fail(Hint::Max),
        _ => Ok(()),
    })
}

/// Requires two arguments but reads both bounds from the first one
pub fn digits_between(ctx: &mut RuleContext<'_, '_>) -> Outcome {
    with_digits(ctx, |count, args| {
        if args.len() < 2 {
            return Ok(());
        }
        let (Some(lower), Some(upper)) = (first_usize(args), first_usize(args)) else {
            return Ok(());
        };
        if count < lower || count > upper {
            return fail(Hint::Between);
        }
        Ok(())
    })
}

// Membership

/// The field as text for `in` and `not_in`; None for other types
fn membership_text(ctx: &RuleContext<'_, '_>) -> Option<String> {
    match ctx.value()? {
        Value::Str(text) => Some(text.clone()),
        Value::Int(number) => Some(number.to_string()),
        Value::Uint(number) => Some(number.to_string()),
        _ => None,
    }
}

pub fn is_in(ctx: &mut RuleContext<'_, '_>) -> Outcome {
    ctx.unwrap_references();
    if ctx.args().is_empty() || !ctx.has_value() {
        return Ok(());
    }
    match membership_text(ctx) {
        Some(text) if ctx.args().iter().any(|allowed| *allowed == text) => Ok(()),
        _ => fail(Hint::NotIn),
    }
}

pub fn not_in(ctx: &mut RuleContext<'_, '_>) -> Outcome {
    ctx.unwrap_references();
    if ctx.args().is_empty() || !ctx.has_value() {
        return Ok(());
    }
    match membership_text(ctx) {
        Some(text) if ctx.args().iter().any(|denied| *denied == text) => fail(Hint::In),
        _ => Ok(()),
    }
}

// Text

pub fn starts_with(ctx: &mut RuleContext<'_, '_>) -> Outcome {
    ctx.unwrap_references();
    let text = convert!(ctx.string_like());
    let args = ctx.args();
    if args.is_empty() || args.iter().any(|prefix| text.starts_with(prefix.as_str())) {
        return Ok(());
    }
    fail(Hint::StartsWith)
}

pub fn ends_with(ctx: &mut RuleContext<'_, '_>) -> Outcome {
    ctx.unwrap_references();
    let text = convert!(ctx.string_like());
    let args = ctx.args();
    if args.is_empty() || args.iter().any(|suffix| text.ends_with(suffix.as_str())) {
        return Ok(());
    }
    fail(Hint::EndsWith)
}

fn alphabetic(ctx: &mut RuleContext<'_, '_>, numbers: bool, dashes: bool) -> Outcome {
    ctx.unwrap_references();
    let text = convert!(ctx.string_like());
    let ascii_only = ctx.args().iter().any(|arg| arg == "ascii");

    let allowed = |c: char| {
        if ascii_only && !c.is_ascii() {
            return false;
        }
        c.is_alphabetic()
            || (numbers && c.is_numeric())
            || (dashes && matches!(c, '-' | '_'))
    };
    if text.chars().all(allowed) {
        Ok(())
    } else {
        fail(Hint::Invalid)
    }
}

pub fn alpha(ctx: &mut RuleContext<'_, '_>) -> Outcome {
    alphabetic(ctx, false, false)
}

pub fn alpha_dash(ctx: &mut RuleContext<'_, '_>) -> Outcome {
    alphabetic(ctx, true, true)
}

pub fn alpha_numeric(ctx: &mut RuleContext<'_, '_>) -> Outcome {
    alphabetic(ctx, true, false)
}

pub fn ascii(ctx: &mut RuleContext<'_, '_>) -> Outcome {
    ctx.unwrap_references();
    let text = convert!(ctx.string_like());
    if text.is_ascii() {
        Ok(())
    } else {
        fail(Hint::NotAscii)
    }
}

pub fn lowercase(ctx: &mut RuleContext<'_, '_>) -> Outcome {
    ctx.unwrap_references();
    let text = convert!(ctx.string_like());
    if text.to_lowercase() == *text {
        Ok(())
    } else {
        fail(Hint::NotLowercase)
    }
}

pub fn uppercase(ctx: &mut RuleContext<'_, '_>) -> Outcome {
    ctx.unwrap_references();
    let text = convert!(ctx.string_like());
    if text.to_uppercase() == *text {
        Ok(())
    } else {
        fail(Hint::NotUppercase)
    }
}

pub fn hex_color(ctx: &mut RuleContext<'_, '_>) -> Outcome {
    ctx.unwrap_references();
    let text = convert!(ctx.string());
    let valid = matches!(text.len(), 4 | 5 | 7 | 9)
        && text
            .strip_prefix('#')
            .is_some_and(|digits| digits.chars().all(|c| c.is_ascii_hexdigit()));
    if valid {
        Ok(())
    } else {
        fail(Hint::Invalid)
    }
}

pub fn json(ctx: &mut RuleContext<'_, '_>) -> Outcome {
    ctx.unwrap_references();
    let text = convert!(ctx.string_like());
    match serde_json::from_str::<serde_json::Value>(&text) {
        Ok(_) => Ok(()),
        Err(_) => fail(Hint::Json),
    }
}

/// `/pattern/` arguments with their slashes removed
fn patterns(args: &[String]) -> impl Iterator<Item = &str> {
    args.iter().filter_map(|arg| {
        if arg.len() < 2 {
            return None;
        }
        arg.strip_prefix('/')?.strip_suffix('/')
    })
}

/// The field as a string, where any non-string type fails with `not_string`
fn string_or_not_string<'a>(ctx: &RuleContext<'_, 'a>) -> Result<Option<&'a str>, Hint> {
    match ctx.string() {
        Ok(text) => Ok(Some(text)),
        Err(Conversion::Absent) => Ok(None),
        Err(_) => Err(Hint::NotString),
    }
}

pub fn regex(ctx: &mut RuleContext<'_, '_>) -> Outcome {
    ctx.unwrap_references();
    let text = match string_or_not_string(ctx) {
        Ok(Some(text)) => text,
        Ok(None) => return Ok(()),
        Err(hint) => return fail(hint),
    };
    if ctx.args().is_empty() {
        return Ok(());
    }
    for pattern in patterns(ctx.args()) {
        let Ok(compiled) = Regex::new(pattern) else {
            return fail(Hint::Invalid);
        };
        if compiled.is_match(text) {
            return Ok(());
        }
    }
    fail(Hint::Regex)
}

pub fn not_regex(ctx: &mut RuleContext<'_, '_>) -> Outcome {
    ctx.unwrap_references();
    let text = match string_or_not_string(ctx) {
        Ok(Some(text)) => text,
        Ok(None) => return Ok(()),
        Err(hint) => return fail(hint),
    };
    for pattern in patterns(ctx.args()) {
        let Ok(compiled) = Regex::new(pattern) else {
            return fail(Hint::Invalid);
        };
        if compiled.is_match(text) {
            return fail(Hint::Matched);
        }
    }
    Ok(())
}

// Network and identifiers

pub fn ip(ctx: &mut RuleContext<'_, '_>) -> Outcome {
    ctx.unwrap_references();
    let text = convert!(ctx.string());
    match text.parse::<IpAddr>() {
        Ok(_) => Ok(()),
        Err(_) => fail(Hint::Invalid),
    }
}

/// IPv4 addresses, including IPv4-mapped IPv6 ones
fn as_ipv4(text: &str) -> Option<Ipv4Addr> {
    match text.parse::<IpAddr>().ok()? {
        IpAddr::V4(address) => Some(address),
        IpAddr::V6(address) => address.to_ipv4_mapped(),
    }
}

pub fn ipv4(ctx: &mut RuleContext<'_, '_>) -> Outcome {
    ctx.unwrap_references();
    let text = match string_or_not_string(ctx) {
        Ok(Some(text)) => text,
        Ok(None) => return Ok(()),
        Err(hint) => return fail(hint),
    };
    match as_ipv4(text) {
        Some(_) => Ok(()),
        None => fail(Hint::Invalid),
    }
}

pub fn ipv6(ctx: &mut RuleContext<'_, '_>) -> Outcome {
    ctx.unwrap_references();
    let text = convert!(ctx.string());
    if text.parse::<Ipv6Addr>().is_err() || as_ipv4(text).is_some() {
        return fail(Hint::Invalid);
    }
    Ok(())
}

/// Colon, dash or dot separated hardware addresses of 6, 8 or 20 octets
fn is_mac_address(text: &str) -> bool {
    const OCTET_COUNTS: [usize; 3] = [6, 8, 20];

    let hex = |group: &str, len: usize| {
        group.len() == len && group.chars().all(|c| c.is_ascii_hexdigit())
    };

    if text.contains('.') {
        let groups: Vec<&str> = text.split('.').collect();
        return OCTET_COUNTS.contains(&(groups.len() * 2))
            && groups.iter().all(|group| hex(group, 4));
    }

    for separator in [':', '-'] {
        if text.contains(separator) {
            let groups: Vec<&str> = text.split(separator).collect();
            return OCTET_COUNTS.contains(&groups.len())
                && groups.iter().all(|group| hex(group, 2));
        }
    }
    false
}

pub fn mac_address(ctx: &mut RuleContext<'_, '_>) -> Outcome {
    ctx.unwrap_references();
    let text = convert!(ctx.string());
    if is_mac_address(text) {
        Ok(())
    } else {
        fail(Hint::Invalid)
    }
}

pub fn uuid(ctx: &mut RuleContext<'_, '_>) -> Outcome {
    ctx.unwrap_references();
    let text = convert!(ctx.string());
    let Ok(parsed) = uuid::Uuid::parse_str(text) else {
        return fail(Hint::Invalid);
    };
    if ctx.args().is_empty() {
        return Ok(());
    }

    let version = parsed.get_version_num();
    let allowed = ctx.args().iter().any(|arg| {
        let number = arg.strip_prefix('v').unwrap_or(arg);
        number
            .parse::<usize>()
            .is_ok_and(|number| (1..=15).contains(&number) && number == version)
    });
    if allowed {
        Ok(())
    } else {
        fail(Hint::Version)
    }
}

static EMAIL_ADDRESS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^[A-Za-z0-9.!#$%&'*+/=?^_`{|}~-]+@([A-Za-z0-9](?:[A-Za-z0-9-]*[A-Za-z0-9])?(?:\.[A-Za-z0-9](?:[A-Za-z0-9-]*[A-Za-z0-9])?)*|\[[0-9A-Fa-f:.]+\])$",
    )
    .expect("email pattern is valid")
});

/// Splits `Name <user@host>` into its display name and address
fn split_address(text: &str) -> Option<(&str, &str)> {
    let text = text.trim();
    match text.strip_suffix('>') {
        Some(rest) => {
            let (name, address) = rest.rsplit_once('<')?;
            Some((name.trim().trim_matches('"'), address.trim()))
        }
        None => Some(("", text)),
    }
}

fn is_local_host(host: &str) -> bool {
    let host = host.trim_start_matches('[').trim_end_matches(']');
    if host
        .rsplit('.')
        .next()
        .is_some_and(|label| label.eq_ignore_ascii_case("localhost"))
    {
        return true;
    }
    match host.parse::<IpAddr>() {
        Ok(address) => address.is_loopback() || address.is_unspecified(),
        Err(_) => false,
    }
}

/// Email address; arguments `allow_name`, `require_name` and `no_localhost`
pub fn email(ctx: &mut RuleContext<'_, '_>) -> Outcome {
    ctx.unwrap_references();
    let text = convert!(ctx.string());
    let Some((name, address)) = split_address(text) else {
        return fail(Hint::Invalid);
    };
    if !EMAIL_ADDRESS.is_match(address) {
        return fail(Hint::Invalid);
    }

    let has_arg = |wanted: &str| ctx.args().iter().any(|arg| arg == wanted);

    if has_arg("no_localhost") {
        let host = address.rsplit_once('@').map(|(_, host)| host).unwrap_or_default();
        if is_local_host(host) {
            return fail(Hint::NoLocalhost);
        }
    }

    if has_arg("require_name") {
        if name.is_empty() {
            return fail(Hint::Invalid);
        }
    } else if !has_arg("allow_name") && !name.is_empty() {
        return fail(Hint::Invalid);
    }
    Ok(())
}

static URL_SCHEME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([A-Za-z][A-Za-z0-9+.-]*):(\S+)$").expect("url pattern is valid")
});

/// Absolute URL or absolute path, optionally restricted to given schemes
pub fn url(ctx: &mut RuleContext<'_, '_>) -> Outcome {
    ctx.unwrap_references();
    let text = convert!(ctx.string());

    let scheme = if let Some(captures) = URL_SCHEME.captures(text) {
        captures.get(1).map_or("", |scheme| scheme.as_str())
    } else if text.starts_with('/') && !text.chars().any(char::is_whitespace) {
        ""
    } else {
        return fail(Hint::Invalid);
    };

    let args = ctx.args();
    if args.is_empty() || args.iter().any(|allowed| allowed.eq_ignore_ascii_case(scheme)) {
        return Ok(());
    }
    fail(Hint::Protocol)
}

// Files

pub fn extensions(ctx: &mut RuleContext<'_, '_>) -> Outcome {
    ctx.unwrap_references();
    let text = convert!(ctx.string());
    let args = ctx.args();
    if args.is_empty() {
        return Ok(());
    }
    if text.is_empty() {
        return fail(Hint::Extension);
    }

    let matched = args.iter().filter(|arg| !arg.is_empty()).any(|extension| {
        if extension.starts_with('.') {
            text.ends_with(extension.as_str())
        } else {
            text.ends_with(&format!(".{extension}"))
        }
    });
    if matched {
        Ok(())
    } else {
        fail(Hint::Extension)
    }
}

/// Exact mimetypes, or prefixes when the argument ends in `*`
pub fn mimetypes(ctx: &mut RuleContext<'_, '_>) -> Outcome {
    ctx.unwrap_references();
    let mimetype = convert!(ctx.string());
    let args = ctx.args();
    if args.is_empty() {
        return Ok(());
    }

    let matched = args.iter().any(|allowed| match allowed.strip_suffix('*') {
        Some(prefix) => mimetype.starts_with(prefix),
        None => mimetype == allowed,
    });
    if matched {
        Ok(())
    } else {
        fail(Hint::Mimetype)
    }
}

// Dates

pub fn date(ctx: &mut RuleContext<'_, '_>) -> Outcome {
    ctx.unwrap_references();
    convert!(ctx.date());
    Ok(())
}

/// Parses `text` with a strftime-style `format`
fn parse_with_format(text: &str, format: &str) -> Option<DateTime<Utc>> {
    if let Ok(date) = DateTime::parse_from_str(text, format) {
        return Some(date.with_timezone(&Utc));
    }
    if let Ok(date) = NaiveDateTime::parse_from_str(text, format) {
        return Some(date.and_utc());
    }
    if let Ok(date) = NaiveDate::parse_from_str(text, format) {
        return Some(date.and_time(NaiveTime::MIN).and_utc());
    }
    NaiveTime::parse_from_str(text, format)
        .ok()
        .map(|time| NaiveDate::default().and_time(time).and_utc())
}

/// Matches one of the given formats and keeps the parsed date for later rules
pub fn date_format(ctx: &mut RuleContext<'_, '_>) -> Outcome {
    ctx.unwrap_references();
    let text = convert!(ctx.string());
    if ctx.args().is_empty() {
        return Ok(());
    }

    let parsed = ctx
        .args()
        .iter()
        .find_map(|format| parse_with_format(text, format));
    match parsed {
        Some(date) => {
            ctx.set_state(PARSED_DATE_KEY, date);
            Ok(())
        }
        None => fail(Hint::Format),
    }
}

fn compare_date(
    ctx: &mut RuleContext<'_, '_>,
    accept: impl Fn(Ordering) -> bool,
    hint: Hint,
) -> Outcome {
    ctx.unwrap_references();
    let field = convert!(ctx.date());
    if ctx.args().is_empty() {
        return Ok(());
    }
    let Some(reference) = ctx.date_from_arg(0) else {
        return fail(Hint::InvalidParam);
    };
    if accept(field.cmp(&reference)) {
        Ok(())
    } else {
        fail(hint)
    }
}

pub fn after(ctx: &mut RuleContext<'_, '_>) -> Outcome {
    compare_date(ctx, |order| order == Ordering::Greater, Hint::After)
}

pub fn after_or_equal(ctx: &mut RuleContext<'_, '_>) -> Outcome {
    compare_date(ctx, |order| order != Ordering::Less, Hint::After)
}

pub fn before(ctx: &mut RuleContext<'_, '_>) -> Outcome {
    compare_date(ctx, |order| order == Ordering::Less, Hint::Before)
}

pub fn before_or_equal(ctx: &mut RuleContext<'_, '_>) -> Outcome {
    compare_date(ctx, |order| order != Ordering::Greater, Hint::Before)
}

// Other fields

/// Must equal the sibling field named `<field>_confirmation`
pub fn confirmed(ctx: &mut RuleContext<'_, '_>) -> Outcome {
    ctx.unwrap_references();
    let Some(name) = ctx.field_name() else {
        return fail(Hint::FieldNotInStruct);
    };
    let Some(value) = ctx.value() else {
        return Ok(());
    };

    let other = ctx
        .field(&format!(".{name}_confirmation"))
        .map(Locator::unwrapped);
    match other.and_then(|other| other.value()) {
        None => fail(Hint::FieldMissing),
        Some(confirmation) if value.loosely_equals(confirmation) => Ok(()),
        Some(_) => fail(Hint::NotEqual),
    }
}

/// Orders the field against the field named by the first argument
///
/// Numbers compare by value, strings and lists by length. Returns the
/// ordering with the hint describing what was compared, or None when the
/// field has no value.
fn compare_fields(ctx: &mut RuleContext<'_, '_>) -> Result<Option<(Ordering, Hint)>, Hint> {
    let Some(path) = ctx.arg(0) else {
        return Err(Hint::Invalid);
    };
    ctx.unwrap_references();
    if !ctx.has_value() {
        return Ok(None);
    }

    let other = ctx.field(path).ok_or(Hint::Invalid)?.unwrapped();
    if !other.has_value() {
        return Err(Hint::Invalid);
    }
    let this = ctx.locator();

    if this.is_numeric() || other.is_numeric() {
        if !this.is_numeric() || !other.is_numeric() {
            return Err(Hint::InvalidType);
        }
        let order = if this.is_float() || other.is_float() {
            let (a, b) = (this.float(), other.float());
            a.ok()
                .zip(b.ok())
                .and_then(|(a, b)| a.partial_cmp(&b))
                .ok_or(Hint::InvalidType)?
        } else if this.is_uint() && other.is_uint() {
            let (a, b) = (this.uint(), other.uint());
            a.ok().zip(b.ok()).map(|(a, b)| a.cmp(&b)).ok_or(Hint::InvalidType)?
        } else {
            let (a, b) = (this.int(), other.int());
            a.ok().zip(b.ok()).map(|(a, b)| a.cmp(&b)).ok_or(Hint::InvalidType)?
        };
        return Ok(Some((order, Hint::Numeric)));
    }

    let hint = if this.is_list() || other.is_list() {
        if !this.is_list() || !other.is_list() {
            return Err(Hint::InvalidType);
        }
        Hint::Array
    } else if this.is_str() && other.is_str() {
        Hint::String
    } else {
        return Err(Hint::InvalidType);
    };

    let (a, b) = (this.len(), other.len());
    let order = a.ok().zip(b.ok()).map(|(a, b)| a.cmp(&b)).ok_or(Hint::InvalidType)?;
    Ok(Some((order, hint)))
}

fn compare_with_field(ctx: &mut RuleContext<'_, '_>, accept: impl Fn(Ordering) -> bool) -> Outcome {
    match compare_fields(ctx)? {
        Some((order, hint)) if !accept(order) => fail(hint),
        _ => Ok(()),
    }
}

pub fn gt(ctx: &mut RuleContext<'_, '_>) -> Outcome {
    compare_with_field(ctx, |order| order == Ordering::Greater)
}

pub fn gte(ctx: &mut RuleContext<'_, '_>) -> Outcome {
    compare_with_field(ctx, |order| order != Ordering::Less)
}

pub fn lt(ctx: &mut RuleContext<'_, '_>) -> Outcome {
    compare_with_field(ctx, |order| order == Ordering::Less)
}

pub fn lte(ctx: &mut RuleContext<'_, '_>) -> Outcome {
    compare_with_field(ctx, |order| order != Ordering::Greater)
}
