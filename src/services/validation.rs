//! Ordered field rules over submitted forms
//!
//! Every ruled field is sanitized and checked, pass or fail, so a rejected
//! form can be shown again with cleaned values and every problem at once.
//! Inside one field, the first failing check is the field's only violation.

use chrono::{NaiveDate, NaiveTime};
use serde::Serialize;
use utoipa::ToSchema;

use crate::models::{BookInstanceStatus, FieldBag, FieldValue};

/// One failed check, reported against the field that caused it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct Violation {
    pub field: String,
    pub message: String,
}

impl Violation {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sanitizer {
    Trim,
    /// HTML-escape markup characters
    Escape,
}

impl Sanitizer {
    fn apply(self, value: &str) -> String {
        match self {
            Sanitizer::Trim => value.trim().to_string(),
            Sanitizer::Escape => escape(value),
        }
    }
}

pub type Predicate = fn(&str) -> bool;

/// Sanitizers and checks attached to one field
pub struct FieldRule {
    field: &'static str,
    each: bool,
    optional: bool,
    sanitizers: Vec<Sanitizer>,
    checks: Vec<(Predicate, &'static str)>,
}

impl FieldRule {
    /// Rule for a single-valued field. An absent field is checked as empty.
    pub fn new(field: &'static str) -> Self {
        Self {
            field,
            each: false,
            optional: false,
            sanitizers: Vec::new(),
            checks: Vec::new(),
        }
    }

    /// Rule applied to every element of a multi-valued field
    pub fn each(field: &'static str) -> Self {
        Self {
            each: true,
            ..Self::new(field)
        }
    }

    pub fn trim(mut self) -> Self {
        self.sanitizers.push(Sanitizer::Trim);
        self
    }

    pub fn escape(mut self) -> Self {
        self.sanitizers.push(Sanitizer::Escape);
        self
    }

    /// Skip the checks when the sanitized value is empty
    pub fn optional(mut self) -> Self {
        self.optional = true;
        self
    }

    pub fn required(self, message: &'static str) -> Self {
        self.check(is_present, message)
    }

    pub fn check(mut self, predicate: Predicate, message: &'static str) -> Self {
        self.checks.push((predicate, message));
        self
    }

    fn sanitize(&self, value: &str) -> String {
        self.sanitizers
            .iter()
            .fold(value.to_string(), |value, sanitizer| sanitizer.apply(&value))
    }

    fn first_failure(&self, value: &str) -> Option<&'static str> {
        if self.optional && value.is_empty() {
            return None;
        }
        self.checks
            .iter()
            .find(|(predicate, _)| !predicate(value))
            .map(|(_, message)| *message)
    }

    fn apply(&self, raw: Option<&FieldValue>, violations: &mut Vec<Violation>) -> FieldValue {
        if self.each {
            let values = match raw {
                None => Vec::new(),
                Some(FieldValue::Text(value)) => vec![self.sanitize(value)],
                Some(FieldValue::List(values)) => values.iter().map(|v| self.sanitize(v)).collect(),
            };
            for (i, value) in values.iter().enumerate() {
                if let Some(message) = self.first_failure(value) {
                    violations.push(Violation::new(format!("{}[{}]", self.field, i), message));
                }
            }
            FieldValue::List(values)
        } else {
            let value = self.sanitize(raw.map(FieldValue::as_text).unwrap_or(""));
            if let Some(message) = self.first_failure(&value) {
                violations.push(Violation::new(self.field, message));
            }
            FieldValue::Text(value)
        }
    }
}

/// Outcome of running a pipeline: cleaned values plus everything that failed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Checked {
    /// Sanitized value of every ruled field. Unruled fields are dropped.
    pub fields: FieldBag,
    pub violations: Vec<Violation>,
}

impl Checked {
    pub fn is_valid(&self) -> bool {
        self.violations.is_empty()
    }
}

pub struct ValidationPipeline {
    rules: Vec<FieldRule>,
}

impl ValidationPipeline {
    pub fn new(rules: Vec<FieldRule>) -> Self {
        Self { rules }
    }

    pub fn run(&self, raw: &FieldBag) -> Checked {
        let mut fields = FieldBag::new();
        let mut violations = Vec::new();
        for rule in &self.rules {
            let value = rule.apply(raw.get(rule.field), &mut violations);
            fields.insert(rule.field, value);
        }
        Checked { fields, violations }
    }
}

/// HTML-escape the characters that could open markup or break out of an
/// attribute value
pub fn escape(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#x27;"),
            '/' => escaped.push_str("&#x2F;"),
            '\\' => escaped.push_str("&#x5C;"),
            '`' => escaped.push_str("&#96;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

pub fn is_present(value: &str) -> bool {
    !value.is_empty()
}

/// ASCII letters and digits only, at least one
pub fn is_alphanumeric(value: &str) -> bool {
    !value.is_empty() && value.chars().all(|c| c.is_ascii_alphanumeric())
}

pub fn is_iso8601_date(value: &str) -> bool {
    parse_iso8601_date(value).is_some()
}

pub fn is_identity(value: &str) -> bool {
    parse_identity(value).is_some()
}

pub fn is_book_instance_status(value: &str) -> bool {
    value.parse::<BookInstanceStatus>().is_ok()
}

fn all_digits(value: &str) -> bool {
    !value.is_empty() && value.bytes().all(|b| b.is_ascii_digit())
}

/// `YYYY-MM-DD`, `YYYYMMDD`, `YYYY-MM` or `YYYY`. A reduced date names its
/// first day.
fn parse_date_part(value: &str) -> Option<NaiveDate> {
    let bytes = value.as_bytes();
    let (year, month, day) = match bytes.len() {
        4 => (value, "01", "01"),
        7 if bytes[4] == b'-' => (&value[..4], &value[5..], "01"),
        8 => (&value[..4], &value[4..6], &value[6..]),
        10 if bytes[4] == b'-' && bytes[7] == b'-' => (&value[..4], &value[5..7], &value[8..]),
        _ => return None,
    };
    if ![year, month, day].into_iter().all(all_digits) {
        return None;
    }
    NaiveDate::from_ymd_opt(year.parse().ok()?, month.parse().ok()?, day.parse().ok()?)
}

/// `hh`, `hh:mm`, `hh:mm:ss`, `hhmm` or `hhmmss`, seconds optionally with a
/// fraction
fn is_clock(value: &str) -> bool {
    let (clock, fraction) = match value.find(|c: char| c == '.' || c == ',') {
        Some(pos) => (&value[..pos], Some(&value[pos + 1..])),
        None => (value, None),
    };
    let parts: Vec<&str> = match clock.len() {
        2 => vec![clock],
        4 => vec![&clock[..2], &clock[2..]],
        5 => clock.split(':').collect(),
        6 => vec![&clock[..2], &clock[2..4], &clock[4..]],
        8 => clock.split(':').collect(),
        _ => return false,
    };
    if parts.iter().any(|p| p.len() != 2 || !all_digits(p)) {
        return false;
    }
    if fraction.is_some_and(|f| parts.len() != 3 || !all_digits(f)) {
        return false;
    }
    let field = |i: usize| parts.get(i).and_then(|p| p.parse::<u32>().ok()).unwrap_or(0);
    NaiveTime::from_hms_opt(field(0), field(1), field(2)).is_some()
}

/// Time of day with an optional `Z`, `±hh`, `±hh:mm` or `±hhmm` offset
fn is_time_part(value: &str) -> bool {
    if let Some(clock) = value.strip_suffix('Z') {
        return is_clock(clock);
    }
    match value.rfind(|c: char| c == '+' || c == '-') {
        Some(pos) => {
            let offset = &value[pos + 1..];
            let valid_offset = match offset.len() {
                2 | 4 => all_digits(offset),
                5 => offset.as_bytes()[2] == b':' && all_digits(&offset[..2]) && all_digits(&offset[3..]),
                _ => false,
            };
            valid_offset && is_clock(&value[..pos])
        }
        None => is_clock(value),
    }
}

/// Calendar date from an ISO 8601 date or date-time, extended or basic
/// format. `YYYY-MM` and `YYYY` resolve to the first day of the month or
/// year. A date-time needs a complete date; its date is taken as written,
/// regardless of offset. Surrounding whitespace is not accepted.
pub fn parse_iso8601_date(value: &str) -> Option<NaiveDate> {
    if !value.is_ascii() {
        return None;
    }
    match value.split_once('T') {
        None => parse_date_part(value),
        Some((date, time)) if matches!(date.len(), 8 | 10) && is_time_part(time) => {
            parse_date_part(date)
        }
        Some(_) => None,
    }
}

/// Record identity from its text form. Identities are positive.
pub fn parse_identity(value: &str) -> Option<i32> {
    value.parse::<i32>().ok().filter(|id| *id > 0)
}
