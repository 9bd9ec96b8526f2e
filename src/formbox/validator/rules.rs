//! Built-in validation rules.

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

use super::Rule;
use crate::helpers::arrays::is_truthy;

/// Length of a value as the user typed it: character count for strings,
/// digit count for numbers, zero for absent or non-text values.
fn text_length(value: Option<&Value>) -> usize {
    match value {
        Some(Value::String(s)) => s.chars().count(),
        Some(Value::Number(n)) => n.to_string().chars().count(),
        _ => 0,
    }
}

/// Fails on every value the host counts as empty: absent, null, `false`,
/// zero, `""`, `"0"`, empty sequences and empty maps.
pub struct Required;

impl Rule for Required {
    fn is_valid(&self, value: Option<&Value>) -> bool {
        value.map(is_truthy).unwrap_or(false)
    }

    fn message(&self) -> String {
        "Please complete this field".to_string()
    }
}

/// Inclusive lower bound on text length, counted in characters.
pub struct MinLength {
    min: usize,
}

impl MinLength {
    pub fn new(min: usize) -> Self {
        Self { min }
    }
}

impl Rule for MinLength {
    fn is_valid(&self, value: Option<&Value>) -> bool {
        text_length(value) >= self.min
    }

    fn message(&self) -> String {
        format!("You must type at least {} characters on this field", self.min)
    }
}

/// Inclusive upper bound on text length, counted in characters.
pub struct MaxLength {
    max: usize,
}

impl MaxLength {
    pub fn new(max: usize) -> Self {
        Self { max }
    }
}

impl Rule for MaxLength {
    fn is_valid(&self, value: Option<&Value>) -> bool {
        text_length(value) <= self.max
    }

    fn message(&self) -> String {
        format!("You can only type up to {} characters on this field", self.max)
    }
}

static EMAIL_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z0-9.!#$%&'*+/=?^_`{|}~-]+@[A-Za-z0-9](?:[A-Za-z0-9-]*[A-Za-z0-9])?(?:\.[A-Za-z0-9](?:[A-Za-z0-9-]*[A-Za-z0-9])?)+$")
        .expect("email pattern compiles")
});

/// Syntactic email check. Requires a dotted domain, so `a@b` is rejected.
pub struct IsEmail;

impl Rule for IsEmail {
    fn is_valid(&self, value: Option<&Value>) -> bool {
        match value {
            Some(Value::String(s)) => EMAIL_PATTERN.is_match(s),
            _ => false,
        }
    }

    fn message(&self) -> String {
        "Please enter a valid e-mail address".to_string()
    }
}
