//! # Validation Chain
//!
//! A [`Validator`] pairs a data map with per-field rule chains and
//! answers "is this submission acceptable" plus a per-field error map.
//!
//! Evaluation runs once, lazily, on the first query; the outcome is
//! memoized so re-querying is idempotent. Every rule bound to a field
//! runs — there is no short-circuit — but when several rules fail for the
//! same field only the last-evaluated message survives. That last-write-
//! wins behavior is observable and kept on purpose.
//!
//! A field missing from the data map is passed to its rules as `None`;
//! rules must handle absence rather than assume presence.

use std::collections::BTreeMap;

use once_cell::unsync::OnceCell;
use serde_json::{Map, Value};

pub mod rules;

pub use rules::{IsEmail, MaxLength, MinLength, Required};

/// A stateless or parameterized predicate over a single field value.
pub trait Rule {
    /// `value` is `None` when the field is absent from the data map.
    fn is_valid(&self, value: Option<&Value>) -> bool;

    /// Human-readable message recorded when the rule fails.
    fn message(&self) -> String;
}

/// Evaluates a data map against per-field rule chains, in the order the
/// chains were added.
pub struct Validator {
    data: Map<String, Value>,
    rules: Vec<(String, Vec<Box<dyn Rule>>)>,
    outcome: OnceCell<BTreeMap<String, String>>,
}

impl Validator {
    pub fn new(data: Map<String, Value>) -> Self {
        Self {
            data,
            rules: Vec::new(),
            outcome: OnceCell::new(),
        }
    }

    /// Bind one rule to a field, appending to the field's chain if it
    /// already has one.
    pub fn rule(mut self, field: &str, rule: impl Rule + 'static) -> Self {
        self.push_rule(field, Box::new(rule));
        self
    }

    /// Bind a whole chain to a field at once.
    pub fn rules(mut self, field: &str, chain: Vec<Box<dyn Rule>>) -> Self {
        for rule in chain {
            self.push_rule(field, rule);
        }
        self
    }

    fn push_rule(&mut self, field: &str, rule: Box<dyn Rule>) {
        if let Some((_, chain)) = self.rules.iter_mut().find(|(name, _)| name == field) {
            chain.push(rule);
        } else {
            self.rules.push((field.to_string(), vec![rule]));
        }
    }

    pub fn is_valid(&self) -> bool {
        self.error_messages().is_empty()
    }

    pub fn is_invalid(&self) -> bool {
        !self.is_valid()
    }

    /// Per-field error messages, computed once and memoized.
    pub fn error_messages(&self) -> &BTreeMap<String, String> {
        self.outcome.get_or_init(|| self.run_rules())
    }

    fn run_rules(&self) -> BTreeMap<String, String> {
        let mut errors = BTreeMap::new();
        for (field, chain) in &self.rules {
            let value = self.data.get(field);
            for rule in chain {
                if !rule.is_valid(value) {
                    errors.insert(field.clone(), rule.message());
                }
            }
        }
        errors
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn data(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            other => panic!("expected an object, got {}", other),
        }
    }

    #[test]
    fn empty_required_email_field_fails() {
        let validator = Validator::new(data(json!({"email": ""})))
            .rule("email", Required)
            .rule("email", IsEmail);
        assert!(!validator.is_valid());
        assert!(validator.error_messages().contains_key("email"));
    }

    #[test]
    fn well_formed_email_passes_the_chain() {
        let validator = Validator::new(data(json!({"email": "a@b.com"})))
            .rule("email", Required)
            .rule("email", IsEmail);
        assert!(validator.is_valid());
        assert!(validator.error_messages().is_empty());
    }

    #[test]
    fn missing_field_is_passed_as_absent() {
        let validator = Validator::new(Map::new()).rule("title", Required);
        assert!(validator.is_invalid());
    }

    #[test]
    fn missing_field_does_not_trip_length_rules() {
        let validator = Validator::new(Map::new()).rule("title", MaxLength::new(5));
        assert!(validator.is_valid());
    }

    #[test]
    fn last_failing_rule_wins_the_message_slot() {
        let validator = Validator::new(data(json!({"email": ""})))
            .rule("email", Required)
            .rule("email", IsEmail);
        let messages = validator.error_messages();
        assert_eq!(messages.len(), 1);
        assert_eq!(messages["email"], IsEmail.message());
    }

    #[test]
    fn all_rules_run_even_after_a_failure() {
        let validator = Validator::new(data(json!({"name": "", "email": "nope"})))
            .rule("name", Required)
            .rule("email", IsEmail);
        let messages = validator.error_messages();
        assert!(messages.contains_key("name"));
        assert!(messages.contains_key("email"));
    }

    #[test]
    fn repeated_queries_are_idempotent() {
        let validator = Validator::new(data(json!({"email": "a@b.com"}))).rule("email", IsEmail);
        assert!(validator.is_valid());
        assert!(validator.is_valid());
        assert_eq!(validator.error_messages().len(), 0);
    }
}
