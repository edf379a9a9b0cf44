//! # Document Validation
//!
//! Walks a document against a [`Schema`] and collects every violation in
//! one pass.
//!
//! At each level the walker:
//!
//! 1. reports every undeclared key as [`ViolationKind::UnknownField`];
//! 2. reports every absent or null required field as
//!    [`ViolationKind::MissingRequiredField`];
//! 3. checks the kind of every present field, and stops there for that
//!    field if the kind is wrong;
//! 4. checks pattern, enumeration, emptiness and range constraints;
//! 5. descends into fixed sub-schemas, per-entry sub-schemas and item rules.
//!
//! Unknown keys come first, then declared fields in schema order, depth first.
//! The walk never mutates the document and keeps no state between calls.

use dmap_model::{dataset_mapping_schema, value_kind_name, FieldRule, Kind, Schema};
use serde_json::{Map, Value};

use crate::error::ValidationError;
use crate::violation::{FieldPath, ValidationViolations, Violation, ViolationKind};

/// A document: string keys to arbitrary values.
pub type Document = Map<String, Value>;

/// Outcome of validating one document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationResult {
    /// No violations anywhere in the document.
    Valid,
    /// At least one violation; all of them, in discovery order.
    Invalid(ValidationViolations),
}

impl ValidationResult {
    /// Returns true if no violations were found.
    pub fn is_valid(&self) -> bool {
        matches!(self, ValidationResult::Valid)
    }

    /// All violations; empty when valid.
    pub fn violations(&self) -> &[Violation] {
        match self {
            ValidationResult::Valid => &[],
            ValidationResult::Invalid(violations) => violations.violations(),
        }
    }

    /// Convert into a `Result` so callers can use `?`.
    pub fn into_result(self) -> Result<(), ValidationError> {
        match self {
            ValidationResult::Valid => Ok(()),
            ValidationResult::Invalid(violations) => {
                Err(ValidationError::InvalidDocument(violations))
            }
        }
    }
}

/// Validate `document` against `schema`.
pub fn validate(schema: &Schema, document: &Document) -> ValidationResult {
    let mut walker = Walker::default();
    walker.check_document(schema, document);

    if walker.violations.is_empty() {
        tracing::debug!(fields = document.len(), "document accepted");
        ValidationResult::Valid
    } else {
        tracing::debug!(
            fields = document.len(),
            violations = walker.violations.len(),
            "document rejected"
        );
        ValidationResult::Invalid(ValidationViolations::new(walker.violations))
    }
}

/// Validate an untyped value whose top level must be a mapping.
///
/// # Errors
///
/// Returns [`ValidationError::NotADocument`] if `value` is not a mapping.
/// Violations are never returned as an error here; they are in the
/// [`ValidationResult`].
pub fn validate_value(schema: &Schema, value: &Value) -> Result<ValidationResult, ValidationError> {
    let document = value.as_object().ok_or(ValidationError::NotADocument {
        found: value_kind_name(value),
    })?;
    Ok(validate(schema, document))
}

/// Validate `value` and reject it with every violation if it is invalid.
pub fn ensure_valid(schema: &Schema, value: &Value) -> Result<(), ValidationError> {
    validate_value(schema, value)?.into_result()
}

/// [`ensure_valid`] against the built-in dataset mapping schema.
pub fn validate_mapping(value: &Value) -> Result<(), ValidationError> {
    ensure_valid(dataset_mapping_schema(), value)
}

#[derive(Default)]
struct Walker {
    path: FieldPath,
    violations: Vec<Violation>,
}

impl Walker {
    fn report(&mut self, kind: ViolationKind, detail: String) {
        self.violations.push(Violation {
            path: self.path.clone(),
            kind,
            detail,
        });
    }

    fn check_document(&mut self, schema: &Schema, document: &Document) {
        for key in document.keys() {
            if !schema.contains(key) {
                self.path.push_key(key.as_str());
                self.report(
                    ViolationKind::UnknownField,
                    format!("'{key}' is not a declared field"),
                );
                self.path.pop();
            }
        }

        for (name, rule) in schema.fields() {
            self.path.push_key(name);
            match document.get(name) {
                None if rule.is_required() => {
                    self.report(
                        ViolationKind::MissingRequiredField,
                        "required field is absent".to_string(),
                    );
                }
                Some(Value::Null) if rule.is_required() => {
                    self.report(
                        ViolationKind::MissingRequiredField,
                        "required field is null".to_string(),
                    );
                }
                None => {}
                Some(value) => self.check_value(rule, value),
            }
            self.path.pop();
        }
    }

    fn check_value(&mut self, rule: &FieldRule, value: &Value) {
        if !self.check_kind(rule.kind(), value) {
            return;
        }
        if rule.is_open() {
            return;
        }

        self.check_constraints(rule, value);

        if let (Some(schema), Some(document)) = (rule.fixed_sub_schema(), value.as_object()) {
            self.check_document(schema, document);
        }
        if let (Some(schema), Some(entries)) = (rule.sub_schema(), value.as_object()) {
            for (key, entry) in entries {
                self.path.push_key(key.as_str());
                match entry.as_object() {
                    Some(document) => self.check_document(schema, document),
                    None => self.report(
                        ViolationKind::NotAMapping,
                        format!("expected object, got {}", value_kind_name(entry)),
                    ),
                }
                self.path.pop();
            }
        }
        if let Some(item) = rule.items() {
            match value {
                Value::Object(entries) => {
                    for (key, entry) in entries {
                        self.path.push_key(key.as_str());
                        self.check_value(item, entry);
                        self.path.pop();
                    }
                }
                Value::Array(elements) => {
                    for (index, element) in elements.iter().enumerate() {
                        self.path.push_index(index);
                        self.check_value(item, element);
                        self.path.pop();
                    }
                }
                _ => {}
            }
        }
    }

    /// Returns false, after reporting, if `value` is not of `kind`.
    fn check_kind(&mut self, kind: Kind, value: &Value) -> bool {
        if kind.accepts(value) {
            return true;
        }
        let violation = match kind {
            Kind::String => ViolationKind::NotAString,
            Kind::Object => ViolationKind::NotAMapping,
            _ => ViolationKind::TypeMismatch,
        };
        self.report(
            violation,
            format!("expected {kind}, got {}", value_kind_name(value)),
        );
        false
    }

    fn check_constraints(&mut self, rule: &FieldRule, value: &Value) {
        if let Some(text) = value.as_str() {
            if rule.is_non_empty() && text.is_empty() {
                self.report(ViolationKind::EmptyValue, "must not be empty".to_string());
            }
            if let Some(pattern) = rule.pattern() {
                if !pattern.is_full_match(text) {
                    self.report(
                        ViolationKind::PatternMismatch,
                        format!("{value} does not match {pattern}"),
                    );
                }
            }
        }

        if let Some(allowed) = rule.allowed_values() {
            if !allowed.contains(value) {
                let choices: Vec<String> = allowed.iter().map(Value::to_string).collect();
                self.report(
                    ViolationKind::EnumMismatch,
                    format!("{value} is not one of [{}]", choices.join(", ")),
                );
            }
        }

        if let (Some(bound), Some(number)) = (rule.exclusive_minimum(), value.as_f64()) {
            if number <= bound {
                self.report(
                    ViolationKind::OutOfRange,
                    format!("{value} must be greater than {bound}"),
                );
            }
        }
    }
}
