//! # Field Rules
//!
//! A [`FieldRule`] describes one field of a document: whether it must be
//! present, which [`Kind`] of value it holds, and the constraints applied to
//! that value. Rules are plain data; the recursive walker in `dmap-validate`
//! interprets them uniformly at every nesting level.

use std::fmt;
use std::sync::Arc;

use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::SchemaDefinitionError;
use crate::schema::Schema;

/// Value kind a field rule expects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Kind {
    /// UTF-8 string.
    String,
    /// Any JSON number, integral or not.
    Number,
    /// A number without a fractional part (`500` and `500.0` both qualify).
    Integer,
    /// `true` or `false`.
    Boolean,
    /// A mapping of string keys to values.
    Object,
    /// An ordered sequence.
    Array,
    /// Anything, including null.
    Any,
}

impl Kind {
    /// Returns the kind name used in violation details.
    pub fn name(&self) -> &'static str {
        match self {
            Kind::String => "string",
            Kind::Number => "number",
            Kind::Integer => "integer",
            Kind::Boolean => "boolean",
            Kind::Object => "object",
            Kind::Array => "array",
            Kind::Any => "any",
        }
    }

    /// Returns true if `value` is of this kind.
    pub fn accepts(&self, value: &Value) -> bool {
        match self {
            Kind::String => value.is_string(),
            Kind::Number => value.is_number(),
            Kind::Integer => {
                value.is_i64()
                    || value.is_u64()
                    || value.as_f64().is_some_and(|f| f.fract() == 0.0)
            }
            Kind::Boolean => value.is_boolean(),
            Kind::Object => value.is_object(),
            Kind::Array => value.is_array(),
            Kind::Any => true,
        }
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Returns the name of the kind a runtime value actually has.
pub fn value_kind_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(n) => {
            if n.is_i64() || n.is_u64() {
                "integer"
            } else {
                "number"
            }
        }
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// A regular expression that a string must match in full.
///
/// The source is wrapped as `^(?:source)$` at compile time, so a pattern
/// like `[a-z]+` never matches a mere substring of the value.
#[derive(Debug, Clone)]
pub struct Pattern {
    source: String,
    regex: Regex,
}

impl Pattern {
    /// Compile an anchored pattern.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaDefinitionError::InvalidPattern`] if `source` is not a
    /// valid regular expression.
    pub fn new(source: &str) -> Result<Self, SchemaDefinitionError> {
        let regex = Regex::new(&format!("^(?:{source})$")).map_err(|e| {
            SchemaDefinitionError::InvalidPattern {
                pattern: source.to_string(),
                reason: e.to_string(),
            }
        })?;
        Ok(Self {
            source: source.to_string(),
            regex,
        })
    }

    /// The pattern as written, without the anchors.
    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Returns true if the whole of `value` matches.
    pub fn is_full_match(&self, value: &str) -> bool {
        self.regex.is_match(value)
    }
}

impl PartialEq for Pattern {
    fn eq(&self, other: &Self) -> bool {
        self.source == other.source
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

/// Validation rule for a single field.
///
/// Built by value with the `with_*` methods and then handed to
/// [`Schema::try_new`]; once inside a schema a rule is never modified.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldRule {
    required: bool,
    kind: Kind,
    open: bool,
    allowed_values: Option<Vec<Value>>,
    pattern: Option<Pattern>,
    non_empty: bool,
    exclusive_minimum: Option<f64>,
    sub_schema: Option<Arc<Schema>>,
    fixed_sub_schema: Option<Arc<Schema>>,
    items: Option<Box<FieldRule>>,
}

impl FieldRule {
    fn with_kind(kind: Kind, required: bool) -> Self {
        Self {
            required,
            kind,
            open: false,
            allowed_values: None,
            pattern: None,
            non_empty: false,
            exclusive_minimum: None,
            sub_schema: None,
            fixed_sub_schema: None,
            items: None,
        }
    }

    /// A field that must be present and non-null.
    pub fn required(kind: Kind) -> Self {
        Self::with_kind(kind, true)
    }

    /// A field that may be omitted.
    pub fn optional(kind: Kind) -> Self {
        Self::with_kind(kind, false)
    }

    /// A rule for the entries of a mapping or array (see [`FieldRule::with_items`]).
    ///
    /// Entries have no notion of presence, so the rule is marked optional.
    pub fn entry(kind: Kind) -> Self {
        Self::with_kind(kind, false)
    }

    /// Accept any content for this field without inspecting it.
    pub fn open(mut self) -> Self {
        self.open = true;
        self
    }

    /// Restrict the value to a fixed set of literals.
    pub fn with_enum<I, V>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        self.allowed_values = Some(values.into_iter().map(Into::into).collect());
        self
    }

    /// Require the string value to match `pattern` in full.
    pub fn with_pattern(mut self, pattern: Pattern) -> Self {
        self.pattern = Some(pattern);
        self
    }

    /// Reject the empty string.
    pub fn non_empty(mut self) -> Self {
        self.non_empty = true;
        self
    }

    /// Require the numeric value to be strictly greater than `bound`.
    pub fn with_exclusive_minimum(mut self, bound: f64) -> Self {
        self.exclusive_minimum = Some(bound);
        self
    }

    /// Apply `schema` to every value of a mapping whose keys are chosen by
    /// the document author (band identifiers under `measurements`).
    pub fn with_sub_schema(mut self, schema: Schema) -> Self {
        self.sub_schema = Some(Arc::new(schema));
        self
    }

    /// Apply `schema` once to the field's own mapping value.
    pub fn with_fixed_sub_schema(mut self, schema: Schema) -> Self {
        self.fixed_sub_schema = Some(Arc::new(schema));
        self
    }

    /// Check every mapping value or array element against `rule`.
    pub fn with_items(mut self, rule: FieldRule) -> Self {
        self.items = Some(Box::new(rule));
        self
    }

    /// Returns true if the field must be present and non-null.
    pub fn is_required(&self) -> bool {
        self.required
    }

    /// The kind the value must have.
    pub fn kind(&self) -> Kind {
        self.kind
    }

    /// Returns true if the field's content is not inspected.
    pub fn is_open(&self) -> bool {
        self.open
    }

    /// Allowed literal values, if the rule is an enumeration.
    pub fn allowed_values(&self) -> Option<&[Value]> {
        self.allowed_values.as_deref()
    }

    /// Pattern a string value must match in full, if any.
    pub fn pattern(&self) -> Option<&Pattern> {
        self.pattern.as_ref()
    }

    /// Returns true if the empty string is rejected.
    pub fn is_non_empty(&self) -> bool {
        self.non_empty
    }

    /// Strict lower bound on a numeric value, if any.
    pub fn exclusive_minimum(&self) -> Option<f64> {
        self.exclusive_minimum
    }

    /// Schema applied to each value of a keyed mapping, if any.
    pub fn sub_schema(&self) -> Option<&Schema> {
        self.sub_schema.as_deref()
    }

    /// Schema applied to the field's own mapping value, if any.
    pub fn fixed_sub_schema(&self) -> Option<&Schema> {
        self.fixed_sub_schema.as_deref()
    }

    /// Rule applied to every mapping value or array element, if any.
    pub fn items(&self) -> Option<&FieldRule> {
        self.items.as_deref()
    }

    /// Check that the constraints on this rule can apply together.
    ///
    /// `field` names the rule in the returned error.
    pub(crate) fn check_consistency(&self, field: &str) -> Result<(), SchemaDefinitionError> {
        let invalid = |reason: &str| SchemaDefinitionError::InvalidRule {
            field: field.to_string(),
            reason: reason.to_string(),
        };

        let has_sub_schema = self.sub_schema.is_some() || self.fixed_sub_schema.is_some();
        if has_sub_schema && self.kind != Kind::Object {
            return Err(invalid("sub-schemas require kind object"));
        }
        if self.sub_schema.is_some() && self.fixed_sub_schema.is_some() {
            return Err(invalid("sub_schema and fixed_sub_schema are mutually exclusive"));
        }
        if self.items.is_some() && !matches!(self.kind, Kind::Object | Kind::Array) {
            return Err(invalid("items require kind object or array"));
        }
        if self.open && (has_sub_schema || self.items.is_some()) {
            return Err(invalid("an open field cannot declare sub-schemas or items"));
        }
        if (self.pattern.is_some() || self.non_empty) && self.kind != Kind::String {
            return Err(invalid("pattern and non_empty require kind string"));
        }
        if self.exclusive_minimum.is_some() && !matches!(self.kind, Kind::Number | Kind::Integer)
        {
            return Err(invalid("exclusive_minimum requires kind number or integer"));
        }
        if self.allowed_values.as_ref().is_some_and(|v| v.is_empty()) {
            return Err(invalid("enumeration must allow at least one value"));
        }
        if let Some(items) = &self.items {
            items.check_consistency(&format!("{field}[]"))?;
        }
        Ok(())
    }
}
