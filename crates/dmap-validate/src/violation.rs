//! # Violations
//!
//! Structured descriptions of how a document fails its schema. Each
//! [`Violation`] names the offending field path, a [`ViolationKind`] and a
//! human-readable detail, and renders as `<field.path>: <reason> (<detail>)`.

use std::fmt;

use serde::Serialize;

/// One step in a [`FieldPath`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(untagged)]
pub enum Segment {
    /// A mapping key.
    Key(String),
    /// An array position.
    Index(usize),
}

/// Location of a value inside a document, from the top level down.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct FieldPath(Vec<Segment>);

impl FieldPath {
    /// The path of the document itself.
    pub fn root() -> Self {
        Self::default()
    }

    /// Returns a copy of this path extended by one key.
    pub fn child(&self, key: impl Into<String>) -> Self {
        let mut path = self.clone();
        path.push_key(key);
        path
    }

    /// Segments from the root outward.
    pub fn segments(&self) -> &[Segment] {
        &self.0
    }

    /// Returns true if this is the path of the document itself.
    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    /// The final segment, if the path is not the root.
    pub fn last(&self) -> Option<&Segment> {
        self.0.last()
    }

    pub(crate) fn push_key(&mut self, key: impl Into<String>) {
        self.0.push(Segment::Key(key.into()));
    }

    pub(crate) fn push_index(&mut self, index: usize) {
        self.0.push(Segment::Index(index));
    }

    pub(crate) fn pop(&mut self) {
        self.0.pop();
    }
}

impl<S: Into<String>> FromIterator<S> for FieldPath {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self(iter.into_iter().map(|s| Segment::Key(s.into())).collect())
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return f.write_str("(root)");
        }
        for (i, segment) in self.0.iter().enumerate() {
            match segment {
                Segment::Key(key) if i == 0 => f.write_str(key)?,
                Segment::Key(key) => write!(f, ".{key}")?,
                Segment::Index(index) => write!(f, "[{index}]")?,
            }
        }
        Ok(())
    }
}

/// Why a value was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ViolationKind {
    /// A required field is absent or null.
    MissingRequiredField,
    /// A key the schema does not declare.
    UnknownField,
    /// A value of the wrong kind for a non-string, non-object rule.
    TypeMismatch,
    /// A string does not fully match the rule's pattern.
    PatternMismatch,
    /// A value outside the rule's enumeration.
    EnumMismatch,
    /// An object rule received something other than a mapping.
    NotAMapping,
    /// A string rule received something other than a string.
    NotAString,
    /// An empty string where one character or more is required.
    EmptyValue,
    /// A number at or below the rule's exclusive minimum.
    OutOfRange,
}

impl ViolationKind {
    /// Short reason used when rendering a violation.
    pub fn reason(&self) -> &'static str {
        match self {
            ViolationKind::MissingRequiredField => "missing required field",
            ViolationKind::UnknownField => "unknown field",
            ViolationKind::TypeMismatch => "type mismatch",
            ViolationKind::PatternMismatch => "pattern mismatch",
            ViolationKind::EnumMismatch => "value not allowed",
            ViolationKind::NotAMapping => "not a mapping",
            ViolationKind::NotAString => "not a string",
            ViolationKind::EmptyValue => "empty value",
            ViolationKind::OutOfRange => "out of range",
        }
    }
}

impl fmt::Display for ViolationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.reason())
    }
}

/// A single validation violation with structured context.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Violation {
    /// Path to the violating field.
    pub path: FieldPath,
    /// Category of the violation.
    pub kind: ViolationKind,
    /// Human-readable explanation, e.g. expected vs actual.
    pub detail: String,
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {} ({})", self.path, self.kind, self.detail)
    }
}

/// Every violation found in one validation pass, in discovery order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ValidationViolations {
    violations: Vec<Violation>,
}

impl ValidationViolations {
    pub(crate) fn new(violations: Vec<Violation>) -> Self {
        Self { violations }
    }

    /// Returns the number of violations.
    pub fn len(&self) -> usize {
        self.violations.len()
    }

    /// Returns true if there are no violations.
    pub fn is_empty(&self) -> bool {
        self.violations.is_empty()
    }

    /// Returns a slice of all violations.
    pub fn violations(&self) -> &[Violation] {
        &self.violations
    }

    /// Iterate over the violations in discovery order.
    pub fn iter(&self) -> std::slice::Iter<'_, Violation> {
        self.violations.iter()
    }

    /// Violations of one kind, in discovery order.
    pub fn of_kind(&self, kind: ViolationKind) -> impl Iterator<Item = &Violation> {
        self.violations.iter().filter(move |v| v.kind == kind)
    }

    /// Consumes self and returns the inner Vec.
    pub fn into_inner(self) -> Vec<Violation> {
        self.violations
    }
}

impl fmt::Display for ValidationViolations {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, v) in self.violations.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "  {v}")?;
        }
        Ok(())
    }
}

impl IntoIterator for ValidationViolations {
    type Item = Violation;
    type IntoIter = std::vec::IntoIter<Violation>;

    fn into_iter(self) -> Self::IntoIter {
        self.violations.into_iter()
    }
}

impl<'a> IntoIterator for &'a ValidationViolations {
    type Item = &'a Violation;
    type IntoIter = std::slice::Iter<'a, Violation>;

    fn into_iter(self) -> Self::IntoIter {
        self.violations.iter()
    }
}
