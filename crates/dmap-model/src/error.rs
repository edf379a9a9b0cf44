//! # Error Types: Schema Definition Defects
//!
//! Errors raised while *building* a [`Schema`](crate::Schema). They describe
//! mistakes in the code that declares the rules, never a property of a
//! document under validation; document defects are reported as violations
//! by `dmap-validate`.

use thiserror::Error;

/// A schema definition is malformed.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SchemaDefinitionError {
    /// The same field name was declared twice in one schema.
    #[error("field '{0}' is declared more than once")]
    DuplicateField(String),

    /// A pattern did not compile as a regular expression.
    #[error("invalid pattern '{pattern}': {reason}")]
    InvalidPattern {
        /// The pattern source as written in the rule.
        pattern: String,
        /// Compiler message from the regex engine.
        reason: String,
    },

    /// A field rule combines constraints that cannot apply together.
    #[error("invalid rule for field '{field}': {reason}")]
    InvalidRule {
        /// Field carrying the inconsistent rule.
        field: String,
        /// What is wrong with the rule.
        reason: String,
    },
}
