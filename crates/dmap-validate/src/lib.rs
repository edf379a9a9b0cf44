//! # dmap-validate: Dataset Mapping Validation
//!
//! Checks dataset mapping documents against a declarative
//! [`Schema`](dmap_model::Schema) before they are accepted into a catalog.
//!
//! ## Validation (`validate`)
//!
//! [`validate`] walks a document against a schema and returns a
//! [`ValidationResult`]: `Valid`, or `Invalid` with *every* violation found,
//! so a user can fix a document in one edit. Each [`Violation`] carries the
//! field path, a [`ViolationKind`] and a detail, rendered as
//! `<field.path>: <reason> (<detail>)`.
//!
//! - [`validate`]: the core walk over a typed [`Document`].
//! - [`validate_value`]: for untyped values; a non-mapping top level is a
//!   caller defect reported as [`ValidationError::NotADocument`].
//! - [`ensure_valid`] / [`validate_mapping`]: reject with
//!   [`ValidationError::InvalidDocument`] for `?`-style callers.
//!
//! ## Loading (`document`)
//!
//! [`document::load_documents`] and [`document::validate_file`] read JSON
//! or multi-document YAML mapping files.
//!
//! ## Crate Policy
//!
//! - Depends only on `dmap-model` internally.
//! - Validation is pure: no I/O, no shared state, the document is never
//!   mutated.
//! - Logging goes through `tracing`; no subscriber is installed here.

pub mod document;
pub mod error;
pub mod validate;
pub mod violation;

pub use document::{load_documents, parse_documents, validate_file, DocumentFormat};
pub use error::ValidationError;
pub use validate::{
    ensure_valid, validate, validate_mapping, validate_value, Document, ValidationResult,
};
pub use violation::{FieldPath, Segment, ValidationViolations, Violation, ViolationKind};
