//! # dmap-model: Declarative Schema Model for Dataset Mappings
//!
//! This crate describes which shapes a dataset mapping document may take.
//! It holds rules only: walking a document against them is the job of
//! `dmap-validate`.
//!
//! ## Key Design Principles
//!
//! 1. **Every field is a [`FieldRule`].** Required-ness, [`Kind`], enumerations,
//!    patterns and nested schemas are data on the rule, so one recursive
//!    algorithm handles every nesting level.
//!
//! 2. **Closed schemas.** A [`Schema`] lists every field it accepts. Content
//!    that is deliberately schema-less (`match.metadata`, `global_attributes`)
//!    is marked with [`FieldRule::open`] on the field that holds it.
//!
//! 3. **Definition defects are fatal.** Duplicate fields, bad regexes and
//!    inconsistent rules surface as [`SchemaDefinitionError`] at construction
//!    time, or as a panic from [`Schema::new`].
//!
//! 4. **Whitelists are configuration.** The dtype and resampling method lists
//!    live in [`MappingSchemaConfig`], not in the rules' code.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `dmap-*` crates (this is the leaf of the DAG).
//! - No `unsafe` code.
//! - Schemas are immutable after construction and `Send + Sync`.

pub mod error;
pub mod mapping;
pub mod rule;
pub mod schema;

pub use error::SchemaDefinitionError;
pub use mapping::{
    build_dataset_mapping_schema, dataset_mapping_schema, match_schema, measurement_schema,
    storage_schema, MappingSchemaConfig, DTYPES, IDENTIFIER_PATTERN, RESAMPLING_METHODS,
};
pub use rule::{value_kind_name, FieldRule, Kind, Pattern};
pub use schema::Schema;
