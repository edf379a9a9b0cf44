//! # Dataset Mapping Schemas
//!
//! The built-in schemas for dataset mapping documents. A mapping document
//! names a stored product, says how its file paths are rendered, selects the
//! source datasets it applies to (`match`), defines one entry per band
//! (`measurements`) and fixes the on-disk layout (`storage`).
//!
//! The dtype and resampling whitelists are configuration, carried by
//! [`MappingSchemaConfig`]. [`dataset_mapping_schema`] returns the
//! process-wide schema built from the default configuration.

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::error::SchemaDefinitionError;
use crate::rule::{FieldRule, Kind, Pattern};
use crate::schema::Schema;

/// Numeric storage types a measurement may declare.
pub const DTYPES: &[&str] = &[
    "int8",
    "int16",
    "int32",
    "int64",
    "uint8",
    "uint16",
    "uint32",
    "uint64",
    "float16",
    "float32",
    "float64",
    "complex64",
    "complex128",
];

/// Resampling methods a measurement may request.
pub const RESAMPLING_METHODS: &[&str] = &[
    "nearest",
    "bilinear",
    "cubic",
    "cubic_spline",
    "lanczos",
    "average",
    "mode",
];

/// Mapping names and measurement variable names: ASCII alphanumerics and
/// underscores only.
pub const IDENTIFIER_PATTERN: &str = "[A-Za-z0-9_]+";

/// Whitelists applied by the measurement schema.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MappingSchemaConfig {
    /// Allowed values of `measurements.*.dtype`.
    pub dtypes: Vec<String>,
    /// Allowed values of `measurements.*.resampling_method`.
    pub resampling_methods: Vec<String>,
}

impl Default for MappingSchemaConfig {
    fn default() -> Self {
        Self {
            dtypes: DTYPES.iter().map(|s| s.to_string()).collect(),
            resampling_methods: RESAMPLING_METHODS.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl MappingSchemaConfig {
    /// Parse a configuration from YAML. Omitted lists keep their defaults.
    pub fn from_yaml_str(content: &str) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(content)
    }
}

/// Schema applied to every band entry under `measurements`.
pub fn measurement_schema(config: &MappingSchemaConfig) -> Result<Schema, SchemaDefinitionError> {
    Schema::try_new([
        (
            "dtype",
            FieldRule::optional(Kind::String).with_enum(config.dtypes.iter().cloned()),
        ),
        ("nodata", FieldRule::optional(Kind::Number)),
        ("fill_value", FieldRule::optional(Kind::Number)),
        (
            "resampling_method",
            FieldRule::optional(Kind::String)
                .with_enum(config.resampling_methods.iter().cloned()),
        ),
        (
            "varname",
            FieldRule::optional(Kind::String).with_pattern(Pattern::new(IDENTIFIER_PATTERN)?),
        ),
    ])
}

/// Schema of the `storage` sub-document.
pub fn storage_schema() -> Result<Schema, SchemaDefinitionError> {
    Schema::try_new([
        (
            "chunking",
            FieldRule::required(Kind::Object)
                .with_items(FieldRule::entry(Kind::Integer).with_exclusive_minimum(0.0)),
        ),
        ("crs", FieldRule::required(Kind::String)),
        (
            "dimension_order",
            FieldRule::required(Kind::Array).with_items(FieldRule::entry(Kind::String)),
        ),
        ("driver", FieldRule::required(Kind::String)),
        (
            "resolution",
            FieldRule::required(Kind::Object).with_items(FieldRule::entry(Kind::Number)),
        ),
        (
            "tile_size",
            FieldRule::required(Kind::Object).with_items(FieldRule::entry(Kind::Number)),
        ),
    ])
}

/// Schema of the `match` sub-document. `metadata` is matched against
/// dataset metadata by the indexer and has no fixed shape here.
pub fn match_schema() -> Result<Schema, SchemaDefinitionError> {
    Schema::try_new([("metadata", FieldRule::required(Kind::Object).open())])
}

/// Build the top-level dataset mapping schema from `config`.
pub fn build_dataset_mapping_schema(
    config: &MappingSchemaConfig,
) -> Result<Schema, SchemaDefinitionError> {
    Schema::try_new([
        (
            "name",
            FieldRule::required(Kind::String).with_pattern(Pattern::new(IDENTIFIER_PATTERN)?),
        ),
        ("description", FieldRule::optional(Kind::String)),
        ("file_path_template", FieldRule::required(Kind::String).non_empty()),
        ("location_name", FieldRule::optional(Kind::String)),
        (
            "match",
            FieldRule::required(Kind::Object).with_fixed_sub_schema(match_schema()?),
        ),
        (
            "measurements",
            FieldRule::required(Kind::Object).with_sub_schema(measurement_schema(config)?),
        ),
        (
            "storage",
            FieldRule::required(Kind::Object).with_fixed_sub_schema(storage_schema()?),
        ),
        ("global_attributes", FieldRule::optional(Kind::Object).open()),
    ])
}

static DATASET_MAPPING_SCHEMA: Lazy<Schema> = Lazy::new(|| {
    build_dataset_mapping_schema(&MappingSchemaConfig::default())
        .unwrap_or_else(|e| panic!("built-in dataset mapping schema is malformed: {e}"))
});

/// The dataset mapping schema built from the default whitelists.
pub fn dataset_mapping_schema() -> &'static Schema {
    &DATASET_MAPPING_SCHEMA
}
