//! # Document Loading
//!
//! Reads mapping documents from JSON or YAML files so they can be handed to
//! [`validate`](crate::validate). A YAML file may hold several documents
//! separated by `---`.
//!
//! YAML is converted to the JSON value model before validation. Empty
//! documents in a YAML stream (an empty or comment-only file, a trailing
//! `---`) are skipped rather than handed to the validator as a null top
//! level.

use std::path::Path;

use dmap_model::Schema;
use serde::Deserialize;
use serde_json::Value;

use crate::error::ValidationError;
use crate::validate::{validate_value, ValidationResult};

/// Serialization format of a document file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    Json,
    Yaml,
}

impl DocumentFormat {
    /// `.yaml` and `.yml` are YAML; anything else is read as JSON.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some("yaml") | Some("yml") => DocumentFormat::Yaml,
            _ => DocumentFormat::Json,
        }
    }
}

/// Parse every document in `content`.
///
/// `label` names the source in load errors.
pub fn parse_documents(
    content: &str,
    format: DocumentFormat,
    label: &str,
) -> Result<Vec<Value>, ValidationError> {
    let load_error = |reason: String| ValidationError::DocumentLoadError {
        path: label.to_string(),
        reason,
    };

    match format {
        DocumentFormat::Json => {
            let value = serde_json::from_str(content)
                .map_err(|e| load_error(format!("invalid JSON: {e}")))?;
            Ok(vec![value])
        }
        DocumentFormat::Yaml => {
            let mut documents = Vec::new();
            for document in serde_yaml::Deserializer::from_str(content) {
                let yaml = serde_yaml::Value::deserialize(document)
                    .map_err(|e| load_error(format!("invalid YAML: {e}")))?;
                if yaml.is_null() {
                    continue;
                }
                let value = yaml_to_json_value(&yaml)
                    .map_err(|e| load_error(format!("YAML-to-JSON conversion failed: {e}")))?;
                documents.push(value);
            }
            Ok(documents)
        }
    }
}

/// Read and parse every document in the file at `path`.
pub fn load_documents(path: &Path) -> Result<Vec<Value>, ValidationError> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        ValidationError::DocumentLoadError {
            path: path.display().to_string(),
            reason: format!("cannot read file: {e}"),
        }
    })?;

    let documents = parse_documents(
        &content,
        DocumentFormat::from_path(path),
        &path.display().to_string(),
    )?;
    tracing::debug!(
        path = %path.display(),
        documents = documents.len(),
        "loaded mapping documents"
    );
    Ok(documents)
}

/// Validate every document in the file at `path` against `schema`.
///
/// Returns one result per document, in file order.
///
/// # Errors
///
/// Returns [`ValidationError::DocumentLoadError`] if the file cannot be read
/// or parsed, and [`ValidationError::NotADocument`] if a document in it is
/// not a mapping.
pub fn validate_file(
    schema: &Schema,
    path: &Path,
) -> Result<Vec<ValidationResult>, ValidationError> {
    load_documents(path)?
        .iter()
        .map(|document| validate_value(schema, document))
        .collect()
}

/// Convert a YAML value tree into the JSON value model the validator walks.
///
/// Band identifiers under `measurements` are usually written bare (`10:`),
/// which YAML parses as numbers; the schema addresses them by string key, so
/// numeric and boolean mapping keys are rendered as strings. Tags are
/// dropped. Non-finite floats (`.nan`, `.inf`) are rejected because a JSON
/// number cannot hold them, which keeps `nodata` and `fill_value` finite.
fn yaml_to_json_value(yaml: &serde_yaml::Value) -> Result<Value, String> {
    use serde_yaml::Value as Yaml;

    let value = match yaml {
        Yaml::Null => Value::Null,
        Yaml::Bool(b) => Value::Bool(*b),
        Yaml::Number(n) => json_number(n)?,
        Yaml::String(s) => Value::String(s.clone()),
        Yaml::Sequence(items) => Value::Array(
            items
                .iter()
                .map(yaml_to_json_value)
                .collect::<Result<_, _>>()?,
        ),
        Yaml::Mapping(entries) => Value::Object(
            entries
                .iter()
                .map(|(k, v)| Ok((mapping_key(k)?, yaml_to_json_value(v)?)))
                .collect::<Result<_, String>>()?,
        ),
        Yaml::Tagged(tagged) => yaml_to_json_value(&tagged.value)?,
    };
    Ok(value)
}

fn json_number(n: &serde_yaml::Number) -> Result<Value, String> {
    if let Some(i) = n.as_i64() {
        return Ok(Value::from(i));
    }
    if let Some(u) = n.as_u64() {
        return Ok(Value::from(u));
    }
    let f = n
        .as_f64()
        .ok_or_else(|| format!("unsupported YAML number: {n:?}"))?;
    serde_json::Number::from_f64(f)
        .map(Value::Number)
        .ok_or_else(|| format!("non-finite number {f} is not allowed"))
}

/// Mapping keys must be strings in the JSON model; scalar keys are rendered.
fn mapping_key(key: &serde_yaml::Value) -> Result<String, String> {
    match key {
        serde_yaml::Value::String(s) => Ok(s.clone()),
        serde_yaml::Value::Number(n) => Ok(n.to_string()),
        serde_yaml::Value::Bool(b) => Ok(b.to_string()),
        other => Err(format!("unsupported YAML map key: {other:?}")),
    }
}
