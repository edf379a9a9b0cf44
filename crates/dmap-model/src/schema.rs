//! # Schema
//!
//! A [`Schema`] is an ordered, closed set of named [`FieldRule`]s. Any
//! document key that is not declared here is an unknown field.
//!
//! Schemas are built once and then only read. They are `Send + Sync` and
//! can be shared across threads through a `&'static` reference or an `Arc`.

use std::collections::HashMap;

use crate::error::SchemaDefinitionError;
use crate::rule::FieldRule;

/// Ordered mapping from field name to [`FieldRule`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Schema {
    fields: Vec<(String, FieldRule)>,
    index: HashMap<String, usize>,
}

impl Schema {
    /// Build a schema from `(field name, rule)` pairs, keeping their order.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaDefinitionError::DuplicateField`] if a name appears
    /// twice, or [`SchemaDefinitionError::InvalidRule`] if a rule combines
    /// constraints that cannot apply together.
    pub fn try_new<I, K>(fields: I) -> Result<Self, SchemaDefinitionError>
    where
        I: IntoIterator<Item = (K, FieldRule)>,
        K: Into<String>,
    {
        let mut schema = Self::default();
        for (name, rule) in fields {
            let name = name.into();
            if schema.index.contains_key(&name) {
                return Err(SchemaDefinitionError::DuplicateField(name));
            }
            rule.check_consistency(&name)?;
            schema.index.insert(name.clone(), schema.fields.len());
            schema.fields.push((name, rule));
        }
        Ok(schema)
    }

    /// Build a schema, treating a definition defect as fatal.
    ///
    /// # Panics
    ///
    /// Panics under the same conditions [`Schema::try_new`] returns an error.
    /// Those indicate a bug in the code declaring the schema.
    pub fn new<I, K>(fields: I) -> Self
    where
        I: IntoIterator<Item = (K, FieldRule)>,
        K: Into<String>,
    {
        match Self::try_new(fields) {
            Ok(schema) => schema,
            Err(e) => panic!("malformed schema definition: {e}"),
        }
    }

    /// Look up the rule for `name`.
    pub fn get(&self, name: &str) -> Option<&FieldRule> {
        self.index.get(name).map(|&i| &self.fields[i].1)
    }

    /// Returns true if `name` is a declared field.
    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Declared fields in declaration order.
    pub fn fields(&self) -> impl Iterator<Item = (&str, &FieldRule)> {
        self.fields.iter().map(|(name, rule)| (name.as_str(), rule))
    }

    /// Names of the required fields in declaration order.
    pub fn required_fields(&self) -> impl Iterator<Item = &str> {
        self.fields()
            .filter(|(_, rule)| rule.is_required())
            .map(|(name, _)| name)
    }

    /// Number of declared fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Returns true if no fields are declared.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}
