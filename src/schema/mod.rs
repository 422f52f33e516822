//! Column and partition-key model.
//!
//! Column types are parsed into [`SemanticType`] so nested log formats can be
//! inspected, and rendered back byte-for-byte in the catalog's type syntax.

pub mod types;

pub use types::{SemanticType, TypeParseError};

use serde::Serialize;

/// A data column stored in each row. Order matches the on-disk row layout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Column {
    pub name: String,
    #[serde(rename = "type")]
    pub data_type: SemanticType,
}

impl Column {
    pub fn new(name: impl Into<String>, data_type: SemanticType) -> Self {
        Self {
            name: name.into(),
            data_type,
        }
    }

    /// Build a column from a catalog type string such as `array<struct<name:string>>`.
    pub fn parse(name: &str, data_type: &str) -> Result<Self, TypeParseError> {
        Ok(Self::new(name, SemanticType::parse(data_type)?))
    }
}

/// A virtual column materialized from an object path segment.
///
/// The type is kept as the literal catalog string; partition keys use types
/// (`integer`) that are not part of the row type grammar.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PartitionKey {
    pub name: String,
    #[serde(rename = "type")]
    pub data_type: String,
}

impl PartitionKey {
    pub fn new(name: impl Into<String>, data_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            data_type: data_type.into(),
        }
    }
}
