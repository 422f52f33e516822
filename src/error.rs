//! Error taxonomy for descriptor generation.
//!
//! Every failure is a synchronous validation error raised while building a
//! descriptor; nothing here is retryable.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, TableError>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TableError {
    #[error("unknown source kind: {0}")]
    UnknownSourceKind(String),

    #[error("invalid location input: {0}")]
    InvalidLocationInput(String),

    #[error("missing required input `{0}`")]
    MissingRequiredInput(&'static str),

    #[error("invalid projection start date {0:?}: expected YYYY/MM/DD")]
    InvalidStartDate(String),

    #[error("descriptor validation failed: {0}")]
    DescriptorValidation(#[from] Invariant),
}

/// The specific cross-field invariant a descriptor broke.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Invariant {
    #[error("required field `{0}` is empty")]
    EmptyField(&'static str),

    #[error("column `{0}` is declared more than once")]
    DuplicateColumn(String),

    #[error("partition key `{0}` is declared more than once")]
    DuplicatePartitionKey(String),

    #[error("partition key `{0}` collides with a column of the same name")]
    PartitionColumnOverlap(String),

    #[error("partition key `{0}` has no projection rule")]
    MissingProjectionRule(String),

    #[error("projection rule `{0}` does not match any partition key")]
    UnexpectedProjectionRule(String),

    #[error(
        "location template placeholders do not match partition keys (missing: [{}], unexpected: [{}])",
        .missing.join(", "),
        .unexpected.join(", ")
    )]
    PlaceholderMismatch {
        missing: Vec<String>,
        unexpected: Vec<String>,
    },

    #[error("base location contains placeholder `${{{0}}}`")]
    PlaceholderInLocation(String),

    #[error("location template repeats placeholder `${{{0}}}`")]
    DuplicatePlaceholder(String),

    #[error("location template is only valid when partition projection is enabled")]
    TemplateWithoutProjection,

    #[error("column `{column}` has an invalid type: {reason}")]
    InvalidColumnType { column: String, reason: String },
}
