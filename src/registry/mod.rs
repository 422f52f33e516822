//! Source registry: per-source column tables and row deserializers.
//!
//! Column lists and SerDe strings are version-pinned constants. They encode
//! external wire formats, so reordering or renaming any entry breaks tables
//! already deployed against them.

pub mod access_log;
pub mod edge_log;
pub mod firewall_log;
pub mod flow_log;

use crate::error::{Invariant, Result, TableError};
use crate::schema::Column;

use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

pub const TEXT_INPUT_FORMAT: &str = "org.apache.hadoop.mapred.TextInputFormat";
pub const TEXT_OUTPUT_FORMAT: &str = "org.apache.hadoop.hive.ql.io.HiveIgnoreKeyTextOutputFormat";
pub const PARQUET_INPUT_FORMAT: &str =
    "org.apache.hadoop.hive.ql.io.parquet.MapredParquetInputFormat";
pub const PARQUET_OUTPUT_FORMAT: &str =
    "org.apache.hadoop.hive.ql.io.parquet.MapredParquetOutputFormat";
pub const PARQUET_SERDE: &str = "org.apache.hadoop.hive.ql.io.parquet.serde.ParquetHiveSerDe";

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum SourceKind {
    AccessLog,
    EdgeLog,
    FlowLog,
    FirewallLog,
}

impl SourceKind {
    pub const ALL: [SourceKind; 4] = [
        SourceKind::AccessLog,
        SourceKind::EdgeLog,
        SourceKind::FlowLog,
        SourceKind::FirewallLog,
    ];

    pub fn name(self) -> &'static str {
        match self {
            SourceKind::AccessLog => "access-log",
            SourceKind::EdgeLog => "edge-log",
            SourceKind::FlowLog => "flow-log",
            SourceKind::FirewallLog => "firewall-log",
        }
    }

    /// Row formats with a registered deserializer; the first one is the default.
    pub fn formats(self) -> &'static [RowFormat] {
        match self {
            SourceKind::AccessLog => &[RowFormat::Text],
            SourceKind::EdgeLog => &[RowFormat::Parquet],
            SourceKind::FlowLog => &[RowFormat::Parquet, RowFormat::Text],
            SourceKind::FirewallLog => &[RowFormat::Json],
        }
    }

    pub fn default_format(self) -> RowFormat {
        self.formats()[0]
    }

    fn column_table(self) -> &'static [(&'static str, &'static str)] {
        match self {
            SourceKind::AccessLog => access_log::COLUMNS,
            SourceKind::EdgeLog => edge_log::COLUMNS,
            SourceKind::FlowLog => flow_log::COLUMNS,
            SourceKind::FirewallLog => firewall_log::COLUMNS,
        }
    }
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for SourceKind {
    type Err = TableError;

    /// Accepts the canonical names plus the service names the logs come from.
    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "access-log" | "alb" => Ok(SourceKind::AccessLog),
            "edge-log" | "cloudfront" => Ok(SourceKind::EdgeLog),
            "flow-log" | "vpc-flow-log" | "vpc" => Ok(SourceKind::FlowLog),
            "firewall-log" | "waf" => Ok(SourceKind::FirewallLog),
            _ => Err(TableError::UnknownSourceKind(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RowFormat {
    Text,
    Parquet,
    Json,
}

impl RowFormat {
    pub fn name(self) -> &'static str {
        match self {
            RowFormat::Text => "text",
            RowFormat::Parquet => "parquet",
            RowFormat::Json => "json",
        }
    }
}

impl fmt::Display for RowFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for RowFormat {
    type Err = TableError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "text" => Ok(RowFormat::Text),
            "parquet" => Ok(RowFormat::Parquet),
            "json" => Ok(RowFormat::Json),
            _ => Err(TableError::UnknownSourceKind(format!("row format {}", s))),
        }
    }
}

/// Row deserializer and the storage formats it reads through.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SerdeSpec {
    pub library: String,
    pub parameters: BTreeMap<String, String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub input_format: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_format: Option<String>,
}

impl SerdeSpec {
    pub fn new(library: impl Into<String>) -> Self {
        Self {
            library: library.into(),
            parameters: BTreeMap::new(),
            input_format: None,
            output_format: None,
        }
    }

    pub fn with_parameter(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.parameters.insert(key.into(), value.into());
        self
    }

    pub fn with_formats(mut self, input: impl Into<String>, output: impl Into<String>) -> Self {
        self.input_format = Some(input.into());
        self.output_format = Some(output.into());
        self
    }
}

/// Ordered column schema of a source.
pub fn columns(kind: SourceKind) -> Result<Vec<Column>> {
    parse_columns(kind.column_table())
}

/// Ordered column schema of a source selected by name.
pub fn columns_by_name(kind: &str) -> Result<Vec<Column>> {
    columns(kind.parse()?)
}

/// Deserializer for a source in the requested row format.
pub fn serde(kind: SourceKind, format: RowFormat) -> Result<SerdeSpec> {
    match (kind, format) {
        (SourceKind::AccessLog, RowFormat::Text) => Ok(access_log::text_serde()),
        (SourceKind::EdgeLog, RowFormat::Parquet) => Ok(edge_log::parquet_serde()),
        (SourceKind::FlowLog, RowFormat::Parquet) => Ok(flow_log::parquet_serde()),
        (SourceKind::FlowLog, RowFormat::Text) => Ok(flow_log::text_serde()),
        (SourceKind::FirewallLog, RowFormat::Json) => Ok(firewall_log::json_serde()),
        _ => Err(TableError::UnknownSourceKind(format!("{} ({})", kind, format))),
    }
}

pub(crate) fn parse_columns(table: &[(&str, &str)]) -> Result<Vec<Column>> {
    table
        .iter()
        .map(|(name, ty)| {
            Column::parse(name, ty).map_err(|e| {
                TableError::from(Invariant::InvalidColumnType {
                    column: name.to_string(),
                    reason: e.to_string(),
                })
            })
        })
        .collect()
}
