//! Network flow logs (default version 2 field set).

use super::{
    PARQUET_INPUT_FORMAT, PARQUET_OUTPUT_FORMAT, PARQUET_SERDE, SerdeSpec, TEXT_INPUT_FORMAT,
    TEXT_OUTPUT_FORMAT,
};

pub const LAZY_SIMPLE_SERDE: &str = "org.apache.hadoop.hive.serde2.lazy.LazySimpleSerDe";

pub const COLUMNS: &[(&str, &str)] = &[
    ("version", "string"),
    ("account_id", "string"),
    ("interface_id", "string"),
    ("srcaddr", "string"),
    ("dstaddr", "string"),
    ("srcport", "string"),
    ("dstport", "string"),
    ("protocol", "string"),
    ("packets", "string"),
    ("bytes", "string"),
    ("start", "string"),
    ("end", "string"),
    ("action", "string"),
    ("log_status", "string"),
];

/// Trailing field present when the log format records the emitting region.
pub const REGION_COLUMN: (&str, &str) = ("region", "string");

pub fn parquet_serde() -> SerdeSpec {
    SerdeSpec::new(PARQUET_SERDE).with_formats(PARQUET_INPUT_FORMAT, PARQUET_OUTPUT_FORMAT)
}

/// Space-delimited text records.
pub fn text_serde() -> SerdeSpec {
    SerdeSpec::new(LAZY_SIMPLE_SERDE)
        .with_parameter("field.delim", " ")
        .with_parameter("serialization.format", " ")
        .with_formats(TEXT_INPUT_FORMAT, TEXT_OUTPUT_FORMAT)
}
