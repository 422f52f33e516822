//! Edge-delivery logs, after conversion to partitioned Parquet.

use super::{PARQUET_INPUT_FORMAT, PARQUET_OUTPUT_FORMAT, PARQUET_SERDE, SerdeSpec};

pub const COLUMNS: &[(&str, &str)] = &[
    ("timestamp", "timestamp"),
    ("c_ip", "string"),
    ("time_to_first_byte", "double"),
    ("sc_status", "int"),
    ("sc_bytes", "bigint"),
    ("cs_method", "string"),
    ("cs_protocol", "string"),
    ("cs_host", "string"),
    ("cs_uri_stem", "string"),
    ("cs_bytes", "bigint"),
    ("x_edge_location", "string"),
    ("x_edge_request_id", "string"),
    ("x_host_header", "string"),
    ("time_taken", "double"),
    ("cs_protocol_version", "string"),
    ("c_ip_version", "string"),
    ("cs_user_agent", "string"),
    ("cs_referer", "string"),
    ("cs_cookie", "string"),
    ("cs_uri_query", "string"),
    ("x_edge_response_result_type", "string"),
    ("x_forwarded_for", "string"),
    ("ssl_protocol", "string"),
    ("ssl_cipher", "string"),
    ("x_edge_result_type", "string"),
    ("fle_encrypted_fields", "int"),
    ("fle_status", "string"),
    ("sc_content_type", "string"),
    ("sc_content_len", "bigint"),
    ("sc_range_start", "bigint"),
    ("sc_range_end", "bigint"),
];

/// The Parquet SerDe `path` parameter: every column name, in order, joined by `", "`.
pub fn column_path() -> String {
    COLUMNS
        .iter()
        .map(|(name, _)| *name)
        .collect::<Vec<_>>()
        .join(", ")
}

pub fn parquet_serde() -> SerdeSpec {
    SerdeSpec::new(PARQUET_SERDE)
        .with_parameter("path", column_path())
        .with_formats(PARQUET_INPUT_FORMAT, PARQUET_OUTPUT_FORMAT)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn column_path_matches_published_parameter() {
        assert_eq!(
            column_path(),
            "timestamp, c_ip, time_to_first_byte, sc_status, sc_bytes, cs_method, cs_protocol, \
             cs_host, cs_uri_stem, cs_bytes, x_edge_location, x_edge_request_id, x_host_header, \
             time_taken, cs_protocol_version, c_ip_version, cs_user_agent, cs_referer, cs_cookie, \
             cs_uri_query, x_edge_response_result_type, x_forwarded_for, ssl_protocol, ssl_cipher, \
             x_edge_result_type, fle_encrypted_fields, fle_status, sc_content_type, sc_content_len, \
             sc_range_start, sc_range_end"
        );
    }
}
