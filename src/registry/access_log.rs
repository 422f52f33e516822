//! Load-balancer access log (text, one request per line).

use super::{SerdeSpec, TEXT_INPUT_FORMAT, TEXT_OUTPUT_FORMAT};

pub const REGEX_SERDE: &str = "org.apache.hadoop.hive.serde2.RegexSerDe";

/// Column layout of the access log line; must stay aligned with [`INPUT_REGEX`] capture groups.
pub const COLUMNS: &[(&str, &str)] = &[
    ("type", "string"),
    ("time", "string"),
    ("elb", "string"),
    ("client_ip", "string"),
    ("client_port", "int"),
    ("target_ip", "string"),
    ("target_port", "int"),
    ("request_processing_time", "double"),
    ("target_processing_time", "double"),
    ("response_processing_time", "double"),
    ("elb_status_code", "int"),
    ("target_status_code", "string"),
    ("received_bytes", "bigint"),
    ("sent_bytes", "bigint"),
    ("request_verb", "string"),
    ("request_url", "string"),
    ("request_proto", "string"),
    ("user_agent", "string"),
    ("ssl_cipher", "string"),
    ("ssl_protocol", "string"),
    ("target_group_arn", "string"),
    ("trace_id", "string"),
    ("domain_name", "string"),
    ("chosen_cert_arn", "string"),
    ("matched_rule_priority", "string"),
    ("request_creation_time", "string"),
    ("actions_executed", "string"),
    ("redirect_url", "string"),
    ("lambda_error_reason", "string"),
    ("target_port_list", "string"),
    ("target_status_code_list", "string"),
    ("classification", "string"),
    ("classification_reason", "string"),
    ("conn_trace_id", "string"),
];

pub const INPUT_REGEX: &str = r#"([^ ]*) ([^ ]*) ([^ ]*) ([^ ]*):([0-9]*) ([^ ]*)[:-]([0-9]*) ([-.0-9]*) ([-.0-9]*) ([-.0-9]*) (|[-0-9]*) (-|[-0-9]*) ([-0-9]*) ([-0-9]*) "([^ ]*) (.*) (- |[^ ]*)" "([^"]*)" ([A-Z0-9-_]+) ([A-Za-z0-9.-]*) ([^ ]*) "([^"]*)" "([^"]*)" "([^"]*)" ([-.0-9]*) ([^ ]*) "([^"]*)" "([^"]*)" "([^ ]*)" "([^\s]+?)" "([^\s]+)" "([^ ]*)" "([^ ]*)" ?([^ ]*)?( .*)?"#;

pub fn text_serde() -> SerdeSpec {
    SerdeSpec::new(REGEX_SERDE)
        .with_parameter("serialization.format", "1")
        .with_parameter("input.regex", INPUT_REGEX)
        .with_formats(TEXT_INPUT_FORMAT, TEXT_OUTPUT_FORMAT)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn regex_compiles_and_parses_a_sample_line() {
        let re = regex::Regex::new(INPUT_REGEX).unwrap();
        let line = concat!(
            r#"https 2025-08-01T23:39:43.123456Z app/my-lb/50dc6c495c0c9188 "#,
            r#"192.168.131.39:2817 10.0.0.1:80 0.086 0.048 0.037 200 200 0 57 "#,
            r#""GET https://www.example.com:443/ HTTP/1.1" "curl/7.46.0" "#,
            r#"ECDHE-RSA-AES128-GCM-SHA256 TLSv1.2 "#,
            r#"arn:aws:elasticloadbalancing:us-east-2:123456789012:targetgroup/my-targets/73e2d6bc24d8a067 "#,
            r#""Root=1-58337281-1d84f3d73c47ec4e58577259" "www.example.com" "#,
            r#""arn:aws:acm:us-east-2:123456789012:certificate/12345678-1234-1234-1234-123456789012" "#,
            r#"1 2025-08-01T23:39:43.000000Z "authenticate,forward" "-" "-" "10.0.0.1:80" "200" "-" "-" TID_1234"#,
        );

        let caps = re.captures(line).expect("sample line should match");
        assert_eq!(&caps[1], "https");
        assert_eq!(&caps[4], "192.168.131.39");
        assert_eq!(&caps[5], "2817");
        assert_eq!(&caps[15], "GET");
        assert_eq!(&caps[18], "curl/7.46.0");
    }

    #[test]
    fn text_serde_uses_regex_deserializer() {
        let serde = text_serde();
        assert_eq!(serde.library, REGEX_SERDE);
        assert_eq!(serde.parameters["serialization.format"], "1");
        assert_eq!(serde.parameters["input.regex"], INPUT_REGEX);
        assert_eq!(serde.input_format.as_deref(), Some(TEXT_INPUT_FORMAT));
    }
}
