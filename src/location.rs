//! Storage location and location template construction.
//!
//! The base location is `s3://<bucket>/<prefix/><root segments>/`. When the
//! table uses projection, the template appends one `${key}` placeholder per
//! partition key, in partition-key order.

use crate::error::{Result, TableError};

use regex::Regex;
use std::collections::BTreeSet;
use std::sync::LazyLock;

static PLACEHOLDER_PATTERN: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"\$\{([^}]*)\}").ok());

/// One literal or context-derived segment of a source's log root.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathSegment {
    Literal(&'static str),
    AccountId,
    Region,
    /// Region token after scope resolution (`cloudfront`, `global` or the region).
    RegionToken,
    WebAcl,
}

/// How a partition placeholder is written into the path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyStyle {
    /// `${key}`
    Bare,
    /// `key=${key}`
    Hive,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PathConvention {
    pub root: &'static [PathSegment],
    pub key_style: KeyStyle,
    /// Whether the template ends with `/` after the last placeholder.
    pub trailing_slash: bool,
}

/// Opaque context values the path may embed.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocationContext<'a> {
    pub account_id: Option<&'a str>,
    pub region: Option<&'a str>,
    pub region_token: Option<&'a str>,
    pub web_acl: Option<&'a str>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageLocation {
    pub base: String,
    pub template: Option<String>,
}

/// Build the base location and, when `partition_keys` is given, the template.
pub fn build_location(
    bucket: &str,
    prefix: Option<&str>,
    convention: &PathConvention,
    partition_keys: Option<&[&str]>,
    ctx: &LocationContext<'_>,
) -> Result<StorageLocation> {
    validate_bucket(bucket)?;

    let mut base = format!("s3://{}/", bucket);
    if let Some(prefix) = normalize_prefix(prefix)? {
        base.push_str(&prefix);
        base.push('/');
    }
    for segment in convention.root {
        base.push_str(resolve_segment(*segment, ctx)?);
        base.push('/');
    }

    let template = partition_keys.map(|keys| {
        let placeholders: Vec<String> = keys
            .iter()
            .map(|key| match convention.key_style {
                KeyStyle::Bare => format!("${{{}}}", key),
                KeyStyle::Hive => format!("{}=${{{}}}", key, key),
            })
            .collect();
        let mut template = format!("{}{}", base, placeholders.join("/"));
        if convention.trailing_slash && !keys.is_empty() {
            template.push('/');
        }
        template
    });

    Ok(StorageLocation { base, template })
}

/// Placeholder names in a template, in order of appearance.
pub fn placeholders(template: &str) -> Vec<String> {
    PLACEHOLDER_PATTERN
        .iter()
        .flat_map(|re| re.captures_iter(template))
        .map(|caps| caps[1].to_string())
        .collect()
}

pub fn placeholder_set(template: &str) -> BTreeSet<String> {
    placeholders(template).into_iter().collect()
}

/// Only the builder writes `${...}` tokens into a path.
fn reject_placeholder_syntax(field: &str, value: &str) -> Result<()> {
    if value.contains(['$', '{', '}']) {
        return Err(TableError::InvalidLocationInput(format!(
            "{} must not contain placeholder characters: {:?}",
            field, value
        )));
    }
    Ok(())
}

fn validate_bucket(bucket: &str) -> Result<()> {
    if bucket.is_empty() {
        return Err(TableError::InvalidLocationInput(
            "bucket name is empty".to_string(),
        ));
    }
    reject_placeholder_syntax("bucket name", bucket)?;
    if bucket.starts_with("s3:") {
        return Err(TableError::InvalidLocationInput(format!(
            "bucket name must not include a scheme: {}",
            bucket
        )));
    }
    if bucket.contains('/') || bucket.chars().any(char::is_whitespace) {
        return Err(TableError::InvalidLocationInput(format!(
            "bucket name must be a single path segment: {:?}",
            bucket
        )));
    }
    Ok(())
}

/// Trim surrounding slashes; an empty prefix is the same as no prefix.
fn normalize_prefix(prefix: Option<&str>) -> Result<Option<String>> {
    let Some(trimmed) = prefix.map(|p| p.trim().trim_matches('/')) else {
        return Ok(None);
    };
    if trimmed.is_empty() {
        return Ok(None);
    }
    reject_placeholder_syntax("prefix", trimmed)?;
    if trimmed.split('/').any(str::is_empty) {
        return Err(TableError::InvalidLocationInput(format!(
            "prefix contains an empty path segment: {:?}",
            trimmed
        )));
    }
    Ok(Some(trimmed.to_string()))
}

fn resolve_segment<'a>(segment: PathSegment, ctx: &LocationContext<'a>) -> Result<&'a str> {
    let (value, field) = match segment {
        PathSegment::Literal(lit) => return Ok(lit),
        PathSegment::AccountId => (ctx.account_id, "accountId"),
        PathSegment::Region => (ctx.region, "region"),
        PathSegment::RegionToken => (ctx.region_token, "region"),
        PathSegment::WebAcl => (ctx.web_acl, "webAclName"),
    };
    let value = value
        .filter(|v| !v.is_empty())
        .ok_or(TableError::MissingRequiredInput(field))?;
    if value.contains('/') {
        return Err(TableError::InvalidLocationInput(format!(
            "{} must be a single path segment: {:?}",
            field, value
        )));
    }
    reject_placeholder_syntax(field, value)?;
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const ELB_ROOT: &[PathSegment] = &[
        PathSegment::Literal("AWSLogs"),
        PathSegment::AccountId,
        PathSegment::Literal("elasticloadbalancing"),
        PathSegment::Region,
    ];

    fn ctx() -> LocationContext<'static> {
        LocationContext {
            account_id: Some("111111111111"),
            region: Some("us-east-1"),
            ..Default::default()
        }
    }

    fn bare(root: &'static [PathSegment]) -> PathConvention {
        PathConvention {
            root,
            key_style: KeyStyle::Bare,
            trailing_slash: true,
        }
    }

    #[test]
    fn empty_prefix_matches_absent_prefix() {
        let convention = bare(ELB_ROOT);
        let expected = "s3://logs/AWSLogs/111111111111/elasticloadbalancing/us-east-1/";
        for prefix in [None, Some(""), Some("/"), Some("  ")] {
            let loc = build_location("logs", prefix, &convention, None, &ctx()).unwrap();
            assert_eq!(loc.base, expected, "{:?}", prefix);
            assert_eq!(loc.template, None);
        }
    }

    #[test]
    fn prefix_slashes_are_normalized() {
        let convention = bare(ELB_ROOT);
        let loc =
            build_location("logs", Some("/alb/prod/"), &convention, Some(&["day"][..]), &ctx()).unwrap();
        assert_eq!(
            loc.template.as_deref(),
            Some("s3://logs/alb/prod/AWSLogs/111111111111/elasticloadbalancing/us-east-1/${day}/")
        );

        assert!(matches!(
            build_location("logs", Some("a//b"), &convention, None, &ctx()),
            Err(TableError::InvalidLocationInput(_))
        ));
    }

    #[test]
    fn hive_style_keys() {
        let convention = PathConvention {
            root: &[],
            key_style: KeyStyle::Hive,
            trailing_slash: true,
        };
        let loc = build_location(
            "cdn-logs",
            Some("cdn"),
            &convention,
            Some(&["year", "month", "day"][..]),
            &LocationContext::default(),
        )
        .unwrap();
        assert_eq!(loc.base, "s3://cdn-logs/cdn/");
        assert_eq!(
            loc.template.as_deref(),
            Some("s3://cdn-logs/cdn/year=${year}/month=${month}/day=${day}/")
        );
    }

    #[test]
    fn template_without_trailing_slash() {
        let convention = PathConvention {
            root: &[PathSegment::Literal("WAFLogs"), PathSegment::WebAcl],
            key_style: KeyStyle::Bare,
            trailing_slash: false,
        };
        let ctx = LocationContext {
            web_acl: Some("my-acl"),
            ..Default::default()
        };
        let loc = build_location("b", None, &convention, Some(&["log_time"][..]), &ctx).unwrap();
        assert_eq!(loc.template.as_deref(), Some("s3://b/WAFLogs/my-acl/${log_time}"));
    }

    #[test]
    fn rejects_bad_bucket_and_missing_context() {
        let convention = bare(ELB_ROOT);
        for bucket in ["", "s3://logs", "logs/prefix", "my logs"] {
            assert!(
                matches!(
                    build_location(bucket, None, &convention, None, &ctx()),
                    Err(TableError::InvalidLocationInput(_))
                ),
                "{:?}",
                bucket
            );
        }

        let no_account = LocationContext {
            region: Some("us-east-1"),
            ..Default::default()
        };
        assert_eq!(
            build_location("logs", None, &convention, None, &no_account),
            Err(TableError::MissingRequiredInput("accountId"))
        );
    }

    #[test]
    fn rejects_placeholder_tokens_in_inputs() {
        let convention = bare(ELB_ROOT);
        let keys = Some(&["day"][..]);

        for bucket in ["${month}", "logs$", "logs{x}"] {
            assert!(
                matches!(
                    build_location(bucket, None, &convention, keys, &ctx()),
                    Err(TableError::InvalidLocationInput(_))
                ),
                "{:?}",
                bucket
            );
        }
        for prefix in ["${day}", "logs/${year}", "a}b"] {
            assert!(
                matches!(
                    build_location("logs", Some(prefix), &convention, keys, &ctx()),
                    Err(TableError::InvalidLocationInput(_))
                ),
                "{:?}",
                prefix
            );
        }

        let acl = PathConvention {
            root: &[PathSegment::AccountId, PathSegment::WebAcl],
            key_style: KeyStyle::Bare,
            trailing_slash: false,
        };
        let injected_acl = LocationContext {
            account_id: Some("111111111111"),
            web_acl: Some("${log_time}"),
            ..Default::default()
        };
        assert!(matches!(
            build_location("logs", None, &acl, None, &injected_acl),
            Err(TableError::InvalidLocationInput(_))
        ));
        let injected_account = LocationContext {
            account_id: Some("${day}"),
            web_acl: Some("acl"),
            ..Default::default()
        };
        assert!(matches!(
            build_location("logs", None, &acl, None, &injected_account),
            Err(TableError::InvalidLocationInput(_))
        ));
    }

    #[test]
    fn extracts_placeholders_in_order() {
        assert_eq!(
            placeholders("s3://b/${region}/x=${year}/${month}"),
            ["region", "year", "month"]
        );
        assert!(placeholders("s3://b/AWSLogs/").is_empty());
    }
}
