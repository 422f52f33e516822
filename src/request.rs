//! Request layer: the raw input record and its validated form.
//!
//! We keep two representations:
//! - TableRequest: caller-facing input (serde-friendly, camelCase JSON)
//! - ValidatedRequest: typed profile, parsed start date and resolved formats
//!
//! JSON shape:
//! {
//!   "source": "firewall-log",
//!   "bucketName": "my-log-bucket",
//!   "databaseName": "logs",
//!   "tableName": "waf",
//!   "logPrefix": "waf",            // optional
//!   "projectionStartDate": "2025/01/01",
//!   "variant": "minute",          // optional, flow-log and firewall-log only
//!   "scope": "CLOUDFRONT",        // firewall-log only
//!   "webAclName": "my-acl",       // firewall-log only
//!   "format": "parquet",          // optional row format
//!   "description": "..."          // optional override
//! }

use crate::error::{Result, TableError};
use crate::location::PathSegment;
use crate::profile::{SourceProfile, StartDatePolicy};
use crate::projection::ProjectionStartDate;
use crate::registry::{RowFormat, SourceKind};

use serde::Deserialize;
use tracing::{debug, warn};

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableRequest {
    pub source: String,

    #[serde(default)]
    pub bucket_name: String,

    #[serde(default)]
    pub database_name: String,

    #[serde(default)]
    pub table_name: String,

    #[serde(default)]
    pub log_prefix: Option<String>,

    #[serde(default)]
    pub projection_start_date: Option<String>,

    #[serde(default)]
    pub variant: Option<String>,

    #[serde(default)]
    pub scope: Option<String>,

    #[serde(default)]
    pub web_acl_name: Option<String>,

    #[serde(default)]
    pub format: Option<String>,

    #[serde(default)]
    pub description: Option<String>,
}

/// Account and region of the deployment, supplied by the caller as opaque values.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Environment {
    pub account_id: Option<String>,
    pub region: Option<String>,
}

impl Environment {
    pub fn new(account_id: impl Into<String>, region: impl Into<String>) -> Self {
        Self {
            account_id: Some(account_id.into()),
            region: Some(region.into()),
        }
    }
}

/// Validated, typed inputs ready for the builders.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedRequest {
    pub profile: SourceProfile,
    pub format: RowFormat,
    pub bucket_name: String,
    pub log_prefix: Option<String>,
    pub database_name: String,
    pub table_name: String,
    pub description: Option<String>,
    pub start_date: Option<ProjectionStartDate>,
    pub web_acl_name: Option<String>,
    pub account_id: Option<String>,
    pub region: Option<String>,
}

impl TableRequest {
    /// Resolve selectors and check source-specific mandatory fields.
    ///
    /// The bucket name is checked by the location builder, which owns its
    /// rules.
    pub fn validate_and_build(&self, env: &Environment) -> Result<ValidatedRequest> {
        let kind: SourceKind = self.source.parse()?;
        let profile = SourceProfile::resolve(kind, self.variant.as_deref(), self.scope.as_deref())?;
        let layout = profile.layout();

        let database_name = required(&self.database_name, "databaseName")?;
        let table_name = required(&self.table_name, "tableName")?;

        let format: RowFormat = match non_empty(self.format.as_deref()) {
            Some(f) => f.parse()?,
            None => kind.default_format(),
        };

        let supplied_date = non_empty(self.projection_start_date.as_deref());
        let start_date = match (layout.start_date, supplied_date) {
            (StartDatePolicy::Required, None) => {
                return Err(TableError::MissingRequiredInput("projectionStartDate"));
            }
            (StartDatePolicy::Required, Some(date)) => Some(ProjectionStartDate::parse(date)?),
            (StartDatePolicy::Defaulted(fallback), date) => {
                Some(ProjectionStartDate::parse(date.unwrap_or(fallback))?)
            }
            (StartDatePolicy::Unused, date) => {
                if let Some(date) = date {
                    warn!(profile = %profile, start_date = date, "projection start date is ignored by this profile");
                }
                None
            }
        };

        let needs_acl = layout.convention.root.contains(&PathSegment::WebAcl);
        let web_acl_name = non_empty(self.web_acl_name.as_deref()).map(str::to_string);
        if needs_acl && web_acl_name.is_none() {
            return Err(TableError::MissingRequiredInput("webAclName"));
        }
        if !needs_acl && web_acl_name.is_some() {
            warn!(profile = %profile, "webAclName is ignored by this profile");
        }

        debug!(profile = %profile, format = %format, "resolved source profile");

        Ok(ValidatedRequest {
            profile,
            format,
            bucket_name: self.bucket_name.trim().to_string(),
            log_prefix: self.log_prefix.clone(),
            database_name,
            table_name,
            description: non_empty(self.description.as_deref()).map(str::to_string),
            start_date,
            web_acl_name,
            account_id: non_empty(env.account_id.as_deref()).map(str::to_string),
            region: non_empty(env.region.as_deref()).map(str::to_string),
        })
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

fn required(value: &str, field: &'static str) -> Result<String> {
    non_empty(Some(value))
        .map(str::to_string)
        .ok_or(TableError::MissingRequiredInput(field))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::{FirewallScope, FirewallVariant};
    use pretty_assertions::assert_eq;

    fn waf_request() -> TableRequest {
        serde_json::from_str(
            r#"{
                "source": "waf",
                "bucketName": "waf-logs",
                "databaseName": "security",
                "tableName": "waf_cf",
                "scope": "CLOUDFRONT",
                "webAclName": "edge-acl"
            }"#,
        )
        .unwrap()
    }

    #[test]
    fn parses_camel_case_json() {
        let req = waf_request();
        assert_eq!(req.source, "waf");
        assert_eq!(req.web_acl_name.as_deref(), Some("edge-acl"));
        assert_eq!(req.log_prefix, None);
    }

    #[test]
    fn firewall_start_date_falls_back_to_fixed_default() {
        let validated = waf_request()
            .validate_and_build(&Environment::new("123456789012", "us-east-1"))
            .unwrap();
        assert_eq!(
            validated.profile,
            SourceProfile::FirewallLog {
                variant: FirewallVariant::Minute,
                scope: FirewallScope::Cloudfront,
            }
        );
        assert_eq!(validated.format, RowFormat::Json);
        assert_eq!(
            validated.start_date.map(|d| d.to_string()).as_deref(),
            Some("2025/01/01")
        );
    }

    #[test]
    fn required_fields_are_reported_by_name() {
        let env = Environment::default();

        let mut req = waf_request();
        req.database_name = " ".into();
        assert_eq!(
            req.validate_and_build(&env),
            Err(TableError::MissingRequiredInput("databaseName"))
        );

        let mut req = waf_request();
        req.table_name.clear();
        assert_eq!(
            req.validate_and_build(&env),
            Err(TableError::MissingRequiredInput("tableName"))
        );

        let mut req = waf_request();
        req.web_acl_name = None;
        assert_eq!(
            req.validate_and_build(&env),
            Err(TableError::MissingRequiredInput("webAclName"))
        );

        let mut req = waf_request();
        req.source = "alb".into();
        req.scope = None;
        assert_eq!(
            req.validate_and_build(&env),
            Err(TableError::MissingRequiredInput("projectionStartDate"))
        );
    }

    #[test]
    fn hourly_firewall_does_not_need_an_acl_name() {
        let mut req = waf_request();
        req.variant = Some("hourly".into());
        req.web_acl_name = None;
        let validated = req.validate_and_build(&Environment::default()).unwrap();
        assert_eq!(validated.web_acl_name, None);
    }

    #[test]
    fn discovery_flow_log_ignores_start_date() {
        let req = TableRequest {
            source: "flow-log".into(),
            bucket_name: "vpc".into(),
            database_name: "db".into(),
            table_name: "flows".into(),
            projection_start_date: Some("2024/01/01".into()),
            format: Some("text".into()),
            ..Default::default()
        };
        let validated = req.validate_and_build(&Environment::default()).unwrap();
        assert_eq!(validated.start_date, None);
        assert_eq!(validated.format, RowFormat::Text);
    }
}
