//! Source profiles: one tagged type covering every supported log layout.
//!
//! Historical layouts of the same log family are kept as selectable variants
//! rather than reconciled; each variant resolves to a static
//! [`ProfileLayout`] and every builder works off that layout.

mod layouts;

use crate::error::{Result, TableError};
use crate::location::PathConvention;
use crate::projection::PartitionSpec;
use crate::registry::SourceKind;

use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FlowLogVariant {
    /// Partitions registered by `MSCK REPAIR TABLE` under `AWSLogs/`.
    Discovery,
    /// Projected `year/month/day` under a fixed region; `region` is a data column.
    Projected,
    /// Projected with `region` as a partition key instead of a column.
    Regional,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FirewallVariant {
    /// One `log_time` date key at minute granularity.
    Minute,
    /// One `day` date key.
    Daily,
    /// Region, web ACL and calendar components as separate keys.
    Hourly,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FirewallScope {
    Regional,
    Cloudfront,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SourceProfile {
    AccessLog,
    EdgeLog,
    FlowLog(FlowLogVariant),
    FirewallLog {
        variant: FirewallVariant,
        scope: FirewallScope,
    },
}

/// Whether a profile needs a projection start date.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StartDatePolicy {
    Required,
    /// Optional, with the given `YYYY/MM/DD` fallback.
    Defaulted(&'static str),
    Unused,
}

/// Everything that distinguishes one profile variant's output shape.
#[derive(Debug)]
pub struct ProfileLayout {
    pub description: Option<&'static str>,
    pub convention: PathConvention,
    pub partitions: &'static [PartitionSpec],
    /// `false` means partitions are discovered by scanning the location.
    pub projected: bool,
    /// Columns appended after the registry's column list.
    pub extra_columns: &'static [(&'static str, &'static str)],
    pub table_parameters: &'static [(&'static str, &'static str)],
    pub start_date: StartDatePolicy,
    /// `(compressed, stored_as_sub_directories)` when the profile sets them.
    pub storage_flags: Option<(bool, bool)>,
}

impl SourceProfile {
    /// Select a profile from its selectors. `variant` and `scope` default where
    /// the source has a single historical default.
    pub fn resolve(kind: SourceKind, variant: Option<&str>, scope: Option<&str>) -> Result<Self> {
        let variant = variant.map(str::trim).filter(|v| !v.is_empty());
        let scope = scope.map(str::trim).filter(|s| !s.is_empty());

        match kind {
            SourceKind::AccessLog | SourceKind::EdgeLog => {
                if let Some(v) = variant {
                    return Err(TableError::UnknownSourceKind(format!("{} variant {}", kind, v)));
                }
                Ok(if kind == SourceKind::AccessLog {
                    SourceProfile::AccessLog
                } else {
                    SourceProfile::EdgeLog
                })
            }
            SourceKind::FlowLog => {
                let variant = match variant {
                    Some(v) => v.parse()?,
                    None => FlowLogVariant::Discovery,
                };
                Ok(SourceProfile::FlowLog(variant))
            }
            SourceKind::FirewallLog => {
                let variant = match variant {
                    Some(v) => v.parse()?,
                    None => FirewallVariant::Minute,
                };
                let scope = scope
                    .ok_or(TableError::MissingRequiredInput("scope"))?
                    .parse()?;
                Ok(SourceProfile::FirewallLog { variant, scope })
            }
        }
    }

    pub fn kind(&self) -> SourceKind {
        match self {
            SourceProfile::AccessLog => SourceKind::AccessLog,
            SourceProfile::EdgeLog => SourceKind::EdgeLog,
            SourceProfile::FlowLog(_) => SourceKind::FlowLog,
            SourceProfile::FirewallLog { .. } => SourceKind::FirewallLog,
        }
    }

    pub fn variant_name(&self) -> Option<&'static str> {
        match self {
            SourceProfile::AccessLog | SourceProfile::EdgeLog => None,
            SourceProfile::FlowLog(v) => Some(v.name()),
            SourceProfile::FirewallLog { variant, .. } => Some(variant.name()),
        }
    }

    pub fn layout(&self) -> &'static ProfileLayout {
        match self {
            SourceProfile::AccessLog => &layouts::ACCESS_LOG,
            SourceProfile::EdgeLog => &layouts::EDGE_LOG,
            SourceProfile::FlowLog(FlowLogVariant::Discovery) => &layouts::FLOW_LOG_DISCOVERY,
            SourceProfile::FlowLog(FlowLogVariant::Projected) => &layouts::FLOW_LOG_PROJECTED,
            SourceProfile::FlowLog(FlowLogVariant::Regional) => &layouts::FLOW_LOG_REGIONAL,
            SourceProfile::FirewallLog { variant, .. } => match variant {
                FirewallVariant::Minute => &layouts::FIREWALL_MINUTE,
                FirewallVariant::Daily => &layouts::FIREWALL_DAILY,
                FirewallVariant::Hourly => &layouts::FIREWALL_HOURLY,
            },
        }
    }

    /// Region token written into the path or an `enum` rule.
    ///
    /// CloudFront-scoped firewall logs live under a fixed token instead of a
    /// region; the variants disagree on which one.
    pub fn region_token<'a>(&self, region: Option<&'a str>) -> Option<&'a str> {
        match self {
            SourceProfile::AccessLog | SourceProfile::EdgeLog => None,
            SourceProfile::FlowLog(_) => region,
            SourceProfile::FirewallLog {
                scope: FirewallScope::Regional,
                ..
            } => region,
            SourceProfile::FirewallLog {
                variant,
                scope: FirewallScope::Cloudfront,
            } => Some(match variant {
                FirewallVariant::Minute | FirewallVariant::Hourly => "cloudfront",
                FirewallVariant::Daily => "global",
            }),
        }
    }

    /// Every profile variant, with firewall variants in both scopes.
    pub fn all() -> Vec<SourceProfile> {
        let mut out = vec![SourceProfile::AccessLog, SourceProfile::EdgeLog];
        out.extend(FlowLogVariant::ALL.iter().map(|v| SourceProfile::FlowLog(*v)));
        for variant in FirewallVariant::ALL {
            for scope in [FirewallScope::Regional, FirewallScope::Cloudfront] {
                out.push(SourceProfile::FirewallLog { variant, scope });
            }
        }
        out
    }

    /// Variant names selectable for a source kind.
    pub fn variant_names(kind: SourceKind) -> Vec<&'static str> {
        match kind {
            SourceKind::AccessLog | SourceKind::EdgeLog => Vec::new(),
            SourceKind::FlowLog => FlowLogVariant::ALL.iter().map(|v| v.name()).collect(),
            SourceKind::FirewallLog => FirewallVariant::ALL.iter().map(|v| v.name()).collect(),
        }
    }
}

impl fmt::Display for SourceProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self, self.variant_name()) {
            (SourceProfile::FirewallLog { scope, .. }, Some(v)) => {
                write!(f, "{}/{} ({})", self.kind(), v, scope.name())
            }
            (_, Some(v)) => write!(f, "{}/{}", self.kind(), v),
            (_, None) => write!(f, "{}", self.kind()),
        }
    }
}

impl FlowLogVariant {
    pub const ALL: [FlowLogVariant; 3] = [
        FlowLogVariant::Discovery,
        FlowLogVariant::Projected,
        FlowLogVariant::Regional,
    ];

    pub fn name(self) -> &'static str {
        match self {
            FlowLogVariant::Discovery => "discovery",
            FlowLogVariant::Projected => "projected",
            FlowLogVariant::Regional => "regional",
        }
    }
}

impl FromStr for FlowLogVariant {
    type Err = TableError;

    fn from_str(s: &str) -> Result<Self> {
        FlowLogVariant::ALL
            .into_iter()
            .find(|v| v.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| TableError::UnknownSourceKind(format!("flow-log variant {}", s)))
    }
}

impl FirewallVariant {
    pub const ALL: [FirewallVariant; 3] = [
        FirewallVariant::Minute,
        FirewallVariant::Daily,
        FirewallVariant::Hourly,
    ];

    pub fn name(self) -> &'static str {
        match self {
            FirewallVariant::Minute => "minute",
            FirewallVariant::Daily => "daily",
            FirewallVariant::Hourly => "hourly",
        }
    }
}

impl FromStr for FirewallVariant {
    type Err = TableError;

    fn from_str(s: &str) -> Result<Self> {
        FirewallVariant::ALL
            .into_iter()
            .find(|v| v.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| TableError::UnknownSourceKind(format!("firewall-log variant {}", s)))
    }
}

impl FirewallScope {
    pub fn name(self) -> &'static str {
        match self {
            FirewallScope::Regional => "REGIONAL",
            FirewallScope::Cloudfront => "CLOUDFRONT",
        }
    }
}

impl FromStr for FirewallScope {
    type Err = TableError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            "REGIONAL" => Ok(FirewallScope::Regional),
            "CLOUDFRONT" => Ok(FirewallScope::Cloudfront),
            _ => Err(TableError::UnknownSourceKind(format!("firewall scope {}", s))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::location::PathSegment;
    use pretty_assertions::assert_eq;
    use std::collections::BTreeSet;

    #[test]
    fn resolves_defaults_and_rejects_unknown_selectors() {
        assert_eq!(
            SourceProfile::resolve(SourceKind::FlowLog, None, None).unwrap(),
            SourceProfile::FlowLog(FlowLogVariant::Discovery)
        );
        assert_eq!(
            SourceProfile::resolve(SourceKind::FirewallLog, Some(" Hourly "), Some("cloudfront"))
                .unwrap(),
            SourceProfile::FirewallLog {
                variant: FirewallVariant::Hourly,
                scope: FirewallScope::Cloudfront,
            }
        );
        assert_eq!(
            SourceProfile::resolve(SourceKind::FirewallLog, None, None),
            Err(TableError::MissingRequiredInput("scope"))
        );
        assert!(matches!(
            SourceProfile::resolve(SourceKind::FlowLog, Some("legacy"), None),
            Err(TableError::UnknownSourceKind(_))
        ));
        assert!(matches!(
            SourceProfile::resolve(SourceKind::AccessLog, Some("minute"), None),
            Err(TableError::UnknownSourceKind(_))
        ));
    }

    #[test]
    fn cloudfront_scope_never_uses_the_deployment_region() {
        for variant in FirewallVariant::ALL {
            let profile = SourceProfile::FirewallLog {
                variant,
                scope: FirewallScope::Cloudfront,
            };
            let token = profile.region_token(Some("eu-west-1"));
            assert!(matches!(token, Some("cloudfront") | Some("global")), "{}", profile);
        }

        let regional = SourceProfile::FirewallLog {
            variant: FirewallVariant::Daily,
            scope: FirewallScope::Regional,
        };
        assert_eq!(regional.region_token(Some("eu-west-1")), Some("eu-west-1"));
    }

    #[test]
    fn layouts_are_internally_consistent() {
        for profile in SourceProfile::all() {
            let layout = profile.layout();
            let names: Vec<_> = layout.partitions.iter().map(|p| p.name).collect();
            let unique: BTreeSet<_> = names.iter().collect();
            assert_eq!(unique.len(), names.len(), "{}", profile);

            if layout.projected {
                assert!(layout.partitions.iter().all(|p| p.rule.is_some()), "{}", profile);
            } else {
                assert!(layout.partitions.iter().all(|p| p.rule.is_none()), "{}", profile);
                assert_eq!(layout.start_date, StartDatePolicy::Unused);
            }

            let dated = layout
                .partitions
                .iter()
                .filter_map(|p| p.rule)
                .any(|r| r.needs_start_date());
            assert_eq!(dated, layout.start_date != StartDatePolicy::Unused, "{}", profile);
        }
    }

    #[test]
    fn region_is_a_column_or_a_key_never_both() {
        let projected = SourceProfile::FlowLog(FlowLogVariant::Projected).layout();
        assert!(projected.extra_columns.iter().any(|(n, _)| *n == "region"));
        assert!(projected.partitions.iter().all(|p| p.name != "region"));
        assert!(projected.convention.root.contains(&PathSegment::Region));

        let regional = SourceProfile::FlowLog(FlowLogVariant::Regional).layout();
        assert!(regional.extra_columns.is_empty());
        assert_eq!(regional.partitions[0].name, "region");
    }

    #[test]
    fn display_names() {
        assert_eq!(SourceProfile::EdgeLog.to_string(), "edge-log");
        assert_eq!(
            SourceProfile::FlowLog(FlowLogVariant::Regional).to_string(),
            "flow-log/regional"
        );
        assert_eq!(
            SourceProfile::FirewallLog {
                variant: FirewallVariant::Minute,
                scope: FirewallScope::Cloudfront
            }
            .to_string(),
            "firewall-log/minute (CLOUDFRONT)"
        );
        assert_eq!(SourceProfile::all().len(), 11);
        assert_eq!(
            SourceProfile::variant_names(SourceKind::FirewallLog),
            ["minute", "daily", "hourly"]
        );
    }
}
