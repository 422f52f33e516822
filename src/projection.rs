//! Partition projection: per-key rules and the engine parameters they expand to.
//!
//! A profile declares a [`RuleTemplate`] per partition key; combined with the
//! projection start date and the resolved region token this yields concrete
//! [`ProjectionRule`]s. Nothing here reads the clock: open-ended ranges are
//! written as `NOW` and resolved by the engine at query time.

use crate::error::{Result, TableError};

use chrono::{NaiveDate, NaiveTime};
use regex::Regex;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::LazyLock;

/// Far-future upper bound used by conventions that cap projected partitions.
pub const SENTINEL_YEAR: &str = "2200";

/// Accepts `YYYY/MM/DD` and the `YYYY-MM-DD` spelling.
static START_DATE_PATTERN: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"^(\d{4})([/-])(\d{2})([/-])(\d{2})$").ok());

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct ProjectionStartDate(NaiveDate);

impl ProjectionStartDate {
    pub fn parse(input: &str) -> Result<Self> {
        let invalid = || TableError::InvalidStartDate(input.to_string());
        let caps = START_DATE_PATTERN
            .as_ref()
            .and_then(|re| re.captures(input.trim()))
            .ok_or_else(invalid)?;

        if caps[2] != caps[4] {
            return Err(invalid());
        }
        let year: i32 = caps[1].parse().map_err(|_| invalid())?;
        let month: u32 = caps[3].parse().map_err(|_| invalid())?;
        let day: u32 = caps[5].parse().map_err(|_| invalid())?;

        NaiveDate::from_ymd_opt(year, month, day)
            .map(Self)
            .ok_or_else(invalid)
    }

    pub fn year(&self) -> String {
        self.0.format("%Y").to_string()
    }

    /// Render midnight of the start day in the given partition date format.
    pub fn render(&self, format: DateFormat) -> String {
        self.0
            .and_time(NaiveTime::MIN)
            .format(format.strftime())
            .to_string()
    }
}

impl fmt::Display for ProjectionStartDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render(DateFormat::Day))
    }
}

/// Granularity of a `date` partition value as it appears in the object path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateFormat {
    Day,
    Minute,
}

impl DateFormat {
    /// Pattern in the engine's (Java) date syntax.
    pub fn pattern(self) -> &'static str {
        match self {
            DateFormat::Day => "yyyy/MM/dd",
            DateFormat::Minute => "yyyy/MM/dd/HH/mm",
        }
    }

    fn strftime(self) -> &'static str {
        match self {
            DateFormat::Day => "%Y/%m/%d",
            DateFormat::Minute => "%Y/%m/%d/%H/%M",
        }
    }

    pub fn interval_unit(self) -> &'static str {
        match self {
            DateFormat::Day => "DAYS",
            DateFormat::Minute => "MINUTES",
        }
    }
}

/// Upper bound of a projected range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RangeEnd {
    /// Artificial cap at [`SENTINEL_YEAR`].
    Sentinel,
    /// Unbounded; resolved by the engine when the query runs.
    Now,
}

impl RangeEnd {
    pub fn as_str(self) -> &'static str {
        match self {
            RangeEnd::Sentinel => SENTINEL_YEAR,
            RangeEnd::Now => "NOW",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CalendarField {
    Month,
    Day,
    Hour,
    Minute,
}

impl CalendarField {
    pub fn range(self) -> (&'static str, &'static str) {
        match self {
            CalendarField::Month => ("01", "12"),
            CalendarField::Day => ("01", "31"),
            CalendarField::Hour => ("00", "23"),
            CalendarField::Minute => ("00", "59"),
        }
    }
}

/// Per-profile rule shape for one partition key, before inputs are applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleTemplate {
    Date { format: DateFormat, end: RangeEnd },
    Year { end: RangeEnd },
    /// `padded` emits a two-digit `digits` hint for zero-padded path segments.
    Calendar { field: CalendarField, padded: bool },
    /// Single enum value: the resolved region token.
    RegionToken,
    Injected,
}

impl RuleTemplate {
    pub fn needs_start_date(self) -> bool {
        matches!(self, RuleTemplate::Date { .. } | RuleTemplate::Year { .. })
    }
}

/// A partition key declaration together with its projection rule template.
///
/// Keys of tables that discover partitions by scanning carry no rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PartitionSpec {
    pub name: &'static str,
    pub data_type: &'static str,
    pub rule: Option<RuleTemplate>,
}

/// Concrete projection rule for one partition key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ProjectionRule {
    #[serde(rename_all = "camelCase")]
    Date {
        range_start: String,
        range_end: String,
        format: String,
        interval: u32,
        interval_unit: String,
    },
    #[serde(rename_all = "camelCase")]
    Integer {
        range_start: String,
        range_end: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        digits: Option<u8>,
    },
    Enum { values: Vec<String> },
    Injected,
}

impl ProjectionRule {
    pub fn type_name(&self) -> &'static str {
        match self {
            ProjectionRule::Date { .. } => "date",
            ProjectionRule::Integer { .. } => "integer",
            ProjectionRule::Enum { .. } => "enum",
            ProjectionRule::Injected => "injected",
        }
    }

    /// `projection.<key>.*` parameters in the engine's literal syntax.
    pub fn parameters(&self, key: &str) -> Vec<(String, String)> {
        let param = |suffix: &str, value: String| (format!("projection.{}.{}", key, suffix), value);

        let mut out = vec![param("type", self.type_name().to_string())];
        match self {
            ProjectionRule::Date {
                range_start,
                range_end,
                format,
                interval,
                interval_unit,
            } => {
                out.push(param("range", format!("{},{}", range_start, range_end)));
                out.push(param("format", format.clone()));
                out.push(param("interval", interval.to_string()));
                out.push(param("interval.unit", interval_unit.clone()));
            }
            ProjectionRule::Integer {
                range_start,
                range_end,
                digits,
            } => {
                out.push(param("range", format!("{},{}", range_start, range_end)));
                if let Some(digits) = digits {
                    out.push(param("digits", digits.to_string()));
                }
            }
            ProjectionRule::Enum { values } => {
                out.push(param("values", values.join(",")));
            }
            ProjectionRule::Injected => {}
        }
        out
    }
}

/// Resolved projection rules keyed by partition key name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProjectionConfig {
    pub rules: BTreeMap<String, ProjectionRule>,
}

impl ProjectionConfig {
    /// Table parameters that switch projection on and describe every key.
    pub fn parameters(&self, location_template: &str) -> BTreeMap<String, String> {
        let mut params = BTreeMap::new();
        params.insert("projection.enabled".to_string(), "true".to_string());
        for (key, rule) in &self.rules {
            params.extend(rule.parameters(key));
        }
        params.insert(
            "storage.location.template".to_string(),
            location_template.to_string(),
        );
        params
    }
}

/// How the engine finds partitions of a table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PartitionDiscovery {
    /// Partitions are computed from projection rules.
    Projection(ProjectionConfig),
    /// Partitions are registered by re-scanning the location (`MSCK REPAIR TABLE`).
    Scan,
}

impl PartitionDiscovery {
    pub fn projection(&self) -> Option<&ProjectionConfig> {
        match self {
            PartitionDiscovery::Projection(config) => Some(config),
            PartitionDiscovery::Scan => None,
        }
    }

    /// Scan mode contributes no parameters: the catalog's partition list is authoritative.
    pub fn parameters(&self, location_template: Option<&str>) -> BTreeMap<String, String> {
        match (self, location_template) {
            (PartitionDiscovery::Projection(config), Some(template)) => config.parameters(template),
            _ => BTreeMap::new(),
        }
    }
}

/// Resolve every partition key's rule template against the inputs.
///
/// Keys without a template are skipped; the assembler reports them.
pub fn build_projection(
    partitions: &[PartitionSpec],
    start_date: Option<ProjectionStartDate>,
    region_token: Option<&str>,
) -> Result<ProjectionConfig> {
    let mut rules = BTreeMap::new();

    for spec in partitions {
        let Some(template) = spec.rule else {
            continue;
        };
        let rule = match template {
            RuleTemplate::Date { format, end } => {
                let start = start_date.ok_or(TableError::MissingRequiredInput("projectionStartDate"))?;
                ProjectionRule::Date {
                    range_start: start.render(format),
                    range_end: end.as_str().to_string(),
                    format: format.pattern().to_string(),
                    interval: 1,
                    interval_unit: format.interval_unit().to_string(),
                }
            }
            RuleTemplate::Year { end } => {
                let start = start_date.ok_or(TableError::MissingRequiredInput("projectionStartDate"))?;
                ProjectionRule::Integer {
                    range_start: start.year(),
                    range_end: end.as_str().to_string(),
                    digits: None,
                }
            }
            RuleTemplate::Calendar { field, padded } => {
                let (lo, hi) = field.range();
                ProjectionRule::Integer {
                    range_start: lo.to_string(),
                    range_end: hi.to_string(),
                    digits: padded.then_some(2),
                }
            }
            RuleTemplate::RegionToken => {
                let token = region_token
                    .filter(|t| !t.is_empty())
                    .ok_or(TableError::MissingRequiredInput("region"))?;
                ProjectionRule::Enum {
                    values: vec![token.to_string()],
                }
            }
            RuleTemplate::Injected => ProjectionRule::Injected,
        };
        rules.insert(spec.name.to_string(), rule);
    }

    Ok(ProjectionConfig { rules })
}
