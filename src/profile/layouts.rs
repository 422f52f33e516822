//! Static layout per profile variant.

use super::{ProfileLayout, StartDatePolicy};
use crate::location::{KeyStyle, PathConvention, PathSegment};
use crate::projection::{CalendarField, DateFormat, PartitionSpec, RangeEnd, RuleTemplate};
use crate::registry::flow_log;

/// Lower bound historically hard-wired into the minute-granularity firewall table.
const FIREWALL_START_DATE: &str = "2025/01/01";

const fn key(name: &'static str, data_type: &'static str, rule: RuleTemplate) -> PartitionSpec {
    PartitionSpec {
        name,
        data_type,
        rule: Some(rule),
    }
}

const fn scanned(name: &'static str) -> PartitionSpec {
    PartitionSpec {
        name,
        data_type: "string",
        rule: None,
    }
}

const fn calendar(name: &'static str, field: CalendarField, padded: bool) -> PartitionSpec {
    key(name, "string", RuleTemplate::Calendar { field, padded })
}

const fn bare(root: &'static [PathSegment]) -> PathConvention {
    PathConvention {
        root,
        key_style: KeyStyle::Bare,
        trailing_slash: true,
    }
}

pub(super) static ACCESS_LOG: ProfileLayout = ProfileLayout {
    description: Some("Table for querying ALB access logs"),
    convention: bare(&[
        PathSegment::Literal("AWSLogs"),
        PathSegment::AccountId,
        PathSegment::Literal("elasticloadbalancing"),
        PathSegment::Region,
    ]),
    partitions: &[key(
        "day",
        "string",
        RuleTemplate::Date {
            format: DateFormat::Day,
            end: RangeEnd::Sentinel,
        },
    )],
    projected: true,
    extra_columns: &[],
    table_parameters: &[("EXTERNAL", "TRUE"), ("has_encrypted_data", "false")],
    start_date: StartDatePolicy::Required,
    storage_flags: Some((false, false)),
};

pub(super) static EDGE_LOG: ProfileLayout = ProfileLayout {
    description: Some("Table for partitioned, Parquet-formatted CloudFront logs"),
    convention: PathConvention {
        root: &[],
        key_style: KeyStyle::Hive,
        trailing_slash: true,
    },
    partitions: &[
        key(
            "year",
            "integer",
            RuleTemplate::Year {
                end: RangeEnd::Sentinel,
            },
        ),
        key(
            "month",
            "integer",
            RuleTemplate::Calendar {
                field: CalendarField::Month,
                padded: false,
            },
        ),
        key(
            "day",
            "integer",
            RuleTemplate::Calendar {
                field: CalendarField::Day,
                padded: false,
            },
        ),
    ],
    projected: true,
    extra_columns: &[],
    table_parameters: &[],
    start_date: StartDatePolicy::Required,
    storage_flags: None,
};

const FLOW_LOG_HEADER: &[(&str, &str)] = &[("skip.header.line.count", "1")];

pub(super) static FLOW_LOG_DISCOVERY: ProfileLayout = ProfileLayout {
    description: Some("Table for querying VPC Flow Logs (requires MSCK REPAIR)"),
    convention: bare(&[PathSegment::Literal("AWSLogs")]),
    partitions: &[scanned("year"), scanned("month"), scanned("day")],
    projected: false,
    extra_columns: &[],
    table_parameters: FLOW_LOG_HEADER,
    start_date: StartDatePolicy::Unused,
    storage_flags: None,
};

pub(super) static FLOW_LOG_PROJECTED: ProfileLayout = ProfileLayout {
    description: Some("Table for querying VPC Flow Logs (partition projection)"),
    convention: bare(&[
        PathSegment::Literal("AWSLogs"),
        PathSegment::AccountId,
        PathSegment::Literal("vpcflowlogs"),
        PathSegment::Region,
    ]),
    partitions: &[
        key("year", "string", RuleTemplate::Year { end: RangeEnd::Now }),
        calendar("month", CalendarField::Month, true),
        calendar("day", CalendarField::Day, true),
    ],
    projected: true,
    extra_columns: &[flow_log::REGION_COLUMN],
    table_parameters: FLOW_LOG_HEADER,
    start_date: StartDatePolicy::Required,
    storage_flags: None,
};

pub(super) static FLOW_LOG_REGIONAL: ProfileLayout = ProfileLayout {
    description: Some("Table for querying VPC Flow Logs across regions (partition projection)"),
    convention: bare(&[
        PathSegment::Literal("AWSLogs"),
        PathSegment::AccountId,
        PathSegment::Literal("vpcflowlogs"),
    ]),
    partitions: &[
        key("region", "string", RuleTemplate::RegionToken),
        key("year", "string", RuleTemplate::Year { end: RangeEnd::Now }),
        calendar("month", CalendarField::Month, true),
        calendar("day", CalendarField::Day, true),
    ],
    projected: true,
    extra_columns: &[],
    table_parameters: FLOW_LOG_HEADER,
    start_date: StartDatePolicy::Required,
    storage_flags: None,
};

const WAF_ACL_ROOT: &[PathSegment] = &[
    PathSegment::Literal("AWSLogs"),
    PathSegment::AccountId,
    PathSegment::Literal("WAFLogs"),
    PathSegment::RegionToken,
    PathSegment::WebAcl,
];

pub(super) static FIREWALL_MINUTE: ProfileLayout = ProfileLayout {
    description: None,
    convention: PathConvention {
        root: WAF_ACL_ROOT,
        key_style: KeyStyle::Bare,
        trailing_slash: false,
    },
    partitions: &[key(
        "log_time",
        "string",
        RuleTemplate::Date {
            format: DateFormat::Minute,
            end: RangeEnd::Now,
        },
    )],
    projected: true,
    extra_columns: &[],
    table_parameters: &[],
    start_date: StartDatePolicy::Defaulted(FIREWALL_START_DATE),
    storage_flags: None,
};

pub(super) static FIREWALL_DAILY: ProfileLayout = ProfileLayout {
    description: None,
    convention: bare(WAF_ACL_ROOT),
    partitions: &[key(
        "day",
        "string",
        RuleTemplate::Date {
            format: DateFormat::Day,
            end: RangeEnd::Now,
        },
    )],
    projected: true,
    extra_columns: &[],
    table_parameters: &[],
    start_date: StartDatePolicy::Defaulted(FIREWALL_START_DATE),
    storage_flags: None,
};

pub(super) static FIREWALL_HOURLY: ProfileLayout = ProfileLayout {
    description: None,
    convention: bare(&[
        PathSegment::Literal("AWSLogs"),
        PathSegment::AccountId,
        PathSegment::Literal("WAFLogs"),
    ]),
    partitions: &[
        key("region", "string", RuleTemplate::RegionToken),
        key("web_acl", "string", RuleTemplate::Injected),
        key("year", "string", RuleTemplate::Year { end: RangeEnd::Now }),
        calendar("month", CalendarField::Month, true),
        calendar("day", CalendarField::Day, true),
        calendar("hour", CalendarField::Hour, true),
    ],
    projected: true,
    extra_columns: &[],
    table_parameters: &[],
    start_date: StartDatePolicy::Defaulted(FIREWALL_START_DATE),
    storage_flags: None,
};
