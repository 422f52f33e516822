//! Table Descriptor Assembler.
//!
//! Composes registry columns and SerDe, the storage location and the
//! projection rules into one `TableDescriptor`, validating cross-field
//! invariants before anything is handed back. Assembly is all-or-nothing.

pub mod catalog;

use crate::error::{Invariant, Result};
use crate::location::{LocationContext, build_location, placeholders};
use crate::profile::SourceProfile;
use crate::projection::{PartitionDiscovery, ProjectionRule, build_projection};
use crate::registry::{self, RowFormat, SerdeSpec, SourceKind};
use crate::request::ValidatedRequest;
use crate::schema::{Column, PartitionKey};

use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use tracing::debug;

/// The finished, immutable table definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TableDescriptor {
    name: String,
    database_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<String>,
    source: SourceKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    variant: Option<&'static str>,
    columns: Vec<Column>,
    partition_keys: Vec<PartitionKey>,
    location: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    location_template: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    projection: Option<BTreeMap<String, ProjectionRule>>,
    serde: SerdeSpec,
    format: RowFormat,
    parameters: BTreeMap<String, String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    compressed: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    stored_as_sub_directories: Option<bool>,
}

impl TableDescriptor {
    /// Assemble a descriptor for a validated request.
    pub fn assemble(request: &ValidatedRequest) -> Result<Self> {
        let profile = request.profile;
        let kind = profile.kind();
        let layout = profile.layout();

        let columns = columns_for(profile)?;
        let serde = registry::serde(kind, request.format)?;

        let partition_keys: Vec<PartitionKey> = layout
            .partitions
            .iter()
            .map(|spec| PartitionKey::new(spec.name, spec.data_type))
            .collect();
        let key_names: Vec<&str> = layout.partitions.iter().map(|spec| spec.name).collect();

        let region_token = profile.region_token(request.region.as_deref());
        let ctx = LocationContext {
            account_id: request.account_id.as_deref(),
            region: request.region.as_deref(),
            region_token,
            web_acl: request.web_acl_name.as_deref(),
        };
        let location = build_location(
            &request.bucket_name,
            request.log_prefix.as_deref(),
            &layout.convention,
            layout.projected.then_some(key_names.as_slice()),
            &ctx,
        )?;

        let discovery = if layout.projected {
            PartitionDiscovery::Projection(build_projection(
                layout.partitions,
                request.start_date,
                region_token,
            )?)
        } else {
            PartitionDiscovery::Scan
        };

        let mut parameters: BTreeMap<String, String> = layout
            .table_parameters
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        parameters.extend(discovery.parameters(location.template.as_deref()));

        let parts = DescriptorParts {
            name: request.table_name.clone(),
            database_name: request.database_name.clone(),
            columns,
            partition_keys,
            location: location.base,
            location_template: location.template,
            projection: discovery.projection().map(|config| config.rules.clone()),
        };
        parts.validate()?;

        let description = request
            .description
            .clone()
            .or_else(|| layout.description.map(str::to_string));
        let (compressed, stored_as_sub_directories) = match layout.storage_flags {
            Some((compressed, sub_dirs)) => (Some(compressed), Some(sub_dirs)),
            None => (None, None),
        };

        debug!(
            profile = %profile,
            table = %parts.name,
            columns = parts.columns.len(),
            partition_keys = parts.partition_keys.len(),
            "assembled table descriptor"
        );

        Ok(TableDescriptor {
            name: parts.name,
            database_name: parts.database_name,
            description,
            source: kind,
            variant: profile.variant_name(),
            columns: parts.columns,
            partition_keys: parts.partition_keys,
            location: parts.location,
            location_template: parts.location_template,
            projection: parts.projection,
            serde,
            format: request.format,
            parameters,
            compressed,
            stored_as_sub_directories,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn database_name(&self) -> &str {
        &self.database_name
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn source(&self) -> SourceKind {
        self.source
    }

    pub fn variant(&self) -> Option<&'static str> {
        self.variant
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn partition_keys(&self) -> &[PartitionKey] {
        &self.partition_keys
    }

    pub fn location(&self) -> &str {
        &self.location
    }

    pub fn location_template(&self) -> Option<&str> {
        self.location_template.as_deref()
    }

    pub fn projection(&self) -> Option<&BTreeMap<String, ProjectionRule>> {
        self.projection.as_ref()
    }

    pub fn serde(&self) -> &SerdeSpec {
        &self.serde
    }

    pub fn format(&self) -> RowFormat {
        self.format
    }

    /// Table parameters, including every `projection.*` entry.
    pub fn parameters(&self) -> &BTreeMap<String, String> {
        &self.parameters
    }

    pub fn parameter(&self, key: &str) -> Option<&str> {
        self.parameters.get(key).map(String::as_str)
    }

    pub fn compressed(&self) -> Option<bool> {
        self.compressed
    }

    pub fn stored_as_sub_directories(&self) -> Option<bool> {
        self.stored_as_sub_directories
    }
}

/// The schema-bearing fields the invariants are checked on.
#[derive(Debug, Clone)]
pub(crate) struct DescriptorParts {
    pub name: String,
    pub database_name: String,
    pub columns: Vec<Column>,
    pub partition_keys: Vec<PartitionKey>,
    pub location: String,
    pub location_template: Option<String>,
    pub projection: Option<BTreeMap<String, ProjectionRule>>,
}

impl DescriptorParts {
    pub(crate) fn validate(&self) -> std::result::Result<(), Invariant> {
        if self.name.trim().is_empty() {
            return Err(Invariant::EmptyField("tableName"));
        }
        if self.database_name.trim().is_empty() {
            return Err(Invariant::EmptyField("databaseName"));
        }
        if self.location.is_empty() {
            return Err(Invariant::EmptyField("location"));
        }

        let mut column_names = BTreeSet::new();
        for column in &self.columns {
            if !column_names.insert(column.name.as_str()) {
                return Err(Invariant::DuplicateColumn(column.name.clone()));
            }
        }

        let mut key_names = BTreeSet::new();
        for key in &self.partition_keys {
            if !key_names.insert(key.name.as_str()) {
                return Err(Invariant::DuplicatePartitionKey(key.name.clone()));
            }
            if column_names.contains(key.name.as_str()) {
                return Err(Invariant::PartitionColumnOverlap(key.name.clone()));
            }
        }

        if let Some(name) = placeholders(&self.location).into_iter().next() {
            return Err(Invariant::PlaceholderInLocation(name));
        }

        let Some(rules) = &self.projection else {
            if self.location_template.is_some() {
                return Err(Invariant::TemplateWithoutProjection);
            }
            return Ok(());
        };

        for key in &self.partition_keys {
            if !rules.contains_key(&key.name) {
                return Err(Invariant::MissingProjectionRule(key.name.clone()));
            }
        }
        if let Some(stray) = rules.keys().find(|k| !key_names.contains(k.as_str())) {
            return Err(Invariant::UnexpectedProjectionRule(stray.clone()));
        }

        let mut found = BTreeSet::new();
        for name in self.location_template.as_deref().map(placeholders).unwrap_or_default() {
            if found.contains(&name) {
                return Err(Invariant::DuplicatePlaceholder(name));
            }
            found.insert(name);
        }
        let expected: BTreeSet<String> = key_names.iter().map(|k| k.to_string()).collect();
        if found != expected {
            return Err(Invariant::PlaceholderMismatch {
                missing: expected.difference(&found).cloned().collect(),
                unexpected: found.difference(&expected).cloned().collect(),
            });
        }

        Ok(())
    }
}

/// Ordered data columns of a profile: the source's registry table plus any
/// columns the profile appends.
pub fn columns_for(profile: SourceProfile) -> Result<Vec<Column>> {
    let mut columns = registry::columns(profile.kind())?;
    columns.extend(registry::parse_columns(profile.layout().extra_columns)?);
    Ok(columns)
}
