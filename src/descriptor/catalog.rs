//! Catalog table-input rendering.
//!
//! The provisioning side decorates a finished descriptor with the ids only it
//! knows and hands the catalog this PascalCase shape. Schema fields are copied,
//! never changed.

use super::TableDescriptor;

use serde::Serialize;
use std::collections::BTreeMap;

const EXTERNAL_TABLE: &str = "EXTERNAL_TABLE";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct CatalogTable {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub catalog_id: Option<String>,
    pub database_name: String,
    pub table_input: TableInput,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct TableInput {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub table_type: &'static str,
    pub parameters: BTreeMap<String, String>,
    pub partition_keys: Vec<CatalogColumn>,
    pub storage_descriptor: StorageDescriptor,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct CatalogColumn {
    pub name: String,
    #[serde(rename = "Type")]
    pub data_type: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct StorageDescriptor {
    pub columns: Vec<CatalogColumn>,
    pub location: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub input_format: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_format: Option<String>,
    pub serde_info: SerdeInfo,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub compressed: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stored_as_sub_directories: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct SerdeInfo {
    pub serialization_library: String,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub parameters: BTreeMap<String, String>,
}

impl CatalogTable {
    pub fn new(descriptor: &TableDescriptor, catalog_id: Option<&str>) -> Self {
        let serde = descriptor.serde();

        let columns = descriptor
            .columns()
            .iter()
            .map(|c| CatalogColumn {
                name: c.name.clone(),
                data_type: c.data_type.to_string(),
            })
            .collect();
        let partition_keys = descriptor
            .partition_keys()
            .iter()
            .map(|k| CatalogColumn {
                name: k.name.clone(),
                data_type: k.data_type.clone(),
            })
            .collect();

        CatalogTable {
            catalog_id: catalog_id.map(str::to_string),
            database_name: descriptor.database_name().to_string(),
            table_input: TableInput {
                name: descriptor.name().to_string(),
                description: descriptor.description().map(str::to_string),
                table_type: EXTERNAL_TABLE,
                parameters: descriptor.parameters().clone(),
                partition_keys,
                storage_descriptor: StorageDescriptor {
                    columns,
                    location: descriptor.location().to_string(),
                    input_format: serde.input_format.clone(),
                    output_format: serde.output_format.clone(),
                    serde_info: SerdeInfo {
                        serialization_library: serde.library.clone(),
                        parameters: serde.parameters.clone(),
                    },
                    compressed: descriptor.compressed(),
                    stored_as_sub_directories: descriptor.stored_as_sub_directories(),
                },
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::request::{Environment, TableRequest};
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn firewall_descriptor() -> TableDescriptor {
        let req = TableRequest {
            source: "firewall-log".into(),
            bucket_name: "waf-logs".into(),
            database_name: "security".into(),
            table_name: "waf".into(),
            scope: Some("REGIONAL".into()),
            web_acl_name: Some("api-acl".into()),
            ..Default::default()
        };
        let validated = req
            .validate_and_build(&Environment::new("333333333333", "ap-south-1"))
            .unwrap();
        TableDescriptor::assemble(&validated).unwrap()
    }

    #[test]
    fn renders_pascal_case_table_input() {
        let table = CatalogTable::new(&firewall_descriptor(), Some("333333333333"));
        let value = serde_json::to_value(&table).unwrap();

        assert_eq!(value["CatalogId"], json!("333333333333"));
        assert_eq!(value["DatabaseName"], json!("security"));
        assert_eq!(value["TableInput"]["TableType"], json!("EXTERNAL_TABLE"));
        assert_eq!(
            value["TableInput"]["PartitionKeys"],
            json!([{ "Name": "log_time", "Type": "string" }])
        );

        let storage = &value["TableInput"]["StorageDescriptor"];
        assert_eq!(
            storage["Location"],
            json!("s3://waf-logs/AWSLogs/333333333333/WAFLogs/ap-south-1/api-acl/")
        );
        assert_eq!(
            storage["SerdeInfo"],
            json!({ "SerializationLibrary": "org.openx.data.jsonserde.JsonSerDe" })
        );
        assert!(storage.get("InputFormat").is_none());
        assert!(storage.get("Compressed").is_none());
        assert!(value["TableInput"].get("Description").is_none());
    }

    #[test]
    fn nested_column_types_render_compactly() {
        let table = CatalogTable::new(&firewall_descriptor(), None);
        let columns = &table.table_input.storage_descriptor.columns;
        let headers = columns
            .iter()
            .find(|c| c.name == "httprequest")
            .map(|c| c.data_type.as_str())
            .unwrap_or_default();
        assert!(headers.starts_with("struct<clientip:string,country:string,headers:array<struct<"));
        assert_eq!(table.catalog_id, None);
    }
}
