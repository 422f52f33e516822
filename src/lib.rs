//! Athena/Glue table descriptors for partitioned AWS log data.
//!
//! A caller supplies a [`TableRequest`] plus the account/region
//! [`Environment`]; [`build_descriptor`] returns the finished
//! [`TableDescriptor`] or the first validation failure.

pub mod descriptor;
pub mod error;
pub mod location;
pub mod profile;
pub mod projection;
pub mod registry;
pub mod request;
pub mod schema;

pub use descriptor::TableDescriptor;
pub use descriptor::catalog::CatalogTable;
pub use error::{Invariant, Result, TableError};
pub use profile::{FirewallScope, FirewallVariant, FlowLogVariant, SourceProfile};
pub use registry::{RowFormat, SourceKind};
pub use request::{Environment, TableRequest};

/// Validate a request and assemble its table descriptor.
pub fn build_descriptor(request: &TableRequest, env: &Environment) -> Result<TableDescriptor> {
    let validated = request.validate_and_build(env)?;
    TableDescriptor::assemble(&validated)
}
