use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use athena_log_tables::descriptor::columns_for;
use athena_log_tables::{
    CatalogTable, Environment, FirewallScope, SourceKind, SourceProfile, TableRequest,
    build_descriptor,
};

pub type Result<T> = anyhow::Result<T>;

#[derive(Parser)]
#[command(name = "athena-log-tables")]
#[command(about = "Athena table definitions for AWS log buckets", long_about = None)]
struct Cli {
    #[command(subcommand)]
    cmd: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render the catalog table input for a request file.
    Render {
        /// JSON request (source, bucketName, databaseName, tableName, ...).
        #[arg(long)]
        request: String,

        #[arg(long, env = "AWS_ACCOUNT_ID")]
        account_id: Option<String>,

        #[arg(long, env = "AWS_REGION")]
        region: Option<String>,

        /// Catalog owner; defaults to the account id.
        #[arg(long)]
        catalog_id: Option<String>,

        #[arg(short = 'o', long)]
        out: Option<String>,

        #[arg(long)]
        compact: bool,
    },

    /// Print the ordered column schema of a source.
    Schema {
        #[arg(long)]
        source: String,

        #[arg(long)]
        variant: Option<String>,
    },

    /// List source kinds and their variants.
    Sources,
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    let cli = Cli::parse();

    match cli.cmd {
        Commands::Render {
            request,
            account_id,
            region,
            catalog_id,
            out,
            compact,
        } => {
            let raw = std::fs::read_to_string(&request)
                .with_context(|| format!("reading request {}", request))?;
            let table_request: TableRequest = serde_json::from_str(&raw)
                .with_context(|| format!("parsing request {}", request))?;

            let env = Environment { account_id, region };
            let descriptor = build_descriptor(&table_request, &env)
                .with_context(|| format!("building table for {}", request))?;

            let catalog_id = catalog_id.or(env.account_id);
            let table = CatalogTable::new(&descriptor, catalog_id.as_deref());
            let json = if compact {
                serde_json::to_string(&table)?
            } else {
                serde_json::to_string_pretty(&table)?
            };

            match out {
                Some(path) => {
                    std::fs::write(&path, json).with_context(|| format!("writing {}", path))?;
                    println!("Wrote {}", path);
                }
                None => println!("{}", json),
            }
        }
        Commands::Schema { source, variant } => {
            let kind: SourceKind = source.parse()?;
            // Scope only moves the path, never the columns.
            let profile =
                SourceProfile::resolve(kind, variant.as_deref(), Some(FirewallScope::Regional.name()))?;
            for column in columns_for(profile)? {
                println!("{}\t{}", column.name, column.data_type);
            }
        }
        Commands::Sources => {
            for kind in SourceKind::ALL {
                let variants = SourceProfile::variant_names(kind);
                if variants.is_empty() {
                    println!("{}", kind);
                } else {
                    println!("{}\t{}", kind, variants.join(", "));
                }
            }
        }
    }

    Ok(())
}
