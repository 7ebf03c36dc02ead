use std::path::PathBuf;

use clap::{Parser, Subcommand};
use serde_json::{json, Value};

use tenant_edge::backend::BackendClient;
use tenant_edge::config::{load_config, EdgeConfig};
use tenant_edge::routing::{EdgeRouter, RequestFacts, TenantId};

#[derive(Parser)]
#[command(name = "edge-cli")]
#[command(about = "Inspect tenant routing decisions and query the backend as a tenant", long_about = None)]
struct Cli {
    /// Configuration file; built-in defaults when omitted.
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the routing decision for a host and path
    Decide {
        #[arg(long)]
        host: Option<String>,
        #[arg(long)]
        path: String,
        /// Tenant query parameter value
        #[arg(long)]
        query_tenant: Option<String>,
        /// Tenant cookie value
        #[arg(long)]
        cookie_tenant: Option<String>,
    },
    /// Validate a configuration file
    CheckConfig,
    /// GET a backend API path on behalf of a tenant
    BackendGet {
        #[arg(long)]
        tenant: Option<String>,
        #[arg(long)]
        path: String,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let config = match &cli.config {
        Some(path) => load_config(path)?,
        None => EdgeConfig::default(),
    };

    match cli.command {
        Commands::Decide { host, path, query_tenant, cookie_tenant } => {
            let facts = RequestFacts::new(host.as_deref(), path)
                .with_query_tenant(query_tenant.as_deref())
                .with_cookie_tenant(cookie_tenant.as_deref());
            let decided = EdgeRouter::from_config(&config).decide(&facts);
            print_json(&serde_json::to_value(&decided)?)?;
        }
        Commands::CheckConfig => {
            print_json(&json!({
                "valid": true,
                "root_domain": config.tenancy.root_domain,
                "protected_prefix": config.paths.protected_prefix,
            }))?;
        }
        Commands::BackendGet { tenant, path } => {
            let tenant = match tenant.as_deref() {
                Some(raw) => Some(TenantId::parse(raw).ok_or_else(|| format!("invalid tenant '{raw}'"))?),
                None => None,
            };
            let client = BackendClient::from_config(&config)?;
            let body: Value = client.get_json(&path, tenant.as_ref()).await?;
            print_json(&body)?;
        }
    }

    Ok(())
}

fn print_json(value: &Value) -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
