//! `tasking-server` binary entrypoint.
//!
//! Serves one in-memory demonstration product until Ctrl-C.

#![forbid(unsafe_code)]

use std::num::NonZeroU32;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use serde_json::json;
use tasking_core::models::{ProductMetadata, Provider, ProviderRole};
use tasking_core::JsonSchemaModel;
use tasking_server::network::TlsConfig;
use tasking_server::observability::{init_logging, LogFormat};
use tasking_server::{
    InMemoryBackend, NetworkConfig, NetworkModule, Product, ProductRegistry, ServerConfig,
};
use tracing::info;
use url::Url;

#[derive(Debug, Parser)]
#[command(name = "tasking-server", version, about = "Tasking API server")]
struct Args {
    /// Bind address.
    #[arg(long, env = "TASKING_HOST", default_value = "0.0.0.0")]
    host: String,

    /// Listen port. 0 picks a free port.
    #[arg(long, env = "TASKING_PORT", default_value_t = 8080)]
    port: u16,

    /// Public base URL used in every link href. Derived from the Host header when unset.
    #[arg(long, env = "TASKING_PUBLIC_URL")]
    public_url: Option<Url>,

    /// Largest page size a search may request.
    #[arg(long, env = "TASKING_MAX_LIMIT")]
    max_limit: Option<NonZeroU32>,

    /// Log output format.
    #[arg(long, env = "TASKING_LOG_FORMAT", value_enum, default_value_t = LogFormat::Pretty)]
    log_format: LogFormat,

    /// Allowed CORS origins, comma separated.
    #[arg(long, env = "TASKING_CORS_ORIGINS", value_delimiter = ',', default_value = "*")]
    cors_origins: Vec<String>,

    /// Per-request timeout in seconds.
    #[arg(long, env = "TASKING_REQUEST_TIMEOUT_SECS", default_value_t = 30)]
    request_timeout_secs: u64,

    /// PEM certificate chain; enables TLS together with `--tls-key`.
    #[arg(long, env = "TASKING_TLS_CERT", requires = "tls_key")]
    tls_cert: Option<PathBuf>,

    /// PEM private key.
    #[arg(long, env = "TASKING_TLS_KEY", requires = "tls_cert")]
    tls_key: Option<PathBuf>,
}

fn demo_product(backend: Arc<InMemoryBackend>) -> Result<Product> {
    let metadata = ProductMetadata {
        title: Some("Test Spotlight Product".to_string()),
        description: Some("Test product for test spotlight".to_string()),
        license: Some("CC-BY-4.0".to_string()),
        keywords: vec!["test".to_string(), "satellite".to_string()],
        providers: vec![Provider {
            name: "Test Provider".to_string(),
            description: Some("A provider for Test data".to_string()),
            roles: vec![ProviderRole::Producer],
            url: "https://test-provider.example.com".to_string(),
        }],
    };

    let constraints = JsonSchemaModel::new(json!({
        "type": "object",
        "properties": {"off_nadir": {"type": "integer"}},
        "required": ["off_nadir"],
    }))?;
    let opportunity_properties = JsonSchemaModel::new(json!({
        "type": "object",
        "properties": {
            "off_nadir": {"type": "object"},
            "vehicle_id": {"type": "array"},
            "platform": {"type": "string"},
        },
        "required": ["off_nadir", "vehicle_id", "platform"],
    }))?;
    let order_parameters = JsonSchemaModel::new(json!({
        "type": "object",
        "properties": {"s3_path": {"type": ["string", "null"], "pattern": "^s3://"}},
        "additionalProperties": false,
    }))?;

    Ok(Product::new("test-spotlight", backend)
        .with_metadata(metadata)
        .with_constraints(constraints)
        .with_opportunity_properties(opportunity_properties)
        .with_order_parameters(order_parameters))
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.log_format);

    let tls = match (args.tls_cert, args.tls_key) {
        (Some(cert_path), Some(key_path)) => Some(TlsConfig {
            cert_path,
            key_path,
        }),
        _ => None,
    };
    let network = NetworkConfig {
        host: args.host,
        port: args.port,
        tls,
        cors_origins: args.cors_origins,
        request_timeout: Duration::from_secs(args.request_timeout_secs),
        ..NetworkConfig::default()
    };
    let server = ServerConfig {
        public_base_url: args.public_url,
        max_limit: args.max_limit,
        ..ServerConfig::default()
    };

    let backend = Arc::new(InMemoryBackend::seeded());
    let mut products = ProductRegistry::new();
    products
        .register(demo_product(Arc::clone(&backend)).context("building demo product")?)
        .context("registering demo product")?;
    info!(products = products.len(), "product registry built");

    let mut module = NetworkModule::new(network, products, backend, server);
    let port = module.start().await?;
    info!(port, "tasking server listening");

    module
        .serve(async {
            if let Err(err) = tokio::signal::ctrl_c().await {
                tracing::error!(error = %err, "failed to listen for Ctrl-C; serving until killed");
                std::future::pending::<()>().await;
            }
        })
        .await
}
