use crate::models::allow_list::AllowList;
use anyhow::{Context, Result};
use clap::Parser;
use std::{env, fmt};

const DEFAULT_ENDPOINT: &str = "minio.minio-system.svc.cluster.local";
const DEFAULT_STORE_PORT: u16 = 9000;
const DEFAULT_REGION: &str = "us-east-1";
const DEFAULT_PUBLIC_BUCKETS: &str = "material-didactico,papeleria-fotos-productos";
const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 3000;

/// Centralized application configuration.
/// Combines environment variables and CLI arguments.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub public_buckets: AllowList,
    pub store: StoreConfig,
}

/// Connection parameters for the upstream object store.
#[derive(Clone)]
pub struct StoreConfig {
    pub endpoint: String,
    pub port: u16,
    pub use_ssl: bool,
    pub access_key: Option<String>,
    pub secret_key: Option<String>,
    pub region: String,
}

impl StoreConfig {
    pub fn endpoint_url(&self) -> String {
        let scheme = if self.use_ssl { "https" } else { "http" };
        format!("{}://{}:{}", scheme, self.endpoint, self.port)
    }
}

impl fmt::Debug for StoreConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StoreConfig")
            .field("endpoint", &self.endpoint)
            .field("port", &self.port)
            .field("use_ssl", &self.use_ssl)
            .field("access_key", &self.access_key)
            .field("secret_key", &self.secret_key.as_ref().map(|_| "<redacted>"))
            .field("region", &self.region)
            .finish()
    }
}

/// Command-line + environment configuration.
#[derive(Parser, Debug, Default)]
#[command(author, version, about = "Read-only HTTP gateway for allow-listed object-store buckets")]
pub struct Args {
    /// Host to bind to (overrides HOST)
    #[arg(long)]
    pub host: Option<String>,

    /// Port to listen on (overrides PORT)
    #[arg(long)]
    pub port: Option<u16>,

    /// Object store host name (overrides MINIO_ENDPOINT)
    #[arg(long)]
    pub endpoint: Option<String>,

    /// Object store port (overrides MINIO_PORT)
    #[arg(long)]
    pub store_port: Option<u16>,

    /// Talk to the object store over TLS (overrides MINIO_USE_SSL)
    #[arg(long)]
    pub use_ssl: bool,

    /// Signing region (overrides MINIO_REGION)
    #[arg(long)]
    pub region: Option<String>,

    /// Comma-separated bucket allow-list (overrides PUBLIC_BUCKETS)
    #[arg(long)]
    pub public_buckets: Option<String>,
}

impl AppConfig {
    /// Parse environment variables + CLI args into AppConfig.
    pub fn from_env_and_args() -> Result<Self> {
        let args = Args::parse();
        Self::resolve(args, |key| env::var(key).ok())
    }

    /// Merge CLI args over values produced by `lookup`, falling back to defaults.
    pub fn resolve<F>(args: Args, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        // --- Environment fallback ---
        let env_host = lookup("HOST").unwrap_or_else(|| DEFAULT_HOST.into());
        let env_port = parse_port(&lookup, "PORT", DEFAULT_PORT)?;
        let env_endpoint = lookup("MINIO_ENDPOINT").unwrap_or_else(|| DEFAULT_ENDPOINT.into());
        let env_store_port = parse_port(&lookup, "MINIO_PORT", DEFAULT_STORE_PORT)?;
        let env_use_ssl = lookup("MINIO_USE_SSL").is_some_and(|v| v == "true");
        let env_region = lookup("MINIO_REGION").unwrap_or_else(|| DEFAULT_REGION.into());
        let env_buckets =
            lookup("PUBLIC_BUCKETS").unwrap_or_else(|| DEFAULT_PUBLIC_BUCKETS.into());

        // --- Merge ---
        let cfg = Self {
            host: args.host.unwrap_or(env_host),
            port: args.port.unwrap_or(env_port),
            public_buckets: AllowList::parse(&args.public_buckets.unwrap_or(env_buckets)),
            store: StoreConfig {
                endpoint: args.endpoint.unwrap_or(env_endpoint),
                port: args.store_port.unwrap_or(env_store_port),
                use_ssl: args.use_ssl || env_use_ssl,
                access_key: lookup("MINIO_ACCESS_KEY"),
                secret_key: lookup("MINIO_SECRET_KEY"),
                region: args.region.unwrap_or(env_region),
            },
        };

        Ok(cfg)
    }

    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn parse_port<F>(lookup: &F, key: &str, default: u16) -> Result<u16>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        Some(value) => value
            .trim()
            .parse::<u16>()
            .with_context(|| format!("parsing {} value `{}`", key, value)),
        None => Ok(default),
    }
}
