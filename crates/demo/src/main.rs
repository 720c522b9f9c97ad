//! envschema demo - resolves a sample server configuration from the environment

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use envschema::{
    boolean, int, object, string, BooleanMode, EnvFiles, ProcessEnv, RawSchema, Resolver, Schema,
    DEFAULT_ENV_NAME_VAR,
};
use serde::Deserialize;
use std::env;
use std::path::PathBuf;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Resolve the sample server schema and print the result
#[derive(Debug, Parser)]
#[command(name = "envschema-demo", version)]
struct Cli {
    /// Directory containing `.env` and `.env.<name>`
    #[arg(long, default_value = ".")]
    dir: PathBuf,

    /// Variable naming the environment-specific override file
    #[arg(long, default_value = DEFAULT_ENV_NAME_VAR)]
    env_name_var: String,

    /// Skip `.env` file loading
    #[arg(long)]
    no_dotenv: bool,

    /// Only accept true/false style words for boolean variables
    #[arg(long)]
    strict_booleans: bool,

    /// List the variables the schema reads and exit
    #[arg(long)]
    list_vars: bool,

    #[arg(long, value_enum, default_value_t = OutputFormat::Json)]
    format: OutputFormat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Json,
    Yaml,
}

#[derive(Debug, Deserialize)]
struct ServerSettings {
    port: u16,
    host: String,
    tls: Option<bool>,
}

#[derive(Debug, Deserialize)]
struct Settings {
    env: String,
    server: ServerSettings,
}

fn sample_schema() -> RawSchema {
    RawSchema::new()
        .field("env", string("NODE_ENV").description("Running environment"))
        .field(
            "server",
            object()
                .description("Server info")
                .property(
                    "port",
                    int("SERVER_PORT")
                        .description("Server port")
                        .validator(|port, _| (1..=65535).contains(port)),
                )
                .property("host", string("SERVER_HOST").description("Server host"))
                .property(
                    "tls",
                    boolean("SERVER_TLS")
                        .optional()
                        .description("Serve over TLS"),
                ),
        )
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    init_logging()?;

    info!("Starting envschema demo v{}", env!("CARGO_PKG_VERSION"));

    if !cli.no_dotenv {
        let loaded = EnvFiles::new(&cli.dir)
            .env_name_var(&cli.env_name_var)
            .load()
            .context("Failed to load .env files")?;
        if loaded.is_empty() {
            info!("No .env files found in {}", cli.dir.display());
        }
        for path in &loaded {
            info!("Loaded environment variables from {}", path.display());
        }
    }

    let schema = Schema::normalize(sample_schema());

    if cli.list_vars {
        print!("{}", render_env_vars(&schema));
        return Ok(());
    }

    let mode = if cli.strict_booleans {
        BooleanMode::Strict
    } else {
        BooleanMode::Truthy
    };
    let config = Resolver::new(&schema)
        .boolean_mode(mode)
        .resolve(&ProcessEnv)
        .context("Invalid configuration")?;

    let settings: Settings = config
        .deserialize_into()
        .context("Configuration does not fit the server settings")?;
    info!(
        env = %settings.env,
        host = %settings.server.host,
        port = settings.server.port,
        tls = settings.server.tls.unwrap_or(false),
        "Configuration loaded"
    );

    let rendered = match cli.format {
        OutputFormat::Json => {
            serde_json::to_string_pretty(&config).context("Failed to render configuration")?
        }
        OutputFormat::Yaml => {
            serde_yaml::to_string(&config).context("Failed to render configuration")?
        }
    };
    println!("{}", rendered);

    Ok(())
}

fn render_env_vars(schema: &Schema) -> String {
    let mut out = String::new();
    for doc in schema.env_vars() {
        out.push_str(&format!(
            "{:<14} {:<12} {:<8} {:<9} {}\n",
            doc.path,
            doc.env_var,
            doc.kind,
            if doc.required { "required" } else { "optional" },
            doc.description.as_deref().unwrap_or("")
        ));
    }
    out
}

/// Initialize logging based on environment variables
fn init_logging() -> Result<()> {
    let log_level = env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());
    let log_format = env::var("LOG_FORMAT").unwrap_or_else(|_| "json".to_string());

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&log_level));

    let registry = tracing_subscriber::registry().with(env_filter);

    // stdout carries the rendered configuration
    match log_format.as_str() {
        "pretty" => {
            registry
                .with(tracing_subscriber::fmt::layer().pretty().with_writer(std::io::stderr))
                .try_init()
                .context("Failed to initialize pretty logging")?;
        }
        _ => {
            registry
                .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
                .try_init()
                .context("Failed to initialize JSON logging")?;
        }
    }

    if log_level == "trace" || log_level == "debug" {
        warn!("Debug/trace logging enabled - resolved element names are logged");
    }

    Ok(())
}
