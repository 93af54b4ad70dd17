//! Server configuration
//!
//! Layered lowest to highest: built-in defaults, an optional config file,
//! `RECIPE_APP_*` environment variables, then command-line flags.

use anyhow::{anyhow, Context, Result};
use clap::{Parser, ValueEnum};
use config::{Config, Environment, File};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Duration;

pub const ENV_PREFIX: &str = "RECIPE_APP";

#[derive(Parser, Debug, Default)]
#[command(name = "recipe-server")]
#[command(author, version, about = "Recipe box web server", long_about = None)]
pub struct Cli {
    /// Configuration file (toml, yaml or json)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Port to listen on
    #[arg(short, long)]
    pub port: Option<u16>,

    /// Path of the recipe database file
    #[arg(long)]
    pub db_path: Option<PathBuf>,

    /// Storage backend
    #[arg(long, value_enum)]
    pub store: Option<StoreKind>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum StoreKind {
    /// Embedded single-file database
    Db,
    /// In-memory map, lost on exit
    Memory,
}

impl StoreKind {
    fn as_str(&self) -> &'static str {
        match self {
            StoreKind::Db => "db",
            StoreKind::Memory => "memory",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Text,
    Json,
}

/// Values as they come out of the config sources
#[derive(Debug, Deserialize)]
struct RawConfig {
    port: i64,
    host: String,
    env: String,
    base_url: String,
    store: StoreKind,
    db_path: PathBuf,
    db_timeout: String,
    log_dir: PathBuf,
    log_level: String,
    log_format: LogFormat,
    request_timeout: String,
    allowed_origin: String,
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub port: u16,
    pub host: String,
    pub env: String,
    pub base_url: String,
    pub store: StoreKind,
    pub db_path: PathBuf,
    pub db_timeout: Duration,
    pub log_dir: PathBuf,
    pub log_level: String,
    pub log_format: LogFormat,
    pub request_timeout: Duration,
    pub allowed_origin: String,
}

impl ServerConfig {
    /// Load configuration from the process environment and `cli`
    pub fn load(cli: &Cli) -> Result<Self> {
        Self::build(cli, None)
    }

    /// Load with an explicit environment map instead of the process environment
    fn build(cli: &Cli, env: Option<HashMap<String, String>>) -> Result<Self> {
        let mut builder = Config::builder()
            .set_default("port", 8080i64)?
            .set_default("host", "0.0.0.0")?
            .set_default("env", "development")?
            .set_default("base_url", "http://localhost:8080")?
            .set_default("store", "db")?
            .set_default("db_path", "data/recipes.db")?
            .set_default("db_timeout", "1s")?
            .set_default("log_dir", "logs")?
            .set_default("log_level", "info")?
            .set_default("log_format", "text")?
            .set_default("request_timeout", "15s")?
            .set_default("allowed_origin", "*")?;

        if let Some(path) = &cli.config {
            builder = builder.add_source(File::from(path.as_path()).required(true));
        }

        builder = builder
            .add_source(Environment::with_prefix(ENV_PREFIX).source(env))
            .set_override_option("port", cli.port.map(i64::from))?
            .set_override_option(
                "db_path",
                cli.db_path
                    .as_ref()
                    .map(|p| p.to_string_lossy().into_owned()),
            )?
            .set_override_option("store", cli.store.map(|s| s.as_str()))?;

        let raw: RawConfig = builder
            .build()
            .context("Failed to read configuration sources")?
            .try_deserialize()
            .context("Invalid configuration")?;

        Self::validate(raw)
    }

    fn validate(raw: RawConfig) -> Result<Self> {
        let port = u16::try_from(raw.port)
            .ok()
            .filter(|p| *p >= 1)
            .ok_or_else(|| anyhow!("port must be between 1 and 65535, got {}", raw.port))?;

        let db_timeout = humantime::parse_duration(&raw.db_timeout)
            .with_context(|| format!("invalid db_timeout: {}", raw.db_timeout))?;
        let request_timeout = humantime::parse_duration(&raw.request_timeout)
            .with_context(|| format!("invalid request_timeout: {}", raw.request_timeout))?;

        let log_level = match raw.log_level.to_ascii_lowercase().as_str() {
            level @ ("debug" | "info" | "warn" | "error") => level.to_string(),
            _ => "info".to_string(),
        };

        Ok(Self {
            port,
            host: raw.host,
            env: raw.env,
            base_url: raw.base_url,
            store: raw.store,
            db_path: raw.db_path,
            db_timeout,
            log_dir: raw.log_dir,
            log_level,
            log_format: raw.log_format,
            request_timeout,
            allowed_origin: raw.allowed_origin,
        })
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn is_development(&self) -> bool {
        matches!(self.env.as_str(), "development" | "local")
    }
}
