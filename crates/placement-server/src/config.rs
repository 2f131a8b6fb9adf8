use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::Context;

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 8000;
const DEFAULT_DB_PATH: &str = "placement.db";

/// Process configuration, read from `PLACEMENT_*` environment variables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub db_path: PathBuf,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let host = lookup("PLACEMENT_HOST").unwrap_or_else(|| DEFAULT_HOST.into());
        let port = match lookup("PLACEMENT_PORT") {
            Some(raw) => raw
                .parse()
                .with_context(|| format!("PLACEMENT_PORT is not a valid port: {:?}", raw))?,
            None => DEFAULT_PORT,
        };
        let db_path = lookup("PLACEMENT_DB_PATH")
            .unwrap_or_else(|| DEFAULT_DB_PATH.into())
            .into();
        Ok(Self { host, port, db_path })
    }

    pub fn addr(&self) -> anyhow::Result<SocketAddr> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .with_context(|| format!("invalid listen address {}:{}", self.host, self.port))
    }
}
