use std::net::SocketAddr;
use std::path::Path;

use frag_index::PgConfig;
use frag_pipeline::PipelineConfig;
use frag_store::S3Config;
use serde::{Deserialize, Serialize};

use crate::error::{ServerError, ServerResult};

/// Everything `frag serve` needs, loaded from TOML and then overridden by the
/// environment.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind_addr: SocketAddr,
    pub blob: S3Config,
    pub index: PgConfig,
    pub pipeline: PipelineConfig,
    pub limits: Limits,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Limits {
    /// Largest accepted request body, after transport decoding.
    pub max_body_bytes: usize,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            max_body_bytes: 64 * 1024 * 1024,
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 8080)),
            blob: S3Config::default(),
            index: PgConfig::default(),
            pipeline: PipelineConfig::default(),
            limits: Limits::default(),
        }
    }
}

impl ServerConfig {
    /// Parse a TOML document. Missing keys take their defaults.
    pub fn from_toml(text: &str) -> ServerResult<Self> {
        toml::from_str(text).map_err(|e| ServerError::Config(e.to_string()))
    }

    /// Read and parse a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> ServerResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .map_err(|e| ServerError::Config(format!("reading {}: {e}", path.display())))?;
        Self::from_toml(&text)
    }

    /// Load from an optional file, then apply the process environment.
    pub fn load(path: Option<&Path>) -> ServerResult<Self> {
        let mut config = match path {
            Some(p) => Self::from_file(p)?,
            None => Self::default(),
        };
        config.apply_env(|name| std::env::var(name).ok())?;
        Ok(config)
    }

    /// Override fields from environment variables, looked up through `lookup`.
    ///
    /// Recognised: `S3_ENDPOINT`, `S3_KEY`, `S3_SECRET`, `S3_BUCKET`,
    /// `S3_REGION`, `PG_DSN`, `FRAG_BIND`. Empty values are ignored.
    pub fn apply_env<F>(&mut self, lookup: F) -> ServerResult<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|v| !v.is_empty());

        if let Some(v) = get("S3_ENDPOINT") {
            self.blob.endpoint = v;
        }
        if let Some(v) = get("S3_KEY") {
            self.blob.access_key = v;
        }
        if let Some(v) = get("S3_SECRET") {
            self.blob.secret_key = v;
        }
        if let Some(v) = get("S3_BUCKET") {
            self.blob.bucket = v;
        }
        if let Some(v) = get("S3_REGION") {
            self.blob.region = v;
        }
        if let Some(v) = get("PG_DSN") {
            self.index.dsn = v;
        }
        if let Some(v) = get("FRAG_BIND") {
            self.bind_addr = v
                .parse()
                .map_err(|e| ServerError::Config(format!("FRAG_BIND={v}: {e}")))?;
        }
        Ok(())
    }

    /// Check that both backends are configured well enough to connect.
    pub fn validate(&self) -> ServerResult<()> {
        self.blob
            .validate()
            .map_err(|e| ServerError::Config(e.to_string()))?;
        self.index
            .validate()
            .map_err(|e| ServerError::Config(e.to_string()))?;
        if self.limits.max_body_bytes == 0 {
            return Err(ServerError::Config("max_body_bytes must be positive".into()));
        }
        Ok(())
    }
}
