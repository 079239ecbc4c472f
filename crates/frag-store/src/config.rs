use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{StoreError, StoreResult};

/// Connection settings for an S3-compatible chunk bucket.
#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct S3Config {
    /// Endpoint URL, e.g. `https://<account>.r2.cloudflarestorage.com` or
    /// `http://localhost:9000`.
    pub endpoint: String,
    pub access_key: String,
    pub secret_key: String,
    pub bucket: String,
    pub region: String,
    /// Permit plain-HTTP endpoints (local MinIO and friends).
    pub allow_http: bool,
    /// Upper bound on any single probe, put, or get.
    pub timeout_secs: u64,
}

impl S3Config {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Check the settings required to talk to a bucket.
    pub fn validate(&self) -> StoreResult<()> {
        if self.endpoint.trim().is_empty() {
            return Err(StoreError::Config("S3 endpoint is not set".into()));
        }
        if self.bucket.trim().is_empty() {
            return Err(StoreError::Config("S3 bucket is not set".into()));
        }
        if self.timeout_secs == 0 {
            return Err(StoreError::Config("S3 timeout must be positive".into()));
        }
        Ok(())
    }
}

impl Default for S3Config {
    fn default() -> Self {
        Self {
            endpoint: String::new(),
            access_key: String::new(),
            secret_key: String::new(),
            bucket: String::new(),
            region: "auto".into(),
            allow_http: true,
            timeout_secs: 30,
        }
    }
}

impl std::fmt::Debug for S3Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("S3Config")
            .field("endpoint", &self.endpoint)
            .field("access_key", &self.access_key)
            .field("secret_key", &"<redacted>")
            .field("bucket", &self.bucket)
            .field("region", &self.region)
            .field("allow_http", &self.allow_http)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filled() -> S3Config {
        S3Config {
            endpoint: "http://localhost:9000".into(),
            access_key: "minio".into(),
            secret_key: "minio-secret".into(),
            bucket: "chunks".into(),
            ..S3Config::default()
        }
    }

    #[test]
    fn defaults() {
        let c = S3Config::default();
        assert_eq!(c.region, "auto");
        assert!(c.allow_http);
        assert_eq!(c.timeout(), Duration::from_secs(30));
    }

    #[test]
    fn validate_requires_endpoint_and_bucket() {
        assert!(filled().validate().is_ok());
        let mut c = filled();
        c.bucket.clear();
        assert!(matches!(c.validate(), Err(StoreError::Config(_))));
        let mut c = filled();
        c.endpoint = "  ".into();
        assert!(c.validate().is_err());
        let mut c = filled();
        c.timeout_secs = 0;
        assert!(c.validate().is_err());
    }

    #[test]
    fn debug_redacts_secret() {
        let debug = format!("{:?}", filled());
        assert!(debug.contains("<redacted>"));
        assert!(!debug.contains("minio-secret"));
    }

    #[test]
    fn partial_toml_fills_defaults() {
        let c: S3Config = toml::from_str("bucket = \"b\"\nendpoint = \"http://x\"").unwrap();
        assert_eq!(c.bucket, "b");
        assert_eq!(c.region, "auto");
        assert_eq!(c.timeout_secs, 30);
    }
}
