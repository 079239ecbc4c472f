use std::future::Future;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use frag_types::ChunkKey;
use object_store::aws::AmazonS3Builder;
use object_store::local::LocalFileSystem;
use object_store::memory::InMemory;
use object_store::path::Path as ObjectPath;
use object_store::{ObjectStore, PutPayload};
use tracing::debug;

use crate::config::S3Config;
use crate::error::{StoreError, StoreOp, StoreResult};
use crate::traits::ChunkStore;

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Chunk store over any [`object_store::ObjectStore`] backend.
///
/// Probes map to `HEAD`, puts to a whole-object `PUT`, and gets to `GET`.
/// Every call is bounded by `timeout`; an elapsed timeout is reported as
/// [`StoreError::Timeout`] and the in-flight request is dropped.
pub struct ObjectChunkStore {
    inner: Arc<dyn ObjectStore>,
    timeout: Duration,
    label: String,
}

impl ObjectChunkStore {
    /// Wrap an already-constructed backend.
    pub fn new(inner: Arc<dyn ObjectStore>, label: impl Into<String>) -> Self {
        Self {
            inner,
            timeout: DEFAULT_TIMEOUT,
            label: label.into(),
        }
    }

    /// Connect to an S3-compatible bucket.
    pub fn s3(config: &S3Config) -> StoreResult<Self> {
        config.validate()?;
        let s3 = AmazonS3Builder::new()
            .with_endpoint(&config.endpoint)
            .with_access_key_id(&config.access_key)
            .with_secret_access_key(&config.secret_key)
            .with_bucket_name(&config.bucket)
            .with_region(&config.region)
            .with_allow_http(config.allow_http)
            .build()
            .map_err(|e| StoreError::Config(e.to_string()))?;
        Ok(Self::new(Arc::new(s3), format!("s3://{}", config.bucket)).with_timeout(config.timeout()))
    }

    /// Store chunks as files under `root`, creating it if needed.
    pub fn local(root: impl AsRef<Path>) -> StoreResult<Self> {
        let root = root.as_ref();
        std::fs::create_dir_all(root)
            .map_err(|e| StoreError::Config(format!("{}: {e}", root.display())))?;
        let fs = LocalFileSystem::new_with_prefix(root)
            .map_err(|e| StoreError::Config(e.to_string()))?;
        Ok(Self::new(Arc::new(fs), format!("file://{}", root.display())))
    }

    /// Volatile store backed by `object_store`'s in-memory implementation.
    pub fn in_memory() -> Self {
        Self::new(Arc::new(InMemory::new()), "memory")
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Human-readable backend location, for logs.
    pub fn label(&self) -> &str {
        &self.label
    }

    fn path(key: &ChunkKey) -> ObjectPath {
        ObjectPath::from(key.as_str())
    }

    /// Run one backend call under the timeout and classify its failure.
    async fn call<T, F>(&self, op: StoreOp, key: &ChunkKey, fut: F) -> StoreResult<T>
    where
        F: Future<Output = object_store::Result<T>> + Send,
    {
        match tokio::time::timeout(self.timeout, fut).await {
            Ok(Ok(value)) => Ok(value),
            Ok(Err(object_store::Error::NotFound { .. })) => Err(StoreError::NotFound(key.clone())),
            Ok(Err(e)) => Err(StoreError::Backend {
                op,
                key: key.clone(),
                message: e.to_string(),
            }),
            Err(_) => Err(StoreError::Timeout {
                op,
                key: key.clone(),
                after: self.timeout,
            }),
        }
    }
}

#[async_trait]
impl ChunkStore for ObjectChunkStore {
    async fn exists(&self, key: &ChunkKey) -> StoreResult<bool> {
        let path = Self::path(key);
        match self.call(StoreOp::Exists, key, self.inner.head(&path)).await {
            Ok(meta) => {
                debug!(%key, size = meta.size, "chunk present");
                Ok(true)
            }
            Err(StoreError::NotFound(_)) => Ok(false),
            Err(e) => Err(e),
        }
    }

    async fn put(&self, key: &ChunkKey, data: Bytes) -> StoreResult<()> {
        let path = Self::path(key);
        let len = data.len();
        self.call(StoreOp::Put, key, self.inner.put(&path, PutPayload::from(data)))
            .await?;
        debug!(%key, len, backend = %self.label, "chunk written");
        Ok(())
    }

    async fn get(&self, key: &ChunkKey) -> StoreResult<Bytes> {
        let path = Self::path(key);
        let inner = &self.inner;
        self.call(StoreOp::Get, key, async move {
            inner.get(&path).await?.bytes().await
        })
        .await
    }
}

impl std::fmt::Debug for ObjectChunkStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ObjectChunkStore")
            .field("backend", &self.label)
            .field("timeout", &self.timeout)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use frag_crypto::ContentHasher;

    fn key_for(content: &[u8]) -> ChunkKey {
        ChunkKey::for_digest(&ContentHasher::digest(content))
    }

    #[tokio::test]
    async fn in_memory_backend_roundtrip() {
        let store = ObjectChunkStore::in_memory();
        let key = key_for(b"chunk");
        assert!(!store.exists(&key).await.unwrap());
        store.put(&key, Bytes::from_static(b"chunk")).await.unwrap();
        assert!(store.exists(&key).await.unwrap());
        assert_eq!(store.get(&key).await.unwrap(), Bytes::from_static(b"chunk"));
    }

    #[tokio::test]
    async fn missing_chunk_is_not_found() {
        let store = ObjectChunkStore::in_memory();
        let err = store.get(&key_for(b"nope")).await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn local_backend_uses_sharded_layout() {
        let dir = tempfile::tempdir().unwrap();
        let store = ObjectChunkStore::local(dir.path()).unwrap();
        let key = key_for(b"on disk");
        store.put(&key, Bytes::from_static(b"on disk")).await.unwrap();

        let hex = key.digest().to_hex();
        let file = dir
            .path()
            .join("chunks")
            .join(&hex[0..2])
            .join(&hex[2..4])
            .join(&hex);
        assert_eq!(std::fs::read(file).unwrap(), b"on disk");
        assert_eq!(store.get(&key).await.unwrap(), Bytes::from_static(b"on disk"));
    }

    #[tokio::test]
    async fn local_overwrite_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let store = ObjectChunkStore::local(dir.path()).unwrap();
        let key = key_for(b"twice");
        store.put(&key, Bytes::from_static(b"twice")).await.unwrap();
        store.put(&key, Bytes::from_static(b"twice")).await.unwrap();
        assert_eq!(store.get(&key).await.unwrap(), Bytes::from_static(b"twice"));
    }

    #[test]
    fn s3_rejects_incomplete_config() {
        let err = ObjectChunkStore::s3(&S3Config::default()).unwrap_err();
        assert!(matches!(err, StoreError::Config(_)));
    }

    #[test]
    fn s3_builds_from_config() {
        let config = S3Config {
            endpoint: "http://127.0.0.1:9000".into(),
            access_key: "k".into(),
            secret_key: "s".into(),
            bucket: "frag".into(),
            timeout_secs: 3,
            ..S3Config::default()
        };
        let store = ObjectChunkStore::s3(&config).unwrap();
        assert_eq!(store.label(), "s3://frag");
        assert_eq!(store.timeout(), Duration::from_secs(3));
    }

    #[test]
    fn with_timeout_overrides_default() {
        let store = ObjectChunkStore::in_memory().with_timeout(Duration::from_millis(5));
        assert_eq!(store.timeout(), Duration::from_millis(5));
        assert!(format!("{store:?}").contains("memory"));
    }
}
