//! PostgreSQL document index.
//!
//! All statements run on a connection borrowed from a bounded `sqlx` pool for
//! the duration of one operation. The connection goes back to the pool when
//! it is dropped, which covers success, error, and timeout paths alike.

use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;
use frag_types::{Digest, DocumentId, Timestamp};
use sqlx::migrate::Migrator;
use sqlx::postgres::{PgPool, PgPoolOptions};
use tracing::{debug, info};

use crate::config::{redact_dsn, PgConfig};
use crate::error::{IndexError, IndexResult};
use crate::record::{DocumentRecord, DocumentUpsert, UpsertOutcome};
use crate::traits::DocumentIndex;

static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

/// Single-statement upsert. `created` is only written by the INSERT arm;
/// `xmax = 0` holds exactly when the row was freshly inserted.
const UPSERT_SQL: &str = "\
    INSERT INTO documents (id, mime, created, updated, fragments, full_hash) \
    VALUES ($1, $2, $3, $3, $4, $5) \
    ON CONFLICT (id) DO UPDATE SET \
        mime = EXCLUDED.mime, \
        updated = EXCLUDED.updated, \
        fragments = EXCLUDED.fragments, \
        full_hash = EXCLUDED.full_hash \
    RETURNING (xmax = 0) AS inserted";

const FETCH_SQL: &str = "\
    SELECT id, mime, created, updated, fragments, full_hash \
    FROM documents WHERE id = $1";

/// Document index over a PostgreSQL `documents` table.
#[derive(Clone, Debug)]
pub struct PgDocumentIndex {
    pool: PgPool,
    statement_timeout: Duration,
}

impl PgDocumentIndex {
    /// Open a pool and verify connectivity.
    pub async fn connect(config: &PgConfig) -> IndexResult<Self> {
        config.validate()?;
        let pool = Self::pool_options(config).connect(&config.dsn).await?;
        info!(
            dsn = %redact_dsn(&config.dsn),
            max_connections = config.max_connections,
            "connected to PostgreSQL"
        );
        Ok(Self::from_pool(pool, config.statement_timeout()))
    }

    /// Build a pool that opens connections on first use.
    pub fn connect_lazy(config: &PgConfig) -> IndexResult<Self> {
        config.validate()?;
        let pool = Self::pool_options(config).connect_lazy(&config.dsn)?;
        Ok(Self::from_pool(pool, config.statement_timeout()))
    }

    pub fn from_pool(pool: PgPool, statement_timeout: Duration) -> Self {
        Self {
            pool,
            statement_timeout,
        }
    }

    fn pool_options(config: &PgConfig) -> PgPoolOptions {
        PgPoolOptions::new()
            .min_connections(config.min_connections)
            .max_connections(config.max_connections)
            .acquire_timeout(config.acquire_timeout())
    }

    /// Apply the embedded schema migrations.
    pub async fn migrate(&self) -> IndexResult<()> {
        MIGRATOR.run(&self.pool).await?;
        info!("document index migrations applied");
        Ok(())
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Close the pool, waiting for borrowed connections to come back.
    pub async fn close(&self) {
        self.pool.close().await;
    }

    async fn timed<T, F>(&self, op: &'static str, fut: F) -> IndexResult<T>
    where
        F: Future<Output = IndexResult<T>> + Send,
    {
        tokio::time::timeout(self.statement_timeout, fut)
            .await
            .map_err(|_| IndexError::Timeout {
                op,
                after: self.statement_timeout,
            })?
    }
}

#[async_trait]
impl DocumentIndex for PgDocumentIndex {
    async fn upsert(&self, doc: &DocumentUpsert) -> IndexResult<UpsertOutcome> {
        let fragments: Vec<String> = doc.fragments.iter().map(Digest::to_hex).collect();
        let full_hash = doc.full_digest.to_hex();

        let inserted = self
            .timed("upsert", async {
                let mut conn = self.pool.acquire().await?;
                let inserted: bool = sqlx::query_scalar(UPSERT_SQL)
                    .bind(doc.id.as_str())
                    .bind(&doc.mime)
                    .bind(doc.timestamp.as_secs())
                    .bind(&fragments)
                    .bind(&full_hash)
                    .fetch_one(&mut *conn)
                    .await?;
                Ok::<_, IndexError>(inserted)
            })
            .await?;

        let outcome = if inserted {
            UpsertOutcome::Created
        } else {
            UpsertOutcome::Updated
        };
        debug!(doc_id = %doc.id, %outcome, fragments = fragments.len(), "document row upserted");
        Ok(outcome)
    }

    async fn fetch(&self, id: &DocumentId) -> IndexResult<Option<DocumentRecord>> {
        let row = self
            .timed("fetch", async {
                let mut conn = self.pool.acquire().await?;
                let row = sqlx::query_as::<_, DocumentRow>(FETCH_SQL)
                    .bind(id.as_str())
                    .fetch_optional(&mut *conn)
                    .await?;
                Ok::<_, IndexError>(row)
            })
            .await?;
        row.map(DocumentRow::into_record).transpose()
    }

    async fn ping(&self) -> IndexResult<()> {
        self.timed("ping", async {
            sqlx::query("SELECT 1").execute(&self.pool).await?;
            Ok::<_, IndexError>(())
        })
        .await
    }
}

/// Internal row type for SQLx mapping.
#[derive(Debug, sqlx::FromRow)]
struct DocumentRow {
    id: String,
    mime: String,
    created: i64,
    updated: i64,
    fragments: Vec<String>,
    full_hash: String,
}

impl DocumentRow {
    fn into_record(self) -> IndexResult<DocumentRecord> {
        let id = DocumentId::new(self.id.clone())
            .map_err(|e| IndexError::corrupt(&self.id, e.to_string()))?;
        let fragments = self
            .fragments
            .iter()
            .enumerate()
            .map(|(i, h)| {
                Digest::from_hex(h)
                    .map_err(|e| IndexError::corrupt(&self.id, format!("fragment {i}: {e}")))
            })
            .collect::<IndexResult<Vec<_>>>()?;
        let full_digest = Digest::from_hex(&self.full_hash)
            .map_err(|e| IndexError::corrupt(&self.id, format!("full_hash: {e}")))?;
        Ok(DocumentRecord {
            id,
            mime: self.mime,
            created: Timestamp::from_secs(self.created),
            updated: Timestamp::from_secs(self.updated),
            fragments,
            full_digest,
        })
    }
}
