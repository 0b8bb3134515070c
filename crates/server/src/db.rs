//! PostgreSQL page storage.
//!
//! Pages live in `pages`, one row per slug. Every write copies the current
//! row into `page_versions` before overwriting it, inside the same
//! transaction, so a failed batch leaves no partial history behind.

use deadpool_postgres::{Manager, ManagerConfig, Pool, RecyclingMethod};
use pagewright_core::{
    ContentNode, ContentTree, DocumentType, KeywordSpec, PageFilter, PageStatus, PageStore, PagewrightError, Result,
    SavedVersion, SeoMeta, StoredPage,
};
use std::collections::BTreeMap;
use std::future::Future;
use time::OffsetDateTime;
use tokio_postgres::types::Json;
use tokio_postgres::{NoTls, Row, Transaction};
use uuid::Uuid;

const SCHEMA: &str = include_str!("schema.sql");

const PAGE_COLUMNS: &str = "page_slug, page_type, content, seo_meta, status, version";

/// Storage operations the HTTP layer needs beyond [`PageStore`].
pub trait Backend: PageStore + 'static {
    /// Keywords to score against, highest priority first.
    fn active_keywords(&self) -> impl Future<Output = Result<KeywordSpec>> + Send;

    fn ping(&self) -> impl Future<Output = Result<()>> + Send;

    fn last_modified(&self, slug: &str) -> impl Future<Output = Result<Option<OffsetDateTime>>> + Send;
}

#[derive(Clone)]
pub struct PgStore {
    pool: Pool,
}

fn storage<E: std::fmt::Display>(err: E) -> PagewrightError {
    PagewrightError::Storage(err.to_string())
}

impl PgStore {
    pub fn connect(database_url: &str, pool_size: usize) -> Result<Self> {
        let pg_config: tokio_postgres::Config = database_url
            .parse()
            .map_err(|e| PagewrightError::ConfigError(format!("invalid DATABASE_URL: {e}")))?;
        let manager =
            Manager::from_config(pg_config, NoTls, ManagerConfig { recycling_method: RecyclingMethod::Fast });
        let pool = Pool::builder(manager).max_size(pool_size).build().map_err(storage)?;
        Ok(Self { pool })
    }

    /// Creates missing tables. Safe to run on every start.
    pub async fn migrate(&self) -> Result<()> {
        let client = self.pool.get().await.map_err(storage)?;
        client.batch_execute(SCHEMA).await.map_err(storage)
    }
}

fn page_from_row(row: &Row) -> Result<StoredPage> {
    let slug: String = row.try_get("page_slug").map_err(storage)?;
    let page_type: String = row.try_get("page_type").map_err(storage)?;
    let Json(nodes): Json<BTreeMap<String, ContentNode>> = row.try_get("content").map_err(storage)?;
    let Json(seo_meta): Json<SeoMeta> = row.try_get("seo_meta").map_err(storage)?;
    let status: String = row.try_get("status").map_err(storage)?;
    let version: i32 = row.try_get("version").map_err(storage)?;

    let mut tree = ContentTree::new(slug, page_type.parse::<DocumentType>().unwrap_or_default());
    tree.seo_meta = seo_meta;
    for node in nodes.into_values() {
        tree.insert_node(node);
    }

    Ok(StoredPage { tree, status: status.parse().unwrap_or_default(), version: version.max(0) as u32 })
}

/// Escapes LIKE wildcards so search text matches literally.
fn like_pattern(search: &str) -> String {
    let mut escaped = String::with_capacity(search.len() + 2);
    escaped.push('%');
    for c in search.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped.push('%');
    escaped
}

async fn write_page(tx: &Transaction<'_>, tree: &ContentTree, status: PageStatus) -> Result<SavedVersion> {
    let existing = tx
        .query_opt("SELECT id, version FROM pages WHERE page_slug = $1 FOR UPDATE", &[&tree.slug])
        .await
        .map_err(storage)?;

    let version = match existing {
        Some(row) => {
            let id: Uuid = row.try_get("id").map_err(storage)?;
            let current: i32 = row.try_get("version").map_err(storage)?;
            tx.execute(
                "INSERT INTO page_versions (id, page_id, version, page_type, content, seo_meta, status) \
                 SELECT $1, id, version, page_type, content, seo_meta, status FROM pages WHERE id = $2",
                &[&Uuid::new_v4(), &id],
            )
            .await
            .map_err(storage)?;

            let next = current + 1;
            tx.execute(
                "UPDATE pages SET page_type = $1, content = $2, seo_meta = $3, status = $4, version = $5, \
                 updated_at = now() WHERE id = $6",
                &[
                    &tree.document_type.as_str(),
                    &Json(&tree.nodes),
                    &Json(&tree.seo_meta),
                    &status.as_str(),
                    &next,
                    &id,
                ],
            )
            .await
            .map_err(storage)?;
            next
        }
        None => {
            tx.execute(
                "INSERT INTO pages (id, page_slug, page_type, content, seo_meta, status, version) \
                 VALUES ($1, $2, $3, $4, $5, $6, 1)",
                &[
                    &Uuid::new_v4(),
                    &tree.slug,
                    &tree.document_type.as_str(),
                    &Json(&tree.nodes),
                    &Json(&tree.seo_meta),
                    &status.as_str(),
                ],
            )
            .await
            .map_err(storage)?;
            1
        }
    };

    Ok(SavedVersion { slug: tree.slug.clone(), version: version as u32 })
}

impl PageStore for PgStore {
    fn load(&self, slug: &str) -> impl Future<Output = Result<Option<StoredPage>>> + Send {
        async move {
            let client = self.pool.get().await.map_err(storage)?;
            let row = client
                .query_opt(&format!("SELECT {PAGE_COLUMNS} FROM pages WHERE page_slug = $1"), &[&slug])
                .await
                .map_err(storage)?;
            row.as_ref().map(page_from_row).transpose()
        }
    }

    fn save(&self, tree: &ContentTree, status: PageStatus) -> impl Future<Output = Result<SavedVersion>> + Send {
        async move {
            let mut client = self.pool.get().await.map_err(storage)?;
            let tx = client.transaction().await.map_err(storage)?;
            let saved = write_page(&tx, tree, status).await?;
            tx.commit().await.map_err(storage)?;
            tracing::debug!(slug = %saved.slug, version = saved.version, "page saved");
            Ok(saved)
        }
    }

    fn list(&self, filter: &PageFilter) -> impl Future<Output = Result<Vec<StoredPage>>> + Send {
        async move {
            let document_type = filter.document_type.map(|t| t.as_str());
            let status = filter.status.map(|s| s.as_str());
            let search = filter.search.as_deref().map(str::trim).filter(|s| !s.is_empty()).map(like_pattern);

            let client = self.pool.get().await.map_err(storage)?;
            let rows = client
                .query(
                    &format!(
                        "SELECT {PAGE_COLUMNS} FROM pages \
                         WHERE ($1::text IS NULL OR page_type = $1) \
                           AND ($2::text IS NULL OR status = $2) \
                           AND ($3::text IS NULL OR page_slug ILIKE $3 OR seo_meta->>'title' ILIKE $3) \
                         ORDER BY updated_at DESC"
                    ),
                    &[&document_type, &status, &search],
                )
                .await
                .map_err(storage)?;
            rows.iter().map(page_from_row).collect()
        }
    }

    fn save_batch(
        &self, pages: &[(ContentTree, PageStatus)],
    ) -> impl Future<Output = Result<Vec<SavedVersion>>> + Send {
        async move {
            let mut client = self.pool.get().await.map_err(storage)?;
            let tx = client.transaction().await.map_err(storage)?;
            let mut saved = Vec::with_capacity(pages.len());
            for (tree, status) in pages {
                saved.push(write_page(&tx, tree, *status).await?);
            }
            tx.commit().await.map_err(storage)?;
            tracing::debug!(pages = saved.len(), "batch committed");
            Ok(saved)
        }
    }
}

impl Backend for PgStore {
    fn active_keywords(&self) -> impl Future<Output = Result<KeywordSpec>> + Send {
        async move {
            let client = self.pool.get().await.map_err(storage)?;
            let rows = client
                .query("SELECT keyword FROM seo_keywords ORDER BY priority DESC, keyword", &[])
                .await
                .map_err(storage)?;
            rows.iter().map(|row| row.try_get::<_, String>("keyword").map_err(storage)).collect()
        }
    }

    fn ping(&self) -> impl Future<Output = Result<()>> + Send {
        async move {
            let client = self.pool.get().await.map_err(storage)?;
            client.simple_query("SELECT 1").await.map_err(storage)?;
            Ok(())
        }
    }

    fn last_modified(&self, slug: &str) -> impl Future<Output = Result<Option<OffsetDateTime>>> + Send {
        async move {
            let client = self.pool.get().await.map_err(storage)?;
            let row = client
                .query_opt("SELECT updated_at FROM pages WHERE page_slug = $1", &[&slug])
                .await
                .map_err(storage)?;
            row.map(|r| r.try_get("updated_at").map_err(storage)).transpose()
        }
    }
}
