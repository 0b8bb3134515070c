//! HTTP routes.
//!
//! Handlers are generic over [`Backend`] so the same router runs against
//! PostgreSQL in production and an in-memory store in tests.

use crate::db::Backend;
use crate::error::{ApiError, ApiResult};
use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, HeaderValue, StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use pagewright_core::{
    BulkEdit, ContentNode, ContentTree, DocumentType, ExtractConfig, PageFilter, PageStatus, SeoMeta, SourceDocument,
    TargetField, commit_edit, extract_batch, patch_with_config, render, score,
};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;
use std::sync::Arc;
use time::{OffsetDateTime, UtcOffset};

pub struct AppState<B> {
    pub store: Arc<B>,
    pub extract: ExtractConfig,
}

impl<B> AppState<B> {
    pub fn new(store: B, extract: ExtractConfig) -> Self {
        Self { store: Arc::new(store), extract }
    }
}

impl<B> Clone for AppState<B> {
    fn clone(&self) -> Self {
        Self { store: Arc::clone(&self.store), extract: self.extract.clone() }
    }
}

pub fn router<B: Backend>(state: AppState<B>) -> Router {
    Router::new()
        .route("/health", get(health::<B>))
        .route("/api/extract/batch", post(extract_sources::<B>))
        .route("/api/pages", get(list_pages::<B>))
        .route("/api/pages/save", post(save_page::<B>))
        .route("/api/pages/{slug}", get(get_page::<B>))
        .route("/api/pages/{slug}/render", get(render_page::<B>))
        .route("/api/pages/{slug}/patch", post(patch_page::<B>))
        .route("/api/bulk-edit/execute", post(bulk_edit::<B>))
        .route("/api/seo/analyze", post(analyze_page::<B>))
        .route("/api/seo/analyze/live", post(analyze_live::<B>))
        .with_state(state)
}

/// Serializes `value` as an object and marks it successful.
fn success<T: Serialize>(value: &T) -> ApiResult<Json<Value>> {
    let mut body = serde_json::to_value(value).map_err(|e| ApiError::Internal(e.to_string()))?;
    if let Value::Object(map) = &mut body {
        map.insert("success".to_string(), Value::Bool(true));
    }
    Ok(Json(body))
}

fn plain_text(markup: String) -> Response {
    ([(header::CONTENT_TYPE, "text/plain; charset=utf-8")], markup).into_response()
}

/// Quoted sha256 of the markup, for `ETag`.
fn etag(markup: &str) -> String {
    format!("\"{:x}\"", Sha256::digest(markup.as_bytes()))
}

/// IMF-fixdate, as used by `Last-Modified`.
fn http_date(at: OffsetDateTime) -> Option<String> {
    let format =
        time::format_description::parse("[weekday repr:short], [day] [month repr:short] [year] [hour]:[minute]:[second] GMT")
            .ok()?;
    at.to_offset(UtcOffset::UTC).format(&format).ok()
}

async fn health<B: Backend>(State(state): State<AppState<B>>) -> Response {
    match state.store.ping().await {
        Ok(()) => Json(json!({ "status": "healthy", "database": "connected" })).into_response(),
        Err(e) => {
            tracing::warn!(error = %e, "health check failed");
            (StatusCode::SERVICE_UNAVAILABLE, Json(json!({ "status": "unhealthy", "database": "disconnected" })))
                .into_response()
        }
    }
}

#[derive(Debug, Deserialize)]
struct BatchRequest {
    #[serde(default)]
    files: Vec<SourceDocument>,
}

async fn extract_sources<B: Backend>(
    State(state): State<AppState<B>>, Json(request): Json<BatchRequest>,
) -> ApiResult<Json<Value>> {
    if request.files.is_empty() {
        return Err(ApiError::BadRequest("No files uploaded".to_string()));
    }
    let report = extract_batch(&request.files, &state.extract);
    tracing::info!(total = report.total_files, extracted = report.successful_extractions, "batch extracted");
    success(&report)
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SavePageRequest {
    #[serde(alias = "pageSlug")]
    slug: String,
    #[serde(default, alias = "pageType")]
    document_type: DocumentType,
    #[serde(default, alias = "nodes")]
    content: BTreeMap<String, ContentNode>,
    #[serde(default)]
    seo_meta: SeoMeta,
    #[serde(default)]
    status: PageStatus,
}

async fn save_page<B: Backend>(
    State(state): State<AppState<B>>, Json(request): Json<SavePageRequest>,
) -> ApiResult<Json<Value>> {
    let slug = request.slug.trim();
    if slug.is_empty() {
        return Err(ApiError::BadRequest("slug is required".to_string()));
    }

    let mut tree = ContentTree::new(slug, request.document_type);
    tree.seo_meta = request.seo_meta;
    for node in request.content.into_values() {
        tree.insert_node(node);
    }

    let saved = state.store.save(&tree, request.status).await?;
    let message = if saved.version == 1 { "Page created successfully" } else { "Page updated successfully" };
    Ok(Json(json!({ "success": true, "message": message, "slug": saved.slug, "version": saved.version })))
}

async fn list_pages<B: Backend>(
    State(state): State<AppState<B>>, Query(filter): Query<PageFilter>,
) -> ApiResult<Json<Value>> {
    let pages = state.store.list(&filter).await?;
    Ok(Json(json!({ "success": true, "total": pages.len(), "pages": pages })))
}

async fn get_page<B: Backend>(State(state): State<AppState<B>>, Path(slug): Path<String>) -> ApiResult<Json<Value>> {
    let page = state.store.load(&slug).await?.ok_or_else(|| ApiError::NotFound("Page not found".to_string()))?;
    Ok(Json(json!({ "success": true, "page": page })))
}

async fn render_page<B: Backend>(
    State(state): State<AppState<B>>, Path(slug): Path<String>, headers: HeaderMap,
) -> ApiResult<Response> {
    let page = state.store.load(&slug).await?.ok_or_else(|| ApiError::NotFound("Page not found".to_string()))?;
    let markup = render(&page.tree);
    let tag = etag(&markup);

    let unchanged = headers
        .get(header::IF_NONE_MATCH)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.split(',').any(|candidate| candidate.trim() == tag));

    let mut response = if unchanged { StatusCode::NOT_MODIFIED.into_response() } else { plain_text(markup) };
    if let Ok(value) = HeaderValue::from_str(&tag) {
        response.headers_mut().insert(header::ETAG, value);
    }
    if let Some(modified) = state.store.last_modified(&slug).await?.and_then(http_date)
        && let Ok(value) = HeaderValue::from_str(&modified)
    {
        response.headers_mut().insert(header::LAST_MODIFIED, value);
    }
    Ok(response)
}

#[derive(Debug, Deserialize)]
struct PatchRequest {
    #[serde(default)]
    original: Option<String>,
}

async fn patch_page<B: Backend>(
    State(state): State<AppState<B>>, Path(slug): Path<String>, Json(request): Json<PatchRequest>,
) -> ApiResult<Response> {
    let page = state.store.load(&slug).await?.ok_or_else(|| ApiError::NotFound("Page not found".to_string()))?;
    let markup = match request.original.as_deref().filter(|s| !s.trim().is_empty()) {
        Some(original) => patch_with_config(original, &page.tree, &state.extract),
        None => render(&page.tree),
    };
    Ok(plain_text(markup))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct BulkEditRequest {
    #[serde(alias = "findText")]
    find: String,
    #[serde(default, alias = "replaceText")]
    replace: String,
    #[serde(default)]
    target_fields: Vec<TargetField>,
    #[serde(default, alias = "pageIds")]
    slugs: Vec<String>,
    #[serde(default)]
    dry_run: bool,
}

async fn bulk_edit<B: Backend>(
    State(state): State<AppState<B>>, Json(request): Json<BulkEditRequest>,
) -> ApiResult<Json<Value>> {
    let edit = BulkEdit::new(request.find, request.replace, request.target_fields).dry_run(request.dry_run);
    let report = commit_edit(state.store.as_ref(), &request.slugs, &edit).await?;
    tracing::info!(dry_run = report.dry_run, affected = report.total_affected, "bulk edit executed");
    success(&report)
}

#[derive(Debug, Deserialize)]
struct AnalyzeRequest {
    #[serde(alias = "pageSlug")]
    slug: String,
}

async fn analyze_page<B: Backend>(
    State(state): State<AppState<B>>, Json(request): Json<AnalyzeRequest>,
) -> ApiResult<Json<Value>> {
    let page =
        state.store.load(&request.slug).await?.ok_or_else(|| ApiError::NotFound("Page not found".to_string()))?;
    let keywords = state.store.active_keywords().await?;
    let analysis = score(&page.tree, &keywords);
    Ok(Json(json!({
        "success": true,
        "analysis": analysis,
        "page": { "slug": page.tree.slug, "title": page.tree.seo_meta.title },
    })))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LiveAnalyzeRequest {
    #[serde(default, alias = "nodes")]
    content: BTreeMap<String, ContentNode>,
    #[serde(default)]
    seo_meta: SeoMeta,
}

async fn analyze_live<B: Backend>(
    State(state): State<AppState<B>>, Json(request): Json<LiveAnalyzeRequest>,
) -> ApiResult<Json<Value>> {
    let mut tree = ContentTree::new("temp", DocumentType::General);
    tree.seo_meta = request.seo_meta;
    for node in request.content.into_values() {
        tree.insert_node(node);
    }
    let keywords = state.store.active_keywords().await?;
    Ok(Json(json!({ "success": true, "analysis": score(&tree, &keywords) })))
}
