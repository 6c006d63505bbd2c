//! HTTP handlers for files and nodes.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use std::sync::Arc;

use super::types::{FileResponse, NodeResponse};
use crate::error::{AppError, Result};
use crate::figma::{FigmaClient, FigmaStore, FileAttributes, NodeAttributes};

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub store: FigmaStore,
    /// Absent when no Figma token is configured; sync is then unavailable.
    pub figma: Option<FigmaClient>,
}

/// Query parameters for node listing.
#[derive(Debug, Deserialize)]
pub struct NodeQuery {
    #[serde(default, rename = "type")]
    pub node_type: Option<String>,
}

/// Create the Axum router with all routes.
pub fn create_router(store: FigmaStore, figma: Option<FigmaClient>) -> Router {
    let state = Arc::new(AppState { store, figma });

    Router::new()
        // File operations
        .route("/files", get(list_files).post(import_file))
        .route("/files/:key", get(get_file).delete(delete_file))
        .route("/files/:key/nodes", get(list_nodes))
        .route("/files/:key/sync", post(sync_file))
        // Node operations
        .route("/nodes", post(create_node))
        .route("/nodes/:id", get(get_node))
        .with_state(state)
}

// ============================================================================
// File Operations
// ============================================================================

/// GET /files - List stored files.
async fn list_files(State(state): State<Arc<AppState>>) -> Result<impl IntoResponse> {
    let files = state.store.list_files().await?;
    let body: Vec<FileResponse> = files.into_iter().map(FileResponse::from).collect();
    Ok(Json(body))
}

/// POST /files - Import a file and replace its nodes.
async fn import_file(
    State(state): State<Arc<AppState>>,
    Json(attrs): Json<FileAttributes>,
) -> Result<impl IntoResponse> {
    tracing::info!("Importing file '{}' ({} nodes)", attrs.key, attrs.nodes.len());
    let (file, nodes) = state.store.import_file(attrs).await?;
    Ok((
        StatusCode::CREATED,
        Json(FileResponse::with_nodes(file, nodes)),
    ))
}

/// GET /files/{key} - File with its nodes.
async fn get_file(
    State(state): State<Arc<AppState>>,
    Path(key): Path<String>,
) -> Result<impl IntoResponse> {
    let (file, nodes) = state.store.get_file_with_nodes(&key).await?;
    Ok(Json(FileResponse::with_nodes(file, nodes)))
}

/// DELETE /files/{key} - Delete a file and its nodes (idempotent).
async fn delete_file(
    State(state): State<Arc<AppState>>,
    Path(key): Path<String>,
) -> Result<impl IntoResponse> {
    tracing::info!("Deleting file '{}'", key);
    state.store.delete_file(&key).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /files/{key}/nodes?type=T - Nodes of a file.
async fn list_nodes(
    State(state): State<Arc<AppState>>,
    Path(key): Path<String>,
    Query(query): Query<NodeQuery>,
) -> Result<impl IntoResponse> {
    let nodes = state
        .store
        .list_nodes(&key, query.node_type.as_deref())
        .await?;
    let body: Vec<NodeResponse> = nodes.into_iter().map(NodeResponse::from).collect();
    Ok(Json(body))
}

/// POST /files/{key}/sync - Fetch a file from Figma and import it.
async fn sync_file(
    State(state): State<Arc<AppState>>,
    Path(key): Path<String>,
) -> Result<impl IntoResponse> {
    let client = state.figma.as_ref().ok_or_else(|| {
        AppError::BadRequest("Figma sync is not configured (missing FIGMA_TOKEN)".to_string())
    })?;

    let (file, nodes) = state.store.sync_file(client, &key).await?;
    Ok((
        StatusCode::CREATED,
        Json(FileResponse::with_nodes(file, nodes)),
    ))
}

// ============================================================================
// Node Operations
// ============================================================================

/// POST /nodes - Create one node in an existing file.
async fn create_node(
    State(state): State<Arc<AppState>>,
    Json(attrs): Json<NodeAttributes>,
) -> Result<impl IntoResponse> {
    let node = state.store.create_node(attrs).await?;
    Ok((StatusCode::CREATED, Json(NodeResponse::from(node))))
}

/// GET /nodes/{id} - Node with its owning file.
async fn get_node(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse> {
    let (node, file) = state.store.get_node(id).await?;
    Ok(Json(NodeResponse::with_file(node, file)))
}
