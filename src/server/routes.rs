use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::inspector::Tab;
use crate::model::{ItemRole, ModelIndex};
use crate::node::{LoadState, NodeKind};
use crate::server::AppState;
use crate::tree::{NodePath, OutlineNode, TreeStats};
use crate::Error;

#[derive(Deserialize)]
pub struct PathParams {
    #[serde(default)]
    pub path: String,
}

#[derive(Deserialize)]
pub struct OutlineParams {
    #[serde(default)]
    pub path: String,
    pub depth: Option<usize>,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// One row under a parent item
#[derive(Debug, Serialize)]
pub struct ChildSummary {
    pub path: String,
    pub row: usize,
    pub kind: NodeKind,
    pub label: Option<String>,
    pub has_children: bool,
    pub load_state: LoadState,
}

#[derive(Serialize)]
pub struct StatsResponse {
    pub source: String,
    pub stats: TreeStats,
}

type ApiError = (StatusCode, Json<ErrorResponse>);

fn api_error(error: Error) -> ApiError {
    let status = match error {
        Error::InvalidPath(_) => StatusCode::BAD_REQUEST,
        Error::NodeNotFound(_) => StatusCode::NOT_FOUND,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    };
    (status, Json(ErrorResponse { error: error.to_string() }))
}

fn parse_path(path: &str) -> Result<NodePath, ApiError> {
    path.parse::<NodePath>().map_err(api_error)
}

pub async fn get_stats(State(state): State<Arc<AppState>>) -> Json<StatsResponse> {
    let model = state.model.lock().await;
    Json(StatsResponse {
        source: state.source.clone(),
        stats: model.tree().stats(),
    })
}

pub async fn get_children(
    State(state): State<Arc<AppState>>,
    Query(params): Query<PathParams>,
) -> Result<Json<Vec<ChildSummary>>, ApiError> {
    let path = parse_path(&params.path)?;
    let mut model = state.model.lock().await;
    let parent = model.index_for_path(&path).map_err(api_error)?;

    let mut children = Vec::new();
    for row in 0..model.row_count(&parent) {
        let index: ModelIndex = model.index(row, 0, &parent);
        let Some(node) = index.node() else {
            continue;
        };
        let tree = model.tree();
        children.push(ChildSummary {
            path: path.child(row).to_string(),
            row,
            kind: tree.kind(node).unwrap_or(NodeKind::Root),
            label: model.data(&index, ItemRole::Display),
            has_children: model.has_children(&index),
            load_state: tree.load_state(node).unwrap_or(LoadState::Loaded),
        });
    }
    Ok(Json(children))
}

pub async fn get_pages(
    State(state): State<Arc<AppState>>,
    Query(params): Query<PathParams>,
) -> Result<Json<Vec<Tab>>, ApiError> {
    let path = parse_path(&params.path)?;
    let mut model = state.model.lock().await;
    let node = model.tree_mut().resolve(&path).map_err(api_error)?;

    let tabs = model
        .tree()
        .pages(node)
        .iter()
        .map(Tab::for_page)
        .collect();
    Ok(Json(tabs))
}

pub async fn get_outline(
    State(state): State<Arc<AppState>>,
    Query(params): Query<OutlineParams>,
) -> Result<Json<OutlineNode>, ApiError> {
    let path = parse_path(&params.path)?;
    let mut model = state.model.lock().await;
    let tree = model.tree_mut();
    let node = tree.resolve(&path).map_err(api_error)?;
    let depth = params.depth.or(Some(1));

    tree.outline(node, depth)
        .map(Json)
        .ok_or_else(|| api_error(Error::NodeNotFound(path.to_string())))
}
