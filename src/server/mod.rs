use axum::{routing::get, Router};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::sync::Mutex;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::model::TreeModel;
use crate::ui::Icons;

pub mod routes;

/// Server state
pub struct AppState {
    /// Where the document came from, for display
    pub source: String,
    pub model: Mutex<TreeModel>,
}

impl AppState {
    pub fn new(source: impl Into<String>, model: TreeModel) -> Arc<Self> {
        Arc::new(Self {
            source: source.into(),
            model: Mutex::new(model),
        })
    }
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/stats", get(routes::get_stats))
        .route("/children", get(routes::get_children))
        .route("/pages", get(routes::get_pages))
        .route("/outline", get(routes::get_outline))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub async fn start_server(port: u16, state: Arc<AppState>) -> anyhow::Result<()> {
    let app = router(state);

    let addr = SocketAddr::from(([127, 0, 0, 1], port));
    tracing::info!("Starting server on {}", addr);
    println!("{} Document tree view at http://{}", Icons::GLOBE, addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
