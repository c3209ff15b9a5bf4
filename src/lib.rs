//! # Doctree - Document Tree Inspector
//!
//! Lazy-loading hierarchical model over a word-processor document.
//!
//! Doctree provides:
//! - Read-only host interfaces for frame sets, frames and rich text
//! - A typed node tree whose text documents enumerate their blocks on demand
//! - Property and text pages attached to every node
//! - An indexable tree model and tab-per-page inspector for view layers
//! - File-backed document snapshots standing in for a live host

pub mod variant;
pub mod host;
pub mod page;
pub mod node;
pub mod tree;
pub mod model;
pub mod inspector;
pub mod snapshot;
pub mod server;
pub mod ui;
pub mod output;
pub mod config;

// Re-exports for convenient access
pub use variant::Variant;
pub use host::{BlockContext, BlockStructure, HostDocument, TextCursor};
pub use page::{EditorKind, Page, PageContent, Property, PropertyTable};
pub use node::{LoadState, Node, NodeId, NodeKind};
pub use tree::{BuildReport, DocumentTree, NodePath, TreeStats};
pub use model::{ItemFlags, ItemRole, ModelIndex, TreeModel};
pub use inspector::{Inspector, Tab};
pub use snapshot::DocumentSnapshot;

/// Result type alias for Doctree operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for Doctree operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Invalid node path: {0}")]
    InvalidPath(String),

    #[error("Node not found: {0}")]
    NodeNotFound(String),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Snapshot JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Snapshot TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Bridge error: {0}")]
    Bridge(String),
}
