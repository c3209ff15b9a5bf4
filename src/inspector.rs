//! Inspector - tree selection driving a tab-per-page editor panel

use crate::host::HostDocument;
use crate::model::{ModelIndex, TreeModel};
use crate::page::{EditorKind, Page};
use crate::tree::NodePath;
use crate::Result;
use serde::Serialize;

/// Default number of levels expanded when the inspector opens
pub const DEFAULT_EXPAND_DEPTH: usize = 2;

/// One editor tab of the panel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Tab {
    pub label: String,
    pub editor: EditorKind,
    pub page: Page,
}

impl Tab {
    pub fn for_page(page: &Page) -> Self {
        Self {
            label: page.label.clone(),
            editor: page.editor_kind(),
            page: page.clone(),
        }
    }
}

/// A tree model plus the editor panel showing the current item's pages.
#[derive(Debug)]
pub struct Inspector {
    model: TreeModel,
    expanded: Vec<ModelIndex>,
    current: ModelIndex,
    tabs: Vec<Tab>,
}

impl Inspector {
    /// Build the tree over `host` and expand its first `expand_depth` levels
    pub fn open(host: &dyn HostDocument, expand_depth: usize) -> Self {
        let mut model = TreeModel::from_host(host);
        let expanded = model.expanded_indices(expand_depth);
        tracing::debug!("Inspector opened with {} expanded items", expanded.len());

        Self {
            model,
            expanded,
            current: ModelIndex::invalid(),
            tabs: Vec::new(),
        }
    }

    pub fn model(&self) -> &TreeModel {
        &self.model
    }

    pub fn expanded(&self) -> &[ModelIndex] {
        &self.expanded
    }

    pub fn current(&self) -> ModelIndex {
        self.current
    }

    pub fn tabs(&self) -> &[Tab] {
        &self.tabs
    }

    /// Make `index` current and rebuild the tabs from its pages.
    ///
    /// The invalid index leaves the panel empty.
    pub fn select(&mut self, index: ModelIndex) -> &[Tab] {
        self.current = index;
        self.tabs.clear();

        if let Some(node) = index.node() {
            self.tabs = self
                .model
                .tree()
                .pages(node)
                .iter()
                .map(Tab::for_page)
                .collect();
        }
        &self.tabs
    }

    /// Select the item at `path`
    pub fn select_path(&mut self, path: &NodePath) -> Result<&[Tab]> {
        let index = self.model.index_for_path(path)?;
        Ok(self.select(index))
    }
}
