//! Tree Model - indexable model contract over a document tree
//!
//! View layers address items by (row, column, parent) triples. The invalid
//! index stands for the hidden root; every other index carries the node it
//! points at, so parent lookups never search.

use crate::host::HostDocument;
use crate::node::NodeId;
use crate::tree::{DocumentTree, NodePath};
use crate::Result;
use bitflags::bitflags;

bitflags! {
    /// What a view may do with an item
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct ItemFlags: u32 {
        const ENABLED = 1 << 0;
        const SELECTABLE = 1 << 1;
    }
}

/// Data roles a view may request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ItemRole {
    Display,
    ToolTip,
}

/// Position of an item in the model.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct ModelIndex {
    row: usize,
    column: usize,
    node: Option<NodeId>,
}

impl ModelIndex {
    /// The index of the hidden root
    pub fn invalid() -> Self {
        Self::default()
    }

    pub fn is_valid(&self) -> bool {
        self.node.is_some()
    }

    pub fn row(&self) -> usize {
        self.row
    }

    pub fn column(&self) -> usize {
        self.column
    }

    pub fn node(&self) -> Option<NodeId> {
        self.node
    }
}

/// Single-column tree model owning the document tree.
#[derive(Debug)]
pub struct TreeModel {
    tree: DocumentTree,
}

impl TreeModel {
    pub fn new(tree: DocumentTree) -> Self {
        Self { tree }
    }

    /// Build a fresh tree over `host` and wrap it
    pub fn from_host(host: &dyn HostDocument) -> Self {
        Self::new(DocumentTree::build_root(host))
    }

    pub fn tree(&self) -> &DocumentTree {
        &self.tree
    }

    pub fn tree_mut(&mut self) -> &mut DocumentTree {
        &mut self.tree
    }

    fn node_of(&self, index: &ModelIndex) -> NodeId {
        index.node.unwrap_or_else(|| self.tree.root())
    }

    fn create_index(&self, row: usize, column: usize, node: NodeId) -> ModelIndex {
        ModelIndex {
            row,
            column,
            node: Some(node),
        }
    }

    pub fn column_count(&self, _parent: &ModelIndex) -> usize {
        1
    }

    pub fn flags(&self, index: &ModelIndex) -> ItemFlags {
        if !index.is_valid() {
            return ItemFlags::ENABLED;
        }
        ItemFlags::ENABLED | ItemFlags::SELECTABLE
    }

    /// Index of the child at `row`, invalid when out of range
    pub fn index(&mut self, row: usize, column: usize, parent: &ModelIndex) -> ModelIndex {
        if column >= self.column_count(parent) {
            return ModelIndex::invalid();
        }
        let parent_node = self.node_of(parent);
        match self.tree.child(parent_node, row) {
            Some(child) => self.create_index(row, column, child),
            None => ModelIndex::invalid(),
        }
    }

    pub fn parent(&self, index: &ModelIndex) -> ModelIndex {
        let Some(node) = index.node else {
            return ModelIndex::invalid();
        };
        match self.tree.parent(node) {
            Some(parent) if parent != self.tree.root() => {
                self.create_index(self.tree.row(parent), 0, parent)
            }
            _ => ModelIndex::invalid(),
        }
    }

    pub fn data(&self, index: &ModelIndex, role: ItemRole) -> Option<String> {
        let node = index.node?;
        match role {
            ItemRole::Display => self.tree.label(node).map(str::to_string),
            _ => None,
        }
    }

    pub fn row_count(&mut self, parent: &ModelIndex) -> usize {
        let node = self.node_of(parent);
        self.tree.child_count(node)
    }

    pub fn has_children(&self, parent: &ModelIndex) -> bool {
        self.tree.has_children(self.node_of(parent))
    }

    /// Index of the node at `path`; the empty path is the invalid index
    pub fn index_for_path(&mut self, path: &NodePath) -> Result<ModelIndex> {
        let node = self.tree.resolve(path)?;
        if node == self.tree.root() {
            return Ok(ModelIndex::invalid());
        }
        Ok(self.create_index(self.tree.row(node), 0, node))
    }

    /// Items a view expands when it opens, in depth-first order.
    ///
    /// Every item at most `depth` levels below the root is expanded. Only
    /// the expanded items' rows are counted, so lazy nodes deeper down
    /// stay unloaded.
    pub fn expanded_indices(&mut self, depth: usize) -> Vec<ModelIndex> {
        let mut expanded = Vec::new();
        self.expand_into(ModelIndex::invalid(), 0, depth, &mut expanded);
        expanded
    }

    fn expand_into(&mut self, parent: ModelIndex, level: usize, depth: usize, out: &mut Vec<ModelIndex>) {
        let level = level + 1;
        if level > depth {
            return;
        }
        for row in 0..self.row_count(&parent) {
            let index = self.index(row, 0, &parent);
            out.push(index);
            self.expand_into(index, level, depth, out);
        }
    }
}
