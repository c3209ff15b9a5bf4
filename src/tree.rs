//! Document Tree - arena of typed nodes built over a host document
//!
//! The tree is built once from a live enumeration of the host's frame sets.
//! After that the only mutation is the one-time lazy population of
//! `TextDocument` children, which walks the document block by block.

use crate::host::{BlockStructure, HostDocument, HostFrameSet, HostTextDocument, HostTextFrame};
use crate::node::{HostObject, LoadState, Node, NodeId, NodeKind};
use crate::page::Page;
use crate::{Error, Result};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

/// A host entry that was absent during construction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedEntry {
    /// Node whose collection had the gap
    pub parent: NodeId,
    /// Which host collection was enumerated
    pub collection: &'static str,
    /// Position of the absent entry in that collection
    pub index: usize,
}

/// Record of everything left out while building the tree.
#[derive(Debug, Clone, Default, Serialize)]
pub struct BuildReport {
    pub skipped: Vec<SkippedEntry>,
}

impl BuildReport {
    pub fn is_complete(&self) -> bool {
        self.skipped.is_empty()
    }
}

/// Address of a node as the rows taken from the root, e.g. `0/2/1`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct NodePath(pub Vec<usize>);

impl NodePath {
    pub fn root() -> Self {
        Self::default()
    }

    pub fn rows(&self) -> &[usize] {
        &self.0
    }

    pub fn child(&self, row: usize) -> Self {
        let mut rows = self.0.clone();
        rows.push(row);
        Self(rows)
    }
}

impl FromStr for NodePath {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let trimmed = s.trim().trim_matches('/');
        if trimmed.is_empty() {
            return Ok(Self::root());
        }

        trimmed
            .split('/')
            .map(|part| {
                part.parse::<usize>()
                    .map_err(|_| Error::InvalidPath(format!("'{}' is not a row number in {}", part, s)))
            })
            .collect::<Result<Vec<_>>>()
            .map(NodePath)
    }
}

impl fmt::Display for NodePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rows: Vec<String> = self.0.iter().map(|r| r.to_string()).collect();
        write!(f, "/{}", rows.join("/"))
    }
}

/// Nested view of a subtree, used for dumps and JSON output.
#[derive(Debug, Clone, Serialize)]
pub struct OutlineNode {
    pub path: String,
    pub kind: NodeKind,
    pub label: Option<String>,
    pub row: usize,
    pub load_state: LoadState,
    pub pages: Vec<String>,
    pub children: Vec<OutlineNode>,
}

/// The tree of typed nodes.
///
/// Nodes live in an arena indexed by `NodeId`; the root is always
/// `NodeId::root()`. Parent links are plain ids, so the only owning
/// relation is arena → node.
#[derive(Debug)]
pub struct DocumentTree {
    nodes: Vec<Node>,
    report: BuildReport,
}

impl DocumentTree {
    /// Build the tree from the host document's top-level frame sets.
    pub fn build_root(host: &dyn HostDocument) -> Self {
        let mut tree = Self {
            nodes: vec![Node::root()],
            report: BuildReport::default(),
        };

        let root = NodeId::root();
        for index in 0..host.frame_set_count() {
            match host.frame_set(index) {
                Some(frameset) => {
                    tree.add_frameset(root, frameset);
                }
                None => tree.skip(root, "frame set", index),
            }
        }

        tracing::debug!(
            "Built document tree: {} nodes, {} skipped entries",
            tree.nodes.len(),
            tree.report.skipped.len()
        );
        tree
    }

    fn skip(&mut self, parent: NodeId, collection: &'static str, index: usize) {
        tracing::warn!("Skipping absent {} #{} under node {:?}", collection, index, parent);
        self.report.skipped.push(SkippedEntry {
            parent,
            collection,
            index,
        });
    }

    /// Insert `node` as the last child of `parent`, caching its row
    fn insert(&mut self, parent: NodeId, mut node: Node) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        let siblings = &mut self.nodes[parent.index()].children;
        node.id = id;
        node.parent = Some(parent);
        node.row = siblings.len();
        siblings.push(id);
        self.nodes.push(node);
        id
    }

    fn add_frameset(&mut self, parent: NodeId, frameset: Arc<dyn HostFrameSet>) -> NodeId {
        let document = frameset.document();
        let id = self.insert(parent, Node::frameset(frameset.clone()));

        for index in 0..frameset.frame_count() {
            match frameset.frame(index) {
                Some(frame) => {
                    let frame_id = self.insert(id, Node::frame(frame));
                    if let Some(document) = &document {
                        self.add_text_document(frame_id, document.clone());
                    }
                }
                None => self.skip(id, "frame", index),
            }
        }
        id
    }

    fn add_text_document(&mut self, parent: NodeId, document: Arc<dyn HostTextDocument>) -> NodeId {
        self.insert(parent, Node::text_document(document))
    }

    fn add_text_frame(&mut self, parent: NodeId, frame: Arc<dyn HostTextFrame>) -> NodeId {
        let id = self.insert(parent, Node::text_frame(frame.clone()));
        for index in 0..frame.child_frame_count() {
            match frame.child_frame(index) {
                Some(child) => {
                    self.add_text_frame(id, child);
                }
                None => self.skip(id, "child frame", index),
            }
        }
        id
    }

    /// Populate the children of a lazy node. Runs at most once per node.
    fn ensure_loaded(&mut self, id: NodeId) {
        let Some(node) = self.nodes.get_mut(id.index()) else {
            return;
        };
        if node.load_state != LoadState::NotLoaded {
            return;
        }

        let document = match &node.host {
            HostObject::TextDocument(document) => document.clone(),
            _ => {
                node.load_state = LoadState::Loaded;
                return;
            }
        };
        node.load_state = LoadState::Loading;

        let mut cursor = document.first_cursor();
        loop {
            match cursor.context().classify() {
                Some(BlockStructure::Table(table)) => {
                    self.insert(id, Node::text_table(table));
                }
                Some(BlockStructure::List(list)) => {
                    self.insert(id, Node::text_list(list));
                }
                Some(BlockStructure::Frame(frame)) => {
                    self.add_text_frame(id, frame);
                }
                None => {}
            }
            if !cursor.move_next_block() {
                break;
            }
        }

        let node = &mut self.nodes[id.index()];
        node.load_state = LoadState::Loaded;
        tracing::debug!("Loaded {} children of {:?}", node.children.len(), id);
    }

    pub fn root(&self) -> NodeId {
        NodeId::root()
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.index())
    }

    /// Number of children, loading lazy children first
    pub fn child_count(&mut self, id: NodeId) -> usize {
        self.ensure_loaded(id);
        self.loaded_children(id).len()
    }

    /// Child at `row`, loading lazy children first
    pub fn child(&mut self, id: NodeId, row: usize) -> Option<NodeId> {
        self.ensure_loaded(id);
        self.loaded_children(id).get(row).copied()
    }

    /// Children materialized so far, without triggering a load
    pub fn loaded_children(&self, id: NodeId) -> &[NodeId] {
        self.node(id).map(|n| n.children.as_slice()).unwrap_or(&[])
    }

    /// Whether a view should offer to expand the node.
    ///
    /// A lazy node that has not been loaded yet reports `true`.
    pub fn has_children(&self, id: NodeId) -> bool {
        match self.node(id) {
            Some(node) if node.load_state == LoadState::NotLoaded => true,
            Some(node) => !node.children.is_empty(),
            None => false,
        }
    }

    pub fn load_state(&self, id: NodeId) -> Option<LoadState> {
        self.node(id).map(|n| n.load_state)
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).and_then(|n| n.parent)
    }

    /// Index of the node among its siblings
    pub fn row(&self, id: NodeId) -> usize {
        self.node(id).map(|n| n.row).unwrap_or(0)
    }

    pub fn kind(&self, id: NodeId) -> Option<NodeKind> {
        self.node(id).map(|n| n.kind)
    }

    pub fn label(&self, id: NodeId) -> Option<&str> {
        self.node(id).and_then(|n| n.label())
    }

    pub fn page_count(&self, id: NodeId) -> usize {
        self.pages(id).len()
    }

    pub fn page(&self, id: NodeId, index: usize) -> Option<&Page> {
        self.pages(id).get(index)
    }

    pub fn pages(&self, id: NodeId) -> &[Page] {
        self.node(id).map(|n| n.pages()).unwrap_or(&[])
    }

    pub fn report(&self) -> &BuildReport {
        &self.report
    }

    /// Rows from the root down to `id`
    pub fn path_of(&self, id: NodeId) -> NodePath {
        let mut rows = Vec::new();
        let mut current = id;
        while let Some(parent) = self.parent(current) {
            rows.push(self.row(current));
            current = parent;
        }
        rows.reverse();
        NodePath(rows)
    }

    /// Follow a row path from the root, loading lazy nodes on the way
    pub fn resolve(&mut self, path: &NodePath) -> Result<NodeId> {
        let mut current = self.root();
        for (depth, &row) in path.rows().iter().enumerate() {
            current = self.child(current, row).ok_or_else(|| {
                let prefix = NodePath(path.rows()[..=depth].to_vec());
                Error::NodeNotFound(prefix.to_string())
            })?;
        }
        Ok(current)
    }

    /// Load every lazy node in the tree
    pub fn load_all(&mut self) {
        let mut stack = vec![self.root()];
        while let Some(id) = stack.pop() {
            self.ensure_loaded(id);
            stack.extend(self.loaded_children(id).iter().copied());
        }
    }

    /// Nested view of the subtree at `id`, `depth` levels deep (unbounded if `None`)
    pub fn outline(&mut self, id: NodeId, depth: Option<usize>) -> Option<OutlineNode> {
        let path = self.path_of(id);
        self.outline_at(id, path, depth)
    }

    fn outline_at(&mut self, id: NodeId, path: NodePath, depth: Option<usize>) -> Option<OutlineNode> {
        let expand = depth.is_none_or(|d| d > 0);
        if expand {
            self.ensure_loaded(id);
        }

        let children: Vec<NodeId> = if expand {
            self.loaded_children(id).to_vec()
        } else {
            Vec::new()
        };
        let child_depth = depth.map(|d| d.saturating_sub(1));
        let children = children
            .into_iter()
            .enumerate()
            .filter_map(|(row, child)| self.outline_at(child, path.child(row), child_depth))
            .collect();

        let node = self.node(id)?;
        Some(OutlineNode {
            path: path.to_string(),
            kind: node.kind,
            label: node.label.clone(),
            row: node.row,
            load_state: node.load_state,
            pages: node.pages.iter().map(|p| p.label.clone()).collect(),
            children,
        })
    }

    /// Counts over the nodes materialized so far
    pub fn stats(&self) -> TreeStats {
        let mut by_kind = BTreeMap::new();
        for node in &self.nodes {
            *by_kind.entry(node.kind).or_insert(0) += 1;
        }

        TreeStats {
            total_nodes: self.nodes.len(),
            total_pages: self.nodes.iter().map(|n| n.pages.len()).sum(),
            pending_lazy: self
                .nodes
                .iter()
                .filter(|n| n.load_state == LoadState::NotLoaded)
                .count(),
            skipped_entries: self.report.skipped.len(),
            by_kind,
        }
    }
}

/// Statistics about a document tree
#[derive(Debug, Clone, Serialize)]
pub struct TreeStats {
    pub total_nodes: usize,
    pub total_pages: usize,
    pub pending_lazy: usize,
    pub skipped_entries: usize,
    pub by_kind: BTreeMap<NodeKind, usize>,
}

impl fmt::Display for TreeStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Document Tree Statistics:")?;
        writeln!(f, "  Nodes: {} (pages: {})", self.total_nodes, self.total_pages)?;
        for (kind, count) in &self.by_kind {
            writeln!(f, "    {}: {}", kind, count)?;
        }
        writeln!(f, "  Unloaded documents: {}", self.pending_lazy)?;
        writeln!(f, "  Skipped host entries: {}", self.skipped_entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::snapshot::{
        BlockSnapshot, DocumentSnapshot, FrameSetSnapshot, FrameSnapshot, TextDocumentSnapshot,
        TextFrameSnapshot,
    };

    fn text_frameset(name: &str, frames: usize, blocks: Vec<BlockSnapshot>) -> FrameSetSnapshot {
        FrameSetSnapshot {
            name: name.to_string(),
            frames: (0..frames)
                .map(|i| Some(FrameSnapshot::new(format!("{}-{}", name, i))))
                .collect(),
            document: Some(Arc::new(TextDocumentSnapshot {
                blocks,
                ..Default::default()
            })),
        }
    }

    fn sample_blocks() -> Vec<BlockSnapshot> {
        vec![
            BlockSnapshot::paragraph("intro"),
            BlockSnapshot::table("a | b"),
            BlockSnapshot::list("- one"),
            BlockSnapshot::frame(TextFrameSnapshot::new("aside")),
        ]
    }

    fn build(framesets: Vec<Option<FrameSetSnapshot>>) -> DocumentTree {
        DocumentTree::build_root(&DocumentSnapshot::new(framesets))
    }

    #[test]
    fn test_empty_root() {
        let mut tree = build(Vec::new());
        let root = tree.root();
        assert_eq!(tree.child_count(root), 0);
        assert!(!tree.has_children(root));
        assert_eq!(tree.page_count(root), 0);
    }

    #[test]
    fn test_structure() {
        let mut tree = build(vec![Some(text_frameset("main", 2, sample_blocks()))]);
        let root = tree.root();
        let frameset = tree.child(root, 0).unwrap();
        assert_eq!(tree.kind(frameset), Some(NodeKind::Frameset));
        assert_eq!(tree.label(frameset), Some("main"));
        assert_eq!(tree.child_count(frameset), 2);

        let frame = tree.child(frameset, 1).unwrap();
        assert_eq!(tree.kind(frame), Some(NodeKind::Frame));
        assert_eq!(tree.label(frame), Some("main-1"));
        assert_eq!(tree.child_count(frame), 1);

        let document = tree.child(frame, 0).unwrap();
        assert_eq!(tree.kind(document), Some(NodeKind::TextDocument));
        assert_eq!(tree.page_count(document), 6);
    }

    #[test]
    fn test_lazy_load_is_idempotent() {
        let mut tree = build(vec![Some(text_frameset("main", 1, sample_blocks()))]);
        let document = tree.resolve(&"0/0/0".parse().unwrap()).unwrap();

        assert_eq!(tree.load_state(document), Some(LoadState::NotLoaded));
        assert!(tree.has_children(document));
        assert!(tree.loaded_children(document).is_empty());

        let first = tree.child_count(document);
        let first_ids = tree.loaded_children(document).to_vec();
        let second = tree.child_count(document);
        let second_ids = tree.loaded_children(document).to_vec();

        assert_eq!(first, 3);
        assert_eq!(first, second);
        assert_eq!(first_ids, second_ids);
        assert_eq!(tree.load_state(document), Some(LoadState::Loaded));

        let kinds: Vec<_> = first_ids.iter().map(|&id| tree.kind(id).unwrap()).collect();
        assert_eq!(kinds, vec![NodeKind::TextTable, NodeKind::TextList, NodeKind::TextFrame]);
    }

    #[test]
    fn test_loaded_empty_document_has_no_children() {
        let mut tree = build(vec![Some(text_frameset(
            "plain",
            1,
            vec![BlockSnapshot::paragraph("just text")],
        ))]);
        let document = tree.resolve(&"0/0/0".parse().unwrap()).unwrap();
        assert!(tree.has_children(document));
        assert_eq!(tree.child_count(document), 0);
        assert!(!tree.has_children(document));
        assert_eq!(tree.load_state(document), Some(LoadState::Loaded));
    }

    #[test]
    fn test_pages_stable_across_loading() {
        let mut tree = build(vec![Some(text_frameset("main", 1, sample_blocks()))]);
        let document = tree.resolve(&"0/0/0".parse().unwrap()).unwrap();

        let before: Vec<Page> = tree.pages(document).to_vec();
        tree.child_count(document);
        let after: Vec<Page> = tree.pages(document).to_vec();
        assert_eq!(before, after);
    }

    #[test]
    fn test_null_frame_is_skipped() {
        let mut frameset = text_frameset("sparse", 3, Vec::new());
        frameset.frames[1] = None;

        let mut tree = build(vec![Some(frameset), None]);
        let root = tree.root();
        assert_eq!(tree.child_count(root), 1);

        let frameset = tree.child(root, 0).unwrap();
        assert_eq!(tree.child_count(frameset), 2);

        let skipped = &tree.report().skipped;
        assert_eq!(skipped.len(), 2);
        assert_eq!(skipped[0], SkippedEntry { parent: frameset, collection: "frame", index: 1 });
        assert_eq!(skipped[1], SkippedEntry { parent: root, collection: "frame set", index: 1 });
    }

    #[test]
    fn test_rows_match_sibling_positions() {
        let mut frameset = text_frameset("sparse", 4, sample_blocks());
        frameset.frames[0] = None;
        let mut tree = build(vec![Some(frameset)]);
        tree.load_all();

        let mut stack = vec![tree.root()];
        while let Some(id) = stack.pop() {
            for (row, &child) in tree.loaded_children(id).iter().enumerate() {
                assert_eq!(tree.row(child), row);
                assert_eq!(tree.parent(child), Some(id));
                stack.push(child);
            }
        }
    }

    #[test]
    fn test_non_text_frameset_has_no_document() {
        let frameset = FrameSetSnapshot {
            name: "picture".to_string(),
            frames: vec![Some(FrameSnapshot::new("img"))],
            document: None,
        };
        let mut tree = build(vec![Some(frameset)]);
        let frame = tree.resolve(&"0/0".parse().unwrap()).unwrap();
        assert_eq!(tree.child_count(frame), 0);

        let frameset = tree.resolve(&"0".parse().unwrap()).unwrap();
        let props = tree.page(frameset, 0).unwrap().property_table().unwrap();
        assert_eq!(props.get("isText"), Some("false"));
        assert_eq!(props.get("frameCount"), Some("1"));
    }

    #[test]
    fn test_nested_text_frames() {
        let mut aside = TextFrameSnapshot::new("outer");
        aside.children = vec![Some(TextFrameSnapshot::new("inner")), None];
        let mut tree = build(vec![Some(text_frameset("main", 1, vec![BlockSnapshot::frame(aside)]))]);

        let outer = tree.resolve(&"0/0/0/0".parse().unwrap()).unwrap();
        assert_eq!(tree.kind(outer), Some(NodeKind::TextFrame));
        assert_eq!(tree.child_count(outer), 1);
        assert_eq!(tree.report().skipped.len(), 1);
    }

    #[test]
    fn test_path_parse_and_resolve() {
        assert_eq!("".parse::<NodePath>().unwrap(), NodePath::root());
        assert_eq!("/0/2/".parse::<NodePath>().unwrap(), NodePath(vec![0, 2]));
        assert!("0/x".parse::<NodePath>().is_err());

        let mut tree = build(vec![Some(text_frameset("main", 1, sample_blocks()))]);
        let list = tree.resolve(&"0/0/0/1".parse().unwrap()).unwrap();
        assert_eq!(tree.path_of(list).to_string(), "/0/0/0/1");
        assert!(matches!(
            tree.resolve(&"0/5".parse().unwrap()),
            Err(Error::NodeNotFound(p)) if p == "/0/5"
        ));
    }

    #[test]
    fn test_outline_respects_depth() {
        let mut tree = build(vec![Some(text_frameset("main", 1, sample_blocks()))]);
        let root = tree.root();
        let shallow = tree.outline(root, Some(2)).unwrap();
        assert_eq!(shallow.children[0].children.len(), 1);
        assert!(shallow.children[0].children[0].children.is_empty());
        assert_eq!(tree.stats().pending_lazy, 1);

        let full = tree.outline(root, None).unwrap();
        let document = &full.children[0].children[0].children[0];
        assert_eq!(document.kind, NodeKind::TextDocument);
        assert_eq!(document.children.len(), 3);
        assert_eq!(tree.stats().pending_lazy, 0);
    }
}
