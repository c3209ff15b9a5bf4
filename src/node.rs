//! Node types - typed elements of the document tree
//!
//! Every node wraps one host object and derives its pages from that object
//! when it is constructed:
//! - `Root`: no host object, children are the host's frame sets
//! - `Frameset`: a frame set, children are its frames
//! - `Frame`: a frame, at most one `TextDocument` child
//! - `TextDocument`: rich text, children are loaded lazily on first access
//! - `TextTable` / `TextList` / `TextFrame`: block structures of a document

use crate::host::{
    HostFrame, HostFrameSet, HostTextDocument, HostTextFrame, HostTextList, HostTextTable,
};
use crate::page::{Page, Property, PropertyTable};
use crate::variant::Variant;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

/// Index of a node within its `DocumentTree`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeId(pub u32);

impl NodeId {
    /// The root node of every tree
    pub fn root() -> Self {
        Self(0)
    }

    pub(crate) fn index(self) -> usize {
        self.0 as usize
    }
}

/// Node variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeKind {
    Root,
    Frameset,
    Frame,
    TextDocument,
    TextTable,
    TextList,
    TextFrame,
}

impl NodeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            NodeKind::Root => "root",
            NodeKind::Frameset => "frameset",
            NodeKind::Frame => "frame",
            NodeKind::TextDocument => "text_document",
            NodeKind::TextTable => "text_table",
            NodeKind::TextList => "text_list",
            NodeKind::TextFrame => "text_frame",
        }
    }

    pub fn all() -> &'static [NodeKind] {
        &[
            NodeKind::Root,
            NodeKind::Frameset,
            NodeKind::Frame,
            NodeKind::TextDocument,
            NodeKind::TextTable,
            NodeKind::TextList,
            NodeKind::TextFrame,
        ]
    }

    /// Whether children of this kind are enumerated on first access
    pub fn is_lazy(&self) -> bool {
        matches!(self, NodeKind::TextDocument)
    }
}

impl FromStr for NodeKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "root" => Ok(NodeKind::Root),
            "frameset" | "frame_set" => Ok(NodeKind::Frameset),
            "frame" => Ok(NodeKind::Frame),
            "text_document" | "document" => Ok(NodeKind::TextDocument),
            "text_table" | "table" => Ok(NodeKind::TextTable),
            "text_list" | "list" => Ok(NodeKind::TextList),
            "text_frame" => Ok(NodeKind::TextFrame),
            _ => Err(Error::Parse(format!("Unknown node kind: {}", s))),
        }
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Child population state of a node.
///
/// Eager nodes are `Loaded` from construction. Lazy nodes start
/// `NotLoaded`, which is distinct from `Loaded` with zero children.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoadState {
    NotLoaded,
    Loading,
    Loaded,
}

/// Non-owning handle to the host object behind a node.
#[derive(Clone)]
pub enum HostObject {
    None,
    FrameSet(Arc<dyn HostFrameSet>),
    Frame(Arc<dyn HostFrame>),
    TextDocument(Arc<dyn HostTextDocument>),
    TextTable(Arc<dyn HostTextTable>),
    TextList(Arc<dyn HostTextList>),
    TextFrame(Arc<dyn HostTextFrame>),
}

impl fmt::Debug for HostObject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            HostObject::None => "None",
            HostObject::FrameSet(_) => "FrameSet",
            HostObject::Frame(_) => "Frame",
            HostObject::TextDocument(_) => "TextDocument",
            HostObject::TextTable(_) => "TextTable",
            HostObject::TextList(_) => "TextList",
            HostObject::TextFrame(_) => "TextFrame",
        };
        write!(f, "HostObject::{}", name)
    }
}

/// An element of the document tree.
#[derive(Debug)]
pub struct Node {
    pub(crate) id: NodeId,
    pub(crate) kind: NodeKind,
    pub(crate) parent: Option<NodeId>,
    /// Index among the parent's children, fixed at insertion
    pub(crate) row: usize,
    pub(crate) children: Vec<NodeId>,
    pub(crate) pages: Vec<Page>,
    pub(crate) label: Option<String>,
    pub(crate) load_state: LoadState,
    pub(crate) host: HostObject,
}

impl Node {
    fn new(kind: NodeKind, label: Option<String>, pages: Vec<Page>, host: HostObject) -> Self {
        let load_state = if kind.is_lazy() {
            LoadState::NotLoaded
        } else {
            LoadState::Loaded
        };

        Self {
            id: NodeId::root(),
            kind,
            parent: None,
            row: 0,
            children: Vec::new(),
            pages,
            label,
            load_state,
            host,
        }
    }

    pub fn root() -> Self {
        Self::new(NodeKind::Root, None, Vec::new(), HostObject::None)
    }

    pub fn frameset(frameset: Arc<dyn HostFrameSet>) -> Self {
        let properties = PropertyTable::new()
            .with("name", frameset.name())
            .with("frameCount", frameset.frame_count())
            .with("isText", frameset.document().is_some());

        Self::new(
            NodeKind::Frameset,
            Some(frameset.name()),
            vec![Page::properties("Properties", properties)],
            HostObject::FrameSet(frameset),
        )
    }

    pub fn frame(frame: Arc<dyn HostFrame>) -> Self {
        let properties = PropertyTable::new()
            .with("shapeId", frame.shape_id())
            .with("visible", frame.is_visible())
            .with("rotation", Variant::from(frame.rotation()))
            .with("width", Variant::from(frame.width()))
            .with("height", Variant::from(frame.height()))
            .with("positionX", Variant::from(frame.position_x()))
            .with("positionY", Variant::from(frame.position_y()))
            .with("zIndex", frame.z_index());

        Self::new(
            NodeKind::Frame,
            Some(frame.shape_id()),
            vec![Page::properties("Properties", properties)],
            HostObject::Frame(frame),
        )
    }

    pub fn text_document(document: Arc<dyn HostTextDocument>) -> Self {
        let properties = PropertyTable::new()
            .with("width", Variant::from(document.width()))
            .with("height", Variant::from(document.height()))
            .with("pageCount", document.page_count())
            .with("isModified", document.is_modified());

        let mut variables = Page::properties("Variables", PropertyTable::new());
        for name in document.variable_names() {
            let value = document
                .variable_value(&name)
                .map(|v| v.to_string())
                .unwrap_or_default();
            variables.add_property(Property::new(name, value));
        }

        let html = document.to_html();
        let pages = vec![
            Page::properties("Properties", properties),
            variables,
            Page::plain_text("Text", document.to_text()),
            Page::plain_text("HTML", html.clone()),
            Page::plain_text("Style", document.default_style_sheet()),
            Page::rich_text("Preview", html),
        ];

        Self::new(
            NodeKind::TextDocument,
            Some("Document".to_string()),
            pages,
            HostObject::TextDocument(document),
        )
    }

    pub fn text_table(table: Arc<dyn HostTextTable>) -> Self {
        Self::new(
            NodeKind::TextTable,
            Some("TextTable".to_string()),
            text_pages(table.text()),
            HostObject::TextTable(table),
        )
    }

    pub fn text_list(list: Arc<dyn HostTextList>) -> Self {
        Self::new(
            NodeKind::TextList,
            Some("TextList".to_string()),
            text_pages(list.text()),
            HostObject::TextList(list),
        )
    }

    pub fn text_frame(frame: Arc<dyn HostTextFrame>) -> Self {
        Self::new(
            NodeKind::TextFrame,
            Some("TextFrame".to_string()),
            text_pages(frame.text()),
            HostObject::TextFrame(frame),
        )
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn kind(&self) -> NodeKind {
        self.kind
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn row(&self) -> usize {
        self.row
    }

    /// Text shown for the node in column 0 of a tree view
    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    pub fn pages(&self) -> &[Page] {
        &self.pages
    }

    pub fn load_state(&self) -> LoadState {
        self.load_state
    }
}

fn text_pages(text: Option<String>) -> Vec<Page> {
    text.map(|t| vec![Page::plain_text("Text", t)]).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Frame;

    impl HostFrame for Frame {
        fn shape_id(&self) -> String {
            "shape-1".to_string()
        }
        fn is_visible(&self) -> bool {
            true
        }
        fn rotation(&self) -> f64 {
            0.0
        }
        fn width(&self) -> f64 {
            120.5
        }
        fn height(&self) -> f64 {
            80.0
        }
        fn position_x(&self) -> f64 {
            10.0
        }
        fn position_y(&self) -> f64 {
            20.0
        }
        fn z_index(&self) -> i64 {
            3
        }
    }

    struct List(Option<&'static str>);

    impl HostTextList for List {
        fn text(&self) -> Option<String> {
            self.0.map(str::to_string)
        }
    }

    #[test]
    fn test_frame_properties() {
        let node = Node::frame(Arc::new(Frame));
        assert_eq!(node.kind(), NodeKind::Frame);
        assert_eq!(node.label(), Some("shape-1"));

        let table = node.pages()[0].property_table().unwrap();
        assert_eq!(table.get("shapeId"), Some("shape-1"));
        assert_eq!(table.get("visible"), Some("true"));
        assert_eq!(table.get("rotation"), Some("0.0"));
        assert_eq!(table.get("width"), Some("120.5"));
        assert_eq!(table.get("zIndex"), Some("3"));
        assert_eq!(table.len(), 8);
    }

    #[test]
    fn test_text_page_only_when_text_present() {
        assert_eq!(Node::text_list(Arc::new(List(Some("- a")))).pages().len(), 1);
        assert!(Node::text_list(Arc::new(List(None))).pages().is_empty());
    }

    #[test]
    fn test_load_state_by_kind() {
        assert_eq!(Node::root().load_state(), LoadState::Loaded);
        assert_eq!(Node::text_list(Arc::new(List(None))).load_state(), LoadState::Loaded);
    }

    #[test]
    fn test_kind_parse() {
        for kind in NodeKind::all() {
            assert_eq!(kind.as_str().parse::<NodeKind>().unwrap(), *kind);
        }
        assert_eq!("table".parse::<NodeKind>().unwrap(), NodeKind::TextTable);
        assert!("paragraph".parse::<NodeKind>().is_err());
    }
}
