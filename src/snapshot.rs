//! Document snapshots - a file-backed host document
//!
//! A snapshot captures the read-only state the tree needs from a host
//! document, so the inspector can run outside the host application.
//! Snapshots load from JSON or TOML. Only JSON can express absent entries
//! (`null`) in the `frame_sets`, `frames` and `children` lists.

use crate::host::{
    BlockContext, HostDocument, HostFrame, HostFrameSet, HostTextDocument, HostTextFrame,
    HostTextList, HostTextTable, TextCursor,
};
use crate::variant::{float_repr, Variant};
use crate::Result;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;

/// Top-level snapshot: the host's frame set collection.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DocumentSnapshot {
    #[serde(default)]
    pub frame_sets: Vec<Option<Arc<FrameSetSnapshot>>>,
}

impl DocumentSnapshot {
    pub fn new(frame_sets: Vec<Option<FrameSetSnapshot>>) -> Self {
        Self {
            frame_sets: frame_sets.into_iter().map(|f| f.map(Arc::new)).collect(),
        }
    }

    /// Load a snapshot, choosing the format from the file extension
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let is_toml = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("toml"));

        let snapshot = if is_toml {
            Self::from_toml(&contents)?
        } else {
            Self::from_json(&contents)?
        };

        tracing::info!(
            "Loaded snapshot {} ({} frame sets)",
            path.display(),
            snapshot.frame_sets.len()
        );
        Ok(snapshot)
    }

    pub fn from_json(contents: &str) -> Result<Self> {
        Ok(serde_json::from_str(contents)?)
    }

    pub fn from_toml(contents: &str) -> Result<Self> {
        Ok(toml::from_str(contents)?)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

impl HostDocument for DocumentSnapshot {
    fn frame_set_count(&self) -> usize {
        self.frame_sets.len()
    }

    fn frame_set(&self, index: usize) -> Option<Arc<dyn HostFrameSet>> {
        let frameset = self.frame_sets.get(index)?.clone()?;
        Some(frameset as Arc<dyn HostFrameSet>)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FrameSetSnapshot {
    pub name: String,
    #[serde(default)]
    pub frames: Vec<Option<FrameSnapshot>>,
    /// Present for text frame sets
    #[serde(default)]
    pub document: Option<Arc<TextDocumentSnapshot>>,
}

impl HostFrameSet for FrameSetSnapshot {
    fn name(&self) -> String {
        self.name.clone()
    }

    fn frame_count(&self) -> usize {
        self.frames.len()
    }

    fn frame(&self, index: usize) -> Option<Arc<dyn HostFrame>> {
        let frame = self.frames.get(index)?.clone()?;
        Some(Arc::new(frame))
    }

    fn document(&self) -> Option<Arc<dyn HostTextDocument>> {
        let document = self.document.clone()?;
        Some(document as Arc<dyn HostTextDocument>)
    }
}

fn default_visible() -> bool {
    true
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FrameSnapshot {
    pub shape_id: String,
    #[serde(default = "default_visible")]
    pub visible: bool,
    #[serde(default, with = "float_repr")]
    pub rotation: f64,
    #[serde(default, with = "float_repr")]
    pub width: f64,
    #[serde(default, with = "float_repr")]
    pub height: f64,
    #[serde(default, with = "float_repr")]
    pub position_x: f64,
    #[serde(default, with = "float_repr")]
    pub position_y: f64,
    #[serde(default)]
    pub z_index: i64,
}

impl FrameSnapshot {
    pub fn new(shape_id: impl Into<String>) -> Self {
        Self {
            shape_id: shape_id.into(),
            visible: true,
            rotation: 0.0,
            width: 0.0,
            height: 0.0,
            position_x: 0.0,
            position_y: 0.0,
            z_index: 0,
        }
    }

    pub fn with_geometry(mut self, x: f64, y: f64, width: f64, height: f64) -> Self {
        self.position_x = x;
        self.position_y = y;
        self.width = width;
        self.height = height;
        self
    }
}

impl HostFrame for FrameSnapshot {
    fn shape_id(&self) -> String {
        self.shape_id.clone()
    }
    fn is_visible(&self) -> bool {
        self.visible
    }
    fn rotation(&self) -> f64 {
        self.rotation
    }
    fn width(&self) -> f64 {
        self.width
    }
    fn height(&self) -> f64 {
        self.height
    }
    fn position_x(&self) -> f64 {
        self.position_x
    }
    fn position_y(&self) -> f64 {
        self.position_y
    }
    fn z_index(&self) -> i64 {
        self.z_index
    }
}

/// A named document variable.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VariableSnapshot {
    pub name: String,
    pub value: Variant,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TextDocumentSnapshot {
    #[serde(default, with = "float_repr")]
    pub width: f64,
    #[serde(default, with = "float_repr")]
    pub height: f64,
    #[serde(default)]
    pub page_count: usize,
    #[serde(default)]
    pub modified: bool,
    #[serde(default)]
    pub variables: Vec<VariableSnapshot>,
    /// Plain text; derived from the blocks when absent
    #[serde(default)]
    pub text: Option<String>,
    /// Markup; derived from the blocks when absent
    #[serde(default)]
    pub html: Option<String>,
    #[serde(default)]
    pub style_sheet: String,
    #[serde(default)]
    pub blocks: Vec<BlockSnapshot>,
}

impl HostTextDocument for TextDocumentSnapshot {
    fn width(&self) -> f64 {
        self.width
    }

    fn height(&self) -> f64 {
        self.height
    }

    fn page_count(&self) -> usize {
        self.page_count
    }

    fn is_modified(&self) -> bool {
        self.modified
    }

    fn variable_names(&self) -> Vec<String> {
        self.variables.iter().map(|v| v.name.clone()).collect()
    }

    fn variable_value(&self, name: &str) -> Option<Variant> {
        self.variables
            .iter()
            .find(|v| v.name == name)
            .map(|v| v.value.clone())
    }

    fn to_text(&self) -> String {
        match &self.text {
            Some(text) => text.clone(),
            None => self
                .blocks
                .iter()
                .map(|b| b.text.as_str())
                .collect::<Vec<_>>()
                .join("\n"),
        }
    }

    fn to_html(&self) -> String {
        match &self.html {
            Some(html) => html.clone(),
            None => self
                .blocks
                .iter()
                .map(|b| format!("<p>{}</p>", escape_html(&b.text)))
                .collect(),
        }
    }

    fn default_style_sheet(&self) -> String {
        self.style_sheet.clone()
    }

    fn first_cursor(&self) -> Box<dyn TextCursor + '_> {
        Box::new(SnapshotCursor {
            blocks: &self.blocks,
            position: 0,
        })
    }
}

fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

/// One block of a text document and the structures enclosing it.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BlockSnapshot {
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub table: Option<TableSnapshot>,
    #[serde(default)]
    pub list: Option<ListSnapshot>,
    #[serde(default)]
    pub frame: Option<TextFrameSnapshot>,
}

impl BlockSnapshot {
    pub fn paragraph(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Default::default()
        }
    }

    pub fn table(text: impl Into<String>) -> Self {
        let text = text.into();
        Self {
            table: Some(TableSnapshot {
                text: Some(text.clone()),
            }),
            text,
            ..Default::default()
        }
    }

    pub fn list(text: impl Into<String>) -> Self {
        let text = text.into();
        Self {
            list: Some(ListSnapshot {
                text: Some(text.clone()),
            }),
            text,
            ..Default::default()
        }
    }

    pub fn frame(frame: TextFrameSnapshot) -> Self {
        Self {
            text: frame.text.clone().unwrap_or_default(),
            frame: Some(frame),
            ..Default::default()
        }
    }

    fn context(&self) -> BlockContext {
        BlockContext {
            table: self
                .table
                .clone()
                .map(|t| Arc::new(t) as Arc<dyn HostTextTable>),
            list: self
                .list
                .clone()
                .map(|l| Arc::new(l) as Arc<dyn HostTextList>),
            frame: self
                .frame
                .clone()
                .map(|f| Arc::new(f) as Arc<dyn HostTextFrame>),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TableSnapshot {
    #[serde(default)]
    pub text: Option<String>,
}

impl HostTextTable for TableSnapshot {
    fn text(&self) -> Option<String> {
        self.text.clone()
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ListSnapshot {
    #[serde(default)]
    pub text: Option<String>,
}

impl HostTextList for ListSnapshot {
    fn text(&self) -> Option<String> {
        self.text.clone()
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TextFrameSnapshot {
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub children: Vec<Option<TextFrameSnapshot>>,
}

impl TextFrameSnapshot {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            children: Vec::new(),
        }
    }
}

impl HostTextFrame for TextFrameSnapshot {
    fn text(&self) -> Option<String> {
        self.text.clone()
    }

    fn child_frame_count(&self) -> usize {
        self.children.len()
    }

    fn child_frame(&self, index: usize) -> Option<Arc<dyn HostTextFrame>> {
        let child = self.children.get(index)?.clone()?;
        Some(Arc::new(child))
    }
}

struct SnapshotCursor<'a> {
    blocks: &'a [BlockSnapshot],
    position: usize,
}

impl TextCursor for SnapshotCursor<'_> {
    fn context(&self) -> BlockContext {
        self.blocks
            .get(self.position)
            .map(BlockSnapshot::context)
            .unwrap_or_default()
    }

    fn move_next_block(&mut self) -> bool {
        if self.position + 1 < self.blocks.len() {
            self.position += 1;
            true
        } else {
            false
        }
    }
}

/// Two text frame sets with headed paragraphs, plus a list, for running
/// the inspector without a document file.
pub fn sample_document() -> DocumentSnapshot {
    let first = FrameSetSnapshot {
        name: "myFirstTextFrame".to_string(),
        frames: vec![Some(
            FrameSnapshot::new("shape-1").with_geometry(20.0, 20.0, 400.0, 240.0),
        )],
        document: Some(Arc::new(TextDocumentSnapshot {
            width: 400.0,
            height: 240.0,
            page_count: 1,
            html: Some(
                "<h1>First Header</h1><p>Some text</p><p>Some more text with <b>bold</b> and <i>italic</i> and <u>underline</u> to test the stuff.</p>"
                    .to_string(),
            ),
            blocks: vec![
                BlockSnapshot::paragraph("First Header"),
                BlockSnapshot::paragraph("Some text"),
                BlockSnapshot::paragraph(
                    "Some more text with bold and italic and underline to test the stuff.",
                ),
            ],
            ..Default::default()
        })),
    };

    let second = FrameSetSnapshot {
        name: "mySecondTextFrame".to_string(),
        frames: vec![Some(
            FrameSnapshot::new("shape-2").with_geometry(20.0, 280.0, 400.0, 240.0),
        )],
        document: Some(Arc::new(TextDocumentSnapshot {
            width: 400.0,
            height: 240.0,
            page_count: 1,
            variables: vec![VariableSnapshot {
                name: "author".to_string(),
                value: Variant::from("unknown"),
            }],
            html: Some(
                "<h1>Second Header</h1><h2>First Sub Header</h2><p>Some text.</p><h2>Second Sub Header</h2><ul><li>Some text.</li></ul>"
                    .to_string(),
            ),
            blocks: vec![
                BlockSnapshot::paragraph("Second Header"),
                BlockSnapshot::paragraph("First Sub Header"),
                BlockSnapshot::paragraph("Some text."),
                BlockSnapshot::paragraph("Second Sub Header"),
                BlockSnapshot::list("Some text."),
            ],
            ..Default::default()
        })),
    };

    DocumentSnapshot::new(vec![Some(first), Some(second)])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_with_null_entries() {
        let json = r#"{
            "frame_sets": [
                null,
                {
                    "name": "body",
                    "frames": [{ "shape_id": "s1", "width": 10.5 }, null],
                    "document": {
                        "variables": [{ "name": "pages", "value": { "uint": 3 } }],
                        "blocks": [{ "text": "x", "list": { "text": "- x" } }]
                    }
                }
            ]
        }"#;

        let snapshot = DocumentSnapshot::from_json(json).unwrap();
        assert_eq!(snapshot.frame_set_count(), 2);
        assert!(snapshot.frame_set(0).is_none());

        let frameset = snapshot.frame_set(1).unwrap();
        assert_eq!(frameset.name(), "body");
        assert_eq!(frameset.frame_count(), 2);
        assert!(frameset.frame(1).is_none());

        let frame = frameset.frame(0).unwrap();
        assert!(frame.is_visible());
        assert_eq!(frame.width(), 10.5);

        let document = frameset.document().unwrap();
        assert_eq!(document.variable_value("pages"), Some(Variant::UInt(3)));
        assert_eq!(document.to_text(), "x");
        assert_eq!(document.to_html(), "<p>x</p>");
    }

    #[test]
    fn test_toml_snapshot() {
        let toml = r#"
            [[frame_sets]]
            name = "body"

            [[frame_sets.frames]]
            shape_id = "s1"
            z_index = 2
        "#;

        let snapshot = DocumentSnapshot::from_toml(toml).unwrap();
        let frameset = snapshot.frame_set(0).unwrap();
        assert!(frameset.document().is_none());
        assert_eq!(frameset.frame(0).unwrap().z_index(), 2);
    }

    #[test]
    fn test_load_picks_toml_by_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.TOML");
        std::fs::write(
            &path,
            r#"
            [[frame_sets]]
            name = "body"

            [[frame_sets.frames]]
            shape_id = "s1"
            rotation = 45
            width = inf
            "#,
        )
        .unwrap();

        let snapshot = DocumentSnapshot::load(&path).unwrap();
        let frame = snapshot.frame_set(0).unwrap().frame(0).unwrap();
        assert_eq!(frame.shape_id(), "s1");
        assert_eq!(frame.rotation(), 45.0);
        assert_eq!(frame.width(), f64::INFINITY);
    }

    #[test]
    fn test_load_falls_back_to_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.snapshot");
        std::fs::write(&path, r#"{ "frame_sets": [null] }"#).unwrap();

        let snapshot = DocumentSnapshot::load(&path).unwrap();
        assert_eq!(snapshot.frame_set_count(), 1);
        assert!(snapshot.frame_set(0).is_none());
        assert!(DocumentSnapshot::load(&dir.path().join("missing.json")).is_err());
    }

    #[test]
    fn test_non_finite_geometry_survives_json() {
        let mut frame = FrameSnapshot::new("s1").with_geometry(0.0, f64::NEG_INFINITY, f64::INFINITY, 2.0);
        frame.rotation = f64::NAN;
        let snapshot = DocumentSnapshot::new(vec![Some(FrameSetSnapshot {
            name: "body".to_string(),
            frames: vec![Some(frame)],
            document: Some(Arc::new(TextDocumentSnapshot {
                width: f64::INFINITY,
                ..Default::default()
            })),
        })]);

        let json = snapshot.to_json().unwrap();
        assert!(json.contains(r#""width": "inf""#));

        let restored = DocumentSnapshot::from_json(&json).unwrap();
        let frameset = restored.frame_set(0).unwrap();
        let frame = frameset.frame(0).unwrap();
        assert_eq!(frame.width(), f64::INFINITY);
        assert_eq!(frame.position_y(), f64::NEG_INFINITY);
        assert_eq!(frame.height(), 2.0);
        assert!(frame.rotation().is_nan());
        assert_eq!(frameset.document().unwrap().width(), f64::INFINITY);
    }

    #[test]
    fn test_host_accessors_share_snapshot_data() {
        let sample = sample_document();
        let first = sample.frame_set(0).unwrap();
        assert!(Arc::ptr_eq(&first, &sample.frame_set(0).unwrap()));
        assert!(Arc::ptr_eq(&first.document().unwrap(), &first.document().unwrap()));
    }

    #[test]
    fn test_cursor_walks_every_block() {
        let document = TextDocumentSnapshot {
            blocks: vec![
                BlockSnapshot::paragraph("a"),
                BlockSnapshot::table("b"),
                BlockSnapshot::list("c"),
            ],
            ..Default::default()
        };

        let mut cursor = document.first_cursor();
        let mut seen = vec![cursor.context().table.is_some()];
        while cursor.move_next_block() {
            seen.push(cursor.context().table.is_some());
        }
        assert_eq!(seen, vec![false, true, false]);
    }

    #[test]
    fn test_cursor_on_empty_document() {
        let document = TextDocumentSnapshot::default();
        let mut cursor = document.first_cursor();
        assert!(cursor.context().classify().is_none());
        assert!(!cursor.move_next_block());
    }

    #[test]
    fn test_sample_document() {
        let sample = sample_document();
        assert_eq!(sample.frame_set_count(), 2);
        let second = sample.frame_set(1).unwrap();
        assert_eq!(second.name(), "mySecondTextFrame");
        assert!(second.document().unwrap().to_html().starts_with("<h1>Second Header</h1>"));
    }
}
