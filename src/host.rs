//! Host document interfaces
//!
//! The document tree never owns or mutates the host document. It reads the
//! host's object graph through these traits:
//! - `HostDocument`: the top-level collection of frame sets
//! - `HostFrameSet` / `HostFrame`: structural units and their frames
//! - `HostTextDocument` + `TextCursor`: block-by-block walk of rich text
//! - `HostTextTable` / `HostTextList` / `HostTextFrame`: block structures
//!
//! Collection getters return `Option` since host collections may be sparse.

use crate::variant::Variant;
use std::sync::Arc;

/// The host application's document.
pub trait HostDocument: Send + Sync {
    /// Number of entries in the top-level frame set collection
    fn frame_set_count(&self) -> usize;

    /// Frame set at `index`, `None` for an absent entry
    fn frame_set(&self, index: usize) -> Option<Arc<dyn HostFrameSet>>;
}

/// A group of frames sharing one content flow.
pub trait HostFrameSet: Send + Sync {
    fn name(&self) -> String;

    fn frame_count(&self) -> usize;

    fn frame(&self, index: usize) -> Option<Arc<dyn HostFrame>>;

    /// The text document of a text frame set, `None` for other frame sets
    fn document(&self) -> Option<Arc<dyn HostTextDocument>>;
}

/// A single positioned frame (shape) of a frame set.
pub trait HostFrame: Send + Sync {
    fn shape_id(&self) -> String;
    fn is_visible(&self) -> bool;
    fn rotation(&self) -> f64;
    fn width(&self) -> f64;
    fn height(&self) -> f64;
    fn position_x(&self) -> f64;
    fn position_y(&self) -> f64;
    fn z_index(&self) -> i64;
}

/// A rich text document.
pub trait HostTextDocument: Send + Sync {
    fn width(&self) -> f64;
    fn height(&self) -> f64;
    fn page_count(&self) -> usize;
    fn is_modified(&self) -> bool;

    /// Names of the variables bound in this document, in host order
    fn variable_names(&self) -> Vec<String>;

    fn variable_value(&self, name: &str) -> Option<Variant>;

    fn to_text(&self) -> String;
    fn to_html(&self) -> String;
    fn default_style_sheet(&self) -> String;

    /// A cursor positioned at the first block of the root frame
    fn first_cursor(&self) -> Box<dyn TextCursor + '_>;
}

/// A cursor walking the blocks of a text document.
pub trait TextCursor {
    /// Structures enclosing the block under the cursor
    fn context(&self) -> BlockContext;

    /// Advance to the next block, `false` at the end of the document
    fn move_next_block(&mut self) -> bool;
}

/// What encloses the block under a cursor. Any combination may be present.
#[derive(Clone, Default)]
pub struct BlockContext {
    pub table: Option<Arc<dyn HostTextTable>>,
    pub list: Option<Arc<dyn HostTextList>>,
    pub frame: Option<Arc<dyn HostTextFrame>>,
}

/// The single structure a block is filed under.
#[derive(Clone)]
pub enum BlockStructure {
    Table(Arc<dyn HostTextTable>),
    List(Arc<dyn HostTextList>),
    Frame(Arc<dyn HostTextFrame>),
}

impl BlockContext {
    /// Classify the block: table over list over frame, first match wins.
    ///
    /// Returns `None` for a block with no enclosing structure.
    pub fn classify(self) -> Option<BlockStructure> {
        match self {
            BlockContext { table: Some(table), .. } => Some(BlockStructure::Table(table)),
            BlockContext { list: Some(list), .. } => Some(BlockStructure::List(list)),
            BlockContext { frame: Some(frame), .. } => Some(BlockStructure::Frame(frame)),
            _ => None,
        }
    }
}

pub trait HostTextTable: Send + Sync {
    fn text(&self) -> Option<String>;
}

pub trait HostTextList: Send + Sync {
    fn text(&self) -> Option<String>;
}

/// A frame nested inside a text document's frame hierarchy.
pub trait HostTextFrame: Send + Sync {
    fn text(&self) -> Option<String>;

    fn child_frame_count(&self) -> usize;

    fn child_frame(&self, index: usize) -> Option<Arc<dyn HostTextFrame>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Stub(&'static str);

    impl HostTextTable for Stub {
        fn text(&self) -> Option<String> {
            Some(self.0.to_string())
        }
    }

    impl HostTextList for Stub {
        fn text(&self) -> Option<String> {
            Some(self.0.to_string())
        }
    }

    impl HostTextFrame for Stub {
        fn text(&self) -> Option<String> {
            Some(self.0.to_string())
        }
        fn child_frame_count(&self) -> usize {
            0
        }
        fn child_frame(&self, _index: usize) -> Option<Arc<dyn HostTextFrame>> {
            None
        }
    }

    fn full_context() -> BlockContext {
        BlockContext {
            table: Some(Arc::new(Stub("table"))),
            list: Some(Arc::new(Stub("list"))),
            frame: Some(Arc::new(Stub("frame"))),
        }
    }

    #[test]
    fn test_table_wins_over_list_and_frame() {
        assert!(matches!(full_context().classify(), Some(BlockStructure::Table(_))));
    }

    #[test]
    fn test_list_wins_over_frame() {
        let context = BlockContext { table: None, ..full_context() };
        assert!(matches!(context.classify(), Some(BlockStructure::List(_))));
    }

    #[test]
    fn test_frame_alone() {
        let context = BlockContext {
            frame: Some(Arc::new(Stub("frame"))),
            ..Default::default()
        };
        assert!(matches!(context.classify(), Some(BlockStructure::Frame(_))));
    }

    #[test]
    fn test_empty_context_is_unclassified() {
        assert!(BlockContext::default().classify().is_none());
    }
}
