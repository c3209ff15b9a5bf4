//! Pages - labeled display units attached to tree nodes
//!
//! Every page is one of three kinds, and each kind maps to exactly one
//! editor kind in the view layer:
//! - `Properties`: a two-column name/value table
//! - `PlainText`: a read-only plain text view
//! - `RichText`: a read-only rich text (markup) view

use serde::{Deserialize, Serialize};
use std::fmt;

/// A single name/value row of a property table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Property {
    pub name: String,
    pub value: String,
}

impl Property {
    pub fn new(name: impl Into<String>, value: impl fmt::Display) -> Self {
        Self {
            name: name.into(),
            value: value.to_string(),
        }
    }
}

/// Ordered name/value pairs. Rows may be appended after construction.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropertyTable {
    properties: Vec<Property>,
}

impl PropertyTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a property row
    pub fn add_property(&mut self, property: Property) {
        self.properties.push(property);
    }

    /// Builder-style append
    pub fn with(mut self, name: impl Into<String>, value: impl fmt::Display) -> Self {
        self.add_property(Property::new(name, value));
        self
    }

    pub fn properties(&self) -> &[Property] {
        &self.properties
    }

    pub fn len(&self) -> usize {
        self.properties.len()
    }

    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }

    /// Value of the first property called `name`
    pub fn get(&self, name: &str) -> Option<&str> {
        self.properties
            .iter()
            .find(|p| p.name == name)
            .map(|p| p.value.as_str())
    }
}

/// Page payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "content", rename_all = "snake_case")]
pub enum PageContent {
    Properties(PropertyTable),
    PlainText(String),
    RichText(String),
}

/// The editor kind a view layer instantiates for a page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EditorKind {
    Table,
    PlainText,
    RichText,
}

impl EditorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EditorKind::Table => "table",
            EditorKind::PlainText => "plain_text",
            EditorKind::RichText => "rich_text",
        }
    }
}

impl fmt::Display for EditorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A labeled display unit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page {
    pub label: String,
    #[serde(flatten)]
    pub content: PageContent,
}

impl Page {
    pub fn properties(label: impl Into<String>, table: PropertyTable) -> Self {
        Self {
            label: label.into(),
            content: PageContent::Properties(table),
        }
    }

    pub fn plain_text(label: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            content: PageContent::PlainText(text.into()),
        }
    }

    pub fn rich_text(label: impl Into<String>, markup: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            content: PageContent::RichText(markup.into()),
        }
    }

    pub fn editor_kind(&self) -> EditorKind {
        match self.content {
            PageContent::Properties(_) => EditorKind::Table,
            PageContent::PlainText(_) => EditorKind::PlainText,
            PageContent::RichText(_) => EditorKind::RichText,
        }
    }

    /// Append a row to a property page. Returns `false` for text pages.
    pub fn add_property(&mut self, property: Property) -> bool {
        match &mut self.content {
            PageContent::Properties(table) => {
                table.add_property(property);
                true
            }
            _ => false,
        }
    }

    pub fn property_table(&self) -> Option<&PropertyTable> {
        match &self.content {
            PageContent::Properties(table) => Some(table),
            _ => None,
        }
    }

    /// Text of a plain or rich text page
    pub fn text(&self) -> Option<&str> {
        match &self.content {
            PageContent::PlainText(text) | PageContent::RichText(text) => Some(text),
            PageContent::Properties(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_property_page_then_append() {
        let mut page = Page::properties("Variables", PropertyTable::new());
        assert_eq!(page.property_table().unwrap().len(), 0);

        assert!(page.add_property(Property::new("author", "Jane")));

        let table = page.property_table().unwrap();
        assert_eq!(table.properties(), &[Property::new("author", "Jane")]);
    }

    #[test]
    fn test_text_page_rejects_properties() {
        let mut page = Page::plain_text("Text", "hello");
        assert!(!page.add_property(Property::new("a", "b")));
        assert_eq!(page.text(), Some("hello"));
    }

    #[test]
    fn test_editor_kinds() {
        assert_eq!(Page::properties("P", PropertyTable::new()).editor_kind(), EditorKind::Table);
        assert_eq!(Page::plain_text("T", "").editor_kind(), EditorKind::PlainText);
        assert_eq!(Page::rich_text("R", "<p/>").editor_kind(), EditorKind::RichText);
    }

    #[test]
    fn test_property_values_use_display() {
        let table = PropertyTable::new().with("visible", true).with("rotation", 0.5);
        assert_eq!(table.get("visible"), Some("true"));
        assert_eq!(table.get("rotation"), Some("0.5"));
        assert_eq!(table.get("missing"), None);
    }
}
