use crate::page::PropertyTable;
use tabled::{settings::Style, Table, Tabled};

#[derive(Tabled)]
pub struct TableRow {
    #[tabled(rename = "Name")]
    pub name: String,
    #[tabled(rename = "Value")]
    pub value: String,
}

pub struct TableBuilder {
    rows: Vec<TableRow>,
}

impl Default for TableBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl TableBuilder {
    pub fn new() -> Self {
        Self { rows: Vec::new() }
    }

    pub fn add_row(&mut self, name: &str, value: &str) {
        self.rows.push(TableRow {
            name: name.to_string(),
            value: value.to_string(),
        });
    }

    pub fn build(&self) -> String {
        if self.rows.is_empty() {
            return String::new();
        }

        Table::new(&self.rows).with(Style::rounded()).to_string()
    }
}

/// Render a property page as a two-column Name/Value table
pub fn property_table(table: &PropertyTable) -> String {
    let mut builder = TableBuilder::new();
    for property in table.properties() {
        builder.add_row(&property.name, &property.value);
    }
    builder.build()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_table_renders_nothing() {
        assert_eq!(property_table(&PropertyTable::new()), "");
    }

    #[test]
    fn test_rows_in_order() {
        let table = PropertyTable::new().with("width", 400).with("height", 240);
        let rendered = property_table(&table);
        assert!(rendered.contains("Name"));
        let width = rendered.find("width").unwrap();
        let height = rendered.find("height").unwrap();
        assert!(width < height);
    }
}
