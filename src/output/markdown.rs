//! Markdown output formatting
//!
//! `MarkdownFormatter` writes the forest as a nested markdown list, one
//! four-space indent per level. Nodes with children are shown in bold.

use std::io;

use crate::tree::{Node, TreeOutput, TreeStats};

use super::config::OutputConfig;
use super::fields;

pub struct MarkdownFormatter {
    config: OutputConfig,
    output: String,
}

impl MarkdownFormatter {
    pub fn new(config: OutputConfig) -> Self {
        Self {
            config,
            output: String::new(),
        }
    }

    /// Get the formatted output string.
    pub fn output(&self) -> &str {
        &self.output
    }

    /// Take ownership of the output string.
    pub fn into_output(self) -> String {
        self.output
    }
}

impl TreeOutput for MarkdownFormatter {
    fn open_block(&mut self, _level: u32, _first: &Node) -> io::Result<()> {
        Ok(())
    }

    fn open_item(&mut self, level: u32, _node: &Node) -> io::Result<()> {
        self.output.push_str(&"    ".repeat(level as usize));
        self.output.push_str("- ");
        Ok(())
    }

    fn content(&mut self, _level: u32, node: &Node) -> io::Result<()> {
        if let Some(numbering) = node.numbering() {
            self.output.push_str(numbering);
            self.output.push(' ');
        }
        let label = fields::label(node, &self.config.columns, self.config.flags);
        if node.has_children() {
            self.output.push_str("**");
            self.output.push_str(&label);
            self.output.push_str("**");
        } else {
            self.output.push_str(&label);
        }
        self.output.push('\n');
        Ok(())
    }

    fn close_item(&mut self, _level: u32) -> io::Result<()> {
        Ok(())
    }

    fn close_block(&mut self, _level: u32) -> io::Result<()> {
        Ok(())
    }

    fn finish(&mut self, stats: &TreeStats) -> io::Result<()> {
        self.output.push_str(&format!(
            "\n*{} nodes, {} roots*\n",
            stats.nodes, stats.roots
        ));
        Ok(())
    }
}

/// Print a finished markdown document to stdout.
pub fn print_markdown(formatter: MarkdownFormatter) {
    print!("{}", formatter.into_output());
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::record;
    use crate::output::flat_rows;
    use crate::record::{Key, Record};
    use crate::tree::{AdjacencyTree, Flags, NodeStore, TreeConfig, emit};
    use serde_json::json;

    fn render(tree: &mut AdjacencyTree) -> String {
        let mut formatter = MarkdownFormatter::new(OutputConfig::new(Flags::NONE));
        emit(tree, &mut formatter).unwrap();
        formatter.into_output()
    }

    #[test]
    fn test_nested_list() {
        let rows = vec![
            record([("id", json!("a")), ("parent", json!("0")), ("name", json!("Animals"))]),
            record([("id", json!("b")), ("parent", json!("a")), ("name", json!("Birds"))]),
            record([("id", json!("c")), ("parent", json!("b")), ("name", json!("Crows"))]),
            record([("id", json!("d")), ("parent", json!("a")), ("name", json!("Dogs"))]),
        ];
        let mut tree = AdjacencyTree::new(rows, TreeConfig::default());
        let mut formatter =
            MarkdownFormatter::new(OutputConfig::new(Flags::NONE).with_columns(vec!["name".into()]));
        emit(&mut tree, &mut formatter).unwrap();

        let expected = "\
- **a  Animals**
    - **b  Birds**
        - c  Crows
    - d  Dogs

*4 nodes, 1 roots*
";
        assert_eq!(formatter.output(), expected);
    }

    #[test]
    fn test_linked_rows_keep_bold_parents() {
        let rows: Vec<Record> = [(1, 0), (2, 1), (3, 1), (4, 2)]
            .iter()
            .map(|&(id, parent)| record([("id", json!(id)), ("parent", json!(parent))]))
            .collect();
        let config = TreeConfig::default().with_root(0);

        let mut direct = AdjacencyTree::new(rows, config.clone());
        direct.linearize().unwrap();
        let sorted = flat_rows(&direct).unwrap();
        let expected = render(&mut direct);
        assert!(expected.starts_with("- **1**\n    - **2**\n"));

        let store = NodeStore::from_linked(sorted, "id", "parent", "next", &Key::Int(0)).unwrap();
        let mut relinked = AdjacencyTree::from_store(store, config);
        assert_eq!(render(&mut relinked), expected);
    }
}
