//! JSON output formatting
//!
//! Two shapes: a nested tree of [`JsonNode`]s, and the flat list of rows in
//! pre-order with the computed columns added.

use std::io;

use serde::Serialize;

use crate::error::TreeError;
use crate::record::Record;
use crate::tree::{AdjacencyTree, Flags, Node, TreeOutput, TreeStats};

use super::fields;

/// One node of the nested JSON tree.
///
/// The row's own columns are flattened into the object; a computed or row
/// column named `children` is dropped in favour of the child list.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JsonNode {
    #[serde(flatten)]
    pub row: Record,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<JsonNode>,
}

/// Collects the nested JSON tree while the walk streams nodes.
#[derive(Debug, Default)]
pub struct JsonFormatter {
    flags: Flags,
    roots: Vec<JsonNode>,
    open: Vec<JsonNode>,
}

impl JsonFormatter {
    pub fn new(flags: Flags) -> Self {
        Self {
            flags,
            ..Default::default()
        }
    }

    pub fn into_roots(self) -> Vec<JsonNode> {
        self.roots
    }
}

impl TreeOutput for JsonFormatter {
    fn open_block(&mut self, _level: u32, _first: &Node) -> io::Result<()> {
        Ok(())
    }

    fn open_item(&mut self, _level: u32, node: &Node) -> io::Result<()> {
        let mut row = fields::flat_row(node, self.flags);
        row.remove("children");
        self.open.push(JsonNode {
            row,
            children: Vec::new(),
        });
        Ok(())
    }

    fn content(&mut self, _level: u32, _node: &Node) -> io::Result<()> {
        Ok(())
    }

    fn close_item(&mut self, _level: u32) -> io::Result<()> {
        if let Some(done) = self.open.pop() {
            match self.open.last_mut() {
                Some(parent) => parent.children.push(done),
                None => self.roots.push(done),
            }
        }
        Ok(())
    }

    fn close_block(&mut self, _level: u32) -> io::Result<()> {
        Ok(())
    }

    fn finish(&mut self, _stats: &TreeStats) -> io::Result<()> {
        Ok(())
    }
}

/// Rows of a linearized tree in pre-order, computed columns included.
pub fn flat_rows(tree: &AdjacencyTree) -> Result<Vec<Record>, TreeError> {
    let flags = tree.config().flags;
    Ok(tree
        .to_sorted_sequence()?
        .into_iter()
        .map(|node| fields::flat_row(node, flags))
        .collect())
}

/// Print any serializable value as pretty-printed JSON to stdout.
pub fn print_json<T: Serialize + ?Sized>(value: &T) -> io::Result<()> {
    let json = serde_json::to_string_pretty(value).map_err(io::Error::other)?;
    println!("{}", json);
    Ok(())
}
