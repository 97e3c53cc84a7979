//! NodeStore - arena of nodes built from flat rows

use std::collections::HashMap;

use log::debug;
use serde_json::Value;

use crate::error::{CycleKind, TreeError};
use crate::record::{Key, Record};

use super::node::{Node, NodeId};

/// Owns every node of one tree, in source row order.
///
/// Structural links between nodes are [`NodeId`] handles into the arena, so
/// the traversal order lives in the `next` chain, never in the arena order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NodeStore {
    nodes: Vec<Node>,
    lookup: HashMap<Key, NodeId>,
    index_field: String,
    parent_field: String,
}

impl NodeStore {
    /// Copy `records` into a fresh arena with empty structural fields.
    ///
    /// Only the first row is checked for the index and parent columns; a later
    /// row lacking them fails with [`TreeError::InvalidKey`].
    pub fn build(
        records: Vec<Record>,
        index_field: &str,
        parent_field: &str,
    ) -> Result<Self, TreeError> {
        let first = records.first().ok_or(TreeError::EmptySource)?;
        for field in [index_field, parent_field] {
            if !first.contains_key(field) {
                return Err(TreeError::Schema {
                    field: field.to_string(),
                });
            }
        }

        let mut nodes = Vec::with_capacity(records.len());
        let mut lookup = HashMap::with_capacity(records.len());

        for (row, record) in records.into_iter().enumerate() {
            let index = read_key(&record, index_field, row)?;
            let parent = read_key(&record, parent_field, row)?;
            let id = NodeId(nodes.len());
            if lookup.insert(index.lookup_form().into_owned(), id).is_some() {
                return Err(TreeError::DuplicateIndex { index });
            }
            nodes.push(Node::new(record, index, parent));
        }

        debug!("node store built with {} nodes", nodes.len());

        Ok(Self {
            nodes,
            lookup,
            index_field: index_field.to_string(),
            parent_field: parent_field.to_string(),
        })
    }

    /// Build a store from rows that were already linearized elsewhere.
    ///
    /// `next_field` holds each row's pre-order successor (`null` or absent on
    /// the last row). The `level`, `children`, `descendants`, `child_number`
    /// and `numbering` columns are read when present. Child and sibling links
    /// are recovered from the `next` chain starting at the first root.
    ///
    /// Only references are resolved here; the rows are trusted to describe a
    /// valid forest.
    pub fn from_linked(
        records: Vec<Record>,
        index_field: &str,
        parent_field: &str,
        next_field: &str,
        root: &Key,
    ) -> Result<Self, TreeError> {
        if let Some(first) = records.first() {
            if !first.contains_key(next_field) {
                return Err(TreeError::Schema {
                    field: next_field.to_string(),
                });
            }
        }

        let mut store = Self::build(records, index_field, parent_field)?;

        for i in 0..store.nodes.len() {
            let id = NodeId(i);
            let node = &store.nodes[i];

            let parent_id = if node.parent == *root {
                None
            } else {
                Some(store.get(&node.parent).ok_or_else(|| TreeError::Orphan {
                    node: node.index.clone(),
                    missing_parent: node.parent.clone(),
                })?)
            };

            let next_index = match node.record.get(next_field).map(Key::from_value) {
                None | Some(None) | Some(Some(Key::Null)) => None,
                Some(Some(key)) => Some(key),
            };
            let next = match &next_index {
                None => None,
                Some(key) => Some(store.get(key).ok_or_else(|| TreeError::DanglingNext {
                    node: node.index.clone(),
                    next: key.clone(),
                })?),
            };

            let level = read_count(&node.record, "level");
            let children = read_count(&node.record, "children");
            let descendants = read_count(&node.record, "descendants");
            let child_number = read_count(&node.record, "child_number");
            let numbering = node
                .record
                .get("numbering")
                .and_then(Value::as_str)
                .map(str::to_string);

            let node = store.node_mut(id);
            node.parent_id = parent_id;
            node.next = next;
            node.next_index = next_index;
            node.level = level;
            node.children_count = children;
            node.descendants_count = descendants;
            node.child_number = child_number;
            node.numbering = numbering;
        }

        store.relink_from_chain(root)?;
        Ok(store)
    }

    /// Rebuild child/sibling links and children counts by following `next`
    /// from the first root.
    ///
    /// Nodes the chain reaches get their counts from the chain; the
    /// `children` column only stays in effect for nodes it never reaches.
    fn relink_from_chain(&mut self, root: &Key) -> Result<(), TreeError> {
        let mut seen = vec![false; self.nodes.len()];
        let mut counts = vec![0u32; self.nodes.len()];
        let mut last_root: Option<NodeId> = None;
        let mut cursor = self.first_root(root);

        while let Some(id) = cursor {
            if std::mem::replace(&mut seen[id.0], true) {
                return Err(TreeError::cycle(
                    CycleKind::Readded,
                    self.nodes[id.0].index.clone(),
                    Vec::new(),
                ));
            }

            match self.nodes[id.0].parent_id {
                None => {
                    if let Some(prev) = last_root {
                        self.nodes[prev.0].next_sibling = Some(id);
                    }
                    last_root = Some(id);
                }
                Some(parent) => {
                    match self.nodes[parent.0].last_child {
                        None => self.nodes[parent.0].first_child = Some(id),
                        Some(last) => self.nodes[last.0].next_sibling = Some(id),
                    }
                    self.nodes[parent.0].last_child = Some(id);
                    counts[parent.0] += 1;
                }
            }

            cursor = self.nodes[id.0].next;
        }

        for (node, (reached, count)) in self.nodes.iter_mut().zip(seen.into_iter().zip(counts)) {
            if reached {
                node.children_count = count;
            }
        }
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// # Panics
    /// If `id` does not belong to this store.
    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    pub(crate) fn node_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id.0]
    }

    /// Look up a node by its index value.
    ///
    /// `"7"` and `7` find the same node; see [`Key::lookup_form`].
    pub fn get(&self, index: &Key) -> Option<NodeId> {
        self.lookup.get(index.lookup_form().as_ref()).copied()
    }

    pub fn find(&self, index: &Key) -> Option<&Node> {
        self.get(index).map(|id| self.node(id))
    }

    /// All node ids in source row order.
    pub fn ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        (0..self.nodes.len()).map(NodeId)
    }

    /// All nodes in source row order.
    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &Node)> {
        self.nodes.iter().enumerate().map(|(i, n)| (NodeId(i), n))
    }

    /// The first row, in source order, whose parent is `root`.
    pub fn first_root(&self, root: &Key) -> Option<NodeId> {
        self.nodes
            .iter()
            .position(|n| n.parent == *root)
            .map(NodeId)
    }

    /// Count of nodes whose parent is `root`.
    pub fn root_count(&self, root: &Key) -> usize {
        self.nodes.iter().filter(|n| n.parent == *root).count()
    }

    pub fn index_field(&self) -> &str {
        &self.index_field
    }

    pub fn parent_field(&self) -> &str {
        &self.parent_field
    }

    /// Drop the structural state and hand the rows back in source order.
    pub fn into_records(self) -> Vec<Record> {
        self.nodes.into_iter().map(|n| n.record).collect()
    }
}

fn read_key(record: &Record, field: &str, row: usize) -> Result<Key, TreeError> {
    record
        .get(field)
        .and_then(Key::from_value)
        .ok_or_else(|| TreeError::InvalidKey {
            row,
            field: field.to_string(),
        })
}

fn read_count(record: &Record, field: &str) -> u32 {
    record
        .get(field)
        .and_then(Value::as_u64)
        .and_then(|v| u32::try_from(v).ok())
        .unwrap_or(0)
}
