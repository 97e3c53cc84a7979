//! Arena nodes and their handles

use serde_json::Value;

use crate::record::{Key, Record};

/// Handle of a node inside a [`NodeStore`](super::NodeStore).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) usize);

impl NodeId {
    /// Position of the node's row in the source order.
    pub fn index(self) -> usize {
        self.0
    }
}

/// One source row plus the structural state derived from it.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub(crate) record: Record,
    pub(crate) index: Key,
    pub(crate) parent: Key,
    pub(crate) parent_id: Option<NodeId>,
    pub(crate) first_child: Option<NodeId>,
    pub(crate) last_child: Option<NodeId>,
    pub(crate) next_sibling: Option<NodeId>,
    pub(crate) next: Option<NodeId>,
    pub(crate) next_index: Option<Key>,
    pub(crate) children_count: u32,
    pub(crate) descendants_count: u32,
    pub(crate) level: u32,
    pub(crate) child_number: u32,
    pub(crate) numbering: Option<String>,
}

impl Node {
    pub(crate) fn new(record: Record, index: Key, parent: Key) -> Self {
        Self {
            record,
            index,
            parent,
            parent_id: None,
            first_child: None,
            last_child: None,
            next_sibling: None,
            next: None,
            next_index: None,
            children_count: 0,
            descendants_count: 0,
            level: 0,
            child_number: 0,
            numbering: None,
        }
    }

    /// The source row.
    pub fn record(&self) -> &Record {
        &self.record
    }

    /// A column of the source row.
    pub fn get(&self, column: &str) -> Option<&Value> {
        self.record.get(column)
    }

    pub fn index(&self) -> &Key {
        &self.index
    }

    pub fn parent(&self) -> &Key {
        &self.parent
    }

    /// The resolved parent, `None` for roots (or before linking).
    pub fn parent_id(&self) -> Option<NodeId> {
        self.parent_id
    }

    pub fn first_child(&self) -> Option<NodeId> {
        self.first_child
    }

    pub fn last_child(&self) -> Option<NodeId> {
        self.last_child
    }

    pub fn next_sibling(&self) -> Option<NodeId> {
        self.next_sibling
    }

    /// Pre-order successor.
    pub fn next(&self) -> Option<NodeId> {
        self.next
    }

    /// Index value of the pre-order successor.
    pub fn next_index(&self) -> Option<&Key> {
        self.next_index.as_ref()
    }

    pub fn children_count(&self) -> u32 {
        self.children_count
    }

    pub fn descendants_count(&self) -> u32 {
        self.descendants_count
    }

    /// Depth below a root; roots are level 0.
    pub fn level(&self) -> u32 {
        self.level
    }

    /// 1-based position among siblings, 0 when numbering is off.
    pub fn child_number(&self) -> u32 {
        self.child_number
    }

    /// Hierarchical label such as `1.2.3`.
    pub fn numbering(&self) -> Option<&str> {
        self.numbering.as_deref()
    }

    pub fn has_children(&self) -> bool {
        self.children_count > 0
    }

    pub fn is_last_sibling(&self) -> bool {
        self.next_sibling.is_none()
    }
}
