//! Linearizer - the pre-order `next` chain
//!
//! [`PreorderCursor`] computes the successor of each node from the child and
//! sibling links, one node at a time. Running it to exhaustion is the
//! two-pass linearization; driving it from a renderer is the fused one. Both
//! write the same `next`, `level` and `numbering` values.

use std::collections::HashSet;

use log::debug;

use crate::error::{CycleKind, TreeError};
use crate::numbering::Numberer;

use super::node::NodeId;
use super::store::NodeStore;

pub(crate) struct PreorderCursor<'a> {
    store: &'a mut NodeStore,
    numberer: Option<&'a Numberer>,
    debug: bool,
    /// Nodes already appended to the traversal.
    added: Vec<bool>,
    /// Nodes passed while climbing towards an ancestor's sibling.
    climbed: HashSet<NodeId>,
    /// Visited but not yet yielded; its level and numbering are set.
    pending: Option<NodeId>,
    visited: usize,
    levels: u32,
}

impl<'a> PreorderCursor<'a> {
    pub(crate) fn new(
        store: &'a mut NodeStore,
        first_root: Option<NodeId>,
        numberer: Option<&'a Numberer>,
        debug: bool,
    ) -> Result<Self, TreeError> {
        let len = store.len();
        let mut cursor = Self {
            store,
            numberer,
            debug,
            added: vec![false; len],
            climbed: HashSet::new(),
            pending: None,
            visited: 0,
            levels: 0,
        };
        if let Some(root) = first_root {
            cursor.visit(root, 0, None)?;
            cursor.pending = Some(root);
        }
        Ok(cursor)
    }

    /// Yield the next node in pre-order.
    ///
    /// The successor is computed before the node is handed out, so the
    /// yielded node's `next` is already final.
    pub(crate) fn advance(&mut self) -> Result<Option<NodeId>, TreeError> {
        let Some(current) = self.pending else {
            return Ok(None);
        };

        let successor = self.successor(current)?;
        match successor {
            Some((next, level)) => self.visit(next, level, Some(current))?,
            None => self.check_detached()?,
        }

        let next = successor.map(|(id, _)| id);
        let next_index = next.map(|id| self.store.node(id).index.clone());
        let node = self.store.node_mut(current);
        node.next = next;
        node.next_index = next_index;
        self.pending = next;
        Ok(Some(current))
    }

    pub(crate) fn store(&self) -> &NodeStore {
        &*self.store
    }

    /// Deepest level visited so far.
    pub(crate) fn levels(&self) -> u32 {
        self.levels
    }

    #[cfg(test)]
    pub(crate) fn visited(&self) -> usize {
        self.visited
    }

    fn visit(
        &mut self,
        id: NodeId,
        level: u32,
        previous: Option<NodeId>,
    ) -> Result<(), TreeError> {
        if std::mem::replace(&mut self.added[id.0], true) {
            let mut branch = Vec::new();
            if self.debug {
                branch.extend(previous.map(|p| self.store.node(p).index.clone()));
                branch.push(self.store.node(id).index.clone());
            }
            return Err(TreeError::cycle(
                CycleKind::Readded,
                self.store.node(id).index.clone(),
                branch,
            ));
        }

        let numbering = self.numberer.map(|numberer| {
            let node = self.store.node(id);
            let parent = node
                .parent_id
                .and_then(|p| self.store.node(p).numbering.as_deref());
            numberer.format(level, node.child_number, parent)
        });

        let node = self.store.node_mut(id);
        node.level = level;
        if numbering.is_some() {
            node.numbering = numbering;
        }
        self.levels = self.levels.max(level);
        self.visited += 1;
        Ok(())
    }

    /// Descend to the first child, move across to the next sibling, or climb
    /// to the nearest ancestor that has one.
    fn successor(&mut self, current: NodeId) -> Result<Option<(NodeId, u32)>, TreeError> {
        let node = self.store.node(current);
        if let Some(child) = node.first_child {
            return Ok(Some((child, node.level + 1)));
        }
        if let Some(sibling) = node.next_sibling {
            return Ok(Some((sibling, node.level)));
        }
        self.climb(current)
    }

    fn climb(&mut self, from: NodeId) -> Result<Option<(NodeId, u32)>, TreeError> {
        let mut branch = Vec::new();
        let mut id = from;
        let mut level = self.store.node(from).level;

        loop {
            let node = self.store.node(id);
            if self.debug {
                branch.push(node.index.clone());
            }
            if !self.climbed.insert(id) {
                return Err(TreeError::cycle(
                    CycleKind::UpWalk,
                    node.index.clone(),
                    branch,
                ));
            }
            if let Some(sibling) = node.next_sibling {
                return Ok(Some((sibling, level)));
            }
            match node.parent_id {
                Some(parent) => {
                    id = parent;
                    level = level.saturating_sub(1);
                }
                None => return Ok(None),
            }
        }
    }

    fn check_detached(&self) -> Result<(), TreeError> {
        if self.visited == self.store.len() {
            return Ok(());
        }
        debug!(
            "traversal reached {} of {} nodes, searching for a detached cycle",
            self.visited,
            self.store.len()
        );
        match find_parent_cycle(&*self.store, &self.added, self.debug) {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

/// Find a parent cycle among the nodes not marked in `reached`.
///
/// Walks the resolved parent chain of every unreached node in source order;
/// the first node met twice on one chain is reported.
pub(crate) fn find_parent_cycle(
    store: &NodeStore,
    reached: &[bool],
    debug: bool,
) -> Option<TreeError> {
    let mut explored = vec![false; store.len()];

    for start in store.ids().filter(|id| !reached[id.0]) {
        let mut chain = HashSet::new();
        let mut branch = Vec::new();
        let mut id = start;

        loop {
            if explored[id.0] && !chain.contains(&id) {
                break;
            }
            let node = store.node(id);
            if debug {
                branch.push(node.index.clone());
            }
            if !chain.insert(id) {
                return Some(TreeError::cycle(
                    CycleKind::Detached,
                    node.index.clone(),
                    branch,
                ));
            }
            explored[id.0] = true;
            match node.parent_id {
                Some(parent) => id = parent,
                None => break,
            }
        }
    }
    None
}
