//! Descendant-count propagation

use std::collections::HashSet;

use crate::error::{CycleKind, TreeError};
use crate::record::Key;

use super::node::NodeId;
use super::store::NodeStore;

/// Walk from `start` up through its ancestors, adding one to each
/// ancestor's descendant count, until the root sentinel is reached.
///
/// Ancestors are resolved through the index lookup because they may not have
/// been linked yet. The visited set lives only for this walk.
pub(crate) fn propagate(
    store: &mut NodeStore,
    start: NodeId,
    root: &Key,
    debug: bool,
) -> Result<(), TreeError> {
    let mut walk = HashSet::new();
    walk.insert(start);
    let mut branch = Vec::new();
    if debug {
        branch.push(store.node(start).index.clone());
    }

    let mut current = start;
    loop {
        let node = store.node(current);
        if node.parent == *root {
            return Ok(());
        }
        let parent = store.get(&node.parent).ok_or_else(|| TreeError::Orphan {
            node: node.index.clone(),
            missing_parent: node.parent.clone(),
        })?;

        if debug {
            branch.push(store.node(parent).index.clone());
        }
        if !walk.insert(parent) {
            return Err(TreeError::cycle(
                CycleKind::DescendantWalk,
                store.node(parent).index.clone(),
                branch,
            ));
        }

        store.node_mut(parent).descendants_count += 1;
        current = parent;
    }
}
