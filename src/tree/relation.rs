//! RelationBuilder - child/sibling links from parent pointers

use log::debug;

use crate::error::TreeError;
use crate::record::Key;

use super::config::Flags;
use super::descendants;
use super::node::NodeId;
use super::store::NodeStore;

/// Link every node to its parent and siblings in one pass over source order.
///
/// Sets first/last child, next sibling, resolved parent and children count
/// for all nodes; child numbers and descendant counts when the flags ask for
/// them. Every node is checked for a missing parent, so an orphan anywhere in
/// the source is reported.
///
/// Returns the first root in source order, or `None` if no row has `root` as
/// its parent.
pub(crate) fn link(
    store: &mut NodeStore,
    root: &Key,
    flags: Flags,
) -> Result<Option<NodeId>, TreeError> {
    let number = flags.contains(Flags::NUMBER_NODES);
    let count_descendants = flags.contains(Flags::COUNT_DESCENDANTS);
    let debug_mode = flags.contains(Flags::DEBUG_MODE);

    let mut first_root = None;
    let mut previous_root: Option<NodeId> = None;

    for id in 0..store.len() {
        let id = NodeId(id);
        let node = store.node(id);

        if node.parent == *root {
            let child_number = match previous_root {
                Some(prev) => {
                    store.node_mut(prev).next_sibling = Some(id);
                    store.node(prev).child_number + 1
                }
                None => {
                    first_root = Some(id);
                    1
                }
            };
            if number {
                store.node_mut(id).child_number = child_number;
            }
            previous_root = Some(id);
            continue;
        }

        let parent = store.get(&node.parent).ok_or_else(|| TreeError::Orphan {
            node: node.index.clone(),
            missing_parent: node.parent.clone(),
        })?;

        let last_child = store.node(parent).last_child;
        let child_number = match last_child {
            None => {
                let p = store.node_mut(parent);
                p.first_child = Some(id);
                p.last_child = Some(id);
                1
            }
            Some(last) => {
                store.node_mut(last).next_sibling = Some(id);
                store.node_mut(parent).last_child = Some(id);
                store.node(last).child_number + 1
            }
        };

        let this = store.node_mut(id);
        this.parent_id = Some(parent);
        if number {
            this.child_number = child_number;
        }
        store.node_mut(parent).children_count += 1;

        if count_descendants {
            descendants::propagate(store, id, root, debug_mode)?;
        }
    }

    debug!(
        "linked {} nodes, first root {:?}",
        store.len(),
        first_root.map(|id| store.node(id).index())
    );
    Ok(first_root)
}
