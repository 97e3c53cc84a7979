//! TraversalDriver - runs the build phases in order and exposes the result
//!
//! [`AdjacencyTree`] owns the source rows and the derived [`NodeStore`]. Each
//! phase runs its prerequisites first and is a no-op once done, so callers
//! can simply ask for what they need.

use log::debug;
use serde::Serialize;

use crate::error::TreeError;
use crate::record::{Key, Record};

use super::config::{LinkingStrategy, TreeConfig};
use super::linearize::{self, PreorderCursor};
use super::node::{Node, NodeId};
use super::relation;
use super::store::NodeStore;

/// Summary counts for a linearized tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct TreeStats {
    pub nodes: usize,
    pub roots: usize,
    /// Deepest level; a flat list has 0.
    pub levels: u32,
}

#[derive(Debug, Clone)]
pub struct AdjacencyTree {
    config: TreeConfig,
    source: Vec<Record>,
    store: NodeStore,
    first_root: Option<NodeId>,
    levels: u32,
    base_built: bool,
    relation_built: bool,
    linearized: bool,
}

impl AdjacencyTree {
    pub fn new(records: Vec<Record>, config: TreeConfig) -> Self {
        Self {
            config,
            source: records,
            store: NodeStore::default(),
            first_root: None,
            levels: 0,
            base_built: false,
            relation_built: false,
            linearized: false,
        }
    }

    /// Wrap a store whose rows are already linked and linearized.
    ///
    /// All three phases count as done; nothing is validated.
    pub fn from_store(store: NodeStore, config: TreeConfig) -> Self {
        let first_root = store.first_root(&config.root);
        let levels = store.iter().map(|(_, n)| n.level).max().unwrap_or(0);
        Self {
            config,
            source: Vec::new(),
            store,
            first_root,
            levels,
            base_built: true,
            relation_built: true,
            linearized: true,
        }
    }

    /// Replace the source rows and discard everything derived from the old ones.
    pub fn set_source(&mut self, records: Vec<Record>) {
        self.source = records;
        self.reset();
    }

    fn reset(&mut self) {
        self.store = NodeStore::default();
        self.first_root = None;
        self.levels = 0;
        self.base_built = false;
        self.relation_built = false;
        self.linearized = false;
    }

    pub fn build(&mut self) -> Result<(), TreeError> {
        if self.base_built {
            return Ok(());
        }
        self.store = NodeStore::build(
            self.source.clone(),
            &self.config.index_field,
            &self.config.parent_field,
        )?;
        self.base_built = true;
        Ok(())
    }

    /// Build if needed, then compute child/sibling relations.
    ///
    /// A failed link leaves the tree unbuilt, so a retry starts from the rows.
    pub fn link(&mut self) -> Result<(), TreeError> {
        if self.relation_built {
            return Ok(());
        }
        self.build()?;

        let result = relation::link(&mut self.store, &self.config.root, self.config.flags)
            .map_err(|err| self.rootless_orphan(err))
            .and_then(|first| first.ok_or_else(|| self.no_root_error()));
        match result {
            Ok(first) => {
                self.first_root = Some(first);
                self.relation_built = true;
                Ok(())
            }
            Err(err) => {
                self.reset();
                Err(err)
            }
        }
    }

    /// With no root at all, a missing parent usually means the sentinel has
    /// the wrong type, so that is reported instead of the first orphan.
    fn rootless_orphan(&self, err: TreeError) -> TreeError {
        match err {
            TreeError::Orphan { .. } if self.store.root_count(&self.config.root) == 0 => {
                TreeError::NoRootFound {
                    root: self.config.root.clone(),
                }
            }
            other => other,
        }
    }

    /// Without a root every node has an existing parent, so the parent
    /// pointers must loop somewhere.
    fn no_root_error(&self) -> TreeError {
        let reached = vec![false; self.store.len()];
        linearize::find_parent_cycle(&self.store, &reached, self.config.debug()).unwrap_or_else(
            || TreeError::NoRootFound {
                root: self.config.root.clone(),
            },
        )
    }

    /// Link if needed, then materialize the whole `next` chain.
    pub fn linearize(&mut self) -> Result<(), TreeError> {
        if self.linearized {
            return Ok(());
        }
        self.link()?;

        let numberer = self
            .config
            .number_nodes()
            .then_some(&self.config.numberer);
        let mut cursor = PreorderCursor::new(
            &mut self.store,
            self.first_root,
            numberer,
            self.config.debug(),
        )?;
        while cursor.advance()?.is_some() {}

        let levels = cursor.levels();
        self.mark_linearized(levels);
        Ok(())
    }

    fn mark_linearized(&mut self, levels: u32) {
        self.levels = levels;
        self.linearized = true;
        debug!(
            "linearized {} nodes, deepest level {}",
            self.store.len(),
            levels
        );
    }

    /// Visit every node in pre-order with the configured strategy.
    ///
    /// Two-pass linearizes first and then follows the `next` chain. Fused
    /// computes each successor just before handing a node to `visit`, so
    /// there is no separate linearization pass. An already linearized tree is
    /// always walked along its chain.
    pub fn walk<F, E>(&mut self, mut visit: F) -> Result<(), E>
    where
        F: FnMut(&Node) -> Result<(), E>,
        E: From<TreeError>,
    {
        if self.linearized || self.config.strategy == LinkingStrategy::TwoPass {
            self.linearize()?;
            for node in self.iter() {
                visit(node)?;
            }
            return Ok(());
        }

        self.link()?;
        let numberer = self
            .config
            .number_nodes()
            .then_some(&self.config.numberer);
        let mut cursor = PreorderCursor::new(
            &mut self.store,
            self.first_root,
            numberer,
            self.config.debug(),
        )?;
        while let Some(id) = cursor.advance()? {
            visit(cursor.store().node(id))?;
        }

        let levels = cursor.levels();
        self.mark_linearized(levels);
        Ok(())
    }

    /// The first root, once linked.
    pub fn first_node(&self) -> Option<&Node> {
        self.first_root.map(|id| self.store.node(id))
    }

    /// Lazy pre-order iteration along `next`. Empty until linearized.
    pub fn iter(&self) -> Preorder<'_> {
        Preorder {
            store: &self.store,
            next: if self.linearized { self.first_root } else { None },
        }
    }

    /// All nodes in pre-order.
    pub fn to_sorted_sequence(&self) -> Result<Vec<&Node>, TreeError> {
        if !self.linearized {
            return Err(TreeError::NotLinearized);
        }
        Ok(self.iter().collect())
    }

    /// Look up a node by its index value.
    pub fn node(&self, index: &Key) -> Option<&Node> {
        self.store.find(index)
    }

    pub fn levels(&self) -> u32 {
        self.levels
    }

    pub fn stats(&self) -> TreeStats {
        TreeStats {
            nodes: self.store.len(),
            roots: self.store.root_count(&self.config.root),
            levels: self.levels,
        }
    }

    pub fn config(&self) -> &TreeConfig {
        &self.config
    }

    pub fn store(&self) -> &NodeStore {
        &self.store
    }

    pub fn into_store(self) -> NodeStore {
        self.store
    }

    pub fn is_base_built(&self) -> bool {
        self.base_built
    }

    pub fn is_relation_built(&self) -> bool {
        self.relation_built
    }

    pub fn is_linearized(&self) -> bool {
        self.linearized
    }
}

/// Iterator over a linearized tree, following each node's `next`.
#[derive(Debug, Clone)]
pub struct Preorder<'a> {
    store: &'a NodeStore,
    next: Option<NodeId>,
}

impl<'a> Iterator for Preorder<'a> {
    type Item = &'a Node;

    fn next(&mut self) -> Option<&'a Node> {
        let node = self.store.node(self.next?);
        self.next = node.next;
        Some(node)
    }
}

impl<'a> IntoIterator for &'a AdjacencyTree {
    type Item = &'a Node;
    type IntoIter = Preorder<'a>;

    fn into_iter(self) -> Preorder<'a> {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CycleKind;
    use crate::record::record;
    use crate::tree::config::Flags;
    use serde_json::json;

    fn rows(pairs: &[(i64, i64)]) -> Vec<Record> {
        pairs
            .iter()
            .map(|&(id, parent)| record([("id", json!(id)), ("parent", json!(parent))]))
            .collect()
    }

    fn tree(pairs: &[(i64, i64)]) -> AdjacencyTree {
        AdjacencyTree::new(rows(pairs), TreeConfig::default().with_root(0))
    }

    fn indices(tree: &AdjacencyTree) -> Vec<Key> {
        tree.iter().map(|n| n.index().clone()).collect()
    }

    #[test]
    fn test_phases_run_their_prerequisites() {
        let mut tree = tree(&[(1, 0), (2, 1)]);
        assert!(!tree.is_base_built());
        tree.linearize().unwrap();
        assert!(tree.is_base_built());
        assert!(tree.is_relation_built());
        assert!(tree.is_linearized());
        assert_eq!(indices(&tree), vec![Key::Int(1), Key::Int(2)]);
    }

    #[test]
    fn test_phases_are_idempotent() {
        let mut tree = AdjacencyTree::new(
            rows(&[(1, 0), (2, 1), (3, 1)]),
            TreeConfig::default()
                .with_root(0)
                .with_flags(Flags::COUNT_DESCENDANTS | Flags::NUMBER_NODES),
        );
        tree.linearize().unwrap();
        let first = tree.store().clone();
        tree.build().unwrap();
        tree.link().unwrap();
        tree.linearize().unwrap();
        assert_eq!(tree.store(), &first);
    }

    #[test]
    fn test_sorted_sequence_requires_linearization() {
        let mut tree = tree(&[(1, 0)]);
        assert_eq!(tree.to_sorted_sequence().unwrap_err(), TreeError::NotLinearized);
        tree.link().unwrap();
        assert_eq!(tree.to_sorted_sequence().unwrap_err(), TreeError::NotLinearized);
        assert_eq!(tree.iter().count(), 0);
        tree.linearize().unwrap();
        assert_eq!(tree.to_sorted_sequence().unwrap().len(), 1);
    }

    #[test]
    fn test_first_node_after_link() {
        let mut tree = tree(&[(5, 1), (1, 0), (2, 0)]);
        assert!(tree.first_node().is_none());
        tree.link().unwrap();
        assert_eq!(tree.first_node().map(|n| n.index()), Some(&Key::Int(1)));
    }

    #[test]
    fn test_string_sentinel_does_not_match_integer_parents() {
        let mut tree = AdjacencyTree::new(rows(&[(1, 0)]), TreeConfig::default());
        let err = tree.link().unwrap_err();
        assert_eq!(
            err,
            TreeError::NoRootFound {
                root: Key::Str("0".into())
            }
        );
    }

    #[test]
    fn test_no_root_with_loop_reports_cycle() {
        let mut tree = tree(&[(1, 2), (2, 1)]);
        let err = tree.link().unwrap_err();
        assert!(matches!(
            err,
            TreeError::Cycle {
                kind: CycleKind::Detached,
                ..
            }
        ));
        assert!(!tree.is_base_built());
    }

    #[test]
    fn test_failed_link_can_be_retried_after_new_source() {
        let mut tree = tree(&[(1, 0), (2, 99)]);
        assert!(tree.link().is_err());
        tree.set_source(rows(&[(1, 0), (2, 1)]));
        tree.linearize().unwrap();
        assert_eq!(tree.stats().nodes, 2);
    }

    #[test]
    fn test_set_source_resets_state() {
        let mut tree = tree(&[(1, 0), (2, 1)]);
        tree.linearize().unwrap();
        tree.set_source(rows(&[(7, 0)]));
        assert!(!tree.is_base_built());
        assert!(!tree.is_linearized());
        tree.linearize().unwrap();
        assert_eq!(indices(&tree), vec![Key::Int(7)]);
    }

    #[test]
    fn test_fused_walk_matches_two_pass() {
        let pairs = [(1, 0), (2, 1), (3, 2), (4, 1), (5, 0), (6, 5)];
        let flags = Flags::NUMBER_NODES | Flags::COUNT_DESCENDANTS;

        let mut two_pass =
            AdjacencyTree::new(rows(&pairs), TreeConfig::default().with_root(0).with_flags(flags));
        let mut seen_two = Vec::new();
        two_pass
            .walk(|n| {
                seen_two.push((n.index().clone(), n.level(), n.numbering().map(String::from)));
                Ok::<_, TreeError>(())
            })
            .unwrap();

        let mut fused = AdjacencyTree::new(
            rows(&pairs),
            TreeConfig::default()
                .with_root(0)
                .with_flags(flags)
                .with_strategy(LinkingStrategy::Fused),
        );
        let mut seen_fused = Vec::new();
        fused
            .walk(|n| {
                seen_fused.push((n.index().clone(), n.level(), n.numbering().map(String::from)));
                Ok::<_, TreeError>(())
            })
            .unwrap();

        assert_eq!(seen_two, seen_fused);
        assert!(fused.is_linearized());
        assert_eq!(two_pass.store(), fused.store());
        assert_eq!(fused.levels(), 2);
    }

    #[test]
    fn test_fused_walk_reports_detached_cycle() {
        let mut tree = AdjacencyTree::new(
            rows(&[(1, 0), (2, 4), (3, 1), (4, 2)]),
            TreeConfig::default()
                .with_root(0)
                .with_strategy(LinkingStrategy::Fused),
        );
        let err = tree.walk(|_| Ok::<_, TreeError>(())).unwrap_err();
        assert!(err.is_cycle());
        assert!(!tree.is_linearized());
    }

    #[test]
    fn test_stats() {
        let mut tree = tree(&[(1, 0), (2, 1), (3, 2), (4, 0)]);
        tree.linearize().unwrap();
        assert_eq!(
            tree.stats(),
            TreeStats {
                nodes: 4,
                roots: 2,
                levels: 2
            }
        );
    }

    #[test]
    fn test_from_store_skips_phases() {
        let mut built = tree(&[(1, 0), (2, 1), (3, 0)]);
        built.linearize().unwrap();
        let expected = indices(&built);

        let reused = AdjacencyTree::from_store(built.into_store(), TreeConfig::default().with_root(0));
        assert!(reused.is_linearized());
        assert_eq!(indices(&reused), expected);
        assert_eq!(reused.levels(), 1);
    }
}
