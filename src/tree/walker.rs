//! Renderer driver - turns the pre-order walk into open/close events
//!
//! Renderers implement [`TreeOutput`]; [`emit`] walks an [`AdjacencyTree`]
//! and calls them as level transitions are detected. Only the current node's
//! level and the open-block stack are needed, so this works unchanged for the
//! fused strategy, where later nodes are not linearized yet.

use std::io;

use crate::error::RenderError;

use super::node::Node;
use super::traversal::{AdjacencyTree, TreeStats};

/// Callbacks for streaming a tree to some output.
///
/// For every node: a block opens when the walk goes one level deeper, then
/// the item opens and its content is written. Items and blocks are closed
/// innermost first as the walk climbs back, and everything still open is
/// closed before [`finish`](TreeOutput::finish).
pub trait TreeOutput {
    fn begin(&mut self) -> io::Result<()> {
        Ok(())
    }

    /// `first` is the first node of the new block.
    fn open_block(&mut self, level: u32, first: &Node) -> io::Result<()>;

    fn open_item(&mut self, level: u32, node: &Node) -> io::Result<()>;

    fn content(&mut self, level: u32, node: &Node) -> io::Result<()>;

    fn close_item(&mut self, level: u32) -> io::Result<()>;

    fn close_block(&mut self, level: u32) -> io::Result<()>;

    fn finish(&mut self, stats: &TreeStats) -> io::Result<()>;
}

/// Walk `tree` with its configured strategy and feed `out`.
pub fn emit<O: TreeOutput + ?Sized>(
    tree: &mut AdjacencyTree,
    out: &mut O,
) -> Result<TreeStats, RenderError> {
    out.begin()?;

    let mut blocks: Vec<u32> = Vec::new();
    let mut depth: Option<u32> = None;

    tree.walk(|node| -> Result<(), RenderError> {
        let level = node.level();
        match depth {
            Some(prev) if level <= prev => {
                out.close_item(prev)?;
                while let Some(&top) = blocks.last() {
                    if top <= level {
                        break;
                    }
                    out.close_block(top)?;
                    blocks.pop();
                    if let Some(&outer) = blocks.last() {
                        out.close_item(outer)?;
                    }
                }
            }
            _ => {
                out.open_block(level, node)?;
                blocks.push(level);
            }
        }
        out.open_item(level, node)?;
        out.content(level, node)?;
        depth = Some(level);
        Ok(())
    })?;

    if let Some(last) = depth {
        out.close_item(last)?;
        while let Some(top) = blocks.pop() {
            out.close_block(top)?;
            if let Some(&outer) = blocks.last() {
                out.close_item(outer)?;
            }
        }
    }

    let stats = tree.stats();
    out.finish(&stats)?;
    Ok(stats)
}
