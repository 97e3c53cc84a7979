//! Adjacency-list tree engine
//!
//! Turns flat rows that point at their parent into an ordered, leveled
//! pre-order traversal:
//!
//! - `store` - `NodeStore`, the arena of nodes built from the rows
//! - `relation` - first-child / next-sibling links, children counts
//! - `descendants` - descendant counts propagated up each parent chain
//! - `linearize` - the pre-order `next` chain, levels and numbering
//! - `traversal` - `AdjacencyTree`, which runs the phases in order
//! - `walker` - level-transition events for renderers

mod config;
mod descendants;
mod linearize;
mod node;
mod relation;
mod store;
mod traversal;
mod walker;

pub use config::{Flags, LinkingStrategy, TreeConfig};
pub use node::{Node, NodeId};
pub use store::NodeStore;
pub use traversal::{AdjacencyTree, Preorder, TreeStats};
pub use walker::{TreeOutput, emit};
