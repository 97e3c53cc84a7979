//! Configuration types for tree construction

use std::ops::{BitOr, BitOrAssign};

use crate::numbering::Numberer;
use crate::record::Key;

/// Combinable option flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Flags(u32);

impl Flags {
    pub const NONE: Flags = Flags(0);
    /// Expose `children` as a column.
    pub const COUNT_CHILDREN: Flags = Flags(1);
    /// Compute and expose `descendants`.
    pub const COUNT_DESCENDANTS: Flags = Flags(1 << 4);
    /// Compute `child_number` and `numbering`.
    pub const NUMBER_NODES: Flags = Flags(1 << 8);
    /// Record the visited branch in cycle errors.
    pub const DEBUG_MODE: Flags = Flags(1 << 12);

    const ALL: u32 = 1 | (1 << 4) | (1 << 8) | (1 << 12);

    pub const fn bits(self) -> u32 {
        self.0
    }

    /// Build flags from raw bits, dropping unknown bits.
    pub const fn from_bits_truncate(bits: u32) -> Self {
        Flags(bits & Self::ALL)
    }

    pub const fn contains(self, other: Flags) -> bool {
        self.0 & other.0 == other.0
    }

    pub fn insert(&mut self, other: Flags) {
        self.0 |= other.0;
    }

    pub fn remove(&mut self, other: Flags) {
        self.0 &= !other.0;
    }

    pub fn set(&mut self, other: Flags, enabled: bool) {
        if enabled {
            self.insert(other);
        } else {
            self.remove(other);
        }
    }
}

impl BitOr for Flags {
    type Output = Flags;

    fn bitor(self, rhs: Flags) -> Flags {
        Flags(self.0 | rhs.0)
    }
}

impl BitOrAssign for Flags {
    fn bitor_assign(&mut self, rhs: Flags) {
        self.0 |= rhs.0;
    }
}

/// How the pre-order walk is scheduled relative to rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LinkingStrategy {
    /// Link, then materialize the whole `next` chain, then render.
    #[default]
    TwoPass,
    /// Link, then build the `next` chain while the renderer consumes it.
    Fused,
}

/// Configuration for building a tree from flat rows.
#[derive(Debug, Clone)]
pub struct TreeConfig {
    /// Column holding each row's own id.
    pub index_field: String,
    /// Column holding the parent's id.
    pub parent_field: String,
    /// Parent value that marks a root.
    pub root: Key,
    pub flags: Flags,
    pub strategy: LinkingStrategy,
    /// Used when `NUMBER_NODES` is set.
    pub numberer: Numberer,
}

impl TreeConfig {
    pub fn new(index_field: impl Into<String>, parent_field: impl Into<String>) -> Self {
        Self {
            index_field: index_field.into(),
            parent_field: parent_field.into(),
            ..Default::default()
        }
    }

    pub fn with_root(mut self, root: impl Into<Key>) -> Self {
        self.root = root.into();
        self
    }

    pub fn with_flags(mut self, flags: Flags) -> Self {
        self.flags |= flags;
        self
    }

    pub fn with_strategy(mut self, strategy: LinkingStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    pub fn with_numberer(mut self, numberer: Numberer) -> Self {
        self.numberer = numberer;
        self.flags |= Flags::NUMBER_NODES;
        self
    }

    pub fn count_children(&self) -> bool {
        self.flags.contains(Flags::COUNT_CHILDREN)
    }

    pub fn count_descendants(&self) -> bool {
        self.flags.contains(Flags::COUNT_DESCENDANTS)
    }

    pub fn number_nodes(&self) -> bool {
        self.flags.contains(Flags::NUMBER_NODES)
    }

    pub fn debug(&self) -> bool {
        self.flags.contains(Flags::DEBUG_MODE)
    }
}

impl Default for TreeConfig {
    fn default() -> Self {
        Self {
            index_field: "id".to_string(),
            parent_field: "parent".to_string(),
            root: Key::default(),
            flags: Flags::NONE,
            strategy: LinkingStrategy::TwoPass,
            numberer: Numberer::default(),
        }
    }
}
