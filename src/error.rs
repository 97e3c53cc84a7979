//! Errors raised while building a tree and while rendering it.
//!
//! Every error is terminal: a structurally broken source cannot be partially
//! trusted, so the phase that detects a problem stops and returns it.

use std::error::Error;
use std::fmt;
use std::io;

use crate::record::Key;

/// Which check detected a cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleKind {
    /// Upward walk while counting descendants revisited a node.
    DescendantWalk,
    /// Upward search for the next sibling revisited a node.
    UpWalk,
    /// A node was about to be appended to the traversal a second time.
    Readded,
    /// A parent cycle not attached to any root, found after the walk.
    Detached,
}

impl fmt::Display for CycleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::DescendantWalk => "descendant-walk",
            Self::UpWalk => "up-walk",
            Self::Readded => "re-added",
            Self::Detached => "detached",
        };
        write!(f, "{}", s)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TreeError {
    /// The source has no rows at all.
    EmptySource,
    /// A required column is missing from the first row.
    Schema { field: String },
    /// A row's index or parent value is missing or not usable as a key.
    InvalidKey { row: usize, field: String },
    /// Two rows share the same index value.
    DuplicateIndex { index: Key },
    /// No row has the root sentinel as its parent.
    NoRootFound { root: Key },
    /// A row references a parent that does not exist.
    Orphan { node: Key, missing_parent: Key },
    /// A `next` column references a node that does not exist.
    DanglingNext { node: Key, next: Key },
    /// The parent/child structure loops back on itself.
    ///
    /// `branch` lists the visited ids in order and is only filled in debug
    /// mode.
    Cycle {
        kind: CycleKind,
        detected_at: Key,
        branch: Vec<Key>,
    },
    /// A sorted sequence was requested before linearization finished.
    NotLinearized,
}

impl TreeError {
    pub(crate) fn cycle(kind: CycleKind, detected_at: Key, branch: Vec<Key>) -> Self {
        log::trace!("cycle ({}) detected at {}", kind, detected_at);
        TreeError::Cycle {
            kind,
            detected_at,
            branch,
        }
    }

    /// True for any of the cycle variants.
    pub fn is_cycle(&self) -> bool {
        matches!(self, TreeError::Cycle { .. })
    }
}

impl fmt::Display for TreeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TreeError::EmptySource => write!(f, "the source has no rows"),
            TreeError::Schema { field } => {
                write!(f, "the source has no '{}' column", field)
            }
            TreeError::InvalidKey { row, field } => {
                write!(f, "row {} has no usable '{}' value", row, field)
            }
            TreeError::DuplicateIndex { index } => {
                write!(f, "index {} appears more than once", index)
            }
            TreeError::NoRootFound { root } => write!(
                f,
                "no root node found (no row has parent {}, maybe a type mismatch)",
                root
            ),
            TreeError::Orphan {
                node,
                missing_parent,
            } => write!(
                f,
                "node {} has parent {}, which does not exist",
                node, missing_parent
            ),
            TreeError::DanglingNext { node, next } => write!(
                f,
                "node {} has next {}, which does not exist",
                node, next
            ),
            TreeError::Cycle {
                kind,
                detected_at,
                branch,
            } => {
                write!(f, "cycle in the tree ({}) at node {}", kind, detected_at)?;
                if !branch.is_empty() {
                    let path: Vec<String> = branch.iter().map(|k| format!("[{}]", k)).collect();
                    write!(f, ", branch: {}", path.join("."))?;
                }
                Ok(())
            }
            TreeError::NotLinearized => {
                write!(f, "the tree has not been linearized yet")
            }
        }
    }
}

impl Error for TreeError {}

/// Failure while rendering a tree: either the tree itself is broken or the
/// output could not be written.
#[derive(Debug)]
pub enum RenderError {
    Tree(TreeError),
    Io(io::Error),
}

impl fmt::Display for RenderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RenderError::Tree(err) => err.fmt(f),
            RenderError::Io(err) => write!(f, "failed to write output: {}", err),
        }
    }
}

impl Error for RenderError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            RenderError::Tree(err) => Some(err),
            RenderError::Io(err) => Some(err),
        }
    }
}

impl From<TreeError> for RenderError {
    fn from(err: TreeError) -> Self {
        RenderError::Tree(err)
    }
}

impl From<io::Error> for RenderError {
    fn from(err: io::Error) -> Self {
        RenderError::Io(err)
    }
}
