//! Sprout - flat parent-pointer tables in, ordered and rendered trees out

pub mod config;
pub mod error;
pub mod numbering;
pub mod output;
pub mod record;
pub mod tree;

#[cfg(feature = "test-utils")]
pub mod test_utils;

pub use config::{ConfigError, SproutConfig};
pub use error::{CycleKind, RenderError, TreeError};
pub use numbering::{NumberScheme, Numberer, NumberingConfig, Scheme};
pub use output::{OutputConfig, View, ViewConfig, print_json, render_html};
pub use record::{Key, Record};
pub use tree::{AdjacencyTree, Flags, LinkingStrategy, Node, NodeStore, TreeConfig, TreeOutput, emit};
