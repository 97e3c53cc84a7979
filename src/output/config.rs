//! Output configuration types

use crate::tree::Flags;

/// Configuration for the console-style renderers.
#[derive(Debug, Clone, Default)]
pub struct OutputConfig {
    pub use_color: bool,
    /// Columns shown after each node's index.
    pub columns: Vec<String>,
    /// Controls which computed columns exist.
    pub flags: Flags,
}

impl OutputConfig {
    pub fn new(flags: Flags) -> Self {
        Self {
            flags,
            ..Default::default()
        }
    }

    pub fn with_columns(mut self, columns: Vec<String>) -> Self {
        self.columns = columns;
        self
    }

    pub fn with_color(mut self, use_color: bool) -> Self {
        self.use_color = use_color;
        self
    }
}
