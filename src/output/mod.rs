//! Tree formatting and display
//!
//! This module provides renderers for linearized trees:
//! - HTML through a configurable template view
//! - Console output with connectors and colors
//! - Markdown and JSON output
//! - Aligned plain-text and HTML tables of the sorted rows
//!
//! # Module Structure
//!
//! - `config` - Output configuration types
//! - `fields` - Computed node columns shared by all renderers
//! - `view` - Template view and replacers
//! - `html` - `TreeOutput` over a view
//! - `text` - Console tree formatter
//! - `markdown` - Markdown output formatter
//! - `json` - JSON output
//! - `table` - Table output

mod config;
pub mod fields;
mod html;
mod json;
mod markdown;
mod table;
mod text;
mod view;

pub use config::OutputConfig;
pub use html::{HtmlFormatter, render_html};
pub use json::{JsonFormatter, JsonNode, flat_rows, print_json};
pub use markdown::{MarkdownFormatter, print_markdown};
pub use table::TableFormatter;
pub use text::TextFormatter;
pub use view::{LevelView, Replacer, Splitter, View, ViewConfig};
