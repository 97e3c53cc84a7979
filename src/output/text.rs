//! Console tree output
//!
//! `TextFormatter` draws the forest with box-drawing connectors:
//!
//! ```text
//! 1  Home
//! ├── 2  About
//! │   └── 4  Team
//! └── 3  Blog
//! ```

use std::io::{self, Write};

use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};

use crate::tree::{Node, TreeOutput, TreeStats};

use super::config::OutputConfig;
use super::fields;

pub struct TextFormatter<W: WriteColor> {
    config: OutputConfig,
    out: W,
    /// Whether each open item is the last of its siblings, by level.
    last: Vec<bool>,
}

impl TextFormatter<StandardStream> {
    /// Formatter writing to stdout, colored when the config allows it.
    pub fn stdout(config: OutputConfig) -> Self {
        let choice = if config.use_color {
            ColorChoice::Auto
        } else {
            ColorChoice::Never
        };
        Self::new(config, StandardStream::stdout(choice))
    }
}

impl<W: WriteColor> TextFormatter<W> {
    pub fn new(config: OutputConfig, out: W) -> Self {
        Self {
            config,
            out,
            last: Vec::new(),
        }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    /// Continuation prefix from the ancestors below the roots.
    fn prefix(&self, level: usize) -> String {
        self.last
            .iter()
            .take(level)
            .skip(1)
            .map(|&is_last| if is_last { "    " } else { "│   " })
            .collect()
    }
}

impl<W: WriteColor> TreeOutput for TextFormatter<W> {
    fn open_block(&mut self, _level: u32, _first: &Node) -> io::Result<()> {
        Ok(())
    }

    fn open_item(&mut self, _level: u32, node: &Node) -> io::Result<()> {
        self.last.push(node.is_last_sibling());
        Ok(())
    }

    fn content(&mut self, level: u32, node: &Node) -> io::Result<()> {
        let level = level as usize;
        if level > 0 {
            let connector = if node.is_last_sibling() {
                "└── "
            } else {
                "├── "
            };
            let prefix = self.prefix(level);
            write!(self.out, "{}{}", prefix, connector)?;
        }

        if let Some(numbering) = node.numbering() {
            self.out
                .set_color(ColorSpec::new().set_fg(Some(Color::Green)))?;
            write!(self.out, "{} ", numbering)?;
            self.out.reset()?;
        }

        let label = fields::label(node, &self.config.columns, self.config.flags);
        if node.has_children() {
            self.out
                .set_color(ColorSpec::new().set_fg(Some(Color::Blue)).set_bold(true))?;
        } else {
            self.out
                .set_color(ColorSpec::new().set_fg(Some(Color::White)))?;
        }
        write!(self.out, "{}", label)?;
        self.out.reset()?;
        writeln!(self.out)
    }

    fn close_item(&mut self, _level: u32) -> io::Result<()> {
        self.last.pop();
        Ok(())
    }

    fn close_block(&mut self, _level: u32) -> io::Result<()> {
        Ok(())
    }

    fn finish(&mut self, stats: &TreeStats) -> io::Result<()> {
        writeln!(self.out)?;
        writeln!(
            self.out,
            "{} nodes, {} roots, {} levels",
            stats.nodes,
            stats.roots,
            stats.levels + 1
        )?;
        self.out.flush()
    }
}
