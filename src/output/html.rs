//! HTML output through a template view

use std::io::{self, Write};

use crate::error::RenderError;
use crate::tree::{AdjacencyTree, Node, TreeOutput, TreeStats, emit};

use super::view::View;

/// Writes a tree as nested markup using a [`View`].
pub struct HtmlFormatter<W: Write> {
    view: View,
    writer: W,
}

impl<W: Write> HtmlFormatter<W> {
    pub fn new(view: View, writer: W) -> Self {
        Self { view, writer }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> TreeOutput for HtmlFormatter<W> {
    fn begin(&mut self) -> io::Result<()> {
        self.writer.write_all(self.view.wrapper_start().as_bytes())
    }

    fn open_block(&mut self, level: u32, first: &Node) -> io::Result<()> {
        self.writer
            .write_all(self.view.block_start(level, first).as_bytes())
    }

    fn open_item(&mut self, level: u32, node: &Node) -> io::Result<()> {
        self.writer
            .write_all(self.view.item_start(level, node).as_bytes())
    }

    fn content(&mut self, level: u32, node: &Node) -> io::Result<()> {
        self.writer
            .write_all(self.view.content(level, node).as_bytes())
    }

    fn close_item(&mut self, level: u32) -> io::Result<()> {
        self.writer.write_all(self.view.item_end(level).as_bytes())
    }

    fn close_block(&mut self, level: u32) -> io::Result<()> {
        self.writer.write_all(self.view.block_end(level).as_bytes())
    }

    fn finish(&mut self, _stats: &TreeStats) -> io::Result<()> {
        self.writer.write_all(self.view.wrapper_end().as_bytes())?;
        self.writer.flush()
    }
}

/// Render `tree` to a string with `view`.
pub fn render_html(tree: &mut AdjacencyTree, view: View) -> Result<String, RenderError> {
    let mut formatter = HtmlFormatter::new(view, Vec::new());
    emit(tree, &mut formatter)?;
    Ok(String::from_utf8_lossy(&formatter.into_inner()).into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::view::ViewConfig;
    use crate::record::{Record, record};
    use crate::tree::{Flags, LinkingStrategy, TreeConfig};
    use serde_json::json;

    fn menu() -> Vec<Record> {
        vec![
            record([("id", json!(1)), ("parent", json!(0)), ("title", json!("Home"))]),
            record([("id", json!(2)), ("parent", json!(1)), ("title", json!("About"))]),
            record([("id", json!(3)), ("parent", json!(1)), ("title", json!("Blog"))]),
            record([("id", json!(4)), ("parent", json!(2)), ("title", json!("Team"))]),
        ]
    }

    fn titles() -> ViewConfig {
        ViewConfig {
            content: "{{title}}".to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_nested_markup() {
        let mut tree = AdjacencyTree::new(menu(), TreeConfig::default().with_root(0));
        let view = View::new(&titles(), Flags::NONE).unwrap();
        let html = render_html(&mut tree, view).unwrap();
        assert_eq!(
            html,
            "<div><ul><li>Home<ul><li>About<ul><li>Team</li></ul></li><li>Blog</li></ul></li></ul></div>"
        );
    }

    #[test]
    fn test_tags_are_balanced() {
        let mut tree = AdjacencyTree::new(menu(), TreeConfig::default().with_root(0));
        let view = View::new(&ViewConfig::default(), Flags::NONE).unwrap();
        let html = render_html(&mut tree, view).unwrap();
        assert_eq!(html.matches("<ul>").count(), html.matches("</ul>").count());
        assert_eq!(html.matches("<li>").count(), 4);
        assert_eq!(html.matches("</li>").count(), 4);
    }

    #[test]
    fn test_numbering_placeholder() {
        let config = TreeConfig::default()
            .with_root(0)
            .with_flags(Flags::NUMBER_NODES);
        let mut tree = AdjacencyTree::new(menu(), config);
        let view_config = ViewConfig {
            content: "{{numbering}} {{title}}".to_string(),
            ..Default::default()
        };
        let view = View::new(&view_config, Flags::NUMBER_NODES).unwrap();
        let html = render_html(&mut tree, view).unwrap();
        assert!(html.contains("1.1.1 Team"));
        assert!(html.contains("1.2 Blog"));
    }

    #[test]
    fn test_fused_strategy_renders_same_markup() {
        let view_config = ViewConfig {
            item: "<li data-next=\"{{next}}\">{{}}</li>".to_string(),
            ..titles()
        };
        let mut two_pass = AdjacencyTree::new(menu(), TreeConfig::default().with_root(0));
        let mut fused = AdjacencyTree::new(
            menu(),
            TreeConfig::default()
                .with_root(0)
                .with_strategy(LinkingStrategy::Fused),
        );
        let a = render_html(&mut two_pass, View::new(&view_config, Flags::NONE).unwrap()).unwrap();
        let b = render_html(&mut fused, View::new(&view_config, Flags::NONE).unwrap()).unwrap();
        assert_eq!(a, b);
        assert!(a.contains("<li data-next=\"4\">About"));
    }
}
