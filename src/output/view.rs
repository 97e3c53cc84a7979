//! Template view for HTML-like output
//!
//! A view has a `wrapper` around the whole tree and, per level, a `block`
//! around each group of siblings, an `item` around each node and the node's
//! `content`. Wrapper, block and item templates are split at the bare
//! splitter (`{{}}` by default) into a start half and an end half; start
//! halves and content may hold `{{name}}` placeholders.

use std::collections::{BTreeMap, HashMap};
use std::fmt;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::record::value_to_text;
use crate::tree::{Flags, Node};

use super::fields;

/// Characters allowed in a placeholder name.
const PLACEHOLDER: &str = "([a-zA-Z0-9%_][a-zA-Z0-9%_-]*)";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Splitter {
    pub start: String,
    pub end: String,
}

impl Default for Splitter {
    fn default() -> Self {
        Self {
            start: "{{".to_string(),
            end: "}}".to_string(),
        }
    }
}

/// Templates for one level; unset ones fall back to the view defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LevelView {
    pub block: Option<String>,
    pub item: Option<String>,
    pub content: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewConfig {
    pub splitter: Splitter,
    pub wrapper: String,
    pub block: String,
    pub item: String,
    pub content: String,
    pub levels: BTreeMap<u32, LevelView>,
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            splitter: Splitter::default(),
            wrapper: "<div>{{}}</div>".to_string(),
            block: "<ul>{{}}</ul>".to_string(),
            item: "<li>{{}}</li>".to_string(),
            content: "<a href=\"#\">node id: '{{id}}', parent id: '{{parent}}'</a>".to_string(),
            levels: BTreeMap::new(),
        }
    }
}

/// Computes the text for a placeholder that is neither a computed nor a
/// row column.
pub trait Replacer {
    fn replace(&self, node: &Node) -> Option<String>;
}

impl<F> Replacer for F
where
    F: Fn(&Node) -> Option<String>,
{
    fn replace(&self, node: &Node) -> Option<String> {
        self(node)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Text(String),
    Field(String),
}

/// A template compiled into literal text and placeholders.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Template {
    segments: Vec<Segment>,
}

impl Template {
    fn compile(source: &str, pattern: &Regex) -> Self {
        let mut segments = Vec::new();
        let mut last = 0;
        for caps in pattern.captures_iter(source) {
            let (Some(whole), Some(name)) = (caps.get(0), caps.get(1)) else {
                continue;
            };
            if whole.start() > last {
                segments.push(Segment::Text(source[last..whole.start()].to_string()));
            }
            segments.push(Segment::Field(name.as_str().to_string()));
            last = whole.end();
        }
        if last < source.len() {
            segments.push(Segment::Text(source[last..].to_string()));
        }
        Self { segments }
    }
}

/// Start and end half of a split element. The end half is literal.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Element {
    start: Template,
    end: String,
}

#[derive(Debug, Clone)]
struct LevelTemplates {
    block: Element,
    item: Element,
    content: Template,
}

/// A compiled view ready to render nodes.
pub struct View {
    wrapper: (String, String),
    default: LevelTemplates,
    levels: HashMap<u32, LevelTemplates>,
    replacers: HashMap<String, Box<dyn Replacer>>,
    flags: Flags,
}

impl View {
    /// Compile `config`. `flags` decides which computed columns placeholders
    /// can reach.
    pub fn new(config: &ViewConfig, flags: Flags) -> Result<Self, regex::Error> {
        let pattern = Regex::new(&format!(
            "{}{}{}",
            regex::escape(&config.splitter.start),
            PLACEHOLDER,
            regex::escape(&config.splitter.end)
        ))?;
        let bare = format!("{}{}", config.splitter.start, config.splitter.end);

        let split = |source: &str| -> Element {
            let (start, end) = source.split_once(&bare).unwrap_or((source, ""));
            Element {
                start: Template::compile(start, &pattern),
                end: end.to_string(),
            }
        };

        let default = LevelTemplates {
            block: split(&config.block),
            item: split(&config.item),
            content: Template::compile(&config.content, &pattern),
        };

        let levels = config
            .levels
            .iter()
            .map(|(&level, view)| {
                let templates = LevelTemplates {
                    block: view.block.as_deref().map_or(default.block.clone(), split),
                    item: view.item.as_deref().map_or(default.item.clone(), split),
                    content: view
                        .content
                        .as_deref()
                        .map_or(default.content.clone(), |c| Template::compile(c, &pattern)),
                };
                (level, templates)
            })
            .collect();

        let (wrapper_start, wrapper_end) = config
            .wrapper
            .split_once(&bare)
            .unwrap_or((config.wrapper.as_str(), ""));

        Ok(Self {
            wrapper: (wrapper_start.to_string(), wrapper_end.to_string()),
            default,
            levels,
            replacers: HashMap::new(),
            flags,
        })
    }

    /// Register a replacer for `{{name}}`.
    pub fn with_replacer(mut self, name: impl Into<String>, replacer: impl Replacer + 'static) -> Self {
        self.replacers.insert(name.into(), Box::new(replacer));
        self
    }

    fn level(&self, level: u32) -> &LevelTemplates {
        self.levels.get(&level).unwrap_or(&self.default)
    }

    pub fn wrapper_start(&self) -> &str {
        &self.wrapper.0
    }

    pub fn wrapper_end(&self) -> &str {
        &self.wrapper.1
    }

    pub fn block_start(&self, level: u32, node: &Node) -> String {
        self.render(&self.level(level).block.start, node)
    }

    pub fn block_end(&self, level: u32) -> &str {
        &self.level(level).block.end
    }

    pub fn item_start(&self, level: u32, node: &Node) -> String {
        self.render(&self.level(level).item.start, node)
    }

    pub fn item_end(&self, level: u32) -> &str {
        &self.level(level).item.end
    }

    pub fn content(&self, level: u32, node: &Node) -> String {
        self.render(&self.level(level).content, node)
    }

    fn render(&self, template: &Template, node: &Node) -> String {
        let mut out = String::new();
        for segment in &template.segments {
            match segment {
                Segment::Text(text) => out.push_str(text),
                Segment::Field(name) => out.push_str(&self.resolve(name, node)),
            }
        }
        out
    }

    /// Computed column, then row column, then replacer, then nothing.
    fn resolve(&self, name: &str, node: &Node) -> String {
        if let Some(value) = fields::lookup(node, name, self.flags) {
            return value_to_text(&value);
        }
        self.replacers
            .get(name)
            .and_then(|replacer| replacer.replace(node))
            .unwrap_or_default()
    }
}

impl fmt::Debug for View {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut replacers: Vec<&String> = self.replacers.keys().collect();
        replacers.sort();
        f.debug_struct("View")
            .field("wrapper", &self.wrapper)
            .field("levels", &self.levels.len())
            .field("replacers", &replacers)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::{Key, record};
    use crate::tree::{AdjacencyTree, TreeConfig};
    use serde_json::json;

    fn home() -> AdjacencyTree {
        let rows = vec![
            record([("id", json!(1)), ("parent", json!(0)), ("title", json!("Home"))]),
            record([("id", json!(2)), ("parent", json!(1)), ("title", json!("About"))]),
        ];
        let mut tree = AdjacencyTree::new(rows, TreeConfig::default().with_root(0));
        tree.linearize().unwrap();
        tree
    }

    #[test]
    fn test_default_view() {
        let tree = home();
        let view = View::new(&ViewConfig::default(), Flags::NONE).unwrap();
        let node = tree.node(&Key::Int(2)).unwrap();
        assert_eq!(view.wrapper_start(), "<div>");
        assert_eq!(view.wrapper_end(), "</div>");
        assert_eq!(view.block_start(1, node), "<ul>");
        assert_eq!(view.item_end(1), "</li>");
        assert_eq!(
            view.content(1, node),
            "<a href=\"#\">node id: '2', parent id: '1'</a>"
        );
    }

    #[test]
    fn test_computed_columns_in_start_halves() {
        let tree = home();
        let config = ViewConfig {
            block: "<ul data-level=\"{{level}}\">{{}}</ul>".to_string(),
            item: "<li data-next=\"{{next}}\">{{}}</li>".to_string(),
            ..Default::default()
        };
        let view = View::new(&config, Flags::NONE).unwrap();
        let node = tree.node(&Key::Int(1)).unwrap();
        assert_eq!(view.block_start(0, node), "<ul data-level=\"0\">");
        assert_eq!(view.item_start(0, node), "<li data-next=\"2\">");
    }

    #[test]
    fn test_level_overrides_fall_back_to_defaults() {
        let tree = home();
        let mut config = ViewConfig::default();
        config.levels.insert(
            1,
            LevelView {
                content: Some("<b>{{title}}</b>".to_string()),
                ..Default::default()
            },
        );
        let view = View::new(&config, Flags::NONE).unwrap();
        let about = tree.node(&Key::Int(2)).unwrap();
        assert_eq!(view.content(1, about), "<b>About</b>");
        assert_eq!(view.block_start(1, about), "<ul>");
        assert!(view.content(0, tree.node(&Key::Int(1)).unwrap()).starts_with("<a"));
    }

    #[test]
    fn test_replacers_and_unknown_names() {
        let tree = home();
        let config = ViewConfig {
            content: "{{%active%}}|{{title}}|{{nope}}".to_string(),
            ..Default::default()
        };
        let view = View::new(&config, Flags::NONE).unwrap().with_replacer(
            "%active%",
            |node: &Node| (node.index() == &Key::Int(1)).then(|| "active".to_string()),
        );
        assert_eq!(view.content(0, tree.node(&Key::Int(1)).unwrap()), "active|Home|");
        assert_eq!(view.content(1, tree.node(&Key::Int(2)).unwrap()), "|About|");
    }

    #[test]
    fn test_row_column_beats_replacer() {
        let tree = home();
        let config = ViewConfig {
            content: "{{title}}".to_string(),
            ..Default::default()
        };
        let view = View::new(&config, Flags::NONE)
            .unwrap()
            .with_replacer("title", |_: &Node| Some("replaced".to_string()));
        assert_eq!(view.content(0, tree.node(&Key::Int(1)).unwrap()), "Home");
    }

    #[test]
    fn test_custom_splitter() {
        let tree = home();
        let config = ViewConfig {
            splitter: Splitter {
                start: "[[".to_string(),
                end: "]]".to_string(),
            },
            wrapper: "<nav>[[]]</nav>".to_string(),
            block: "<ol>[[]]</ol>".to_string(),
            item: "<li>[[]]</li>".to_string(),
            content: "[[title]] {{title}}".to_string(),
            levels: BTreeMap::new(),
        };
        let view = View::new(&config, Flags::NONE).unwrap();
        let node = tree.node(&Key::Int(1)).unwrap();
        assert_eq!(view.wrapper_start(), "<nav>");
        assert_eq!(view.block_end(0), "</ol>");
        assert_eq!(view.content(0, node), "Home {{title}}");
    }

    #[test]
    fn test_template_without_splitter_has_empty_end() {
        let config = ViewConfig {
            item: "<hr>".to_string(),
            ..Default::default()
        };
        let view = View::new(&config, Flags::NONE).unwrap();
        assert_eq!(view.item_end(0), "");
    }

    #[test]
    fn test_config_from_json() {
        let config: ViewConfig = serde_json::from_str(
            r#"{"wrapper": "<nav>{{}}</nav>", "levels": {"2": {"item": "<li class=\"deep\">{{}}</li>"}}}"#,
        )
        .unwrap();
        assert_eq!(config.block, "<ul>{{}}</ul>");
        assert_eq!(
            config.levels.get(&2).and_then(|l| l.item.as_deref()),
            Some("<li class=\"deep\">{{}}</li>")
        );
    }
}
