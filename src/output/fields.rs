//! Computed node columns shared by the renderers

use serde_json::Value;

use crate::record::{Key, Record};
use crate::tree::{Flags, Node};

/// Names of the columns computed for `flags`, in display order.
pub fn computed_names(flags: Flags) -> Vec<&'static str> {
    let mut names = vec!["level", "next"];
    if flags.contains(Flags::COUNT_CHILDREN) {
        names.push("children");
    }
    if flags.contains(Flags::COUNT_DESCENDANTS) {
        names.push("descendants");
    }
    if flags.contains(Flags::NUMBER_NODES) {
        names.push("child_number");
        names.push("numbering");
    }
    names
}

/// A computed column of `node`, or `None` if `name` is not computed under
/// `flags`.
pub fn computed(node: &Node, name: &str, flags: Flags) -> Option<Value> {
    match name {
        "level" => Some(Value::from(node.level())),
        "next" => Some(node.next_index().map_or(Value::Null, Key::to_value)),
        "children" if flags.contains(Flags::COUNT_CHILDREN) => {
            Some(Value::from(node.children_count()))
        }
        "descendants" if flags.contains(Flags::COUNT_DESCENDANTS) => {
            Some(Value::from(node.descendants_count()))
        }
        "child_number" if flags.contains(Flags::NUMBER_NODES) => {
            Some(Value::from(node.child_number()))
        }
        "numbering" if flags.contains(Flags::NUMBER_NODES) => Some(
            node.numbering()
                .map_or(Value::Null, |s| Value::String(s.to_string())),
        ),
        _ => None,
    }
}

/// Look up a column: computed columns first, then the source row.
pub fn lookup(node: &Node, name: &str, flags: Flags) -> Option<Value> {
    computed(node, name, flags).or_else(|| node.get(name).cloned())
}

/// The source row with the computed columns added, overriding row columns of
/// the same name.
pub fn flat_row(node: &Node, flags: Flags) -> Record {
    let mut row = node.record().clone();
    for name in computed_names(flags) {
        if let Some(value) = computed(node, name, flags) {
            row.insert(name.to_string(), value);
        }
    }
    row
}

/// The text shown for a node in console-style output: the index value
/// followed by the values of `columns`.
pub fn label(node: &Node, columns: &[String], flags: Flags) -> String {
    let mut parts = vec![crate::record::value_to_text(&node.index().to_value())];
    for column in columns {
        if let Some(value) = lookup(node, column, flags) {
            let text = crate::record::value_to_text(&value);
            if !text.is_empty() {
                parts.push(text);
            }
        }
    }
    parts.join("  ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::record;
    use crate::tree::{AdjacencyTree, TreeConfig};
    use serde_json::json;

    fn tree(flags: Flags) -> AdjacencyTree {
        let rows = vec![
            record([("id", json!(1)), ("parent", json!(0)), ("title", json!("Home"))]),
            record([("id", json!(2)), ("parent", json!(1)), ("title", json!("About"))]),
        ];
        let mut tree = AdjacencyTree::new(rows, TreeConfig::default().with_root(0).with_flags(flags));
        tree.linearize().unwrap();
        tree
    }

    #[test]
    fn test_computed_respects_flags() {
        let tree = tree(Flags::NONE);
        let home = tree.node(&Key::Int(1)).unwrap();
        assert_eq!(computed(home, "level", Flags::NONE), Some(json!(0)));
        assert_eq!(computed(home, "next", Flags::NONE), Some(json!(2)));
        assert_eq!(computed(home, "children", Flags::NONE), None);
        assert_eq!(
            computed(home, "children", Flags::COUNT_CHILDREN),
            Some(json!(1))
        );
    }

    #[test]
    fn test_lookup_falls_back_to_row() {
        let tree = tree(Flags::NONE);
        let about = tree.node(&Key::Int(2)).unwrap();
        assert_eq!(lookup(about, "title", Flags::NONE), Some(json!("About")));
        assert_eq!(lookup(about, "next", Flags::NONE), Some(json!(null)));
        assert_eq!(lookup(about, "missing", Flags::NONE), None);
    }

    #[test]
    fn test_flat_row_adds_computed_columns() {
        let flags = Flags::NUMBER_NODES | Flags::COUNT_DESCENDANTS;
        let tree = tree(flags);
        let row = flat_row(tree.node(&Key::Int(2)).unwrap(), flags);
        assert_eq!(row.get("title"), Some(&json!("About")));
        assert_eq!(row.get("level"), Some(&json!(1)));
        assert_eq!(row.get("numbering"), Some(&json!("1.1")));
        assert_eq!(row.get("descendants"), Some(&json!(0)));
        assert!(row.get("children").is_none());
    }

    #[test]
    fn test_label() {
        let tree = tree(Flags::NONE);
        let home = tree.node(&Key::Int(1)).unwrap();
        assert_eq!(label(home, &["title".to_string()], Flags::NONE), "1  Home");
        assert_eq!(label(home, &[], Flags::NONE), "1");
    }
}
