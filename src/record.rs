//! Source rows and the key values that link them together

use std::borrow::Cow;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One source row: column name to value.
///
/// Rows are heterogeneous; the tree only requires the index and parent
/// columns, everything else is carried along for rendering.
pub type Record = serde_json::Map<String, Value>;

/// A value of the index, parent or root-sentinel domain.
///
/// Equality is strict: `Key::Str("0")` and `Key::Int(0)` are different keys,
/// so a root sentinel must match the type used by the source rows. Looking a
/// row up by index goes through [`Key::lookup_form`] instead.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Key {
    Null,
    Int(i64),
    Str(String),
}

impl Key {
    /// Convert a JSON value into a key.
    ///
    /// Integers, strings and `null` are valid keys; floats, booleans, arrays
    /// and objects are not.
    pub fn from_value(value: &Value) -> Option<Key> {
        match value {
            Value::Null => Some(Key::Null),
            Value::Number(n) => n.as_i64().map(Key::Int),
            Value::String(s) => Some(Key::Str(s.clone())),
            _ => None,
        }
    }

    /// Parse a key from a command-line style literal.
    ///
    /// The text is read as a JSON literal first (`0`, `"0"`, `null`); text
    /// that is not valid JSON, or is JSON of a non-key type, is taken as a
    /// raw string.
    pub fn parse_literal(text: &str) -> Key {
        serde_json::from_str::<Value>(text)
            .ok()
            .and_then(|v| Key::from_value(&v))
            .unwrap_or_else(|| Key::Str(text.to_string()))
    }

    /// The form under which rows are found by index.
    ///
    /// A string holding an integer in canonical decimal form (`"7"`, `"-3"`)
    /// finds the same row as that integer. `"07"`, `"+3"` and `"-0"` stay
    /// strings.
    pub fn lookup_form(&self) -> Cow<'_, Key> {
        if let Key::Str(s) = self {
            if let Ok(n) = s.parse::<i64>() {
                if n.to_string() == *s {
                    return Cow::Owned(Key::Int(n));
                }
            }
        }
        Cow::Borrowed(self)
    }

    pub fn to_value(&self) -> Value {
        match self {
            Key::Null => Value::Null,
            Key::Int(i) => Value::from(*i),
            Key::Str(s) => Value::String(s.clone()),
        }
    }
}

impl Default for Key {
    /// The conventional root sentinel, the string `"0"`.
    fn default() -> Self {
        Key::Str("0".to_string())
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Key::Null => write!(f, "null"),
            Key::Int(i) => write!(f, "{}", i),
            Key::Str(s) => write!(f, "\"{}\"", s),
        }
    }
}

impl From<i64> for Key {
    fn from(value: i64) -> Self {
        Key::Int(value)
    }
}

impl From<i32> for Key {
    fn from(value: i32) -> Self {
        Key::Int(i64::from(value))
    }
}

impl From<&str> for Key {
    fn from(value: &str) -> Self {
        Key::Str(value.to_string())
    }
}

impl From<String> for Key {
    fn from(value: String) -> Self {
        Key::Str(value)
    }
}

/// Render a column value as template text.
///
/// Strings are inserted verbatim, `null` as nothing, booleans as `1` or
/// nothing, everything else in its JSON form.
pub fn value_to_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::Bool(true) => "1".to_string(),
        Value::Bool(false) => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Build a record from `(column, value)` pairs.
pub fn record<I, K, V>(pairs: I) -> Record
where
    I: IntoIterator<Item = (K, V)>,
    K: Into<String>,
    V: Into<Value>,
{
    pairs
        .into_iter()
        .map(|(k, v)| (k.into(), v.into()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_key_from_value() {
        assert_eq!(Key::from_value(&json!(3)), Some(Key::Int(3)));
        assert_eq!(Key::from_value(&json!("3")), Some(Key::Str("3".into())));
        assert_eq!(Key::from_value(&json!(null)), Some(Key::Null));
        assert_eq!(Key::from_value(&json!(1.5)), None);
        assert_eq!(Key::from_value(&json!(true)), None);
        assert_eq!(Key::from_value(&json!([1])), None);
    }

    #[test]
    fn test_keys_compare_strictly() {
        assert_ne!(Key::Int(0), Key::Str("0".into()));
        assert_eq!(Key::default(), Key::Str("0".into()));
    }

    #[test]
    fn test_lookup_form_folds_integer_strings() {
        assert_eq!(Key::from("12").lookup_form().as_ref(), &Key::Int(12));
        assert_eq!(Key::from("-3").lookup_form().as_ref(), &Key::Int(-3));
        assert_eq!(Key::from("0").lookup_form().as_ref(), &Key::Int(0));
        assert_eq!(Key::Int(12).lookup_form().as_ref(), &Key::Int(12));
        for text in ["07", "+3", "-0", " 1", "1.0", "home", ""] {
            assert_eq!(Key::from(text).lookup_form().as_ref(), &Key::from(text));
        }
        assert_eq!(Key::Null.lookup_form().as_ref(), &Key::Null);
    }

    #[test]
    fn test_parse_literal() {
        assert_eq!(Key::parse_literal("0"), Key::Int(0));
        assert_eq!(Key::parse_literal("\"0\""), Key::Str("0".into()));
        assert_eq!(Key::parse_literal("null"), Key::Null);
        assert_eq!(Key::parse_literal("root"), Key::Str("root".into()));
        assert_eq!(Key::parse_literal("1.5"), Key::Str("1.5".into()));
    }

    #[test]
    fn test_value_to_text() {
        assert_eq!(value_to_text(&json!("Home")), "Home");
        assert_eq!(value_to_text(&json!(12)), "12");
        assert_eq!(value_to_text(&json!(null)), "");
        assert_eq!(value_to_text(&json!(true)), "1");
        assert_eq!(value_to_text(&json!(false)), "");
    }

    #[test]
    fn test_record_builder() {
        let row = record([("id", json!(1)), ("parent", json!(0))]);
        assert_eq!(row.get("id"), Some(&json!(1)));
        assert_eq!(row.keys().collect::<Vec<_>>(), vec!["id", "parent"]);
    }
}
