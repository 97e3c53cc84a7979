//! Hierarchical numbering of tree nodes
//!
//! A [`Numberer`] turns a node's level and 1-based position among its
//! siblings into a label such as `1.2.3` or `B.c`. Each level can use its own
//! [`NumberScheme`], falling back to a default one.

mod schemes;

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::rc::Rc;

use serde::{Deserialize, Serialize};

pub use schemes::{Scheme, UnknownScheme};

/// Produces the symbol for one ordinal.
///
/// Implementations must be pure functions of the ordinal. Ordinals start at 1.
pub trait NumberScheme {
    fn symbol(&self, ordinal: u32) -> String;
}

impl<F> NumberScheme for F
where
    F: Fn(u32) -> String,
{
    fn symbol(&self, ordinal: u32) -> String {
        self(ordinal)
    }
}

/// Per-level numbering formatter.
#[derive(Clone)]
pub struct Numberer {
    default: Rc<dyn NumberScheme>,
    levels: HashMap<u32, Rc<dyn NumberScheme>>,
    delimiter: String,
}

impl Numberer {
    pub fn new(default: impl NumberScheme + 'static) -> Self {
        Self {
            default: Rc::new(default),
            levels: HashMap::new(),
            delimiter: ".".to_string(),
        }
    }

    /// Use `scheme` for nodes at `level` instead of the default.
    pub fn with_level(mut self, level: u32, scheme: impl NumberScheme + 'static) -> Self {
        self.levels.insert(level, Rc::new(scheme));
        self
    }

    pub fn with_delimiter(mut self, delimiter: impl Into<String>) -> Self {
        self.delimiter = delimiter.into();
        self
    }

    pub fn delimiter(&self) -> &str {
        &self.delimiter
    }

    /// Label for a node: the parent's label, the delimiter, then this node's
    /// symbol. Roots (no parent label) get the bare symbol.
    pub fn format(&self, level: u32, child_number: u32, parent: Option<&str>) -> String {
        let scheme = self.levels.get(&level).unwrap_or(&self.default);
        let symbol = scheme.symbol(child_number);
        match parent {
            Some(prefix) => format!("{}{}{}", prefix, self.delimiter, symbol),
            None => symbol,
        }
    }
}

impl Default for Numberer {
    fn default() -> Self {
        Self::new(Scheme::Decimal)
    }
}

impl fmt::Debug for Numberer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut levels: Vec<&u32> = self.levels.keys().collect();
        levels.sort();
        f.debug_struct("Numberer")
            .field("levels", &levels)
            .field("delimiter", &self.delimiter)
            .finish_non_exhaustive()
    }
}

/// Serializable description of a [`Numberer`] built from named schemes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NumberingConfig {
    pub default: Scheme,
    pub levels: BTreeMap<u32, Scheme>,
    pub delimiter: String,
}

impl Default for NumberingConfig {
    fn default() -> Self {
        Self {
            default: Scheme::Decimal,
            levels: BTreeMap::new(),
            delimiter: ".".to_string(),
        }
    }
}

impl NumberingConfig {
    /// Parse a compact scheme list such as `default=decimal,1=lower-latin`.
    ///
    /// A bare scheme name sets the default. The delimiter is left untouched.
    pub fn parse_schemes(&mut self, list: &str) -> Result<(), UnknownScheme> {
        for entry in list.split(',').map(str::trim).filter(|e| !e.is_empty()) {
            match entry.split_once('=') {
                None => self.default = entry.parse()?,
                Some((key, value)) => {
                    let scheme: Scheme = value.parse()?;
                    let key = key.trim();
                    if key == "default" {
                        self.default = scheme;
                    } else {
                        let level = key
                            .parse::<u32>()
                            .map_err(|_| UnknownScheme(entry.to_string()))?;
                        self.levels.insert(level, scheme);
                    }
                }
            }
        }
        Ok(())
    }

    pub fn to_numberer(&self) -> Numberer {
        self.levels.iter().fold(
            Numberer::new(self.default).with_delimiter(self.delimiter.clone()),
            |numberer, (&level, &scheme)| numberer.with_level(level, scheme),
        )
    }
}
