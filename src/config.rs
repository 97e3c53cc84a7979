//! JSON configuration file
//!
//! Every field has a default, so a config file only needs the values it
//! changes:
//!
//! ```json
//! {
//!   "index": "node_id",
//!   "root": 0,
//!   "number": true,
//!   "numbering": { "levels": { "1": "lower-latin" } },
//!   "view": { "item": "<li class=\"n{{level}}\">{{}}</li>" }
//! }
//! ```

use std::error::Error;
use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::numbering::NumberingConfig;
use crate::output::ViewConfig;
use crate::record::Key;
use crate::tree::{Flags, LinkingStrategy, TreeConfig};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SproutConfig {
    pub index: String,
    pub parent: String,
    pub root: Key,
    pub count_children: bool,
    pub count_descendants: bool,
    pub number: bool,
    pub debug: bool,
    pub fused: bool,
    pub numbering: NumberingConfig,
    pub view: ViewConfig,
}

impl Default for SproutConfig {
    fn default() -> Self {
        Self {
            index: "id".to_string(),
            parent: "parent".to_string(),
            root: Key::default(),
            count_children: false,
            count_descendants: false,
            number: false,
            debug: false,
            fused: false,
            numbering: NumberingConfig::default(),
            view: ViewConfig::default(),
        }
    }
}

impl SproutConfig {
    /// Read a config file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = serde_json::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        log::debug!("loaded config from {}", path.display());
        Ok(config)
    }

    pub fn flags(&self) -> Flags {
        let mut flags = Flags::NONE;
        flags.set(Flags::COUNT_CHILDREN, self.count_children);
        flags.set(Flags::COUNT_DESCENDANTS, self.count_descendants);
        flags.set(Flags::NUMBER_NODES, self.number);
        flags.set(Flags::DEBUG_MODE, self.debug);
        flags
    }

    pub fn strategy(&self) -> LinkingStrategy {
        if self.fused {
            LinkingStrategy::Fused
        } else {
            LinkingStrategy::TwoPass
        }
    }

    pub fn to_tree_config(&self) -> TreeConfig {
        let mut config = TreeConfig::new(self.index.as_str(), self.parent.as_str())
            .with_root(self.root.clone())
            .with_strategy(self.strategy());
        config.numberer = self.numbering.to_numberer();
        config.with_flags(self.flags())
    }
}

#[derive(Debug)]
pub enum ConfigError {
    Io { path: PathBuf, source: io::Error },
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io { path, source } => {
                write!(f, "cannot read config '{}': {}", path.display(), source)
            }
            ConfigError::Parse { path, source } => {
                write!(f, "invalid config '{}': {}", path.display(), source)
            }
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            ConfigError::Io { source, .. } => Some(source),
            ConfigError::Parse { source, .. } => Some(source),
        }
    }
}
