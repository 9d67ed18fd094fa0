use crate::assemble::NodeKeying;
use crate::error::Result;
use crate::graph::DisplayTag;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Fill colours per display tag (Graphviz colour names)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Palette {
    pub field: String,
    pub property: String,
    pub method: String,
    pub mutable: String,
    pub public: String,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            field: "lightblue".to_string(),
            property: "lightgreen".to_string(),
            method: "white".to_string(),
            mutable: "salmon".to_string(),
            public: "gold".to_string(),
        }
    }
}

impl Palette {
    #[must_use]
    pub fn color(&self, tag: DisplayTag) -> &str {
        match tag {
            DisplayTag::Field => &self.field,
            DisplayTag::Property => &self.property,
            DisplayTag::Method => &self.method,
            DisplayTag::Mutable => &self.mutable,
            DisplayTag::Public => &self.public,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GraphConfig {
    pub keying: NodeKeying,
    /// Worker threads for reference resolution; `None` uses the global pool
    pub resolver_threads: Option<usize>,
    pub palette: Palette,
}

impl GraphConfig {
    pub fn from_toml(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        let config = Self::from_toml(&text)?;
        log::debug!("Loaded config from {}", path.display());
        Ok(config)
    }
}
