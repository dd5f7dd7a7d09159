use std::path::Path;

use serde::{Deserialize, Serialize};
use tablec_core::{GridShape, LabelSpaces};

use crate::error::Result;
use crate::util::read_string;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GridConfig {
    pub min_m: u32,
    pub max_m: u32,
    pub max_eps: u32,
}

impl GridConfig {
    pub fn shape(&self) -> Result<GridShape> {
        Ok(GridShape::new(self.min_m, self.max_m, self.max_eps)?)
    }
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            min_m: 10,
            max_m: 100,
            max_eps: 40,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AccuracyConfig {
    /// Number of labels averaged in diagonal summaries.
    pub take: usize,
}

impl Default for AccuracyConfig {
    fn default() -> Self {
        Self { take: 30 }
    }
}

/// Grid bounds and label-space table shared by every command.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CompilerConfig {
    pub grid: GridConfig,
    pub label_spaces: LabelSpaces,
    pub accuracy: AccuracyConfig,
}

impl CompilerConfig {
    pub fn from_path(path: &Path) -> Result<Self> {
        let content = read_string(path)?;
        let config = serde_json::from_str::<Self>(&content)?;
        config.grid.shape()?;
        Ok(config)
    }

    /// Load `path` when given, otherwise the built-in defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::from_path(path),
            None => Ok(Self::default()),
        }
    }
}
