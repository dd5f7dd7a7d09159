use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{Result, TableError};

/// `bits → m` table: how many labels a run with a given bit-width produces.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "BTreeMap<u32, usize>", into = "BTreeMap<u32, usize>")]
pub struct LabelSpaces {
    sizes: BTreeMap<u32, usize>,
}

impl LabelSpaces {
    pub fn new(sizes: BTreeMap<u32, usize>) -> Result<Self> {
        if let Some((bits, _)) = sizes.iter().find(|(_, size)| **size == 0) {
            return Err(TableError::shape(format!(
                "label space for bits={bits} is empty"
            )));
        }
        Ok(Self { sizes })
    }

    pub fn size_for(&self, bits: u32) -> Result<usize> {
        self.sizes
            .get(&bits)
            .copied()
            .ok_or(TableError::UnknownBits { bits })
    }

    pub fn iter(&self) -> impl Iterator<Item = (u32, usize)> + '_ {
        self.sizes.iter().map(|(bits, size)| (*bits, *size))
    }
}

impl Default for LabelSpaces {
    fn default() -> Self {
        Self {
            sizes: BTreeMap::from([(4, 11), (5, 34), (6, 156)]),
        }
    }
}

impl TryFrom<BTreeMap<u32, usize>> for LabelSpaces {
    type Error = TableError;

    fn try_from(sizes: BTreeMap<u32, usize>) -> Result<Self> {
        Self::new(sizes)
    }
}

impl From<LabelSpaces> for BTreeMap<u32, usize> {
    fn from(spaces: LabelSpaces) -> Self {
        spaces.sizes
    }
}
