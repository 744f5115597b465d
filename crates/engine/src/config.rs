//! Engine tunables, deserialized from the `engine` section of the app config.

use crate::format::DEFAULT_PRECISION;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct EngineConfig {
    /// Fixed decimals rendered before trailing zeros are stripped.
    #[serde(default = "default_precision")]
    pub precision: usize,
    /// Longest literal the entry buffer accepts; `None` means unbounded.
    #[serde(default)]
    pub max_entry_len: Option<usize>,
}

fn default_precision() -> usize {
    DEFAULT_PRECISION
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            precision: DEFAULT_PRECISION,
            max_entry_len: None,
        }
    }
}
