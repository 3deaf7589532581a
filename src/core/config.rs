use serde::{Deserialize, Serialize};

use crate::core::error::ModResult;

pub const MOD_INFO_FILE: &str = "mcmod.info";
pub const FORGE_PROPERTIES_FILE: &str = "forgeversion.properties";

/// Descriptors are small; anything above this is not worth buffering.
pub const DEFAULT_MAX_DESCRIPTOR_BYTES: u64 = 1024 * 1024;

/// Tunables for descriptor discovery.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ReaderConfig {
    /// Suffix of the JSON descriptor (`mcmod.info`).
    pub info_file_name: String,
    /// Suffix of the Forge version properties file.
    pub forge_properties_name: String,
    pub max_descriptor_bytes: u64,
}

impl Default for ReaderConfig {
    fn default() -> Self {
        Self {
            info_file_name: MOD_INFO_FILE.to_string(),
            forge_properties_name: FORGE_PROPERTIES_FILE.to_string(),
            max_descriptor_bytes: DEFAULT_MAX_DESCRIPTOR_BYTES,
        }
    }
}

impl ReaderConfig {
    /// Load overrides from JSON. Absent fields keep their defaults.
    pub fn from_json_str(json: &str) -> ModResult<Self> {
        Ok(serde_json::from_str(json)?)
    }
}
