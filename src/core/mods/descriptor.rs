use std::collections::HashMap;

use serde::Deserialize;

use crate::core::error::{ModError, ModResult};

pub const FORGE_MOD_ID: &str = "Forge";
pub const FORGE_MOD_NAME: &str = "Minecraft Forge";

const FORGE_VERSION_KEYS: [&str; 4] = [
    "forge.major.number",
    "forge.minor.number",
    "forge.revision.number",
    "forge.build.number",
];

/// Which descriptor format was located inside the artifact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DescriptorKind {
    /// JSON `mcmod.info`.
    ModInfo,
    /// `forgeversion.properties`, marks the Forge pseudo-mod.
    ForgeVersion,
}

/// Subset of an `mcmod.info` list entry.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ModInfoFields {
    pub modid: String,
    pub name: String,
    pub version: String,
}

/// Parse an `mcmod.info` document.
///
/// Expected shape: `[ { "modid": .., "name": .., "version": .. }, .. ]`.
/// Only the first entry is read; the three keys are all required.
pub fn parse_mod_info(text: &str) -> ModResult<ModInfoFields> {
    let root: serde_json::Value = serde_json::from_str(text)?;
    let serde_json::Value::Array(entries) = root else {
        return Err(ModError::Descriptor(
            "mcmod.info root is not an array".into(),
        ));
    };
    let first = entries
        .into_iter()
        .next()
        .ok_or_else(|| ModError::Descriptor("mcmod.info mod list is empty".into()))?;

    Ok(serde_json::from_value(first)?)
}

/// Parse `forgeversion.properties` into `major.minor.revision.build`.
///
/// Missing keys render as empty segments, so a file without a build
/// number yields `"1.2.3."`.
pub fn parse_forge_version(text: &str) -> ModResult<String> {
    let props = parse_properties(text)?;
    let segments: Vec<&str> = FORGE_VERSION_KEYS
        .iter()
        .map(|key| props.get(*key).map(String::as_str).unwrap_or(""))
        .collect();
    Ok(segments.join("."))
}

/// Flat INI reader. Dotted keys stay literal; keys under a `[section]`
/// header are not root keys and are dropped.
fn parse_properties(text: &str) -> ModResult<HashMap<String, String>> {
    let mut root = HashMap::new();
    let mut in_section = false;

    for (idx, raw) in text.lines().enumerate() {
        let line_no = idx + 1;
        let line = raw.trim();

        if line.is_empty() || line.starts_with('#') || line.starts_with(';') {
            continue;
        }

        if let Some(rest) = line.strip_prefix('[') {
            if !rest.ends_with(']') {
                return Err(ModError::Properties {
                    line: line_no,
                    message: "unterminated section header".into(),
                });
            }
            in_section = true;
            continue;
        }

        let Some((key, value)) = line.split_once('=') else {
            return Err(ModError::Properties {
                line: line_no,
                message: "expected 'key=value'".into(),
            });
        };
        let key = key.trim();
        if key.is_empty() {
            return Err(ModError::Properties {
                line: line_no,
                message: "empty key".into(),
            });
        }

        if in_section {
            continue;
        }
        if root
            .insert(key.to_string(), value.trim().to_string())
            .is_some()
        {
            return Err(ModError::Properties {
                line: line_no,
                message: format!("duplicate key '{}'", key),
            });
        }
    }

    Ok(root)
}
