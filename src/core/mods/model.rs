use std::hash::{Hash, Hasher};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, error, warn};

use super::descriptor::{DescriptorKind, FORGE_MOD_ID, FORGE_MOD_NAME};
use super::reader::{self, ParsedMetadata};
use crate::core::config::ReaderConfig;
use crate::core::error::ModError;

/// How a mod artifact is packaged.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum ModType {
    /// A plain file; never inspected.
    SingleFile,
    /// A `.zip` or `.jar`.
    Archive,
    /// A directory.
    Folder,
}

impl ModType {
    /// Classify `path` from the filesystem as it is right now.
    pub fn detect(path: &Path) -> Self {
        if path.is_dir() {
            return ModType::Folder;
        }
        let is_archive = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.eq_ignore_ascii_case("zip") || ext.eq_ignore_ascii_case("jar"))
            .unwrap_or(false);
        if is_archive {
            ModType::Archive
        } else {
            ModType::SingleFile
        }
    }
}

impl std::fmt::Display for ModType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ModType::SingleFile => write!(f, "singlefile"),
            ModType::Archive => write!(f, "archive"),
            ModType::Folder => write!(f, "folder"),
        }
    }
}

/// Outcome of the metadata lookup done at construction.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "status", content = "detail", rename_all = "snake_case")]
pub enum MetadataStatus {
    Parsed(DescriptorKind),
    /// No descriptor, or a single-file mod.
    NotFound,
    /// Rendered error from opening, reading or parsing.
    Failed(String),
}

/// One mod artifact with whatever identity its descriptor provided.
///
/// Name and mod id start as the file stem and version starts empty; a
/// descriptor that is missing or broken leaves them that way.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Mod {
    path: PathBuf,
    name: String,
    mod_id: String,
    version: String,
    /// Never filled by any descriptor format read here.
    mc_version: String,
    mod_type: ModType,
    metadata: MetadataStatus,
}

impl Mod {
    /// Read the mod at `path`, detecting its storage kind.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self::with_type(path, None)
    }

    /// Read the mod at `path`. `None` auto-detects the kind.
    pub fn with_type(path: impl Into<PathBuf>, mod_type: Option<ModType>) -> Self {
        Self::with_config(path, mod_type, &ReaderConfig::default())
    }

    pub fn with_config(
        path: impl Into<PathBuf>,
        mod_type: Option<ModType>,
        config: &ReaderConfig,
    ) -> Self {
        let path = path.into();
        let mod_type = mod_type.unwrap_or_else(|| ModType::detect(&path));
        let stem = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();

        let mut m = Self {
            path,
            name: stem.clone(),
            mod_id: stem,
            version: String::new(),
            mc_version: String::new(),
            mod_type,
            metadata: MetadataStatus::NotFound,
        };
        m.load_metadata(config);
        m
    }

    fn load_metadata(&mut self, config: &ReaderConfig) {
        let located = match reader::locate_descriptor(&self.path, self.mod_type, config) {
            Ok(Some(located)) => located,
            Ok(None) => {
                debug!("No descriptor in {:?} ({})", self.path, self.mod_type);
                return;
            }
            Err(e) => {
                self.record_failure(e);
                return;
            }
        };

        // Forge identity holds as soon as its properties entry is found,
        // even if reading or parsing it fails afterwards.
        let kind = located.kind;
        let entry = located.entry.clone();
        if kind == DescriptorKind::ForgeVersion {
            self.mod_id = FORGE_MOD_ID.to_string();
            self.name = FORGE_MOD_NAME.to_string();
        }

        match reader::parse_descriptor(located) {
            Ok(ParsedMetadata::ModInfo(fields)) => {
                self.mod_id = fields.modid;
                self.name = fields.name;
                self.version = fields.version;
            }
            Ok(ParsedMetadata::Forge { version }) => self.version = version,
            Err(e) => {
                warn!(
                    "Unusable descriptor '{}' in {:?}: {}",
                    entry, self.path, e
                );
                self.metadata = MetadataStatus::Failed(e.to_string());
                return;
            }
        }
        self.metadata = MetadataStatus::Parsed(kind);
    }

    fn record_failure(&mut self, e: ModError) {
        let folder_unreadable = self.mod_type == ModType::Folder
            && matches!(&e, ModError::Io { path, .. } if *path == self.path);
        if folder_unreadable {
            error!(
                "Can't find mod info file. Failed to open mod folder {:?}: {}",
                self.path, e
            );
        } else {
            warn!("Failed to read metadata of {:?}: {}", self.path, e);
        }
        self.metadata = MetadataStatus::Failed(e.to_string());
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Mod id from the descriptor, or the file stem.
    pub fn mod_id(&self) -> &str {
        &self.mod_id
    }

    /// Full file name including extension. Independent of `mod_id()`.
    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default()
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    /// Always empty; kept for front-ends that display the column.
    pub fn mc_version(&self) -> &str {
        &self.mc_version
    }

    pub fn mod_type(&self) -> ModType {
        self.mod_type
    }

    pub fn metadata(&self) -> &MetadataStatus {
        &self.metadata
    }

    pub fn is_archive(&self) -> bool {
        self.mod_type == ModType::Archive
    }
}

// Identity is the artifact path, not its contents.
impl PartialEq for Mod {
    fn eq(&self, other: &Self) -> bool {
        self.path == other.path
    }
}

impl Eq for Mod {}

impl Hash for Mod {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.path.hash(state);
    }
}
