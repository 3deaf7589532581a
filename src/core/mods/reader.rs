use std::path::Path;

use tracing::debug;

use super::descriptor::{self, DescriptorKind, ModInfoFields};
use super::entries::{self, DirEntries, EntrySource, ZipEntries};
use super::model::ModType;
use crate::core::config::ReaderConfig;
use crate::core::error::ModResult;

/// A descriptor that was found, not yet parsed. Reading it may have
/// failed; the kind is known either way.
#[derive(Debug)]
pub struct LocatedDescriptor {
    /// Entry name inside the archive, or the file name inside the folder.
    pub entry: String,
    pub kind: DescriptorKind,
    pub contents: ModResult<String>,
}

/// Parsed result of a descriptor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParsedMetadata {
    ModInfo(ModInfoFields),
    Forge { version: String },
}

/// Locate and parse the descriptor of a mod artifact.
///
/// `Ok(None)` means nothing was found (always the case for single files);
/// `Err` means the artifact or its descriptor could not be read or parsed.
pub fn read_metadata(
    path: &Path,
    mod_type: ModType,
    config: &ReaderConfig,
) -> ModResult<Option<ParsedMetadata>> {
    match locate_descriptor(path, mod_type, config)? {
        Some(located) => parse_descriptor(located).map(Some),
        None => Ok(None),
    }
}

/// Find the descriptor for `mod_type` and read its contents.
///
/// `Err` covers failures before a descriptor is identified (opening the
/// archive or listing the folder); read failures of the found entry land
/// in `LocatedDescriptor::contents`.
pub fn locate_descriptor(
    path: &Path,
    mod_type: ModType,
    config: &ReaderConfig,
) -> ModResult<Option<LocatedDescriptor>> {
    match mod_type {
        ModType::Archive => locate_in_archive(path, config),
        ModType::Folder => locate_in_folder(path, config),
        ModType::SingleFile => Ok(None),
    }
}

pub fn parse_descriptor(located: LocatedDescriptor) -> ModResult<ParsedMetadata> {
    let contents = located.contents?;
    match located.kind {
        DescriptorKind::ModInfo => {
            descriptor::parse_mod_info(&contents).map(ParsedMetadata::ModInfo)
        }
        DescriptorKind::ForgeVersion => descriptor::parse_forge_version(&contents)
            .map(|version| ParsedMetadata::Forge { version }),
    }
}

fn locate_in_archive(path: &Path, config: &ReaderConfig) -> ModResult<Option<LocatedDescriptor>> {
    let mut archive = ZipEntries::open(path)?;
    locate_in_source(&mut archive, config)
}

/// Archive discovery over any entry source.
pub fn locate_in_source<S: EntrySource>(
    source: &mut S,
    config: &ReaderConfig,
) -> ModResult<Option<LocatedDescriptor>> {
    let names = source.entry_names()?;
    let Some((entry, kind)) = entries::find_descriptor(&names, config) else {
        return Ok(None);
    };

    debug!("Found {:?} descriptor at '{}'", kind, entry);
    let contents = source.read_entry(&entry, config.max_descriptor_bytes);
    Ok(Some(LocatedDescriptor {
        entry,
        kind,
        contents,
    }))
}

fn locate_in_folder(path: &Path, config: &ReaderConfig) -> ModResult<Option<LocatedDescriptor>> {
    let direct = path.join(&config.info_file_name);
    if direct.is_file() {
        debug!("Found direct descriptor {:?}", direct);
        let contents = entries::read_text_file(&direct, config.max_descriptor_bytes);
        return Ok(Some(LocatedDescriptor {
            entry: config.info_file_name.clone(),
            kind: DescriptorKind::ModInfo,
            contents,
        }));
    }

    let mut dir = DirEntries::open(path)?;
    let names = dir.entry_names()?;
    let Some(entry) = entries::find_info_file(&names, config) else {
        return Ok(None);
    };

    // A directory named like the descriptor ends the search.
    if !dir.root().join(&entry).is_file() {
        debug!("Descriptor candidate '{}' in {:?} is not a file", entry, path);
        return Ok(None);
    }

    let contents = dir.read_entry(&entry, config.max_descriptor_bytes);
    Ok(Some(LocatedDescriptor {
        entry,
        kind: DescriptorKind::ModInfo,
        contents,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::ModError;

    /// In-memory entry source; keeps discovery independent of zip and fs.
    struct MemEntries(Vec<(String, String)>);

    impl EntrySource for MemEntries {
        fn entry_names(&mut self) -> ModResult<Vec<String>> {
            Ok(self.0.iter().map(|(n, _)| n.clone()).collect())
        }

        fn read_entry(&mut self, name: &str, limit: u64) -> ModResult<String> {
            let (_, body) = self
                .0
                .iter()
                .find(|(n, _)| n == name)
                .ok_or_else(|| ModError::Descriptor(format!("no entry {}", name)))?;
            if body.len() as u64 > limit {
                return Err(ModError::TooLarge {
                    name: name.to_string(),
                    size: body.len() as u64,
                    limit,
                });
            }
            Ok(body.clone())
        }
    }

    #[test]
    fn memory_source_locates_forge_properties() {
        let mut source = MemEntries(vec![
            ("net/minecraftforge/Loader.class".into(), String::new()),
            (
                "forgeversion.properties".into(),
                "forge.major.number=4\n".into(),
            ),
        ]);
        let located = locate_in_source(&mut source, &ReaderConfig::default())
            .unwrap()
            .unwrap();
        assert_eq!(located.kind, DescriptorKind::ForgeVersion);
        assert_eq!(
            parse_descriptor(located).unwrap(),
            ParsedMetadata::Forge {
                version: "4...".into()
            }
        );
    }

    #[test]
    fn memory_source_without_descriptor() {
        let mut source = MemEntries(vec![("a.class".into(), String::new())]);
        assert!(locate_in_source(&mut source, &ReaderConfig::default())
            .unwrap()
            .is_none());
    }

    #[test]
    fn oversized_entry_still_reports_its_kind() {
        let cfg = ReaderConfig {
            max_descriptor_bytes: 4,
            ..ReaderConfig::default()
        };
        let mut source = MemEntries(vec![(
            "META-INF/forgeversion.properties".into(),
            "forge.major.number=4\n".into(),
        )]);

        let located = locate_in_source(&mut source, &cfg).unwrap().unwrap();
        assert_eq!(located.kind, DescriptorKind::ForgeVersion);
        assert!(matches!(located.contents, Err(ModError::TooLarge { .. })));
        assert!(parse_descriptor(located).is_err());
    }

    #[test]
    fn single_file_is_never_inspected() {
        let missing = std::env::temp_dir().join("reader-test-does-not-exist.litemod");
        let found = read_metadata(&missing, ModType::SingleFile, &ReaderConfig::default());
        assert!(matches!(found, Ok(None)));
    }

    #[test]
    fn custom_info_name_is_honoured() {
        let cfg = ReaderConfig {
            info_file_name: "mod.json".into(),
            ..ReaderConfig::default()
        };
        let mut source = MemEntries(vec![(
            "mod.json".into(),
            r#"[{"modid":"x","name":"X","version":"0.1"}]"#.into(),
        )]);
        let located = locate_in_source(&mut source, &cfg).unwrap().unwrap();
        assert!(matches!(
            parse_descriptor(located).unwrap(),
            ParsedMetadata::ModInfo(ref f) if f.modid == "x"
        ));
    }
}
