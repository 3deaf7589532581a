use std::fs::{self, File};
use std::io::Read;
use std::path::{Path, PathBuf};

use tracing::debug;
use zip::ZipArchive;

use super::descriptor::DescriptorKind;
use crate::core::config::ReaderConfig;
use crate::core::error::{ModError, ModResult};

/// Anything that exposes named entries which can be read as text:
/// a jar/zip archive or a mod folder.
pub trait EntrySource {
    /// Entry names in the order the source stores them.
    fn entry_names(&mut self) -> ModResult<Vec<String>>;

    /// Read one entry fully as (lossy) UTF-8. Entries above `limit`
    /// bytes are refused.
    fn read_entry(&mut self, name: &str, limit: u64) -> ModResult<String>;
}

/// Entries of a zip/jar, in central-directory order.
pub struct ZipEntries {
    archive: ZipArchive<File>,
}

impl ZipEntries {
    pub fn open(path: &Path) -> ModResult<Self> {
        let file = File::open(path).map_err(|source| ModError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let archive = ZipArchive::new(file)?;
        Ok(Self { archive })
    }
}

impl EntrySource for ZipEntries {
    fn entry_names(&mut self) -> ModResult<Vec<String>> {
        let mut names = Vec::with_capacity(self.archive.len());
        for i in 0..self.archive.len() {
            let entry = self.archive.by_index_raw(i)?;
            names.push(entry.name().to_string());
        }
        Ok(names)
    }

    fn read_entry(&mut self, name: &str, limit: u64) -> ModResult<String> {
        let entry = self.archive.by_name(name)?;
        let size = entry.size();
        if size > limit {
            return Err(ModError::TooLarge {
                name: name.to_string(),
                size,
                limit,
            });
        }

        // Declared sizes can lie; never buffer more than the limit.
        let mut bytes = Vec::with_capacity(size.min(PREALLOC_CAP) as usize);
        read_capped(entry, name, limit, &mut bytes)?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }
}

/// Direct children of a mod folder, in `read_dir` order (unordered).
pub struct DirEntries {
    root: PathBuf,
}

impl DirEntries {
    /// Fails when the folder itself cannot be listed.
    pub fn open(path: &Path) -> ModResult<Self> {
        fs::read_dir(path).map_err(|source| ModError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self {
            root: path.to_path_buf(),
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl EntrySource for DirEntries {
    fn entry_names(&mut self) -> ModResult<Vec<String>> {
        let entries = fs::read_dir(&self.root).map_err(|source| ModError::Io {
            path: self.root.clone(),
            source,
        })?;

        let mut names = Vec::new();
        for entry in entries {
            match entry {
                Ok(entry) => names.push(entry.file_name().to_string_lossy().into_owned()),
                Err(e) => debug!("Skipping unreadable entry in {:?}: {}", self.root, e),
            }
        }
        Ok(names)
    }

    fn read_entry(&mut self, name: &str, limit: u64) -> ModResult<String> {
        let path = self.root.join(name);
        read_text_file(&path, limit)
    }
}

/// Read a descriptor file from disk, refusing anything above `limit` bytes.
pub(crate) fn read_text_file(path: &Path, limit: u64) -> ModResult<String> {
    let io_err = |source| ModError::Io {
        path: path.to_path_buf(),
        source,
    };

    let size = fs::metadata(path).map_err(io_err)?.len();
    if size > limit {
        return Err(ModError::TooLarge {
            name: path.display().to_string(),
            size,
            limit,
        });
    }
    let file = File::open(path).map_err(io_err)?;
    let mut bytes = Vec::with_capacity(size.min(PREALLOC_CAP) as usize);
    read_capped(file, &path.display().to_string(), limit, &mut bytes).map_err(|e| match e {
        ModError::Io { source, .. } => io_err(source),
        other => other,
    })?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

/// Upper bound on up-front allocation; the declared size is only a hint.
const PREALLOC_CAP: u64 = 64 * 1024;

/// Buffer at most `limit` bytes of `reader`; one byte more means too large.
fn read_capped<R: Read>(reader: R, name: &str, limit: u64, bytes: &mut Vec<u8>) -> ModResult<()> {
    reader.take(limit.saturating_add(1)).read_to_end(bytes)?;
    if bytes.len() as u64 > limit {
        return Err(ModError::TooLarge {
            name: name.to_string(),
            size: bytes.len() as u64,
            limit,
        });
    }
    Ok(())
}

/// Single pass over `names`: the first entry ending in the info file name
/// or the Forge properties name wins. The info suffix is checked first
/// for each entry.
pub fn find_descriptor(names: &[String], config: &ReaderConfig) -> Option<(String, DescriptorKind)> {
    names.iter().find_map(|name| {
        if name.ends_with(&config.info_file_name) {
            Some((name.clone(), DescriptorKind::ModInfo))
        } else if name.ends_with(&config.forge_properties_name) {
            Some((name.clone(), DescriptorKind::ForgeVersion))
        } else {
            None
        }
    })
}

/// First entry ending in the info file name. Folders never carry the
/// Forge pseudo-mod.
pub fn find_info_file(names: &[String], config: &ReaderConfig) -> Option<String> {
    names
        .iter()
        .find(|name| name.ends_with(&config.info_file_name))
        .cloned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn first_match_wins_in_stored_order() {
        let cfg = ReaderConfig::default();
        let list = names(&[
            "META-INF/MANIFEST.MF",
            "META-INF/forgeversion.properties",
            "mcmod.info",
        ]);
        assert_eq!(
            find_descriptor(&list, &cfg),
            Some((
                "META-INF/forgeversion.properties".to_string(),
                DescriptorKind::ForgeVersion
            ))
        );
    }

    #[test]
    fn suffix_match_covers_nested_entries() {
        let cfg = ReaderConfig::default();
        let list = names(&["assets/", "data/mcmod.info", "other/mcmod.info"]);
        assert_eq!(
            find_descriptor(&list, &cfg),
            Some(("data/mcmod.info".to_string(), DescriptorKind::ModInfo))
        );
    }

    #[test]
    fn no_descriptor_found() {
        let cfg = ReaderConfig::default();
        assert_eq!(find_descriptor(&names(&["a.class", "b.png"]), &cfg), None);
        assert_eq!(find_info_file(&names(&["forgeversion.properties"]), &cfg), None);
    }

    #[test]
    fn zip_entries_list_and_read() {
        let temp = std::env::temp_dir().join(format!("entries-test-zip-{}", std::process::id()));
        let _ = std::fs::remove_dir_all(&temp);
        std::fs::create_dir_all(&temp).unwrap();
        let jar = temp.join("sample.jar");

        {
            let mut writer = zip::ZipWriter::new(File::create(&jar).unwrap());
            let options = zip::write::SimpleFileOptions::default();
            writer.start_file("first.txt", options).unwrap();
            writer.write_all(b"one").unwrap();
            writer.start_file("second/mcmod.info", options).unwrap();
            writer.write_all(b"[]").unwrap();
            writer.finish().unwrap();
        }

        let mut entries = ZipEntries::open(&jar).unwrap();
        assert_eq!(
            entries.entry_names().unwrap(),
            vec!["first.txt".to_string(), "second/mcmod.info".to_string()]
        );
        assert_eq!(entries.read_entry("second/mcmod.info", 1024).unwrap(), "[]");

        let err = entries.read_entry("first.txt", 2).unwrap_err();
        assert!(matches!(err, ModError::TooLarge { .. }));

        let _ = std::fs::remove_dir_all(&temp);
    }

    #[test]
    fn unbounded_limit_reads_whole_entry() {
        let temp = std::env::temp_dir().join(format!("entries-test-max-{}", std::process::id()));
        let _ = std::fs::remove_dir_all(&temp);
        std::fs::create_dir_all(&temp).unwrap();
        let jar = temp.join("max.jar");

        {
            let mut writer = zip::ZipWriter::new(File::create(&jar).unwrap());
            writer
                .start_file("mcmod.info", zip::write::SimpleFileOptions::default())
                .unwrap();
            writer.write_all(b"[1]").unwrap();
            writer.finish().unwrap();
        }
        std::fs::write(temp.join("plain.info"), b"abc").unwrap();

        let mut entries = ZipEntries::open(&jar).unwrap();
        assert_eq!(entries.read_entry("mcmod.info", u64::MAX).unwrap(), "[1]");
        assert_eq!(read_text_file(&temp.join("plain.info"), u64::MAX).unwrap(), "abc");
        assert!(matches!(
            read_text_file(&temp.join("plain.info"), 2),
            Err(ModError::TooLarge { .. })
        ));

        let _ = std::fs::remove_dir_all(&temp);
    }

    #[test]
    fn zip_entries_reject_non_archive() {
        let temp = std::env::temp_dir().join(format!("entries-test-notzip-{}", std::process::id()));
        let _ = std::fs::remove_dir_all(&temp);
        std::fs::create_dir_all(&temp).unwrap();
        let fake = temp.join("fake.jar");
        std::fs::write(&fake, b"definitely not a zip").unwrap();

        assert!(matches!(ZipEntries::open(&fake), Err(ModError::Zip(_))));
        assert!(matches!(
            ZipEntries::open(&temp.join("missing.jar")),
            Err(ModError::Io { .. })
        ));

        let _ = std::fs::remove_dir_all(&temp);
    }

    #[test]
    fn dir_entries_list_children() {
        let temp = std::env::temp_dir().join(format!("entries-test-dir-{}", std::process::id()));
        let _ = std::fs::remove_dir_all(&temp);
        std::fs::create_dir_all(temp.join("nested")).unwrap();
        std::fs::write(temp.join("my.mcmod.info"), b"[]").unwrap();

        let mut dir = DirEntries::open(&temp).unwrap();
        let mut list = dir.entry_names().unwrap();
        list.sort();
        assert_eq!(list, names(&["my.mcmod.info", "nested"]));
        assert_eq!(dir.read_entry("my.mcmod.info", 16).unwrap(), "[]");

        assert!(DirEntries::open(&temp.join("absent")).is_err());

        let _ = std::fs::remove_dir_all(&temp);
    }
}
