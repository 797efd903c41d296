//! Vault location and path layout.

use crate::error::{Result, VaultError};
use glob::glob;
use std::path::{Path, PathBuf};

/// Extension of per-note records.
pub const NOTE_EXTENSION: &str = "cson";

/// Name of the folder config file at the vault root.
pub const CONFIG_FILE: &str = "boostnote.json";

/// Source paths inside the live vault.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourcePaths {
    pub notes_dir: PathBuf,
    pub attachments_dir: PathBuf,
    pub config_file: PathBuf,
}

/// A notes directory paired with its attachments directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreePaths {
    pub notes_dir: PathBuf,
    pub attachments_dir: PathBuf,
}

/// Represents a Boostnote vault together with its export and archive destinations.
#[derive(Debug, Clone)]
pub struct Vault {
    /// Root path of the vault.
    pub root: PathBuf,
    pub source: SourcePaths,
    pub archive: TreePaths,
    pub export: TreePaths,
}

impl Vault {
    /// Open a vault, checking that the root and every required source path exist.
    ///
    /// Archive and export destinations are only derived here; they are created
    /// on demand by the operations that write to them.
    pub fn open(root: impl Into<PathBuf>, export_root: impl AsRef<Path>) -> Result<Self> {
        let root = root.into();

        if !root.is_dir() {
            return Err(VaultError::VaultNotFound(root));
        }

        let source = SourcePaths {
            attachments_dir: root.join("attachments"),
            notes_dir: root.join("notes"),
            config_file: root.join(CONFIG_FILE),
        };

        let required = [
            ("Attachments directory", &source.attachments_dir),
            ("Notes directory", &source.notes_dir),
            ("Config file", &source.config_file),
        ];
        for (what, path) in required {
            if !path.exists() {
                return Err(VaultError::MissingPath {
                    what,
                    path: path.clone(),
                });
            }
        }

        let archive = TreePaths {
            notes_dir: root.join("archived-notes"),
            attachments_dir: root.join("archived-attachments"),
        };

        let export_notes = export_root.as_ref().join("exported-notes");
        let export = TreePaths {
            attachments_dir: export_notes.join("Files"),
            notes_dir: export_notes,
        };

        Ok(Self {
            root,
            source,
            archive,
            export,
        })
    }

    /// Path of a live note record by id.
    pub fn note_record_path(&self, id: &str) -> PathBuf {
        self.source
            .notes_dir
            .join(format!("{}.{}", id, NOTE_EXTENSION))
    }

    /// Path of an archived note record by id.
    pub fn archived_record_path(&self, id: &str) -> PathBuf {
        self.archive
            .notes_dir
            .join(format!("{}.{}", id, NOTE_EXTENSION))
    }

    /// List every note record in the notes directory, sorted by file name.
    pub fn list_note_records(&self) -> Result<Vec<PathBuf>> {
        // Escape the directory so brackets in vault paths are not read as globs
        let notes_dir = glob::Pattern::escape(&self.source.notes_dir.to_string_lossy());
        let pattern_str = format!("{}/*.{}", notes_dir, NOTE_EXTENSION);

        let mut records = Vec::new();

        for entry in glob(&pattern_str)? {
            match entry {
                Ok(path) => {
                    if path.is_file() {
                        records.push(path);
                    }
                }
                Err(e) => {
                    tracing::warn!(error = %e, "skipping unreadable notes directory entry");
                }
            }
        }

        records.sort();

        Ok(records)
    }
}

/// Create each directory (recursively) if it does not exist yet.
pub fn ensure_dirs(tree: &TreePaths) -> Result<()> {
    for dir in [&tree.notes_dir, &tree.attachments_dir] {
        if !dir.is_dir() {
            std::fs::create_dir_all(dir).map_err(VaultError::file_op("create directory", dir))?;
        }
    }
    Ok(())
}


#[cfg(test)]
mod tests {
    use super::test_support::*;
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_open_derives_layout() {
        let (dir, vault) = setup_vault(WORK_FOLDERS);

        assert_eq!(vault.source.notes_dir, dir.path().join("notes"));
        assert_eq!(vault.archive.notes_dir, dir.path().join("archived-notes"));
        assert_eq!(
            vault.export.attachments_dir,
            dir.path().join("out").join("exported-notes").join("Files")
        );
        // destinations are not created by open
        assert!(!vault.archive.notes_dir.exists());
        assert!(!vault.export.notes_dir.exists());
    }

    #[test]
    fn test_open_missing_root() {
        let dir = TempDir::new().unwrap();
        let result = Vault::open(dir.path().join("nope"), dir.path());
        assert!(matches!(result, Err(VaultError::VaultNotFound(_))));
    }

    #[test]
    fn test_open_missing_notes_dir() {
        let dir = TempDir::new().unwrap();
        std::fs::create_dir_all(dir.path().join("attachments")).unwrap();
        std::fs::write(dir.path().join(CONFIG_FILE), "{}").unwrap();

        match Vault::open(dir.path(), dir.path()) {
            Err(VaultError::MissingPath { what, path }) => {
                assert_eq!(what, "Notes directory");
                assert_eq!(path, dir.path().join("notes"));
            }
            other => panic!("expected MissingPath, got {:?}", other),
        }
    }

    #[test]
    fn test_open_missing_config_file() {
        let dir = TempDir::new().unwrap();
        std::fs::create_dir_all(dir.path().join("attachments")).unwrap();
        std::fs::create_dir_all(dir.path().join("notes")).unwrap();

        let result = Vault::open(dir.path(), dir.path());
        assert!(matches!(
            result,
            Err(VaultError::MissingPath { what: "Config file", .. })
        ));
    }

    #[test]
    fn test_list_note_records_filters_extension() {
        let (_dir, vault) = setup_vault(WORK_FOLDERS);
        write_record(&vault, "b", "title: 'B'");
        write_record(&vault, "a", "title: 'A'");
        std::fs::write(vault.source.notes_dir.join("readme.md"), "x").unwrap();

        let records = vault.list_note_records().unwrap();
        let names: Vec<_> = records
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().to_string())
            .collect();
        assert_eq!(names, vec!["a.cson", "b.cson"]);
    }

    #[test]
    fn test_ensure_dirs_is_idempotent() {
        let (_dir, vault) = setup_vault(WORK_FOLDERS);
        ensure_dirs(&vault.export).unwrap();
        ensure_dirs(&vault.export).unwrap();
        assert!(vault.export.attachments_dir.is_dir());
    }
}
