//! Folder catalog loaded from `boostnote.json`.

use crate::error::{Result, VaultError};
use crate::vault::Vault;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// A folder defined in the vault config.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoteFolder {
    #[serde(rename = "key")]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub color: String,
}

#[derive(Debug, Deserialize)]
struct FolderConfigFile {
    folders: Vec<NoteFolder>,
}

/// Immutable folder lookup table, loaded once per run and passed to consumers.
#[derive(Debug, Clone, Default)]
pub struct FolderCatalog {
    folders: Vec<NoteFolder>,
}

impl FolderCatalog {
    /// Load the catalog from the vault's config file.
    pub fn load(vault: &Vault) -> Result<Self> {
        Self::load_file(&vault.source.config_file)
    }

    /// Load the catalog from a config file path.
    pub fn load_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .map_err(|e| VaultError::ConfigError(format!("{}: {}", path.display(), e)))?;
        Self::parse(&raw)
            .map_err(|e| VaultError::ConfigError(format!("{}: {}", path.display(), e)))
    }

    /// Parse the JSON text of a folder config file.
    pub fn parse(raw: &str) -> Result<Self> {
        let file: FolderConfigFile = serde_json::from_str(raw)?;
        Ok(Self::new(file.folders))
    }

    pub fn new(folders: Vec<NoteFolder>) -> Self {
        Self { folders }
    }

    /// All folders in config order.
    pub fn folders(&self) -> &[NoteFolder] {
        &self.folders
    }

    /// Case-insensitive exact match on the folder name.
    pub fn find_by_name(&self, name: &str) -> Result<&NoteFolder> {
        let wanted = name.to_lowercase();
        self.folders
            .iter()
            .find(|f| f.name.to_lowercase() == wanted)
            .ok_or_else(|| VaultError::FolderNotFound(name.to_string()))
    }

    /// Exact match on the folder id.
    pub fn find_by_id(&self, id: &str) -> Result<&NoteFolder> {
        self.get(id)
            .ok_or_else(|| VaultError::FolderIdNotFound(id.to_string()))
    }

    /// Lookup that treats an unknown id as "no folder".
    pub fn get(&self, id: &str) -> Option<&NoteFolder> {
        self.folders.iter().find(|f| f.id == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vault::test_support::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_load_from_vault() {
        let (_dir, vault) = setup_vault(WORK_FOLDERS);
        let catalog = FolderCatalog::load(&vault).unwrap();

        assert_eq!(
            catalog.folders(),
            &[
                NoteFolder {
                    id: "f1".into(),
                    name: "Work".into(),
                    color: "#E10051".into()
                },
                NoteFolder {
                    id: "f2".into(),
                    name: "Home".into(),
                    color: "#3FD941".into()
                },
            ]
        );
    }

    #[test]
    fn test_color_is_optional() {
        let catalog = FolderCatalog::parse(r#"{"folders":[{"key":"x","name":"X"}]}"#).unwrap();
        assert_eq!(catalog.folders()[0].color, "");
    }

    #[test]
    fn test_unparsable_config_is_config_error() {
        let (_dir, vault) = setup_vault("{ not json");
        let result = FolderCatalog::load(&vault);
        assert!(matches!(result, Err(VaultError::ConfigError(_))));
    }

    #[test]
    fn test_missing_folders_key_is_config_error() {
        let (_dir, vault) = setup_vault(r#"{"version":"1.0"}"#);
        let result = FolderCatalog::load(&vault);
        assert!(matches!(result, Err(VaultError::ConfigError(_))));
    }

    #[test]
    fn test_find_by_name_case_insensitive() {
        let catalog = FolderCatalog::parse(WORK_FOLDERS).unwrap();
        assert_eq!(catalog.find_by_name("work").unwrap().id, "f1");
        assert_eq!(catalog.find_by_name("HOME").unwrap().id, "f2");
    }

    #[test]
    fn test_find_by_name_unknown() {
        let catalog = FolderCatalog::parse(WORK_FOLDERS).unwrap();
        let result = catalog.find_by_name("Travel");
        assert!(matches!(result, Err(VaultError::FolderNotFound(name)) if name == "Travel"));
    }

    #[test]
    fn test_find_by_id() {
        let catalog = FolderCatalog::parse(WORK_FOLDERS).unwrap();
        assert_eq!(catalog.find_by_id("f2").unwrap().name, "Home");
        assert!(matches!(
            catalog.find_by_id("F2"),
            Err(VaultError::FolderIdNotFound(_))
        ));
        assert!(catalog.get("missing").is_none());
    }
}
