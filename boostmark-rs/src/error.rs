//! Error types and exit codes for Boostmark.

use std::path::PathBuf;
use thiserror::Error;

/// Process exit codes.
pub mod exit_code {
    pub const SUCCESS: i32 = 0;
    pub const GENERAL_ERROR: i32 = 1;
    pub const CONFIG_ERROR: i32 = 2;
    pub const FOLDER_NOT_FOUND: i32 = 3;
    pub const NOTE_NOT_FOUND: i32 = 4;
    pub const ALREADY_ARCHIVED: i32 = 5;
    pub const PARTIAL_ARCHIVE: i32 = 6;
    pub const UNSUPPORTED: i32 = 7;
}

/// Main error type for Boostmark operations.
#[derive(Error, Debug)]
pub enum VaultError {
    #[error("Vault not found at: {0}")]
    VaultNotFound(PathBuf),

    #[error("{what} ({path}) does not exist")]
    MissingPath { what: &'static str, path: PathBuf },

    #[error("Config error: {0}")]
    ConfigError(String),

    #[error("Can't find a folder by name: {0}")]
    FolderNotFound(String),

    #[error("Can't find a folder by ID: {0}")]
    FolderIdNotFound(String),

    #[error("CSON parse error at line {line}: {message}")]
    CsonParse { line: usize, message: String },

    #[error("Invalid note record {path}: {message}")]
    InvalidRecord { path: PathBuf, message: String },

    #[error("Can't archive absent file: {0}")]
    NoteNotFound(PathBuf),

    #[error("Can't archive already archived file: {0}")]
    AlreadyArchived(PathBuf),

    #[error("Attachment is missing from both the vault and the archive: {0}")]
    AttachmentMissing(PathBuf),

    #[error("Attachment already exists in the archive: {0}")]
    AttachmentConflict(PathBuf),

    #[error(
        "Partial archive of note {note_id}: moved [{}], not moved [{}]: {source}",
        display_paths(.moved),
        display_paths(.pending)
    )]
    PartialArchive {
        note_id: String,
        moved: Vec<PathBuf>,
        pending: Vec<PathBuf>,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to {op} {path}: {source}")]
    FileOperation {
        op: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{0}")]
    Unsupported(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML serialize error: {0}")]
    YamlError(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("TOML serialize error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    #[error("Glob pattern error: {0}")]
    GlobPattern(#[from] glob::PatternError),
}

impl VaultError {
    /// Returns the appropriate exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            VaultError::VaultNotFound(_)
            | VaultError::MissingPath { .. }
            | VaultError::ConfigError(_)
            | VaultError::TomlParse(_) => exit_code::CONFIG_ERROR,
            VaultError::FolderNotFound(_) | VaultError::FolderIdNotFound(_) => {
                exit_code::FOLDER_NOT_FOUND
            }
            VaultError::NoteNotFound(_) => exit_code::NOTE_NOT_FOUND,
            VaultError::AlreadyArchived(_) => exit_code::ALREADY_ARCHIVED,
            VaultError::PartialArchive { .. } => exit_code::PARTIAL_ARCHIVE,
            VaultError::Unsupported(_) => exit_code::UNSUPPORTED,
            _ => exit_code::GENERAL_ERROR,
        }
    }

    /// Wrap an I/O error with the operation and path that produced it.
    pub fn file_op(op: &'static str, path: impl Into<PathBuf>) -> impl FnOnce(std::io::Error) -> Self {
        let path = path.into();
        move |source| VaultError::FileOperation { op, path, source }
    }
}

fn display_paths(paths: &[PathBuf]) -> String {
    paths
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Result type alias for Boostmark operations.
pub type Result<T> = std::result::Result<T, VaultError>;
