//! Boostmark - export and archive Boostnote vaults as portable Markdown.
//!
//! # Overview
//!
//! A vault is a directory holding `boostnote.json` (folders), `notes/`
//! (one CSON record per note) and `attachments/`. Boostmark:
//! - Loads the folder catalog and every note record
//! - Drops malformed notes and missing attachments with a warning
//! - Rewrites `:storage/` attachment markers into relative paths
//! - Writes Markdown files with a metadata header, copying attachments
//! - Optionally archives exported notes out of the live vault
//!
//! # Example
//!
//! ```no_run
//! use boostmark::{ExportOptions, Exporter, FolderCatalog, Vault};
//!
//! let vault = Vault::open("/path/to/vault", "/path/to/export").unwrap();
//! let catalog = FolderCatalog::load(&vault).unwrap();
//!
//! let notes = boostmark::read_notes(&vault).unwrap();
//! let notes = boostmark::filter_by_folder_name(notes, &catalog, "Work").unwrap();
//!
//! let summary = Exporter::new(&vault, &catalog)
//!     .export_notes(&notes, ExportOptions::default())
//!     .unwrap();
//! println!("Exported {} notes", summary.notes.len());
//! ```

pub mod archive;
pub mod cli;
pub mod config;
pub mod error;
pub mod export;
pub mod filter;
pub mod folder;
pub mod logging;
pub mod note;
pub mod parser;
pub mod reader;
pub mod vault;

// Re-export main types at crate root
pub use archive::{archive_note, ArchiveReport};
pub use config::Config;
pub use error::{Result, VaultError};
pub use export::{clear_export_dirs, ExportOptions, ExportSummary, Exporter};
pub use filter::filter_by_folder_name;
pub use folder::{FolderCatalog, NoteFolder};
pub use note::{Note, NoteRecord, Timestamp};
pub use reader::read_notes;
pub use vault::Vault;
