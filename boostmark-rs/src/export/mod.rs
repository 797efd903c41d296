//! Markdown export of notes and their attachments.
//!
//! Each note becomes `{name}.md` in the export notes directory, with a
//! metadata header followed by the adjusted body. Referenced attachments are
//! copied into the export attachments directory under their vault-relative
//! paths. Written files get the note's original timestamps.

mod clean;
mod metadata;

pub use clean::clear_export_dirs;
pub use metadata::{render_document, render_header};

use crate::archive::{archive_note, ArchiveReport};
use crate::error::{Result, VaultError};
use crate::folder::FolderCatalog;
use crate::note::Note;
use crate::vault::{ensure_dirs, Vault};
use serde::Serialize;
use std::collections::HashSet;
use std::fs::{File, FileTimes};
use std::path::{Path, PathBuf};

/// Options for export.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExportOptions {
    /// Archive each note right after it is exported.
    pub archive: bool,
    /// Write the `folder:` key; requires every note's folder to be in the catalog.
    pub folder_metadata: bool,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            archive: false,
            folder_metadata: true,
        }
    }
}

/// Result of exporting one note.
#[derive(Debug, Clone, Serialize)]
pub struct ExportedNote {
    pub id: String,
    pub path: PathBuf,
    pub attachments: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub archive: Option<ArchiveReport>,
}

/// Result of an export run.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ExportSummary {
    pub notes: Vec<ExportedNote>,
    pub attachments_copied: usize,
    pub archived: usize,
}

/// Writes notes of one vault into its export tree.
pub struct Exporter<'a> {
    vault: &'a Vault,
    catalog: &'a FolderCatalog,
}

impl<'a> Exporter<'a> {
    pub fn new(vault: &'a Vault, catalog: &'a FolderCatalog) -> Self {
        Self { vault, catalog }
    }

    /// Export notes in order, archiving each one after it is written when requested.
    ///
    /// Destination directories are prepared before the first note is written,
    /// so an unwritable archive location fails the run up front. Any error
    /// aborts the run; notes already written stay written.
    pub fn export_notes(&self, notes: &[Note], options: ExportOptions) -> Result<ExportSummary> {
        ensure_dirs(&self.vault.export)?;
        if options.archive {
            ensure_dirs(&self.vault.archive)?;
        }

        let mut summary = ExportSummary::default();
        let mut file_names: HashSet<String> = HashSet::new();

        for note in notes {
            if !file_names.insert(note.file_name()) {
                tracing::warn!(note = %note.id, file = %note.file_name(), "another note already exported to this file, overwriting");
            }

            let exported = self.export_note(note, options)?;
            summary.attachments_copied += exported.attachments.len();
            if exported.archive.is_some() {
                summary.archived += 1;
            }
            summary.notes.push(exported);
        }

        tracing::info!(
            notes = summary.notes.len(),
            attachments = summary.attachments_copied,
            archived = summary.archived,
            "export finished"
        );
        Ok(summary)
    }

    /// Export a single note. Destination directories must already exist.
    pub fn export_note(&self, note: &Note, options: ExportOptions) -> Result<ExportedNote> {
        let folder = if options.folder_metadata {
            Some(self.catalog.find_by_id(&note.folder_id)?.name.as_str())
        } else {
            None
        };

        let path = self.vault.export.notes_dir.join(note.file_name());
        std::fs::write(&path, render_document(note, folder))
            .map_err(VaultError::file_op("write", &path))?;

        for attachment in &note.attachments {
            self.copy_attachment(attachment)?;
        }

        set_note_times(&path, note)?;
        tracing::debug!(note = %note.id, path = %path.display(), "exported note");

        let archive = if options.archive {
            Some(archive_note(self.vault, note)?)
        } else {
            None
        };

        Ok(ExportedNote {
            id: note.id.clone(),
            path,
            attachments: note.attachments.clone(),
            archive,
        })
    }

    fn copy_attachment(&self, relative: &str) -> Result<()> {
        let from = self.vault.source.attachments_dir.join(relative);
        let to = self.vault.export.attachments_dir.join(relative);

        if let Some(parent) = to.parent() {
            if !parent.is_dir() {
                std::fs::create_dir_all(parent)
                    .map_err(VaultError::file_op("create directory", parent))?;
            }
        }

        std::fs::copy(&from, &to).map_err(VaultError::file_op("copy", &from))?;
        Ok(())
    }
}

/// Set modification time to `updatedAt` and access time to `createdAt`.
fn set_note_times(path: &Path, note: &Note) -> Result<()> {
    let times = FileTimes::new()
        .set_accessed(note.created_at.system_time())
        .set_modified(note.updated_at.system_time());

    File::options()
        .write(true)
        .open(path)
        .and_then(|file| file.set_times(times))
        .map_err(VaultError::file_op("set timestamps on", path))
}
