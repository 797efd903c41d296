//! List commands: `list-folders` and `list-notes`.

use crate::cli::args::ListNotesArgs;
use crate::cli::output::{Output, TableRow};
use crate::error::Result;
use crate::filter::filter_by_folder_name;
use crate::folder::{FolderCatalog, NoteFolder};
use crate::note::Timestamp;
use crate::reader::read_notes;
use crate::vault::Vault;
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct FolderListResponse<'a> {
    pub folders: &'a [NoteFolder],
    pub total: usize,
}

impl TableRow for NoteFolder {
    fn headers() -> &'static [&'static str] {
        &["id", "name", "color"]
    }

    fn cells(&self) -> Vec<String> {
        vec![self.id.clone(), self.name.clone(), self.color.clone()]
    }
}

/// One row of `list-notes`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NoteRow {
    pub id: String,
    pub name: String,
    pub created_at: Timestamp,
    /// Absent when the note has no folder id or it is not in the catalog.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub folder: Option<String>,
}

impl TableRow for NoteRow {
    fn headers() -> &'static [&'static str] {
        &["id", "name", "createdAt", "folder"]
    }

    fn cells(&self) -> Vec<String> {
        vec![
            self.id.clone(),
            self.name.clone(),
            self.created_at.to_string(),
            self.folder.clone().unwrap_or_default(),
        ]
    }
}

#[derive(Debug, Serialize)]
pub struct NoteListResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub folder: Option<String>,
    pub notes: Vec<NoteRow>,
    pub total: usize,
}

pub fn list_folders(vault: &Vault, output: &Output) -> Result<()> {
    let catalog = FolderCatalog::load(vault)?;
    output.info("List of available folders:");

    let response = FolderListResponse {
        folders: catalog.folders(),
        total: catalog.folders().len(),
    };
    output.print_listing(&response, catalog.folders())
}

pub fn list_notes(vault: &Vault, args: &ListNotesArgs, output: &Output) -> Result<()> {
    let catalog = FolderCatalog::load(vault)?;
    let mut notes = read_notes(vault)?;

    if let Some(ref folder) = args.folder {
        notes = filter_by_folder_name(notes, &catalog, folder)?;
        output.info(&format!("Notes for folder: {}", folder));
    } else {
        output.info("List of all notes:");
    }

    let rows: Vec<NoteRow> = notes
        .into_iter()
        .map(|note| NoteRow {
            folder: catalog.get(&note.folder_id).map(|f| f.name.clone()),
            id: note.id,
            name: note.name,
            created_at: note.created_at,
        })
        .collect();

    let response = NoteListResponse {
        folder: args.folder.clone(),
        total: rows.len(),
        notes: rows,
    };
    output.print_listing(&response, &response.notes)
}
