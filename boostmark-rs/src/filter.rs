//! Selecting notes by folder.

use crate::error::Result;
use crate::folder::FolderCatalog;
use crate::note::Note;

/// Keep the notes that belong to the folder named `folder_name`.
///
/// The name is matched case-insensitively. An unknown folder name is an
/// error; a known folder without notes yields an empty list. Order is kept.
pub fn filter_by_folder_name(
    notes: Vec<Note>,
    catalog: &FolderCatalog,
    folder_name: &str,
) -> Result<Vec<Note>> {
    let folder_id = &catalog.find_by_name(folder_name)?.id;

    Ok(notes
        .into_iter()
        .filter(|note| &note.folder_id == folder_id)
        .collect())
}
