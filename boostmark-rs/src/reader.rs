//! Reading every note record of a vault.

use crate::error::{Result, VaultError};
use crate::note::{Note, NoteRecord, Rejection};
use crate::vault::Vault;
use std::path::{Component, Path, PathBuf};

/// Read, validate and transform every note record in the vault.
///
/// Malformed records (undecodable, missing text, empty name) and
/// attachment references that do not resolve to a file are dropped with a
/// warning. Only I/O failures while reading a record abort the read.
pub fn read_notes(vault: &Vault) -> Result<Vec<Note>> {
    let mut notes = Vec::new();

    for path in vault.list_note_records()? {
        if let Some(note) = read_note_file(vault, &path)? {
            notes.push(note);
        }
    }

    tracing::debug!(count = notes.len(), "read notes");
    Ok(notes)
}

/// Read a single record file. `Ok(None)` means the record was discarded.
pub fn read_note_file(vault: &Vault, path: &Path) -> Result<Option<Note>> {
    let id = path
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_default();

    let bytes = std::fs::read(path).map_err(VaultError::file_op("read", path))?;
    let text = match String::from_utf8(bytes) {
        Ok(text) => text,
        Err(e) => {
            tracing::warn!(id = %id, path = %path.display(), error = %e, "skipping note: record is not UTF-8");
            return Ok(None);
        }
    };

    let record = match NoteRecord::decode(&text) {
        Ok(record) => record,
        Err(rejection) => {
            warn_rejected(&id, path, None, &rejection);
            return Ok(None);
        }
    };

    let title = record.title.clone();
    let folder = record.folder.clone();
    let attachments_dir = &vault.source.attachments_dir;
    let keep = |relative: &str| attachment_exists(attachments_dir, relative, &title);

    match Note::from_record(id.clone(), record, keep) {
        Ok(note) => Ok(Some(note)),
        Err(rejection) => {
            warn_rejected(&id, path, Some((&title, &folder)), &rejection);
            Ok(None)
        }
    }
}

fn warn_rejected(id: &str, path: &Path, fields: Option<(&str, &str)>, rejection: &Rejection) {
    let (title, folder) = fields.unwrap_or_default();
    tracing::warn!(
        id = %id,
        path = %path.display(),
        title = %title,
        note_folder_id = %folder,
        "skipping note: {}",
        rejection
    );
}

/// Resolve a marker path under the attachments directory.
///
/// Returns `None` for empty, absolute or `..`-climbing paths, which would
/// point outside the attachments tree.
pub fn resolve_attachment(attachments_dir: &Path, relative: &str) -> Option<PathBuf> {
    let rel = Path::new(relative);
    if relative.is_empty()
        || !rel
            .components()
            .all(|c| matches!(c, Component::Normal(_) | Component::CurDir))
    {
        return None;
    }
    Some(attachments_dir.join(rel))
}

fn attachment_exists(attachments_dir: &Path, relative: &str, title: &str) -> bool {
    match resolve_attachment(attachments_dir, relative) {
        Some(full) if full.is_file() => true,
        Some(full) => {
            tracing::warn!(note = %title, path = %full.display(), "attachment not found");
            false
        }
        None => {
            tracing::warn!(note = %title, reference = %relative, "attachment reference escapes the attachments directory");
            false
        }
    }
}
