//! Moving notes and their attachments out of the live vault.
//!
//! Archiving runs in two phases. Staging checks every source and
//! destination and creates the destination directories without touching
//! live files. Moving then renames the record followed by each attachment.
//! A failure after the first rename leaves the note partly archived and is
//! reported as [`VaultError::PartialArchive`] with the files on each side.
//!
// TODO: journal staged moves so a partial archive can be resumed or rolled back automatically.

use crate::error::{Result, VaultError};
use crate::note::Note;
use crate::reader::resolve_attachment;
use crate::vault::Vault;
use serde::Serialize;
use std::path::PathBuf;

/// Outcome of archiving one note.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArchiveReport {
    pub note_id: String,
    /// Where the record now lives.
    pub record: PathBuf,
    /// Attachments moved by this run.
    pub moved: Vec<String>,
    /// Attachments found already migrated by an earlier run.
    pub already_archived: Vec<String>,
}

#[derive(Debug)]
struct Move {
    relative: String,
    from: PathBuf,
    to: PathBuf,
}

#[derive(Debug)]
struct ArchivePlan {
    record_from: PathBuf,
    record_to: PathBuf,
    moves: Vec<Move>,
    already_archived: Vec<String>,
}

/// Archive a note: move its record and attachments into the archive tree.
///
/// Fails without changing anything when the note is already archived, its
/// record is absent, or an attachment is missing on both sides or present
/// on both sides.
pub fn archive_note(vault: &Vault, note: &Note) -> Result<ArchiveReport> {
    let plan = stage(vault, note)?;
    execute(note, plan)
}

fn stage(vault: &Vault, note: &Note) -> Result<ArchivePlan> {
    let record_to = vault.archived_record_path(&note.id);
    if record_to.exists() {
        return Err(VaultError::AlreadyArchived(record_to));
    }

    let record_from = vault.note_record_path(&note.id);
    if !record_from.is_file() {
        return Err(VaultError::NoteNotFound(record_from));
    }

    let mut moves = Vec::new();
    let mut already_archived = Vec::new();

    for relative in &note.attachments {
        let from = resolve_attachment(&vault.source.attachments_dir, relative)
            .ok_or_else(|| VaultError::AttachmentMissing(PathBuf::from(relative)))?;
        let to = vault.archive.attachments_dir.join(relative);

        match (from.exists(), to.exists()) {
            (true, false) => moves.push(Move {
                relative: relative.clone(),
                from,
                to,
            }),
            (false, true) => {
                tracing::warn!(note = %note.id, path = %from.display(), "attachment is already archived");
                already_archived.push(relative.clone());
            }
            (false, false) => return Err(VaultError::AttachmentMissing(from)),
            (true, true) => return Err(VaultError::AttachmentConflict(to)),
        }
    }

    create_parent(&record_to)?;
    for m in &moves {
        create_parent(&m.to)?;
    }

    Ok(ArchivePlan {
        record_from,
        record_to,
        moves,
        already_archived,
    })
}

fn execute(note: &Note, plan: ArchivePlan) -> Result<ArchiveReport> {
    std::fs::rename(&plan.record_from, &plan.record_to)
        .map_err(VaultError::file_op("move", &plan.record_from))?;

    let mut moved_paths = vec![plan.record_from.clone()];
    let mut moved = Vec::with_capacity(plan.moves.len());

    for (i, m) in plan.moves.iter().enumerate() {
        if let Err(source) = std::fs::rename(&m.from, &m.to) {
            return Err(VaultError::PartialArchive {
                note_id: note.id.clone(),
                moved: moved_paths,
                pending: plan.moves[i..].iter().map(|p| p.from.clone()).collect(),
                source,
            });
        }
        moved_paths.push(m.from.clone());
        moved.push(m.relative.clone());
    }

    tracing::info!(note = %note.id, attachments = moved.len(), "archived note");

    Ok(ArchiveReport {
        note_id: note.id.clone(),
        record: plan.record_to,
        moved,
        already_archived: plan.already_archived,
    })
}

fn create_parent(path: &std::path::Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.is_dir() {
            std::fs::create_dir_all(parent).map_err(VaultError::file_op("create directory", parent))?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::note::test_support::record_cson;
    use crate::reader::read_notes;
    use crate::vault::test_support::*;

    fn vault_with_note() -> (tempfile::TempDir, Vault, Note) {
        let (dir, vault) = setup_vault(WORK_FOLDERS);
        write_record(
            &vault,
            "n1",
            &record_cson("Note", "f1", "![a](:storage/n1/a.png) ![b](:storage/n1/b.png)"),
        );
        write_attachment(&vault, "n1/a.png", b"a");
        write_attachment(&vault, "n1/b.png", b"b");
        let note = read_notes(&vault).unwrap().remove(0);
        (dir, vault, note)
    }

    #[test]
    fn test_archive_moves_record_and_attachments() {
        let (_dir, vault, note) = vault_with_note();

        let report = archive_note(&vault, &note).unwrap();

        assert_eq!(report.record, vault.archived_record_path("n1"));
        assert_eq!(report.moved, vec!["n1/a.png", "n1/b.png"]);
        assert!(report.already_archived.is_empty());

        assert!(!vault.note_record_path("n1").exists());
        assert!(vault.archived_record_path("n1").is_file());
        assert!(!vault.source.attachments_dir.join("n1/a.png").exists());
        assert_eq!(
            std::fs::read(vault.archive.attachments_dir.join("n1/b.png")).unwrap(),
            b"b"
        );
    }

    #[test]
    fn test_archive_twice_fails_without_changes() {
        let (_dir, vault, note) = vault_with_note();
        archive_note(&vault, &note).unwrap();

        let result = archive_note(&vault, &note);
        assert!(matches!(result, Err(VaultError::AlreadyArchived(_))));
        assert!(vault.archived_record_path("n1").is_file());
        assert!(vault.archive.attachments_dir.join("n1/a.png").is_file());
    }

    #[test]
    fn test_archive_absent_record() {
        let (_dir, vault, note) = vault_with_note();
        std::fs::remove_file(vault.note_record_path("n1")).unwrap();

        let result = archive_note(&vault, &note);
        assert!(matches!(result, Err(VaultError::NoteNotFound(_))));
        assert!(vault.source.attachments_dir.join("n1/a.png").exists());
    }

    #[test]
    fn test_archive_tolerates_already_migrated_attachment() {
        let (_dir, vault, note) = vault_with_note();
        let target = vault.archive.attachments_dir.join("n1/a.png");
        std::fs::create_dir_all(target.parent().unwrap()).unwrap();
        std::fs::rename(vault.source.attachments_dir.join("n1/a.png"), &target).unwrap();

        let report = archive_note(&vault, &note).unwrap();
        assert_eq!(report.moved, vec!["n1/b.png"]);
        assert_eq!(report.already_archived, vec!["n1/a.png"]);
    }

    #[test]
    fn test_archive_missing_attachment_aborts_before_moving() {
        let (_dir, vault, note) = vault_with_note();
        std::fs::remove_file(vault.source.attachments_dir.join("n1/b.png")).unwrap();

        let result = archive_note(&vault, &note);
        assert!(matches!(result, Err(VaultError::AttachmentMissing(_))));
        assert!(vault.note_record_path("n1").is_file());
        assert!(vault.source.attachments_dir.join("n1/a.png").is_file());
    }

    #[test]
    fn test_archive_conflicting_attachment_aborts_before_moving() {
        let (_dir, vault, note) = vault_with_note();
        let target = vault.archive.attachments_dir.join("n1/b.png");
        std::fs::create_dir_all(target.parent().unwrap()).unwrap();
        std::fs::write(&target, b"other").unwrap();

        let result = archive_note(&vault, &note);
        assert!(matches!(result, Err(VaultError::AttachmentConflict(_))));
        assert!(vault.note_record_path("n1").is_file());
    }

    #[test]
    fn test_archive_reports_partial_failure() {
        let (_dir, vault, note) = vault_with_note();
        let mut plan = stage(&vault, &note).unwrap();
        // make the second move fail after staging succeeded
        plan.moves[1].to = vault.root.join("no-such-dir").join("b.png");

        match execute(&note, plan) {
            Err(VaultError::PartialArchive {
                note_id,
                moved,
                pending,
                ..
            }) => {
                assert_eq!(note_id, "n1");
                assert_eq!(moved.len(), 2);
                assert_eq!(moved[0], vault.note_record_path("n1"));
                assert_eq!(pending, vec![vault.source.attachments_dir.join("n1/b.png")]);
            }
            other => panic!("expected PartialArchive, got {:?}", other),
        }
    }
}
