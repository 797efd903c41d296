//! Export commands: `export-notes` and `clear-export-dirs`.

use crate::cli::args::ExportNotesArgs;
use crate::cli::output::{Output, TableRow};
use crate::config::Config;
use crate::error::{Result, VaultError};
use crate::export::{clear_export_dirs, ExportOptions, ExportedNote, Exporter};
use crate::filter::filter_by_folder_name;
use crate::folder::FolderCatalog;
use crate::reader::read_notes;
use crate::vault::Vault;
use serde::Serialize;

impl TableRow for ExportedNote {
    fn headers() -> &'static [&'static str] {
        &["id", "path", "attachments", "archived"]
    }

    fn cells(&self) -> Vec<String> {
        vec![
            self.id.clone(),
            self.path.display().to_string(),
            self.attachments.len().to_string(),
            if self.archive.is_some() { "yes" } else { "no" }.to_string(),
        ]
    }
}

pub fn export_notes(
    vault: &Vault,
    config: &Config,
    args: &ExportNotesArgs,
    output: &Output,
) -> Result<()> {
    if args.add_tags.is_some() {
        return Err(VaultError::Unsupported(
            "--add-tags is not supported yet".to_string(),
        ));
    }

    let catalog = FolderCatalog::load(vault)?;
    let mut notes = read_notes(vault)?;

    if let Some(ref folder) = args.folder {
        notes = filter_by_folder_name(notes, &catalog, folder)?;
        output.info(&format!("Export notes for folder: {}", folder));
    } else {
        output.info("Export all notes");
    }

    if args.clear_export_dirs {
        clear_export_dirs(vault)?;
    }

    let options = ExportOptions {
        archive: args.archive,
        folder_metadata: config.export.folder_metadata && !args.no_folder_metadata,
    };

    let summary = Exporter::new(vault, &catalog).export_notes(&notes, options)?;
    output.print_listing(&summary, &summary.notes)
}

#[derive(Debug, Serialize)]
struct ClearResult {
    cleared: bool,
    notes_dir: std::path::PathBuf,
}

pub fn clear(vault: &Vault, output: &Output) -> Result<()> {
    clear_export_dirs(vault)?;

    let result = ClearResult {
        cleared: true,
        notes_dir: vault.export.notes_dir.clone(),
    };
    output.print(&result)
}
