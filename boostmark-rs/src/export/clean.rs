//! Removal of previously generated export directories.

use crate::error::{Result, VaultError};
use crate::vault::Vault;

/// Delete the export notes and attachments trees. Absent trees are not an error.
pub fn clear_export_dirs(vault: &Vault) -> Result<()> {
    for dir in [&vault.export.notes_dir, &vault.export.attachments_dir] {
        if dir.exists() {
            std::fs::remove_dir_all(dir).map_err(VaultError::file_op("remove", dir))?;
            tracing::debug!(path = %dir.display(), "removed export directory");
        }
    }
    Ok(())
}
