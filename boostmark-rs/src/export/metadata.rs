//! Metadata header for exported Markdown files.

use crate::note::Note;

/// Render the `---` delimited header for a note.
///
/// Keys, in order: `createdAt`, `updatedAt`, `tags` (only when the note has
/// tags, each prefixed with `#`), `folder` (only when a name is given).
/// Timestamps are written exactly as the record stores them.
pub fn render_header(note: &Note, folder: Option<&str>) -> String {
    let mut lines = vec![
        format!("createdAt: {}", note.created_at),
        format!("updatedAt: {}", note.updated_at),
    ];

    if !note.tags.is_empty() {
        let tags: Vec<String> = note
            .tags
            .iter()
            .map(|tag| format!("#{}", tag.replace('"', "\\\"")))
            .collect();
        lines.push(format!("tags: {}", tags.join(", ")));
    }

    if let Some(folder) = folder {
        lines.push(format!("folder: {}", folder));
    }

    format!("---\n{}\n---", lines.join("\n"))
}

/// Render header, blank line and body as one document.
pub fn render_document(note: &Note, folder: Option<&str>) -> String {
    format!("{}\n\n{}", render_header(note, folder), note.content)
}
