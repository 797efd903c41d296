//! CLI argument definitions using clap.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "boostmark")]
#[command(author, version, about = "Export and archive Boostnote vaults as Markdown", long_about = None)]
pub struct Cli {
    /// Path to the vault (overrides config default, defaults to the current directory)
    #[arg(long, global = true)]
    pub vault: Option<PathBuf>,

    /// Directory receiving `exported-notes/` (defaults to the vault root)
    #[arg(long, global = true)]
    pub export_dir: Option<PathBuf>,

    /// Output as JSON (default)
    #[arg(long, global = true, conflicts_with_all = ["yaml", "toml", "table"])]
    pub json: bool,

    /// Output as YAML
    #[arg(long, global = true, conflicts_with_all = ["json", "toml", "table"])]
    pub yaml: bool,

    /// Output as TOML
    #[arg(long, global = true, conflicts_with_all = ["json", "yaml", "table"])]
    pub toml: bool,

    /// Output as an aligned text table
    #[arg(long, global = true, conflicts_with_all = ["json", "yaml", "toml"])]
    pub table: bool,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Increase log verbosity (can be repeated)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    pub fn output_format(&self) -> OutputFormat {
        if self.yaml {
            OutputFormat::Yaml
        } else if self.toml {
            OutputFormat::Toml
        } else if self.table {
            OutputFormat::Table
        } else {
            OutputFormat::Json
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Json,
    Yaml,
    Toml,
    Table,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List available folders
    #[command(name = "list-folders")]
    ListFolders,

    /// List all notes
    #[command(name = "list-notes")]
    ListNotes(ListNotesArgs),

    /// Export notes
    #[command(name = "export-notes")]
    ExportNotes(ExportNotesArgs),

    /// Delete previously exported notes and attachments
    #[command(name = "clear-export-dirs")]
    ClearExportDirs,
}

#[derive(Parser, Debug)]
pub struct ListNotesArgs {
    /// Filter notes by folder name
    #[arg(short, long)]
    pub folder: Option<String>,
}

#[derive(Parser, Debug)]
pub struct ExportNotesArgs {
    /// Export notes for the specified folder
    #[arg(short, long)]
    pub folder: Option<String>,

    /// Add YAML tags to the exported note (not supported yet)
    #[arg(short = 't', long)]
    pub add_tags: Option<String>,

    /// Delete previous exports before writing
    #[arg(long)]
    pub clear_export_dirs: bool,

    /// Move each exported note and its attachments into the archive
    #[arg(long)]
    pub archive: bool,

    /// Leave the `folder:` key out of the metadata header
    #[arg(long)]
    pub no_folder_metadata: bool,
}
