//! Boostmark CLI entry point.

use boostmark::cli::args::{Cli, Commands};
use boostmark::cli::output::Output;
use boostmark::cli::{export, list};
use boostmark::config::Config;
use boostmark::error::{exit_code, VaultError};
use boostmark::logging;
use boostmark::vault::Vault;
use clap::Parser;
use std::process::ExitCode;

fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(&cli) {
        Ok(()) => ExitCode::from(exit_code::SUCCESS as u8),
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::from(e.exit_code() as u8)
        }
    }
}

fn run(cli: &Cli) -> Result<(), VaultError> {
    // Load config
    let config = Config::load()?;
    logging::init(cli.verbose, cli.quiet, config.log_level.as_deref());

    // Resolve vault and export paths
    let vault_path = config.resolve_vault_path(cli.vault.as_deref())?;
    let export_path = config.resolve_export_path(cli.export_dir.as_deref(), &vault_path);
    let vault = Vault::open(vault_path, export_path)?;

    let output = Output::new(cli.output_format(), cli.quiet);

    match &cli.command {
        Commands::ListFolders => list::list_folders(&vault, &output),
        Commands::ListNotes(args) => list::list_notes(&vault, args, &output),
        Commands::ExportNotes(args) => export::export_notes(&vault, &config, args, &output),
        Commands::ClearExportDirs => export::clear(&vault, &output),
    }
}
