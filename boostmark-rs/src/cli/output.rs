//! Output formatting for CLI commands.

use crate::cli::args::OutputFormat;
use crate::error::Result;
use serde::Serialize;

/// A record that can be shown as one line of a text table.
pub trait TableRow {
    fn headers() -> &'static [&'static str];
    fn cells(&self) -> Vec<String>;
}

/// Helper for formatting and printing output.
pub struct Output {
    format: OutputFormat,
    quiet: bool,
}

impl Output {
    pub fn new(format: OutputFormat, quiet: bool) -> Self {
        Self { format, quiet }
    }

    /// Print a serializable value in the configured format.
    ///
    /// Table output has no generic shape, so plain values fall back to YAML.
    pub fn print<T: Serialize>(&self, value: &T) -> Result<()> {
        let output = match self.format {
            OutputFormat::Json => serde_json::to_string_pretty(value)?,
            OutputFormat::Yaml | OutputFormat::Table => serde_yaml::to_string(value)?,
            OutputFormat::Toml => toml::to_string_pretty(value)?,
        };
        println!("{}", output);
        Ok(())
    }

    /// Print a response holding a list; table output shows just the rows.
    pub fn print_listing<T: Serialize, R: TableRow>(&self, value: &T, rows: &[R]) -> Result<()> {
        if self.format == OutputFormat::Table {
            print!("{}", render_table(rows));
            Ok(())
        } else {
            self.print(value)
        }
    }

    /// Print a message if not in quiet mode.
    pub fn info(&self, message: &str) {
        if !self.quiet {
            eprintln!("{}", message);
        }
    }
}

/// Render rows under their headers, columns padded to the widest cell.
pub fn render_table<R: TableRow>(rows: &[R]) -> String {
    let headers = R::headers();
    let cells: Vec<Vec<String>> = rows.iter().map(|r| r.cells()).collect();

    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in &cells {
        for (i, cell) in row.iter().enumerate() {
            if let Some(w) = widths.get_mut(i) {
                *w = (*w).max(cell.chars().count());
            }
        }
    }

    let format_line = |values: Vec<&str>| -> String {
        let padded: Vec<String> = values
            .iter()
            .zip(&widths)
            .map(|(v, w)| format!("{:<width$}", v, width = *w))
            .collect();
        format!("{}\n", padded.join("  ").trim_end())
    };

    let mut out = format_line(headers.to_vec());
    let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    out.push_str(&format_line(rule.iter().map(String::as_str).collect()));
    for row in &cells {
        out.push_str(&format_line(row.iter().map(String::as_str).collect()));
    }
    out
}
