//! Output formatting for CLI commands

use auditchain::ChainStatus;
use colored::Colorize;
use serde::Serialize;
use std::fmt::Display;

/// Supported output formats
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable table format (default)
    #[default]
    Table,
    /// JSON format
    Json,
    /// Plain text (minimal formatting)
    Plain,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "table" => Ok(OutputFormat::Table),
            "json" => Ok(OutputFormat::Json),
            "plain" => Ok(OutputFormat::Plain),
            _ => Err(format!(
                "Unknown output format '{}'. Valid options: table, json, plain",
                s
            )),
        }
    }
}

impl Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Table => write!(f, "table"),
            OutputFormat::Json => write!(f, "json"),
            OutputFormat::Plain => write!(f, "plain"),
        }
    }
}

/// Output formatter for consistent CLI output
pub struct OutputFormatter {
    format: OutputFormat,
}

impl OutputFormatter {
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    /// Print a success message
    pub fn success(&self, message: &str) {
        match self.format {
            OutputFormat::Json => {
                println!(
                    "{}",
                    serde_json::json!({"status": "success", "message": message})
                );
            }
            OutputFormat::Plain => println!("ok: {}", message),
            OutputFormat::Table => println!("{} {}", "✓".green(), message),
        }
    }

    /// Print an error message
    pub fn error(&self, message: &str) {
        match self.format {
            OutputFormat::Json => {
                eprintln!(
                    "{}",
                    serde_json::json!({"status": "error", "message": message})
                );
            }
            OutputFormat::Plain => eprintln!("error: {}", message),
            OutputFormat::Table => eprintln!("{} {}", "✗".red(), message),
        }
    }

    /// Print a warning message
    pub fn warning(&self, message: &str) {
        match self.format {
            OutputFormat::Json => {
                eprintln!(
                    "{}",
                    serde_json::json!({"status": "warning", "message": message})
                );
            }
            OutputFormat::Plain => eprintln!("warning: {}", message),
            OutputFormat::Table => eprintln!("{} {}", "⚠".yellow(), message),
        }
    }

    /// Print data as JSON
    pub fn json<T: Serialize>(&self, data: &T) {
        match serde_json::to_string_pretty(data) {
            Ok(json) => println!("{}", json),
            Err(e) => self.error(&format!("Failed to serialize to JSON: {}", e)),
        }
    }

    /// Print a simple key-value pair
    pub fn kv(&self, key: &str, value: &str) {
        match self.format {
            OutputFormat::Json => {
                println!("{}", serde_json::json!({key: value}));
            }
            OutputFormat::Table => {
                println!("{}: {}", key.cyan(), value);
            }
            OutputFormat::Plain => {
                println!("{}: {}", key, value);
            }
        }
    }

    /// Print a table header
    pub fn table_header(&self, columns: &[&str]) {
        if self.format == OutputFormat::Table {
            let header: Vec<_> = columns.iter().map(|c| c.bold().to_string()).collect();
            println!("{}", header.join("  "));
            println!("{}", "-".repeat(columns.iter().map(|c| c.len() + 2).sum()));
        }
    }

    /// Print a table row. Plain output gets tab-separated rows.
    pub fn table_row(&self, values: &[&str]) {
        match self.format {
            OutputFormat::Table => println!("{}", values.join("  ")),
            OutputFormat::Plain => println!("{}", values.join("\t")),
            OutputFormat::Json => {}
        }
    }

    /// Print a section title
    pub fn section(&self, title: &str) {
        match self.format {
            OutputFormat::Table => {
                println!();
                println!("{}", title.bold().underline());
                println!();
            }
            OutputFormat::Plain => {
                println!();
                println!("{}", title);
                println!();
            }
            OutputFormat::Json => {}
        }
    }

    /// Print the one-line verdict for a chain check.
    pub fn chain_status(&self, status: &ChainStatus) {
        let text = status_line(status);
        match status {
            ChainStatus::Verified => self.success(&text),
            ChainStatus::Broken { .. } => self.error(&text),
            ChainStatus::Unavailable => self.warning(&text),
        }
    }
}

pub fn status_line(status: &ChainStatus) -> String {
    match status {
        ChainStatus::Broken { index } => format!("{} (first break at entry {})", status.label(), index),
        _ => status.label().to_string(),
    }
}
