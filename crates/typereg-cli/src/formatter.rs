//! Output formatters for enum definitions.

use clap::ValueEnum;
use comfy_table::{Cell, Table};
use typereg_core::EnumDef;

/// Output format for results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// ASCII table format
    Table,
    /// JSON format
    Json,
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Table => write!(f, "table"),
            OutputFormat::Json => write!(f, "json"),
        }
    }
}

/// Trait for formatting output.
pub trait Formatter: Send + Sync {
    /// Format a single definition with its elements.
    fn format_enum_def(&self, def: &EnumDef) -> String;

    /// Format a list of definitions.
    fn format_enum_defs(&self, defs: &[EnumDef]) -> String;

    /// Format an error message.
    fn format_error(&self, error: &str) -> String;

    /// Format a simple message.
    fn format_message(&self, message: &str) -> String;
}

/// Create a formatter for the given output format.
pub fn create_formatter(format: OutputFormat) -> Box<dyn Formatter> {
    match format {
        OutputFormat::Table => Box::new(TableFormatter),
        OutputFormat::Json => Box::new(JsonFormatter),
    }
}

/// Table formatter using comfy-table.
pub struct TableFormatter;

impl Formatter for TableFormatter {
    fn format_enum_def(&self, def: &EnumDef) -> String {
        let mut table = Table::new();
        table.set_header(vec!["value", "ordinal", "description"]);

        for element in &def.element_defs {
            table.add_row(vec![
                Cell::new(&element.value),
                Cell::new(element.ordinal),
                Cell::new(element.description.as_deref().unwrap_or("")),
            ]);
        }

        format!(
            "{} ({}, version {})\n{}",
            def.header.name, def.header.guid, def.header.version, table
        )
    }

    fn format_enum_defs(&self, defs: &[EnumDef]) -> String {
        if defs.is_empty() {
            return "No results".to_string();
        }

        let mut table = Table::new();
        table.set_header(vec!["name", "guid", "version", "elements"]);

        for def in defs {
            table.add_row(vec![
                Cell::new(&def.header.name),
                Cell::new(&def.header.guid),
                Cell::new(def.header.version),
                Cell::new(def.element_values().join(", ")),
            ]);
        }

        format!("{}\n{} definition(s)", table, defs.len())
    }

    fn format_error(&self, error: &str) -> String {
        format!("Error: {}", error)
    }

    fn format_message(&self, message: &str) -> String {
        message.to_string()
    }
}

/// JSON formatter.
pub struct JsonFormatter;

impl Formatter for JsonFormatter {
    fn format_enum_def(&self, def: &EnumDef) -> String {
        serde_json::to_string_pretty(def).unwrap_or_else(|_| "{}".to_string())
    }

    fn format_enum_defs(&self, defs: &[EnumDef]) -> String {
        serde_json::to_string_pretty(defs).unwrap_or_else(|_| "[]".to_string())
    }

    fn format_error(&self, error: &str) -> String {
        serde_json::json!({
            "error": error
        })
        .to_string()
    }

    fn format_message(&self, message: &str) -> String {
        serde_json::json!({
            "message": message
        })
        .to_string()
    }
}
