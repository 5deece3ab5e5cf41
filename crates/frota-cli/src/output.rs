//! Output formatting for frota-cli (table, json, csv)

use clap::ValueEnum;
use colored::Colorize;
use serde::Serialize;
use tabled::{Table, Tabled};

/// Output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// ASCII table format (default)
    Table,
    /// JSON format
    Json,
    /// CSV format
    Csv,
}

impl Default for OutputFormat {
    fn default() -> Self {
        Self::Table
    }
}

/// Context for output rendering
#[allow(dead_code)]
pub struct OutputContext {
    pub format: OutputFormat,
    pub no_color: bool,
    pub quiet: bool,
}

impl OutputContext {
    pub fn new(format: OutputFormat, no_color: bool, quiet: bool) -> Self {
        if no_color {
            colored::control::set_override(false);
        }
        Self {
            format,
            no_color,
            quiet,
        }
    }

    /// Print a success message (unless in quiet mode)
    pub fn success(&self, msg: &str) {
        if !self.quiet {
            println!("{}", msg.green());
        }
    }

    /// Print an info message (unless in quiet mode)
    pub fn info(&self, msg: &str) {
        if !self.quiet {
            println!("{}", msg);
        }
    }

    /// Print a warning message
    pub fn warn(&self, msg: &str) {
        eprintln!("{}", msg.yellow());
    }

    /// Print an error message
    pub fn error(&self, msg: &str) {
        eprintln!("{}", msg.red());
    }

    /// Print data in the configured format
    pub fn print<T: Tabled + Serialize>(&self, data: &[T]) {
        match self.format {
            OutputFormat::Table => {
                if data.is_empty() {
                    if !self.quiet {
                        println!("No data");
                    }
                } else {
                    let table = Table::new(data).to_string();
                    println!("{}", table);
                }
            }
            OutputFormat::Json => {
                println!(
                    "{}",
                    serde_json::to_string_pretty(data).unwrap_or_else(|_| "[]".to_string())
                );
            }
            OutputFormat::Csv => {
                print_csv(data);
            }
        }
    }

    /// Print key-value pairs (for info-style commands)
    pub fn print_kv(&self, pairs: &[(&str, String)]) {
        match self.format {
            OutputFormat::Table => {
                for (key, value) in pairs {
                    println!("{}: {}", key.bold(), value);
                }
            }
            OutputFormat::Json => {
                let map: std::collections::HashMap<&str, &str> =
                    pairs.iter().map(|(k, v)| (*k, v.as_str())).collect();
                println!(
                    "{}",
                    serde_json::to_string_pretty(&map).unwrap_or_else(|_| "{}".to_string())
                );
            }
            OutputFormat::Csv => {
                let keys: Vec<&str> = pairs.iter().map(|(k, _)| *k).collect();
                println!("{}", keys.join(","));
                let values: Vec<String> = pairs.iter().map(|(_, v)| escape_csv(v)).collect();
                println!("{}", values.join(","));
            }
        }
    }
}

/// Print data as CSV
fn print_csv<T: Serialize>(data: &[T]) {
    if data.is_empty() {
        return;
    }

    let first = serde_json::to_value(&data[0]).unwrap_or_default();
    if let serde_json::Value::Object(map) = &first {
        let headers: Vec<&str> = map.keys().map(|s| s.as_str()).collect();
        println!("{}", headers.join(","));

        for item in data {
            if let Ok(serde_json::Value::Object(row)) = serde_json::to_value(item) {
                let values: Vec<String> = headers
                    .iter()
                    .map(|h| {
                        row.get(*h)
                            .map(|v| match v {
                                serde_json::Value::String(s) => escape_csv(s),
                                other => escape_csv(&other.to_string()),
                            })
                            .unwrap_or_default()
                    })
                    .collect();
                println!("{}", values.join(","));
            }
        }
    }
}

/// Escape a value for CSV output
fn escape_csv(value: &str) -> String {
    if value.contains(',') || value.contains('"') || value.contains('\n') {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

// =============================================================================
// Display types for various commands
// =============================================================================

/// Truck display for the trucks command
#[derive(Debug, Tabled, Serialize)]
pub struct TruckRow {
    pub id: i64,
    pub plate: String,
    pub model: String,
    pub year: String,
    pub status: String,
    pub driver: String,
}

/// Maintenance record display
#[derive(Debug, Tabled, Serialize)]
pub struct MaintenanceRow {
    pub id: i64,
    pub service: String,
    pub cost: String,
    pub started: String,
    pub completed: String,
    pub truck: String,
}

/// Alert display
#[derive(Debug, Tabled, Serialize)]
pub struct AlertRow {
    pub id: String,
    pub title: String,
    pub category: String,
    pub description: String,
    pub truck: String,
}

/// Route waypoint display
#[derive(Debug, Tabled, Serialize)]
pub struct WaypointRow {
    pub origin: String,
    pub destination: String,
    pub latitude: f64,
    pub longitude: f64,
    pub status: String,
    pub eta: String,
}

/// Per-service cost display for the summary command
#[derive(Debug, Tabled, Serialize)]
pub struct ServiceCostRow {
    pub service: String,
    pub total: String,
    pub count: usize,
}
