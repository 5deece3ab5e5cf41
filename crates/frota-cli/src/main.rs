//! frota - Command-line tool for the fleet-management backend
//!
//! Exercises the full client surface: trucks, maintenance records, alerts,
//! routes, live positions, vehicle history, and AI-authored reports.

mod commands;
mod config;
mod output;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use frota_client::{ClientConfig, FleetClient, TokenStore};
use std::path::PathBuf;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::config::{Config, MergedConfig};
use crate::output::{OutputContext, OutputFormat};

#[derive(Parser)]
#[command(name = "frota")]
#[command(author, version, about = "Fleet management CLI")]
#[command(propagate_version = true)]
struct Cli {
    /// API base URL, versioned path included
    #[arg(short, long, env = "FROTA_SERVER")]
    server: Option<String>,

    /// Configuration file path
    #[arg(short, long, env = "FROTA_CONFIG")]
    config: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    output: OutputFormat,

    /// Disable colored output
    #[arg(long)]
    no_color: bool,

    /// Minimal output (for scripting)
    #[arg(short, long)]
    quiet: bool,

    /// Verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List all trucks
    Trucks,

    /// Show truck details
    Truck {
        /// Truck id
        id: i64,
    },

    /// List maintenance records
    Maintenance {
        /// Restrict to one truck
        #[arg(long)]
        truck: Option<i64>,
    },

    /// Fleet-wide maintenance statistics
    Summary,

    /// Create a maintenance record
    AddMaintenance {
        /// Truck the work belongs to
        #[arg(long)]
        truck: i64,

        /// Service description
        service: String,

        /// Cost in BRL
        cost: f64,

        /// Start date (YYYY-MM-DD)
        #[arg(long)]
        started: Option<String>,

        /// Completion date (YYYY-MM-DD)
        #[arg(long)]
        completed: Option<String>,
    },

    /// Update a maintenance record
    UpdateMaintenance {
        /// Record id
        id: i64,

        /// Service description
        service: String,

        /// Cost in BRL
        cost: f64,

        /// Truck the work belongs to
        #[arg(long)]
        truck: Option<i64>,

        /// Start date (YYYY-MM-DD)
        #[arg(long)]
        started: Option<String>,

        /// Completion date (YYYY-MM-DD)
        #[arg(long)]
        completed: Option<String>,
    },

    /// Delete a maintenance record
    RmMaintenance {
        /// Record id
        id: i64,
    },

    /// List alerts
    Alerts {
        /// Restrict to one truck
        #[arg(long)]
        truck: Option<i64>,
    },

    /// Raise an alert for a truck
    AddAlert {
        /// Truck id
        truck: i64,

        /// Alert title
        #[arg(long)]
        title: String,

        /// Severity category (URGENTE, AVISO, ...)
        #[arg(long, default_value = "AVISO")]
        category: String,

        /// Alert description
        #[arg(long)]
        description: String,
    },

    /// Show a truck's planned route
    Route {
        /// Truck id
        truck: i64,
    },

    /// Show a truck's live position
    Position {
        /// Truck id
        truck: i64,
    },

    /// Show a vehicle's history
    History {
        /// Truck id
        truck: i64,
    },

    /// Generate an AI-authored fleet report
    Report {
        /// Custom prompt instead of the standard maintenance summary
        #[arg(long)]
        prompt: Option<String>,
    },

    /// Check backend availability
    Status {
        /// Forget the availability verdict and leave offline mode
        #[arg(long)]
        reset: bool,

        /// Pin the client offline
        #[arg(long)]
        offline: bool,
    },

    /// Authenticate and persist the session
    Login,

    /// Close the session and purge the persisted token
    Logout,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("warn")
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false))
        .with(filter)
        .init();

    // Load config file
    let config = if let Some(config_path) = &cli.config {
        Config::load_from(config_path)?
    } else {
        Config::load().unwrap_or_default()
    };

    // Merge CLI args with config
    let merged = config.merge_with_args(cli.server.as_deref(), cli.no_color);

    // Create output context
    let ctx = OutputContext::new(cli.output, merged.no_color, cli.quiet);

    let client = create_client(&merged)?;

    // Execute command
    match &cli.command {
        Commands::Trucks => commands::trucks(&client, &ctx).await?,

        Commands::Truck { id } => commands::truck(&client, *id, &ctx).await?,

        Commands::Maintenance { truck } => {
            commands::maintenance_list(&client, *truck, &ctx).await?
        }

        Commands::Summary => commands::maintenance_summary(&client, &ctx).await?,

        Commands::AddMaintenance {
            truck,
            service,
            cost,
            started,
            completed,
        } => {
            commands::maintenance_add(
                &client,
                *truck,
                service,
                *cost,
                started.as_deref(),
                completed.as_deref(),
                &ctx,
            )
            .await?
        }

        Commands::UpdateMaintenance {
            id,
            service,
            cost,
            truck,
            started,
            completed,
        } => {
            commands::maintenance_update(
                &client,
                *id,
                *truck,
                service,
                *cost,
                started.as_deref(),
                completed.as_deref(),
                &ctx,
            )
            .await?
        }

        Commands::RmMaintenance { id } => commands::maintenance_rm(&client, *id, &ctx).await?,

        Commands::Alerts { truck } => commands::alerts(&client, *truck, &ctx).await?,

        Commands::AddAlert {
            truck,
            title,
            category,
            description,
        } => commands::alert_add(&client, *truck, title, category, description, &ctx).await?,

        Commands::Route { truck } => commands::route(&client, *truck, &ctx).await?,

        Commands::Position { truck } => commands::position(&client, *truck, &ctx).await?,

        Commands::History { truck } => commands::history(&client, *truck, &ctx).await?,

        Commands::Report { prompt } => commands::report(&client, prompt.as_deref(), &ctx).await?,

        Commands::Status { reset, offline } => {
            commands::status(&client, *reset, *offline, &ctx).await?
        }

        Commands::Login => commands::login(&client, &ctx).await?,

        Commands::Logout => commands::logout(&client, &ctx).await?,
    }

    Ok(())
}

/// Create a fleet client from the merged configuration.
///
/// Precedence for the base URL: `--server`/`FROTA_SERVER`, then the config
/// file, then `FROTA_API_URL`, then the built-in default.
fn create_client(merged: &MergedConfig) -> Result<FleetClient> {
    let mut config = ClientConfig::from_env();
    if let Some(server) = &merged.server {
        config.base_url = server.clone();
    }
    if let Some(username) = &merged.username {
        config.credentials.username = username.clone();
    }
    if let Some(password) = &merged.password {
        config.credentials.password = password.clone();
    }
    if let Some(url) = &merged.chat_url {
        config.chat.url = Some(url.clone());
    }
    if let Some(key) = &merged.chat_api_key {
        config.chat.api_key = Some(key.clone());
    }
    if config.session_file.is_none() {
        config.session_file = TokenStore::default_path();
    }
    FleetClient::new(config).context("Failed to create fleet client")
}
