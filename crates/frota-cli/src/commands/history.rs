//! Vehicle history command

use anyhow::Result;
use frota_client::FleetClient;

use crate::output::{OutputContext, OutputFormat};

/// Show a vehicle's modification/accident/upgrade history
pub async fn history(client: &FleetClient, truck: i64, ctx: &OutputContext) -> Result<()> {
    let history = client.vehicle_history(truck).await;

    if ctx.format == OutputFormat::Json {
        println!(
            "{}",
            serde_json::to_string_pretty(&history).unwrap_or_else(|_| "{}".to_string())
        );
        return Ok(());
    }

    if history.is_empty() {
        ctx.info(&format!("No history recorded for truck {}", truck));
        return Ok(());
    }

    ctx.print_kv(&[
        ("Modifications", history.modifications.len().to_string()),
        ("Accidents", history.accidents.len().to_string()),
        ("Upgrades", history.upgrades.len().to_string()),
    ]);
    Ok(())
}
