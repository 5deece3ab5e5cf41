//! Trucks commands - fleet listing and truck details

use anyhow::Result;
use frota_client::FleetClient;

use crate::output::{OutputContext, TruckRow};

/// List all trucks in the fleet
pub async fn trucks(client: &FleetClient, ctx: &OutputContext) -> Result<()> {
    let trucks = client.list_trucks().await;
    if trucks.is_empty() {
        ctx.info("No trucks found");
        return Ok(());
    }

    let rows: Vec<TruckRow> = trucks
        .into_iter()
        .map(|t| TruckRow {
            id: t.id,
            plate: t.plate.unwrap_or_else(|| "-".to_string()),
            model: t.model.unwrap_or_else(|| "-".to_string()),
            year: t.year.map(|y| y.to_string()).unwrap_or_else(|| "-".to_string()),
            status: t.status.unwrap_or_else(|| "-".to_string()),
            driver: t
                .driver
                .and_then(|d| d.name)
                .unwrap_or_else(|| "-".to_string()),
        })
        .collect();

    ctx.print(&rows);
    Ok(())
}

/// Show one truck's details
pub async fn truck(client: &FleetClient, id: i64, ctx: &OutputContext) -> Result<()> {
    match client.truck(id).await {
        Some(t) => {
            ctx.print_kv(&[
                ("Id", t.id.to_string()),
                ("Plate", t.plate.unwrap_or_else(|| "-".to_string())),
                ("Model", t.model.unwrap_or_else(|| "-".to_string())),
                (
                    "Year",
                    t.year.map(|y| y.to_string()).unwrap_or_else(|| "-".to_string()),
                ),
                ("Status", t.status.unwrap_or_else(|| "-".to_string())),
                (
                    "Driver",
                    t.driver
                        .and_then(|d| d.name)
                        .unwrap_or_else(|| "-".to_string()),
                ),
            ]);
        }
        None => ctx.error(&format!("Truck {} not found", id)),
    }
    Ok(())
}
