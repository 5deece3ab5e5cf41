//! Route and position commands

use anyhow::Result;
use frota_client::{stats, FleetClient};

use crate::output::{OutputContext, WaypointRow};

/// Show the planned route for a truck
pub async fn route(client: &FleetClient, truck: i64, ctx: &OutputContext) -> Result<()> {
    let waypoints = client.route(truck).await;
    if waypoints.is_empty() {
        ctx.info("No route found");
        return Ok(());
    }

    let rows: Vec<WaypointRow> = waypoints
        .into_iter()
        .map(|w| WaypointRow {
            origin: w.origin.unwrap_or_else(|| "-".to_string()),
            destination: w.destination.unwrap_or_else(|| "-".to_string()),
            latitude: w.latitude,
            longitude: w.longitude,
            status: w.status.unwrap_or_else(|| "-".to_string()),
            eta: stats::format_date_short(w.eta),
        })
        .collect();

    ctx.print(&rows);
    Ok(())
}

/// Show the live position of a truck
pub async fn position(client: &FleetClient, truck: i64, ctx: &OutputContext) -> Result<()> {
    match client.position(truck).await {
        Some(p) => {
            ctx.print_kv(&[
                ("Truck", truck.to_string()),
                ("Latitude", p.latitude.to_string()),
                ("Longitude", p.longitude.to_string()),
                (
                    "Destination",
                    p.destination.unwrap_or_else(|| "-".to_string()),
                ),
            ]);
        }
        None => ctx.error(&format!("No position available for truck {}", truck)),
    }
    Ok(())
}
