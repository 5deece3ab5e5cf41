//! Alerts commands - listing and raising driver alerts

use anyhow::{Context, Result};
use frota_client::{AlertDraft, FleetClient};

use crate::output::{AlertRow, OutputContext};

/// List alerts, fleet-wide or for one truck
pub async fn alerts(client: &FleetClient, truck: Option<i64>, ctx: &OutputContext) -> Result<()> {
    let alerts = match truck {
        Some(id) => client.alerts_for_truck(id).await,
        None => client.list_alerts().await,
    };

    if alerts.is_empty() {
        ctx.info("No alerts found");
        return Ok(());
    }

    let rows: Vec<AlertRow> = alerts
        .into_iter()
        .map(|a| AlertRow {
            id: a.id.map(|id| id.to_string()).unwrap_or_else(|| "-".to_string()),
            title: a.title.unwrap_or_else(|| "-".to_string()),
            category: a.category.unwrap_or_else(|| "-".to_string()),
            description: a.description.unwrap_or_else(|| "-".to_string()),
            truck: a
                .truck_id
                .map(|id| id.to_string())
                .unwrap_or_else(|| "-".to_string()),
        })
        .collect();

    ctx.print(&rows);
    Ok(())
}

/// Raise an alert for a truck
pub async fn alert_add(
    client: &FleetClient,
    truck: i64,
    title: &str,
    category: &str,
    description: &str,
    ctx: &OutputContext,
) -> Result<()> {
    let draft = AlertDraft {
        title: title.to_string(),
        category: category.to_string(),
        description: description.to_string(),
    };

    let alert = client
        .create_alert(truck, &draft)
        .await
        .context("Failed to create alert")?;
    ctx.success(&format!(
        "Created alert {} for truck {}",
        alert
            .id
            .map(|id| format!("#{}", id))
            .unwrap_or_else(|| "-".to_string()),
        truck
    ));
    Ok(())
}
