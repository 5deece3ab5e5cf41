//! Maintenance commands - listing, statistics, and record management

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use frota_client::{stats, FleetClient, Maintenance, MaintenanceDraft};

use crate::output::{MaintenanceRow, OutputContext, ServiceCostRow};

/// List maintenance records, fleet-wide or for one truck
pub async fn maintenance_list(
    client: &FleetClient,
    truck: Option<i64>,
    ctx: &OutputContext,
) -> Result<()> {
    let records = match truck {
        Some(id) => client.maintenance_for_truck(id).await,
        None => client.list_maintenance().await,
    };

    if records.is_empty() {
        ctx.info("No maintenance records found");
        return Ok(());
    }

    let rows: Vec<MaintenanceRow> = records.iter().map(row).collect();
    ctx.print(&rows);
    Ok(())
}

/// Print fleet-wide maintenance statistics
pub async fn maintenance_summary(client: &FleetClient, ctx: &OutputContext) -> Result<()> {
    let records = client.list_maintenance().await;
    if records.is_empty() {
        ctx.info("No maintenance records found");
        return Ok(());
    }

    ctx.print_kv(&[
        ("Records", records.len().to_string()),
        ("Open", stats::pending(&records).len().to_string()),
        ("Completed", stats::completed(&records).len().to_string()),
        ("Total cost", format!("R$ {:.2}", stats::total_cost(&records))),
    ]);

    let groups: Vec<ServiceCostRow> = stats::cost_by_service(&records)
        .into_iter()
        .map(|g| ServiceCostRow {
            service: g.service,
            total: format!("{:.2}", g.total),
            count: g.count,
        })
        .collect();
    ctx.print(&groups);

    if let Some(load) = stats::busiest_truck(&records) {
        ctx.info(&format!(
            "Busiest truck: {} ({} records, R$ {:.2})",
            load.plate.as_deref().unwrap_or("N/A"),
            load.count,
            load.total_cost
        ));
    }
    Ok(())
}

/// Create a maintenance record
#[allow(clippy::too_many_arguments)]
pub async fn maintenance_add(
    client: &FleetClient,
    truck: i64,
    service: &str,
    cost: f64,
    started: Option<&str>,
    completed: Option<&str>,
    ctx: &OutputContext,
) -> Result<()> {
    let draft = MaintenanceDraft {
        service: service.to_string(),
        cost,
        started_at: parse_date_arg(started)?,
        completed_at: parse_date_arg(completed)?,
        truck_id: Some(truck),
    };

    let record = client
        .create_maintenance(&draft)
        .await
        .context("Failed to create maintenance record")?;
    ctx.success(&format!("Created maintenance record #{}", record.id));
    Ok(())
}

/// Update a maintenance record
#[allow(clippy::too_many_arguments)]
pub async fn maintenance_update(
    client: &FleetClient,
    id: i64,
    truck: Option<i64>,
    service: &str,
    cost: f64,
    started: Option<&str>,
    completed: Option<&str>,
    ctx: &OutputContext,
) -> Result<()> {
    let draft = MaintenanceDraft {
        service: service.to_string(),
        cost,
        started_at: parse_date_arg(started)?,
        completed_at: parse_date_arg(completed)?,
        truck_id: truck,
    };

    let record = client
        .update_maintenance(id, &draft)
        .await
        .context("Failed to update maintenance record")?;
    ctx.success(&format!("Updated maintenance record #{}", record.id));
    Ok(())
}

/// Delete a maintenance record
pub async fn maintenance_rm(client: &FleetClient, id: i64, ctx: &OutputContext) -> Result<()> {
    client
        .delete_maintenance(id)
        .await
        .context("Failed to delete maintenance record")?;
    ctx.success(&format!("Deleted maintenance record #{}", id));
    Ok(())
}

fn row(m: &Maintenance) -> MaintenanceRow {
    MaintenanceRow {
        id: m.id,
        service: m.service.clone().unwrap_or_else(|| "-".to_string()),
        cost: format!("{:.2}", m.cost.unwrap_or(0.0)),
        started: stats::format_date(m.started_at),
        completed: stats::format_date(m.completed_at),
        truck: m
            .truck
            .as_ref()
            .and_then(|t| t.plate.clone())
            .unwrap_or_else(|| "-".to_string()),
    }
}

fn parse_date_arg(value: Option<&str>) -> Result<Option<DateTime<Utc>>> {
    match value {
        None => Ok(None),
        Some(raw) => {
            let date = chrono::NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                .with_context(|| format!("Invalid date '{}', expected YYYY-MM-DD", raw))?;
            let datetime = date
                .and_hms_opt(0, 0, 0)
                .context("Invalid time of day")?
                .and_utc();
            Ok(Some(datetime))
        }
    }
}
