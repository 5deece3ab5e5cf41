//! Derived maintenance statistics
//!
//! Pure helpers over maintenance slices. Absent fields null-coalesce (cost
//! defaults to zero, missing service descriptions group under "Outros")
//! instead of failing, so partial backend payloads still aggregate.

use chrono::{DateTime, Datelike, Utc};

use crate::models::Maintenance;

/// Days after which an open record counts as overdue
const OVERDUE_AFTER_DAYS: i64 = 7;

/// Records still open (no completion date)
pub fn pending(records: &[Maintenance]) -> Vec<&Maintenance> {
    records.iter().filter(|m| m.is_open()).collect()
}

/// Records with a completion date
pub fn completed(records: &[Maintenance]) -> Vec<&Maintenance> {
    records.iter().filter(|m| !m.is_open()).collect()
}

/// Total cost across all records
pub fn total_cost(records: &[Maintenance]) -> f64 {
    records.iter().map(|m| m.cost.unwrap_or(0.0)).sum()
}

/// Cost aggregated per service description
#[derive(Debug, Clone, PartialEq)]
pub struct ServiceCost {
    pub service: String,
    pub total: f64,
    pub count: usize,
}

/// Group costs by service description, in first-seen order
pub fn cost_by_service(records: &[Maintenance]) -> Vec<ServiceCost> {
    let mut groups: Vec<ServiceCost> = Vec::new();
    for m in records {
        let service = m.service.clone().unwrap_or_else(|| "Outros".to_string());
        match groups.iter_mut().find(|g| g.service == service) {
            Some(group) => {
                group.total += m.cost.unwrap_or(0.0);
                group.count += 1;
            }
            None => groups.push(ServiceCost {
                service,
                total: m.cost.unwrap_or(0.0),
                count: 1,
            }),
        }
    }
    groups
}

/// Per-truck maintenance load
#[derive(Debug, Clone, PartialEq)]
pub struct TruckLoad {
    /// Absent when the record carried no truck reference
    pub truck_id: Option<i64>,
    pub plate: Option<String>,
    pub count: usize,
    pub total_cost: f64,
}

/// The truck with the most maintenance records ("most problematic vehicle").
///
/// Ties resolve to the truck seen first. Returns `None` on an empty slice.
pub fn busiest_truck(records: &[Maintenance]) -> Option<TruckLoad> {
    let mut loads: Vec<TruckLoad> = Vec::new();
    for m in records {
        let truck_id = m.truck_id();
        match loads.iter_mut().find(|l| l.truck_id == truck_id) {
            Some(load) => {
                load.count += 1;
                load.total_cost += m.cost.unwrap_or(0.0);
            }
            None => loads.push(TruckLoad {
                truck_id,
                plate: m.truck.as_ref().and_then(|t| t.plate.clone()),
                count: 1,
                total_cost: m.cost.unwrap_or(0.0),
            }),
        }
    }
    loads
        .into_iter()
        .reduce(|max, l| if l.count > max.count { l } else { max })
}

/// Records whose start date falls in the given month
pub fn in_month(records: &[Maintenance], year: i32, month: u32) -> Vec<&Maintenance> {
    records
        .iter()
        .filter(|m| {
            m.started_at
                .map(|d| d.year() == year && d.month() == month)
                .unwrap_or(false)
        })
        .collect()
}

/// Whether an open record has been running for more than the overdue window
pub fn is_overdue(record: &Maintenance, now: DateTime<Utc>) -> bool {
    if !record.is_open() {
        return false;
    }
    match record.started_at {
        Some(started) => (now - started).num_days() > OVERDUE_AFTER_DAYS,
        None => false,
    }
}

/// Format a timestamp as DD/MM/YYYY, "N/A" when absent
pub fn format_date(ts: Option<DateTime<Utc>>) -> String {
    match ts {
        Some(d) => d.format("%d/%m/%Y").to_string(),
        None => "N/A".to_string(),
    }
}

/// Format a timestamp as DD/MM, "N/A" when absent
pub fn format_date_short(ts: Option<DateTime<Utc>>) -> String {
    match ts {
        Some(d) => d.format("%d/%m").to_string(),
        None => "N/A".to_string(),
    }
}
