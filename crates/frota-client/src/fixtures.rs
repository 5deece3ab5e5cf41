//! Offline fixture datasets
//!
//! Served whenever offline mode is active or a read degrades. The
//! maintenance/truck/alert tables mirror the reference data the dashboard
//! ships with; routes and positions are synthetic but stable per truck.

use std::sync::atomic::{AtomicI64, Ordering};

use chrono::{DateTime, Utc};
use frota_core::models::{
    Alert, Driver, Maintenance, Position, Truck, TruckRef, VehicleHistory, Waypoint,
};

/// Ids handed out for writes simulated while offline
static NEXT_SIMULATED_ID: AtomicI64 = AtomicI64::new(1000);

/// Next synthetic id for a simulated write
pub fn simulated_id() -> i64 {
    NEXT_SIMULATED_ID.fetch_add(1, Ordering::Relaxed)
}

fn ts(value: &str) -> DateTime<Utc> {
    value.parse().expect("fixture timestamp")
}

fn truck_ref(id: i64, plate: &str) -> Option<TruckRef> {
    Some(TruckRef {
        id,
        plate: Some(plate.to_string()),
    })
}

/// The reference maintenance records
pub fn maintenance() -> Vec<Maintenance> {
    vec![
        Maintenance {
            id: 1,
            service: Some("Troca de óleo".to_string()),
            cost: Some(350.0),
            started_at: Some(ts("2024-10-07T00:00:00Z")),
            completed_at: Some(ts("2024-10-08T00:00:00Z")),
            truck: truck_ref(1, "ABC-1234"),
        },
        Maintenance {
            id: 2,
            service: Some("Revisão de freios".to_string()),
            cost: Some(850.0),
            started_at: Some(ts("2024-10-14T00:00:00Z")),
            completed_at: Some(ts("2024-10-14T00:00:00Z")),
            truck: truck_ref(2, "DEF-5678"),
        },
        Maintenance {
            id: 3,
            service: Some("Alinhamento".to_string()),
            cost: Some(200.0),
            started_at: Some(ts("2024-10-23T00:00:00Z")),
            completed_at: None,
            truck: truck_ref(1, "ABC-1234"),
        },
        Maintenance {
            id: 4,
            service: Some("Troca de pneus".to_string()),
            cost: Some(1500.0),
            started_at: Some(ts("2024-10-28T00:00:00Z")),
            completed_at: None,
            truck: truck_ref(3, "GHI-9012"),
        },
    ]
}

/// Maintenance records belonging to one truck
pub fn maintenance_for_truck(truck_id: i64) -> Vec<Maintenance> {
    maintenance()
        .into_iter()
        .filter(|m| m.truck_id() == Some(truck_id))
        .collect()
}

/// The reference fleet
pub fn trucks() -> Vec<Truck> {
    vec![
        Truck {
            id: 1,
            plate: Some("ABC-1234".to_string()),
            model: Some("Scania R450".to_string()),
            year: Some(2022),
            status: Some("ATIVO".to_string()),
            driver: Some(Driver {
                id: 1,
                name: Some("Carlos Mendes".to_string()),
            }),
        },
        Truck {
            id: 2,
            plate: Some("DEF-5678".to_string()),
            model: Some("Volvo FH540".to_string()),
            year: Some(2021),
            status: Some("ATIVO".to_string()),
            driver: Some(Driver {
                id: 2,
                name: Some("João Batista".to_string()),
            }),
        },
        Truck {
            id: 3,
            plate: Some("GHI-9012".to_string()),
            model: Some("Mercedes-Benz Actros".to_string()),
            year: Some(2023),
            status: Some("INATIVO".to_string()),
            driver: Some(Driver {
                id: 3,
                name: Some("Ana Ribeiro".to_string()),
            }),
        },
    ]
}

pub fn truck(id: i64) -> Option<Truck> {
    trucks().into_iter().find(|t| t.id == id)
}

/// The reference alerts
pub fn alerts() -> Vec<Alert> {
    vec![
        Alert {
            id: Some(1),
            title: Some("Combustível baixo".to_string()),
            category: Some("URGENTE".to_string()),
            description: Some("Combustível em 5%".to_string()),
            truck_id: Some(1),
        },
        Alert {
            id: Some(2),
            title: Some("Manutenção programada".to_string()),
            category: Some("AVISO".to_string()),
            description: Some("Manutenção agendada para amanhã".to_string()),
            truck_id: Some(2),
        },
    ]
}

pub fn alerts_for_truck(truck_id: i64) -> Vec<Alert> {
    alerts()
        .into_iter()
        .filter(|a| a.truck_id == Some(truck_id))
        .collect()
}

/// A stable synthetic position per truck (around the São Paulo region)
pub fn position(truck_id: i64) -> Position {
    let (latitude, longitude, destination) = match truck_id % 3 {
        1 => (-23.5505, -46.6333, "Curitiba"),
        2 => (-22.9099, -47.0626, "Rio de Janeiro"),
        _ => (-19.9167, -43.9345, "São Paulo"),
    };
    Position {
        latitude,
        longitude,
        destination: Some(destination.to_string()),
        truck_id: Some(truck_id),
    }
}

/// A stable synthetic three-leg route per truck
pub fn route(truck_id: i64) -> Vec<Waypoint> {
    let eta_base = ts("2024-11-02T08:00:00Z");
    let legs = [
        ("São Paulo", "Campinas", -23.5505, -46.6333, "CONCLUIDO"),
        ("Campinas", "Londrina", -22.9099, -47.0626, "PENDENTE"),
        ("Londrina", "Curitiba", -23.3045, -51.1696, "PENDENTE"),
    ];
    legs.iter()
        .enumerate()
        .map(|(i, (origin, destination, latitude, longitude, status))| Waypoint {
            origin: Some(origin.to_string()),
            destination: Some(destination.to_string()),
            latitude: latitude + (truck_id as f64) * 0.01,
            longitude: *longitude,
            status: Some(status.to_string()),
            eta: Some(eta_base + chrono::Duration::hours(4 * i as i64)),
        })
        .collect()
}

/// Vehicle history has no offline counterpart; shaped but empty
pub fn vehicle_history(_truck_id: i64) -> VehicleHistory {
    VehicleHistory::default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_maintenance_for_truck_filters() {
        let records = maintenance_for_truck(1);
        let ids: Vec<i64> = records.iter().map(|m| m.id).collect();
        assert_eq!(ids, vec![1, 3]);
    }

    #[test]
    fn test_maintenance_for_unknown_truck_is_empty() {
        assert!(maintenance_for_truck(99).is_empty());
    }

    #[test]
    fn test_reference_costs() {
        let costs: Vec<f64> = maintenance().iter().filter_map(|m| m.cost).collect();
        assert_eq!(costs, vec![350.0, 850.0, 200.0, 1500.0]);
    }

    #[test]
    fn test_fleet_size() {
        assert_eq!(trucks().len(), 3);
        assert_eq!(truck(2).and_then(|t| t.plate).as_deref(), Some("DEF-5678"));
        assert!(truck(99).is_none());
    }

    #[test]
    fn test_alerts_filter() {
        assert_eq!(alerts_for_truck(1).len(), 1);
        assert_eq!(alerts_for_truck(3).len(), 0);
    }

    #[test]
    fn test_simulated_ids_are_distinct() {
        let a = simulated_id();
        let b = simulated_id();
        assert_ne!(a, b);
    }

    #[test]
    fn test_route_has_three_legs() {
        let legs = route(1);
        assert_eq!(legs.len(), 3);
        assert_eq!(legs[0].status.as_deref(), Some("CONCLUIDO"));
    }
}
