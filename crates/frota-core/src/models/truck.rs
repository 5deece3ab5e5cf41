//! Truck and driver models

use serde::{Deserialize, Serialize};

/// A truck in the fleet
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Truck {
    /// Unique truck id
    pub id: i64,
    /// License plate
    #[serde(rename = "placa", default)]
    pub plate: Option<String>,
    /// Model name (e.g. "Scania R450")
    #[serde(rename = "modelo", default)]
    pub model: Option<String>,
    /// Manufacturing year
    #[serde(rename = "ano", default)]
    pub year: Option<i32>,
    /// Operational status ("ATIVO" / "INATIVO")
    #[serde(default)]
    pub status: Option<String>,
    /// Assigned driver
    #[serde(rename = "motorista", default, skip_serializing_if = "Option::is_none")]
    pub driver: Option<Driver>,
}

impl Truck {
    /// Whether the truck is currently in service
    pub fn is_active(&self) -> bool {
        self.status.as_deref() == Some("ATIVO")
    }
}

/// A driver assigned to a truck
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Driver {
    pub id: i64,
    #[serde(rename = "nome", default)]
    pub name: Option<String>,
}

/// Truck reference embedded in other records (id + plate only)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TruckRef {
    pub id: i64,
    #[serde(rename = "placa", default)]
    pub plate: Option<String>,
}
