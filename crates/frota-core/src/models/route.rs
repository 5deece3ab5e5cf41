//! Route and live-position models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Live coordinates of a truck
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Position {
    pub latitude: f64,
    pub longitude: f64,
    /// Current destination label
    #[serde(rename = "destino", default)]
    pub destination: Option<String>,
    #[serde(rename = "caminhao_id", default)]
    pub truck_id: Option<i64>,
}

/// A waypoint along a planned route
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Waypoint {
    #[serde(rename = "destinoInicial", default)]
    pub origin: Option<String>,
    #[serde(rename = "destinoFinal", default)]
    pub destination: Option<String>,
    pub latitude: f64,
    pub longitude: f64,
    /// Leg status ("PENDENTE" / "CONCLUIDO" ...)
    #[serde(default)]
    pub status: Option<String>,
    /// Estimated time of arrival
    #[serde(rename = "dataHoraPrevisao", default)]
    pub eta: Option<DateTime<Utc>>,
}
