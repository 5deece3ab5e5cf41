//! Maintenance record models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::TruckRef;

/// A maintenance record as stored by the backend
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Maintenance {
    /// Unique record id
    pub id: i64,
    /// Service description (e.g. "Troca de óleo")
    #[serde(rename = "descServico", default)]
    pub service: Option<String>,
    /// Cost in BRL
    #[serde(rename = "custo", default)]
    pub cost: Option<f64>,
    /// When the work was started
    #[serde(rename = "dataInicio", default)]
    pub started_at: Option<DateTime<Utc>>,
    /// Absent while the work is still open
    #[serde(rename = "dataConclusao", default)]
    pub completed_at: Option<DateTime<Utc>>,
    /// Owning truck
    #[serde(rename = "caminhao", default, skip_serializing_if = "Option::is_none")]
    pub truck: Option<TruckRef>,
}

impl Maintenance {
    /// Whether the record is still open (no completion date)
    pub fn is_open(&self) -> bool {
        self.completed_at.is_none()
    }

    /// Id of the owning truck, if the backend attached one
    pub fn truck_id(&self) -> Option<i64> {
        self.truck.as_ref().map(|t| t.id)
    }
}

/// Payload for creating or updating a maintenance record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MaintenanceDraft {
    #[serde(rename = "descServico")]
    pub service: String,
    #[serde(rename = "custo")]
    pub cost: f64,
    #[serde(rename = "dataInicio", skip_serializing_if = "Option::is_none")]
    pub started_at: Option<DateTime<Utc>>,
    #[serde(rename = "dataConclusao", skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
    /// Truck the work belongs to
    #[serde(rename = "caminhaoId", skip_serializing_if = "Option::is_none")]
    pub truck_id: Option<i64>,
}
