//! Vehicle history models (document-store backed endpoint)

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Modification/accident/upgrade history of a vehicle.
///
/// The entries are opaque documents; the client passes them through without
/// interpreting their schema.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VehicleHistory {
    #[serde(rename = "historicoModificacoes", default)]
    pub modifications: Vec<Value>,
    #[serde(rename = "historicoAcidentes", default)]
    pub accidents: Vec<Value>,
    #[serde(rename = "upgradesRealizados", default)]
    pub upgrades: Vec<Value>,
}

impl VehicleHistory {
    pub fn is_empty(&self) -> bool {
        self.modifications.is_empty() && self.accidents.is_empty() && self.upgrades.is_empty()
    }
}
