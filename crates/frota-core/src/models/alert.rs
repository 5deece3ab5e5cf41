//! Driver alert models

use serde::{Deserialize, Serialize};

/// An alert raised for a truck
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Alert {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(rename = "titulo", default)]
    pub title: Option<String>,
    /// Severity category ("URGENTE" / "AVISO")
    #[serde(rename = "categoria", default)]
    pub category: Option<String>,
    #[serde(rename = "descricao", default)]
    pub description: Option<String>,
    #[serde(rename = "caminhaoId", default)]
    pub truck_id: Option<i64>,
}

/// Payload for creating an alert
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlertDraft {
    #[serde(rename = "titulo")]
    pub title: String,
    #[serde(rename = "categoria")]
    pub category: String,
    #[serde(rename = "descricao")]
    pub description: String,
}
