//! AI-authored fleet reports
//!
//! Thin client for the external chat endpoint plus the locally composed
//! fallback used whenever the endpoint is unset or failing. Chat failures
//! never toggle the backend's offline mode; the two services are unrelated.

use std::time::Duration;

use frota_core::models::Maintenance;
use frota_core::stats;
use reqwest::Client;
use serde_json::Value;
use tracing::debug;
use uuid::Uuid;

use crate::config::ChatConfig;
use crate::error::{ApiError, Result};

/// Client for the chat/report endpoint
pub struct ChatClient {
    http: Client,
    config: ChatConfig,
    session_id: String,
    budget: Duration,
}

impl ChatClient {
    pub(crate) fn new(http: Client, config: ChatConfig, budget: Duration) -> Self {
        Self {
            http,
            config,
            session_id: Uuid::new_v4().to_string(),
            budget,
        }
    }

    /// Send a prompt and return the answer text.
    ///
    /// The answer is read from `resposta`, `message`, or `response`.
    pub async fn ask(&self, prompt: &str) -> Result<String> {
        let url = self
            .config
            .url
            .as_deref()
            .ok_or_else(|| ApiError::Http("chat endpoint not configured".to_string()))?;

        debug!(%url, "requesting AI report");
        let mut request = self.http.post(url).json(&serde_json::json!({
            "mensagem": prompt,
            "session_id": self.session_id,
        }));
        if let Some(key) = &self.config.api_key {
            request = request.header(self.config.api_key_header.as_str(), key);
        }

        let response = match tokio::time::timeout(self.budget, request.send()).await {
            Err(_) => return Err(ApiError::Timeout),
            Ok(Err(err)) => return Err(ApiError::from_transport(err)),
            Ok(Ok(response)) => response,
        };

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            let message = if message.is_empty() {
                format!("HTTP {}", status)
            } else {
                message
            };
            return Err(ApiError::server_error(status.as_u16(), message));
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| ApiError::Parse(e.to_string()))?;
        extract_answer(&body).ok_or_else(|| ApiError::Parse("no answer in chat response".to_string()))
    }
}

fn extract_answer(body: &Value) -> Option<String> {
    for key in ["resposta", "message", "response"] {
        if let Some(answer) = body.get(key).and_then(|v| v.as_str()) {
            return Some(answer.to_string());
        }
    }
    None
}

/// Prompt sent to the chat endpoint for the fleet maintenance summary
pub fn report_prompt(records: &[Maintenance]) -> String {
    let mut lines = vec![
        "Gere um relatório resumido da frota a partir dos registros de manutenção abaixo."
            .to_string(),
    ];
    for m in records {
        lines.push(format!(
            "- #{} {} | custo R$ {:.2} | início {} | conclusão {} | veículo {}",
            m.id,
            m.service.as_deref().unwrap_or("Outros"),
            m.cost.unwrap_or(0.0),
            stats::format_date(m.started_at),
            stats::format_date(m.completed_at),
            m.truck
                .as_ref()
                .and_then(|t| t.plate.as_deref())
                .unwrap_or("N/A"),
        ));
    }
    lines.push(format!(
        "Custo total: R$ {:.2}. Destaque pendências e o veículo com mais ocorrências.",
        stats::total_cost(records)
    ));
    lines.join("\n")
}

/// Locally composed summary used when the chat endpoint is unavailable
pub fn fallback_report(records: &[Maintenance]) -> String {
    let open = stats::pending(records).len();
    let done = stats::completed(records).len();
    let total = stats::total_cost(records);

    let mut report = format!(
        "Resumo da frota: {} manutenções registradas ({} concluídas, {} em aberto). Custo total R$ {:.2}.",
        records.len(),
        done,
        open,
        total
    );
    if let Some(load) = stats::busiest_truck(records) {
        report.push_str(&format!(
            " Veículo com mais ocorrências: {} ({} registros, R$ {:.2}).",
            load.plate.as_deref().unwrap_or("N/A"),
            load.count,
            load.total_cost
        ));
    }
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures;
    use serde_json::json;

    #[test]
    fn test_extract_answer_variants() {
        assert_eq!(
            extract_answer(&json!({"resposta": "ok"})).as_deref(),
            Some("ok")
        );
        assert_eq!(
            extract_answer(&json!({"message": "hi"})).as_deref(),
            Some("hi")
        );
        assert_eq!(
            extract_answer(&json!({"response": "yo"})).as_deref(),
            Some("yo")
        );
        assert_eq!(extract_answer(&json!({"other": "x"})), None);
    }

    #[test]
    fn test_fallback_report_summarizes_reference_data() {
        let report = fallback_report(&fixtures::maintenance());
        assert!(report.contains("4 manutenções"));
        assert!(report.contains("2 concluídas"));
        assert!(report.contains("2 em aberto"));
        assert!(report.contains("2900.00"));
        assert!(report.contains("ABC-1234"));
    }

    #[test]
    fn test_report_prompt_lists_records() {
        let prompt = report_prompt(&fixtures::maintenance());
        assert!(prompt.contains("Troca de óleo"));
        assert!(prompt.contains("Custo total: R$ 2900.00"));
    }
}
