//! AI report command

use anyhow::{Context, Result};
use frota_client::FleetClient;

use crate::output::OutputContext;

/// Generate an AI-authored fleet report.
///
/// With `--prompt`, the raw prompt is sent as-is and chat failures surface;
/// without it, the standard maintenance summary is requested and degrades
/// to a locally composed report.
pub async fn report(client: &FleetClient, prompt: Option<&str>, ctx: &OutputContext) -> Result<()> {
    let answer = match prompt {
        Some(prompt) => client
            .generate_report(prompt)
            .await
            .context("Failed to generate report")?,
        None => client.maintenance_report().await,
    };
    ctx.info(&answer);
    Ok(())
}
