//! Backend status command

use anyhow::Result;
use frota_client::{Availability, FleetClient};

use crate::output::OutputContext;

/// Show backend availability; optionally reset or force offline mode first
pub async fn status(
    client: &FleetClient,
    reset: bool,
    offline: bool,
    ctx: &OutputContext,
) -> Result<()> {
    if reset {
        client.reset_api_state();
        ctx.success("API state reset");
    }
    if offline {
        client.force_offline();
        ctx.success("Offline mode forced");
    }

    let reachable = client.check_api().await;
    let availability = match client.availability() {
        Availability::Unknown => "unknown",
        Availability::Available => "available",
        Availability::Unavailable => "unavailable",
    };

    ctx.print_kv(&[
        ("Server", client.base_url().to_string()),
        ("Reachable", reachable.to_string()),
        ("Availability", availability.to_string()),
        ("Offline mode", client.offline().to_string()),
    ]);
    Ok(())
}
