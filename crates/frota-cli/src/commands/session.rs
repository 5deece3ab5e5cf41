//! Session commands - login and logout

use anyhow::{Context, Result};
use frota_client::FleetClient;

use crate::output::OutputContext;

/// Authenticate against the backend
pub async fn login(client: &FleetClient, ctx: &OutputContext) -> Result<()> {
    client.login().await.context("Login failed")?;
    if client.offline() {
        ctx.warn("Backend unreachable; operating in offline mode");
    } else {
        ctx.success("Session established");
    }
    Ok(())
}

/// Close the session and purge the persisted token
pub async fn logout(client: &FleetClient, ctx: &OutputContext) -> Result<()> {
    client.logout().await;
    ctx.success("Session closed");
    Ok(())
}
