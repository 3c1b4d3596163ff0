//! Authorization Orchestrator Binary
//!
//! Scores a batch of authorization requests and prints one plan per line
//! as JSON.
//!
//! ```text
//! AUTH_CONFIG=./auth.toml auth-orchestrator requests.json
//! ```
//!
//! `requests.json` holds an array of
//! `{ "transaction": {..}, "user": {..}, "verification": {..} | null }`.

use anyhow::{bail, Context, Result};
use auth_orchestrator::{load_requests, telemetry, AuthorizationFlow, OrchestratorConfig};
use std::io::Write;
use tracing::{error, info};

#[tokio::main]
async fn main() -> Result<()> {
    let config = match std::env::var("AUTH_CONFIG") {
        Ok(path) => OrchestratorConfig::from_file(&path)
            .with_context(|| format!("Failed to load config from {}", path))?,
        Err(_) => OrchestratorConfig::from_env().context("Failed to load config from environment")?,
    };

    telemetry::init_tracing(config.log_format);
    info!("Starting authorization orchestrator");

    let Some(requests_path) = std::env::args().nth(1) else {
        bail!("usage: auth-orchestrator <requests.json>");
    };

    let requests = load_requests(&requests_path)
        .with_context(|| format!("Failed to load requests from {}", requests_path))?;
    info!(count = requests.len(), path = %requests_path, "Loaded requests");

    let flow = AuthorizationFlow::from_config(&config)?;

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    for request in &requests {
        let plan = flow
            .authorize_verified(&request.transaction, &request.user, request.verification.as_ref())
            .await?;
        serde_json::to_writer(&mut out, &plan)?;
        writeln!(out)?;
    }
    out.flush()?;

    if let Some(audit) = flow.audit_log() {
        match audit.verify_integrity().await {
            Ok(_) => info!(path = %audit.path().display(), "Audit log integrity verified"),
            Err(e) => {
                error!(error = %e, "Audit log integrity check failed");
                return Err(e.into());
            }
        }
    }

    info!("Shutting down authorization orchestrator");
    Ok(())
}
