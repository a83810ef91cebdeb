use anyhow::{Context, Result};
use gantry_frame::ViewFrame;
use gantry_rest::{RestClient, TransportError};
use serde_json::Value;
use tracing::debug;

use crate::output;

pub async fn get(client: &RestClient, endpoint: &str) -> Result<()> {
    let payload = client.get(endpoint).await.map_err(describe)?;
    println!("{}", output::render_json(&payload));
    Ok(())
}

pub async fn post(client: &RestClient, endpoint: &str, data: &str) -> Result<()> {
    let payload: Value = serde_json::from_str(data).context("--data is not valid JSON")?;
    let response = client.post(endpoint, payload).await.map_err(describe)?;
    println!("{}", output::render_json(&response));
    Ok(())
}

pub async fn put(client: &RestClient, endpoint: &str, data: &str) -> Result<()> {
    let payload: Value = serde_json::from_str(data).context("--data is not valid JSON")?;
    let response = client.put(endpoint, payload).await.map_err(describe)?;
    println!("{}", output::render_json(&response));
    Ok(())
}

pub async fn patch(client: &RestClient, endpoint: &str, data: &str) -> Result<()> {
    let payload: Value = serde_json::from_str(data).context("--data is not valid JSON")?;
    let response = client.patch(endpoint, payload).await.map_err(describe)?;
    println!("{}", output::render_json(&response));
    Ok(())
}

pub async fn delete(client: &RestClient, endpoint: &str) -> Result<()> {
    let response = client.delete(endpoint).await.map_err(describe)?;
    if response.is_null() {
        println!("Deleted.");
    } else {
        println!("{}", output::render_json(&response));
    }
    Ok(())
}

/// Fetch the node description and its health counters, tracking progress on
/// the shared frame the way the console views do around multi-call loads.
pub async fn status(client: &RestClient, frame: &ViewFrame) -> Result<()> {
    frame.set_loader_steps(2).await;

    let node = client.get("/").await.map_err(describe)?;
    frame.increment_loader().await;
    let progress = frame.state().await.loader_unit;
    debug!(%progress, "fetched node description");

    let health = client.get("/status").await.map_err(describe)?;
    frame.increment_loader().await;
    let progress = frame.state().await.loader_unit;
    debug!(%progress, "fetched health counters");

    print!("{}", output::render_status(&node, &health));
    Ok(())
}

/// Attach a user-facing description to a transport failure. Branching on
/// the failure category is the consumer's job, not the client's.
fn describe(err: TransportError) -> anyhow::Error {
    let context = match &err {
        TransportError::Network(_) => "could not reach the gateway admin API".to_string(),
        TransportError::Status { .. } if err.is_unauthorized() => {
            "unauthorized: check --user and --password".to_string()
        }
        TransportError::Status { status, body } => {
            let detail = body["message"]
                .as_str()
                .map(|m| format!(": {}", m))
                .unwrap_or_default();
            format!("gateway returned HTTP {}{}", status, detail)
        }
    };
    anyhow::Error::new(err).context(context)
}
