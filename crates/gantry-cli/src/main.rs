mod cli;
mod commands;
mod output;

use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use gantry_frame::ViewFrame;
use gantry_rest::{HttpTransport, RestClient, RestContext};
use tracing_subscriber::EnvFilter;

use cli::{Cli, Command};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_target(false)
        .init();

    let cli = Cli::parse();

    // Composition root: the one shared context and frame instance that
    // every consumer receives a handle to.
    let context = RestContext::new();
    context.set_host(cli.host.clone()).await;
    context.set_accept_type("application/json").await;
    context.set_content_type("application/json").await;
    if let Some(user) = &cli.user {
        context.set_basic_auth(user, cli.password.as_deref()).await;
    }

    let client = RestClient::new(context, Arc::new(HttpTransport::new()));
    let frame = ViewFrame::new();

    match cli.command {
        Command::Get { endpoint } => commands::get(&client, &endpoint).await,
        Command::Post { endpoint, data } => commands::post(&client, &endpoint, &data).await,
        Command::Put { endpoint, data } => commands::put(&client, &endpoint, &data).await,
        Command::Patch { endpoint, data } => commands::patch(&client, &endpoint, &data).await,
        Command::Delete { endpoint } => commands::delete(&client, &endpoint).await,
        Command::Status => commands::status(&client, &frame).await,
    }
}
