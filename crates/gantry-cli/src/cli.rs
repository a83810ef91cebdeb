use clap::{Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(
    name = "gantry",
    about = "Command-line admin console for a gateway management API",
    version
)]
pub struct Cli {
    /// Gateway admin API base URL.
    #[arg(
        long,
        env = "GANTRY_HOST",
        global = true,
        default_value = "http://localhost:8001"
    )]
    pub host: String,

    /// Basic-auth username for the admin API.
    #[arg(long, env = "GANTRY_USER", global = true)]
    pub user: Option<String>,

    /// Basic-auth password. Ignored without --user.
    #[arg(long, env = "GANTRY_PASSWORD", global = true)]
    pub password: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Fetch a resource and print it as JSON.
    Get {
        /// Admin API path, e.g. /services.
        endpoint: String,
    },

    /// Create a resource from an inline JSON payload.
    Post {
        endpoint: String,

        /// JSON object to send as the request body.
        #[arg(long)]
        data: String,
    },

    /// Replace a resource from an inline JSON payload.
    Put {
        endpoint: String,

        #[arg(long)]
        data: String,
    },

    /// Partially update a resource from an inline JSON payload.
    Patch {
        endpoint: String,

        #[arg(long)]
        data: String,
    },

    /// Delete a resource.
    Delete { endpoint: String },

    /// Summarize the gateway node and its health counters.
    Status,
}
