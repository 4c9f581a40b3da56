use clap::Subcommand;
use reqwest::Method;
use serde_json::Value;

use crate::cli::client::ApiClient;
use crate::cli::utils::{output_document, output_success};
use crate::cli::OutputFormat;

#[derive(Subcommand)]
pub enum ServerCommands {
    #[command(about = "Check server and storage health")]
    Health,

    #[command(about = "Show server name and version")]
    Info,
}

pub async fn handle(cmd: ServerCommands, client: &ApiClient, output_format: OutputFormat) -> anyhow::Result<()> {
    match cmd {
        ServerCommands::Health => {
            let data = client.send(client.request(Method::GET, "/health", &[])?).await?;
            let status = data.get("status").and_then(Value::as_str).unwrap_or("unknown").to_string();
            output_success(output_format, &format!("Server is {}", status), data)
        }
        ServerCommands::Info => {
            let data = client.send(client.request(Method::GET, "/", &[])?).await?;
            output_document(output_format, &data)
        }
    }
}
