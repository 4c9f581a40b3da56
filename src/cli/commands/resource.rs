use clap::Subcommand;
use reqwest::Method;

use super::FilterArgs;
use crate::cli::client::ApiClient;
use crate::cli::utils::{output_document, output_list, output_success, read_stdin_json};
use crate::cli::OutputFormat;

#[derive(Subcommand)]
pub enum ResourceCommands {
    #[command(about = "List public resources, newest first")]
    List {
        #[command(flatten)]
        filter: FilterArgs,
    },

    #[command(about = "Show one resource")]
    Get {
        #[arg(help = "Resource id")]
        id: String,
    },

    #[command(about = "Create a resource from JSON on stdin (admin)")]
    Create,

    #[command(about = "Update a resource from JSON on stdin (admin)")]
    Update {
        #[arg(help = "Resource id")]
        id: String,
    },

    #[command(about = "Delete a resource (admin)")]
    Delete {
        #[arg(help = "Resource id")]
        id: String,
    },
}

pub async fn handle(cmd: ResourceCommands, client: &ApiClient, output_format: OutputFormat) -> anyhow::Result<()> {
    match cmd {
        ResourceCommands::List { filter } => {
            let req = client.request(Method::GET, "/resources", &filter.to_query())?;
            let data = client.send(req).await?;
            output_list(output_format, &data, "No resources found")
        }
        ResourceCommands::Get { id } => {
            let req = client.request(Method::GET, "/resources", &[("id", id.as_str())])?;
            let data = client.send(req).await?;
            output_document(output_format, &data)
        }
        ResourceCommands::Create => {
            let body = read_stdin_json()?;
            let req = client.with_admin(client.request(Method::POST, "/resources", &[])?)?;
            let data = client.send(req.json(&body)).await?;
            let id = data.get("id").and_then(|v| v.as_str()).unwrap_or_default().to_string();
            output_success(output_format, &format!("Created resource {}", id), data)
        }
        ResourceCommands::Update { id } => {
            let body = read_stdin_json()?;
            let req = client.with_admin(client.request(Method::PUT, "/resources", &[("id", id.as_str())])?)?;
            let data = client.send(req.json(&body)).await?;
            output_success(output_format, &format!("Updated resource {}", id), data)
        }
        ResourceCommands::Delete { id } => {
            let req = client.with_admin(client.request(Method::DELETE, "/resources", &[("id", id.as_str())])?)?;
            let data = client.send(req).await?;
            output_success(output_format, &format!("Deleted resource {}", id), data)
        }
    }
}
