use clap::Subcommand;
use reqwest::Method;

use super::FilterArgs;
use crate::cli::client::ApiClient;
use crate::cli::utils::{output_document, output_list, output_success, read_stdin_json};
use crate::cli::OutputFormat;

#[derive(Subcommand)]
pub enum PrivateCommands {
    #[command(about = "List the resources inside a locker")]
    List {
        #[arg(help = "Locker id")]
        locker_id: String,
        #[arg(long, env = "LOCKER_PASSWORD", hide_env_values = true, help = "Locker password")]
        password: String,
        #[command(flatten)]
        filter: FilterArgs,
    },

    #[command(about = "Show one private resource")]
    Get {
        #[arg(help = "Locker id")]
        locker_id: String,
        #[arg(help = "Resource id")]
        id: String,
        #[arg(long, env = "LOCKER_PASSWORD", hide_env_values = true, help = "Locker password")]
        password: String,
    },

    #[command(about = "Create a private resource from JSON on stdin")]
    Create {
        #[arg(help = "Locker id")]
        locker_id: String,
        #[arg(long, env = "LOCKER_PASSWORD", hide_env_values = true, help = "Locker password")]
        password: String,
    },

    #[command(about = "Update a private resource from JSON on stdin")]
    Update {
        #[arg(help = "Locker id")]
        locker_id: String,
        #[arg(help = "Resource id")]
        id: String,
        #[arg(long, env = "LOCKER_PASSWORD", hide_env_values = true, help = "Locker password")]
        password: String,
    },

    #[command(about = "Delete a private resource")]
    Delete {
        #[arg(help = "Locker id")]
        locker_id: String,
        #[arg(help = "Resource id")]
        id: String,
        #[arg(long, env = "LOCKER_PASSWORD", hide_env_values = true, help = "Locker password")]
        password: String,
    },
}

const PATH: &str = "/private-resources";

pub async fn handle(cmd: PrivateCommands, client: &ApiClient, output_format: OutputFormat) -> anyhow::Result<()> {
    match cmd {
        PrivateCommands::List { locker_id, password, filter } => {
            let mut query = vec![("lockerId", locker_id.as_str())];
            query.extend(filter.to_query());
            let req = client.request(Method::GET, PATH, &query)?;
            let data = client.send(ApiClient::with_locker_password(req, &password)).await?;
            output_list(output_format, &data, "Locker is empty")
        }
        PrivateCommands::Get { locker_id, id, password } => {
            let req = client.request(Method::GET, PATH, &[("lockerId", locker_id.as_str()), ("id", id.as_str())])?;
            let data = client.send(ApiClient::with_locker_password(req, &password)).await?;
            output_document(output_format, &data)
        }
        PrivateCommands::Create { locker_id, password } => {
            let body = read_stdin_json()?;
            let req = client.request(Method::POST, PATH, &[("lockerId", locker_id.as_str())])?;
            let data = client
                .send(ApiClient::with_locker_password(req, &password).json(&body))
                .await?;
            let id = data.get("id").and_then(|v| v.as_str()).unwrap_or_default().to_string();
            output_success(output_format, &format!("Created private resource {}", id), data)
        }
        PrivateCommands::Update { locker_id, id, password } => {
            let body = read_stdin_json()?;
            let req = client.request(Method::PUT, PATH, &[("lockerId", locker_id.as_str()), ("id", id.as_str())])?;
            let data = client
                .send(ApiClient::with_locker_password(req, &password).json(&body))
                .await?;
            output_success(output_format, &format!("Updated private resource {}", id), data)
        }
        PrivateCommands::Delete { locker_id, id, password } => {
            let req = client.request(Method::DELETE, PATH, &[("lockerId", locker_id.as_str()), ("id", id.as_str())])?;
            let data = client.send(ApiClient::with_locker_password(req, &password)).await?;
            output_success(output_format, &format!("Deleted private resource {}", id), data)
        }
    }
}
