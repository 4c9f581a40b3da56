use clap::Subcommand;
use reqwest::Method;
use serde_json::{json, Map, Value};

use crate::cli::client::ApiClient;
use crate::cli::utils::{output_document, output_list, output_success};
use crate::cli::OutputFormat;

#[derive(Subcommand)]
pub enum LockerCommands {
    #[command(about = "List lockers (names only)")]
    List,

    #[command(about = "Create a locker")]
    Create {
        #[arg(help = "Locker name")]
        name: String,
        #[arg(long, env = "LOCKER_PASSWORD", hide_env_values = true, help = "Locker password")]
        password: String,
    },

    #[command(about = "Check a locker password and show the locker")]
    Open {
        #[arg(help = "Locker id")]
        id: String,
        #[arg(long, env = "LOCKER_PASSWORD", hide_env_values = true, help = "Locker password")]
        password: String,
    },

    #[command(about = "Rename a locker or change its password")]
    Update {
        #[arg(help = "Locker id")]
        id: String,
        #[arg(long, env = "LOCKER_PASSWORD", hide_env_values = true, help = "Current locker password")]
        password: String,
        #[arg(long, help = "New locker name")]
        name: Option<String>,
        #[arg(long, help = "New locker password")]
        new_password: Option<String>,
    },

    #[command(about = "Delete a locker and every resource inside it")]
    Delete {
        #[arg(help = "Locker id")]
        id: String,
        #[arg(long, env = "LOCKER_PASSWORD", hide_env_values = true, help = "Locker password")]
        password: String,
    },
}

pub async fn handle(cmd: LockerCommands, client: &ApiClient, output_format: OutputFormat) -> anyhow::Result<()> {
    match cmd {
        LockerCommands::List => {
            let data = client.send(client.request(Method::GET, "/lockers", &[])?).await?;
            output_list(output_format, &data, "No lockers found")
        }
        LockerCommands::Create { name, password } => {
            let req = client.request(Method::POST, "/lockers", &[])?;
            let data = client
                .send(req.json(&json!({ "name": &name, "password": &password })))
                .await?;
            let id = data.get("id").and_then(Value::as_str).unwrap_or_default().to_string();
            output_success(output_format, &format!("Created locker {} ({})", name, id), data)
        }
        LockerCommands::Open { id, password } => {
            let req = client.request(Method::GET, "/lockers", &[("id", id.as_str())])?;
            let data = client.send(ApiClient::with_locker_password(req, &password)).await?;
            output_document(output_format, &data)
        }
        LockerCommands::Update { id, password, name, new_password } => {
            if name.is_none() && new_password.is_none() {
                anyhow::bail!("nothing to update: pass --name and/or --new-password");
            }
            let mut patch = Map::new();
            if let Some(name) = name {
                patch.insert("name".to_string(), Value::String(name));
            }
            if let Some(new_password) = new_password {
                patch.insert("newPassword".to_string(), Value::String(new_password));
            }
            let req = client.request(Method::PUT, "/lockers", &[("id", id.as_str())])?;
            let data = client
                .send(ApiClient::with_locker_password(req, &password).json(&Value::Object(patch)))
                .await?;
            output_success(output_format, &format!("Updated locker {}", id), data)
        }
        LockerCommands::Delete { id, password } => {
            let req = client.request(Method::DELETE, "/lockers", &[("id", id.as_str())])?;
            let data = client.send(ApiClient::with_locker_password(req, &password)).await?;
            let removed = data.get("resourcesDeleted").and_then(Value::as_u64).unwrap_or(0);
            output_success(
                output_format,
                &format!("Deleted locker {} and {} private resource(s)", id, removed),
                data,
            )
        }
    }
}
