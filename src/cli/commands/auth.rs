use clap::Subcommand;
use reqwest::Method;
use serde_json::{json, Value};

use crate::cli::client::ApiClient;
use crate::cli::utils::output_success;
use crate::cli::OutputFormat;

#[derive(Subcommand)]
pub enum AuthCommands {
    #[command(about = "Exchange the admin password for a session token")]
    Login {
        #[arg(long, env = "LOCKER_ADMIN_PASSWORD", hide_env_values = true, help = "Admin password")]
        password: String,
    },

    #[command(about = "Check whether the configured admin credential is accepted")]
    Verify,
}

pub async fn handle(cmd: AuthCommands, client: &ApiClient, output_format: OutputFormat) -> anyhow::Result<()> {
    match cmd {
        AuthCommands::Login { password } => {
            let req = client.request(Method::POST, "/auth/login", &[])?;
            let data = client.send(req.json(&json!({ "password": password }))).await?;
            match output_format {
                OutputFormat::Json => output_success(output_format, "", data),
                OutputFormat::Text => {
                    let token = data.get("token").and_then(Value::as_str).unwrap_or_default();
                    let expires_in = data.get("expiresIn").and_then(Value::as_u64).unwrap_or(0);
                    println!("✓ Logged in (token expires in {}s)", expires_in);
                    println!("export LOCKER_SESSION_TOKEN={}", token);
                    Ok(())
                }
            }
        }
        AuthCommands::Verify => {
            let req = client.with_admin(client.request(Method::GET, "/auth/verify", &[])?)?;
            let data = client.send(req).await?;
            let authenticated = data.get("authenticated").and_then(Value::as_bool).unwrap_or(false);
            if output_format == OutputFormat::Text && !authenticated {
                anyhow::bail!("admin credential rejected");
            }
            output_success(output_format, "Admin credential accepted", data)
        }
    }
}
