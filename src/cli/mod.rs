pub mod client;
pub mod commands;
pub mod utils;

use clap::{Parser, Subcommand};

use client::ApiClient;

#[derive(Parser)]
#[command(name = "locker")]
#[command(about = "Locker CLI - command-line client for the Study Locker API")]
#[command(version)]
pub struct Cli {
    #[arg(long, global = true, env = "LOCKER_API_URL", default_value = "http://localhost:3000", help = "API base URL")]
    pub server: String,

    #[arg(long, global = true, help = "Output in JSON format")]
    pub json: bool,

    #[arg(short, long, global = true, env = "LOCKER_VERBOSE", help = "Show the full error chain on failure")]
    pub verbose: bool,

    #[arg(long, global = true, env = "LOCKER_ADMIN_PASSWORD", hide_env_values = true, help = "Admin password for resource mutations")]
    pub admin_password: Option<String>,

    #[arg(long, global = true, env = "LOCKER_SESSION_TOKEN", hide_env_values = true, help = "Admin session token from `auth login`")]
    pub session_token: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Public study resources")]
    Resource {
        #[command(subcommand)]
        cmd: commands::resource::ResourceCommands,
    },

    #[command(about = "Password-protected lockers")]
    Locker {
        #[command(subcommand)]
        cmd: commands::locker::LockerCommands,
    },

    #[command(about = "Resources inside a locker")]
    Private {
        #[command(subcommand)]
        cmd: commands::private::PrivateCommands,
    },

    #[command(about = "Admin sessions")]
    Auth {
        #[command(subcommand)]
        cmd: commands::auth::AuthCommands,
    },

    #[command(about = "Server status")]
    Server {
        #[command(subcommand)]
        cmd: commands::server::ServerCommands,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
}

impl OutputFormat {
    pub fn from_cli(cli: &Cli) -> Self {
        if cli.json {
            OutputFormat::Json
        } else {
            OutputFormat::Text
        }
    }
}

pub async fn run(cli: Cli) -> anyhow::Result<()> {
    let output_format = OutputFormat::from_cli(&cli);
    let client = ApiClient::new(&cli.server, cli.admin_password, cli.session_token)?;

    match cli.command {
        Commands::Resource { cmd } => commands::resource::handle(cmd, &client, output_format).await,
        Commands::Locker { cmd } => commands::locker::handle(cmd, &client, output_format).await,
        Commands::Private { cmd } => commands::private::handle(cmd, &client, output_format).await,
        Commands::Auth { cmd } => commands::auth::handle(cmd, &client, output_format).await,
        Commands::Server { cmd } => commands::server::handle(cmd, &client, output_format).await,
    }
}
