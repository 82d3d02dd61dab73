//! `votes`: command-line access to the votes functions host.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde_json::Value;
use tracing::error;
use tracing_subscriber::EnvFilter;
use votes_core::{ApiClient, ClientConfig, NewUser, NewVote, UserId};

#[derive(Debug, Parser)]
#[command(name = "votes", version, about = "Create and list users and votes")]
struct Cli {
    /// Base URL of the functions host
    #[arg(long, env = "FUNCTIONS_BASE", global = true)]
    base_url: Option<String>,

    /// Access code appended as `?code=` to postUser and postVote
    #[arg(long, env = "FUNCTION_CODE", hide_env_values = true, global = true)]
    code: Option<String>,

    /// Log requests at debug level
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Register a user and print its id
    CreateUser {
        #[arg(long)]
        pseudo: String,
        #[arg(long)]
        email: String,
    },
    /// Record a vote and print the server's answer
    CreateVote {
        #[arg(long, value_parser = parse_user_id)]
        user_id: UserId,
        /// JSON value; anything that is not JSON is sent as a string
        #[arg(long, value_parser = parse_result)]
        result: Value,
    },
    /// List all votes
    Votes,
    /// List all users
    Users,
}

fn parse_user_id(raw: &str) -> Result<UserId, String> {
    Ok(match raw.parse::<u64>() {
        Ok(n) if n.to_string() == raw => UserId::from(n),
        _ => UserId::from(raw),
    })
}

fn parse_result(raw: &str) -> Result<Value, String> {
    Ok(serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string())))
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

async fn execute(cli: Cli) -> Result<Value> {
    let base_url = cli
        .base_url
        .context("no base URL: pass --base-url or set FUNCTIONS_BASE")?;
    let api = ApiClient::from_config(ClientConfig::new(&base_url, cli.code.as_deref()));

    let output = match cli.command {
        Command::CreateUser { pseudo, email } => {
            let id = api.create_user(&NewUser { pseudo, email }).await?;
            serde_json::to_value(id)?
        }
        Command::CreateVote { user_id, result } => {
            api.create_vote(&NewVote { user_id, result }).await?
        }
        Command::Votes => api.fetch_votes().await?,
        Command::Users => api.fetch_users().await?,
    };
    Ok(output)
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match execute(cli).await {
        Ok(output) => match serde_json::to_string_pretty(&output) {
            Ok(text) => println!("{text}"),
            Err(e) => {
                error!(error = %e, "could not render output");
                std::process::exit(1);
            }
        },
        Err(e) => {
            let message = format!("{e:#}");
            error!(error = %message, "command failed");
            std::process::exit(1);
        }
    }
}
