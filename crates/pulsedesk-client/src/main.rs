//! Command-line entry point for the Pulsedesk dashboard client

use chrono::Utc;
use clap::{Parser, Subcommand};
use pulsedesk_client::{ApiClient, Dashboard, FileSessionStore};
use pulsedesk_core::{init_logging, Config, Error, Result};
use tracing::info;

/// Pulsedesk customer-success dashboard client
#[derive(Debug, Parser)]
#[command(name = "pulsedesk", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Log in and persist a session
    Login {
        /// Account email
        #[arg(long)]
        email: String,

        /// Account password
        #[arg(long, env = "PULSEDESK_PASSWORD", hide_env_values = true)]
        password: String,
    },

    /// Show the logged-in user
    Whoami,

    /// List customers
    Customers,

    /// Print the derived metrics summary for one customer as JSON
    Summary {
        /// Customer id
        customer_id: String,
    },

    /// Log out, destroying the persisted session
    Logout,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env if present, for development convenience
    let _ = dotenvy::dotenv();

    let config = Config::load().unwrap_or_else(|_| Config::default());
    init_logging(&config.logging.level, &config.logging.format);

    let cli = Cli::parse();

    let client = ApiClient::new(config.api.base_url.clone(), config.api.timeout_secs)?;
    let store = FileSessionStore::new(config.session.store_path.clone());
    let mut dashboard = Dashboard::new(client, store)?;

    match cli.command {
        Command::Login { email, password } => {
            let user = dashboard.login(&email, &password).await?;
            println!("Logged in as {} ({})", user.name, user.role);
        }
        Command::Whoami => {
            require_session(&dashboard)?;
            let user = dashboard.me().await?;
            println!("{}", serde_json::to_string_pretty(&user)?);
        }
        Command::Customers => {
            require_session(&dashboard)?;
            let customers = dashboard.customers().await?;
            for customer in &customers {
                println!(
                    "{}\t{}\t{:.1}",
                    customer.id, customer.name, customer.health_score
                );
            }
            info!(count = customers.len(), "Listed customers");
        }
        Command::Summary { customer_id } => {
            require_session(&dashboard)?;
            let summary = dashboard.customer_summary(&customer_id, Utc::now()).await?;
            println!("{}", serde_json::to_string_pretty(&summary)?);
        }
        Command::Logout => {
            use pulsedesk_client::SessionStore;
            dashboard.sessions().clear()?;
            println!("Logged out");
        }
    }

    Ok(())
}

fn require_session<S: pulsedesk_client::SessionStore>(dashboard: &Dashboard<S>) -> Result<()> {
    if dashboard.is_authenticated() {
        Ok(())
    } else {
        Err(Error::Session(
            "Not logged in; run `pulsedesk login` first".to_string(),
        ))
    }
}
