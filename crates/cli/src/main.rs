//! Darccuir CLI - database migrations and management tools.
//!
//! # Usage
//!
//! ```bash
//! # Apply the SQL migrations in migrations/
//! darccuir-cli migrate
//!
//! # Create an admin user
//! darccuir-cli admin create -e admin@darccuir.com.ar -p 'secreto' -f Ana -l Pérez
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "darccuir-cli")]
#[command(author, version, about = "Darccuir CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run database migrations
    Migrate,
    /// Manage admin users
    Admin {
        #[command(subcommand)]
        action: AdminAction,
    },
}

#[derive(Subcommand)]
enum AdminAction {
    /// Create a new admin user
    Create {
        /// Admin email address
        #[arg(short, long)]
        email: String,

        /// Admin password
        #[arg(short, long)]
        password: String,

        /// First name
        #[arg(short, long)]
        first_name: String,

        /// Last name
        #[arg(short, long)]
        last_name: String,
    },
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Migrate => commands::migrate::run().await?,
        Commands::Admin { action } => match action {
            AdminAction::Create {
                email,
                password,
                first_name,
                last_name,
            } => {
                commands::admin::create_user(&email, &password, &first_name, &last_name).await?;
            }
        },
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_definition() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_admin_create() {
        let cli = Cli::try_parse_from([
            "darccuir-cli",
            "admin",
            "create",
            "-e",
            "admin@darccuir.com.ar",
            "-p",
            "secreto",
            "-f",
            "Ana",
            "-l",
            "Pérez",
        ])
        .unwrap();

        let Commands::Admin {
            action: AdminAction::Create { email, last_name, .. },
        } = cli.command
        else {
            panic!("expected admin create");
        };
        assert_eq!(email, "admin@darccuir.com.ar");
        assert_eq!(last_name, "Pérez");
    }
}
