//! Bazaar CLI - Browse the catalog and manage an account from the terminal.
//!
//! # Usage
//!
//! ```bash
//! # List products, filtered and sorted
//! bazaar products --keyword shirt --category Clothing --desc --page 2
//!
//! # List categories
//! bazaar categories
//!
//! # Sign in (the token is saved for later commands)
//! BAZAAR_PASSWORD=secret bazaar login -u user1
//!
//! # Saved addresses and order history
//! bazaar addresses
//! bazaar orders
//!
//! # Sign out
//! bazaar logout
//! ```
//!
//! # Environment Variables
//!
//! - `BAZAAR_API_URL` - Backend base URL
//! - `BAZAAR_CREDENTIAL_PATH` - Where the login token is stored
//! - `BAZAAR_LOG_FORMAT` - `pretty` or `json`

#![cfg_attr(not(test), forbid(unsafe_code))]

use bazaar_storefront::{Storefront, StorefrontConfig, telemetry};
use clap::{Parser, Subcommand};

mod commands;

use commands::CliError;

#[derive(Parser)]
#[command(name = "bazaar")]
#[command(author, version, about = "Bazaar storefront CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List a page of products
    Products {
        /// Search keyword
        #[arg(short, long)]
        keyword: Option<String>,

        /// Category name (`all` for every category)
        #[arg(short, long)]
        category: Option<String>,

        /// Sort by price, highest first
        #[arg(long)]
        desc: bool,

        /// One-based page number
        #[arg(short, long, default_value_t = 1)]
        page: u32,
    },
    /// List product categories
    Categories,
    /// Sign in and save the token
    Login {
        /// Account user name
        #[arg(short, long)]
        username: String,

        /// Account password
        #[arg(short, long, env = "BAZAAR_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Sign out and forget the saved token
    Logout,
    /// List saved addresses
    Addresses,
    /// List past orders
    Orders,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match StorefrontConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            // No subscriber yet
            telemetry::init_tracing(telemetry::LogFormat::default());
            tracing::error!("Configuration error: {e}");
            std::process::exit(2);
        }
    };

    let _sentry_guard = telemetry::init(&config.telemetry);

    if let Err(e) = run(cli, &config).await {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli, config: &StorefrontConfig) -> Result<(), CliError> {
    let mut storefront = Storefront::from_config(config)?;

    let result = match cli.command {
        Commands::Products {
            keyword,
            category,
            desc,
            page,
        } => {
            let filters = commands::catalog::Filters {
                keyword,
                category,
                desc,
                page,
            };
            commands::catalog::products(&mut storefront, &filters).await
        }
        Commands::Categories => commands::catalog::categories(&mut storefront).await,
        Commands::Login { username, password } => {
            commands::account::login(&mut storefront, &username, &password).await
        }
        Commands::Logout => {
            commands::account::logout(&mut storefront).await;
            Ok(())
        }
        Commands::Addresses => commands::account::addresses(&mut storefront).await,
        Commands::Orders => commands::account::orders(&mut storefront).await,
    };

    commands::print_notices(&mut storefront);
    result
}
