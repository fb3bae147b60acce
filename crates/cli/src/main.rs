//! Bob's Machine Parts CLI - catalog and cart tools against the record store.
//!
//! # Usage
//!
//! ```bash
//! # Browse the catalog
//! parts-cli products list --search bolt --category Fasteners
//! parts-cli products show 3
//! parts-cli products categories
//!
//! # Work with the shared cart
//! parts-cli cart add 3 -q 2
//! parts-cli cart set 3 5
//! parts-cli cart remove 3
//! parts-cli cart show
//! parts-cli cart clear
//!
//! # Price the current cart
//! parts-cli checkout quote --province Ontario
//! ```
//!
//! # Environment Variables
//!
//! - `STORE_API_URL` - REST backend (default: <http://localhost:3001>)

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::io::Write;

use clap::{Parser, Subcommand};

use parts_store_core::ProductId;
use parts_store_core::catalog::ProductFilter;
use parts_store_storefront::config::DEFAULT_STORE_API_URL;

mod commands;

#[derive(Parser)]
#[command(name = "parts-cli")]
#[command(author, version, about = "Bob's Machine Parts CLI tools")]
struct Cli {
    /// Record store base URL
    #[arg(long, global = true, env = "STORE_API_URL", default_value = DEFAULT_STORE_API_URL)]
    api_url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Browse the product catalog
    Products {
        #[command(subcommand)]
        action: ProductsAction,
    },
    /// Inspect and change the cart
    Cart {
        #[command(subcommand)]
        action: CartAction,
    },
    /// Checkout calculations
    Checkout {
        #[command(subcommand)]
        action: CheckoutAction,
    },
}

#[derive(Subcommand)]
enum ProductsAction {
    /// List products, optionally filtered
    List {
        /// Case-insensitive name search
        #[arg(short, long, default_value = "")]
        search: String,

        /// Exact category
        #[arg(short, long)]
        category: Option<String>,
    },
    /// Show one product
    Show {
        /// Product ID
        id: ProductId,
    },
    /// List the categories present in the catalog
    Categories,
}

#[derive(Subcommand)]
enum CartAction {
    /// Show cart lines and total
    Show,
    /// Add a product, merging into an existing line
    Add {
        /// Product ID
        id: ProductId,

        /// Quantity to add
        #[arg(short, long, default_value_t = 1)]
        quantity: u32,
    },
    /// Set a line's quantity
    Set {
        /// Product ID
        id: ProductId,

        /// New quantity (at least 1)
        quantity: u32,
    },
    /// Remove a line
    Remove {
        /// Product ID
        id: ProductId,
    },
    /// Remove every line
    Clear,
}

#[derive(Subcommand)]
enum CheckoutAction {
    /// Price the current cart for a province
    Quote {
        /// Province (Ontario, Quebec, British Columbia, Alberta)
        #[arg(short, long)]
        province: Option<String>,
    },
}

#[tokio::main]
async fn main() {
    // Load .env before clap reads STORE_API_URL
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    let result: Result<String, Box<dyn std::error::Error>> = run(cli).await;

    match result {
        Ok(output) => {
            let mut stdout = std::io::stdout().lock();
            if let Err(e) = writeln!(stdout, "{output}") {
                tracing::error!("Failed to write output: {e}");
                std::process::exit(1);
            }
        }
        Err(e) => {
            tracing::error!("Command failed: {e}");
            std::process::exit(1);
        }
    }
}

async fn run(cli: Cli) -> Result<String, Box<dyn std::error::Error>> {
    let client = commands::connect(&cli.api_url)?;

    let output = match cli.command {
        Commands::Products { action } => match action {
            ProductsAction::List { search, category } => {
                commands::products::list(&client, &ProductFilter::new(search, category)).await?
            }
            ProductsAction::Show { id } => commands::products::show(&client, id).await?,
            ProductsAction::Categories => commands::products::categories(&client).await?,
        },
        Commands::Cart { action } => match action {
            CartAction::Show => commands::cart::show(&client).await?,
            CartAction::Add { id, quantity } => {
                commands::cart::add(&client, id, quantity).await?
            }
            CartAction::Set { id, quantity } => {
                commands::cart::set(&client, id, quantity).await?
            }
            CartAction::Remove { id } => commands::cart::remove(&client, id).await?,
            CartAction::Clear => commands::cart::clear(&client).await?,
        },
        Commands::Checkout { action } => match action {
            CheckoutAction::Quote { province } => {
                commands::checkout::quote(&client, province.as_deref()).await?
            }
        },
    };
    Ok(output)
}
