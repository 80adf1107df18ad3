//! GoMarketplace CLI - cart inspection and mutation tool.
//!
//! # Usage
//!
//! ```bash
//! # Show the current cart
//! gomarket-cli show
//!
//! # Add a product (grows quantity if already in the cart)
//! gomarket-cli add -i sku-1234 -t "Espresso Cup" -u https://cdn.example.com/cup.png -p 12.50
//!
//! # Change quantities
//! gomarket-cli increment sku-1234
//! gomarket-cli decrement sku-1234
//! ```
//!
//! The persisted cart location comes from `CART_STORAGE_DIR` /
//! `CART_STORAGE_KEY` (see the cart crate's config module), or from the
//! `--dir` flag, which overrides the environment.

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use rust_decimal::Decimal;

mod commands;

#[derive(Parser)]
#[command(name = "gomarket-cli")]
#[command(author, version, about = "GoMarketplace cart tools")]
struct Cli {
    /// Directory holding the persisted cart (overrides CART_STORAGE_DIR)
    #[arg(long, global = true)]
    dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the current cart
    Show,
    /// Add a product to the cart
    Add {
        /// Product id (SKU)
        #[arg(short, long)]
        id: String,

        /// Product title
        #[arg(short, long)]
        title: String,

        /// Product image URL
        #[arg(short = 'u', long)]
        image_url: String,

        /// Unit price, e.g. 12.50
        #[arg(short, long)]
        price: Decimal,
    },
    /// Increase the quantity of a line item by one
    Increment {
        /// Product id (SKU)
        id: String,
    },
    /// Decrease the quantity of a line item by one, removing it at quantity 1
    Decrement {
        /// Product id (SKU)
        id: String,
    },
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Show => commands::cart::show(cli.dir).await?,
        Commands::Add {
            id,
            title,
            image_url,
            price,
        } => commands::cart::add(cli.dir, &id, title, image_url, price).await?,
        Commands::Increment { id } => commands::cart::increment(cli.dir, &id).await?,
        Commands::Decrement { id } => commands::cart::decrement(cli.dir, &id).await?,
    }
    Ok(())
}
