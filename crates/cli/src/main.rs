//! Shopfront CLI - Drive a durable cart from the command line.
//!
//! # Usage
//!
//! ```bash
//! # Add two medium tees
//! cart add 1 --name "Tee" --price 10.00 --size M --quantity 2
//!
//! # Change the quantity of that line
//! cart update 1 3 --size M
//!
//! # Show lines and totals
//! cart show
//!
//! # Print the order payload and empty the cart
//! cart checkout
//! ```
//!
//! # Commands
//!
//! - `add` / `remove` / `update` / `clear` - Mutate the cart
//! - `show` / `recent` - Inspect the cart
//! - `checkout` - Emit the order payload as JSON and clear the cart
//!
//! The cart lives under `CART_DATA_DIR` (default `.shopfront`) in the slot
//! named by `CART_STORAGE_KEY` (default `cart-storage`).

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Args, Parser, Subcommand};
use rust_decimal::Decimal;
use shopfront_cart::{CartConfig, CartStore};
use shopfront_core::{LineKey, NewLineItem, ProductId};

mod commands;

#[derive(Parser)]
#[command(name = "cart")]
#[command(author, version, about = "Shopfront cart tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Variant selectors shared by every line-addressing command.
#[derive(Args, Debug, Clone)]
struct Variant {
    /// Size variant
    #[arg(short, long)]
    size: Option<String>,

    /// Color variant
    #[arg(short, long)]
    color: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Add an item, merging with an existing line of the same variant
    Add {
        /// Product id (integers are treated as numeric ids)
        id: String,

        /// Display name
        #[arg(short, long)]
        name: String,

        /// Unit price
        #[arg(short, long)]
        price: Decimal,

        /// Quantity to add (default 1)
        #[arg(short, long)]
        quantity: Option<u32>,

        /// Stock-keeping unit
        #[arg(long, default_value = "")]
        sku: String,

        /// Image URL
        #[arg(long)]
        image: Option<String>,

        #[command(flatten)]
        variant: Variant,
    },
    /// Remove a line
    Remove {
        id: String,

        #[command(flatten)]
        variant: Variant,
    },
    /// Set the quantity of a line
    Update {
        id: String,

        /// New quantity (must be at least 1)
        quantity: u32,

        #[command(flatten)]
        variant: Variant,
    },
    /// Remove every line
    Clear,
    /// List lines and totals
    Show,
    /// List recently added lines
    Recent {
        /// Number of entries to show
        #[arg(short = 'n', long, default_value_t = 3)]
        count: usize,
    },
    /// Print the order payload as JSON and clear the cart
    Checkout,
}

impl Variant {
    fn key(&self, id: &str) -> LineKey {
        LineKey {
            id: ProductId::parse_lenient(id),
            size: self.size.clone(),
            color: self.color.clone(),
        }
    }
}

fn init_tracing() {
    // Defaults to info level for our crates if RUST_LOG is not set
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "shopfront_cart=info,shopfront_cli=info".into());

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    init_tracing();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli);

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let config = CartConfig::from_env()?;
    let mut store = CartStore::open(config.storage(), config.storage_key.clone());

    match cli.command {
        Commands::Add {
            id,
            name,
            price,
            quantity,
            sku,
            image,
            variant,
        } => {
            let mut input = NewLineItem::new(ProductId::parse_lenient(&id), name, price)
                .with_sku(sku);
            input.quantity = quantity;
            input.image = image;
            input.size = variant.size;
            input.color = variant.color;
            commands::cart::add(&mut store, input, config.currency)?;
        }
        Commands::Remove { id, variant } => {
            commands::cart::remove(&mut store, &variant.key(&id));
        }
        Commands::Update {
            id,
            quantity,
            variant,
        } => {
            commands::cart::update(&mut store, &variant.key(&id), quantity)?;
        }
        Commands::Clear => commands::cart::clear(&mut store),
        Commands::Show => commands::cart::show(&store, config.currency),
        Commands::Recent { count } => commands::cart::recent(&store, count),
        Commands::Checkout => commands::checkout::run(&mut store, config.currency)?,
    }
    Ok(())
}
