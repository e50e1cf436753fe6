//! GoMarketplace CLI - inspect and edit the device-local cart.
//!
//! Commands:
//! - `gomarket list` - Show the cart
//! - `gomarket add` - Add a product (or bump its quantity)
//! - `gomarket increment` - Raise a product's quantity
//! - `gomarket decrement` - Lower a product's quantity
//! - `gomarket clear` - Wipe the stored cart
//! - `gomarket config` - Manage configuration

mod commands;
mod config;
mod context;
mod output;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use commands::{AddArgs, ClearArgs, ConfigArgs, QuantityArgs};

/// GoMarketplace CLI - inspect and edit the device-local cart
#[derive(Parser)]
#[command(name = "gomarket")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Use JSON output format
    #[arg(long, global = true)]
    json: bool,

    /// Config file path
    #[arg(short, long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the cart
    List,

    /// Add a product to the cart
    Add(AddArgs),

    /// Raise a product's quantity
    Increment(QuantityArgs),

    /// Lower a product's quantity
    Decrement(QuantityArgs),

    /// Wipe the stored cart
    Clear(ClearArgs),

    /// Manage configuration
    Config(ConfigArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_tracing(cli.verbose);

    // Setup output formatting
    let output = output::Output::new(cli.verbose, cli.json);

    // Load config
    let config_path = cli.config.as_deref();
    let ctx = context::Context::load(config_path, output)?;

    // Execute command
    let result = match cli.command {
        Commands::List => commands::cart::list(&ctx).await,
        Commands::Add(args) => commands::cart::add(args, &ctx).await,
        Commands::Increment(args) => commands::cart::increment(args, &ctx).await,
        Commands::Decrement(args) => commands::cart::decrement(args, &ctx).await,
        Commands::Clear(args) => commands::cart::clear(args, &ctx).await,
        Commands::Config(args) => commands::config::run(args, &ctx).await,
    };

    if let Err(e) = result {
        ctx.output.error(&format!("{:#}", e));
        std::process::exit(1);
    }

    Ok(())
}

/// Log to stderr; `RUST_LOG` overrides the default level.
fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
