//! CLI command implementations.

pub mod cart;
pub mod config;

use clap::{Args, Subcommand};

/// Arguments for the add command.
#[derive(Args)]
pub struct AddArgs {
    /// Product ID.
    pub id: String,

    /// Product title.
    #[arg(short, long)]
    pub title: String,

    /// Product image URL.
    #[arg(short, long, default_value = "")]
    pub image_url: String,

    /// Unit price.
    #[arg(short, long, value_parser = parse_price)]
    pub price: f64,
}

/// Parse a unit price; `NaN` and the infinities are refused.
fn parse_price(s: &str) -> Result<f64, String> {
    let price: f64 = s.parse().map_err(|e| format!("{}", e))?;
    if price.is_finite() {
        Ok(price)
    } else {
        Err(format!("price must be a finite number, got {}", s))
    }
}

/// Arguments for the increment and decrement commands.
#[derive(Args)]
pub struct QuantityArgs {
    /// Product ID.
    pub id: String,

    /// Apply the change this many times.
    #[arg(short = 'n', long, default_value = "1")]
    pub times: u32,
}

/// Arguments for the clear command.
#[derive(Args)]
pub struct ClearArgs {
    /// Skip confirmation.
    #[arg(short, long)]
    pub yes: bool,
}

/// Arguments for the config command.
#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration.
    Show,
    /// Initialize a new config file.
    Init {
        /// Force overwrite existing config.
        #[arg(short, long)]
        force: bool,
    },
    /// Validate the config file.
    Validate,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_price() {
        assert_eq!(parse_price("10"), Ok(10.0));
        assert_eq!(parse_price("-0.5"), Ok(-0.5));
        assert!(parse_price("ten").is_err());
    }

    #[test]
    fn test_parse_price_refuses_non_finite() {
        for input in ["NaN", "nan", "inf", "-inf", "infinity"] {
            assert!(parse_price(input).is_err(), "{} was accepted", input);
        }
    }
}
