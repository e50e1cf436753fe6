//! Configuration management commands.

use std::fs;

use anyhow::{bail, Result};

use super::{ConfigArgs, ConfigCommand};
use crate::config::generate_default_config;
use crate::context::Context;

/// Run the config command.
pub async fn run(args: ConfigArgs, ctx: &Context) -> Result<()> {
    match args.command {
        ConfigCommand::Show => show_config(ctx),
        ConfigCommand::Init { force } => init_config(force, ctx),
        ConfigCommand::Validate => validate_config(ctx),
    }
}

fn show_config(ctx: &Context) -> Result<()> {
    if ctx.output.is_json() {
        ctx.output.json(&ctx.config);
        return Ok(());
    }

    ctx.output.header("Current Configuration");

    ctx.output.info("[storage]");
    ctx.output.kv("data_dir", &ctx.config.storage.data_dir);
    ctx.output.kv("resolved", &ctx.data_dir().display().to_string());
    ctx.output.kv("key", &ctx.config.storage.key);

    ctx.output.info("[output]");
    ctx.output.kv("json", &ctx.config.output.json.to_string());

    Ok(())
}

fn init_config(force: bool, ctx: &Context) -> Result<()> {
    let config_path = ctx.cwd.join("gomarket.toml");

    if config_path.exists() && !force {
        bail!(
            "Config file already exists: {}. Use --force to overwrite.",
            config_path.display()
        );
    }

    fs::write(&config_path, generate_default_config())?;

    ctx.output.success(&format!("Created: {}", config_path.display()));

    Ok(())
}

fn validate_config(ctx: &Context) -> Result<()> {
    ctx.output.header("Validating configuration");

    let mut errors: Vec<String> = Vec::new();

    if ctx.config.storage.key.is_empty() {
        errors.push("storage.key must not be empty".to_string());
    }

    if ctx.config.storage.data_dir.is_empty() {
        errors.push("storage.data_dir must not be empty".to_string());
    }

    let data_dir = ctx.data_dir();
    if data_dir.exists() && !data_dir.is_dir() {
        errors.push(format!(
            "storage.data_dir '{}' is not a directory",
            data_dir.display()
        ));
    }

    if errors.is_empty() {
        ctx.output.success("Configuration is valid");
        return Ok(());
    }

    for error in &errors {
        ctx.output.error(&format!("Error: {}", error));
    }

    bail!("Configuration has {} error(s)", errors.len());
}
