//! CLI configuration.

use anyhow::{Context, Result};
use gomarket_cart::{CartOptions, DEFAULT_STORAGE_KEY};
use serde::{Deserialize, Serialize};

/// File names searched for, in order, when no `--config` is given.
pub const CONFIG_NAMES: [&str; 3] = ["gomarket.toml", ".gomarket.toml", "gomarket.json"];

/// CLI configuration file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CliConfig {
    /// Storage configuration.
    #[serde(default)]
    pub storage: StorageConfig,

    /// Output configuration.
    #[serde(default)]
    pub output: OutputConfig,
}

impl CliConfig {
    /// Load config from a file.
    pub fn load(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path))?;

        Self::parse(path, &content)
    }

    /// Parse config text; `path` decides between JSON and TOML.
    pub fn parse(path: &str, content: &str) -> Result<Self> {
        if path.ends_with(".json") {
            serde_json::from_str(content)
                .with_context(|| format!("Failed to parse JSON config: {}", path))
        } else {
            toml::from_str(content)
                .with_context(|| format!("Failed to parse TOML config: {}", path))
        }
    }

    /// Cart options derived from this config.
    pub fn cart_options(&self) -> CartOptions {
        CartOptions::default().with_storage_key(self.storage.key.clone())
    }
}

/// Where the cart is stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Directory holding stored values, relative to the working directory.
    #[serde(default = "default_data_dir")]
    pub data_dir: String,

    /// Storage key of the cart.
    #[serde(default = "default_key")]
    pub key: String,
}

fn default_data_dir() -> String {
    ".gomarket".to_string()
}

fn default_key() -> String {
    DEFAULT_STORAGE_KEY.to_string()
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            key: default_key(),
        }
    }
}

/// Output configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Print JSON instead of styled text.
    #[serde(default)]
    pub json: bool,
}

/// Generate a default gomarket.toml config file.
pub fn generate_default_config() -> String {
    format!(
        r#"# GoMarketplace cart configuration

[storage]
data_dir = "{data_dir}"
key = "{key}"

[output]
json = false
"#,
        data_dir = default_data_dir(),
        key = default_key(),
    )
}
