//! CLI execution context.

use std::path::{Path, PathBuf};

use anyhow::{Context as _, Result};
use gomarket_cart::CartProvider;
use gomarket_storage::FileStore;

use crate::config::{CliConfig, CONFIG_NAMES};
use crate::output::Output;

/// Execution context for CLI commands.
pub struct Context {
    /// CLI configuration.
    pub config: CliConfig,
    /// Output handler.
    pub output: Output,
    /// Working directory.
    pub cwd: PathBuf,
}

impl Context {
    /// Load context from config file.
    pub fn load(config_path: Option<&str>, output: Output) -> Result<Self> {
        let cwd = std::env::current_dir().context("Failed to get current directory")?;

        let config = if let Some(path) = config_path {
            CliConfig::load(path)?
        } else {
            // Try to find config in current directory or parent directories
            Self::find_config(&cwd).unwrap_or_default()
        };

        let json = output.is_json() || config.output.json;
        let output = output.with_json(json);

        Ok(Self { config, output, cwd })
    }

    /// Find config file in directory tree.
    fn find_config(start: &Path) -> Option<CliConfig> {
        let mut current = start.to_path_buf();
        loop {
            for name in &CONFIG_NAMES {
                let config_path = current.join(name);
                if config_path.exists() {
                    if let Ok(config) = CliConfig::load(config_path.to_str()?) {
                        return Some(config);
                    }
                }
            }

            if !current.pop() {
                break;
            }
        }

        None
    }

    /// Directory holding the stored cart.
    pub fn data_dir(&self) -> PathBuf {
        self.resolve_path(&self.config.storage.data_dir)
    }

    /// Open the file store and a loaded cart provider over it.
    pub async fn open_cart(&self) -> Result<CartProvider> {
        let dir = self.data_dir();
        let store = FileStore::open(&dir)
            .await
            .with_context(|| format!("Failed to open cart storage: {}", dir.display()))?;

        let provider = CartProvider::new(store, self.config.cart_options())?;
        let outcome = provider.load().await;
        self.output.debug(&format!("Loaded cart: {:?}", outcome));
        Ok(provider)
    }

    /// Resolve a path relative to the working directory.
    pub fn resolve_path(&self, path: &str) -> PathBuf {
        if Path::new(path).is_absolute() {
            PathBuf::from(path)
        } else {
            self.cwd.join(path)
        }
    }
}
