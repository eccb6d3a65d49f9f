use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

use crate::platform::PlatformCapabilities;
use crate::player::source::DEFAULT_CORS_PROXY;
use crate::ui::theme::ThemeName;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub theme: ThemeName,
    /// Optional channel/program catalog file (YAML or JSON). Without it
    /// the built-in catalog is used.
    #[serde(default)]
    pub catalog_path: Option<PathBuf>,
    /// HTTPS proxy base for plain-HTTP streams in mixed-content contexts.
    #[serde(default = "default_cors_proxy")]
    pub cors_proxy: String,
    /// Capabilities of the host environment. Supplied here, never sniffed
    /// at runtime.
    #[serde(default)]
    pub platform: PlatformCapabilities,
}

fn default_cors_proxy() -> String {
    DEFAULT_CORS_PROXY.to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            theme: ThemeName::default(),
            catalog_path: None,
            cors_proxy: default_cors_proxy(),
            platform: PlatformCapabilities::default(),
        }
    }
}

fn get_config_path() -> Result<PathBuf> {
    let config_dir = dirs::config_dir()
        .context("Could not find config directory")?
        .join("zappeur");

    Ok(config_dir.join("config.yml"))
}

pub fn load_or_create_config() -> Result<Config> {
    let config_path = get_config_path()?;

    if !config_path.exists() {
        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent).context("Failed to create config directory")?;
        }

        let default_config = Config::default();
        let yaml =
            serde_yaml::to_string(&default_config).context("Failed to serialize default config")?;

        fs::write(&config_path, yaml).context("Failed to write default config file")?;

        eprintln!("Config file created at: {}", config_path.display());
        return Ok(default_config);
    }

    let config_content = fs::read_to_string(&config_path).context("Failed to read config file")?;

    let config: Config =
        serde_yaml::from_str(&config_content).context("Failed to parse config file")?;

    Ok(config)
}
