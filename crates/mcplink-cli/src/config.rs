use anyhow::Context;
use mcplink_logging::LogFormat;
use mcplink_session::SessionConfig;
use serde::Deserialize;
use std::env;
use std::fs;
use std::path::PathBuf;

/// Default config template created when no config exists
const DEFAULT_CONFIG: &str = r#"
api_key = ""  # Set via MCPLINK_API_KEY env var

[session]
endpoint = "https://lunarcrush.ai/mcp"
credential_param = "key"
connect_timeout = 10  # seconds
request_timeout = 30  # seconds

[logging]
level = "info"  # trace, debug, info, warn, error
format = "pretty"  # pretty, json
"#;

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct LoggingConfig {
    #[serde(default = "default_level")]
    pub level: String,
    #[serde(default)]
    pub format: LogFormat,
}

fn default_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
            format: LogFormat::default(),
        }
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct Config {
    #[serde(default)]
    pub api_key: String,
    #[serde(default)]
    pub session: SessionConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Get the global config path: ~/.mcplink/mcplink.toml
    fn global_config_path() -> Option<PathBuf> {
        dirs::home_dir().map(|home| home.join(".mcplink").join("mcplink.toml"))
    }

    /// Ensure global config directory and file exist, creating defaults if needed
    fn ensure_global_config() -> anyhow::Result<Option<PathBuf>> {
        let Some(config_path) = Self::global_config_path() else {
            return Ok(None);
        };

        if let Some(config_dir) = config_path.parent() {
            if !config_dir.exists() {
                fs::create_dir_all(config_dir).with_context(|| {
                    format!("failed to create config directory {}", config_dir.display())
                })?;
                eprintln!("Created config directory: {}", config_dir.display());
            }
        }

        if !config_path.exists() {
            fs::write(&config_path, DEFAULT_CONFIG.trim())?;
            eprintln!("Created default config: {}", config_path.display());
            eprintln!("Please edit this file or set MCPLINK_API_KEY.");
        }

        Ok(Some(config_path))
    }

    /// Load configuration with layered approach:
    /// 1. Global config: ~/.mcplink/mcplink.toml (auto-created if missing)
    /// 2. Local override: ./mcplink.toml (workspace, optional)
    /// 3. Environment variables (`MCPLINK__SESSION__ENDPOINT`, ...)
    /// 4. `MCPLINK_API_KEY` (highest priority)
    pub fn load() -> anyhow::Result<Self> {
        // Load .env file from current directory
        dotenvy::dotenv().ok();

        let mut config_builder = config::Config::builder();

        // Layer 1: Global config
        if let Some(global_config_path) = Self::ensure_global_config()? {
            config_builder = config_builder.add_source(config::File::from(global_config_path));
        }

        config_builder = config_builder
            // Layer 2: Local workspace config (optional override)
            .add_source(config::File::with_name("mcplink").required(false))
            // Layer 3: Environment variables with MCPLINK__ prefix
            .add_source(
                config::Environment::with_prefix("MCPLINK")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            );

        // Layer 4: Convenience env var override
        if let Ok(key) = env::var("MCPLINK_API_KEY") {
            config_builder = config_builder.set_override("api_key", key)?;
        }

        let config = config_builder.build()?;

        let config: Self = config.try_deserialize()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_template_parses() {
        let config: Config = toml::from_str(DEFAULT_CONFIG).expect("template must parse");
        assert_eq!(config.api_key, "");
        assert_eq!(config.session, SessionConfig::default());
        assert_eq!(config.logging, LoggingConfig::default());
    }

    #[test]
    fn missing_sections_fall_back_to_defaults() {
        let config: Config = toml::from_str(r#"api_key = "abc""#).expect("must parse");
        assert_eq!(config.api_key, "abc");
        assert_eq!(config.session, SessionConfig::default());
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn json_log_format() {
        let config: Config = toml::from_str(
            r#"
            [logging]
            level = "debug"
            format = "json"
            "#,
        )
        .expect("must parse");
        assert_eq!(config.logging.format, LogFormat::Json);
        assert_eq!(config.logging.level, "debug");
    }
}
