use crate::constants::{DEFAULT_MODEL, OPENAI_API_URL};
use crate::errors::{ColloquyError, ColloquyResult};
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf};

/// Endpoint settings for the completion client. The API key is session
/// state (it lives in the key-value store), not configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub api_url: String,
    pub model: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: OPENAI_API_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
        }
    }
}

impl Config {
    /// Loads the config file, creating it with defaults on first run.
    pub fn load_or_init() -> ColloquyResult<Config> {
        let config_path = config_path()?;

        if config_path.exists() {
            let config_str = fs::read_to_string(&config_path).map_err(|e| {
                ColloquyError::config_error(format!("failed to read config file: {}", e))
            })?;

            let config: Config = serde_json::from_str(&config_str).map_err(|e| {
                ColloquyError::config_error(format!("failed to parse config: {}", e))
            })?;

            config.validate()?;
            Ok(config)
        } else {
            let config = Config::default();

            fs::create_dir_all(config_path.parent().unwrap()).map_err(|e| {
                ColloquyError::config_error(format!("failed to create config directory: {}", e))
            })?;

            let config_str = serde_json::to_string_pretty(&config).map_err(|e| {
                ColloquyError::config_error(format!("failed to serialize config: {}", e))
            })?;

            fs::write(&config_path, config_str).map_err(|e| {
                ColloquyError::config_error(format!("failed to write config file: {}", e))
            })?;

            Ok(config)
        }
    }

    pub fn validate(&self) -> ColloquyResult<()> {
        if self.api_url.is_empty() {
            return Err(ColloquyError::config_error("api_url is required"));
        }

        if self.model.is_empty() {
            return Err(ColloquyError::config_error("model name is required"));
        }

        Ok(())
    }
}

fn config_path() -> ColloquyResult<PathBuf> {
    let home_dir = dirs::home_dir()
        .ok_or_else(|| ColloquyError::config_error("could not determine home directory"))?;

    Ok(home_dir.join(".config").join("colloquy").join("config.json"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_config_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_config_empty_model() {
        let mut config = Config::default();
        config.model = "".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_config_empty_api_url() {
        let mut config = Config::default();
        config.api_url = "".to_string();
        assert!(config.validate().is_err());
    }
}
