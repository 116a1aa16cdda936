//! Configuration file support

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

/// Configuration for obc
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Chat model id passed to the Groq backend
    pub model: Option<String>,
    /// Checkpoint directory override
    pub checkpoint_dir: Option<String>,
    /// API keys (alternative to environment variables)
    #[serde(default)]
    pub api_keys: ApiKeys,
}

/// API key configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiKeys {
    pub groq: Option<String>,
    pub tavily: Option<String>,
}

impl Config {
    /// Get the config directory
    pub fn config_dir() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("obc")
    }

    /// Get the config file path
    pub fn config_path() -> PathBuf {
        // Check for OBC_CONFIG_PATH env var first
        if let Ok(path) = std::env::var("OBC_CONFIG_PATH") {
            return PathBuf::from(path);
        }
        Self::config_dir().join("config.toml")
    }

    /// Load config from file
    pub fn load() -> Self {
        let path = Self::config_path();
        if !path.exists() {
            return Self::default();
        }

        match fs::read_to_string(&path) {
            Ok(content) => match toml::from_str(&content) {
                Ok(config) => config,
                Err(e) => {
                    eprintln!("Warning: Failed to parse config file: {}", e);
                    Self::default()
                }
            },
            Err(e) => {
                eprintln!("Warning: Failed to read config file: {}", e);
                Self::default()
            }
        }
    }

    /// Save config to file
    pub fn save(&self) -> std::io::Result<()> {
        let path = Self::config_path();
        let dir = path.parent().unwrap_or_else(|| std::path::Path::new("."));
        fs::create_dir_all(dir)?;

        let content = toml::to_string_pretty(self).map_err(std::io::Error::other)?;
        fs::write(path, content)
    }

    /// Create a default config file if it doesn't exist
    pub fn init() -> std::io::Result<PathBuf> {
        let path = Self::config_path();
        if path.exists() {
            return Ok(path);
        }

        let default_config = Config {
            model: Some(obc_providers::groq::DEFAULT_MODEL.to_string()),
            checkpoint_dir: None,
            api_keys: ApiKeys::default(),
        };

        default_config.save()?;
        Ok(path)
    }

    /// Get API key for a provider, checking config then env
    pub fn get_api_key(&self, provider: &str) -> Option<String> {
        // Check config first
        let from_config = match provider {
            "groq" => self.api_keys.groq.clone(),
            "tavily" => self.api_keys.tavily.clone(),
            _ => None,
        };

        if from_config.is_some() {
            return from_config;
        }

        // Fall back to env var
        let env_var = match provider {
            "groq" => "GROQ_API_KEY",
            "tavily" => "TAVILY_API_KEY",
            _ => return None,
        };

        std::env::var(env_var).ok()
    }

    /// Checkpoint directory, config override first
    pub fn checkpoint_dir(&self) -> PathBuf {
        match self.checkpoint_dir {
            Some(ref dir) => PathBuf::from(dir),
            None => obc_workflow::FileCheckpointStore::default_dir(),
        }
    }
}

/// Generate example config content
pub fn example_config() -> &'static str {
    r#"# obc configuration file
# Place at ~/.config/obc/config.toml (Linux/Mac) or %APPDATA%\obc\config.toml (Windows)

# Chat model id for the Groq backend
model = "llama-3.1-8b-instant"

# Checkpoint directory override (optional)
# checkpoint_dir = "~/.local/share/obc/checkpoints"

# API keys (optional - can also use environment variables)
# It's recommended to use environment variables instead for security
[api_keys]
# groq = "gsk_..."
# tavily = "tvly-..."
"#
}
