//! Configuration management for webstep
//!
//! Supports environment variables, config files, and runtime overrides.
//!
//! Config file location: ~/.config/webstep/config.toml

use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::PathBuf;

use crate::core::error::{Result, WebstepError};

/// Main configuration for webstep
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Planner LLM configuration
    pub planner: PlannerConfig,
    /// Browser session configuration
    pub browser: BrowserConfig,
    /// Run behavior configuration
    #[serde(default)]
    pub run: RunConfig,
}

/// Planner LLM server configuration (Ollama-compatible chat API)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlannerConfig {
    /// Host address (default: localhost)
    pub host: String,
    /// Port number (default: 11434)
    pub port: u16,
    /// Model used to turn prompts into step plans
    pub model: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

/// Browser session configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BrowserConfig {
    /// Prefix for per-run session names (a random suffix is appended)
    pub session_prefix: String,
    /// Whether to run in headed mode (visible browser)
    pub headed: bool,
    /// Default timeout for driver calls in ms
    pub timeout_ms: u64,
}

/// Run behavior configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunConfig {
    /// Whether to apply per-site selector heuristics after planning
    pub site_heuristics: bool,
    /// Whether to show debug output
    pub debug: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            planner: PlannerConfig::default(),
            browser: BrowserConfig::default(),
            run: RunConfig::default(),
        }
    }
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            host: env::var("WEBSTEP_PLANNER_HOST").unwrap_or_else(|_| "localhost".to_string()),
            port: env::var("WEBSTEP_PLANNER_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(11434),
            model: env::var("WEBSTEP_PLANNER_MODEL").unwrap_or_else(|_| "qwen3:8b".to_string()),
            timeout_secs: 120,
        }
    }
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            session_prefix: env::var("WEBSTEP_BROWSER_SESSION")
                .unwrap_or_else(|_| "webstep".to_string()),
            headed: env::var("WEBSTEP_BROWSER_HEADED")
                .map(|v| v == "true" || v == "1")
                .unwrap_or(false),
            timeout_ms: 30000,
        }
    }
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            site_heuristics: true,
            debug: env::var("WEBSTEP_DEBUG")
                .map(|v| v == "true" || v == "1")
                .unwrap_or(false),
        }
    }
}

impl Config {
    /// Get the config directory path
    pub fn config_dir() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("webstep")
    }

    /// Get the config file path
    pub fn config_file() -> PathBuf {
        Self::config_dir().join("config.toml")
    }

    /// Load configuration from file, environment, and defaults
    /// Priority: CLI args > env vars > config file > defaults
    pub fn load() -> Self {
        // Try to load .env file if it exists
        let _ = dotenvy::dotenv();

        // Try to load from config file
        if let Ok(config) = Self::load_from_file() {
            return config;
        }

        // Fall back to defaults (which respect env vars)
        Self::default()
    }

    /// Load configuration from file only
    pub fn load_from_file() -> Result<Self> {
        let config_path = Self::config_file();

        if !config_path.exists() {
            return Err(WebstepError::config("Config file not found"));
        }

        let content = fs::read_to_string(&config_path)
            .map_err(|e| WebstepError::config(format!("Failed to read config: {}", e)))?;

        let config: Config = toml::from_str(&content)
            .map_err(|e| WebstepError::config(format!("Failed to parse config: {}", e)))?;

        Ok(config)
    }

    /// Save configuration to file
    pub fn save(&self) -> Result<()> {
        let config_dir = Self::config_dir();
        let config_path = Self::config_file();

        if !config_dir.exists() {
            fs::create_dir_all(&config_dir)
                .map_err(|e| WebstepError::config(format!("Failed to create config dir: {}", e)))?;
        }

        let content = toml::to_string_pretty(self)
            .map_err(|e| WebstepError::config(format!("Failed to serialize config: {}", e)))?;

        fs::write(&config_path, content)
            .map_err(|e| WebstepError::config(format!("Failed to write config: {}", e)))?;

        Ok(())
    }

    /// Get the full planner API URL
    pub fn planner_url(&self) -> String {
        format!("http://{}:{}", self.planner.host, self.planner.port)
    }

    /// Update the planner model
    pub fn set_model(&mut self, model: impl Into<String>) {
        self.planner.model = model.into();
    }
}
