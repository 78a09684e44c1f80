//! Configuration management.
//!
//! Supports configuration from:
//! - TOML config files
//! - Environment variables
//! - CLI arguments (for the `nexus-sim` binary)
//!
//! All values are read once at startup; the simulation never re-reads
//! configuration while running.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::{Result, SimError};

/// Main configuration struct
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Simulation loop configuration
    #[serde(default)]
    pub simulation: SimulationConfig,

    /// Text generator configuration
    #[serde(default)]
    pub generator: GeneratorConfig,
}

impl Config {
    /// Load configuration from a TOML file
    pub fn from_file(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let content = std::fs::read_to_string(&path)
            .map_err(|e| SimError::Config(format!("Failed to read config file: {e}")))?;

        toml::from_str(&content)
            .map_err(|e| SimError::Config(format!("Failed to parse config: {e}")))
    }

    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        let mut config = Self::default();

        // Simulation settings
        if let Ok(val) = std::env::var("NEXUS_TICK_INTERVAL") {
            if let Ok(val) = val.parse() {
                config.simulation.tick_interval_secs = val;
            }
        }
        if let Ok(val) = std::env::var("NEXUS_NUM_AGENTS") {
            if let Ok(val) = val.parse() {
                config.simulation.num_agents = val;
            }
        }
        if let Ok(val) = std::env::var("NEXUS_SEED") {
            if let Ok(val) = val.parse() {
                config.simulation.seed = Some(val);
            }
        }

        // Generator settings
        if let Ok(url) = std::env::var("NEXUS_GENERATOR_URL") {
            config.generator.url = url;
        }
        if let Ok(model) = std::env::var("NEXUS_MODEL") {
            config.generator.model = model;
        }
        if let Ok(key) = std::env::var("NEXUS_API_KEY") {
            config.generator.api_key = Some(key);
        }

        config
    }

    /// Merge with another config (other takes precedence)
    pub fn merge(self, other: Self) -> Self {
        let sim_defaults = SimulationConfig::default();
        let gen_defaults = GeneratorConfig::default();

        Self {
            simulation: SimulationConfig {
                tick_interval_secs: if other.simulation.tick_interval_secs
                    != sim_defaults.tick_interval_secs
                {
                    other.simulation.tick_interval_secs
                } else {
                    self.simulation.tick_interval_secs
                },
                num_agents: if other.simulation.num_agents != sim_defaults.num_agents {
                    other.simulation.num_agents
                } else {
                    self.simulation.num_agents
                },
                max_ticks: other.simulation.max_ticks.or(self.simulation.max_ticks),
                seed: other.simulation.seed.or(self.simulation.seed),
            },
            generator: GeneratorConfig {
                url: if other.generator.url != gen_defaults.url {
                    other.generator.url
                } else {
                    self.generator.url
                },
                model: if other.generator.model != gen_defaults.model {
                    other.generator.model
                } else {
                    self.generator.model
                },
                api_key: other.generator.api_key.or(self.generator.api_key),
                ..other.generator
            },
        }
    }
}

/// Simulation loop configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationConfig {
    /// Seconds between ticks
    pub tick_interval_secs: u64,

    /// Target agent-pool size
    pub num_agents: usize,

    /// Optional tick limit (run forever when `None`)
    pub max_ticks: Option<u64>,

    /// Random seed for reproducible runs
    pub seed: Option<u64>,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            tick_interval_secs: 30,
            num_agents: 5,
            max_ticks: None,
            seed: None,
        }
    }
}

/// Text generator configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratorConfig {
    /// Generator service base URL (e.g., http://localhost:11434)
    pub url: String,

    /// Model identifier
    pub model: String,

    /// Optional bearer token
    pub api_key: Option<String>,

    /// Request timeout in seconds
    pub timeout_secs: u64,

    /// Attempts before the content pipeline falls back
    pub max_retries: u32,

    /// Fixed backoff between retries, in milliseconds
    pub retry_backoff_ms: u64,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            url: "http://localhost:11434".to_string(),
            model: "llama2".to_string(),
            api_key: None,
            timeout_secs: 30,
            max_retries: 3,
            retry_backoff_ms: 1000,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.simulation.tick_interval_secs, 30);
        assert_eq!(config.simulation.num_agents, 5);
        assert_eq!(config.generator.url, "http://localhost:11434");
        assert_eq!(config.generator.max_retries, 3);
    }

    #[test]
    fn test_config_from_toml() {
        let toml = r#"
            [simulation]
            tick_interval_secs = 5
            num_agents = 12
            seed = 42

            [generator]
            url = "http://ollama.internal:11434"
            model = "llama3"
            timeout_secs = 30
            max_retries = 4
            retry_backoff_ms = 250
        "#;

        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.simulation.tick_interval_secs, 5);
        assert_eq!(config.simulation.num_agents, 12);
        assert_eq!(config.simulation.seed, Some(42));
        assert_eq!(config.generator.model, "llama3");
        assert_eq!(config.generator.max_retries, 4);
    }

    #[test]
    fn test_config_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nexus.toml");
        std::fs::write(
            &path,
            "[simulation]\ntick_interval_secs = 1\nnum_agents = 3\n",
        )
        .unwrap();

        let config = Config::from_file(&path).unwrap();
        assert_eq!(config.simulation.tick_interval_secs, 1);
        assert_eq!(config.simulation.num_agents, 3);
        // Missing sections fall back to defaults
        assert_eq!(config.generator.model, "llama2");
    }

    #[test]
    fn test_merge_prefers_non_default() {
        let base = Config {
            simulation: SimulationConfig {
                tick_interval_secs: 10,
                num_agents: 8,
                max_ticks: Some(100),
                seed: Some(7),
            },
            ..Default::default()
        };

        let mut overlay = Config::default();
        overlay.simulation.num_agents = 20;

        let merged = base.merge(overlay);
        assert_eq!(merged.simulation.num_agents, 20);
        assert_eq!(merged.simulation.tick_interval_secs, 10);
        assert_eq!(merged.simulation.max_ticks, Some(100));
        assert_eq!(merged.simulation.seed, Some(7));
    }
}
