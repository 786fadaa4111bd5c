// Configuration module for reading Oware.toml
// Holds the tunables for the AI search and the game service

use serde::Deserialize;
use std::fs;
use std::path::Path;

/// Main configuration structure containing all tunable parameters
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct Config {
    pub search: SearchConfig,
    pub game: GameConfig,
    pub debug: DebugConfig,
    pub profiling: ProfilingConfig,
}

/// Search depth limits and root parallelism
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct SearchConfig {
    /// Depth used when a request does not give one
    pub default_depth: u8,
    /// Requested depths above this are clamped; search cost grows as 6^depth
    pub max_depth: u8,
    pub parallel_root: bool,
    pub min_depth_for_parallel: u8,
}

impl SearchConfig {
    /// Caps a requested depth at `max_depth`
    pub fn clamp_depth(&self, requested: u8) -> u8 {
        requested.min(self.max_depth)
    }
}

/// Game service behaviour
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct GameConfig {
    /// When false, `start` always gives Bottom the first move
    pub random_start: bool,
}

/// Debug move log configuration
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct DebugConfig {
    pub enabled: bool,
    pub log_file_path: String,
}

/// Search profiling configuration
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct ProfilingConfig {
    pub enabled: bool,
}

impl Config {
    /// Loads configuration from a TOML file
    ///
    /// # Arguments
    /// * `path` - Path to the Oware.toml configuration file
    ///
    /// # Returns
    /// * `Result<Config, String>` - Parsed configuration or error message
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, String> {
        let contents = fs::read_to_string(path.as_ref())
            .map_err(|e| format!("Failed to read config file: {}", e))?;

        Self::from_toml_str(&contents)
    }

    /// Parses configuration from TOML text
    pub fn from_toml_str(contents: &str) -> Result<Self, String> {
        let config: Config =
            toml::from_str(contents).map_err(|e| format!("Failed to parse config file: {}", e))?;

        if config.search.default_depth == 0 {
            return Err("search.default_depth must be at least 1".to_string());
        }

        if config.search.default_depth > config.search.max_depth {
            return Err(format!(
                "search.default_depth ({}) exceeds search.max_depth ({})",
                config.search.default_depth, config.search.max_depth
            ));
        }

        Ok(config)
    }

    /// Loads default configuration from Oware.toml in the project root
    pub fn load_default() -> Result<Self, String> {
        Self::from_file("Oware.toml")
    }

    /// Creates a configuration with hardcoded default values as fallback
    /// This should match the constants defined in Oware.toml
    pub fn default_hardcoded() -> Self {
        Config {
            search: SearchConfig {
                default_depth: 6,
                max_depth: 10,
                parallel_root: true,
                min_depth_for_parallel: 4,
            },
            game: GameConfig { random_start: true },
            debug: DebugConfig {
                enabled: false,
                log_file_path: "oware_debug.jsonl".to_string(),
            },
            profiling: ProfilingConfig { enabled: false },
        }
    }

    /// Attempts to load from file, falls back to hardcoded defaults on error
    pub fn load_or_default() -> Self {
        Self::load_default().unwrap_or_else(|e| {
            eprintln!(
                "Warning: Could not load Oware.toml ({}), using hardcoded defaults",
                e
            );
            Self::default_hardcoded()
        })
    }
}
