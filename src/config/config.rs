use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub display: DisplayConfig,
    pub behavior: BehaviorConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// Rows shown by table summaries before truncating
    pub max_preview_rows: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BehaviorConfig {
    /// Prefix for file names of tables created in the editor
    /// ("Untitled1.jdf", "Untitled2.jdf", ...)
    pub untitled_prefix: String,

    /// Column layout of a freshly created table
    pub template_columns: Vec<String>,

    /// Column type tags of a freshly created table
    pub template_types: Vec<String>,

    /// Sample row placed in a freshly created table
    pub template_row: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            display: DisplayConfig::default(),
            behavior: BehaviorConfig::default(),
        }
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            max_preview_rows: 5,
        }
    }
}

impl Default for BehaviorConfig {
    fn default() -> Self {
        Self {
            untitled_prefix: "Untitled".to_string(),
            template_columns: vec!["Name".to_string(), "E-Mail".to_string()],
            template_types: vec!["str".to_string(), "str".to_string()],
            template_row: vec!["John Smith".to_string(), "j.smith@email.com".to_string()],
        }
    }
}

impl Config {
    /// Load config from the default location
    pub fn load() -> Result<Self> {
        let config_path = Self::get_config_path()?;

        if !config_path.exists() {
            // Create default config if it doesn't exist
            let default_config = Self::default();
            default_config.save()?;
            return Ok(default_config);
        }

        let contents = fs::read_to_string(&config_path)?;
        let config: Config = toml::from_str(&contents)?;

        Ok(config)
    }

    /// Save config to the default location
    pub fn save(&self) -> Result<()> {
        let config_path = Self::get_config_path()?;

        // Ensure parent directory exists
        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)?;
        fs::write(&config_path, contents)?;

        Ok(())
    }

    /// Get the default config file path
    pub fn get_config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?;

        Ok(config_dir.join("jdf-editor").join("config.toml"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_template_is_consistent() {
        let config = Config::default();
        assert_eq!(
            config.behavior.template_columns.len(),
            config.behavior.template_types.len()
        );
        assert_eq!(
            config.behavior.template_columns.len(),
            config.behavior.template_row.len()
        );
    }

    #[test]
    fn test_partial_toml_fills_defaults() {
        let config: Config = toml::from_str("[display]\nmax_preview_rows = 12\n").unwrap();
        assert_eq!(config.display.max_preview_rows, 12);
        assert_eq!(config.behavior.untitled_prefix, "Untitled");
    }

    #[test]
    fn test_round_trips_through_toml() {
        let config = Config::default();
        let text = toml::to_string_pretty(&config).unwrap();
        let back: Config = toml::from_str(&text).unwrap();
        assert_eq!(back.behavior.template_columns, config.behavior.template_columns);
    }
}
