/// Configuration management for the kintree engine
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub query: QuerySettings,
    pub records: RecordSettings,
    pub output: OutputSettings,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuerySettings {
    /// Depth used when a query does not pass one explicitly
    pub default_depth: usize,
    /// Upper bound applied to every query depth
    pub max_depth: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecordSettings {
    pub path: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputSettings {
    /// json, text or dot
    pub format: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            query: QuerySettings {
                default_depth: 3,
                max_depth: 12,
            },
            records: RecordSettings {
                path: PathBuf::from("persons.json"),
            },
            output: OutputSettings {
                format: "text".to_string(),
            },
        }
    }
}

impl Config {
    /// Load configuration from file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        let config: Config = serde_yaml::from_str(&content)?;
        Ok(config)
    }

    /// Save configuration to file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = serde_yaml::to_string(self)?;
        fs::write(path, content)?;
        Ok(())
    }

    /// Load configuration from environment variables
    pub fn load_from_env() -> Result<Self> {
        let mut config = Config::default();

        if let Ok(depth) = std::env::var("KINTREE_DEFAULT_DEPTH") {
            config.query.default_depth = depth.parse()?;
        }

        if let Ok(depth) = std::env::var("KINTREE_MAX_DEPTH") {
            config.query.max_depth = depth.parse()?;
        }

        if let Ok(path) = std::env::var("KINTREE_RECORDS") {
            config.records.path = PathBuf::from(path);
        }

        if let Ok(format) = std::env::var("KINTREE_OUTPUT_FORMAT") {
            config.output.format = format;
        }

        Ok(config)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.query.max_depth == 0 {
            return Err(anyhow::anyhow!("Maximum query depth must be greater than 0"));
        }

        if self.query.default_depth > self.query.max_depth {
            return Err(anyhow::anyhow!(
                "Default query depth cannot exceed the maximum depth"
            ));
        }

        if !matches!(self.output.format.as_str(), "json" | "text" | "dot") {
            return Err(anyhow::anyhow!(
                "Unsupported output format: {}",
                self.output.format
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    #[test]
    fn test_config_save_and_load() {
        let config = Config::default();
        let temp_file = NamedTempFile::new().unwrap();

        config.save_to_file(temp_file.path()).unwrap();
        let loaded = Config::load_from_file(temp_file.path()).unwrap();

        assert_eq!(config.query.default_depth, loaded.query.default_depth);
        assert_eq!(config.query.max_depth, loaded.query.max_depth);
        assert_eq!(config.output.format, loaded.output.format);
    }

    #[test]
    fn test_config_validation() {
        let mut config = Config::default();
        assert!(config.validate().is_ok());

        config.query.max_depth = 0;
        assert!(config.validate().is_err());

        config = Config::default();
        config.query.default_depth = config.query.max_depth + 1;
        assert!(config.validate().is_err());

        config = Config::default();
        config.output.format = "xml".to_string();
        assert!(config.validate().is_err());
    }
}
