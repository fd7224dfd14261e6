//! Configuration for the catalog-diff tool
//!
//! Supports loading configuration from:
//! - Default values
//! - Config file (catalog-diff.toml)
//! - Environment variables (CATALOG_DIFF__*)
//!
//! ## Example config file (catalog-diff.toml):
//! ```toml
//! log_filter = "catalog_diff=debug"
//!
//! [output]
//! format = "json"
//! pretty = true
//! include_checksums = false
//!
//! [diff]
//! fail_on_change = true
//! ```

use config_crate::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};

/// Main configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiffConfig {
    /// Default `tracing` filter when `RUST_LOG` is unset
    #[serde(default = "default_log_filter")]
    pub log_filter: String,

    /// Report output settings
    #[serde(default)]
    pub output: OutputConfig,

    /// Diff behaviour settings
    #[serde(default)]
    pub diff: DiffSettings,
}

/// Report output configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    #[serde(default)]
    pub format: OutputFormat,

    /// Pretty-print JSON output
    #[serde(default = "default_true")]
    pub pretty: bool,

    /// Show catalog checksums in text output
    #[serde(default = "default_true")]
    pub include_checksums: bool,
}

/// Output format for reports
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DiffSettings {
    /// Exit non-zero when the catalogs differ
    #[serde(default)]
    pub fail_on_change: bool,
}

fn default_true() -> bool {
    true
}

fn default_log_filter() -> String {
    "info".to_string()
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::Text,
            pretty: true,
            include_checksums: true,
        }
    }
}

impl Default for DiffConfig {
    fn default() -> Self {
        Self {
            log_filter: default_log_filter(),
            output: OutputConfig::default(),
            diff: DiffSettings::default(),
        }
    }
}

impl DiffConfig {
    /// Load configuration from default locations
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(None)
    }

    /// Load configuration, layering a specific file over the defaults
    pub fn load_from(config_path: Option<&str>) -> Result<Self, ConfigError> {
        let mut builder = Config::builder();

        let config_locations = [
            "catalog-diff.toml",
            ".catalog-diff.toml",
            "config/catalog-diff.toml",
        ];

        for location in config_locations {
            builder = builder.add_source(File::with_name(location).required(false));
        }

        // XDG config directory
        if let Some(config_dir) =
            directories::ProjectDirs::from("dev", "catalog-diff", "catalog-diff")
        {
            let xdg_config = config_dir.config_dir().join("catalog-diff.toml");
            if xdg_config.exists() {
                builder = builder.add_source(File::from(xdg_config).required(false));
            }
        }

        if let Some(path) = config_path {
            builder = builder.add_source(File::with_name(path).required(true));
        }

        builder = builder.add_source(
            Environment::with_prefix("CATALOG_DIFF")
                .separator("__")
                .try_parsing(true),
        );

        let config = builder.build()?;
        config.try_deserialize()
    }

    /// Save configuration to a file
    pub fn save(&self, path: &str) -> std::io::Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
        std::fs::write(path, content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = DiffConfig::default();
        assert_eq!(config.output.format, OutputFormat::Text);
        assert!(config.output.include_checksums);
        assert!(!config.diff.fail_on_change);
    }

    #[test]
    fn test_serialize_config() {
        let config = DiffConfig::default();
        let toml_str = toml::to_string_pretty(&config).unwrap();
        assert!(toml_str.contains("[output]"));
        assert!(toml_str.contains("[diff]"));
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("custom.toml");
        std::fs::write(
            &path,
            "[output]\nformat = \"json\"\npretty = false\n\n[diff]\nfail_on_change = true\n",
        )
        .unwrap();

        let config = DiffConfig::load_from(path.to_str()).unwrap();
        assert_eq!(config.output.format, OutputFormat::Json);
        assert!(!config.output.pretty);
        assert!(config.output.include_checksums);
        assert!(config.diff.fail_on_change);
    }

    #[test]
    fn test_save_and_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("saved.toml");
        let mut config = DiffConfig::default();
        config.output.format = OutputFormat::Json;
        config.save(path.to_str().unwrap()).unwrap();

        let reloaded = DiffConfig::load_from(path.to_str()).unwrap();
        assert_eq!(reloaded.output.format, OutputFormat::Json);
    }
}
