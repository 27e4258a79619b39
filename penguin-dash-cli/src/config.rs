//! Configuration loading and parsing

use anyhow::{Context, Result};
use penguin_dash_core::DashboardConfig;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Main application configuration (loaded from a TOML file)
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct AppConfig {
    /// Input State the session starts from
    #[serde(default)]
    pub dashboard: DashboardConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct OutputConfig {
    #[serde(default)]
    pub format: OutputFormat,
    /// Output slots to render; empty renders all of them
    #[serde(default)]
    pub outputs: Vec<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Load configuration from a TOML file
pub fn load_config(path: &Path) -> Result<AppConfig> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {:?}", path))?;

    let config: AppConfig = toml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {:?}", path))?;

    // Catch bad input values at load time rather than on first use
    config
        .dashboard
        .initial_inputs()
        .with_context(|| format!("Invalid dashboard settings in {:?}", path))?;

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_config_deserialization() {
        let toml_content = r#"
            [dashboard]
            attribute = "flipper_length_mm"
            plotly_bin_count = 15
            islands = ["Biscoe", "Dream"]

            [output]
            format = "json"
            outputs = ["plotly", "plotly_scatterplot"]
        "#;

        let config: AppConfig = toml::from_str(toml_content).unwrap();
        assert_eq!(config.dashboard.plotly_bin_count, Some(15));
        assert_eq!(config.dashboard.species, None);
        assert_eq!(config.output.format, OutputFormat::Json);
        assert_eq!(config.output.outputs.len(), 2);
    }

    #[test]
    fn test_empty_config_uses_defaults() {
        let config: AppConfig = toml::from_str("").unwrap();
        assert_eq!(config.output.format, OutputFormat::Text);
        assert!(config.output.outputs.is_empty());
        assert_eq!(config.dashboard, DashboardConfig::default());
    }

    #[test]
    fn test_load_config_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[dashboard]\nspecies = [\"Gentoo\"]").unwrap();

        let config = load_config(file.path()).unwrap();
        assert_eq!(config.dashboard.species, Some(vec!["Gentoo".to_string()]));
    }

    #[test]
    fn test_load_config_rejects_out_of_range_values() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[dashboard]\nseaborn_bin_count = 500").unwrap();

        let err = load_config(file.path()).unwrap_err();
        assert!(format!("{:#}", err).contains("seaborn_bin_count"));
    }

    #[test]
    fn test_load_config_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_config(&dir.path().join("missing.toml")).unwrap_err();
        assert!(err.to_string().starts_with("Failed to read config file"));
    }
}
