//! Display configuration for the dashboard
//!
//! Everything here is static presentation data. The model card metrics in
//! particular are quoted from the training report, not computed.

use propai_core::QueryBounds;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DashboardConfig {
    /// Browser tab title
    pub page_title: String,
    pub title: String,
    pub subtitle: String,
    pub model_card: ModelCard,
    pub bounds: QueryBounds,
    pub form: FormDefaults,
    /// Series colours for the sensitivity chart, used in order
    pub palette: Vec<String>,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            page_title: "PropAI: Intelligent Real Estate".to_string(),
            title: "Intelligent Property Price Prediction".to_string(),
            subtitle: "AI-Powered Real Estate Analytics".to_string(),
            model_card: ModelCard::default(),
            bounds: QueryBounds::default(),
            form: FormDefaults::default(),
            palette: ["#00e676", "#18ffff", "#e040fb", "#ffeb3b", "#ff5252", "#1e88e5"]
                .iter()
                .map(|c| c.to_string())
                .collect(),
        }
    }
}

impl DashboardConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let data = std::fs::read(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config: DashboardConfig =
            serde_json::from_slice(&data).map_err(|source| ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            })?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.bounds
            .validate()
            .map_err(|e| ConfigError::Invalid(e.to_string()))?;

        let f = &self.form;
        if f.total_sqft < self.bounds.min_sqft || f.total_sqft > self.bounds.max_sqft {
            return Err(ConfigError::Invalid(format!(
                "default total_sqft {} is outside the sqft bounds",
                f.total_sqft
            )));
        }
        if !self.bounds.rooms_in_range(f.bhk) || !self.bounds.rooms_in_range(f.bath) {
            return Err(ConfigError::Invalid(
                "default bhk/bath are outside the room bounds".to_string(),
            ));
        }
        if !(f.sqft_step > 0.0) {
            return Err(ConfigError::Invalid("sqft_step must be positive".to_string()));
        }
        if self.palette.is_empty() {
            return Err(ConfigError::Invalid("palette cannot be empty".to_string()));
        }
        Ok(())
    }
}

/// Headline metrics shown on the insights tab
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ModelCard {
    pub architecture: String,
    pub accuracy: String,
    pub avg_error: String,
}

impl Default for ModelCard {
    fn default() -> Self {
        Self {
            architecture: "Random Forest".to_string(),
            accuracy: "76.0%".to_string(),
            avg_error: "₹ 23.2 Lakhs".to_string(),
        }
    }
}

/// Initial values of the input form
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct FormDefaults {
    pub total_sqft: f64,
    pub sqft_step: f64,
    pub bhk: u32,
    pub bath: u32,
}

impl Default for FormDefaults {
    fn default() -> Self {
        Self {
            total_sqft: 1000.0,
            sqft_step: 50.0,
            bhk: 2,
            bath: 2,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults_are_valid() {
        let config = DashboardConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.model_card.accuracy, "76.0%");
        assert_eq!(config.palette.len(), 6);
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"title": "Mysore Homes", "model_card": {{"accuracy": "81.2%"}}}}"#).unwrap();

        let config = DashboardConfig::from_file(file.path()).unwrap();
        assert_eq!(config.title, "Mysore Homes");
        assert_eq!(config.model_card.accuracy, "81.2%");
        assert_eq!(config.model_card.architecture, "Random Forest");
        assert_eq!(config.bounds, QueryBounds::default());
    }

    #[test]
    fn test_rejects_default_outside_bounds() {
        let mut config = DashboardConfig::default();
        config.form.total_sqft = 100.0;
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_rejects_empty_palette() {
        let config = DashboardConfig { palette: vec![], ..DashboardConfig::default() };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_missing_file() {
        let err = DashboardConfig::from_file("/no/such/config.json").unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
