//! Configuration management for docscan
//!
//! Analyzer thresholds and capture-loop timing live in a single TOML file.
//! Every field is optional; missing ones fall back to the built-in defaults.

use crate::capture::CaptureSettings;
use crate::errors::ScanError;
use crate::quality::QualityThresholds;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Root configuration structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DocScanConfig {
    pub analyzer: QualityThresholds,
    pub capture: CaptureSettings,
}

impl DocScanConfig {
    /// Load configuration from TOML file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ScanError> {
        let path = path.as_ref();

        if !path.exists() {
            log::info!("Config file not found at {:?}, using defaults", path);
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)
            .map_err(|e| ScanError::Config(format!("Failed to read config file: {}", e)))?;

        let config: DocScanConfig = toml::from_str(&contents)
            .map_err(|e| ScanError::Config(format!("Failed to parse config file: {}", e)))?;

        config.validate().map_err(ScanError::Config)?;

        log::info!("Loaded configuration from {:?}", path);
        Ok(config)
    }

    /// Save configuration to TOML file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), ScanError> {
        let path = path.as_ref();

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .map_err(|e| ScanError::Config(format!("Failed to create config directory: {}", e)))?;
        }

        let toml_string = toml::to_string_pretty(self)
            .map_err(|e| ScanError::Config(format!("Failed to serialize config: {}", e)))?;

        fs::write(path, toml_string)
            .map_err(|e| ScanError::Config(format!("Failed to write config file: {}", e)))?;

        log::info!("Saved configuration to {:?}", path);
        Ok(())
    }

    /// Get default config file path
    pub fn default_path() -> PathBuf {
        PathBuf::from("docscan.toml")
    }

    /// Load from default location, falling back to defaults on any error
    pub fn load_or_default() -> Self {
        Self::load_from_file(Self::default_path()).unwrap_or_else(|e| {
            log::warn!("Failed to load config, using defaults: {}", e);
            Self::default()
        })
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<(), String> {
        self.analyzer.validate()?;
        self.capture.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_default_config() {
        let config = DocScanConfig::default();
        assert_eq!(config.capture.poll_interval_ms, 300);
        assert_eq!(config.capture.min_stable_ms, 1200);
        assert_eq!(config.analyzer.sample_stride, 6);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_save_and_load() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("nested").join("docscan.toml");

        let mut config = DocScanConfig::default();
        config.capture.min_stable_ms = 800;
        config.analyzer.reject_min_score = 60;
        config.save_to_file(&config_path).unwrap();

        let loaded = DocScanConfig::load_from_file(&config_path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_config_toml_format() {
        let toml_string = toml::to_string_pretty(&DocScanConfig::default()).unwrap();
        assert!(toml_string.contains("[analyzer]"));
        assert!(toml_string.contains("[capture]"));
        assert!(toml_string.contains("min_stable_ms"));
        assert!(toml_string.contains("sample_stride"));
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("docscan.toml");
        fs::write(&path, "[capture]\npoll_interval_ms = 100\n").unwrap();

        let loaded = DocScanConfig::load_from_file(&path).unwrap();
        assert_eq!(loaded.capture.poll_interval_ms, 100);
        assert_eq!(loaded.capture.min_stable_ms, 1200);
        assert_eq!(loaded.analyzer, QualityThresholds::default());
    }

    #[test]
    fn test_invalid_values_rejected() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("docscan.toml");
        fs::write(&path, "[capture]\npoll_interval_ms = 0\n").unwrap();

        let err = DocScanConfig::load_from_file(&path).unwrap_err();
        assert!(matches!(err, ScanError::Config(_)));
    }

    #[test]
    fn test_malformed_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("docscan.toml");
        fs::write(&path, "this is = = not toml").unwrap();
        assert!(DocScanConfig::load_from_file(&path).is_err());
    }

    #[test]
    fn test_load_nonexistent_file() {
        let dir = tempdir().unwrap();
        let result = DocScanConfig::load_from_file(dir.path().join("missing.toml"));
        assert_eq!(result.unwrap(), DocScanConfig::default());
    }
}
