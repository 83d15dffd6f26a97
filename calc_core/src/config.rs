//! # Estimator Configuration
//!
//! Regional prices and the percentages applied on top of them, stored as TOML
//! so an estimator can edit them by hand between projects.
//!
//! ```toml
//! overhead_pct = 15.0
//! tax_pct = 11.0
//!
//! [prices]
//! laborer = 115000.0
//! mason = 140000.0
//! foreman = 165000.0
//! cement = 1650.0
//! sand = 215000.0
//! stone = 265000.0
//! gravel = 325000.0
//! rebar = 15500.0
//! tie_wire = 22000.0
//! timber = 2850000.0
//! nails = 20000.0
//! ```

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::errors::{CalcError, CalcResult};
use crate::pricing::{PriceCatalog, UnitPriceSchedule};

/// Default file name looked up in the working directory
pub const DEFAULT_CONFIG_FILE: &str = "rab.toml";

/// Default overhead and profit (%)
pub const DEFAULT_OVERHEAD_PCT: f64 = 15.0;

/// Default value-added tax on the bill total (%)
pub const DEFAULT_TAX_PCT: f64 = 11.0;

/// Prices and percentages used for one estimate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EstimatorConfig {
    /// Overhead and profit added to every unit price (%)
    #[serde(default = "default_overhead")]
    pub overhead_pct: f64,

    /// Tax on the bill total (%)
    #[serde(default = "default_tax")]
    pub tax_pct: f64,

    #[serde(default)]
    pub prices: PriceCatalog,
}

fn default_overhead() -> f64 {
    DEFAULT_OVERHEAD_PCT
}

fn default_tax() -> f64 {
    DEFAULT_TAX_PCT
}

impl Default for EstimatorConfig {
    fn default() -> Self {
        EstimatorConfig {
            overhead_pct: DEFAULT_OVERHEAD_PCT,
            tax_pct: DEFAULT_TAX_PCT,
            prices: PriceCatalog::default(),
        }
    }
}

impl EstimatorConfig {
    /// Unit prices for every work item under this configuration
    pub fn schedule(&self) -> UnitPriceSchedule {
        UnitPriceSchedule::new(&self.prices, self.overhead_pct)
    }

    /// Reject negative percentages and prices.
    pub fn validate(&self) -> CalcResult<()> {
        if self.overhead_pct < 0.0 {
            return Err(CalcError::invalid_input(
                "overhead_pct",
                self.overhead_pct.to_string(),
                "Overhead cannot be negative",
            ));
        }
        if self.tax_pct < 0.0 {
            return Err(CalcError::invalid_input(
                "tax_pct",
                self.tax_pct.to_string(),
                "Tax cannot be negative",
            ));
        }
        for key in crate::pricing::PriceKey::ALL {
            let value = self.prices.get(key);
            if value < 0.0 {
                return Err(CalcError::invalid_input(
                    format!("prices.{}", key.label()),
                    value.to_string(),
                    "Price cannot be negative",
                ));
            }
        }
        Ok(())
    }
}

/// Read and validate a configuration file.
pub fn load_config(path: &Path) -> CalcResult<EstimatorConfig> {
    let content = fs::read_to_string(path)
        .map_err(|e| CalcError::file_error("read config", path.display().to_string(), e.to_string()))?;
    let config: EstimatorConfig = toml::from_str(&content)
        .map_err(|e| CalcError::config_error(path.display().to_string(), e.to_string()))?;
    config.validate()?;
    tracing::info!(path = %path.display(), overhead_pct = config.overhead_pct, "loaded estimator config");
    Ok(config)
}

/// Load `path`, or write the defaults there and return them when it is missing.
pub fn load_or_default(path: &Path) -> CalcResult<EstimatorConfig> {
    if path.exists() {
        return load_config(path);
    }
    let config = EstimatorConfig::default();
    save_config(&config, path)?;
    tracing::info!(path = %path.display(), "wrote default estimator config");
    Ok(config)
}

/// Write a configuration as TOML.
pub fn save_config(config: &EstimatorConfig, path: &Path) -> CalcResult<()> {
    let text = toml::to_string_pretty(config)
        .map_err(|e| CalcError::config_error(path.display().to_string(), e.to_string()))?;
    fs::write(path, text)
        .map_err(|e| CalcError::file_error("write config", path.display().to_string(), e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pricing::PriceKey;
    use std::env::temp_dir;
    use std::path::PathBuf;

    fn temp_config_path(name: &str) -> PathBuf {
        temp_dir().join(format!("saluran_config_{}_{}.toml", name, std::process::id()))
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let config: EstimatorConfig = toml::from_str("overhead_pct = 10.0\n").unwrap();
        assert_eq!(config.overhead_pct, 10.0);
        assert_eq!(config.tax_pct, DEFAULT_TAX_PCT);
        assert_eq!(config.prices, PriceCatalog::default());
    }

    #[test]
    fn test_load_or_default_writes_file() {
        let path = temp_config_path("default");
        let _ = fs::remove_file(&path);

        let config = load_or_default(&path).unwrap();
        assert_eq!(config, EstimatorConfig::default());
        assert!(path.exists());

        // Second call reads what the first wrote
        let again = load_or_default(&path).unwrap();
        assert_eq!(again, config);

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let path = temp_config_path("roundtrip");
        let config = EstimatorConfig {
            overhead_pct: 10.0,
            prices: PriceCatalog::default().with(PriceKey::Cement, 1800.0),
            ..EstimatorConfig::default()
        };
        save_config(&config, &path).unwrap();
        let loaded = load_config(&path).unwrap();
        assert_eq!(loaded.prices.get(PriceKey::Cement), 1800.0);
        assert_eq!(loaded.overhead_pct, 10.0);
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_malformed_toml_is_config_error() {
        let path = temp_config_path("malformed");
        fs::write(&path, "overhead_pct = \"lots\"").unwrap();
        let err = load_config(&path).unwrap_err();
        assert_eq!(err.error_code(), "CONFIG_ERROR");
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_negative_overhead_rejected() {
        let config = EstimatorConfig {
            overhead_pct: -1.0,
            ..EstimatorConfig::default()
        };
        assert_eq!(config.validate().unwrap_err().error_code(), "INVALID_INPUT");
    }

    #[test]
    fn test_schedule_uses_overhead() {
        let config = EstimatorConfig {
            overhead_pct: 0.0,
            ..EstimatorConfig::default()
        };
        let schedule = config.schedule();
        // Excavation base cost: 0.75 × 115000 + 0.025 × 165000
        assert!((schedule.price("T.06.a.1").unwrap() - 90_375.0).abs() < 1e-6);
    }
}
