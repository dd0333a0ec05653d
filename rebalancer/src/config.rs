//! TOML configuration loading and validation.

use std::path::{Path, PathBuf};

use folio::{CostAssumptions, Mode};
use serde::Deserialize;

use crate::error::{Error, Result};

/// Top-level configuration. Every section is optional.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub defaults: DefaultsConfig,
    #[serde(default)]
    pub cost: CostConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct DefaultsConfig {
    #[serde(default)]
    pub mode: Mode,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CostConfig {
    #[serde(default)]
    pub fee_per_trade: f64,
    #[serde(default = "default_cost_basis")]
    pub cost_basis_ratio: f64,
    #[serde(default = "default_tax_rate")]
    pub tax_rate: f64,
}

fn default_cost_basis() -> f64 {
    0.8
}
fn default_tax_rate() -> f64 {
    0.15
}

impl Default for CostConfig {
    fn default() -> Self {
        Self {
            fee_per_trade: 0.0,
            cost_basis_ratio: default_cost_basis(),
            tax_rate: default_tax_rate(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    #[serde(default = "default_store_path")]
    pub path: String,
    #[serde(default = "default_max_portfolios")]
    pub max_portfolios: usize,
}

fn default_store_path() -> String {
    "./portfolios.json".into()
}
fn default_max_portfolios() -> usize {
    5
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            path: default_store_path(),
            max_portfolios: default_max_portfolios(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_dir")]
    pub dir: String,
    #[serde(default = "default_audit_file")]
    pub audit_file: String,
}

fn default_log_dir() -> String {
    "./logs".into()
}
fn default_audit_file() -> String {
    "audit.jsonl".into()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            dir: default_log_dir(),
            audit_file: default_audit_file(),
        }
    }
}

impl Config {
    /// Load config from a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| Error::ConfigRead {
            path: path.to_path_buf(),
            source: e,
        })?;
        Self::from_toml(&contents)
    }

    /// Load config, falling back to defaults when the file does not exist.
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if path.exists() {
            Self::load(path)
        } else {
            log::debug!("no config at {}, using defaults", path.display());
            Ok(Self::default())
        }
    }

    /// Parse and validate a TOML string.
    pub fn from_toml(contents: &str) -> Result<Self> {
        let config: Config = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate config invariants.
    fn validate(&self) -> Result<()> {
        if self.storage.max_portfolios == 0 {
            return Err(Error::Config("max_portfolios must be >= 1".into()));
        }
        if !(0.0..=1.0).contains(&self.cost.cost_basis_ratio) {
            return Err(Error::Config(
                "cost_basis_ratio must be in [0.0, 1.0]".into(),
            ));
        }
        if !(0.0..=1.0).contains(&self.cost.tax_rate) {
            return Err(Error::Config("tax_rate must be in [0.0, 1.0]".into()));
        }
        if self.cost.fee_per_trade.is_nan() || self.cost.fee_per_trade < 0.0 {
            return Err(Error::Config("fee_per_trade must be >= 0".into()));
        }
        Ok(())
    }

    /// Cost assumptions for the estimate.
    pub fn cost_assumptions(&self) -> CostAssumptions {
        CostAssumptions {
            fee_per_trade: self.cost.fee_per_trade,
            cost_basis_ratio: self.cost.cost_basis_ratio,
            tax_rate: self.cost.tax_rate,
        }
    }

    /// Full path to the audit log file.
    pub fn audit_path(&self) -> PathBuf {
        Path::new(&self.logging.dir).join(&self.logging.audit_file)
    }

    pub fn store_path(&self) -> PathBuf {
        PathBuf::from(&self.storage.path)
    }
}
