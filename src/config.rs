use chrono::NaiveDate;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::constants;
use crate::error::{GenerateError, Result};

/// Top-level generator configuration.
///
/// Every section is optional in the TOML file; missing keys fall back to the
/// defaults in [`crate::constants`]. Dates are quoted strings (`"2026-01-31"`).
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub generation: GenerationConfig,
    pub paths: PathsConfig,
    pub labels: LabelsConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GenerationConfig {
    pub total_target: u64,
    pub end_date: NaiveDate,
    pub floor_date: NaiveDate,
    pub min_draw: u64,
    pub max_draw: u64,
    pub min_quantity: i64,
    pub max_quantity: i64,
    pub progress_every: usize,
    pub seed: Option<u64>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PathsConfig {
    pub input: PathBuf,
    pub sales_output: PathBuf,
    pub inventory_output: PathBuf,
}

/// Fixed string values written into every emitted row
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LabelsConfig {
    pub order_status: String,
    pub payment_status: String,
    pub change_type: String,
    pub memo: String,
    pub log_time: String,
}

/// Values supplied on the command line; `None` leaves the loaded value alone.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub total_target: Option<u64>,
    pub end_date: Option<NaiveDate>,
    pub floor_date: Option<NaiveDate>,
    pub input: Option<PathBuf>,
    pub sales_output: Option<PathBuf>,
    pub inventory_output: Option<PathBuf>,
    pub seed: Option<u64>,
}

fn default_date((year, month, day): (i32, u32, u32)) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("default date constants are valid")
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            total_target: constants::DEFAULT_TOTAL_TARGET,
            end_date: default_date(constants::DEFAULT_END_DATE),
            floor_date: default_date(constants::DEFAULT_FLOOR_DATE),
            min_draw: constants::DEFAULT_MIN_DRAW,
            max_draw: constants::DEFAULT_MAX_DRAW,
            min_quantity: constants::DEFAULT_MIN_QUANTITY,
            max_quantity: constants::DEFAULT_MAX_QUANTITY,
            progress_every: constants::DEFAULT_PROGRESS_EVERY,
            seed: None,
        }
    }
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            input: PathBuf::from(constants::DEFAULT_INPUT_PATH),
            sales_output: PathBuf::from(constants::DEFAULT_SALES_OUTPUT),
            inventory_output: PathBuf::from(constants::DEFAULT_INVENTORY_OUTPUT),
        }
    }
}

impl Default for LabelsConfig {
    fn default() -> Self {
        Self {
            order_status: constants::ORDER_STATUS_DELIVERED.to_string(),
            payment_status: constants::PAYMENT_STATUS_PAID.to_string(),
            change_type: constants::CHANGE_TYPE_OUTBOUND.to_string(),
            memo: constants::MEMO_SALE_REGISTERED.to_string(),
            log_time: constants::INVENTORY_LOG_TIME.to_string(),
        }
    }
}

impl Config {
    /// Load configuration from an explicit path, or from `sales_datagen.toml`
    /// in the working directory if it exists, or fall back to defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None => {
                let default_path = Path::new(constants::DEFAULT_CONFIG_FILE);
                if default_path.exists() {
                    Self::from_file(default_path)
                } else {
                    debug!("No config file found, using defaults");
                    Ok(Self::default())
                }
            }
        }
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let config_content = fs::read_to_string(path).map_err(|e| {
            GenerateError::Config(format!(
                "Failed to read config file '{}': {}",
                path.display(),
                e
            ))
        })?;

        let config = Self::from_toml_str(&config_content)?;
        info!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content)?;
        Ok(config)
    }

    pub fn apply_overrides(&mut self, overrides: ConfigOverrides) {
        let generation = &mut self.generation;
        if let Some(total_target) = overrides.total_target {
            generation.total_target = total_target;
        }
        if let Some(end_date) = overrides.end_date {
            generation.end_date = end_date;
        }
        if let Some(floor_date) = overrides.floor_date {
            generation.floor_date = floor_date;
        }
        if overrides.seed.is_some() {
            generation.seed = overrides.seed;
        }

        let paths = &mut self.paths;
        if let Some(input) = overrides.input {
            paths.input = input;
        }
        if let Some(sales_output) = overrides.sales_output {
            paths.sales_output = sales_output;
        }
        if let Some(inventory_output) = overrides.inventory_output {
            paths.inventory_output = inventory_output;
        }
    }

    pub fn validate(&self) -> Result<()> {
        let g = &self.generation;
        if g.min_draw == 0 {
            return Err(GenerateError::Config("min_draw must be at least 1".to_string()));
        }
        if g.min_draw > g.max_draw {
            return Err(GenerateError::Config(format!(
                "min_draw ({}) is greater than max_draw ({})",
                g.min_draw, g.max_draw
            )));
        }
        if g.min_quantity < 1 {
            return Err(GenerateError::Config(format!(
                "min_quantity must be at least 1, got {}",
                g.min_quantity
            )));
        }
        if g.min_quantity > g.max_quantity {
            return Err(GenerateError::Config(format!(
                "min_quantity ({}) is greater than max_quantity ({})",
                g.min_quantity, g.max_quantity
            )));
        }
        if g.floor_date > g.end_date {
            return Err(GenerateError::Config(format!(
                "floor_date ({}) is after end_date ({})",
                g.floor_date, g.end_date
            )));
        }
        if g.progress_every == 0 {
            return Err(GenerateError::Config("progress_every must be at least 1".to_string()));
        }
        Ok(())
    }
}
