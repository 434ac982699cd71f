use std::path::PathBuf;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::PropertySimError;
use crate::land_data::table::LandPriceTable;
use crate::PropertySimResult;

/// Minimum similarity a reference location needs to be considered a match.
pub const DEFAULT_SIMILARITY_CUTOFF: f64 = 0.1;

/// Environment variable naming the reference land price CSV.
pub const LAND_DATA_ENV: &str = "PSIM_LAND_DATA";
/// Environment variable overriding [`DEFAULT_SIMILARITY_CUTOFF`].
pub const SIMILARITY_CUTOFF_ENV: &str = "PSIM_SIMILARITY_CUTOFF";

/// Process-wide simulator settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulatorConfig {
    /// Reference land price CSV. `None` runs without reference prices.
    pub land_data_path: Option<PathBuf>,
    pub similarity_cutoff: f64,
}

impl Default for SimulatorConfig {
    fn default() -> Self {
        SimulatorConfig {
            land_data_path: None,
            similarity_cutoff: DEFAULT_SIMILARITY_CUTOFF,
        }
    }
}

impl SimulatorConfig {
    /// Read settings from the process environment, falling back to defaults.
    pub fn from_env() -> PropertySimResult<Self> {
        let land_data_path = std::env::var_os(LAND_DATA_ENV)
            .filter(|v| !v.is_empty())
            .map(PathBuf::from);
        let similarity_cutoff = match std::env::var(SIMILARITY_CUTOFF_ENV) {
            Ok(raw) if !raw.trim().is_empty() => {
                raw.trim()
                    .parse::<f64>()
                    .map_err(|e| PropertySimError::InvalidInput {
                        field: SIMILARITY_CUTOFF_ENV.into(),
                        reason: e.to_string(),
                    })?
            }
            _ => DEFAULT_SIMILARITY_CUTOFF,
        };
        let config = SimulatorConfig {
            land_data_path,
            similarity_cutoff,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> PropertySimResult<()> {
        if !(0.0..=1.0).contains(&self.similarity_cutoff) {
            return Err(PropertySimError::InvalidInput {
                field: "similarity_cutoff".into(),
                reason: format!("must be within [0, 1], got {}", self.similarity_cutoff),
            });
        }
        Ok(())
    }

    /// Load the reference table once for sharing across requests.
    pub fn load_table(&self) -> Arc<LandPriceTable> {
        Arc::new(LandPriceTable::load_or_empty(self.land_data_path.as_deref()))
    }
}
