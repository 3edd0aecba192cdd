use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Grid capacity must be strictly positive")]
    ZeroGridCapacity,
    #[error("Charger {charger_id} is declared more than once")]
    DuplicateCharger { charger_id: String },
    #[error("Charger {charger_id} has no connector")]
    NoConnectors { charger_id: String },
}

/// Station layout, as loaded once at startup.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct StationConfig {
    pub station_id: String,
    /// Grid capacity in kW
    pub grid_capacity: u32,
    pub chargers: Vec<ChargerConfig>,
    #[serde(default)]
    pub battery: Option<BessConfig>,
}

impl StationConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.grid_capacity == 0 {
            return Err(ConfigError::ZeroGridCapacity);
        }
        let mut seen = HashSet::new();
        for charger in &self.chargers {
            if !seen.insert(charger.id.as_str()) {
                return Err(ConfigError::DuplicateCharger {
                    charger_id: charger.id.clone(),
                });
            }
            if charger.connectors == 0 {
                return Err(ConfigError::NoConnectors {
                    charger_id: charger.id.clone(),
                });
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ChargerConfig {
    pub id: String,
    /// Maximum power in kW (shared between connectors)
    pub max_power: u32,
    pub connectors: u8,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BessConfig {
    /// Initial capacity in kWh
    pub initial_capacity: u32,
    /// Maximum discharge power in kW
    pub power: u32,
}

/// A connector of a charger. `idx` starts at 1.
#[derive(Debug, Clone, Serialize, Deserialize, Eq, PartialEq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "camelCase")]
pub struct ConnectorId {
    pub charger_id: String,
    pub idx: u8,
}

impl ConnectorId {
    pub fn new(charger_id: impl Into<String>, idx: u8) -> Self {
        ConnectorId {
            charger_id: charger_id.into(),
            idx,
        }
    }
}

impl fmt::Display for ConnectorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_{}", self.charger_id, self.idx)
    }
}
