//! Read-only views of the station, handed out by [`crate::Station::snapshot`].

use serde::{Deserialize, Serialize};

use crate::{Session, SessionBoost};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct StationStatus {
    pub station_id: String,
    pub grid_capacity: u32,
    pub max_asked_power: u32,
    /// Grid capacity plus whatever the battery can deliver right now
    pub whole_capacity: u32,
    pub chargers: Vec<ChargerStatus>,
    pub battery: Option<BatteryStatus>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ChargerStatus {
    pub charger_id: String,
    pub max_power: u32,
    pub max_asked_power: u32,
    pub non_boosted_count: usize,
    pub boosted_count: usize,
    pub connectors: Vec<ConnectorStatus>,
}

/// One entry per connector of the charger, busy or not.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ConnectorStatus {
    pub connector_id: u8,
    pub session: Option<Session>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BatteryStatus {
    pub initial_capacity: u32,
    pub max_power: u32,
    pub state_of_charge: u8,
    pub deliverable_power: u32,
    pub session_boosts: Vec<SessionBoost>,
}
