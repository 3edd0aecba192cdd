//! Power allocation for an Electra fast-charging station.
//!
//! A [`Station`] admits and removes charging sessions on its chargers while
//! keeping the requested power under the grid capacity, borrowing from the
//! station battery when the grid alone cannot serve a new vehicle.

mod battery;
mod charger;
mod models;
mod session;
mod station;
mod status;

pub use crate::battery::{Battery, SessionBoost};
pub use crate::charger::Charger;
pub use crate::models::*;
pub use crate::session::Session;
pub use crate::station::Station;
pub use crate::status::*;

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StationError {
    #[error("Charger {charger_id} does not exist in the station configuration")]
    ChargerNotFound { charger_id: String },
    #[error("Connector {connector_id} does not exist in the station configuration")]
    ConnectorNotFound { connector_id: ConnectorId },
    #[error("Connector {connector_id} is already in use by another session")]
    SessionAlreadyActive { connector_id: ConnectorId },
    #[error("Connector {connector_id} has no active session")]
    SessionAlreadyInactive { connector_id: ConnectorId },
    #[error("Requesting {vehicle_max_power} kW on {connector_id} overflows the station demand")]
    PowerOverflow {
        connector_id: ConnectorId,
        vehicle_max_power: u32,
    },
    /// The boosted flag of a session and the battery boosts disagree.
    #[error("No battery boost recorded for boosted session on {connector_id}")]
    InvalidBoostRemoval { connector_id: ConnectorId },
}
