//! Thread-safe command surface over a [`Station`].
//!
//! Commands take the write lock for their whole duration, status queries only
//! the read lock, so readers never observe a half-applied command.

use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use sems_core::{
    ConfigError, ConnectorId, Session, Station, StationConfig, StationError, StationStatus,
};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum EngineError {
    #[error(transparent)]
    Station(#[from] StationError),
    #[error("Station state is unavailable after a failed command")]
    Poisoned,
}

#[derive(Debug)]
pub struct Engine {
    station: RwLock<Station>,
}

impl Engine {
    pub fn new(station_config: StationConfig) -> Result<Self, ConfigError> {
        Ok(Engine {
            station: RwLock::new(Station::new(station_config)?),
        })
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, Station>, EngineError> {
        self.station.read().map_err(|_| {
            tracing::error!("Station lock poisoned");
            EngineError::Poisoned
        })
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, Station>, EngineError> {
        self.station.write().map_err(|_| {
            tracing::error!("Station lock poisoned");
            EngineError::Poisoned
        })
    }

    pub fn start_session(
        &self,
        connector_id: ConnectorId,
        vehicle_max_power: u32,
    ) -> Result<Session, EngineError> {
        Ok(self.write()?.start_session(connector_id, vehicle_max_power)?)
    }

    pub fn stop_session(&self, connector_id: ConnectorId) -> Result<Session, EngineError> {
        Ok(self.write()?.stop_session(connector_id)?)
    }

    pub fn snapshot(&self) -> Result<StationStatus, EngineError> {
        Ok(self.read()?.snapshot())
    }

    pub fn config(&self) -> Result<StationConfig, EngineError> {
        Ok(self.read()?.config().clone())
    }
}
