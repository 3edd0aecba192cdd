use std::collections::BTreeMap;

use crate::{
    Battery, Charger, ConfigError, ConnectorId, Session, StationConfig, StationError,
    StationStatus,
};

/// Top-level coordinator of a charging station.
///
/// The station keeps the sum of the power requested by every vehicle and
/// decides, on each admission, whether the new session is served by the grid
/// or boosted by the battery. After every command the chargers are brought
/// back within their capacity, and the battery recharges when at least half
/// of the grid capacity is unused.
#[derive(Debug, Clone)]
pub struct Station {
    config: StationConfig,
    grid_capacity: u32,
    max_asked_power: u32,
    chargers: BTreeMap<String, Charger>,
    battery: Option<Battery>,
}

impl Station {
    pub fn new(config: StationConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let chargers = config
            .chargers
            .iter()
            .map(|charger| (charger.id.clone(), Charger::new(charger)))
            .collect();
        Ok(Station {
            grid_capacity: config.grid_capacity,
            max_asked_power: 0,
            chargers,
            battery: config.battery.as_ref().map(Battery::new),
            config,
        })
    }

    pub fn config(&self) -> &StationConfig {
        &self.config
    }

    pub fn name(&self) -> &str {
        &self.config.station_id
    }

    pub fn grid_capacity(&self) -> u32 {
        self.grid_capacity
    }

    /// Sum of the maximum power requested by every active session.
    pub fn max_asked_power(&self) -> u32 {
        self.max_asked_power
    }

    pub fn charger(&self, charger_id: &str) -> Option<&Charger> {
        self.chargers.get(charger_id)
    }

    pub fn chargers(&self) -> impl Iterator<Item = &Charger> {
        self.chargers.values()
    }

    pub fn battery(&self) -> Option<&Battery> {
        self.battery.as_ref()
    }

    pub fn session(&self, connector_id: &ConnectorId) -> Option<&Session> {
        self.chargers
            .get(&connector_id.charger_id)
            .and_then(|charger| charger.session(connector_id.idx))
    }

    /// Power the station could serve right now, battery included.
    pub fn whole_capacity(&self) -> u32 {
        let battery_power = self
            .battery
            .as_ref()
            .map_or(0, Battery::deliverable_power);
        self.grid_capacity.saturating_add(battery_power)
    }

    pub fn start_session(
        &mut self,
        connector_id: ConnectorId,
        vehicle_max_power: u32,
    ) -> Result<Session, StationError> {
        tracing::info!(
            "Starting session on connector {} for {} kW",
            connector_id,
            vehicle_max_power
        );
        let idx = connector_id.idx;
        let charger = charger_for(&mut self.chargers, &connector_id)?;
        if !charger.is_connector_free(idx) {
            return Err(StationError::SessionAlreadyActive { connector_id });
        }
        let Some(max_asked_power) = self.max_asked_power.checked_add(vehicle_max_power) else {
            return Err(StationError::PowerOverflow {
                connector_id,
                vehicle_max_power,
            });
        };

        // Every charger total is bounded by the station total, so none can overflow
        self.max_asked_power = max_asked_power;

        if self.max_asked_power <= self.grid_capacity {
            charger.start_non_boosted(idx, vehicle_max_power);
        } else {
            let deficit = self.max_asked_power - self.grid_capacity;
            let battery = self
                .battery
                .as_mut()
                .filter(|battery| battery.deliverable_power() >= deficit);
            if let Some(battery) = battery {
                tracing::info!(
                    "Boosting {} with {} kW from the battery",
                    connector_id,
                    deficit
                );
                charger.start_boosted(idx, vehicle_max_power, deficit);
                battery.allocate_boost(connector_id.clone(), deficit);
            } else {
                charger.start_non_boosted(idx, vehicle_max_power);
                self.uniformize_non_boosted_sessions();
            }
        }

        self.recharge_battery_if_possible();

        self.session(&connector_id)
            .cloned()
            .ok_or(StationError::SessionAlreadyInactive { connector_id })
    }

    pub fn stop_session(&mut self, connector_id: ConnectorId) -> Result<Session, StationError> {
        tracing::info!("Stopping session on connector {}", connector_id);
        let idx = connector_id.idx;
        let charger = charger_for(&mut self.chargers, &connector_id)?;
        let Some(is_boosted) = charger.session(idx).map(Session::is_boosted) else {
            return Err(StationError::SessionAlreadyInactive { connector_id });
        };

        if is_boosted {
            let Some(battery) = self.battery.as_mut() else {
                tracing::error!(
                    "Boosted session on {} but the station has no battery",
                    connector_id
                );
                return Err(StationError::InvalidBoostRemoval { connector_id });
            };
            battery.remove_boost(&connector_id).inspect_err(|e| {
                tracing::error!("{}", e);
            })?;
        }

        let Some(session) = charger.remove_session(idx) else {
            return Err(StationError::SessionAlreadyInactive { connector_id });
        };
        self.max_asked_power -= session.vehicle_max_power;

        if self.max_asked_power > self.grid_capacity {
            self.uniformize_non_boosted_sessions();
        } else {
            self.chargers
                .values_mut()
                .for_each(Charger::reallocate_optimally);
        }

        self.recharge_battery_if_possible();
        Ok(session)
    }

    /// Splits the grid capacity evenly between every standard session of the
    /// station, without letting any charger go over its own capacity.
    fn uniformize_non_boosted_sessions(&mut self) {
        let non_boosted_count: usize = self
            .chargers
            .values()
            .map(Charger::non_boosted_count)
            .sum();
        if non_boosted_count == 0 {
            return;
        }
        let uniform_share = self.grid_capacity / non_boosted_count as u32;
        tracing::debug!(
            "Grid over-subscribed ({} > {} kW), {} kW per standard session",
            self.max_asked_power,
            self.grid_capacity,
            uniform_share
        );
        for charger in self.chargers.values_mut() {
            charger.set_all_non_boosted_to(uniform_share);
        }
    }

    /// Recharges the battery when at least half of the grid capacity is unused.
    fn recharge_battery_if_possible(&mut self) {
        let Some(battery) = self.battery.as_mut() else {
            return;
        };
        let Some(unused) = self.grid_capacity.checked_sub(self.max_asked_power) else {
            return;
        };
        if 2 * u64::from(unused) >= u64::from(self.grid_capacity) {
            battery.recharge();
            tracing::debug!("Battery recharged to {}%", battery.state_of_charge());
        }
    }

    pub fn snapshot(&self) -> StationStatus {
        StationStatus {
            station_id: self.config.station_id.clone(),
            grid_capacity: self.grid_capacity,
            max_asked_power: self.max_asked_power,
            whole_capacity: self.whole_capacity(),
            chargers: self.chargers.values().map(Charger::status).collect(),
            battery: self.battery.as_ref().map(Battery::status),
        }
    }
}

/// Looks up the charger of a connector, checking the connector index.
fn charger_for<'a>(
    chargers: &'a mut BTreeMap<String, Charger>,
    connector_id: &ConnectorId,
) -> Result<&'a mut Charger, StationError> {
    let charger = chargers.get_mut(&connector_id.charger_id).ok_or_else(|| {
        StationError::ChargerNotFound {
            charger_id: connector_id.charger_id.clone(),
        }
    })?;
    if !charger.has_connector(connector_id.idx) {
        return Err(StationError::ConnectorNotFound {
            connector_id: connector_id.clone(),
        });
    }
    Ok(charger)
}
