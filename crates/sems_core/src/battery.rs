use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::{BatteryStatus, BessConfig, ConnectorId, StationError};

/// Below this state of charge the battery cannot deliver any power.
const USABLE_STATE_OF_CHARGE: u8 = 20;
const RECHARGE_STEP: u8 = 10;
/// Highest state of charge from which a recharge step is still taken.
const RECHARGE_CEILING: u8 = 90;

/// Power lent by the battery to one boosted session.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SessionBoost {
    /// Shown as `<charger id>_<connector index>`
    #[serde(with = "session_key")]
    pub session_key: ConnectorId,
    pub power_amount: u32,
}

mod session_key {
    use serde::{Deserialize, Deserializer, Serializer, de::Error};

    use crate::ConnectorId;

    pub fn serialize<S: Serializer>(key: &ConnectorId, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(key)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<ConnectorId, D::Error>
    where
        D: Deserializer<'de>,
    {
        let key = String::deserialize(deserializer)?;
        let (charger_id, idx) = key
            .rsplit_once('_')
            .ok_or_else(|| D::Error::custom(format!("Invalid session key {}", key)))?;
        let idx = idx.parse().map_err(D::Error::custom)?;
        Ok(ConnectorId::new(charger_id, idx))
    }
}

/// The station BESS, used to absorb demand above the grid capacity.
#[derive(Debug, Clone)]
pub struct Battery {
    initial_capacity: u32,
    max_power: u32,
    state_of_charge: u8,
    boosts: BTreeMap<ConnectorId, SessionBoost>,
}

impl Battery {
    pub fn new(config: &BessConfig) -> Self {
        Battery {
            initial_capacity: config.initial_capacity,
            max_power: config.power,
            state_of_charge: 0,
            boosts: BTreeMap::new(),
        }
    }

    pub fn state_of_charge(&self) -> u8 {
        self.state_of_charge
    }

    pub fn boost(&self, connector_id: &ConnectorId) -> Option<&SessionBoost> {
        self.boosts.get(connector_id)
    }

    /// Either the full rated power or nothing, depending on the charge level.
    pub fn deliverable_power(&self) -> u32 {
        if self.state_of_charge >= USABLE_STATE_OF_CHARGE {
            self.max_power
        } else {
            0
        }
    }

    /// Records a boost. Any boost drains the battery completely.
    pub(crate) fn allocate_boost(&mut self, connector_id: ConnectorId, power_amount: u32) {
        tracing::debug!(
            "Battery boost of {} kW for {}, state of charge reset from {}",
            power_amount,
            connector_id,
            self.state_of_charge
        );
        self.boosts.insert(
            connector_id.clone(),
            SessionBoost {
                session_key: connector_id,
                power_amount,
            },
        );
        self.state_of_charge = 0;
    }

    pub(crate) fn recharge(&mut self) {
        if self.state_of_charge <= RECHARGE_CEILING {
            self.state_of_charge += RECHARGE_STEP;
        }
    }

    pub(crate) fn remove_boost(
        &mut self,
        connector_id: &ConnectorId,
    ) -> Result<SessionBoost, StationError> {
        self.boosts
            .remove(connector_id)
            .ok_or_else(|| StationError::InvalidBoostRemoval {
                connector_id: connector_id.clone(),
            })
    }

    pub(crate) fn status(&self) -> BatteryStatus {
        BatteryStatus {
            initial_capacity: self.initial_capacity,
            max_power: self.max_power,
            state_of_charge: self.state_of_charge,
            deliverable_power: self.deliverable_power(),
            session_boosts: self.boosts.values().cloned().collect(),
        }
    }
}
