use serde::{Deserialize, Serialize};

use crate::ConnectorId;

/// An active binding between a connector and a vehicle.
///
/// A session is either standard or boosted from the moment it is created.
/// A boosted session draws nothing from the grid: its demand is covered by
/// the battery, so its allocated power stays at 0.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub(crate) connector_id: ConnectorId,
    pub(crate) allocated_power: u32,
    pub(crate) vehicle_max_power: u32,
    pub(crate) is_boosted: bool,
    pub(crate) boosted_power: u32,
}

impl Session {
    pub(crate) fn new(connector_id: ConnectorId, vehicle_max_power: u32) -> Self {
        Session {
            connector_id,
            allocated_power: 0,
            vehicle_max_power,
            is_boosted: false,
            boosted_power: 0,
        }
    }

    pub fn connector_id(&self) -> &ConnectorId {
        &self.connector_id
    }

    pub fn allocated_power(&self) -> u32 {
        self.allocated_power
    }

    pub fn vehicle_max_power(&self) -> u32 {
        self.vehicle_max_power
    }

    pub fn is_boosted(&self) -> bool {
        self.is_boosted
    }

    pub fn boosted_power(&self) -> u32 {
        self.boosted_power
    }

    /// Never allocates more than the vehicle can draw.
    pub(crate) fn set_power(&mut self, power: u32) {
        self.allocated_power = power.min(self.vehicle_max_power);
    }

    pub(crate) fn flag_as_boosted(&mut self, boosted_power: u32) {
        self.is_boosted = true;
        self.allocated_power = 0;
        self.boosted_power = boosted_power;
    }
}
