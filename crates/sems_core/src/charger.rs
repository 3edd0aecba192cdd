use std::collections::BTreeMap;

use crate::{ChargerConfig, ChargerStatus, ConnectorId, ConnectorStatus, Session};

/// A fast charger sharing its own capacity between its connectors.
///
/// Boosted sessions count towards the requested power of the charger but are
/// left out of every sharing computation: their grid allocation is always 0.
#[derive(Debug, Clone)]
pub struct Charger {
    id: String,
    max_power: u32,
    connectors: u8,
    sessions: BTreeMap<u8, Session>,
    max_asked_power: u32,
    non_boosted_count: usize,
    boosted_count: usize,
}

impl Charger {
    pub fn new(config: &ChargerConfig) -> Self {
        Charger {
            id: config.id.clone(),
            max_power: config.max_power,
            connectors: config.connectors,
            sessions: BTreeMap::new(),
            max_asked_power: 0,
            non_boosted_count: 0,
            boosted_count: 0,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn max_power(&self) -> u32 {
        self.max_power
    }

    pub fn max_asked_power(&self) -> u32 {
        self.max_asked_power
    }

    pub fn non_boosted_count(&self) -> usize {
        self.non_boosted_count
    }

    pub fn boosted_count(&self) -> usize {
        self.boosted_count
    }

    pub fn session(&self, idx: u8) -> Option<&Session> {
        self.sessions.get(&idx)
    }

    pub fn sessions(&self) -> impl Iterator<Item = &Session> {
        self.sessions.values()
    }

    pub fn has_connector(&self, idx: u8) -> bool {
        (1..=self.connectors).contains(&idx)
    }

    pub fn is_connector_free(&self, idx: u8) -> bool {
        !self.sessions.contains_key(&idx)
    }

    /// Sum of the power allocated to the standard sessions of this charger.
    pub fn allocated_power(&self) -> u32 {
        self.non_boosted_sessions().map(|s| s.allocated_power).sum()
    }

    fn non_boosted_sessions(&self) -> impl Iterator<Item = &Session> {
        self.sessions.values().filter(|s| !s.is_boosted)
    }

    fn non_boosted_sessions_mut(&mut self) -> impl Iterator<Item = &mut Session> {
        self.sessions.values_mut().filter(|s| !s.is_boosted)
    }

    /// The share each standard session gets when the charger capacity is
    /// split evenly between them.
    fn local_fair_share(&self) -> u32 {
        if self.non_boosted_count == 0 {
            self.max_power
        } else {
            self.max_power / self.non_boosted_count as u32
        }
    }

    pub(crate) fn start_non_boosted(&mut self, idx: u8, vehicle_max_power: u32) {
        self.max_asked_power += vehicle_max_power;
        let mut session = Session::new(ConnectorId::new(self.id.clone(), idx), vehicle_max_power);

        if self.max_asked_power <= self.max_power {
            session.set_power(vehicle_max_power);
        } else {
            let equal_share = self.max_power / (self.non_boosted_count as u32 + 1);
            tracing::debug!(
                "Charger {} over capacity ({} > {} kW), sharing {} kW per session",
                self.id,
                self.max_asked_power,
                self.max_power,
                equal_share
            );
            self.non_boosted_sessions_mut()
                .for_each(|s| s.set_power(equal_share));
            session.set_power(equal_share);
        }

        self.non_boosted_count += 1;
        self.sessions.insert(idx, session);
    }

    pub(crate) fn start_boosted(&mut self, idx: u8, vehicle_max_power: u32, boost: u32) {
        let mut session = Session::new(ConnectorId::new(self.id.clone(), idx), vehicle_max_power);
        session.flag_as_boosted(boost);

        self.max_asked_power += vehicle_max_power;
        self.boosted_count += 1;
        self.sessions.insert(idx, session);
    }

    /// Gives every standard session as much as the charger allows: its full
    /// request when the charger is not over-subscribed, an even split otherwise.
    pub(crate) fn reallocate_optimally(&mut self) {
        if self.non_boosted_count == 0 {
            return;
        }
        if self.max_asked_power > self.max_power {
            let share = self.max_power / self.non_boosted_count as u32;
            self.non_boosted_sessions_mut().for_each(|s| s.set_power(share));
        } else {
            self.non_boosted_sessions_mut()
                .for_each(|s| s.set_power(s.vehicle_max_power));
        }
    }

    pub(crate) fn set_all_non_boosted_to(&mut self, power: u32) {
        let target = power.min(self.local_fair_share());
        self.non_boosted_sessions_mut().for_each(|s| s.set_power(target));
    }

    pub(crate) fn remove_session(&mut self, idx: u8) -> Option<Session> {
        let session = self.sessions.remove(&idx)?;
        self.max_asked_power -= session.vehicle_max_power;
        if session.is_boosted {
            self.boosted_count -= 1;
        } else {
            self.non_boosted_count -= 1;
        }
        Some(session)
    }

    pub(crate) fn status(&self) -> ChargerStatus {
        ChargerStatus {
            charger_id: self.id.clone(),
            max_power: self.max_power,
            max_asked_power: self.max_asked_power,
            non_boosted_count: self.non_boosted_count,
            boosted_count: self.boosted_count,
            connectors: (1..=self.connectors)
                .map(|idx| ConnectorStatus {
                    connector_id: idx,
                    session: self.sessions.get(&idx).cloned(),
                })
                .collect(),
        }
    }
}
