//! Zone registry: which root zones were added and shared during a provisioning run

use crate::error::{RouteMasterError, RouteMasterResult};
use crate::types::Value;
use log::debug;
use serde::Serialize;
use std::collections::BTreeMap;

/// ARN of a Route 53 hosted zone
pub fn hosted_zone_arn(zone_id: &str) -> String {
    format!("arn:aws:route53:::hostedzone/{zone_id}")
}

/// What member accounts need to find a shared zone
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct SharedZone {
    pub zone_id: Value,
    pub zone_arn: Value,
    pub parameter_name: String,
    pub parameter_arn: String,
}

/// Root zone name to its sharing state. `None` means added but not shared yet.
#[derive(Debug, Clone, Default)]
pub struct ZoneRegistry {
    zones: BTreeMap<String, Option<SharedZone>>,
}

impl ZoneRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_zone(&mut self, zone: &str) -> RouteMasterResult<()> {
        if self.zones.contains_key(zone) {
            return Err(RouteMasterError::DuplicateZone(zone.to_string()));
        }
        debug!("Registering zone {}", zone);
        self.zones.insert(zone.to_string(), None);
        Ok(())
    }

    pub fn contains(&self, zone: &str) -> bool {
        self.zones.contains_key(zone)
    }

    pub fn share_zone(&mut self, zone: &str, shared: SharedZone) -> RouteMasterResult<()> {
        let entry = self
            .zones
            .get_mut(zone)
            .ok_or_else(|| RouteMasterError::ZoneNotAdded(zone.to_string()))?;
        debug!("Zone {} shared through {}", zone, shared.parameter_name);
        *entry = Some(shared);
        Ok(())
    }

    pub fn is_zone_shared(&self, zone: &str) -> bool {
        self.shared_zone(zone).is_some()
    }

    pub fn shared_zone(&self, zone: &str) -> Option<&SharedZone> {
        self.zones.get(zone).and_then(Option::as_ref)
    }

    pub fn zone_arn(&self, zone: &str) -> Option<&Value> {
        self.shared_zone(zone).map(|shared| &shared.zone_arn)
    }

    /// Added zones in name order
    pub fn zones(&self) -> impl Iterator<Item = &str> {
        self.zones.keys().map(String::as_str)
    }
}

#[cfg(test)]
pub(crate) fn shared_zone_fixture(zone: &str, zone_id: &str) -> SharedZone {
    SharedZone {
        zone_id: Value::literal(zone_id),
        zone_arn: Value::literal(hosted_zone_arn(zone_id)),
        parameter_name: format!("/shared/{zone}/zone-id"),
        parameter_arn: format!("arn:aws:ssm:us-east-1:111111111111:parameter/shared/{zone}/zone-id"),
    }
}
