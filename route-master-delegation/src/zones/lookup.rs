//! Hosted zone id lookup over a `ListHostedZonesByName` response
//!
//! Zones are matched by exact name and by a keyword in their comment, so that
//! only zones this tool created are picked up.

use crate::error::{RouteMasterError, RouteMasterResult};
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct HostedZoneListing {
    #[serde(default)]
    pub hosted_zones: Vec<HostedZoneSummary>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct HostedZoneSummary {
    pub id: String,
    /// Fully qualified, with the trailing dot
    pub name: String,
    #[serde(default)]
    pub config: Option<HostedZoneConfig>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct HostedZoneConfig {
    #[serde(default)]
    pub comment: Option<String>,
    #[serde(default)]
    pub private_zone: bool,
}

impl HostedZoneListing {
    pub fn from_json(json: &str) -> RouteMasterResult<Self> {
        serde_json::from_str(json)
            .map_err(|e| RouteMasterError::config(format!("Invalid hosted zone listing: {e}")))
    }

    pub fn select_zone_id(&self, zone_name: &str, description_filter: &str) -> RouteMasterResult<String> {
        select_zone_id(&self.hosted_zones, zone_name, description_filter)
    }
}

/// Id of the single zone named `zone_name` whose comment contains `description_filter`.
///
/// The `/hostedzone/` prefix is stripped from the returned id.
pub fn select_zone_id(
    zones: &[HostedZoneSummary],
    zone_name: &str,
    description_filter: &str,
) -> RouteMasterResult<String> {
    let fqdn = format!("{zone_name}.");
    let matched: Vec<&HostedZoneSummary> = zones
        .iter()
        .filter(|zone| zone.name == fqdn)
        .filter(|zone| {
            zone.config
                .as_ref()
                .and_then(|config| config.comment.as_deref())
                .is_some_and(|comment| comment.contains(description_filter))
        })
        .collect();

    match matched.as_slice() {
        [] => Err(RouteMasterError::NoMatchingZone(zone_name.to_string())),
        [zone] => Ok(zone.id.trim_start_matches("/hostedzone/").to_string()),
        _ => Err(RouteMasterError::MultipleMatchingZones(zone_name.to_string())),
    }
}
