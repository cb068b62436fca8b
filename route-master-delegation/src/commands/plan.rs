//! Plan creation from a provisioning configuration

use crate::config::ProvisioningConfig;
use crate::error::{RouteMasterError, RouteMasterResult};
use crate::types::ProvisioningPlan;
use crate::zones::{HostedZoneListing, ZoneDelegation};
use log::{debug, info};

/// Build the ordered request list for `config`.
///
/// Zone ids come from the configuration or, when `listing` is given, from a
/// `ListHostedZonesByName` response filtered by the zone comment. Zones that are
/// not found yet are looked up at deploy time instead.
pub fn plan(
    config: &ProvisioningConfig,
    listing: Option<&HostedZoneListing>,
) -> RouteMasterResult<ProvisioningPlan> {
    let delegation_set = config.delegation_set.to_delegation_set()?;
    let mut delegation = ZoneDelegation::new(
        config.organization.clone(),
        config.account.clone(),
        delegation_set,
    );
    if let Some(comment) = &config.comment {
        delegation = delegation.with_comment(comment.as_str());
    }

    if config.enable_org_sharing {
        delegation.enable_sharing_with_organization()?;
    }

    for zone in &config.zones {
        if let Some(zone_id) = &zone.hosted_zone_id {
            delegation.set_known_zone_id(&zone.name, zone_id);
        } else if let Some(listing) = listing {
            match listing.select_zone_id(&zone.name, delegation.comment()) {
                Ok(zone_id) => delegation.set_known_zone_id(&zone.name, &zone_id),
                Err(RouteMasterError::NoMatchingZone(_)) => {
                    debug!("Zone {} not in listing, deferring lookup", zone.name);
                }
                Err(e) => return Err(e),
            }
        }

        delegation.add_zone(&zone.name)?;
        if zone.update_nameservers {
            delegation.update_domain_ns(&zone.name)?;
        }
        if let Some(ou_ids) = &zone.share_with {
            delegation.share_zone_with_ram(&zone.name, ou_ids, zone.allow_external)?;
        }
    }

    for role in &config.roles {
        delegation.create_route53_role(&role.organizational_units, &role.domains)?;
    }

    let plan = delegation.into_plan();
    info!(
        "Planned {} resources including {} roles",
        plan.resources.len(),
        plan.roles().count()
    );
    Ok(plan)
}
