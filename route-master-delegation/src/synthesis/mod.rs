//! Role synthesis: match sets, statements, names and trust for a domain batch

pub mod conditions;
pub mod policy_builder;
pub mod role_naming;

pub use conditions::{build_match_sets, MatchSets};
pub use policy_builder::{build_route53_statements, build_trust_policy};
pub use role_naming::{policy_name, role_name};

use crate::domain::extract_tld;
use crate::error::{RouteMasterError, RouteMasterResult};
use crate::registry::ZoneRegistry;
use crate::types::{OrganizationSettings, PolicyDocument, RoleDescriptor, Value};
use log::debug;

/// Describe a cross-account role allowed to change records for `domains`.
///
/// Every domain's root zone must already be shared. That is checked for the
/// whole batch before anything is built, so a failure never yields a partial role.
pub fn create_role(
    org: &OrganizationSettings,
    registry: &ZoneRegistry,
    ou_ids: &[String],
    domains: &[String],
) -> RouteMasterResult<RoleDescriptor> {
    if domains.is_empty() {
        return Err(RouteMasterError::EmptyDomainList);
    }

    let mut zone_arns: Vec<Value> = Vec::new();
    for domain in domains {
        let zone = extract_tld(domain)?;
        let zone_arn = registry
            .zone_arn(&zone)
            .ok_or_else(|| RouteMasterError::ZoneNotShared {
                domain: domain.clone(),
                zone: zone.clone(),
            })?;
        if !zone_arns.contains(zone_arn) {
            zone_arns.push(zone_arn.clone());
        }
    }

    let role_name = role_name(domains)?;
    if ou_ids.is_empty() {
        return Err(RouteMasterError::EmptyOrganizationalUnits(role_name));
    }

    let match_sets = build_match_sets(domains)?;
    debug!(
        "Role {}: {} exact and {} pattern record names",
        role_name,
        match_sets.string_equals.len(),
        match_sets.string_like.len()
    );

    Ok(RoleDescriptor {
        policy_name: policy_name(domains)?,
        assume_role_policy: build_trust_policy(org, ou_ids),
        policy: PolicyDocument::new(build_route53_statements(&match_sets, &zone_arns)),
        role_name,
    })
}
