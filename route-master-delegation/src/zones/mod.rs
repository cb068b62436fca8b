//! Zone delegation planner
//!
//! Public hosted zones are created against one reusable delegation set, their
//! ids are published to member accounts through SSM parameters shared with
//! RAM, and cross-account roles are scoped to record names within them. Every
//! cloud call is recorded as a [`PlannedResource`]; the zone registry tracks
//! what was added and shared so roles can only target shared zones.

pub mod delegation_set;
pub mod lookup;
pub mod sharing;

pub use delegation_set::ReusableDelegationSet;
pub use lookup::{select_zone_id, HostedZoneListing, HostedZoneSummary};
pub use sharing::enable_sharing_with_organization;

use crate::domain::extract_tld;
use crate::error::{RouteMasterError, RouteMasterResult};
use crate::registry::{hosted_zone_arn, SharedZone, ZoneRegistry};
use crate::synthesis::create_role;
use crate::types::{
    AccountContext, OrganizationSettings, PlannedResource, ProvisioningPlan, RoleDescriptor,
    Value, HOSTED_ZONE_ARN_ATTRIBUTE, ZONE_ID_ATTRIBUTE,
};
use log::{debug, info, warn};
use std::collections::{BTreeMap, BTreeSet};

/// Comment set on created zones; also the keyword zone lookups filter on
pub const DEFAULT_ZONE_COMMENT: &str = "Managed by route-master";
pub const SSM_READ_ONLY_PERMISSION_ARN: &str =
    "arn:aws:ram::aws:permission/AWSRAMDefaultPermissionSSMParameterReadOnly";
const ZONE_ID_PARAMETER_TIER: &str = "Advanced";

/// SSM parameter holding the id of a shared zone
pub fn zone_id_parameter_name(zone: &str) -> String {
    format!("/shared/{zone}/zone-id")
}

pub fn zone_id_parameter_arn(account: &AccountContext, zone: &str) -> String {
    format!(
        "arn:aws:ssm:{}:{}:parameter{}",
        account.region,
        account.account_id,
        zone_id_parameter_name(zone)
    )
}

/// CloudFormation-style logical id: prefix plus the alphanumerics of `name`.
/// Not injective, so [`ZoneDelegation`] rejects ids it has already handed out.
fn logical_id(prefix: &str, name: &str) -> String {
    let suffix: String = name.chars().filter(char::is_ascii_alphanumeric).collect();
    format!("{prefix}{suffix}")
}

pub struct ZoneDelegation {
    org: OrganizationSettings,
    account: AccountContext,
    delegation_set: ReusableDelegationSet,
    comment: String,
    registry: ZoneRegistry,
    known_zone_ids: BTreeMap<String, String>,
    role_names: BTreeSet<String>,
    logical_ids: BTreeSet<String>,
    resources: Vec<PlannedResource>,
}

impl ZoneDelegation {
    pub fn new(
        org: OrganizationSettings,
        account: AccountContext,
        delegation_set: ReusableDelegationSet,
    ) -> Self {
        let resources: Vec<PlannedResource> =
            delegation_set.planned_request().cloned().into_iter().collect();
        let logical_ids = resources
            .iter()
            .map(|r| r.logical_id().to_string())
            .collect();
        Self {
            org,
            account,
            delegation_set,
            comment: DEFAULT_ZONE_COMMENT.to_string(),
            registry: ZoneRegistry::new(),
            known_zone_ids: BTreeMap::new(),
            role_names: BTreeSet::new(),
            logical_ids,
            resources,
        }
    }

    fn push(&mut self, resource: PlannedResource, name: &str) -> RouteMasterResult<()> {
        let logical_id = resource.logical_id();
        if !self.logical_ids.insert(logical_id.to_string()) {
            return Err(RouteMasterError::DuplicateLogicalId {
                logical_id: logical_id.to_string(),
                name: name.to_string(),
            });
        }
        self.resources.push(resource);
        Ok(())
    }

    /// Comment for created zones. Shared zones are looked up by this comment.
    #[must_use]
    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = comment.into();
        self
    }

    /// Record the id of a zone that already exists, so sharing uses it directly
    pub fn set_known_zone_id(&mut self, zone: &str, zone_id: &str) {
        self.known_zone_ids
            .insert(zone.to_string(), zone_id.trim_start_matches("/hostedzone/").to_string());
    }

    pub fn comment(&self) -> &str {
        &self.comment
    }

    pub fn registry(&self) -> &ZoneRegistry {
        &self.registry
    }

    /// Plan a public hosted zone bound to the delegation set
    pub fn add_zone(&mut self, zone_name: &str) -> RouteMasterResult<()> {
        self.registry.add_zone(zone_name)?;

        if extract_tld(zone_name).ok().as_deref() != Some(zone_name) {
            warn!(
                "Zone {} is not a root zone; roles are only matched against the last two labels of a domain",
                zone_name
            );
        }

        let caller_reference = format!(
            "{}-{}",
            logical_id("rm", zone_name),
            chrono::Utc::now().timestamp_millis()
        );

        info!("Planning hosted zone {}", zone_name);
        let zone = PlannedResource::HostedZone {
            logical_id: logical_id("PubZone", zone_name),
            name: zone_name.to_string(),
            caller_reference,
            delegation_set_id: self.delegation_set.id().clone(),
            comment: self.comment.clone(),
            private_zone: false,
        };
        self.push(zone, zone_name)
    }

    /// Point the registered domain at the delegation set's name servers
    pub fn update_domain_ns(&mut self, zone_name: &str) -> RouteMasterResult<()> {
        info!("Planning name server update for {}", zone_name);
        let update = PlannedResource::DomainNameservers {
            logical_id: logical_id("Nameservers", zone_name),
            domain_name: zone_name.to_string(),
            nameservers: self.delegation_set.name_servers().to_vec(),
            physical_id: format!("NS-{zone_name}"),
        };
        self.push(update, zone_name)
    }

    /// Publish the zone id to `ou_ids` through an SSM parameter shared with RAM
    pub fn share_zone_with_ram(
        &mut self,
        zone_name: &str,
        ou_ids: &[String],
        allow_external: bool,
    ) -> RouteMasterResult<()> {
        if !self.registry.contains(zone_name) {
            return Err(RouteMasterError::ZoneNotAdded(zone_name.to_string()));
        }

        let (zone_id, zone_arn) = match self.known_zone_ids.get(zone_name) {
            Some(id) => (Value::literal(id), Value::literal(hosted_zone_arn(id))),
            None => {
                let lookup_id = logical_id("ZoneLookup", zone_name);
                debug!("Zone id of {} deferred to {}", zone_name, lookup_id);
                let lookup = PlannedResource::ZoneLookup {
                    logical_id: lookup_id.clone(),
                    zone_name: zone_name.to_string(),
                    zone_description_filter: self.comment.clone(),
                };
                self.push(lookup, zone_name)?;
                (
                    Value::attribute(lookup_id.as_str(), ZONE_ID_ATTRIBUTE),
                    Value::attribute(lookup_id.as_str(), HOSTED_ZONE_ARN_ATTRIBUTE),
                )
            }
        };

        let parameter_name = zone_id_parameter_name(zone_name);
        let parameter_arn = zone_id_parameter_arn(&self.account, zone_name);

        let parameter = PlannedResource::ZoneIdParameter {
            logical_id: logical_id("ZoneIdParam", zone_name),
            parameter_name: parameter_name.clone(),
            parameter_arn: parameter_arn.clone(),
            value: zone_id.clone(),
            tier: ZONE_ID_PARAMETER_TIER.to_string(),
        };
        self.push(parameter, zone_name)?;

        let share = PlannedResource::ResourceShare {
            logical_id: logical_id("Share", zone_name),
            name: zone_name.to_string(),
            allow_external_principals: allow_external,
            resource_arns: vec![parameter_arn.clone()],
            principals: ou_ids.iter().map(|ou| self.org.ou_arn(ou)).collect(),
            permission_arns: vec![SSM_READ_ONLY_PERMISSION_ARN.to_string()],
        };
        self.push(share, zone_name)?;

        info!("Planning RAM share of {} with {} OUs", zone_name, ou_ids.len());
        self.registry.share_zone(
            zone_name,
            SharedZone {
                zone_id,
                zone_arn,
                parameter_name,
                parameter_arn,
            },
        )
    }

    /// Plan a cross-account role for `domains`, assumable from `ou_ids`.
    ///
    /// The role name comes from the first domain, so two batches whose first
    /// domains share a namespace would target the same IAM role. The second
    /// one is rejected.
    pub fn create_route53_role(
        &mut self,
        ou_ids: &[String],
        domains: &[String],
    ) -> RouteMasterResult<RoleDescriptor> {
        let role = create_role(&self.org, &self.registry, ou_ids, domains)?;
        if self.role_names.contains(&role.role_name) {
            return Err(RouteMasterError::DuplicateRole(role.role_name));
        }
        info!("Planning role {} for {:?}", role.role_name, domains);
        let planned = PlannedResource::Role {
            logical_id: logical_id("Route53Role", &role.role_name),
            role: role.clone(),
        };
        self.push(planned, &role.role_name)?;
        self.role_names.insert(role.role_name.clone());
        Ok(role)
    }

    pub fn enable_sharing_with_organization(&mut self) -> RouteMasterResult<()> {
        info!("Planning RAM sharing with the organization");
        self.push(enable_sharing_with_organization(), "organization sharing")
    }

    pub fn into_plan(self) -> ProvisioningPlan {
        ProvisioningPlan {
            resources: self.resources,
        }
    }
}
