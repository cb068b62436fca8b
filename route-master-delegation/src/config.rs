//! Provisioning configuration (JSON)
//!
//! ```json
//! {
//!   "Organization": {"OrgId": "o-abc", "OrgRootId": "abcd", "OrgAccountId": "123456789012"},
//!   "Account": {"AccountId": "111111111111", "Region": "us-east-1"},
//!   "DelegationSet": {"CallerReference": "r53-set-1"},
//!   "Zones": [{"Name": "acme.com", "ShareWith": ["team1"], "UpdateNameservers": true}],
//!   "Roles": [{"OrganizationalUnits": ["team1"], "Domains": ["*.dev.acme.com"]}]
//! }
//! ```

use crate::error::{RouteMasterError, RouteMasterResult};
use crate::types::{AccountContext, OrganizationSettings};
use crate::zones::ReusableDelegationSet;
use serde::Deserialize;
use std::path::Path;

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase", deny_unknown_fields)]
pub struct ProvisioningConfig {
    pub organization: OrganizationSettings,
    /// Account and region hosting the zones and roles
    pub account: AccountContext,
    pub delegation_set: DelegationSetConfig,
    /// Comment on created zones, also used to find them again
    #[serde(default)]
    pub comment: Option<String>,
    /// Plan `EnableSharingWithAwsOrganization` (management account only)
    #[serde(default)]
    pub enable_org_sharing: bool,
    #[serde(default)]
    pub zones: Vec<ZoneConfig>,
    #[serde(default)]
    pub roles: Vec<RoleConfig>,
}

/// Either a set to create (`CallerReference`) or an existing one (`Id` and `NameServers`)
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase", deny_unknown_fields)]
pub struct DelegationSetConfig {
    #[serde(default)]
    pub caller_reference: Option<String>,
    #[serde(default)]
    pub hosted_zone_id: Option<String>,
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name_servers: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase", deny_unknown_fields)]
pub struct ZoneConfig {
    pub name: String,
    /// OU ids to share the zone id with; the zone is not shared when absent
    #[serde(default)]
    pub share_with: Option<Vec<String>>,
    #[serde(default)]
    pub allow_external: bool,
    #[serde(default)]
    pub update_nameservers: bool,
    /// Id of the zone when it already exists
    #[serde(default)]
    pub hosted_zone_id: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase", deny_unknown_fields)]
pub struct RoleConfig {
    pub organizational_units: Vec<String>,
    pub domains: Vec<String>,
}

impl DelegationSetConfig {
    pub fn to_delegation_set(&self) -> RouteMasterResult<ReusableDelegationSet> {
        match (&self.id, &self.caller_reference) {
            (Some(id), None) => ReusableDelegationSet::existing(id, self.name_servers.clone()),
            (None, Some(caller_reference)) => Ok(ReusableDelegationSet::new(
                caller_reference,
                self.hosted_zone_id.clone(),
            )),
            (Some(_), Some(_)) => Err(RouteMasterError::config(
                "DelegationSet takes either Id or CallerReference, not both",
            )),
            (None, None) => Err(RouteMasterError::config(
                "DelegationSet requires CallerReference, or Id and NameServers of an existing set",
            )),
        }
    }
}

impl ProvisioningConfig {
    pub fn from_json(json: &str) -> RouteMasterResult<Self> {
        let config: Self = serde_json::from_str(json)
            .map_err(|e| RouteMasterError::config(format!("Invalid configuration: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_path(path: &Path) -> RouteMasterResult<Self> {
        let json = std::fs::read_to_string(path).map_err(|e| {
            RouteMasterError::config(format!("Failed to read {}: {e}", path.display()))
        })?;
        Self::from_json(&json)
    }

    fn validate(&self) -> RouteMasterResult<()> {
        let account_id = &self.account.account_id;
        if account_id.len() != 12 || !account_id.chars().all(|c| c.is_ascii_digit()) {
            return Err(RouteMasterError::config(format!(
                "Account.AccountId must be a 12 digit account id, got '{account_id}'"
            )));
        }
        if self.account.region.is_empty() {
            return Err(RouteMasterError::config("Account.Region must not be empty"));
        }
        if let Some(role) = self.roles.iter().find(|r| r.domains.is_empty()) {
            return Err(RouteMasterError::config(format!(
                "Role for OUs {:?} lists no domains",
                role.organizational_units
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
pub(crate) const SAMPLE_CONFIG: &str = r#"{
    "Organization": {"OrgId": "test-org-id", "OrgRootId": "test-org-root-id", "OrgAccountId": "123456789012"},
    "Account": {"AccountId": "111111111111", "Region": "us-east-1"},
    "DelegationSet": {"CallerReference": "test-ref"},
    "Zones": [
        {"Name": "acme.com", "ShareWith": ["org1"], "UpdateNameservers": true},
        {"Name": "example.com", "ShareWith": ["org1"]}
    ],
    "Roles": [
        {"OrganizationalUnits": ["org1"], "Domains": ["*.dev.acme.com"]},
        {"OrganizationalUnits": ["org1"], "Domains": ["dev.acme.com", "*dev.example.com"]}
    ]
}"#;
