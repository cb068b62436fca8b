//! Error types for zone delegation planning and role provisioning

use crate::aws::AwsError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RouteMasterError {
    #[error("Invalid domain '{domain}': {reason}")]
    InvalidDomain { domain: String, reason: String },

    #[error("Zone {zone} for domain {domain} must be shared with RAM before a role can be created for it. Use share_zone_with_ram first.")]
    ZoneNotShared { domain: String, zone: String },

    #[error("Zone {0} already provisioned.")]
    DuplicateZone(String),

    #[error("Zone {0} must be added before sharing. Use add_zone first.")]
    ZoneNotAdded(String),

    #[error("Role {0} is already planned. Start each role's domain list with a different namespace.")]
    DuplicateRole(String),

    #[error("Logical id {logical_id} for {name} is already used by another planned resource")]
    DuplicateLogicalId { logical_id: String, name: String },

    #[error("At least one domain is required to create a Route 53 role")]
    EmptyDomainList,

    #[error("At least one organizational unit is required to assume role {0}")]
    EmptyOrganizationalUnits(String),

    #[error("Invalid IAM name '{name}': {reason}")]
    InvalidRoleName { name: String, reason: String },

    #[error("No matching zones found for name: {0}")]
    NoMatchingZone(String),

    #[error("Multiple zones matched the criteria for name: {0}")]
    MultipleMatchingZones(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("{context} is not known until the plan is deployed; supply a hosted zone listing or an existing delegation set")]
    UnresolvedValue { context: String },

    #[error("Caller account {caller_account} does not match the zone account {zone_account}")]
    AccountMismatch {
        zone_account: String,
        caller_account: String,
    },

    #[error(transparent)]
    Aws(#[from] AwsError),
}

impl RouteMasterError {
    pub fn invalid_domain(domain: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidDomain {
            domain: domain.into(),
            reason: reason.into(),
        }
    }

    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }
}

pub type RouteMasterResult<T> = Result<T, RouteMasterError>;
