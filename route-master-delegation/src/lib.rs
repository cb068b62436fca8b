//! This crate provides the core logic for RouteMaster, cross-account Route 53
//! delegation within an AWS Organization:
//! - Domain pattern classification and record name normalization
//! - IAM condition synthesis for `route53:ChangeResourceRecordSets`
//! - Zone registry and delegation planning (hosted zones, RAM sharing)
//! - Guarded provisioning of the planned roles in IAM
//!

mod aws;
pub mod client;
pub mod commands;
pub mod config;
pub mod domain;
mod error;
pub mod registry;
pub mod synthesis;
mod types;
pub mod zones;

// Re-exports for a small, focused public API
pub use aws::AwsError;
pub use client::HostedZoneClient;
pub use commands::{plan, RouteMasterService};
pub use config::ProvisioningConfig;
pub use domain::{
    classify, extract_namespace_domain, extract_tld, is_pattern_domain, is_plain_subdomain,
    is_wildcard_subdomain, normalize_domain, DomainClass,
};
pub use error::{RouteMasterError, RouteMasterResult};
pub use registry::ZoneRegistry;
pub use synthesis::{build_match_sets, create_role, MatchSets};
pub use types::{
    AccountContext, ActionType, AppliedRole, ApplyOptions, ApplyResult, ConditionBlock,
    ConditionOperator, ExecutionRole, GetAtt, OrganizationSettings, PlannedResource,
    PolicyDocument, Principal, ProvisioningPlan, RoleDescriptor, RoleOutcome, Statement, Value,
    HOSTED_ZONE_ARN_ATTRIBUTE, NORMALIZED_RECORD_NAMES_KEY, POLICY_VERSION,
    PRINCIPAL_ORG_PATHS_KEY, ZONE_ID_ATTRIBUTE,
};
pub use zones::{HostedZoneListing, ReusableDelegationSet, ZoneDelegation};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_sample_domains() {
        assert_eq!(classify("*.dev.acme.com"), DomainClass::WildcardSubdomain);
        assert_eq!(classify("dev*.acme.com"), DomainClass::PatternDomain);
        assert_eq!(classify("dev.acme.com"), DomainClass::PlainSubdomain);
        assert!(matches!(classify("localhost"), DomainClass::Invalid(_)));
        assert_eq!(normalize_domain("*.dev.acme.com"), "\\052.dev.acme.com");
    }
}
