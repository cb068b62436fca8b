//! Member-account view of a delegated domain
//!
//! Resolves where the shared zone id is published and which cross-account
//! role to assume for record changes.

use crate::domain::{extract_namespace_domain, extract_tld};
use crate::error::RouteMasterResult;
use crate::synthesis::role_naming::{MULTI_ZONE_SUFFIX, ROLE_PREFIX};
use crate::types::AccountContext;
use crate::zones::zone_id_parameter_arn;

#[derive(Debug, Clone)]
pub struct HostedZoneClient {
    /// Account and region owning the zones
    zone_account: AccountContext,
    domain: String,
}

impl HostedZoneClient {
    pub fn new(zone_account: AccountContext, domain: impl Into<String>) -> Self {
        Self {
            zone_account,
            domain: domain.into(),
        }
    }

    pub fn zone_account(&self) -> &str {
        &self.zone_account.account_id
    }

    /// ARN of the shared SSM parameter holding the root zone's id
    pub fn hosted_zone_id_parameter_arn(&self) -> RouteMasterResult<String> {
        let zone = extract_tld(&self.domain)?;
        Ok(zone_id_parameter_arn(&self.zone_account, &zone))
    }

    /// ARN of the role created for this domain. `multi_zone` selects the role
    /// created for a batch whose first domain is this one.
    pub fn cross_account_role_arn(&self, multi_zone: bool) -> String {
        let suffix = if multi_zone { MULTI_ZONE_SUFFIX } else { "" };
        format!(
            "arn:aws:iam::{}:role/{}{}{}",
            self.zone_account.account_id,
            ROLE_PREFIX,
            extract_namespace_domain(&self.domain),
            suffix
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RouteMasterError;
    use crate::synthesis::role_name;

    fn client(domain: &str) -> HostedZoneClient {
        HostedZoneClient::new(
            AccountContext {
                account_id: "123456789012".to_string(),
                region: "us-east-1".to_string(),
            },
            domain,
        )
    }

    #[test]
    fn test_zone_account() {
        assert_eq!(client("dev.acme.com").zone_account(), "123456789012");
    }

    #[test]
    fn test_parameter_arn_uses_root_zone() {
        assert_eq!(
            client("dev.acme.com").hosted_zone_id_parameter_arn().unwrap(),
            "arn:aws:ssm:us-east-1:123456789012:parameter/shared/acme.com/zone-id"
        );
    }

    #[test]
    fn test_parameter_arn_requires_root_zone() {
        assert!(matches!(
            client("localhost").hosted_zone_id_parameter_arn(),
            Err(RouteMasterError::InvalidDomain { .. })
        ));
    }

    #[test]
    fn test_cross_account_role_arn() {
        assert_eq!(
            client("dev.acme.com").cross_account_role_arn(false),
            "arn:aws:iam::123456789012:role/R53-dev.acme.com"
        );
        assert_eq!(
            client("dev.acme.com").cross_account_role_arn(true),
            "arn:aws:iam::123456789012:role/R53-dev.acme.com-MtplZn"
        );
        assert_eq!(
            client("test.example.com").cross_account_role_arn(false),
            "arn:aws:iam::123456789012:role/R53-test.example.com"
        );
    }

    #[test]
    fn test_role_arn_matches_created_role_name() {
        let domain = "*.dev.acme.com";
        let arn = client(domain).cross_account_role_arn(false);
        assert!(arn.ends_with(&role_name(&[domain]).unwrap()));
    }
}
