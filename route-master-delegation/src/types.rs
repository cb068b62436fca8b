//! Shared types: IAM policy model, deferred values and planned resources

use crate::aws::AwsError;
use crate::error::{RouteMasterError, RouteMasterResult};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub const POLICY_VERSION: &str = "2012-10-17";

/// Condition key Route 53 evaluates against the normalized record names of a change batch
pub const NORMALIZED_RECORD_NAMES_KEY: &str = "route53:ChangeResourceRecordSetsNormalizedRecordNames";

/// Condition key holding the organization path of the calling principal
pub const PRINCIPAL_ORG_PATHS_KEY: &str = "aws:PrincipalOrgPaths";

/// Attributes a deployed `ZoneLookup` exposes: the bare zone id and
/// `arn:aws:route53:::hostedzone/{id}`
pub const ZONE_ID_ATTRIBUTE: &str = "ZoneId";
pub const HOSTED_ZONE_ARN_ATTRIBUTE: &str = "HostedZoneArn";

/// `operator -> key -> values`, ordered so that rendered JSON is deterministic
pub type ConditionBlock = BTreeMap<String, BTreeMap<String, Vec<String>>>;

/// AWS Organization the zones are delegated within
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct OrganizationSettings {
    /// e.g. `o-a1b2c3d4e5`
    pub org_id: String,
    /// Root id suffix, used as `r-{root}` and `ou-{root}-{ou}`
    pub org_root_id: String,
    /// Management account id
    pub org_account_id: String,
}

impl OrganizationSettings {
    /// `{orgId}/r-{orgRootId}/ou-{orgRootId}-{ouId}/`
    pub fn ou_path(&self, ou_id: &str) -> String {
        format!(
            "{}/r-{}/ou-{}-{}/",
            self.org_id, self.org_root_id, self.org_root_id, ou_id
        )
    }

    /// RAM principal ARN of an organizational unit
    pub fn ou_arn(&self, ou_id: &str) -> String {
        format!(
            "arn:aws:organizations::{}:ou/{}/ou-{}-{}",
            self.org_account_id, self.org_id, self.org_root_id, ou_id
        )
    }
}

/// Account and region hosting the zones
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct AccountContext {
    pub account_id: String,
    pub region: String,
}

/// Reference to an attribute of another planned resource
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GetAtt {
    #[serde(rename = "Fn::GetAtt")]
    pub target: [String; 2],
}

/// A string that is either known now or produced when another resource is deployed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Literal(String),
    Attribute(GetAtt),
}

impl Value {
    pub fn literal(value: impl Into<String>) -> Self {
        Self::Literal(value.into())
    }

    pub fn attribute(resource: impl Into<String>, attribute: impl Into<String>) -> Self {
        Self::Attribute(GetAtt {
            target: [resource.into(), attribute.into()],
        })
    }

    pub fn as_literal(&self) -> Option<&str> {
        match self {
            Self::Literal(value) => Some(value),
            Self::Attribute(_) => None,
        }
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Self::literal(value)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ActionType {
    Single(String),
    Multiple(Vec<String>),
}

impl ActionType {
    pub fn contains(&self, action: &str) -> bool {
        match self {
            Self::Single(a) => a == action,
            Self::Multiple(actions) => actions.iter().any(|a| a == action),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Principal {
    #[serde(rename = "AWS")]
    Aws(String),
    Service(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConditionOperator {
    ForAllValuesStringEquals,
    ForAllValuesStringLike,
    ForAnyValueStringLike,
}

impl ConditionOperator {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::ForAllValuesStringEquals => "ForAllValues:StringEquals",
            Self::ForAllValuesStringLike => "ForAllValues:StringLike",
            Self::ForAnyValueStringLike => "ForAnyValue:StringLike",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Statement {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sid: Option<String>,
    pub effect: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub principal: Option<Principal>,
    pub action: ActionType,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub resource: Vec<Value>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub condition: ConditionBlock,
}

impl Statement {
    pub fn allow(actions: Vec<String>, resources: Vec<Value>) -> Self {
        let action = match <[String; 1]>::try_from(actions) {
            Ok([single]) => ActionType::Single(single),
            Err(actions) => ActionType::Multiple(actions),
        };
        Self {
            sid: None,
            effect: "Allow".to_string(),
            principal: None,
            action,
            resource: resources,
            condition: ConditionBlock::new(),
        }
    }

    #[must_use]
    pub fn with_sid(mut self, sid: impl Into<String>) -> Self {
        self.sid = Some(sid.into());
        self
    }

    #[must_use]
    pub fn with_principal(mut self, principal: Principal) -> Self {
        self.principal = Some(principal);
        self
    }

    #[must_use]
    pub fn with_condition(
        mut self,
        operator: ConditionOperator,
        key: &str,
        values: Vec<String>,
    ) -> Self {
        self.condition
            .entry(operator.as_str().to_string())
            .or_default()
            .insert(key.to_string(), values);
        self
    }

    /// Values of `key` under `operator`, if the statement carries that condition
    pub fn condition_values(&self, operator: ConditionOperator, key: &str) -> Option<&[String]> {
        self.condition
            .get(operator.as_str())
            .and_then(|keys| keys.get(key))
            .map(Vec::as_slice)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct PolicyDocument {
    pub version: String,
    pub statement: Vec<Statement>,
}

impl PolicyDocument {
    pub fn new(statement: Vec<Statement>) -> Self {
        Self {
            version: POLICY_VERSION.to_string(),
            statement,
        }
    }

    /// Serialize for an IAM API call. Every resource must be a literal.
    pub fn to_resolved_json(&self, context: &str) -> RouteMasterResult<String> {
        let deferred = self
            .statement
            .iter()
            .flat_map(|s| s.resource.iter())
            .any(|r| r.as_literal().is_none());
        if deferred {
            return Err(RouteMasterError::UnresolvedValue {
                context: format!("A resource of {context}"),
            });
        }
        serde_json::to_string(self).map_err(|e| {
            RouteMasterError::from(AwsError::PolicyError(format!(
                "Failed to serialize {context}: {e}"
            )))
        })
    }
}

/// Cross-account role scoped to a batch of domains
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RoleDescriptor {
    pub role_name: String,
    pub policy_name: String,
    pub assume_role_policy: PolicyDocument,
    pub policy: PolicyDocument,
}

impl RoleDescriptor {
    pub fn statements(&self) -> &[Statement] {
        &self.policy.statement
    }
}

/// A request the deployment tool executes against the cloud control plane
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "Type", rename_all_fields = "PascalCase")]
pub enum PlannedResource {
    /// Route 53 `CreateReusableDelegationSet`
    ReusableDelegationSet {
        logical_id: String,
        caller_reference: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        hosted_zone_id: Option<String>,
    },
    /// Route 53 `CreateHostedZone`, public, bound to the delegation set
    HostedZone {
        logical_id: String,
        name: String,
        caller_reference: String,
        delegation_set_id: Value,
        comment: String,
        private_zone: bool,
    },
    /// Route 53 Domains `UpdateDomainNameservers`
    DomainNameservers {
        logical_id: String,
        domain_name: String,
        nameservers: Vec<Value>,
        physical_id: String,
    },
    /// Resolves a hosted zone id by name and comment when the zone is deployed.
    ///
    /// The deployer must publish both [`ZONE_ID_ATTRIBUTE`] and
    /// [`HOSTED_ZONE_ARN_ATTRIBUTE`]; parameters read the first, role
    /// policies the second.
    ZoneLookup {
        logical_id: String,
        zone_name: String,
        zone_description_filter: String,
    },
    /// SSM parameter publishing the zone id to member accounts
    ZoneIdParameter {
        logical_id: String,
        parameter_name: String,
        parameter_arn: String,
        value: Value,
        tier: String,
    },
    /// RAM resource share of the zone id parameter
    ResourceShare {
        logical_id: String,
        name: String,
        allow_external_principals: bool,
        resource_arns: Vec<String>,
        principals: Vec<String>,
        permission_arns: Vec<String>,
    },
    /// IAM role with one inline policy
    Role {
        logical_id: String,
        role: RoleDescriptor,
    },
    /// RAM `EnableSharingWithAwsOrganization`, run from the management account
    OrganizationSharing {
        logical_id: String,
        physical_id: String,
        execution_role: ExecutionRole,
    },
}

impl PlannedResource {
    pub fn logical_id(&self) -> &str {
        match self {
            Self::ReusableDelegationSet { logical_id, .. }
            | Self::HostedZone { logical_id, .. }
            | Self::DomainNameservers { logical_id, .. }
            | Self::ZoneLookup { logical_id, .. }
            | Self::ZoneIdParameter { logical_id, .. }
            | Self::ResourceShare { logical_id, .. }
            | Self::Role { logical_id, .. }
            | Self::OrganizationSharing { logical_id, .. } => logical_id,
        }
    }
}

/// Role assumed by a service to execute a planned request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ExecutionRole {
    pub assume_role_policy: PolicyDocument,
    pub managed_policy_arns: Vec<String>,
    pub inline_policies: BTreeMap<String, PolicyDocument>,
}

/// Ordered list of requests produced by one provisioning run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ProvisioningPlan {
    pub resources: Vec<PlannedResource>,
}

impl ProvisioningPlan {
    pub fn roles(&self) -> impl Iterator<Item = &RoleDescriptor> {
        self.resources.iter().filter_map(|resource| match resource {
            PlannedResource::Role { role, .. } => Some(role),
            _ => None,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ApplyOptions {
    /// Overwrite trust and inline policy of roles that already exist
    pub replace_existing: bool,
}

impl Default for ApplyOptions {
    fn default() -> Self {
        Self {
            replace_existing: true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RoleOutcome {
    Created,
    Updated,
    Unchanged,
    Skipped,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct AppliedRole {
    pub role_name: String,
    pub outcome: RoleOutcome,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ApplyResult {
    pub roles: Vec<AppliedRole>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn org() -> OrganizationSettings {
        OrganizationSettings {
            org_id: "test-org-id".to_string(),
            org_root_id: "test-org-root-id".to_string(),
            org_account_id: "123456789012".to_string(),
        }
    }

    #[test]
    fn test_ou_path_and_arn() {
        assert_eq!(
            org().ou_path("org1"),
            "test-org-id/r-test-org-root-id/ou-test-org-root-id-org1/"
        );
        assert_eq!(
            org().ou_arn("org1"),
            "arn:aws:organizations::123456789012:ou/test-org-id/ou-test-org-root-id-org1"
        );
    }

    #[test]
    fn test_statement_json_shape() {
        let statement = Statement::allow(
            vec!["route53:ChangeResourceRecordSets".to_string()],
            vec![Value::attribute("ZoneLookupacmecom", "HostedZoneArn")],
        )
        .with_condition(
            ConditionOperator::ForAllValuesStringLike,
            NORMALIZED_RECORD_NAMES_KEY,
            vec!["*.dev.acme.com".to_string()],
        );

        let json = serde_json::to_value(&statement).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "Effect": "Allow",
                "Action": "route53:ChangeResourceRecordSets",
                "Resource": [{"Fn::GetAtt": ["ZoneLookupacmecom", "HostedZoneArn"]}],
                "Condition": {
                    "ForAllValues:StringLike": {
                        "route53:ChangeResourceRecordSetsNormalizedRecordNames": ["*.dev.acme.com"]
                    }
                }
            })
        );
    }

    #[test]
    fn test_principal_json_shape() {
        let json = serde_json::to_value(Principal::Aws("*".to_string())).unwrap();
        assert_eq!(json, serde_json::json!({"AWS": "*"}));
        let json = serde_json::to_value(Principal::Service("lambda.amazonaws.com".into())).unwrap();
        assert_eq!(json, serde_json::json!({"Service": "lambda.amazonaws.com"}));
    }

    #[test]
    fn test_resolved_json_rejects_deferred_resources() {
        let policy = PolicyDocument::new(vec![Statement::allow(
            vec!["route53:GetChange".to_string()],
            vec![Value::attribute("Zone", "Arn")],
        )]);
        assert!(matches!(
            policy.to_resolved_json("policy"),
            Err(RouteMasterError::UnresolvedValue { .. })
        ));

        let policy = PolicyDocument::new(vec![Statement::allow(
            vec!["route53:GetChange".to_string()],
            vec![Value::literal("*")],
        )]);
        let json = policy.to_resolved_json("policy").unwrap();
        assert!(json.contains("2012-10-17"));
        assert!(json.contains("route53:GetChange"));
    }

    #[test]
    fn test_planned_resource_is_tagged_by_type() {
        let resource = PlannedResource::ZoneLookup {
            logical_id: "ZoneLookupacmecom".to_string(),
            zone_name: "acme.com".to_string(),
            zone_description_filter: "Managed by route-master".to_string(),
        };
        let json = serde_json::to_value(&resource).unwrap();
        assert_eq!(json["Type"], "ZoneLookup");
        assert_eq!(json["ZoneName"], "acme.com");
        assert_eq!(resource.logical_id(), "ZoneLookupacmecom");
    }
}
