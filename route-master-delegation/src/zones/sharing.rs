//! RAM sharing with the AWS Organization
//!
//! Must run in the management account before zone ids can be shared with OUs.

use crate::synthesis::policy_builder::build_service_trust_policy;
use crate::types::{ExecutionRole, PlannedResource, PolicyDocument, Statement, Value};
use std::collections::BTreeMap;

pub const ORGANIZATION_SHARING_LOGICAL_ID: &str = "OrganizationSharing";
const LAMBDA_BASIC_EXECUTION_POLICY_ARN: &str =
    "arn:aws:iam::aws:policy/service-role/AWSLambdaBasicExecutionRole";

/// Plan `EnableSharingWithAwsOrganization` and the role that executes it
pub fn enable_sharing_with_organization() -> PlannedResource {
    let actions = [
        "ram:EnableSharingWithAwsOrganization",
        "organizations:DescribeOrganization",
        "organizations:EnableAWSServiceAccess",
        "iam:CreateServiceLinkedRole",
    ]
    .map(String::from)
    .to_vec();

    let inline_policies = BTreeMap::from([(
        "EnableSharingPolicy".to_string(),
        PolicyDocument::new(vec![Statement::allow(actions, vec![Value::literal("*")])]),
    )]);

    PlannedResource::OrganizationSharing {
        logical_id: ORGANIZATION_SHARING_LOGICAL_ID.to_string(),
        physical_id: "EnableSharingWithAwsOrganization".to_string(),
        execution_role: ExecutionRole {
            assume_role_policy: build_service_trust_policy("lambda.amazonaws.com"),
            managed_policy_arns: vec![LAMBDA_BASIC_EXECUTION_POLICY_ARN.to_string()],
            inline_policies,
        },
    }
}
