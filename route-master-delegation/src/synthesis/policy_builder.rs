//! Policy synthesis (deterministic JSON generation)

use super::conditions::MatchSets;
use crate::types::{
    ConditionOperator, OrganizationSettings, PolicyDocument, Principal, Statement, Value,
    NORMALIZED_RECORD_NAMES_KEY, PRINCIPAL_ORG_PATHS_KEY,
};

pub const GET_CHANGE_ACTION: &str = "route53:GetChange";
pub const CHANGE_RECORD_SETS_ACTION: &str = "route53:ChangeResourceRecordSets";
pub const ASSUME_ROLE_ACTION: &str = "sts:AssumeRole";

/// Statements granting record changes in `zone_arns` limited to the match sets.
///
/// `route53:GetChange` is always allowed so callers can poll change status.
/// Each condition statement is only emitted when its set is non-empty.
pub fn build_route53_statements(match_sets: &MatchSets, zone_arns: &[Value]) -> Vec<Statement> {
    let mut statements = vec![
        Statement::allow(vec![GET_CHANGE_ACTION.to_string()], vec![Value::literal("*")])
            .with_sid("AllowGetChange"),
    ];

    if !match_sets.string_equals.is_empty() {
        statements.push(
            Statement::allow(
                vec![CHANGE_RECORD_SETS_ACTION.to_string()],
                zone_arns.to_vec(),
            )
            .with_sid("AllowExactRecordNames")
            .with_condition(
                ConditionOperator::ForAllValuesStringEquals,
                NORMALIZED_RECORD_NAMES_KEY,
                match_sets.string_equals.clone(),
            ),
        );
    }

    if !match_sets.string_like.is_empty() {
        statements.push(
            Statement::allow(
                vec![CHANGE_RECORD_SETS_ACTION.to_string()],
                zone_arns.to_vec(),
            )
            .with_sid("AllowRecordNamePatterns")
            .with_condition(
                ConditionOperator::ForAllValuesStringLike,
                NORMALIZED_RECORD_NAMES_KEY,
                match_sets.string_like.clone(),
            ),
        );
    }

    statements
}

/// Trust policy letting any principal inside the given OUs assume the role
pub fn build_trust_policy(org: &OrganizationSettings, ou_ids: &[String]) -> PolicyDocument {
    let ou_paths = ou_ids.iter().map(|ou| org.ou_path(ou)).collect();
    PolicyDocument::new(vec![Statement::allow(
        vec![ASSUME_ROLE_ACTION.to_string()],
        Vec::new(),
    )
    .with_principal(Principal::Aws("*".to_string()))
    .with_condition(
        ConditionOperator::ForAnyValueStringLike,
        PRINCIPAL_ORG_PATHS_KEY,
        ou_paths,
    )])
}

/// Trust policy for a role assumed by an AWS service
pub fn build_service_trust_policy(service: &str) -> PolicyDocument {
    PolicyDocument::new(vec![Statement::allow(
        vec![ASSUME_ROLE_ACTION.to_string()],
        Vec::new(),
    )
    .with_principal(Principal::Service(service.to_string()))])
}
