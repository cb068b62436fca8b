//! Apply logic: provision the planned cross-account roles in IAM

use crate::aws::sts::caller_account_id;
use crate::error::{RouteMasterError, RouteMasterResult};
use crate::types::{
    AppliedRole, ApplyOptions, ApplyResult, ProvisioningPlan, RoleDescriptor, RoleOutcome,
};
use log::{debug, info};

/// Role documents rendered for the IAM API
#[derive(Debug)]
struct ResolvedRole<'a> {
    role: &'a RoleDescriptor,
    trust_policy: String,
    policy: String,
}

impl super::service::RouteMasterService {
    /// Create or update every role in `plan` in the zone account.
    ///
    /// All documents are resolved before any AWS call, so a plan with deferred
    /// zone ids changes nothing. Refuses to run when the caller is not in
    /// `zone_account_id`.
    pub async fn apply(
        &self,
        plan: &ProvisioningPlan,
        zone_account_id: &str,
        options: ApplyOptions,
    ) -> RouteMasterResult<ApplyResult> {
        let resolved = resolve_roles(plan)?;

        let caller_account = caller_account_id(&self.sts_client).await?;
        if caller_account != zone_account_id {
            return Err(RouteMasterError::AccountMismatch {
                zone_account: zone_account_id.to_string(),
                caller_account,
            });
        }

        let mut result = ApplyResult::default();
        for role in resolved {
            let outcome = self.apply_role(&role, options).await?;
            info!("Role {}: {:?}", role.role.role_name, outcome);
            result.roles.push(AppliedRole {
                role_name: role.role.role_name.clone(),
                outcome,
            });
        }
        Ok(result)
    }

    async fn apply_role(
        &self,
        resolved: &ResolvedRole<'_>,
        options: ApplyOptions,
    ) -> RouteMasterResult<RoleOutcome> {
        let role_name = &resolved.role.role_name;
        let policy_name = &resolved.role.policy_name;

        let Some(existing_trust) = self.iam_client.get_role_trust_policy(role_name).await? else {
            self.iam_client
                .create_role(role_name, &resolved.trust_policy)
                .await?;
            self.iam_client
                .put_role_policy(role_name, policy_name, &resolved.policy)
                .await?;
            return Ok(RoleOutcome::Created);
        };

        if !options.replace_existing {
            debug!("Role {} exists, leaving it untouched", role_name);
            return Ok(RoleOutcome::Skipped);
        }

        let existing_policy = self
            .iam_client
            .get_role_policy(role_name, policy_name)
            .await?;
        let trust_changed = !same_document(Some(&existing_trust), &resolved.trust_policy);
        let policy_changed = !same_document(existing_policy.as_ref(), &resolved.policy);

        if trust_changed {
            self.iam_client
                .update_assume_role_policy(role_name, &resolved.trust_policy)
                .await?;
        }
        if policy_changed {
            self.iam_client
                .put_role_policy(role_name, policy_name, &resolved.policy)
                .await?;
        }

        Ok(if trust_changed || policy_changed {
            RoleOutcome::Updated
        } else {
            RoleOutcome::Unchanged
        })
    }
}

fn resolve_roles(plan: &ProvisioningPlan) -> RouteMasterResult<Vec<ResolvedRole<'_>>> {
    plan.roles()
        .map(|role| -> RouteMasterResult<ResolvedRole<'_>> {
            Ok(ResolvedRole {
                trust_policy: role
                    .assume_role_policy
                    .to_resolved_json(&format!("trust policy of {}", role.role_name))?,
                policy: role
                    .policy
                    .to_resolved_json(&format!("policy {}", role.policy_name))?,
                role,
            })
        })
        .collect()
}

/// Compare as JSON values so formatting and key order do not count as changes
fn same_document(existing: Option<&serde_json::Value>, desired: &str) -> bool {
    match (existing, serde_json::from_str::<serde_json::Value>(desired)) {
        (Some(existing), Ok(desired)) => *existing == desired,
        _ => false,
    }
}
