//! AWS IAM client wrapper for cross-account role operations

use crate::aws::{AwsError, AwsResult};
use aws_sdk_iam::Client as IamClient;

/// Tag marking roles managed by this tool
const MANAGED_BY_TAG: (&str, &str) = ("managed-by", "route-master");

pub struct AwsIamClient {
    client: IamClient,
}

impl AwsIamClient {
    pub fn new(client: IamClient) -> Self {
        Self { client }
    }

    /// Trust policy of an existing role, `None` when the role does not exist
    pub async fn get_role_trust_policy(
        &self,
        role_name: &str,
    ) -> AwsResult<Option<serde_json::Value>> {
        let response = match self.client.get_role().role_name(role_name).send().await {
            Ok(response) => response,
            Err(e)
                if e.as_service_error()
                    .is_some_and(|se| se.is_no_such_entity_exception()) =>
            {
                return Ok(None);
            }
            Err(e) => {
                return Err(AwsError::IamError(format!(
                    "Failed to get role '{role_name}': {e:?}"
                )))
            }
        };

        let document = response
            .role()
            .and_then(|role| role.assume_role_policy_document())
            .ok_or_else(|| {
                AwsError::IamError(format!("Role '{role_name}' has no trust policy"))
            })?;
        decode_policy_document(document).map(Some)
    }

    /// Inline policy of a role, `None` when it is not attached
    pub async fn get_role_policy(
        &self,
        role_name: &str,
        policy_name: &str,
    ) -> AwsResult<Option<serde_json::Value>> {
        match self
            .client
            .get_role_policy()
            .role_name(role_name)
            .policy_name(policy_name)
            .send()
            .await
        {
            Ok(response) => decode_policy_document(response.policy_document()).map(Some),
            Err(e)
                if e.as_service_error()
                    .is_some_and(|se| se.is_no_such_entity_exception()) =>
            {
                Ok(None)
            }
            Err(e) => Err(AwsError::IamError(format!(
                "Failed to get role policy '{policy_name}' of role '{role_name}': {e:?}"
            ))),
        }
    }

    pub async fn create_role(&self, role_name: &str, trust_policy: &str) -> AwsResult<()> {
        let tag = aws_sdk_iam::types::Tag::builder()
            .key(MANAGED_BY_TAG.0)
            .value(MANAGED_BY_TAG.1)
            .build()
            .map_err(|e| AwsError::IamError(format!("Failed to build role tag: {e}")))?;

        self.client
            .create_role()
            .role_name(role_name)
            .assume_role_policy_document(trust_policy)
            .description("Cross-account Route 53 record management")
            .tags(tag)
            .send()
            .await
            .map_err(|e| {
                AwsError::IamError(format!("Failed to create role '{role_name}': {e:?}"))
            })?;
        Ok(())
    }

    pub async fn update_assume_role_policy(
        &self,
        role_name: &str,
        trust_policy: &str,
    ) -> AwsResult<()> {
        self.client
            .update_assume_role_policy()
            .role_name(role_name)
            .policy_document(trust_policy)
            .send()
            .await
            .map_err(|e| {
                AwsError::IamError(format!(
                    "Failed to update trust policy of role '{role_name}': {e:?}"
                ))
            })?;
        Ok(())
    }

    pub async fn put_role_policy(
        &self,
        role_name: &str,
        policy_name: &str,
        policy_document: &str,
    ) -> AwsResult<()> {
        self.client
            .put_role_policy()
            .role_name(role_name)
            .policy_name(policy_name)
            .policy_document(policy_document)
            .send()
            .await
            .map_err(|e| {
                AwsError::IamError(format!(
                    "Failed to put role policy '{policy_name}' on role '{role_name}': {e:?}"
                ))
            })?;
        Ok(())
    }
}

/// IAM returns policy documents URL-encoded
pub(crate) fn decode_policy_document(encoded: &str) -> AwsResult<serde_json::Value> {
    let decoded = percent_encoding::percent_decode_str(encoded)
        .decode_utf8()
        .map_err(|e| AwsError::PolicyError(format!("Failed to URL decode policy document: {e}")))?;

    serde_json::from_str(&decoded)
        .map_err(|e| AwsError::PolicyError(format!("Failed to parse policy document JSON: {e}")))
}
