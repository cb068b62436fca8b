//! STS helpers for caller identity

use crate::aws::{AwsError, AwsResult};
use aws_sdk_sts::Client as StsClient;

/// Return the current caller account ID using STS GetCallerIdentity.
///
/// Roles are only provisioned when this matches the zone account.
pub async fn caller_account_id(client: &StsClient) -> AwsResult<String> {
    let out = client
        .get_caller_identity()
        .send()
        .await
        .map_err(|e| AwsError::SdkError(format!("STS GetCallerIdentity failed: {e}")))?;
    out.account()
        .map(std::string::ToString::to_string)
        .ok_or_else(|| AwsError::SdkError("STS GetCallerIdentity missing Account".to_string()))
}
