//! RouteMaster Service Layer
//!
//! Holds the AWS clients used to provision planned roles. Planning itself is
//! offline and lives in [`super::plan`].

use crate::aws::iam_client::AwsIamClient;
use crate::aws::AwsError;
use crate::error::RouteMasterResult;
use aws_sdk_iam::Client as IamClient;
use aws_sdk_sts::Client as StsClient;

pub struct RouteMasterService {
    pub(crate) iam_client: AwsIamClient,
    pub(crate) sts_client: StsClient,
}

impl RouteMasterService {
    /// Create a service with IAM and STS clients from the default credential provider chain.
    ///
    /// # Errors
    ///
    /// Returns an error if no region can be resolved.
    pub async fn new() -> RouteMasterResult<Self> {
        let config = aws_config::defaults(aws_config::BehaviorVersion::latest())
            .load()
            .await;

        if config.region().is_none() {
            return Err(AwsError::ConfigError(
                "No AWS region configured; set AWS_REGION or a profile region".to_string(),
            )
            .into());
        }

        Ok(Self {
            iam_client: AwsIamClient::new(IamClient::new(&config)),
            sts_client: StsClient::new(&config),
        })
    }

    // apply() method implementation is in apply.rs
}
