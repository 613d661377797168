use aws_config::{BehaviorVersion, Region};
use aws_sdk_s3::Client;
use aws_sdk_s3::error::{DisplayErrorContext, ProvideErrorMetadata, SdkError};
use aws_sdk_s3::operation::get_bucket_intelligent_tiering_configuration::GetBucketIntelligentTieringConfigurationOutput;
use aws_sdk_s3::operation::get_bucket_lifecycle_configuration::GetBucketLifecycleConfigurationOutput;
use aws_sdk_s3::types::{BucketLifecycleConfiguration, IntelligentTieringConfiguration};

use crate::errors::{Result, S3OpError};
use crate::interfaces::BucketLifecycleApi;
use crate::policy::PolicyConfig;

/// Real S3 client. Owns its tokio runtime so every trait method stays
/// synchronous; the reconciler processes buckets one at a time anyway.
pub struct S3LifecycleClient {
    client: Client,
    runtime: tokio::runtime::Runtime,
}

impl S3LifecycleClient {
    /// Build a client against the default credential chain with the
    /// configured region override.
    pub fn new(config: &PolicyConfig) -> Result<Self> {
        let runtime = tokio::runtime::Runtime::new()?;

        let sdk_config = runtime.block_on(
            aws_config::defaults(BehaviorVersion::latest())
                .region(Region::new(config.region.clone()))
                .load(),
        );

        Ok(Self {
            client: Client::new(&sdk_config),
            runtime,
        })
    }
}

impl BucketLifecycleApi for S3LifecycleClient {
    fn list_buckets(&self) -> std::result::Result<Vec<String>, S3OpError> {
        let output = self
            .runtime
            .block_on(self.client.list_buckets().send())
            .map_err(map_sdk_err)?;

        Ok(output
            .buckets()
            .iter()
            .filter_map(|b| b.name().map(str::to_string))
            .collect())
    }

    fn get_lifecycle_configuration(
        &self,
        bucket: &str,
    ) -> std::result::Result<GetBucketLifecycleConfigurationOutput, S3OpError> {
        self.runtime
            .block_on(
                self.client
                    .get_bucket_lifecycle_configuration()
                    .bucket(bucket)
                    .send(),
            )
            .map_err(map_sdk_err)
    }

    fn put_lifecycle_configuration(
        &self,
        bucket: &str,
        configuration: BucketLifecycleConfiguration,
    ) -> std::result::Result<(), S3OpError> {
        self.runtime
            .block_on(
                self.client
                    .put_bucket_lifecycle_configuration()
                    .bucket(bucket)
                    .lifecycle_configuration(configuration)
                    .send(),
            )
            .map_err(map_sdk_err)?;
        Ok(())
    }

    fn get_intelligent_tiering_configuration(
        &self,
        bucket: &str,
        id: &str,
    ) -> std::result::Result<GetBucketIntelligentTieringConfigurationOutput, S3OpError> {
        self.runtime
            .block_on(
                self.client
                    .get_bucket_intelligent_tiering_configuration()
                    .bucket(bucket)
                    .id(id)
                    .send(),
            )
            .map_err(map_sdk_err)
    }

    fn put_intelligent_tiering_configuration(
        &self,
        bucket: &str,
        configuration: IntelligentTieringConfiguration,
    ) -> std::result::Result<(), S3OpError> {
        let id = configuration.id().to_string();
        self.runtime
            .block_on(
                self.client
                    .put_bucket_intelligent_tiering_configuration()
                    .bucket(bucket)
                    .id(id)
                    .intelligent_tiering_configuration(configuration)
                    .send(),
            )
            .map_err(map_sdk_err)?;
        Ok(())
    }
}

/// Collapse the SDK's error tree into the two shapes the reconciler cares
/// about: a structured service error with code and message, or transport
/// noise.
fn map_sdk_err<E, R>(err: SdkError<E, R>) -> S3OpError
where
    E: ProvideErrorMetadata + std::error::Error + Send + Sync + 'static,
    R: std::fmt::Debug + 'static,
{
    match &err {
        SdkError::ServiceError(_) => S3OpError::Api {
            code: err.code().map(str::to_string),
            message: err
                .message()
                .unwrap_or("no message from service")
                .to_string(),
        },
        _ => S3OpError::Transport(DisplayErrorContext(&err).to_string()),
    }
}
