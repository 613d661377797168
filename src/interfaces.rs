use crate::errors::S3OpError;
use aws_sdk_s3::operation::get_bucket_intelligent_tiering_configuration::GetBucketIntelligentTieringConfigurationOutput;
use aws_sdk_s3::operation::get_bucket_lifecycle_configuration::GetBucketLifecycleConfigurationOutput;
use aws_sdk_s3::types::{BucketLifecycleConfiguration, IntelligentTieringConfiguration};
use mockall::automock;

/// Interface over the five bucket-policy operations to facilitate testing
#[automock]
pub trait BucketLifecycleApi {
    /// Names of every bucket in the account, in listing order
    fn list_buckets(&self) -> Result<Vec<String>, S3OpError>;

    fn get_lifecycle_configuration(
        &self,
        bucket: &str,
    ) -> Result<GetBucketLifecycleConfigurationOutput, S3OpError>;

    fn put_lifecycle_configuration(
        &self,
        bucket: &str,
        configuration: BucketLifecycleConfiguration,
    ) -> Result<(), S3OpError>;

    fn get_intelligent_tiering_configuration(
        &self,
        bucket: &str,
        id: &str,
    ) -> Result<GetBucketIntelligentTieringConfigurationOutput, S3OpError>;

    fn put_intelligent_tiering_configuration(
        &self,
        bucket: &str,
        configuration: IntelligentTieringConfiguration,
    ) -> Result<(), S3OpError>;
}
