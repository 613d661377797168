use mockall::predicate as testing;

use aws_sdk_s3::operation::get_bucket_intelligent_tiering_configuration::GetBucketIntelligentTieringConfigurationOutput;
use aws_sdk_s3::operation::get_bucket_lifecycle_configuration::GetBucketLifecycleConfigurationOutput;

use s3_lifecycle_mgr::args::Args;
use s3_lifecycle_mgr::errors::S3OpError;
use s3_lifecycle_mgr::interfaces::MockBucketLifecycleApi;
use s3_lifecycle_mgr::policy::{self, PolicyConfig, TIERING_CONFIG_ID};
use s3_lifecycle_mgr::reconcile::reconcile_bucket;
use s3_lifecycle_mgr::summary::PolicyState;
use s3_lifecycle_mgr::utils::log_utils::Logger;

fn lifecycle_absent() -> S3OpError {
    S3OpError::Api {
        code: Some("NoSuchLifecycleConfiguration".to_string()),
        message: "The lifecycle configuration does not exist".to_string(),
    }
}

fn tiering_absent() -> S3OpError {
    S3OpError::Api {
        code: Some("NoSuchConfiguration".to_string()),
        message: "The specified configuration does not exist.".to_string(),
    }
}

fn access_denied() -> S3OpError {
    S3OpError::Api {
        code: Some("AccessDenied".to_string()),
        message: "Access Denied".to_string(),
    }
}

#[test]
fn test_failed_lifecycle_put_stops_the_bucket() {
    let config = PolicyConfig::from_args(&Args::default());
    let logger = Logger::new(0);

    let mut api = MockBucketLifecycleApi::new();
    api.expect_get_lifecycle_configuration()
        .with(testing::eq("solo"))
        .times(1)
        .returning(|_| Err(lifecycle_absent()));
    api.expect_put_lifecycle_configuration()
        .times(1)
        .returning(|_, _| Err(access_denied()));
    // No tiering expectations: any tiering call would panic the mock.

    let report = reconcile_bucket(&api, &config, &logger, "solo");
    assert!(matches!(report.lifecycle, PolicyState::Failed(_)));
    assert_eq!(report.tiering, PolicyState::Skipped);
}

#[test]
fn test_unexpected_fetch_error_leaves_bucket_unmanaged() {
    let config = PolicyConfig::from_args(&Args::default());
    let logger = Logger::new(0);

    let mut api = MockBucketLifecycleApi::new();
    api.expect_get_lifecycle_configuration()
        .with(testing::eq("solo"))
        .times(1)
        .returning(|_| Err(access_denied()));
    // Neither put may run, and the tiering state is never probed.

    let report = reconcile_bucket(&api, &config, &logger, "solo");
    assert!(matches!(report.lifecycle, PolicyState::Failed(_)));
    assert_eq!(report.tiering, PolicyState::Skipped);
}

#[test]
fn test_dangling_lifecycle_without_tiering_gets_repaired() -> Result<(), Box<dyn std::error::Error>>
{
    let config = PolicyConfig::from_args(&Args::default());
    let logger = Logger::new(0);

    let expected_tiering = policy::tiering_configuration(&config)?;

    let mut api = MockBucketLifecycleApi::new();

    // Lifecycle rule left behind by an earlier interrupted run
    let existing = GetBucketLifecycleConfigurationOutput::builder()
        .rules(policy::lifecycle_configuration(&config)?.rules()[0].clone())
        .build();
    api.expect_get_lifecycle_configuration()
        .with(testing::eq("dangling"))
        .times(1)
        .returning(move |_| Ok(existing.clone()));

    // The lifecycle rule must not be re-applied, but the missing tiering
    // configuration must be.
    api.expect_get_intelligent_tiering_configuration()
        .with(testing::eq("dangling"), testing::eq(TIERING_CONFIG_ID))
        .times(1)
        .returning(|_, _| Err(tiering_absent()));
    api.expect_put_intelligent_tiering_configuration()
        .with(testing::eq("dangling"), testing::eq(expected_tiering.clone()))
        .times(1)
        .returning(|_, _| Ok(()));

    let confirmed = GetBucketIntelligentTieringConfigurationOutput::builder()
        .intelligent_tiering_configuration(expected_tiering.clone())
        .build();
    api.expect_get_intelligent_tiering_configuration()
        .with(testing::eq("dangling"), testing::eq(TIERING_CONFIG_ID))
        .times(1)
        .returning(move |_, _| Ok(confirmed.clone()));

    let report = reconcile_bucket(&api, &config, &logger, "dangling");
    assert_eq!(report.lifecycle, PolicyState::AlreadyPresent);
    assert_eq!(report.tiering, PolicyState::Applied);

    Ok(())
}

#[test]
fn test_sentinel_message_without_code_still_triggers_creation()
-> Result<(), Box<dyn std::error::Error>> {
    let config = PolicyConfig::from_args(&Args::default());
    let logger = Logger::new(0);

    let expected_lifecycle = policy::lifecycle_configuration(&config)?;
    let expected_tiering = policy::tiering_configuration(&config)?;

    let mut api = MockBucketLifecycleApi::new();
    api.expect_get_lifecycle_configuration()
        .with(testing::eq("legacy"))
        .times(1)
        .returning(|_| {
            Err(S3OpError::Api {
                code: None,
                message: "The lifecycle configuration does not exist".to_string(),
            })
        });
    api.expect_put_lifecycle_configuration()
        .with(testing::eq("legacy"), testing::eq(expected_lifecycle.clone()))
        .times(1)
        .returning(|_, _| Ok(()));
    api.expect_get_intelligent_tiering_configuration()
        .times(1)
        .returning(|_, _| Err(tiering_absent()));
    api.expect_put_intelligent_tiering_configuration()
        .with(testing::eq("legacy"), testing::eq(expected_tiering.clone()))
        .times(1)
        .returning(|_, _| Ok(()));
    // Confirmation read-back fails; outcome must stay Applied
    api.expect_get_intelligent_tiering_configuration()
        .times(1)
        .returning(|_, _| Err(S3OpError::Transport("timed out".to_string())));

    let report = reconcile_bucket(&api, &config, &logger, "legacy");
    assert_eq!(report.lifecycle, PolicyState::Applied);
    assert_eq!(report.tiering, PolicyState::Applied);

    Ok(())
}

#[test]
fn test_tiering_put_failure_is_reported_for_that_bucket()
-> Result<(), Box<dyn std::error::Error>> {
    let config = PolicyConfig::from_args(&Args::default());
    let logger = Logger::new(0);

    let mut api = MockBucketLifecycleApi::new();

    let existing = GetBucketLifecycleConfigurationOutput::builder()
        .rules(policy::lifecycle_configuration(&config)?.rules()[0].clone())
        .build();
    api.expect_get_lifecycle_configuration()
        .times(1)
        .returning(move |_| Ok(existing.clone()));
    api.expect_get_intelligent_tiering_configuration()
        .times(1)
        .returning(|_, _| Err(tiering_absent()));
    api.expect_put_intelligent_tiering_configuration()
        .times(1)
        .returning(|_, _| Err(access_denied()));
    // No confirmation read after a failed put.

    let report = reconcile_bucket(&api, &config, &logger, "solo");
    assert_eq!(report.lifecycle, PolicyState::AlreadyPresent);
    assert!(matches!(report.tiering, PolicyState::Failed(_)));

    Ok(())
}
