use crate::args::TargetClass;
use crate::errors::{AppError, Result, S3OpError};
use crate::interfaces::BucketLifecycleApi;
use crate::policy::{self, PolicyConfig, TIERING_CONFIG_ID};
use crate::summary::{BucketReport, PolicyState, RunSummary};
use crate::utils::log_utils::Logger;

/// Code S3 returns when a bucket has no lifecycle configuration
const LIFECYCLE_ABSENT_CODE: &str = "NoSuchLifecycleConfiguration";
/// Message-text fallback; some S3-compatible endpoints omit the code
const LIFECYCLE_ABSENT_MESSAGE: &str = "The lifecycle configuration does not exist";
/// Code S3 returns when the requested intelligent-tiering config id is absent
const TIERING_ABSENT_CODE: &str = "NoSuchConfiguration";

/// List the account's buckets once and reconcile each in listing order.
/// Only the listing call can abort the run; per-bucket failures are
/// reported and the walk continues.
pub fn reconcile_all(
    api: &dyn BucketLifecycleApi,
    config: &PolicyConfig,
    logger: &Logger,
) -> Result<RunSummary> {
    let buckets = api.list_buckets().map_err(AppError::ListBuckets)?;
    logger.info(&format!(
        "{} bucket(s) listed in {}",
        buckets.len(),
        config.region
    ));

    let reports = buckets
        .iter()
        .map(|bucket| reconcile_bucket(api, config, logger, bucket))
        .collect();

    Ok(RunSummary {
        region: config.region.clone(),
        buckets: reports,
    })
}

/// Converge one bucket. The lifecycle rule and the tiering configuration
/// are checked independently, so a bucket left with a lifecycle rule but
/// no tiering by an earlier interrupted run gets repaired here. The
/// tiering phase is skipped when the lifecycle phase failed, and when the
/// target class has no access tiers to configure.
pub fn reconcile_bucket(
    api: &dyn BucketLifecycleApi,
    config: &PolicyConfig,
    logger: &Logger,
    bucket: &str,
) -> BucketReport {
    logger.normal(&format!("Found bucket: {bucket}"));

    let lifecycle = ensure_lifecycle(api, config, logger, bucket);

    let tiering = match lifecycle {
        PolicyState::AlreadyPresent | PolicyState::Applied
            if config.target_class == TargetClass::IntelligentTiering =>
        {
            ensure_tiering(api, config, logger, bucket)
        }
        _ => PolicyState::Skipped,
    };

    BucketReport {
        bucket: bucket.to_string(),
        lifecycle,
        tiering,
    }
}

fn ensure_lifecycle(
    api: &dyn BucketLifecycleApi,
    config: &PolicyConfig,
    logger: &Logger,
    bucket: &str,
) -> PolicyState {
    match api.get_lifecycle_configuration(bucket) {
        Ok(existing) => {
            logger.normal(&format!(
                "{bucket}: lifecycle policy already present ({} rule(s))",
                existing.rules().len()
            ));
            logger.debug(&format!("{bucket}: {existing:?}"));
            PolicyState::AlreadyPresent
        }
        Err(err) if is_lifecycle_absent(&err) => {
            logger.normal(&format!("policy not found for {bucket}, applying policy"));
            let body = match policy::lifecycle_configuration(config) {
                Ok(body) => body,
                Err(e) => {
                    logger.error(&format!("{bucket}: invalid lifecycle policy body: {e}"));
                    return PolicyState::Failed(e.to_string());
                }
            };
            match api.put_lifecycle_configuration(bucket, body) {
                Ok(()) => {
                    logger.normal(&format!("policy applied to {bucket}"));
                    PolicyState::Applied
                }
                Err(e) => {
                    logger.error(&format!("{bucket}: couldn't apply lifecycle policy: {e}"));
                    PolicyState::Failed(e.to_string())
                }
            }
        }
        Err(err) => {
            // Anything other than a clean "does not exist" leaves the
            // bucket unmanaged rather than risking a conflicting write.
            logger.error(&format!("{bucket}: couldn't fetch lifecycle policy: {err}"));
            PolicyState::Failed(err.to_string())
        }
    }
}

fn ensure_tiering(
    api: &dyn BucketLifecycleApi,
    config: &PolicyConfig,
    logger: &Logger,
    bucket: &str,
) -> PolicyState {
    match api.get_intelligent_tiering_configuration(bucket, TIERING_CONFIG_ID) {
        Ok(existing) => {
            logger.normal(&format!(
                "{bucket}: tiering configuration {TIERING_CONFIG_ID} already present"
            ));
            logger.debug(&format!("{bucket}: {existing:?}"));
            PolicyState::AlreadyPresent
        }
        Err(err) if is_tiering_absent(&err) => {
            logger.normal(&format!(
                "tiering configuration not found for {bucket}, applying {TIERING_CONFIG_ID}"
            ));
            let body = match policy::tiering_configuration(config) {
                Ok(body) => body,
                Err(e) => {
                    logger.error(&format!("{bucket}: invalid tiering body: {e}"));
                    return PolicyState::Failed(e.to_string());
                }
            };
            match api.put_intelligent_tiering_configuration(bucket, body) {
                Ok(()) => {
                    logger.normal(&format!("tiering policy applied to {bucket}"));
                    confirm_tiering(api, logger, bucket);
                    PolicyState::Applied
                }
                Err(e) => {
                    logger.error(&format!("{bucket}: couldn't apply tiering policy: {e}"));
                    PolicyState::Failed(e.to_string())
                }
            }
        }
        Err(err) => {
            logger.error(&format!(
                "{bucket}: couldn't fetch tiering configuration: {err}"
            ));
            PolicyState::Failed(err.to_string())
        }
    }
}

// Best-effort read-back of the configuration just written; a failure here
// is reported but doesn't change the bucket's outcome.
fn confirm_tiering(api: &dyn BucketLifecycleApi, logger: &Logger, bucket: &str) {
    match api.get_intelligent_tiering_configuration(bucket, TIERING_CONFIG_ID) {
        Ok(confirmed) => logger.normal(&format!(
            "{bucket}: tiering configuration now {:?}",
            confirmed.intelligent_tiering_configuration()
        )),
        Err(e) => logger.error(&format!(
            "{bucket}: couldn't confirm tiering configuration: {e}"
        )),
    }
}

fn is_lifecycle_absent(err: &S3OpError) -> bool {
    match err {
        S3OpError::Api { code, message } => {
            code.as_deref() == Some(LIFECYCLE_ABSENT_CODE) || message == LIFECYCLE_ABSENT_MESSAGE
        }
        S3OpError::Transport(_) => false,
    }
}

fn is_tiering_absent(err: &S3OpError) -> bool {
    match err {
        S3OpError::Api { code, .. } => code.as_deref() == Some(TIERING_ABSENT_CODE),
        S3OpError::Transport(_) => false,
    }
}
