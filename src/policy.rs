use aws_sdk_s3::error::BuildError;
use aws_sdk_s3::types::{
    BucketLifecycleConfiguration, ExpirationStatus, IntelligentTieringAccessTier,
    IntelligentTieringConfiguration, IntelligentTieringStatus, LifecycleRule, LifecycleRuleFilter,
    Tiering, Transition,
};

use crate::args::{Args, TargetClass};

pub const DEFAULT_REGION: &str = "us-west-2";
pub const DEFAULT_TRANSITION_DAYS: i32 = 1;
pub const DEFAULT_TIERING_DAYS: i32 = 365;

/// Id of the single lifecycle rule this tool manages
pub const LIFECYCLE_RULE_ID: &str = "IntelligentTierRule";
/// Id of the single intelligent-tiering configuration this tool manages
pub const TIERING_CONFIG_ID: &str = "DeepArchive365";

/// Policy parameters resolved from the command line. Validated by
/// `Args::validate` before anything here runs.
#[derive(Debug, Clone)]
pub struct PolicyConfig {
    pub region: String,
    pub transition_days: i32,
    pub tiering_days: i32,
    pub target_class: TargetClass,
}

impl PolicyConfig {
    pub fn from_args(args: &Args) -> Self {
        Self {
            region: args.region.clone(),
            transition_days: args.transition_days,
            tiering_days: args.tiering_days,
            target_class: args.target_class,
        }
    }
}

/// One enabled rule, empty prefix (all objects), one transition into the
/// target storage class after `transition_days`.
pub fn lifecycle_configuration(
    config: &PolicyConfig,
) -> Result<BucketLifecycleConfiguration, BuildError> {
    let rule = LifecycleRule::builder()
        .id(LIFECYCLE_RULE_ID)
        .status(ExpirationStatus::Enabled)
        .filter(LifecycleRuleFilter::builder().prefix("").build())
        .transitions(
            Transition::builder()
                .days(config.transition_days)
                .storage_class(config.target_class.as_transition_class())
                .build(),
        )
        .build()?;

    BucketLifecycleConfiguration::builder().rules(rule).build()
}

/// One enabled tiering entry moving objects into the deep-archive access
/// tier after `tiering_days`.
pub fn tiering_configuration(
    config: &PolicyConfig,
) -> Result<IntelligentTieringConfiguration, BuildError> {
    let tiering = Tiering::builder()
        .days(config.tiering_days)
        .access_tier(IntelligentTieringAccessTier::DeepArchiveAccess)
        .build()?;

    IntelligentTieringConfiguration::builder()
        .id(TIERING_CONFIG_ID)
        .status(IntelligentTieringStatus::Enabled)
        .tierings(tiering)
        .build()
}
