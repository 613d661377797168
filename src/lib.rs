pub mod args;
pub mod errors;
pub mod interfaces;
pub mod policy;
pub mod reconcile;
pub mod s3 {
    pub mod client;
}
pub mod summary;
pub mod utils {
    pub mod log_utils;
}

pub use args::Args;

use crate::errors::Result;
use crate::policy::PolicyConfig;
use crate::s3::client::S3LifecycleClient;
use crate::utils::log_utils::Logger;

/// Walk every bucket in the account and converge each one onto the
/// cost-optimization lifecycle policy.
pub fn run_app(args: &Args) -> Result<()> {
    let logger = Logger::new(args.verbose);
    let config = PolicyConfig::from_args(args);

    let client = S3LifecycleClient::new(&config)?;
    let summary = reconcile::reconcile_all(&client, &config, &logger)?;

    summary.log(&logger);
    if let Some(path) = &args.output_json {
        summary::write_summary(&summary, path)?;
        logger.info(&format!("run summary written to {}", path.display()));
    }

    Ok(())
}
