use serde::Serialize;
use std::fs;
use std::path::Path;

use crate::errors::Result;
use crate::utils::log_utils::Logger;

/// Where a single policy on a single bucket ended up this run
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PolicyState {
    /// Found on the bucket before this run; left untouched
    AlreadyPresent,
    /// Created by this run
    Applied,
    /// Not attempted (earlier step for this bucket failed, or the target
    /// class takes no tiering sub-configuration)
    Skipped,
    Failed(String),
}

impl PolicyState {
    fn describe(&self) -> String {
        match self {
            PolicyState::AlreadyPresent => "already present".to_string(),
            PolicyState::Applied => "applied".to_string(),
            PolicyState::Skipped => "skipped".to_string(),
            PolicyState::Failed(msg) => format!("failed: {msg}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BucketReport {
    pub bucket: String,
    pub lifecycle: PolicyState,
    pub tiering: PolicyState,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    pub region: String,
    pub buckets: Vec<BucketReport>,
}

impl RunSummary {
    pub fn log(&self, logger: &Logger) {
        logger.normal(&format!(
            "{} bucket(s) reconciled in {}",
            self.buckets.len(),
            self.region
        ));
        for report in &self.buckets {
            logger.normal(&format!(
                "  {}: lifecycle {}, tiering {}",
                report.bucket,
                report.lifecycle.describe(),
                report.tiering.describe()
            ));
        }
    }
}

/// Write the run summary as pretty-printed JSON
pub fn write_summary(summary: &RunSummary, path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(summary)?;
    fs::write(path, json)?;
    Ok(())
}
