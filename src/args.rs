use aws_sdk_s3::types::TransitionStorageClass;
use clap::{Parser, ValueEnum};
use std::fs::{self, OpenOptions};
use std::path::PathBuf;

use crate::policy;

pub fn args_checks() -> Args {
    Args::parse()
}

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// AWS region the bucket listing call is made against
    #[arg(short, long, value_name = "REGION", default_value = policy::DEFAULT_REGION)]
    pub region: String,
    /// Days before objects transition to the target storage class
    #[arg(long, value_name = "DAYS", default_value_t = policy::DEFAULT_TRANSITION_DAYS)]
    pub transition_days: i32,
    /// Days before objects in intelligent tiering move to the deep-archive access tier
    #[arg(long, value_name = "DAYS", default_value_t = policy::DEFAULT_TIERING_DAYS)]
    pub tiering_days: i32,
    /// Storage class the lifecycle rule transitions objects into
    #[arg(long, default_value = "intelligent-tiering", value_parser = clap::value_parser!(TargetClass))]
    pub target_class: TargetClass,
    /// Optional path for a machine-readable run summary, parent dir must be writable
    #[arg(short, long, value_name = "JSON_FILE", value_parser = check_parent_dir_is_writeable)]
    pub output_json: Option<PathBuf>,
    /// Print extra stuff (-v for info, -v -v for debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

impl Args {
    /// Validate the policy parameters before any remote call is made
    pub fn validate(&self) -> Result<(), String> {
        if self.transition_days < 1 {
            return Err("transition-days must be at least 1.".to_string());
        }
        if !(180..=730).contains(&self.tiering_days) {
            return Err(
                "tiering-days must be between 180 and 730 for the deep-archive access tier."
                    .to_string(),
            );
        }
        Ok(())
    }
}

impl Default for Args {
    fn default() -> Self {
        Self {
            region: policy::DEFAULT_REGION.to_string(),
            transition_days: policy::DEFAULT_TRANSITION_DAYS,
            tiering_days: policy::DEFAULT_TIERING_DAYS,
            target_class: TargetClass::IntelligentTiering,
            output_json: None,
            verbose: 0,
        }
    }
}

/// Recognized transition targets for the lifecycle rule
#[derive(Clone, ValueEnum, Debug, Copy, PartialEq, Eq)]
pub enum TargetClass {
    IntelligentTiering,
    Glacier,
    DeepArchive,
}

impl TargetClass {
    pub fn as_transition_class(&self) -> TransitionStorageClass {
        match self {
            TargetClass::IntelligentTiering => TransitionStorageClass::IntelligentTiering,
            TargetClass::Glacier => TransitionStorageClass::Glacier,
            TargetClass::DeepArchive => TransitionStorageClass::DeepArchive,
        }
    }
}

// for a passed path, get the parent dir, check it exists and is writable
fn check_parent_dir_is_writeable(existing_file: &str) -> Result<PathBuf, String> {
    let path = PathBuf::from(existing_file).to_owned();
    let parent_path = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
        _ => PathBuf::from("."),
    };
    if parent_path.is_dir() && fs::metadata(&parent_path).is_ok() {
        let temp_file_path = parent_path.join(".temp_write_check");
        match OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(&temp_file_path)
        {
            Ok(_) => {
                let _ = fs::remove_file(&temp_file_path);
                Ok(path)
            }
            Err(e) => Err(format!(
                "Parent directory of {existing_file} is not writable: {e}"
            )),
        }
    } else {
        Err(format!("Parent directory of {existing_file} does not exist"))
    }
}
