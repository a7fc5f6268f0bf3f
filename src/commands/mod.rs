//! CLI subcommands
//!
//! One-shot commands go straight to the storage backend; `shell` drives the
//! session state machine interactively.

pub mod buckets;
pub mod check_name;
pub mod get;
pub mod ls;
pub mod mb;
pub mod profile;
pub mod put;
pub mod rm;
pub mod shell;

pub use buckets::BucketsArgs;
pub use check_name::CheckNameArgs;
pub use get::GetArgs;
pub use ls::LsArgs;
pub use mb::MbArgs;
pub use profile::ProfileArgs;
pub use put::PutArgs;
pub use rm::RmArgs;
pub use shell::ShellArgs;

use crate::config::{ConfigError, ConnectionConfig};

/// Load and validate the connection profile, with guidance when missing.
pub(crate) fn load_profile() -> Result<ConnectionConfig, Box<dyn std::error::Error>> {
    match ConnectionConfig::load() {
        Ok(config) => Ok(config),
        Err(ConfigError::NotFound(path)) => Err(format!(
            "No connection profile found at {}\n\nRun 's3m profile init' to create one.",
            path.display()
        )
        .into()),
        Err(e) => Err(format!("Failed to load profile: {}", e).into()),
    }
}
