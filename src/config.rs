//! Connection profile
//!
//! The profile is stored in <config-dir>/s3m/profile.toml and holds the
//! endpoint, region, and credentials for one S3-compatible provider.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("TOML serialize error: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("Profile not found at {0}")]
    NotFound(PathBuf),

    #[error("Invalid profile: {0}")]
    Invalid(String),

    #[error("No config directory available on this system")]
    NoConfigDir,
}

/// S3-compatible storage provider
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    Aws,
    ArvanCloud,
    Custom,
}

impl Default for Provider {
    fn default() -> Self {
        Self::Aws
    }
}

impl Provider {
    /// Default endpoint for the provider, if it has a well-known one.
    pub fn default_endpoint(&self) -> Option<&'static str> {
        match self {
            Self::Aws => Some("https://s3.amazonaws.com"),
            Self::ArvanCloud => Some("https://s3.ir-thr-at1.arvanstorage.ir"),
            Self::Custom => None,
        }
    }

    /// Default region for the provider, if it has a well-known one.
    pub fn default_region(&self) -> Option<&'static str> {
        match self {
            Self::Aws => Some("us-east-1"),
            Self::ArvanCloud => Some("ir-thr-at1"),
            Self::Custom => None,
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Aws => "AWS",
            Self::ArvanCloud => "ArvanCloud",
            Self::Custom => "Custom",
        }
    }
}

/// A complete set of connection details for one provider.
///
/// Held in memory only for the lifetime of a connection and dropped on
/// disconnect.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ConnectionConfig {
    /// Storage provider
    #[serde(default)]
    pub provider: Provider,

    /// S3-compatible endpoint URL
    pub endpoint: String,

    /// Region name
    pub region: String,

    /// Access key ID
    pub access_key_id: String,

    /// Secret access key
    pub secret_access_key: String,
}

#[allow(dead_code)]
impl ConnectionConfig {
    /// Load the profile from the config directory.
    pub fn load() -> Result<Self, ConfigError> {
        let path = Self::profile_path()?;

        if !path.exists() {
            return Err(ConfigError::NotFound(path));
        }

        let content = fs::read_to_string(&path)?;
        let config: ConnectionConfig = toml::from_str(&content)?;

        config.validate()?;
        Ok(config)
    }

    /// Save the profile to the config directory.
    pub fn save(&self) -> Result<PathBuf, ConfigError> {
        let path = Self::profile_path()?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        fs::write(&path, content)?;

        Ok(path)
    }

    /// Path of the profile file.
    ///
    /// Honors S3M_CONFIG_DIR as an override, otherwise uses the platform
    /// config directory.
    pub fn profile_path() -> Result<PathBuf, ConfigError> {
        let dir = match std::env::var_os("S3M_CONFIG_DIR") {
            Some(dir) => PathBuf::from(dir),
            None => dirs::config_dir()
                .ok_or(ConfigError::NoConfigDir)?
                .join("s3m"),
        };
        Ok(dir.join("profile.toml"))
    }

    /// Validate the profile.
    ///
    /// Every field must be non-empty before a connection is attempted, the
    /// same checks the original applies before calling the provider.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.access_key_id.is_empty() {
            return Err(ConfigError::Invalid("access key cannot be empty".to_string()));
        }

        if self.secret_access_key.is_empty() {
            return Err(ConfigError::Invalid("secret key cannot be empty".to_string()));
        }

        if self.endpoint.is_empty() {
            return Err(ConfigError::Invalid("endpoint cannot be empty".to_string()));
        }

        if self.region.is_empty() {
            return Err(ConfigError::Invalid("region cannot be empty".to_string()));
        }

        Ok(())
    }

    /// Whether create-bucket calls must carry a LocationConstraint.
    ///
    /// AWS rejects an explicit constraint for its default region, so it is
    /// omitted exactly for AWS + us-east-1 and included everywhere else.
    pub fn needs_location_constraint(&self) -> bool {
        !(self.provider == Provider::Aws && self.region == "us-east-1")
    }

    /// Create a default/template profile.
    pub fn template() -> Self {
        let provider = Provider::Aws;
        Self {
            provider,
            endpoint: provider.default_endpoint().unwrap_or_default().to_string(),
            region: provider.default_region().unwrap_or_default().to_string(),
            access_key_id: String::new(),
            secret_access_key: String::new(),
        }
    }

    /// Generate template TOML content with comments.
    pub fn template_toml() -> String {
        r#"# s3m connection profile

# Provider: "aws", "arvancloud", or "custom"
provider = "aws"

# S3-compatible endpoint URL
# AWS:        https://s3.amazonaws.com
# ArvanCloud: https://s3.ir-thr-at1.arvanstorage.ir
endpoint = "https://s3.amazonaws.com"

# Region name (default regions: us-east-1 for AWS, ir-thr-at1 for ArvanCloud)
region = "us-east-1"

# Credentials (required)
access_key_id = ""
secret_access_key = ""
"#
        .to_string()
    }

    /// Write a template profile file, returning its path.
    pub fn write_template() -> Result<PathBuf, ConfigError> {
        let path = Self::profile_path()?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        fs::write(&path, Self::template_toml())?;

        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filled() -> ConnectionConfig {
        ConnectionConfig {
            provider: Provider::Aws,
            endpoint: "https://s3.amazonaws.com".to_string(),
            region: "us-east-1".to_string(),
            access_key_id: "AKIATEST".to_string(),
            secret_access_key: "secret".to_string(),
        }
    }

    #[test]
    fn test_provider_defaults() {
        assert_eq!(Provider::Aws.default_region(), Some("us-east-1"));
        assert_eq!(Provider::ArvanCloud.default_region(), Some("ir-thr-at1"));
        assert_eq!(Provider::Custom.default_endpoint(), None);
    }

    #[test]
    fn test_validation_rejects_empty_fields() {
        assert!(filled().validate().is_ok());

        let mut config = filled();
        config.access_key_id = String::new();
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));

        let mut config = filled();
        config.secret_access_key = String::new();
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));

        let mut config = filled();
        config.endpoint = String::new();
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));

        let mut config = filled();
        config.region = String::new();
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_location_constraint_rule() {
        let mut config = filled();
        assert!(!config.needs_location_constraint());

        config.region = "eu-west-1".to_string();
        assert!(config.needs_location_constraint());

        config.provider = Provider::ArvanCloud;
        config.region = "ir-thr-at1".to_string();
        assert!(config.needs_location_constraint());

        // Custom providers always get the constraint, even in us-east-1
        config.provider = Provider::Custom;
        config.region = "us-east-1".to_string();
        assert!(config.needs_location_constraint());
    }

    #[test]
    fn test_template_parses() {
        let config: ConnectionConfig = toml::from_str(&ConnectionConfig::template_toml()).unwrap();
        assert_eq!(config.provider, Provider::Aws);
        assert_eq!(config.region, "us-east-1");
        // Template ships without credentials on purpose
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_profile_parse() {
        let toml_content = r#"
provider = "arvancloud"
endpoint = "https://s3.ir-thr-at1.arvanstorage.ir"
region = "ir-thr-at1"
access_key_id = "key"
secret_access_key = "secret"
"#;

        let config: ConnectionConfig = toml::from_str(toml_content).unwrap();
        assert_eq!(config.provider, Provider::ArvanCloud);
        assert_eq!(config.region, "ir-thr-at1");
        assert!(config.validate().is_ok());
    }
}
