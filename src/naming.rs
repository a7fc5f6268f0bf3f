//! Bucket name validation
//!
//! S3 bucket names must be 3-63 characters of lowercase letters, digits,
//! dots and hyphens, start and end with a letter or digit, contain no
//! adjacent periods, not look like an IPv4 address, and not carry the
//! punycode `xn--` prefix. Checked locally before any network call.

use regex::Regex;
use std::sync::OnceLock;
use thiserror::Error;

/// Minimum bucket name length
pub const MIN_NAME_LEN: usize = 3;

/// Maximum bucket name length
pub const MAX_NAME_LEN: usize = 63;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NameError {
    #[error("bucket name must be between {MIN_NAME_LEN} and {MAX_NAME_LEN} characters")]
    Length,

    #[error("bucket name can only contain lowercase letters, numbers, dots, and hyphens, and must start and end with a letter or number")]
    Charset,

    #[error("bucket name cannot contain two adjacent periods")]
    AdjacentPeriods,

    #[error("bucket name cannot be formatted as an IP address")]
    IpFormat,

    #[error("bucket name cannot start with 'xn--'")]
    PunycodePrefix,
}

fn charset_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[a-z0-9][a-z0-9.-]*[a-z0-9]$").unwrap())
}

fn ipv4_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^\d+\.\d+\.\d+\.\d+$").unwrap())
}

/// Validate a candidate bucket name against S3 naming rules.
///
/// Rules are applied in order and the first failing rule wins, so a given
/// invalid name always reports the same single reason.
pub fn validate_bucket_name(name: &str) -> Result<(), NameError> {
    if name.len() < MIN_NAME_LEN || name.len() > MAX_NAME_LEN {
        return Err(NameError::Length);
    }

    if !charset_re().is_match(name) {
        return Err(NameError::Charset);
    }

    if name.contains("..") {
        return Err(NameError::AdjacentPeriods);
    }

    if ipv4_re().is_match(name) {
        return Err(NameError::IpFormat);
    }

    if name.starts_with("xn--") {
        return Err(NameError::PunycodePrefix);
    }

    Ok(())
}
