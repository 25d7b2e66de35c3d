//! version.rs
//! Format-generation guard.
//!
//! A mismatch is advisory: it is reported as a `VersionCheck` and the caller's
//! `VersionPolicy` decides whether processing continues.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

use crate::constants::{SOURCE_VERSION_PREFIX, TARGET_VERSION_PREFIX};

/// What to do when a document declares an unexpected generation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum VersionPolicy {
    /// Log a warning and continue.
    Proceed,
    /// Stop with `VersionMismatch`.
    #[default]
    Abort,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VersionCheck {
    Match { found: String },
    Mismatch { expected: &'static str, found: String },
}

impl VersionCheck {
    pub fn is_match(&self) -> bool {
        matches!(self, VersionCheck::Match { .. })
    }

    /// Apply `policy` to this check.
    pub fn enforce(&self, policy: VersionPolicy) -> Result<(), VersionMismatch> {
        match (self, policy) {
            (VersionCheck::Match { .. }, _) => Ok(()),
            (VersionCheck::Mismatch { expected, found }, VersionPolicy::Proceed) => {
                warn!(expected = %expected, found = %found, "unexpected document version, proceeding");
                Ok(())
            }
            (VersionCheck::Mismatch { expected, found }, VersionPolicy::Abort) => Err(VersionMismatch {
                expected,
                found: found.clone(),
            }),
        }
    }
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("version mismatch: expected {expected}x, found {found}")]
pub struct VersionMismatch {
    pub expected: &'static str,
    pub found: String,
}

pub fn check_version(found: &str, expected_prefix: &'static str) -> VersionCheck {
    if found.starts_with(expected_prefix) {
        VersionCheck::Match { found: found.to_string() }
    } else {
        VersionCheck::Mismatch { expected: expected_prefix, found: found.to_string() }
    }
}

/// Expanded input must be a `3.x` document.
pub fn check_source_version(found: &str) -> VersionCheck {
    check_version(found, SOURCE_VERSION_PREFIX)
}

/// Compact output must be a `4.x` document.
pub fn check_target_version(found: &str) -> VersionCheck {
    check_version(found, TARGET_VERSION_PREFIX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn source_prefix_matches() {
        assert!(check_source_version("3.3.0").is_match());
        assert!(!check_source_version("2.6.0").is_match());
        assert!(!check_source_version("unknown").is_match());
    }

    #[test]
    fn mismatch_obeys_policy() {
        let check = check_target_version("3.2.0");
        assert!(check.enforce(VersionPolicy::Proceed).is_ok());
        let err = check.enforce(VersionPolicy::Abort).unwrap_err();
        assert_eq!(err.found, "3.2.0");
        assert_eq!(err.to_string(), "version mismatch: expected 4.x, found 3.2.0");
    }
}
