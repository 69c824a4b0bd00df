// crates/hexaville-config/src/version.rs
// ============================================================================
// Module: Swift Versions
// Description: Release and development-snapshot toolchain versions.
// Purpose: Parse the `swift.version` field and derive toolchain download URLs.
// Dependencies: serde, thiserror, time
// ============================================================================

//! ## Overview
//! A toolchain version is either a numeric release (`4.2`, `3.1.1`) or a
//! dated development snapshot (`swift-4.0-DEVELOPMENT-SNAPSHOT-2017-08-04-a`).
//! Both map to a comparable [`Version`]; snapshots additionally order by date.
//!
//! YAML readers often see `version: 4.2` as a float, so deserialization
//! accepts numbers as well as strings.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;
use std::str::FromStr;

use serde::Deserialize;
use serde::Deserializer;
use serde::de;
use thiserror::Error;
use time::Date;
use time::macros::format_description;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Marker separating the branch from the date in snapshot names.
pub const SNAPSHOT_IDENTIFIER: &str = "DEVELOPMENT-SNAPSHOT";
/// Base URL of toolchain downloads.
pub const DOWNLOAD_BASE_URL: &str = "https://swift.org/builds";
/// Linux distribution the build container uses.
pub const TOOLCHAIN_OS_NAME: &str = "ubuntu16.04";

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Version parsing errors.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum VersionError {
    /// Empty version string.
    #[error("version must be non-empty")]
    Empty,
    /// Non-numeric or over-long release version.
    #[error("invalid version: {0}")]
    Invalid(String),
    /// Snapshot name not matching the expected layout.
    #[error("invalid development snapshot name: {0}")]
    InvalidSnapshot(String),
}

// ============================================================================
// SECTION: Version
// ============================================================================

/// Numeric `major.minor.patch` version.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Version {
    /// Major component.
    pub major: u32,
    /// Minor component.
    pub minor: u32,
    /// Patch component.
    pub patch: u32,
}

impl Version {
    /// Creates a version.
    #[must_use]
    pub const fn new(major: u32, minor: u32, patch: u32) -> Self {
        Self {
            major,
            minor,
            patch,
        }
    }
}

impl FromStr for Version {
    type Err = VersionError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(VersionError::Empty);
        }
        let components = trimmed
            .split('.')
            .map(|part| part.parse::<u32>().map_err(|_| VersionError::Invalid(value.to_string())))
            .collect::<Result<Vec<_>, _>>()?;
        match components.as_slice() {
            [major] => Ok(Self::new(*major, 0, 0)),
            [major, minor] => Ok(Self::new(*major, *minor, 0)),
            [major, minor, patch] => Ok(Self::new(*major, *minor, *patch)),
            _ => Err(VersionError::Invalid(value.to_string())),
        }
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)?;
        if self.patch > 0 {
            write!(f, ".{}", self.patch)?;
        }
        Ok(())
    }
}

// ============================================================================
// SECTION: Development Snapshot
// ============================================================================

/// Dated development snapshot of a release branch.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DevelopmentSnapshot {
    /// Full snapshot name as written in the Hexavillefile.
    pub full_name: String,
    /// Branch version (`major.minor`).
    pub branch: Version,
    /// Snapshot date.
    pub date: Date,
}

impl DevelopmentSnapshot {
    /// Returns the `yyyy-MM-dd` date label.
    #[must_use]
    pub fn date_label(&self) -> String {
        format!("{:04}-{:02}-{:02}", self.date.year(), u8::from(self.date.month()), self.date.day())
    }
}

impl FromStr for DevelopmentSnapshot {
    type Err = VersionError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let invalid = || VersionError::InvalidSnapshot(value.to_string());
        let separator = format!("-{SNAPSHOT_IDENTIFIER}-");
        let (head, tail) = value.split_once(&separator).ok_or_else(invalid)?;
        let branch = head.strip_prefix("swift-").ok_or_else(invalid)?;
        let (major, minor) = branch.split_once('.').ok_or_else(invalid)?;
        let major = major.parse::<u32>().map_err(|_| invalid())?;
        let minor = minor.parse::<u32>().map_err(|_| invalid())?;
        let (date_text, _suffix) = tail.rsplit_once('-').ok_or_else(invalid)?;
        let date = Date::parse(date_text, format_description!("[year]-[month]-[day]"))
            .map_err(|_| invalid())?;
        Ok(Self {
            full_name: value.to_string(),
            branch: Version::new(major, minor, 0),
            date,
        })
    }
}

impl PartialOrd for DevelopmentSnapshot {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for DevelopmentSnapshot {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.branch
            .cmp(&other.branch)
            .then_with(|| self.date.cmp(&other.date))
            .then_with(|| self.full_name.cmp(&other.full_name))
    }
}

// ============================================================================
// SECTION: Swift Version
// ============================================================================

/// Toolchain version selected in the Hexavillefile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SwiftVersion {
    /// Numbered release.
    Release(Version),
    /// Development snapshot.
    DevelopmentSnapshot(DevelopmentSnapshot),
}

impl SwiftVersion {
    /// Returns the version as written in generated files.
    #[must_use]
    pub fn version_string(&self) -> String {
        match self {
            Self::Release(version) => version.to_string(),
            Self::DevelopmentSnapshot(snapshot) => snapshot.full_name.clone(),
        }
    }

    /// Returns the numeric version used for comparisons.
    #[must_use]
    pub const fn comparable(&self) -> Version {
        match self {
            Self::Release(version) => *version,
            Self::DevelopmentSnapshot(snapshot) => snapshot.branch,
        }
    }

    /// Returns the toolchain tarball URL.
    #[must_use]
    pub fn download_url(&self) -> String {
        let os_dir = TOOLCHAIN_OS_NAME.replace('.', "");
        match self {
            Self::Release(version) => format!(
                "{DOWNLOAD_BASE_URL}/swift-{version}-release/{os_dir}/swift-{version}-RELEASE/swift-{version}-RELEASE-{TOOLCHAIN_OS_NAME}.tar.gz"
            ),
            Self::DevelopmentSnapshot(snapshot) => format!(
                "{DOWNLOAD_BASE_URL}/swift-{branch}-branch/{os_dir}/{name}/{name}-{TOOLCHAIN_OS_NAME}.tar.gz",
                branch = snapshot.branch,
                name = snapshot.full_name,
            ),
        }
    }
}

impl FromStr for SwiftVersion {
    type Err = VersionError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        if value.contains(SNAPSHOT_IDENTIFIER) {
            return value.parse().map(Self::DevelopmentSnapshot);
        }
        value.parse().map(Self::Release)
    }
}

impl fmt::Display for SwiftVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.version_string())
    }
}

impl<'de> Deserialize<'de> for SwiftVersion {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(SwiftVersionVisitor)
    }
}

/// Accepts strings and bare YAML numbers.
struct SwiftVersionVisitor;

impl de::Visitor<'_> for SwiftVersionVisitor {
    type Value = SwiftVersion;

    fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str("a swift version string")
    }

    fn visit_str<E: de::Error>(self, value: &str) -> Result<Self::Value, E> {
        value.parse().map_err(E::custom)
    }

    fn visit_u64<E: de::Error>(self, value: u64) -> Result<Self::Value, E> {
        self.visit_str(&value.to_string())
    }

    fn visit_i64<E: de::Error>(self, value: i64) -> Result<Self::Value, E> {
        self.visit_str(&value.to_string())
    }

    fn visit_f64<E: de::Error>(self, value: f64) -> Result<Self::Value, E> {
        self.visit_str(&value.to_string())
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================

#[cfg(test)]
mod tests {
    #![allow(
        clippy::panic,
        clippy::unwrap_used,
        clippy::expect_used,
        reason = "Test fixtures use explicit asserts and unwraps for clarity."
    )]

    use super::*;

    #[test]
    fn release_display_omits_zero_patch() {
        assert_eq!(Version::new(4, 0, 0).to_string(), "4.0");
        assert_eq!(Version::new(3, 1, 1).to_string(), "3.1.1");
    }

    #[test]
    fn release_parse_pads_missing_components() {
        assert_eq!("5".parse::<Version>().unwrap(), Version::new(5, 0, 0));
        assert_eq!("4.2".parse::<Version>().unwrap(), Version::new(4, 2, 0));
    }

    #[test]
    fn release_parse_rejects_garbage() {
        assert_eq!("".parse::<Version>(), Err(VersionError::Empty));
        assert!("3.foo".parse::<Version>().is_err());
        assert!("1.2.3.4".parse::<Version>().is_err());
    }

    #[test]
    fn snapshot_rejects_missing_date() {
        let result = "swift-4.0-DEVELOPMENT-SNAPSHOT-a".parse::<DevelopmentSnapshot>();
        assert!(matches!(result, Err(VersionError::InvalidSnapshot(_))));
    }

    #[test]
    fn snapshot_date_label_round_trips() {
        let snapshot =
            "swift-4.0-DEVELOPMENT-SNAPSHOT-2017-08-04-a".parse::<DevelopmentSnapshot>().unwrap();
        assert_eq!(snapshot.date_label(), "2017-08-04");
        assert_eq!(snapshot.branch, Version::new(4, 0, 0));
    }
}
