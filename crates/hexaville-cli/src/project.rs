// crates/hexaville-cli/src/project.rs
// ============================================================================
// Module: Project Generator
// Description: Scaffolds a new application from embedded templates.
// Purpose: Back the `generate` command.
// Dependencies: hexaville-config, rand, thiserror
// ============================================================================

//! ## Overview
//! A generated project holds a `Hexavillefile.yml`, a `Package.swift` for
//! the selected toolchain major version, and a sample server under
//! `Sources/{name}`. Each project gets its own bucket name with a random
//! suffix so two projects with the same name do not collide.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fs;
use std::path::Path;
use std::path::PathBuf;

use hexaville_config::DEFAULT_HEXAVILLEFILE_NAME;
use hexaville_config::SwiftVersion;
use hexaville_config::Version;
use rand::Rng;
use thiserror::Error;

use crate::templates;
use crate::templates::TemplateError;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Default toolchain version of new projects.
pub const DEFAULT_SWIFT_VERSION: Version = Version::new(4, 2, 0);
/// Oldest supported toolchain major version.
pub const MIN_SWIFT_MAJOR: u32 = 4;
/// Newest supported toolchain major version.
pub const MAX_SWIFT_MAJOR: u32 = 5;
/// Maximum bucket name length accepted by object storage.
pub const MAX_BUCKET_NAME_LENGTH: usize = 63;
/// Length of the random bucket suffix.
pub const HASH_ID_LENGTH: usize = 8;
/// Package manifest file name.
const PACKAGE_MANIFEST_NAME: &str = "Package.swift";
/// Characters used for random ids.
const HASH_ID_ALPHABET: &[u8] = b"abcdefghijklmnopqrstuvwxyz0123456789";

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Project generation failures.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ProjectError {
    /// A package manifest already exists at the target.
    #[error("project already created at {0}")]
    AlreadyCreated(String),
    /// The project name cannot be used as a directory name.
    #[error("invalid project name: {0}")]
    InvalidName(String),
    /// The toolchain version is outside the supported range.
    #[error("swift {0} is not supported; use a 4.x or 5.x toolchain")]
    UnsupportedSwiftVersion(String),
    /// Filesystem failure.
    #[error("{path}: {error}")]
    Io {
        /// Path being written.
        path: String,
        /// Underlying error text.
        error: String,
    },
    /// Embedded template unavailable.
    #[error(transparent)]
    Template(#[from] TemplateError),
}

// ============================================================================
// SECTION: Naming
// ============================================================================

/// Returns a random lower-case alphanumeric id.
#[must_use]
pub fn random_hash_id() -> String {
    let mut rng = rand::thread_rng();
    (0..HASH_ID_LENGTH)
        .map(|_| char::from(HASH_ID_ALPHABET[rng.gen_range(0..HASH_ID_ALPHABET.len())]))
        .collect()
}

/// Builds `hexaville-{name}-{hash_id}-bucket`, truncating the name so the
/// result fits [`MAX_BUCKET_NAME_LENGTH`].
#[must_use]
pub fn bucket_name(app_name: &str, hash_id: &str) -> String {
    let prefix = "hexaville-";
    let suffix = format!("-{hash_id}-bucket");
    let room = MAX_BUCKET_NAME_LENGTH.saturating_sub(prefix.len() + suffix.len());
    let sanitized: String = app_name
        .to_lowercase()
        .chars()
        .filter(|ch| ch.is_ascii_lowercase() || ch.is_ascii_digit() || *ch == '-')
        .take(room)
        .collect();
    format!("{prefix}{sanitized}{suffix}")
}

// ============================================================================
// SECTION: Generation
// ============================================================================

/// Inputs of the `generate` command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerateOptions {
    /// Project name.
    pub name: String,
    /// Parent directory of the project.
    pub dest: PathBuf,
    /// Toolchain version.
    pub swift_version: SwiftVersion,
    /// Random bucket suffix.
    pub hash_id: String,
}

impl GenerateOptions {
    /// Creates options with the default toolchain and a fresh hash id.
    #[must_use]
    pub fn new(name: impl Into<String>, dest: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            dest: dest.into(),
            swift_version: SwiftVersion::Release(DEFAULT_SWIFT_VERSION),
            hash_id: random_hash_id(),
        }
    }

    /// Returns the project directory.
    #[must_use]
    pub fn project_dir(&self) -> PathBuf {
        self.dest.join(&self.name)
    }
}

/// Generates the project and returns its directory.
///
/// # Errors
///
/// Returns [`ProjectError`] when the name or toolchain is unsupported, the
/// project already exists, or a file cannot be written.
pub fn generate(options: &GenerateOptions) -> Result<PathBuf, ProjectError> {
    validate_name(&options.name)?;
    let major = options.swift_version.comparable().major;
    if !(MIN_SWIFT_MAJOR..=MAX_SWIFT_MAJOR).contains(&major) {
        return Err(ProjectError::UnsupportedSwiftVersion(options.swift_version.to_string()));
    }

    let project_dir = options.project_dir();
    let manifest_path = project_dir.join(PACKAGE_MANIFEST_NAME);
    if manifest_path.exists() {
        return Err(ProjectError::AlreadyCreated(project_dir.display().to_string()));
    }

    let bucket = bucket_name(&options.name, &options.hash_id);
    let swift_version = options.swift_version.version_string();
    let lower = options.name.to_lowercase();
    let values = [
        ("appName", options.name.as_str()),
        ("appNameLower", lower.as_str()),
        ("bucketName", bucket.as_str()),
        ("swiftVersion", swift_version.as_str()),
    ];

    let sources_dir = project_dir.join("Sources").join(&options.name);
    create_dir(&sources_dir)?;
    write_rendered(
        &project_dir.join(DEFAULT_HEXAVILLEFILE_NAME),
        templates::template(templates::PROJECT_HEXAVILLEFILE)?,
        &values,
    )?;
    write_rendered(
        &project_dir.join(".gitignore"),
        templates::template(templates::PROJECT_GITIGNORE)?,
        &values,
    )?;
    write_rendered(&manifest_path, templates::package_manifest(major)?, &values)?;
    write_rendered(
        &sources_dir.join("main.swift"),
        templates::template(templates::PROJECT_MAIN)?,
        &values,
    )?;
    Ok(project_dir)
}

/// Rejects names that are empty or would escape the destination.
fn validate_name(name: &str) -> Result<(), ProjectError> {
    let valid = !name.is_empty()
        && name != "."
        && name != ".."
        && !name.contains(['/', '\\'])
        && !name.chars().any(char::is_control);
    if valid {
        Ok(())
    } else {
        Err(ProjectError::InvalidName(name.to_string()))
    }
}

/// Creates `path` and its parents.
fn create_dir(path: &Path) -> Result<(), ProjectError> {
    fs::create_dir_all(path).map_err(|err| ProjectError::Io {
        path: path.display().to_string(),
        error: err.to_string(),
    })
}

/// Renders `template` with `values` into `path`.
fn write_rendered(
    path: &Path,
    template: &str,
    values: &[(&str, &str)],
) -> Result<(), ProjectError> {
    fs::write(path, templates::render(template, values)).map_err(|err| ProjectError::Io {
        path: path.display().to_string(),
        error: err.to_string(),
    })
}
