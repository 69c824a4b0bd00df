// crates/hexaville-cli/src/packager.rs
// ============================================================================
// Module: Lambda Packager
// Description: Bundles the build artifact into a function deployment archive.
// Purpose: Produce the zip uploaded to object storage on deploy.
// Dependencies: hexaville-core, thiserror, walkdir, zip
// ============================================================================

//! ## Overview
//! The function runtime executes a small Node.js shim (`index.js`) that
//! spawns the compiled server once per invocation. The packager writes the
//! shim next to the executable, copies the application's `assets/` tree,
//! and zips everything the shim needs into `.hexaville/lambda-package.zip`.
//!
//! ## Invariants
//! - The executable keeps mode 0755 inside the archive.
//! - Archive entries are ordered by name, so rebuilding unchanged inputs
//!   yields the same entry list.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fs;
use std::fs::File;
use std::io::Write;
use std::path::Path;
use std::path::PathBuf;

use hexaville_core::BuildArtifact;
use thiserror::Error;
use walkdir::WalkDir;
use zip::ZipWriter;
use zip::write::SimpleFileOptions;

use crate::templates;
use crate::templates::TemplateError;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Directory under the application that receives the archive.
pub const PACKAGE_DIR_NAME: &str = ".hexaville";
/// Archive file name.
pub const PACKAGE_FILE_NAME: &str = "lambda-package.zip";
/// Static asset directory name.
pub const ASSETS_DIR_NAME: &str = "assets";
/// Shim entry point file name.
pub const INDEX_FILE_NAME: &str = "index.js";
/// Shim helper file name.
pub const BYLINE_FILE_NAME: &str = "byline.js";
/// Mode of executable entries.
const EXECUTABLE_MODE: u32 = 0o755;
/// Mode of regular entries.
const REGULAR_MODE: u32 = 0o644;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Packaging failures.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PackageError {
    /// Filesystem failure.
    #[error("{path}: {error}")]
    Io {
        /// Path being read or written.
        path: String,
        /// Underlying error text.
        error: String,
    },
    /// The build produced no executable.
    #[error("executable {0} was not found; build first")]
    MissingExecutable(String),
    /// Archive writer failure.
    #[error("zip error: {0}")]
    Zip(String),
    /// Embedded template unavailable.
    #[error(transparent)]
    Template(#[from] TemplateError),
}

// ============================================================================
// SECTION: Entry Selection
// ============================================================================

/// One file to add to the archive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageEntry {
    /// Name inside the archive (`/`-separated).
    pub name: String,
    /// Source file on disk.
    pub source: PathBuf,
    /// Unix mode stored for the entry.
    pub mode: u32,
}

/// Returns true for shared libraries (`*.so` and versioned `*.so.*`).
#[must_use]
pub fn is_shared_library(file_name: &str) -> bool {
    file_name.ends_with(".so") || file_name.contains(".so.")
}

/// Lists the archive entries for `artifact`, sorted by name.
///
/// # Errors
///
/// Returns [`PackageError`] when the artifact directory cannot be read or
/// holds no executable.
pub fn collect_entries(artifact: &BuildArtifact) -> Result<Vec<PackageEntry>, PackageError> {
    let destination = artifact.destination();
    let executable = artifact.executable_path();
    if !executable.is_file() {
        return Err(PackageError::MissingExecutable(executable.display().to_string()));
    }

    let mut entries = vec![PackageEntry {
        name: artifact.executable_name.clone(),
        source: executable,
        mode: EXECUTABLE_MODE,
    }];
    for name in [INDEX_FILE_NAME, BYLINE_FILE_NAME] {
        entries.push(PackageEntry {
            name: name.to_string(),
            source: destination.join(name),
            mode: REGULAR_MODE,
        });
    }

    let listing = fs::read_dir(destination).map_err(io_error(destination))?;
    for entry in listing {
        let entry = entry.map_err(io_error(destination))?;
        let file_name = entry.file_name().to_string_lossy().into_owned();
        if is_shared_library(&file_name) && entry.path().is_file() {
            entries.push(PackageEntry {
                name: file_name,
                source: entry.path(),
                mode: REGULAR_MODE,
            });
        }
    }

    let assets = destination.join(ASSETS_DIR_NAME);
    if assets.is_dir() {
        for entry in WalkDir::new(&assets).follow_links(true) {
            let entry = entry.map_err(|err| PackageError::Io {
                path: assets.display().to_string(),
                error: err.to_string(),
            })?;
            if !entry.file_type().is_file() {
                continue;
            }
            let Ok(relative) = entry.path().strip_prefix(destination) else {
                continue;
            };
            entries.push(PackageEntry {
                name: archive_name(relative),
                source: entry.path().to_path_buf(),
                mode: REGULAR_MODE,
            });
        }
    }

    entries.sort_by(|left, right| left.name.cmp(&right.name));
    Ok(entries)
}

/// Joins path components with `/`.
fn archive_name(relative: &Path) -> String {
    relative
        .components()
        .map(|component| component.as_os_str().to_string_lossy().into_owned())
        .collect::<Vec<_>>()
        .join("/")
}

// ============================================================================
// SECTION: Packaging
// ============================================================================

/// Returns the archive path for an application directory.
#[must_use]
pub fn package_path(app_dir: &Path) -> PathBuf {
    app_dir.join(PACKAGE_DIR_NAME).join(PACKAGE_FILE_NAME)
}

/// Writes the shim files into the artifact directory.
///
/// # Errors
///
/// Returns [`PackageError`] when a template is missing or a write fails.
pub fn write_shim(artifact: &BuildArtifact) -> Result<(), PackageError> {
    let index = templates::render(
        templates::template(templates::LAMBDA_INDEX)?,
        &[("executablePath", artifact.executable_name.as_str())],
    );
    let destination = artifact.destination();
    write_file(&destination.join(INDEX_FILE_NAME), index.as_bytes())?;
    write_file(
        &destination.join(BYLINE_FILE_NAME),
        templates::template(templates::LAMBDA_BYLINE)?.as_bytes(),
    )
}

/// Copies `{app_dir}/assets` into the artifact directory when present.
///
/// # Errors
///
/// Returns [`PackageError::Io`] when a copy fails.
pub fn copy_assets(app_dir: &Path, artifact: &BuildArtifact) -> Result<usize, PackageError> {
    let source_root = app_dir.join(ASSETS_DIR_NAME);
    if !source_root.is_dir() {
        return Ok(0);
    }
    let target_root = artifact.destination().join(ASSETS_DIR_NAME);
    let mut copied = 0;
    for entry in WalkDir::new(&source_root).follow_links(true) {
        let entry = entry.map_err(|err| PackageError::Io {
            path: source_root.display().to_string(),
            error: err.to_string(),
        })?;
        let Ok(relative) = entry.path().strip_prefix(&source_root) else {
            continue;
        };
        let target = target_root.join(relative);
        if entry.file_type().is_dir() {
            fs::create_dir_all(&target).map_err(io_error(&target))?;
        } else if entry.file_type().is_file() {
            fs::copy(entry.path(), &target).map_err(io_error(&target))?;
            copied += 1;
        }
    }
    Ok(copied)
}

/// Packages the artifact and returns the archive path.
///
/// # Errors
///
/// Returns [`PackageError`] when any step fails.
pub fn package(app_dir: &Path, artifact: &BuildArtifact) -> Result<PathBuf, PackageError> {
    write_shim(artifact)?;
    copy_assets(app_dir, artifact)?;
    let entries = collect_entries(artifact)?;
    let archive = package_path(app_dir);
    if let Some(parent) = archive.parent() {
        fs::create_dir_all(parent).map_err(io_error(parent))?;
    }
    write_archive(&archive, &entries)?;
    Ok(archive)
}

/// Writes `entries` into a new zip at `archive`.
///
/// # Errors
///
/// Returns [`PackageError`] when a source cannot be read or the archive
/// cannot be written.
pub fn write_archive(archive: &Path, entries: &[PackageEntry]) -> Result<(), PackageError> {
    let file = File::create(archive).map_err(io_error(archive))?;
    let mut writer = ZipWriter::new(file);
    for entry in entries {
        let bytes = fs::read(&entry.source).map_err(io_error(&entry.source))?;
        let options = SimpleFileOptions::default().unix_permissions(entry.mode);
        writer.start_file(entry.name.as_str(), options).map_err(zip_error)?;
        writer.write_all(&bytes).map_err(io_error(archive))?;
    }
    writer.finish().map_err(zip_error)?;
    Ok(())
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Writes `bytes` to `path`.
fn write_file(path: &Path, bytes: &[u8]) -> Result<(), PackageError> {
    fs::write(path, bytes).map_err(io_error(path))
}

/// Returns a mapper tagging io errors with `path`.
fn io_error(path: &Path) -> impl Fn(std::io::Error) -> PackageError + '_ {
    move |err| PackageError::Io {
        path: path.display().to_string(),
        error: err.to_string(),
    }
}

/// Converts a zip error.
fn zip_error(err: zip::result::ZipError) -> PackageError {
    PackageError::Zip(err.to_string())
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
    fn shared_library_names() {
        assert!(is_shared_library("libFoundation.so"));
        assert!(is_shared_library("libicuuc.so.55"));
        assert!(is_shared_library("libicuuc.so.55.1"));
        assert!(!is_shared_library("index.js"));
        assert!(!is_shared_library("solver"));
    }

    #[test]
    fn archive_names_use_forward_slashes() {
        let relative = Path::new("assets").join("css").join("site.css");
        assert_eq!(archive_name(&relative), "assets/css/site.css");
    }
}
