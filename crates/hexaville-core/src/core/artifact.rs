// crates/hexaville-core/src/core/artifact.rs
// ============================================================================
// Module: Build Artifact
// Description: Output of the external application build.
// Purpose: Locate the compiled executable and its routing manifest.
// Dependencies: crate::core::manifest
// ============================================================================

//! ## Overview
//! The builder produces a directory with the compiled executable and a
//! `.routing-manifest.json`. Core only needs the directory and the
//! executable name.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::path::Path;
use std::path::PathBuf;

use crate::core::manifest::MANIFEST_FILE_NAME;

// ============================================================================
// SECTION: Types
// ============================================================================

/// Compiled application output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildArtifact {
    /// Directory holding the build output.
    pub destination_path: PathBuf,
    /// File name of the server executable.
    pub executable_name: String,
}

impl BuildArtifact {
    /// Creates a build artifact description.
    #[must_use]
    pub fn new(destination_path: impl Into<PathBuf>, executable_name: impl Into<String>) -> Self {
        Self {
            destination_path: destination_path.into(),
            executable_name: executable_name.into(),
        }
    }

    /// Returns the routing manifest path.
    #[must_use]
    pub fn manifest_path(&self) -> PathBuf {
        self.destination_path.join(MANIFEST_FILE_NAME)
    }

    /// Returns the executable path.
    #[must_use]
    pub fn executable_path(&self) -> PathBuf {
        self.destination_path.join(&self.executable_name)
    }

    /// Returns the destination directory.
    #[must_use]
    pub fn destination(&self) -> &Path {
        &self.destination_path
    }
}
