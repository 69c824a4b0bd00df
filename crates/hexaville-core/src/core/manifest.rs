// crates/hexaville-core/src/core/manifest.rs
// ============================================================================
// Module: Route Manifest
// Description: Desired (path, method) routes produced by the application build.
// Purpose: Load and expose the routing manifest consumed by reconciliation.
// Dependencies: serde, serde_json, thiserror
// ============================================================================

//! ## Overview
//! The build step writes `.routing-manifest.json` next to the compiled
//! executable. The file is a JSON object with a `routing` array of
//! `{path, method}` entries. A manifest is loaded once per deployment and is
//! immutable afterwards. Duplicate entries are tolerated; reconciliation is
//! idempotent, so re-applying the same route is harmless.
//!
//! Route paths are normalized on the way in: empty segments are dropped, so
//! `/items/` and `//items` both name `/items`. Every later comparison against
//! gateway resource paths relies on that canonical form.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use serde::Deserialize;
use serde::Deserializer;
use serde::Serialize;
use thiserror::Error;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// File name of the routing manifest inside the build destination.
pub const MANIFEST_FILE_NAME: &str = ".routing-manifest.json";
/// Maximum accepted manifest size in bytes.
pub const MAX_MANIFEST_BYTES: usize = 4 * 1024 * 1024;
/// Path of the gateway root resource.
pub const ROOT_PATH: &str = "/";

// ============================================================================
// SECTION: Types
// ============================================================================

/// A single declared route.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RouteEntry {
    /// Normalized slash-delimited route path; `/` is the root.
    #[serde(deserialize_with = "deserialize_path")]
    pub path: String,
    /// HTTP verb token as declared by the application.
    pub method: String,
}

impl RouteEntry {
    /// Creates a route entry.
    #[must_use]
    pub fn new(path: impl Into<String>, method: impl Into<String>) -> Self {
        Self {
            path: normalize_path(&path.into()),
            method: method.into(),
        }
    }

    /// Returns the method upper-cased, as the gateway stores it.
    #[must_use]
    pub fn normalized_method(&self) -> String {
        self.method.to_uppercase()
    }
}

/// Ordered set of declared routes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteManifest {
    /// Routes in declaration order.
    #[serde(rename = "routing")]
    routes: Vec<RouteEntry>,
}

/// Route manifest loading errors.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ManifestError {
    /// The build did not produce a manifest file.
    #[error("routing manifest not found: {0}")]
    Missing(String),
    /// The manifest could not be read or parsed.
    #[error("routing manifest malformed: {0}")]
    Malformed(String),
}

// ============================================================================
// SECTION: Implementation
// ============================================================================

impl RouteManifest {
    /// Creates a manifest from routes in declaration order.
    #[must_use]
    pub fn new(routes: Vec<RouteEntry>) -> Self {
        let routes = routes
            .into_iter()
            .map(|entry| RouteEntry {
                path: normalize_path(&entry.path),
                method: entry.method,
            })
            .collect();
        Self {
            routes,
        }
    }

    /// Loads a manifest from disk.
    ///
    /// # Errors
    ///
    /// Returns [`ManifestError::Missing`] when the file does not exist and
    /// [`ManifestError::Malformed`] when it cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self, ManifestError> {
        let bytes = match fs::read(path) {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                return Err(ManifestError::Missing(path.display().to_string()));
            }
            Err(err) => return Err(ManifestError::Malformed(err.to_string())),
        };
        if bytes.len() > MAX_MANIFEST_BYTES {
            return Err(ManifestError::Malformed(format!(
                "manifest exceeds size limit ({} > {MAX_MANIFEST_BYTES})",
                bytes.len()
            )));
        }
        Self::from_json_slice(&bytes)
    }

    /// Parses a manifest from JSON bytes.
    ///
    /// # Errors
    ///
    /// Returns [`ManifestError::Malformed`] when the JSON is invalid or an
    /// entry lacks `path` or `method`.
    pub fn from_json_slice(bytes: &[u8]) -> Result<Self, ManifestError> {
        serde_json::from_slice(bytes).map_err(|err| ManifestError::Malformed(err.to_string()))
    }

    /// Returns the routes in declaration order.
    #[must_use]
    pub fn routes(&self) -> &[RouteEntry] {
        &self.routes
    }

    /// Returns true when the manifest declares no routes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    /// Returns all entries declared for exactly `path`.
    pub fn entries_for_path<'a>(&'a self, path: &'a str) -> impl Iterator<Item = &'a RouteEntry> {
        self.routes.iter().filter(move |entry| entry.path == path)
    }

    /// Returns true when `path` is a strict ancestor of a declared route.
    #[must_use]
    pub fn has_descendant_of(&self, path: &str) -> bool {
        if path == ROOT_PATH {
            return self.routes.iter().any(|entry| entry.path != ROOT_PATH);
        }
        let prefix = format!("{path}/");
        self.routes.iter().any(|entry| entry.path.starts_with(&prefix))
    }
}

// ============================================================================
// SECTION: Path Normalization
// ============================================================================

/// Drops empty segments from `path`; a path without segments is the root.
#[must_use]
pub fn normalize_path(path: &str) -> String {
    let segments: Vec<&str> = path.split('/').filter(|segment| !segment.is_empty()).collect();
    if segments.is_empty() {
        ROOT_PATH.to_string()
    } else {
        format!("/{}", segments.join("/"))
    }
}

/// Deserializes a route path into its normalized form.
fn deserialize_path<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    String::deserialize(deserializer).map(|path| normalize_path(&path))
}
