// crates/hexaville-cli/src/templates.rs
// ============================================================================
// Module: Embedded Templates
// Description: Files compiled into the binary for packaging and scaffolding.
// Purpose: Ship the Lambda shim, build sandbox, and project skeleton.
// Dependencies: include_dir, thiserror
// ============================================================================

//! ## Overview
//! Templates live under `templates/` in this crate and are embedded at
//! compile time. Placeholders use the `{{name}}` form and are substituted by
//! [`render`].

// ============================================================================
// SECTION: Imports
// ============================================================================

use include_dir::Dir;
use include_dir::include_dir;
use thiserror::Error;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Embedded template tree.
static TEMPLATES: Dir<'_> = include_dir!("$CARGO_MANIFEST_DIR/templates");

/// Lambda entry point script.
pub const LAMBDA_INDEX: &str = "lambda/index.js";
/// Line splitter used by the entry point.
pub const LAMBDA_BYLINE: &str = "lambda/byline.js";
/// Build container definition.
pub const DOCKERFILE: &str = "docker/Dockerfile";
/// Build context exclusions.
pub const DOCKERIGNORE: &str = "docker/dockerignore";
/// In-container build script.
pub const BUILD_SCRIPT: &str = "docker/build-swift.sh";
/// Default Hexavillefile of a new project.
pub const PROJECT_HEXAVILLEFILE: &str = "project/Base/Hexavillefile.yml";
/// Git exclusions of a new project.
pub const PROJECT_GITIGNORE: &str = "project/Base/gitignore";
/// Sample server source of a new project.
pub const PROJECT_MAIN: &str = "project/Sources/main.swift";

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Template lookup failures.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TemplateError {
    /// No template exists at the path.
    #[error("template {0} is not embedded")]
    Missing(String),
    /// The template is not UTF-8 text.
    #[error("template {0} is not utf-8")]
    NotText(String),
}

// ============================================================================
// SECTION: Lookup
// ============================================================================

/// Returns the text of the template at `path`.
///
/// # Errors
///
/// Returns [`TemplateError`] when the template is absent or binary.
pub fn template(path: &str) -> Result<&'static str, TemplateError> {
    TEMPLATES
        .get_file(path)
        .ok_or_else(|| TemplateError::Missing(path.to_string()))?
        .contents_utf8()
        .ok_or_else(|| TemplateError::NotText(path.to_string()))
}

/// Returns the package manifest template for a toolchain major version.
///
/// # Errors
///
/// Returns [`TemplateError::Missing`] when no template matches `major`.
pub fn package_manifest(major: u32) -> Result<&'static str, TemplateError> {
    template(&format!("project/Swift{major}/Package.swift"))
}

/// Replaces every `{{key}}` in `text` with its value.
#[must_use]
pub fn render(text: &str, values: &[(&str, &str)]) -> String {
    values.iter().fold(text.to_string(), |rendered, (key, value)| {
        rendered.replace(&format!("{{{{{key}}}}}"), value)
    })
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
    fn every_named_template_is_embedded() {
        for path in [
            LAMBDA_INDEX,
            LAMBDA_BYLINE,
            DOCKERFILE,
            DOCKERIGNORE,
            BUILD_SCRIPT,
            PROJECT_HEXAVILLEFILE,
            PROJECT_GITIGNORE,
            PROJECT_MAIN,
        ] {
            assert!(template(path).is_ok(), "{path} missing");
        }
        assert!(package_manifest(4).is_ok());
        assert!(package_manifest(5).is_ok());
        assert_eq!(
            package_manifest(3),
            Err(TemplateError::Missing("project/Swift3/Package.swift".to_string()))
        );
    }

    #[test]
    fn render_replaces_all_occurrences() {
        let rendered = render("{{a}}-{{b}}-{{a}}", &[("a", "x"), ("b", "y")]);
        assert_eq!(rendered, "x-y-x");
    }

    #[test]
    fn render_leaves_unknown_placeholders() {
        assert_eq!(render("{{c}}", &[("a", "x")]), "{{c}}");
    }
}
