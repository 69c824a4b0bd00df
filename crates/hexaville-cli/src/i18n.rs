// crates/hexaville-cli/src/i18n.rs
// ============================================================================
// Module: CLI Message Catalog
// Description: Message catalog and translation utilities for the CLI.
// Purpose: Keep every user-facing string in one place.
// Dependencies: Standard library collections.
// ============================================================================

//! ## Overview
//! The Hexaville CLI stores user-facing strings in a small catalog so the
//! console output stays consistent across commands. All runtime output goes
//! through the [`t!`](crate::t) macro.
//!
//! ## Invariants
//! - The catalog is initialized once and read-only thereafter.
//! - Missing keys fall back to the key itself.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::HashMap;
use std::sync::OnceLock;

// ============================================================================
// SECTION: Types
// ============================================================================

/// A formatted message argument captured by the [`macro@crate::t`] macro.
#[derive(Clone)]
pub struct MessageArg {
    /// The placeholder name used in message templates (e.g., `"path"`).
    pub key: &'static str,
    /// The formatted string value to substitute for this placeholder.
    pub value: String,
}

impl MessageArg {
    /// Constructs a new [`MessageArg`] from a key and displayable value.
    pub fn new(key: &'static str, value: impl Into<String>) -> Self {
        Self {
            key,
            value: value.into(),
        }
    }
}

// ============================================================================
// SECTION: Catalog
// ============================================================================

/// English catalog entries.
const CATALOG_EN: &[(&str, &str)] = &[
    ("main.version", "hexaville {version}"),
    ("output.stream.stdout", "stdout"),
    ("output.stream.stderr", "stderr"),
    ("output.stream.unknown", "output"),
    ("output.write_failed", "Failed to write to {stream}: {error}"),
    ("config.path", "Hexavillefile: {path}"),
    ("config.load_failed", "Failed to load Hexavillefile at {path}: {error}"),
    ("config.cwd_failed", "Failed to read the current directory: {error}"),
    ("dotenv.missing", ".env was not found"),
    ("dotenv.load_failed", "Failed to load {path}: {error}"),
    ("build.start", "Start to build swift..."),
    ("build.done", "Build swift done."),
    ("build.failed", "Swift build failed: {error}"),
    ("package.start", "Start to package the lambda function..."),
    ("package.done", "Package written to {path}"),
    ("package.failed", "Packaging failed: {error}"),
    ("manifest.load_failed", "Failed to load the routing manifest: {error}"),
    ("deploy.start", "Start to deploy {app} ({stage})..."),
    ("deploy.failed", "Deploy failed: {error}"),
    ("deploy.provider_failed", "Failed to initialize the AWS provider: {error}"),
    ("deploy.event_log_failed", "Failed to open event log {path}: {error}"),
    ("deploy.info.rule", "#################################################################"),
    ("deploy.info.header", "Information"),
    ("deploy.info.app", "ApplicationName: {app}"),
    ("deploy.info.endpoint", "Endpoint: {endpoint}"),
    ("deploy.info.stage", "Stage: {stage}"),
    ("deploy.done", "All Done."),
    ("routes.failed", "Failed to list routes: {error}"),
    ("routes.endpoint", "Endpoint: {endpoint}"),
    ("routes.header", "Routes:"),
    ("routes.entry", "  {method}    {path}"),
    ("generate.failed", "Failed to generate project: {error}"),
    ("generate.done", "Project {name} was successfully created at {path}"),
    ("runtime.join_failed", "Background task failed: {error}"),
    ("runtime.interrupted", "Interrupted."),
];

/// Returns the message catalog.
pub(crate) fn catalog() -> &'static HashMap<&'static str, &'static str> {
    static CATALOG_EN_MAP: OnceLock<HashMap<&'static str, &'static str>> = OnceLock::new();
    CATALOG_EN_MAP.get_or_init(|| CATALOG_EN.iter().copied().collect())
}

// ============================================================================
// SECTION: Translation
// ============================================================================

/// Translates `key` while substituting `args`.
#[must_use]
pub fn translate(key: &str, args: Vec<MessageArg>) -> String {
    let template = catalog().get(key).copied().unwrap_or(key);
    if args.is_empty() {
        return template.to_string();
    }

    let mut result = template.to_string();
    for arg in args {
        let placeholder = format!("{{{}}}", arg.key);
        result = result.replace(&placeholder, &arg.value);
    }
    result
}

// ============================================================================
// SECTION: Macro
// ============================================================================

/// Formats a catalog message from a key and named arguments.
///
/// # Arguments
///
/// - `$key` must match a catalog entry.
/// - Named arguments are substituted into `{placeholder}` positions.
#[macro_export]
macro_rules! t {
    ($key:literal $(, $name:ident = $value:expr )* $(,)?) => {{
        let args = ::std::vec![
            $(
                $crate::i18n::MessageArg::new(stringify!($name), $value.to_string()),
            )*
        ];
        $crate::i18n::translate($key, args)
    }};
}
