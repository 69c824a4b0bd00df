// crates/hexaville-cli/tests/i18n.rs
// ============================================================================
// Module: CLI Message Catalog Tests
// Description: Exercises the catalog and placeholder substitution.
// Purpose: Ensure console output routes through stable catalog helpers.
// Dependencies: hexaville-cli i18n module and the `t!` macro.
// ============================================================================

//! ## Overview
//! Validates catalog behavior: argument capture, key fallback, and the
//! [`t!`](hexaville_cli::t) macro's placeholder handling.

#![allow(
    clippy::panic,
    clippy::print_stdout,
    clippy::print_stderr,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::use_debug,
    clippy::dbg_macro,
    clippy::panic_in_result_fn,
    clippy::unwrap_in_result,
    reason = "Test-only output and panic-based assertions are permitted."
)]

// ============================================================================
// SECTION: Imports
// ============================================================================

use hexaville_cli::i18n::MessageArg;
use hexaville_cli::i18n::translate;
use hexaville_cli::t;

// ============================================================================
// SECTION: Tests
// ============================================================================

/// Confirms message arguments capture key/value pairs.
#[test]
fn message_arg_new_captures_key_and_value() {
    let arg = MessageArg::new("endpoint", "https://example.com/staging");
    assert_eq!(arg.key, "endpoint");
    assert_eq!(arg.value, "https://example.com/staging");
}

/// Confirms catalog entries resolve and replace placeholders.
#[test]
fn translate_substitutes_placeholders() {
    let endpoint = "https://abc.execute-api.us-east-1.amazonaws.com/staging";
    let args = vec![MessageArg::new("endpoint", endpoint)];
    let result = translate("routes.endpoint", args);
    assert_eq!(result, format!("Endpoint: {endpoint}"));
}

/// Confirms missing keys fall back to the key string.
#[test]
fn translate_falls_back_to_key() {
    assert_eq!(translate("missing.key", Vec::new()), "missing.key");
}

/// Confirms the macro formats multiple placeholders.
#[test]
fn macro_formats_route_entries() {
    let line = t!("routes.entry", method = "GET", path = "/hello/{name}");
    assert_eq!(line, "  GET    /hello/{name}");
}

/// Confirms the information block lines render as operators expect.
#[test]
fn deploy_information_lines() {
    assert_eq!(t!("deploy.info.app", app = "sample"), "ApplicationName: sample");
    assert_eq!(t!("deploy.info.stage", stage = "production"), "Stage: production");
    assert_eq!(t!("deploy.done"), "All Done.");
    assert_eq!(t!("dotenv.missing"), ".env was not found");
}
