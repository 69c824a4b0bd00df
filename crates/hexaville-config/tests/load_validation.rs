// crates/hexaville-config/tests/load_validation.rs
// ============================================================================
// Module: Hexavillefile Load Validation Tests
// Description: Validate loading guards (path, size, encoding).
// ============================================================================
//! ## Overview
//! Ensures Hexavillefile input handling is strict and fail-closed.

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

use std::io::Write;
use std::path::Path;

use hexaville_config::ConfigError;
use hexaville_config::HexavilleFile;
use hexaville_config::resolve_path;
use tempfile::NamedTempFile;

type TestResult = Result<(), String>;

/// Checks that loading failed with a message containing `needle`.
fn assert_invalid(result: Result<HexavilleFile, ConfigError>, needle: &str) -> TestResult {
    match result {
        Err(error) => {
            let message = error.to_string();
            if message.contains(needle) {
                Ok(())
            } else {
                Err(format!("error {message} did not contain {needle}"))
            }
        }
        Ok(_) => Err("expected invalid hexavillefile load".to_string()),
    }
}

/// Tests that over-long paths are rejected before any read.
#[test]
fn load_rejects_path_too_long() -> TestResult {
    let long_path = "a".repeat(5_000);
    assert_invalid(
        HexavilleFile::load(Some(Path::new(&long_path))),
        "config path exceeds max length",
    )
}

/// Tests that over-long path components are rejected.
#[test]
fn load_rejects_path_component_too_long() -> TestResult {
    let long_component = "a".repeat(300);
    assert_invalid(
        HexavilleFile::load(Some(Path::new(&long_component))),
        "config path component too long",
    )
}

/// Tests the 1 MiB size cap.
#[test]
fn load_rejects_oversized_file() -> TestResult {
    let mut file = NamedTempFile::new().map_err(|err| err.to_string())?;
    let payload = vec![b'a'; 1_048_577];
    file.write_all(&payload).map_err(|err| err.to_string())?;
    assert_invalid(HexavilleFile::load(Some(file.path())), "config file exceeds size limit")
}

/// Tests that non-UTF-8 content is rejected.
#[test]
fn load_rejects_non_utf8_file() -> TestResult {
    let mut file = NamedTempFile::new().map_err(|err| err.to_string())?;
    file.write_all(&[0xFF, 0xFE, 0xFF]).map_err(|err| err.to_string())?;
    assert_invalid(HexavilleFile::load(Some(file.path())), "config file must be utf-8")
}

/// Tests that a missing file surfaces as an I/O error.
#[test]
fn load_reports_missing_file() -> TestResult {
    let dir = tempfile::tempdir().map_err(|err| err.to_string())?;
    let path = dir.path().join("Hexavillefile.yml");
    assert_invalid(HexavilleFile::load(Some(&path)), "config io error")
}

/// Tests that a valid file on disk loads and validates.
#[test]
fn load_reads_valid_file() -> TestResult {
    let mut file = NamedTempFile::new().map_err(|err| err.to_string())?;
    file.write_all(
        concat!(
            "appName: disk\n",
            "executableTarget: disk\n",
            "swift:\n",
            "  version: \"4.2\"\n",
            "provider:\n",
            "  aws:\n",
            "    lambda:\n",
            "      s3Bucket: disk-bucket\n",
        )
        .as_bytes(),
    )
    .map_err(|err| err.to_string())?;
    let loaded = HexavilleFile::load(Some(file.path())).map_err(|err| err.to_string())?;
    if loaded.app_name == "disk" {
        Ok(())
    } else {
        Err(format!("unexpected app name {}", loaded.app_name))
    }
}

/// Tests that an explicit path wins over every default.
#[test]
fn resolve_path_prefers_explicit_path() -> TestResult {
    let resolved = resolve_path(Some(Path::new("custom/Hexavillefile.yml")))
        .map_err(|err| err.to_string())?;
    if resolved == Path::new("custom/Hexavillefile.yml") {
        Ok(())
    } else {
        Err(format!("unexpected path {}", resolved.display()))
    }
}
