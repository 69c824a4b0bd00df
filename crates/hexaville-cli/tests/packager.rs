// crates/hexaville-cli/tests/packager.rs
// ============================================================================
// Module: Lambda Packager Tests
// Description: Archive contents, modes, shim rendering, and asset copying.
// Purpose: Ensure the uploaded archive holds everything the shim needs.
// Dependencies: hexaville-cli, hexaville-core, tempfile, zip
// ============================================================================

//! ## Overview
//! Lays out a fake build output in a temporary application directory and
//! packages it.

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

use std::fs;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use hexaville_cli::packager;
use hexaville_cli::packager::PackageError;
use hexaville_core::BuildArtifact;
use zip::ZipArchive;

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Creates a build output under `app_dir` and returns its artifact.
fn fake_build(app_dir: &Path) -> BuildArtifact {
    let destination = app_dir.join("__docker_shared").join("release");
    fs::create_dir_all(&destination).unwrap();
    fs::write(destination.join("sample"), b"\x7fELF").unwrap();
    fs::write(destination.join("libFoundation.so"), b"so").unwrap();
    fs::write(destination.join("libicuuc.so.55"), b"so55").unwrap();
    fs::write(destination.join("main.o"), b"object").unwrap();
    fs::write(
        destination.join(".routing-manifest.json"),
        br#"{"routing":[{"path":"/","method":"get"}]}"#,
    )
    .unwrap();
    BuildArtifact::new(destination, "sample")
}

/// Returns the sorted entry names of an archive.
fn entry_names(archive: &Path) -> Vec<String> {
    let mut zip = ZipArchive::new(File::open(archive).unwrap()).unwrap();
    let mut names: Vec<String> =
        (0..zip.len()).map(|index| zip.by_index(index).unwrap().name().to_string()).collect();
    names.sort();
    names
}

// ============================================================================
// SECTION: Tests
// ============================================================================

/// Tests that the archive holds the executable, shim, and shared libraries.
#[test]
fn package_selects_runtime_files() {
    let app = tempfile::tempdir().unwrap();
    let artifact = fake_build(app.path());

    let archive = packager::package(app.path(), &artifact).unwrap();

    assert_eq!(archive, app.path().join(".hexaville").join("lambda-package.zip"));
    assert_eq!(
        entry_names(&archive),
        vec!["byline.js", "index.js", "libFoundation.so", "libicuuc.so.55", "sample"]
    );
}

/// Tests that the executable entry keeps its executable mode.
#[test]
fn package_marks_executable() {
    let app = tempfile::tempdir().unwrap();
    let artifact = fake_build(app.path());
    let archive = packager::package(app.path(), &artifact).unwrap();

    let mut zip = ZipArchive::new(File::open(archive).unwrap()).unwrap();
    let executable = zip.by_name("sample").unwrap();
    assert_eq!(executable.unix_mode().unwrap() & 0o777, 0o755);
    drop(executable);
    let index = zip.by_name("index.js").unwrap();
    assert_eq!(index.unix_mode().unwrap() & 0o777, 0o644);
}

/// Tests that the shim spawns the packaged executable.
#[test]
fn package_renders_shim_with_executable_name() {
    let app = tempfile::tempdir().unwrap();
    let artifact = fake_build(app.path());
    let archive = packager::package(app.path(), &artifact).unwrap();

    let mut zip = ZipArchive::new(File::open(archive).unwrap()).unwrap();
    let mut index = String::new();
    zip.by_name("index.js").unwrap().read_to_string(&mut index).unwrap();
    assert!(index.contains("${__dirname}/sample"));
    assert!(!index.contains("{{executablePath}}"));
}

/// Tests that application assets are copied and archived.
#[test]
fn package_includes_assets_tree() {
    let app = tempfile::tempdir().unwrap();
    let artifact = fake_build(app.path());
    let css = app.path().join("assets").join("css");
    fs::create_dir_all(&css).unwrap();
    fs::write(css.join("site.css"), b"body {}").unwrap();
    fs::write(app.path().join("assets").join("logo.png"), b"png").unwrap();

    let archive = packager::package(app.path(), &artifact).unwrap();

    assert!(artifact.destination().join("assets").join("css").join("site.css").is_file());
    let names = entry_names(&archive);
    assert!(names.contains(&"assets/css/site.css".to_string()));
    assert!(names.contains(&"assets/logo.png".to_string()));
}

/// Tests that packaging without a build fails clearly.
#[test]
fn package_requires_executable() {
    let app = tempfile::tempdir().unwrap();
    let destination = app.path().join("__docker_shared").join("debug");
    fs::create_dir_all(&destination).unwrap();
    let artifact = BuildArtifact::new(destination, "missing");

    let result = packager::package(app.path(), &artifact);

    assert!(matches!(result, Err(PackageError::MissingExecutable(_))));
}

/// Tests that repackaging replaces the previous archive.
#[test]
fn package_overwrites_previous_archive() {
    let app = tempfile::tempdir().unwrap();
    let artifact = fake_build(app.path());
    packager::package(app.path(), &artifact).unwrap();
    fs::remove_file(artifact.destination().join("libicuuc.so.55")).unwrap();

    let archive = packager::package(app.path(), &artifact).unwrap();

    assert!(!entry_names(&archive).contains(&"libicuuc.so.55".to_string()));
}
