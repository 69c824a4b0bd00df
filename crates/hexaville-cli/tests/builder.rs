// crates/hexaville-cli/tests/builder.rs
// ============================================================================
// Module: Docker Builder Tests
// Description: Build context files, docker arguments, and artifact layout.
// Purpose: Ensure the container build is wired as operators expect.
// Dependencies: hexaville-cli, hexaville-config, tempfile
// ============================================================================

//! ## Overview
//! Exercises the parts of the build that do not need a docker daemon.

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
use std::path::Path;

use hexaville_cli::builder;
use hexaville_config::HexavilleFile;

// ============================================================================
// SECTION: Fixtures
// ============================================================================

/// Release build with cache disabled.
const CONFIG: &str = r"
appName: sample
executableTarget: SampleServer
swift:
    version: 4.2
    buildOptions:
        configuration: release
docker:
    buildOptions:
        nocache: true
provider:
    aws:
        lambda:
            s3Bucket: sample-bucket
";

// ============================================================================
// SECTION: Tests
// ============================================================================

/// Tests that the build context files are written with values filled in.
#[test]
fn build_context_fills_dockerfile() {
    let app = tempfile::tempdir().unwrap();
    let config = HexavilleFile::from_yaml_str(CONFIG).unwrap();

    builder::write_build_context(app.path(), &config).unwrap();

    let dockerfile = fs::read_to_string(app.path().join("Dockerfile")).unwrap();
    assert!(dockerfile.contains(concat!(
        "https://swift.org/builds/swift-4.2-release/ubuntu1604/swift-4.2-RELEASE/",
        "swift-4.2-RELEASE-ubuntu16.04.tar.gz",
    )));
    assert!(dockerfile.contains("\"SampleServer\", \"release\""));
    assert!(!dockerfile.contains("{{"));
    assert!(app.path().join(".dockerignore").is_file());
    assert!(app.path().join("build-swift.sh").is_file());
}

/// Tests the `docker build` argument list with and without cache.
#[test]
fn docker_build_arguments() {
    let app = Path::new("/work/app");
    assert_eq!(
        builder::docker_build_args(app, true),
        vec![
            "build",
            "-t",
            "hexaville-app",
            "--no-cache",
            "-f",
            "/work/app/Dockerfile",
            "/work/app",
        ]
    );
    assert!(!builder::docker_build_args(app, false).contains(&"--no-cache".to_string()));
}

/// Tests that the shared directory is mounted as the container build dir.
#[test]
fn docker_run_mounts_shared_directory() {
    let args = builder::docker_run_args(Path::new("/work/app/__docker_shared"));
    assert!(args.contains(&"/work/app/__docker_shared:/hexaville-app/.build".to_string()));
    assert_eq!(args.last().map(String::as_str), Some("hexaville-app"));
}

/// Tests that the artifact lands under the configuration directory.
#[test]
fn expected_artifact_layout() {
    let config = HexavilleFile::from_yaml_str(CONFIG).unwrap();
    let artifact = builder::expected_artifact(Path::new("/work/app"), &config);
    assert_eq!(artifact.destination(), Path::new("/work/app/__docker_shared/release"));
    assert_eq!(artifact.executable_name, "SampleServer");
    assert_eq!(
        artifact.manifest_path(),
        Path::new("/work/app/__docker_shared/release/.routing-manifest.json")
    );
}
