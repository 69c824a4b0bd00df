// crates/hexaville-config/tests/version.rs
// ============================================================================
// Module: Swift Version Tests
// Description: Release and snapshot parsing, ordering, and download URLs.
// ============================================================================
//! ## Overview
//! Checks toolchain URLs and version ordering.

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

use hexaville_config::DevelopmentSnapshot;
use hexaville_config::SwiftVersion;
use hexaville_config::Version;

/// Tests the snapshot toolchain URL.
#[test]
fn snapshot_download_url() {
    let version: SwiftVersion = "swift-4.0-DEVELOPMENT-SNAPSHOT-2017-08-04-a".parse().unwrap();
    assert_eq!(
        version.download_url(),
        concat!(
            "https://swift.org/builds/swift-4.0-branch/ubuntu1604/",
            "swift-4.0-DEVELOPMENT-SNAPSHOT-2017-08-04-a/",
            "swift-4.0-DEVELOPMENT-SNAPSHOT-2017-08-04-a-ubuntu16.04.tar.gz",
        )
    );
    assert_eq!(version.comparable(), Version::new(4, 0, 0));
}

/// Tests the release toolchain URL.
#[test]
fn release_download_url() {
    let version: SwiftVersion = "3.1.1".parse().unwrap();
    assert_eq!(
        version.download_url(),
        concat!(
            "https://swift.org/builds/swift-3.1.1-release/ubuntu1604/swift-3.1.1-RELEASE/",
            "swift-3.1.1-RELEASE-ubuntu16.04.tar.gz",
        )
    );
    assert_eq!(version.version_string(), "3.1.1");
}

/// Tests release equality and ordering.
#[test]
fn release_ordering() {
    assert_eq!("4.0".parse::<Version>().unwrap(), Version::new(4, 0, 0));
    assert_eq!("3.1.1".parse::<Version>().unwrap(), Version::new(3, 1, 1));
    assert!(Version::new(4, 0, 0) > Version::new(3, 1, 0));
    assert!(Version::new(3, 1, 1) > Version::new(3, 1, 0));
    assert!(Version::new(4, 2, 0) > Version::new(4, 1, 9));
}

/// Tests that non-numeric versions fail to parse.
#[test]
fn rejects_non_numeric_release() {
    assert!("3.foo".parse::<SwiftVersion>().is_err());
}

/// Tests that later snapshots of the same branch order after earlier ones.
#[test]
fn snapshots_order_by_date() {
    let first: DevelopmentSnapshot =
        "swift-4.0-DEVELOPMENT-SNAPSHOT-2017-08-04-a".parse().unwrap();
    let second: DevelopmentSnapshot =
        "swift-4.0-DEVELOPMENT-SNAPSHOT-2017-08-05-a".parse().unwrap();
    assert!(second > first);
}
