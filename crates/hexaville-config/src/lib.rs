// crates/hexaville-config/src/lib.rs
// ============================================================================
// Module: Hexaville Config Library
// Description: Hexavillefile model, dotenv parsing, and toolchain versions.
// Purpose: Single source of truth for Hexavillefile.yml semantics.
// Dependencies: hexaville-core, serde, serde_yaml, time
// ============================================================================

//! ## Overview
//! `hexaville-config` loads and validates the Hexavillefile, reads the
//! function environment from `.env`, and parses Swift toolchain versions.
//! Config inputs are untrusted: loading is size and path bounded and fails
//! closed.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod dotenv;
pub mod hexavillefile;
pub mod version;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use dotenv::DOTENV_FILE_NAME;
pub use dotenv::load_dotenv;
pub use dotenv::parse_dotenv;
pub use hexavillefile::*;
pub use version::DevelopmentSnapshot;
pub use version::SwiftVersion;
pub use version::Version;
pub use version::VersionError;
