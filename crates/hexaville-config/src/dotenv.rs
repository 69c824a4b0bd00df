// crates/hexaville-config/src/dotenv.rs
// ============================================================================
// Module: Dotenv
// Description: `.env` parsing for function environment variables.
// Purpose: Load the environment the deployed function receives.
// Dependencies: crate::hexavillefile
// ============================================================================

//! ## Overview
//! The `.env` file sits next to the Hexavillefile. Each non-blank line that
//! does not start with `#` is split at its first `=`; lines without `=` are
//! ignored. A missing file is not an error: the caller decides whether to
//! report it.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use crate::hexavillefile::ConfigError;
use crate::hexavillefile::MAX_CONFIG_FILE_SIZE;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// File name of the dotenv file.
pub const DOTENV_FILE_NAME: &str = ".env";

// ============================================================================
// SECTION: Parsing
// ============================================================================

/// Parses dotenv text into a sorted map. Later duplicates win.
#[must_use]
pub fn parse_dotenv(content: &str) -> BTreeMap<String, String> {
    let mut environment = BTreeMap::new();
    for line in content.lines() {
        let line = line.strip_suffix('\r').unwrap_or(line);
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let Some((key, value)) = line.split_once('=') else {
            continue;
        };
        if key.is_empty() {
            continue;
        }
        environment.insert(key.to_string(), value.to_string());
    }
    environment
}

/// Reads and parses a dotenv file.
///
/// Returns `Ok(None)` when the file does not exist.
///
/// # Errors
///
/// Returns [`ConfigError`] when the file cannot be read, is oversized, or is
/// not UTF-8.
pub fn load_dotenv(path: &Path) -> Result<Option<BTreeMap<String, String>>, ConfigError> {
    let bytes = match fs::read(path) {
        Ok(bytes) => bytes,
        Err(err) if err.kind() == ErrorKind::NotFound => return Ok(None),
        Err(err) => return Err(ConfigError::Io(err.to_string())),
    };
    if bytes.len() > MAX_CONFIG_FILE_SIZE {
        return Err(ConfigError::Invalid("dotenv file exceeds size limit".to_string()));
    }
    let content = std::str::from_utf8(&bytes)
        .map_err(|_| ConfigError::Invalid("dotenv file must be utf-8".to_string()))?;
    Ok(Some(parse_dotenv(content)))
}
