// crates/hexaville-core/src/core/stage.rs
// ============================================================================
// Module: Deployment Stage
// Description: Named gateway stage a deployment is published to.
// Purpose: Model the staging/production/custom stage choice.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! Stages are free-form names. `staging` and `production` get their own
//! variants; anything else is carried verbatim. The default is `staging`.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

use serde::Deserialize;
use serde::Deserializer;
use serde::Serialize;
use serde::Serializer;

// ============================================================================
// SECTION: Types
// ============================================================================

/// Gateway deployment stage.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum DeploymentStage {
    /// `staging` stage.
    #[default]
    Staging,
    /// `production` stage.
    Production,
    /// Any other stage name.
    Other(String),
}

impl DeploymentStage {
    /// Parses a stage name.
    #[must_use]
    pub fn parse(name: &str) -> Self {
        match name {
            "staging" => Self::Staging,
            "production" => Self::Production,
            other => Self::Other(other.to_string()),
        }
    }

    /// Returns the stage name.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Staging => "staging",
            Self::Production => "production",
            Self::Other(name) => name,
        }
    }
}

impl fmt::Display for DeploymentStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DeploymentStage {
    type Err = Infallible;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Ok(Self::parse(value))
    }
}

impl Serialize for DeploymentStage {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for DeploymentStage {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let name = String::deserialize(deserializer)?;
        Ok(Self::parse(&name))
    }
}
