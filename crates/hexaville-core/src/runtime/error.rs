// crates/hexaville-core/src/runtime/error.rs
// ============================================================================
// Module: Deploy Errors
// Description: Error taxonomy for the reconciliation engine.
// Purpose: Tag every remote failure with the phase that observed it.
// Dependencies: crate::core, crate::interfaces, thiserror
// ============================================================================

//! ## Overview
//! A deployment run is fail-fast: the first error ends the run and leaves
//! the remote state as-is. Errors carry the [`DeployPhase`] so the operator
//! knows how far the run got before re-invoking it.

// ============================================================================
// SECTION: Imports
// ============================================================================

use thiserror::Error;

use crate::core::ArnError;
use crate::core::DeployPhase;
use crate::interfaces::RemoteError;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Deployment engine errors.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum DeployError {
    /// A remote call failed.
    #[error("{phase} failed: {error}")]
    Remote {
        /// Phase in which the call failed.
        phase: DeployPhase,
        /// Classified remote failure.
        error: RemoteError,
    },
    /// The REST API has no root resource.
    #[error("could not find root resource of rest api {0}")]
    MissingRootResource(String),
    /// The REST API does not exist.
    #[error("rest api {0} does not exist; deploy first")]
    MissingRestApi(String),
    /// A function ARN or invocation URI could not be interpreted.
    #[error("arn error: {0}")]
    Arn(String),
}

impl DeployError {
    /// Returns a mapper tagging remote errors with `phase`.
    pub fn remote(phase: DeployPhase) -> impl Fn(RemoteError) -> Self {
        move |error| Self::Remote {
            phase,
            error,
        }
    }
}

impl From<ArnError> for DeployError {
    fn from(error: ArnError) -> Self {
        Self::Arn(error.to_string())
    }
}
