// crates/hexaville-aws/src/lib.rs
// ============================================================================
// Module: Hexaville AWS Library
// Description: AWS SDK implementation of the Hexaville provider interfaces.
// Purpose: Deploy to S3, Lambda, API Gateway and IAM.
// Dependencies: aws-config, aws-sdk-*, hexaville-core, tokio
// ============================================================================

//! ## Overview
//! [`AwsCloudProvider`] implements every core provider trait against the
//! official AWS Rust SDK. It blocks on SDK futures so the reconciliation
//! engine can stay synchronous.

// ============================================================================
// SECTION: Modules
// ============================================================================

mod client;
mod gateway;
mod iam;
mod lambda;
mod storage;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use client::AwsCloudProvider;
pub use client::AwsProviderError;

// ============================================================================
// SECTION: Tests
// ============================================================================

#[cfg(test)]
mod tests;
