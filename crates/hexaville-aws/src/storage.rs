// crates/hexaville-aws/src/storage.rs
// ============================================================================
// Module: S3 Code Storage
// Description: Bucket creation and package upload.
// Purpose: Implement `CodeStorage` on S3.
// Dependencies: aws-sdk-s3
// ============================================================================

//! ## Overview
//! Buckets outside `us-east-1` need an explicit location constraint. A bucket
//! that already exists (owned by anyone) is reported as `AlreadyExists`.

// ============================================================================
// SECTION: Imports
// ============================================================================

use aws_sdk_s3::operation::create_bucket::CreateBucketError;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::types::BucketLocationConstraint;
use aws_sdk_s3::types::CreateBucketConfiguration;
use hexaville_core::CodeStorage;
use hexaville_core::RemoteError;

use crate::client::AwsCloudProvider;
use crate::client::failed;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Region where S3 rejects an explicit location constraint.
const DEFAULT_S3_REGION: &str = "us-east-1";

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Returns the bucket configuration for a region, if one is needed.
pub(crate) fn bucket_configuration(region: &str) -> Option<CreateBucketConfiguration> {
    if region == DEFAULT_S3_REGION {
        return None;
    }
    Some(
        CreateBucketConfiguration::builder()
            .location_constraint(BucketLocationConstraint::from(region))
            .build(),
    )
}

/// Returns true when the error means the bucket is already there.
fn is_existing_bucket(err: &CreateBucketError) -> bool {
    err.is_bucket_already_owned_by_you() || err.is_bucket_already_exists()
}

// ============================================================================
// SECTION: Code Storage
// ============================================================================

impl CodeStorage for AwsCloudProvider {
    fn create_bucket(&self, bucket: &str) -> Result<(), RemoteError> {
        let client = self.s3.clone();
        let bucket = bucket.to_string();
        let configuration = bucket_configuration(&self.region);
        self.run(async move {
            client
                .create_bucket()
                .bucket(&bucket)
                .set_create_bucket_configuration(configuration)
                .send()
                .await
                .map_err(|err| {
                    if err.as_service_error().is_some_and(is_existing_bucket) {
                        RemoteError::AlreadyExists(bucket.clone())
                    } else {
                        failed("create bucket", &err)
                    }
                })?;
            Ok(())
        })
    }

    fn put_object(
        &self,
        bucket: &str,
        key: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<Option<String>, RemoteError> {
        let client = self.s3.clone();
        let bucket = bucket.to_string();
        let key = key.to_string();
        let content_type = content_type.to_string();
        self.run(async move {
            let output = client
                .put_object()
                .bucket(bucket)
                .key(key)
                .content_type(content_type)
                .body(ByteStream::from(bytes))
                .send()
                .await
                .map_err(|err| failed("put object", &err))?;
            Ok(output.version_id().map(str::to_string))
        })
    }
}
