// crates/hexaville-aws/src/client.rs
// ============================================================================
// Module: AWS Cloud Provider Client
// Description: Shared SDK clients and the blocking bridge onto Tokio.
// Purpose: Own the service clients and a runtime so core can stay synchronous.
// Dependencies: aws-config, aws-sdk-*, hexaville-config, tokio
// ============================================================================

//! ## Overview
//! [`AwsCloudProvider`] holds one client per service, built from a single
//! shared SDK config. Core interfaces are synchronous, so every call blocks
//! on the SDK future through [`block_on_with_runtime`]. Inside a
//! multi-thread runtime that uses `block_in_place`; inside any other runtime
//! it hops to a helper thread with its own runtime.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::future::Future;
use std::sync::Arc;

use aws_config::BehaviorVersion;
use aws_config::Region;
use aws_sdk_lambda::error::DisplayErrorContext;
use hexaville_config::AwsSettings;
use hexaville_core::RemoteError;
use thiserror::Error;
use tokio::runtime::Handle;
use tokio::runtime::Runtime;
use tokio::runtime::RuntimeFlavor;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Provider name attached to static credentials.
const CREDENTIALS_PROVIDER_NAME: &str = "hexavillefile";

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Errors raised while constructing the provider.
#[derive(Debug, Error)]
pub enum AwsProviderError {
    /// Runtime could not be created.
    #[error("aws provider io error: {0}")]
    Io(String),
}

// ============================================================================
// SECTION: Runtime Helpers
// ============================================================================

/// Blocks on an SDK future using a compatible runtime.
pub(crate) fn block_on_with_runtime<F, T>(runtime: &Runtime, future: F) -> Result<T, RemoteError>
where
    F: Future<Output = Result<T, RemoteError>> + Send + 'static,
    T: Send + 'static,
{
    if let Ok(handle) = Handle::try_current() {
        if matches!(handle.runtime_flavor(), RuntimeFlavor::MultiThread) {
            return tokio::task::block_in_place(|| handle.block_on(future));
        }
        let (tx, rx) = std::sync::mpsc::sync_channel(1);
        std::thread::spawn(move || {
            let result = Runtime::new()
                .map_err(|err| RemoteError::Failed(err.to_string()))
                .and_then(|runtime| runtime.block_on(future));
            let _ = tx.send(result);
        });
        return rx.recv().unwrap_or_else(|_| {
            Err(RemoteError::Failed("aws call thread join failed".to_string()))
        });
    }

    runtime.block_on(future)
}

/// Formats an SDK error with its full source chain.
pub(crate) fn failed<E: std::error::Error>(operation: &str, err: &E) -> RemoteError {
    RemoteError::Failed(format!("{operation}: {}", DisplayErrorContext(err)))
}

// ============================================================================
// SECTION: Provider
// ============================================================================

/// Cloud provider backed by S3, Lambda, API Gateway and IAM.
pub struct AwsCloudProvider {
    /// Object storage client.
    pub(crate) s3: aws_sdk_s3::Client,
    /// Function-compute client.
    pub(crate) lambda: aws_sdk_lambda::Client,
    /// Gateway management client.
    pub(crate) gateway: aws_sdk_apigateway::Client,
    /// Identity client.
    pub(crate) iam: aws_sdk_iam::Client,
    /// Region every client targets.
    pub(crate) region: String,
    /// Tokio runtime for blocking SDK calls.
    runtime: Option<Arc<Runtime>>,
}

impl Drop for AwsCloudProvider {
    fn drop(&mut self) {
        if let Some(runtime) = self.runtime.take() {
            let _ = std::thread::spawn(move || drop(runtime));
        }
    }
}

impl AwsCloudProvider {
    /// Builds clients from the Hexavillefile AWS section.
    ///
    /// Static credentials are used when configured; otherwise the default
    /// credential chain applies.
    ///
    /// # Errors
    ///
    /// Returns [`AwsProviderError`] when the runtime cannot be created.
    pub fn new(settings: &AwsSettings) -> Result<Self, AwsProviderError> {
        let runtime = Runtime::new().map_err(|err| AwsProviderError::Io(err.to_string()))?;
        let region = settings.region().to_string();
        let loader_region = region.clone();
        let endpoint = settings.endpoint.clone();
        let credentials = settings.credential.as_ref().map(|credential| {
            aws_sdk_s3::config::Credentials::new(
                credential.access_key_id.clone(),
                credential.secret_access_key.clone(),
                None,
                None,
                CREDENTIALS_PROVIDER_NAME,
            )
        });
        let shared_config = block_on_with_runtime(&runtime, async move {
            let mut loader =
                aws_config::defaults(BehaviorVersion::latest()).region(Region::new(loader_region));
            if let Some(endpoint) = endpoint {
                loader = loader.endpoint_url(endpoint);
            }
            if let Some(credentials) = credentials {
                loader = loader.credentials_provider(credentials);
            }
            Ok(loader.load().await)
        })
        .map_err(|err| AwsProviderError::Io(err.to_string()))?;
        let mut s3_builder = aws_sdk_s3::config::Builder::from(&shared_config);
        if settings.endpoint.is_some() {
            s3_builder = s3_builder.force_path_style(true);
        }
        Ok(Self {
            s3: aws_sdk_s3::Client::from_conf(s3_builder.build()),
            lambda: aws_sdk_lambda::Client::new(&shared_config),
            gateway: aws_sdk_apigateway::Client::new(&shared_config),
            iam: aws_sdk_iam::Client::new(&shared_config),
            region,
            runtime: Some(Arc::new(runtime)),
        })
    }

    /// Returns the runtime or an error if shut down.
    pub(crate) fn runtime(&self) -> Result<&Runtime, RemoteError> {
        self.runtime
            .as_ref()
            .map(AsRef::as_ref)
            .ok_or_else(|| RemoteError::Failed("aws provider runtime closed".to_string()))
    }

    /// Runs an SDK future to completion on the provider runtime.
    pub(crate) fn run<F, T>(&self, future: F) -> Result<T, RemoteError>
    where
        F: Future<Output = Result<T, RemoteError>> + Send + 'static,
        T: Send + 'static,
    {
        block_on_with_runtime(self.runtime()?, future)
    }
}

impl hexaville_core::CloudProvider for AwsCloudProvider {
    fn region(&self) -> &str {
        &self.region
    }
}
