// crates/hexaville-aws/src/lambda.rs
// ============================================================================
// Module: Lambda Functions and Permissions
// Description: Function create/update and resource-policy management.
// Purpose: Implement `FunctionManager` and `PermissionManager` on Lambda.
// Dependencies: aws-sdk-lambda
// ============================================================================

//! ## Overview
//! Every create and code update publishes a new version, so the returned ARN
//! is version-qualified. Configuration updates return the unqualified ARN.
//! The function policy is parsed with the core policy reader; a function
//! without a policy reports `NotFound`. Lambda rejects changes to a function
//! while its last update is in progress, so the waits poll the SDK waiters
//! until the function settles.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::HashMap;
use std::time::Duration;

use aws_sdk_lambda::client::Waiters;
use aws_sdk_lambda::operation::get_function::GetFunctionError;
use aws_sdk_lambda::operation::get_policy::GetPolicyError;
use aws_sdk_lambda::operation::remove_permission::RemovePermissionError;
use aws_sdk_lambda::types::Environment;
use aws_sdk_lambda::types::FunctionCode;
use aws_sdk_lambda::types::Runtime;
use aws_sdk_lambda::types::VpcConfig;
use hexaville_core::CodeLocation;
use hexaville_core::FunctionConfiguration;
use hexaville_core::FunctionManager;
use hexaville_core::FunctionSpec;
use hexaville_core::PermissionManager;
use hexaville_core::PolicyStatement;
use hexaville_core::RemoteError;
use hexaville_core::StatementId;
use hexaville_core::VpcSettings;
use hexaville_core::policy::parse_policy_document;

use crate::client::AwsCloudProvider;
use crate::client::failed;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Longest time to wait for a function to settle.
const FUNCTION_SETTLE_TIMEOUT: Duration = Duration::from_secs(300);

// ============================================================================
// SECTION: Conversions
// ============================================================================

/// Converts VPC settings to the SDK shape.
pub(crate) fn vpc_config(vpc: Option<&VpcSettings>) -> Option<VpcConfig> {
    vpc.map(|vpc| {
        VpcConfig::builder()
            .set_subnet_ids(Some(vpc.subnet_ids.clone()))
            .set_security_group_ids(Some(vpc.security_group_ids.clone()))
            .build()
    })
}

/// Converts environment variables to the SDK shape.
pub(crate) fn environment(spec: &FunctionSpec) -> Environment {
    let variables: HashMap<String, String> =
        spec.environment.iter().map(|(key, value)| (key.clone(), value.clone())).collect();
    Environment::builder().set_variables(Some(variables)).build()
}

/// Builds a function configuration from an optional ARN.
fn configuration(operation: &str, arn: Option<&str>) -> Result<FunctionConfiguration, RemoteError> {
    arn.map(|arn| FunctionConfiguration {
        function_arn: arn.to_string(),
    })
    .ok_or_else(|| RemoteError::Failed(format!("{operation}: response missing function arn")))
}

// ============================================================================
// SECTION: Function Manager
// ============================================================================

impl FunctionManager for AwsCloudProvider {
    fn get_function(&self, function_name: &str) -> Result<FunctionConfiguration, RemoteError> {
        let client = self.lambda.clone();
        let function_name = function_name.to_string();
        self.run(async move {
            let output =
                client.get_function().function_name(&function_name).send().await.map_err(|err| {
                    if err
                        .as_service_error()
                        .is_some_and(GetFunctionError::is_resource_not_found_exception)
                    {
                        RemoteError::NotFound(function_name.clone())
                    } else {
                        failed("get function", &err)
                    }
                })?;
            configuration(
                "get function",
                output.configuration().and_then(|configuration| configuration.function_arn()),
            )
        })
    }

    fn create_function(
        &self,
        spec: &FunctionSpec,
        code: &CodeLocation,
    ) -> Result<FunctionConfiguration, RemoteError> {
        let request = self
            .lambda
            .create_function()
            .function_name(&spec.name)
            .role(&spec.role_arn)
            .handler(&spec.handler)
            .runtime(Runtime::from(spec.runtime.as_str()))
            .description(&spec.description)
            .timeout(spec.timeout)
            .memory_size(spec.memory)
            .publish(true)
            .code(
                FunctionCode::builder()
                    .s3_bucket(&code.bucket)
                    .s3_key(&code.key)
                    .set_s3_object_version(code.object_version.clone())
                    .build(),
            )
            .set_vpc_config(vpc_config(spec.vpc.as_ref()))
            .environment(environment(spec));
        self.run(async move {
            let output = request.send().await.map_err(|err| failed("create function", &err))?;
            configuration("create function", output.function_arn())
        })
    }

    fn update_function_code(
        &self,
        function_name: &str,
        code: &CodeLocation,
    ) -> Result<FunctionConfiguration, RemoteError> {
        let request = self
            .lambda
            .update_function_code()
            .function_name(function_name)
            .s3_bucket(&code.bucket)
            .s3_key(&code.key)
            .set_s3_object_version(code.object_version.clone())
            .publish(true);
        self.run(async move {
            let output = request.send().await.map_err(|err| failed("update function code", &err))?;
            configuration("update function code", output.function_arn())
        })
    }

    fn update_function_configuration(
        &self,
        spec: &FunctionSpec,
    ) -> Result<FunctionConfiguration, RemoteError> {
        let request = self
            .lambda
            .update_function_configuration()
            .function_name(&spec.name)
            .role(&spec.role_arn)
            .handler(&spec.handler)
            .runtime(Runtime::from(spec.runtime.as_str()))
            .description(&spec.description)
            .timeout(spec.timeout)
            .memory_size(spec.memory)
            .set_vpc_config(vpc_config(spec.vpc.as_ref()))
            .environment(environment(spec));
        self.run(async move {
            let output =
                request.send().await.map_err(|err| failed("update function configuration", &err))?;
            configuration("update function configuration", output.function_arn())
        })
    }

    fn wait_until_function_active(&self, function_name: &str) -> Result<(), RemoteError> {
        let client = self.lambda.clone();
        let function_name = function_name.to_string();
        self.run(async move {
            client
                .wait_until_function_active_v2()
                .function_name(function_name)
                .wait(FUNCTION_SETTLE_TIMEOUT)
                .await
                .map_err(|err| failed("wait for function active", &err))?;
            Ok(())
        })
    }

    fn wait_until_function_updated(&self, function_name: &str) -> Result<(), RemoteError> {
        let client = self.lambda.clone();
        let function_name = function_name.to_string();
        self.run(async move {
            client
                .wait_until_function_updated_v2()
                .function_name(function_name)
                .wait(FUNCTION_SETTLE_TIMEOUT)
                .await
                .map_err(|err| failed("wait for function update", &err))?;
            Ok(())
        })
    }
}

// ============================================================================
// SECTION: Permission Manager
// ============================================================================

impl PermissionManager for AwsCloudProvider {
    fn get_policy(&self, function_name: &str) -> Result<Vec<PolicyStatement>, RemoteError> {
        let client = self.lambda.clone();
        let function_name = function_name.to_string();
        self.run(async move {
            let output =
                client.get_policy().function_name(&function_name).send().await.map_err(|err| {
                    if err
                        .as_service_error()
                        .is_some_and(GetPolicyError::is_resource_not_found_exception)
                    {
                        RemoteError::NotFound(function_name.clone())
                    } else {
                        failed("get policy", &err)
                    }
                })?;
            let Some(document) = output.policy() else {
                return Ok(Vec::new());
            };
            parse_policy_document(document)
                .map_err(|err| RemoteError::Failed(format!("get policy {function_name}: {err}")))
        })
    }

    fn add_permission(
        &self,
        function_name: &str,
        statement: &PolicyStatement,
    ) -> Result<(), RemoteError> {
        let request = self
            .lambda
            .add_permission()
            .function_name(function_name)
            .statement_id(statement.statement_id.as_str())
            .action(&statement.action)
            .principal(&statement.principal)
            .set_source_arn(statement.source_arn.clone());
        self.run(async move {
            request.send().await.map_err(|err| failed("add permission", &err))?;
            Ok(())
        })
    }

    fn remove_permission(
        &self,
        function_name: &str,
        statement_id: &StatementId,
    ) -> Result<(), RemoteError> {
        let request = self
            .lambda
            .remove_permission()
            .function_name(function_name)
            .statement_id(statement_id.as_str());
        let subject = statement_id.to_string();
        self.run(async move {
            request.send().await.map_err(|err| {
                if err
                    .as_service_error()
                    .is_some_and(RemovePermissionError::is_resource_not_found_exception)
                {
                    RemoteError::NotFound(subject.clone())
                } else {
                    failed("remove permission", &err)
                }
            })?;
            Ok(())
        })
    }
}
