// crates/hexaville-aws/src/gateway.rs
// ============================================================================
// Module: API Gateway Manager
// Description: REST API, resource, method, integration, and deployment calls.
// Purpose: Implement `GatewayManager` on API Gateway.
// Dependencies: aws-sdk-apigateway
// ============================================================================

//! ## Overview
//! Listing calls page through results with `position`. Resources are fetched
//! with their methods embedded so one listing is enough to build the index.
//! Existence checks map the service's not-found error to `false`; every other
//! failure propagates.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeSet;

use aws_sdk_apigateway::operation::delete_method::DeleteMethodError;
use aws_sdk_apigateway::operation::delete_resource::DeleteResourceError;
use aws_sdk_apigateway::operation::get_integration::GetIntegrationError;
use aws_sdk_apigateway::operation::get_integration_response::GetIntegrationResponseError;
use aws_sdk_apigateway::operation::get_method::GetMethodError;
use aws_sdk_apigateway::operation::get_method_response::GetMethodResponseError;
use aws_sdk_apigateway::types::IntegrationType;
use aws_sdk_apigateway::types::Op;
use aws_sdk_apigateway::types::Resource;
use hexaville_core::DeploymentStage;
use hexaville_core::GatewayManager;
use hexaville_core::PatchOp;
use hexaville_core::PatchOperation;
use hexaville_core::RemoteError;
use hexaville_core::RemoteResource;
use hexaville_core::ResourceId;
use hexaville_core::RestApi;
use hexaville_core::RestApiId;
use hexaville_core::gateway::BACKEND_INVOCATION_METHOD;
use hexaville_core::gateway::METHOD_AUTHORIZATION_TYPE;

use crate::client::AwsCloudProvider;
use crate::client::failed;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Page size for listing calls.
const PAGE_LIMIT: i32 = 500;
/// Embed directive returning methods with each resource.
const EMBED_METHODS: &str = "methods";

// ============================================================================
// SECTION: Conversions
// ============================================================================

/// Converts a core patch to the SDK shape.
pub(crate) fn sdk_patch(patch: &PatchOperation) -> aws_sdk_apigateway::types::PatchOperation {
    let op = match patch.op {
        PatchOp::Add => Op::Add,
        PatchOp::Replace => Op::Replace,
        PatchOp::Remove => Op::Remove,
    };
    aws_sdk_apigateway::types::PatchOperation::builder()
        .op(op)
        .path(&patch.path)
        .set_value(patch.value.clone())
        .build()
}

/// Converts an SDK resource; resources without an id or path are skipped.
pub(crate) fn remote_resource(resource: &Resource) -> Option<RemoteResource> {
    let id = resource.id()?;
    let path = resource.path()?;
    let path_part = resource.path_part().unwrap_or(if path == "/" { "/" } else { "" });
    let methods = resource
        .resource_methods()
        .map(|methods| methods.keys().map(|method| method.to_ascii_uppercase()).collect())
        .unwrap_or_default();
    Some(RemoteResource {
        id: ResourceId::new(id),
        path: path.to_string(),
        path_part: path_part.to_string(),
        parent_id: resource.parent_id().map(ResourceId::new),
        methods,
    })
}

// ============================================================================
// SECTION: Gateway Manager
// ============================================================================

impl GatewayManager for AwsCloudProvider {
    fn list_rest_apis(&self) -> Result<Vec<RestApi>, RemoteError> {
        let client = self.gateway.clone();
        self.run(async move {
            let mut apis = Vec::new();
            let mut position: Option<String> = None;
            loop {
                let output = client
                    .get_rest_apis()
                    .limit(PAGE_LIMIT)
                    .set_position(position.take())
                    .send()
                    .await
                    .map_err(|err| failed("get rest apis", &err))?;
                apis.extend(output.items().iter().filter_map(|api| {
                    Some(RestApi {
                        id: RestApiId::new(api.id()?),
                        name: api.name().unwrap_or_default().to_string(),
                        binary_media_types: api.binary_media_types().to_vec(),
                    })
                }));
                match output.position() {
                    Some(next) if !next.is_empty() => position = Some(next.to_string()),
                    _ => break,
                }
            }
            Ok(apis)
        })
    }

    fn create_rest_api(&self, name: &str) -> Result<RestApi, RemoteError> {
        let request = self.gateway.create_rest_api().name(name);
        self.run(async move {
            let output = request.send().await.map_err(|err| failed("create rest api", &err))?;
            let id = output
                .id()
                .ok_or_else(|| RemoteError::Failed("create rest api: missing id".to_string()))?;
            Ok(RestApi {
                id: RestApiId::new(id),
                name: output.name().unwrap_or_default().to_string(),
                binary_media_types: output.binary_media_types().to_vec(),
            })
        })
    }

    fn update_rest_api(
        &self,
        rest_api_id: &RestApiId,
        patches: &[PatchOperation],
    ) -> Result<(), RemoteError> {
        let request = self
            .gateway
            .update_rest_api()
            .rest_api_id(rest_api_id.as_str())
            .set_patch_operations(Some(patches.iter().map(sdk_patch).collect()));
        self.run(async move {
            request.send().await.map_err(|err| failed("update rest api", &err))?;
            Ok(())
        })
    }

    fn get_resources(&self, rest_api_id: &RestApiId) -> Result<Vec<RemoteResource>, RemoteError> {
        let client = self.gateway.clone();
        let rest_api_id = rest_api_id.to_string();
        self.run(async move {
            let mut resources = Vec::new();
            let mut position: Option<String> = None;
            loop {
                let output = client
                    .get_resources()
                    .rest_api_id(&rest_api_id)
                    .embed(EMBED_METHODS)
                    .limit(PAGE_LIMIT)
                    .set_position(position.take())
                    .send()
                    .await
                    .map_err(|err| failed("get resources", &err))?;
                resources.extend(output.items().iter().filter_map(remote_resource));
                match output.position() {
                    Some(next) if !next.is_empty() => position = Some(next.to_string()),
                    _ => break,
                }
            }
            Ok(resources)
        })
    }

    fn create_resource(
        &self,
        rest_api_id: &RestApiId,
        parent_id: &ResourceId,
        path_part: &str,
    ) -> Result<RemoteResource, RemoteError> {
        let request = self
            .gateway
            .create_resource()
            .rest_api_id(rest_api_id.as_str())
            .parent_id(parent_id.as_str())
            .path_part(path_part);
        let parent_id = parent_id.clone();
        let path_part = path_part.to_string();
        self.run(async move {
            let output = request.send().await.map_err(|err| failed("create resource", &err))?;
            let id = output
                .id()
                .ok_or_else(|| RemoteError::Failed("create resource: missing id".to_string()))?;
            let path = output
                .path()
                .ok_or_else(|| RemoteError::Failed("create resource: missing path".to_string()))?;
            Ok(RemoteResource {
                id: ResourceId::new(id),
                path: path.to_string(),
                path_part,
                parent_id: Some(parent_id),
                methods: BTreeSet::new(),
            })
        })
    }

    fn delete_resource(
        &self,
        rest_api_id: &RestApiId,
        resource_id: &ResourceId,
    ) -> Result<(), RemoteError> {
        let request = self
            .gateway
            .delete_resource()
            .rest_api_id(rest_api_id.as_str())
            .resource_id(resource_id.as_str());
        let subject = resource_id.to_string();
        self.run(async move {
            request.send().await.map_err(|err| {
                if err.as_service_error().is_some_and(DeleteResourceError::is_not_found_exception) {
                    RemoteError::NotFound(subject.clone())
                } else {
                    failed("delete resource", &err)
                }
            })?;
            Ok(())
        })
    }

    fn method_exists(
        &self,
        rest_api_id: &RestApiId,
        resource_id: &ResourceId,
        method: &str,
    ) -> Result<bool, RemoteError> {
        let request = self
            .gateway
            .get_method()
            .rest_api_id(rest_api_id.as_str())
            .resource_id(resource_id.as_str())
            .http_method(method);
        self.run(async move {
            match request.send().await {
                Ok(_) => Ok(true),
                Err(err)
                    if err.as_service_error().is_some_and(GetMethodError::is_not_found_exception) =>
                {
                    Ok(false)
                }
                Err(err) => Err(failed("get method", &err)),
            }
        })
    }

    fn put_method(
        &self,
        rest_api_id: &RestApiId,
        resource_id: &ResourceId,
        method: &str,
    ) -> Result<(), RemoteError> {
        let request = self
            .gateway
            .put_method()
            .rest_api_id(rest_api_id.as_str())
            .resource_id(resource_id.as_str())
            .http_method(method)
            .authorization_type(METHOD_AUTHORIZATION_TYPE)
            .api_key_required(false);
        self.run(async move {
            request.send().await.map_err(|err| failed("put method", &err))?;
            Ok(())
        })
    }

    fn delete_method(
        &self,
        rest_api_id: &RestApiId,
        resource_id: &ResourceId,
        method: &str,
    ) -> Result<(), RemoteError> {
        let request = self
            .gateway
            .delete_method()
            .rest_api_id(rest_api_id.as_str())
            .resource_id(resource_id.as_str())
            .http_method(method);
        let subject = format!("{method} {resource_id}");
        self.run(async move {
            request.send().await.map_err(|err| {
                if err.as_service_error().is_some_and(DeleteMethodError::is_not_found_exception) {
                    RemoteError::NotFound(subject.clone())
                } else {
                    failed("delete method", &err)
                }
            })?;
            Ok(())
        })
    }

    fn integration_exists(
        &self,
        rest_api_id: &RestApiId,
        resource_id: &ResourceId,
        method: &str,
    ) -> Result<bool, RemoteError> {
        let request = self
            .gateway
            .get_integration()
            .rest_api_id(rest_api_id.as_str())
            .resource_id(resource_id.as_str())
            .http_method(method);
        self.run(async move {
            match request.send().await {
                Ok(_) => Ok(true),
                Err(err)
                    if err
                        .as_service_error()
                        .is_some_and(GetIntegrationError::is_not_found_exception) =>
                {
                    Ok(false)
                }
                Err(err) => Err(failed("get integration", &err)),
            }
        })
    }

    fn put_integration(
        &self,
        rest_api_id: &RestApiId,
        resource_id: &ResourceId,
        method: &str,
        uri: &str,
    ) -> Result<(), RemoteError> {
        let request = self
            .gateway
            .put_integration()
            .rest_api_id(rest_api_id.as_str())
            .resource_id(resource_id.as_str())
            .http_method(method)
            .r#type(IntegrationType::AwsProxy)
            .integration_http_method(BACKEND_INVOCATION_METHOD)
            .uri(uri);
        self.run(async move {
            request.send().await.map_err(|err| failed("put integration", &err))?;
            Ok(())
        })
    }

    fn update_integration(
        &self,
        rest_api_id: &RestApiId,
        resource_id: &ResourceId,
        method: &str,
        patches: &[PatchOperation],
    ) -> Result<(), RemoteError> {
        let request = self
            .gateway
            .update_integration()
            .rest_api_id(rest_api_id.as_str())
            .resource_id(resource_id.as_str())
            .http_method(method)
            .set_patch_operations(Some(patches.iter().map(sdk_patch).collect()));
        self.run(async move {
            request.send().await.map_err(|err| failed("update integration", &err))?;
            Ok(())
        })
    }

    fn integration_response_exists(
        &self,
        rest_api_id: &RestApiId,
        resource_id: &ResourceId,
        method: &str,
        status_code: &str,
    ) -> Result<bool, RemoteError> {
        let request = self
            .gateway
            .get_integration_response()
            .rest_api_id(rest_api_id.as_str())
            .resource_id(resource_id.as_str())
            .http_method(method)
            .status_code(status_code);
        self.run(async move {
            match request.send().await {
                Ok(_) => Ok(true),
                Err(err)
                    if err
                        .as_service_error()
                        .is_some_and(GetIntegrationResponseError::is_not_found_exception) =>
                {
                    Ok(false)
                }
                Err(err) => Err(failed("get integration response", &err)),
            }
        })
    }

    fn put_integration_response(
        &self,
        rest_api_id: &RestApiId,
        resource_id: &ResourceId,
        method: &str,
        status_code: &str,
    ) -> Result<(), RemoteError> {
        let request = self
            .gateway
            .put_integration_response()
            .rest_api_id(rest_api_id.as_str())
            .resource_id(resource_id.as_str())
            .http_method(method)
            .status_code(status_code);
        self.run(async move {
            request.send().await.map_err(|err| failed("put integration response", &err))?;
            Ok(())
        })
    }

    fn method_response_exists(
        &self,
        rest_api_id: &RestApiId,
        resource_id: &ResourceId,
        method: &str,
        status_code: &str,
    ) -> Result<bool, RemoteError> {
        let request = self
            .gateway
            .get_method_response()
            .rest_api_id(rest_api_id.as_str())
            .resource_id(resource_id.as_str())
            .http_method(method)
            .status_code(status_code);
        self.run(async move {
            match request.send().await {
                Ok(_) => Ok(true),
                Err(err)
                    if err
                        .as_service_error()
                        .is_some_and(GetMethodResponseError::is_not_found_exception) =>
                {
                    Ok(false)
                }
                Err(err) => Err(failed("get method response", &err)),
            }
        })
    }

    fn put_method_response(
        &self,
        rest_api_id: &RestApiId,
        resource_id: &ResourceId,
        method: &str,
        status_code: &str,
    ) -> Result<(), RemoteError> {
        let request = self
            .gateway
            .put_method_response()
            .rest_api_id(rest_api_id.as_str())
            .resource_id(resource_id.as_str())
            .http_method(method)
            .status_code(status_code);
        self.run(async move {
            request.send().await.map_err(|err| failed("put method response", &err))?;
            Ok(())
        })
    }

    fn create_deployment(
        &self,
        rest_api_id: &RestApiId,
        stage: &DeploymentStage,
    ) -> Result<(), RemoteError> {
        let request = self
            .gateway
            .create_deployment()
            .rest_api_id(rest_api_id.as_str())
            .stage_name(stage.as_str());
        self.run(async move {
            request.send().await.map_err(|err| failed("create deployment", &err))?;
            Ok(())
        })
    }
}
