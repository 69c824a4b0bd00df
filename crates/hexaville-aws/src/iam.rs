// crates/hexaville-aws/src/iam.rs
// ============================================================================
// Module: IAM Role Manager
// Description: Execution role lookup, creation, and inline policies.
// Purpose: Implement `RoleManager` on IAM.
// Dependencies: aws-sdk-iam
// ============================================================================

// ============================================================================
// SECTION: Imports
// ============================================================================

use aws_sdk_iam::operation::get_role::GetRoleError;
use aws_sdk_iam::operation::get_role_policy::GetRolePolicyError;
use hexaville_core::RemoteError;
use hexaville_core::RoleManager;

use crate::client::AwsCloudProvider;
use crate::client::failed;

// ============================================================================
// SECTION: Role Manager
// ============================================================================

impl RoleManager for AwsCloudProvider {
    fn get_role_arn(&self, role_name: &str) -> Result<String, RemoteError> {
        let client = self.iam.clone();
        let role_name = role_name.to_string();
        self.run(async move {
            let output =
                client.get_role().role_name(&role_name).send().await.map_err(|err| {
                    if err.as_service_error().is_some_and(GetRoleError::is_no_such_entity_exception)
                    {
                        RemoteError::NotFound(role_name.clone())
                    } else {
                        failed("get role", &err)
                    }
                })?;
            output
                .role()
                .map(|role| role.arn().to_string())
                .ok_or_else(|| RemoteError::Failed(format!("get role {role_name}: missing role")))
        })
    }

    fn create_role(
        &self,
        role_name: &str,
        assume_role_policy: &str,
    ) -> Result<String, RemoteError> {
        let client = self.iam.clone();
        let role_name = role_name.to_string();
        let assume_role_policy = assume_role_policy.to_string();
        self.run(async move {
            let output = client
                .create_role()
                .role_name(&role_name)
                .assume_role_policy_document(assume_role_policy)
                .send()
                .await
                .map_err(|err| failed("create role", &err))?;
            output
                .role()
                .map(|role| role.arn().to_string())
                .ok_or_else(|| {
                    RemoteError::Failed(format!("create role {role_name}: missing role"))
                })
        })
    }

    fn role_policy_exists(&self, role_name: &str, policy_name: &str) -> Result<bool, RemoteError> {
        let client = self.iam.clone();
        let role_name = role_name.to_string();
        let policy_name = policy_name.to_string();
        self.run(async move {
            let response =
                client.get_role_policy().role_name(role_name).policy_name(policy_name).send().await;
            match response {
                Ok(_) => Ok(true),
                Err(err)
                    if err
                        .as_service_error()
                        .is_some_and(GetRolePolicyError::is_no_such_entity_exception) =>
                {
                    Ok(false)
                }
                Err(err) => Err(failed("get role policy", &err)),
            }
        })
    }

    fn put_role_policy(
        &self,
        role_name: &str,
        policy_name: &str,
        policy_document: &str,
    ) -> Result<(), RemoteError> {
        let client = self.iam.clone();
        let role_name = role_name.to_string();
        let policy_name = policy_name.to_string();
        let policy_document = policy_document.to_string();
        self.run(async move {
            client
                .put_role_policy()
                .role_name(role_name)
                .policy_name(policy_name)
                .policy_document(policy_document)
                .send()
                .await
                .map_err(|err| failed("put role policy", &err))?;
            Ok(())
        })
    }
}
