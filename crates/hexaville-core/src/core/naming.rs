// crates/hexaville-core/src/core/naming.rs
// ============================================================================
// Module: Resource Naming
// Description: Names of every remote object Hexaville owns for an application.
// Purpose: Keep function, API, and role names consistent across commands.
// Dependencies: none
// ============================================================================

//! ## Overview
//! Every remote object is named after the application so that repeated
//! deployments find what earlier runs created.

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Prefix shared by Hexaville-owned names.
pub const APP_PREFIX: &str = "hexaville";
/// Function handler exported by the generated shim.
pub const FUNCTION_HANDLER: &str = "index.handler";
/// Default function runtime.
pub const DEFAULT_FUNCTION_RUNTIME: &str = "nodejs20.x";
/// Description attached to created functions.
pub const FUNCTION_DESCRIPTION: &str = "Automatically generated by Hexaville";
/// Name of the inline logging policy attached to the managed role.
pub const ROLE_POLICY_NAME: &str = "permissions-policy-for-lambda";

/// Trust policy letting the function service assume the managed role.
pub const ASSUME_ROLE_POLICY_DOCUMENT: &str = concat!(
    r#"{"Version":"2012-10-17","Statement":{"Effect":"Allow","#,
    r#""Principal":{"Service":"lambda.amazonaws.com"},"Action":"sts:AssumeRole"}}"#,
);

/// Inline policy allowing the function to write logs.
pub const LOGS_POLICY_DOCUMENT: &str = concat!(
    r#"{"Version":"2012-10-17","Statement":[{"Effect":"Allow","#,
    r#""Action":["logs:CreateLogGroup","logs:CreateLogStream","logs:PutLogEvents"],"#,
    r#""Resource":"arn:aws:logs:*:*:*"}]}"#,
);

// ============================================================================
// SECTION: Naming
// ============================================================================

/// Derives remote object names from an application name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppNaming {
    /// Application name from the Hexavillefile.
    app_name: String,
}

impl AppNaming {
    /// Creates naming rules for an application.
    #[must_use]
    pub fn new(app_name: impl Into<String>) -> Self {
        Self {
            app_name: app_name.into(),
        }
    }

    /// Returns the application name.
    #[must_use]
    pub fn app_name(&self) -> &str {
        &self.app_name
    }

    /// Returns the function name.
    #[must_use]
    pub fn function_name(&self) -> String {
        format!("{APP_PREFIX}-{}-function", self.app_name)
    }

    /// Returns the REST API name.
    #[must_use]
    pub fn api_name(&self) -> String {
        format!("{APP_PREFIX}-{}", self.app_name)
    }

    /// Returns the managed execution role name.
    #[must_use]
    pub fn role_name(&self) -> String {
        format!("{}-and-lambda-basic-execution", self.app_name)
    }
}
