// crates/hexaville-cli/src/builder.rs
// ============================================================================
// Module: Docker Builder
// Description: Compiles the application inside a disposable build container.
// Purpose: Produce the build artifact the deployer consumes.
// Dependencies: hexaville-config, hexaville-core, thiserror, tokio-util
// ============================================================================

//! ## Overview
//! The builder writes a `Dockerfile`, `.dockerignore`, and `build-swift.sh`
//! into the application directory, builds the `hexaville-app` image, and
//! runs it with `__docker_shared` mounted as the container's `.build`
//! directory. The compiled executable and its routing manifest land in
//! `__docker_shared/{configuration}`.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fs;
use std::path::Path;
use std::path::PathBuf;

use hexaville_config::HexavilleFile;
use hexaville_core::BuildArtifact;
use thiserror::Error;
use tokio_util::sync::CancellationToken;

use crate::process::ProcessError;
use crate::process::find_executable;
use crate::process::run_command;
use crate::templates;
use crate::templates::TemplateError;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Image tag of the build container.
pub const IMAGE_TAG: &str = "hexaville-app";
/// Host directory shared with the container's build output.
pub const SHARED_DIR_NAME: &str = "__docker_shared";
/// Build directory inside the container.
pub const CONTAINER_BUILD_DIR: &str = "/hexaville-app/.build";
/// Docker executable name.
pub const DOCKER_PROGRAM: &str = "docker";

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Build failures.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum BuildError {
    /// A build context file could not be written.
    #[error("failed to write {path}: {error}")]
    Io {
        /// File path.
        path: String,
        /// Underlying error text.
        error: String,
    },
    /// An embedded template was unavailable.
    #[error(transparent)]
    Template(#[from] TemplateError),
    /// A docker invocation failed.
    #[error(transparent)]
    Process(#[from] ProcessError),
}

// ============================================================================
// SECTION: Build Context
// ============================================================================

/// Writes the container build files into `app_dir`.
///
/// # Errors
///
/// Returns [`BuildError`] when a template is missing or a file cannot be
/// written.
pub fn write_build_context(app_dir: &Path, config: &HexavilleFile) -> Result<(), BuildError> {
    let download_url = config.swift.version.download_url();
    let configuration = config.swift.build_configuration();
    let dockerfile = templates::render(
        templates::template(templates::DOCKERFILE)?,
        &[
            ("SWIFT_DOWNLOAD_URL", download_url.as_str()),
            ("EXECUTABLE_TARGET", config.executable_target.as_str()),
            ("BUILD_CONFIGURATION", configuration.as_str()),
        ],
    );
    write_file(&app_dir.join("Dockerfile"), &dockerfile)?;
    write_file(&app_dir.join(".dockerignore"), templates::template(templates::DOCKERIGNORE)?)?;
    write_file(&app_dir.join("build-swift.sh"), templates::template(templates::BUILD_SCRIPT)?)?;
    Ok(())
}

/// Returns the `docker build` arguments.
#[must_use]
pub fn docker_build_args(app_dir: &Path, nocache: bool) -> Vec<String> {
    let mut args = vec!["build".to_string(), "-t".to_string(), IMAGE_TAG.to_string()];
    if nocache {
        args.push("--no-cache".to_string());
    }
    args.push("-f".to_string());
    args.push(app_dir.join("Dockerfile").display().to_string());
    args.push(app_dir.display().to_string());
    args
}

/// Returns the `docker run` arguments.
#[must_use]
pub fn docker_run_args(shared_dir: &Path) -> Vec<String> {
    vec![
        "run".to_string(),
        "--rm".to_string(),
        "-v".to_string(),
        format!("{}:{CONTAINER_BUILD_DIR}", shared_dir.display()),
        IMAGE_TAG.to_string(),
    ]
}

/// Returns the artifact the build produces for `config`.
#[must_use]
pub fn expected_artifact(app_dir: &Path, config: &HexavilleFile) -> BuildArtifact {
    let configuration = config.swift.build_configuration();
    let destination = app_dir.join(SHARED_DIR_NAME).join(configuration.as_str());
    BuildArtifact::new(destination, config.executable_target.clone())
}

// ============================================================================
// SECTION: Builder
// ============================================================================

/// Runs the containerized build.
#[derive(Debug, Clone)]
pub struct DockerBuilder {
    /// Resolved docker executable.
    docker: PathBuf,
}

impl DockerBuilder {
    /// Locates docker on `PATH`.
    ///
    /// # Errors
    ///
    /// Returns [`BuildError::Process`] when docker is not installed.
    pub fn locate() -> Result<Self, BuildError> {
        Ok(Self {
            docker: find_executable(DOCKER_PROGRAM)?,
        })
    }

    /// Builds the application in `app_dir`.
    ///
    /// # Errors
    ///
    /// Returns [`BuildError`] when the context cannot be written or a docker
    /// step fails or is cancelled.
    pub async fn build(
        &self,
        app_dir: &Path,
        config: &HexavilleFile,
        cancel: &CancellationToken,
    ) -> Result<BuildArtifact, BuildError> {
        write_build_context(app_dir, config)?;
        let shared_dir = app_dir.join(SHARED_DIR_NAME);
        fs::create_dir_all(&shared_dir).map_err(|err| BuildError::Io {
            path: shared_dir.display().to_string(),
            error: err.to_string(),
        })?;
        run_command(
            &self.docker,
            &docker_build_args(app_dir, config.docker_nocache()),
            app_dir,
            cancel,
        )
        .await?;
        run_command(&self.docker, &docker_run_args(&shared_dir), app_dir, cancel).await?;
        Ok(expected_artifact(app_dir, config))
    }
}

/// Writes `content` to `path`.
fn write_file(path: &Path, content: &str) -> Result<(), BuildError> {
    fs::write(path, content).map_err(|err| BuildError::Io {
        path: path.display().to_string(),
        error: err.to_string(),
    })
}
