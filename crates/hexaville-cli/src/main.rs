// crates/hexaville-cli/src/main.rs
// ============================================================================
// Module: Hexaville CLI Entry Point
// Description: Command dispatcher for deploy, routes, package, and generate.
// Purpose: Turn a Hexavillefile into a live API gateway + function deployment.
// Dependencies: clap, hexaville-aws, hexaville-config, hexaville-core, tokio.
// ============================================================================

//! ## Overview
//! `deploy` builds the application in a container, packages it, and hands
//! the archive and route manifest to the deployment engine. `routes` lists
//! what is deployed. `package` stops after packaging. `generate` scaffolds a
//! new project. An interrupt cancels in-flight build processes; remote
//! reconciliation itself runs on a blocking thread and is abandoned on
//! interrupt.

// ============================================================================
// SECTION: Modules
// ============================================================================


// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::io::Write;
use std::path::Path;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::ArgAction;
use clap::Args;
use clap::CommandFactory;
use clap::Parser;
use clap::Subcommand;
use hexaville_aws::AwsCloudProvider;
use hexaville_cli::builder::DockerBuilder;
use hexaville_cli::events::ConsoleDeploySink;
use hexaville_cli::events::FanoutDeploySink;
use hexaville_cli::events::FileDeploySink;
use hexaville_cli::events::StderrJsonDeploySink;
use hexaville_cli::packager;
use hexaville_cli::project;
use hexaville_cli::project::GenerateOptions;
use hexaville_cli::t;
use hexaville_config::DOTENV_FILE_NAME;
use hexaville_config::HexavilleFile;
use hexaville_config::SwiftVersion;
use hexaville_config::load_dotenv;
use hexaville_config::resolve_path;
use hexaville_core::AppNaming;
use hexaville_core::BuildArtifact;
use hexaville_core::DeployRequest;
use hexaville_core::Deployer;
use hexaville_core::DeployerConfig;
use hexaville_core::DeploymentStage;
use hexaville_core::LambdaPackage;
use hexaville_core::NoopDeploySink;
use hexaville_core::RouteManifest;
use thiserror::Error;
use time::OffsetDateTime;
use tokio_util::sync::CancellationToken;

// ============================================================================
// SECTION: CLI Types
// ============================================================================

/// Top-level CLI definition.
#[derive(Parser, Debug)]
#[command(name = "hexaville", disable_help_subcommand = true, disable_version_flag = true)]
struct Cli {
    /// Print version information and exit.
    #[arg(long = "version", action = ArgAction::SetTrue, global = true)]
    show_version: bool,
    /// Selected subcommand to execute.
    #[command(subcommand)]
    command: Option<Commands>,
}

/// Supported CLI subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Build, package, and deploy the application.
    Deploy(DeployCommand),
    /// List the deployed routes.
    Routes(RoutesCommand),
    /// Build and package the application without deploying.
    Package(PackageCommand),
    /// Create a new application.
    Generate(GenerateCommand),
}

/// Location of the Hexavillefile.
#[derive(Args, Debug, Clone)]
struct ConfigLocationArgs {
    /// Path to the Hexavillefile (defaults to `$HEXAVILLEFILE`, then
    /// `./Hexavillefile.yml`).
    #[arg(short = 'c', long = "hexavillefile", value_name = "PATH")]
    hexavillefile: Option<PathBuf>,
}

/// Configuration for the `deploy` command.
#[derive(Args, Debug)]
struct DeployCommand {
    /// Hexavillefile location.
    #[command(flatten)]
    config: ConfigLocationArgs,
    /// Deployment stage name.
    #[arg(long, value_name = "NAME")]
    stage: Option<String>,
    /// Append JSON deploy events to this file.
    #[arg(long = "event-log", value_name = "PATH")]
    event_log: Option<PathBuf>,
    /// Stream JSON deploy events to stderr.
    #[arg(long = "json-events", action = ArgAction::SetTrue)]
    json_events: bool,
}

/// Configuration for the `routes` command.
#[derive(Args, Debug)]
struct RoutesCommand {
    /// Hexavillefile location.
    #[command(flatten)]
    config: ConfigLocationArgs,
    /// Deployment stage name.
    #[arg(long, value_name = "NAME")]
    stage: Option<String>,
}

/// Configuration for the `package` command.
#[derive(Args, Debug)]
struct PackageCommand {
    /// Hexavillefile location.
    #[command(flatten)]
    config: ConfigLocationArgs,
}

/// Configuration for the `generate` command.
#[derive(Args, Debug)]
struct GenerateCommand {
    /// Project name.
    name: String,
    /// Parent directory of the new project (defaults to the working directory).
    #[arg(short = 'o', long = "dest", value_name = "DIR")]
    dest: Option<PathBuf>,
    /// Toolchain version, for example `5.1`.
    #[arg(long = "swift-tools-version", value_name = "VERSION")]
    swift_tools_version: Option<SwiftVersion>,
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// CLI error wrapper for user-facing failures.
#[derive(Debug, Error)]
#[error("{message}")]
struct CliError {
    /// Error message for display.
    message: String,
}

impl CliError {
    /// Creates a new CLI error with the provided message.
    const fn new(message: String) -> Self {
        Self {
            message,
        }
    }
}

/// CLI result alias for fallible operations.
type CliResult<T> = Result<T, CliError>;

// ============================================================================
// SECTION: Entry Point
// ============================================================================

/// CLI entry point returning an exit code.
#[tokio::main(flavor = "multi_thread")]
async fn main() -> ExitCode {
    match run().await {
        Ok(code) => code,
        Err(err) => emit_error(&err.to_string()),
    }
}

/// Executes the CLI command dispatcher.
async fn run() -> CliResult<ExitCode> {
    let cli = Cli::parse();

    if cli.show_version {
        let version = env!("CARGO_PKG_VERSION");
        write_stdout_line(&t!("main.version", version = version))
            .map_err(|err| CliError::new(output_error("stdout", &err)))?;
        return Ok(ExitCode::SUCCESS);
    }

    let Some(command) = cli.command else {
        show_help()?;
        return Ok(ExitCode::SUCCESS);
    };

    let cancel = CancellationToken::new();
    spawn_interrupt_listener(cancel.clone());

    match command {
        Commands::Deploy(command) => command_deploy(command, &cancel).await,
        Commands::Routes(command) => command_routes(command, &cancel).await,
        Commands::Package(command) => command_package(command, &cancel).await,
        Commands::Generate(command) => command_generate(&command),
    }
}

/// Prints the top-level help.
fn show_help() -> CliResult<()> {
    let mut command = Cli::command();
    command.print_help().map_err(|err| CliError::new(output_error("stdout", &err)))?;
    write_stdout_line("").map_err(|err| CliError::new(output_error("stdout", &err)))
}

/// Cancels `cancel` on the first interrupt signal.
fn spawn_interrupt_listener(cancel: CancellationToken) {
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            cancel.cancel();
        }
    });
}

// ============================================================================
// SECTION: Deploy Command
// ============================================================================

/// Executes the `deploy` command.
async fn command_deploy(command: DeployCommand, cancel: &CancellationToken) -> CliResult<ExitCode> {
    let project = load_project(&command.config)?;
    let environment = load_environment(&project.app_dir)?;
    let bucket = project
        .config
        .require_bucket()
        .map_err(|err| CliError::new(t!("deploy.failed", error = err)))?
        .to_string();

    let artifact = build(&project, cancel).await?;
    let archive = package(&project, &artifact)?;
    let bytes = std::fs::read(&archive)
        .map_err(|err| CliError::new(t!("package.failed", error = err)))?;
    let manifest = RouteManifest::load(&artifact.manifest_path())
        .map_err(|err| CliError::new(t!("manifest.load_failed", error = err)))?;

    let naming = AppNaming::new(project.config.app_name.clone());
    let stage = parse_stage(command.stage.as_deref());
    let request = DeployRequest {
        naming,
        stage: stage.clone(),
        bucket,
        package: LambdaPackage::timestamped(bytes, OffsetDateTime::now_utc()),
        function: project.config.function_settings(environment),
        manifest,
    };
    let sink = deploy_sink(&command)?;
    let settings = project.config.aws().clone();

    write_line(&t!("deploy.start", app = project.config.app_name, stage = stage.as_str()))?;
    let result = run_blocking(cancel, move || {
        let cloud = AwsCloudProvider::new(&settings)
            .map_err(|err| CliError::new(t!("deploy.provider_failed", error = err)))?;
        Deployer::new(cloud, sink, DeployerConfig::default())
            .deploy(&request)
            .map_err(|err| CliError::new(t!("deploy.failed", error = err)))
    })
    .await?;

    write_line(&t!("deploy.info.rule"))?;
    write_line(&t!("deploy.info.header"))?;
    write_line("")?;
    write_line(&t!("deploy.info.app", app = project.config.app_name))?;
    write_line(&t!("deploy.info.endpoint", endpoint = result.endpoint))?;
    write_line(&t!("deploy.info.stage", stage = stage.as_str()))?;
    write_line(&t!("deploy.info.rule"))?;
    write_line(&t!("deploy.done"))?;
    Ok(ExitCode::SUCCESS)
}

/// Builds the event sink requested by the deploy flags.
fn deploy_sink(command: &DeployCommand) -> CliResult<FanoutDeploySink> {
    let mut sink = FanoutDeploySink::new().with(Box::new(ConsoleDeploySink::stdout()));
    if command.json_events {
        sink = sink.with(Box::new(StderrJsonDeploySink));
    }
    if let Some(path) = &command.event_log {
        let file = FileDeploySink::new(path).map_err(|err| {
            CliError::new(t!("deploy.event_log_failed", path = path.display(), error = err))
        })?;
        sink = sink.with(Box::new(file));
    }
    Ok(sink)
}

// ============================================================================
// SECTION: Routes Command
// ============================================================================

/// Executes the `routes` command.
async fn command_routes(command: RoutesCommand, cancel: &CancellationToken) -> CliResult<ExitCode> {
    let project = load_project(&command.config)?;
    let naming = AppNaming::new(project.config.app_name.clone());
    let stage = parse_stage(command.stage.as_deref());
    let settings = project.config.aws().clone();

    let report = run_blocking(cancel, move || {
        let cloud = AwsCloudProvider::new(&settings)
            .map_err(|err| CliError::new(t!("deploy.provider_failed", error = err)))?;
        Deployer::new(cloud, NoopDeploySink, DeployerConfig::default())
            .routes(&naming, &stage)
            .map_err(|err| CliError::new(t!("routes.failed", error = err)))
    })
    .await?;

    write_line(&t!("routes.endpoint", endpoint = report.endpoint))?;
    write_line(&t!("routes.header"))?;
    for route in &report.routes {
        for method in &route.methods {
            write_line(&t!("routes.entry", method = method, path = route.path))?;
        }
    }
    Ok(ExitCode::SUCCESS)
}

// ============================================================================
// SECTION: Package Command
// ============================================================================

/// Executes the `package` command.
async fn command_package(
    command: PackageCommand,
    cancel: &CancellationToken,
) -> CliResult<ExitCode> {
    let project = load_project(&command.config)?;
    let artifact = build(&project, cancel).await?;
    package(&project, &artifact)?;
    Ok(ExitCode::SUCCESS)
}

// ============================================================================
// SECTION: Generate Command
// ============================================================================

/// Executes the `generate` command.
fn command_generate(command: &GenerateCommand) -> CliResult<ExitCode> {
    let dest = match &command.dest {
        Some(dest) => dest.clone(),
        None => current_dir()?,
    };
    let mut options = GenerateOptions::new(command.name.clone(), dest);
    if let Some(version) = &command.swift_tools_version {
        options.swift_version = version.clone();
    }
    let project_dir = project::generate(&options)
        .map_err(|err| CliError::new(t!("generate.failed", error = err)))?;
    write_line(&t!("generate.done", name = command.name, path = project_dir.display()))?;
    Ok(ExitCode::SUCCESS)
}

// ============================================================================
// SECTION: Shared Steps
// ============================================================================

/// Loaded Hexavillefile and its application directory.
struct Project {
    /// Parsed configuration.
    config: HexavilleFile,
    /// Directory holding the Hexavillefile.
    app_dir: PathBuf,
}

/// Resolves and loads the Hexavillefile.
fn load_project(location: &ConfigLocationArgs) -> CliResult<Project> {
    let resolved = resolve_path(location.hexavillefile.as_deref())
        .map_err(|err| CliError::new(t!("deploy.failed", error = err)))?;
    let path = if resolved.is_absolute() { resolved } else { current_dir()?.join(resolved) };
    let config = HexavilleFile::load_resolved(&path).map_err(|err| {
        CliError::new(t!("config.load_failed", path = path.display(), error = err))
    })?;
    write_line(&t!("config.path", path = path.display()))?;
    let app_dir = path.parent().map_or_else(|| PathBuf::from("."), Path::to_path_buf);
    Ok(Project {
        config,
        app_dir,
    })
}

/// Loads `.env` from the application directory, if present.
fn load_environment(app_dir: &Path) -> CliResult<BTreeMap<String, String>> {
    let path = app_dir.join(DOTENV_FILE_NAME);
    let loaded = load_dotenv(&path).map_err(|err| {
        CliError::new(t!("dotenv.load_failed", path = path.display(), error = err))
    })?;
    if let Some(environment) = loaded {
        return Ok(environment);
    }
    write_line(&t!("dotenv.missing"))?;
    Ok(BTreeMap::new())
}

/// Runs the containerized build.
async fn build(project: &Project, cancel: &CancellationToken) -> CliResult<BuildArtifact> {
    write_line(&t!("build.start"))?;
    let builder =
        DockerBuilder::locate().map_err(|err| CliError::new(t!("build.failed", error = err)))?;
    let artifact = builder
        .build(&project.app_dir, &project.config, cancel)
        .await
        .map_err(|err| CliError::new(t!("build.failed", error = err)))?;
    write_line(&t!("build.done"))?;
    Ok(artifact)
}

/// Packages the build artifact.
fn package(project: &Project, artifact: &BuildArtifact) -> CliResult<PathBuf> {
    write_line(&t!("package.start"))?;
    let archive = packager::package(&project.app_dir, artifact)
        .map_err(|err| CliError::new(t!("package.failed", error = err)))?;
    write_line(&t!("package.done", path = archive.display()))?;
    Ok(archive)
}

/// Returns the requested stage, defaulting to staging.
fn parse_stage(stage: Option<&str>) -> DeploymentStage {
    stage.map(DeploymentStage::parse).unwrap_or_default()
}

/// Runs blocking remote work until it finishes or `cancel` fires.
async fn run_blocking<F, T>(cancel: &CancellationToken, work: F) -> CliResult<T>
where
    F: FnOnce() -> CliResult<T> + Send + 'static,
    T: Send + 'static,
{
    let task = tokio::task::spawn_blocking(work);
    tokio::select! {
        () = cancel.cancelled() => Err(CliError::new(t!("runtime.interrupted"))),
        joined = task => {
            joined.map_err(|err| CliError::new(t!("runtime.join_failed", error = err)))?
        }
    }
}

/// Returns the working directory.
fn current_dir() -> CliResult<PathBuf> {
    std::env::current_dir().map_err(|err| CliError::new(t!("config.cwd_failed", error = err)))
}

// ============================================================================
// SECTION: Output Helpers
// ============================================================================

/// Writes a line to stdout, converting failures to [`CliError`].
fn write_line(message: &str) -> CliResult<()> {
    write_stdout_line(message).map_err(|err| CliError::new(output_error("stdout", &err)))
}

/// Writes a single line to stdout.
fn write_stdout_line(message: &str) -> std::io::Result<()> {
    let mut stdout = std::io::stdout();
    writeln!(&mut stdout, "{message}")
}

/// Writes a single line to stderr.
fn write_stderr_line(message: &str) -> std::io::Result<()> {
    let mut stderr = std::io::stderr();
    writeln!(&mut stderr, "{message}")
}

/// Formats an output error message.
fn output_error(stream: &str, error: &std::io::Error) -> String {
    let stream_label = match stream {
        "stdout" => t!("output.stream.stdout"),
        "stderr" => t!("output.stream.stderr"),
        _ => t!("output.stream.unknown"),
    };
    t!("output.write_failed", stream = stream_label, error = error)
}

/// Emits an error message to stderr and returns a failure exit code.
fn emit_error(message: &str) -> ExitCode {
    let _ = write_stderr_line(message);
    ExitCode::FAILURE
}
