// crates/hexaville-cli/src/lib.rs
// ============================================================================
// Module: Hexaville CLI Library
// Description: Build, packaging, scaffolding, and output helpers for the CLI.
// Purpose: Keep the binary's collaborators testable outside `main`.
// Dependencies: crate::{builder, events, i18n, packager, process, project, templates}
// ============================================================================

//! ## Overview
//! The `hexaville` binary drives the deployment engine. Everything around
//! the engine lives here: the containerized build, the function archive,
//! project scaffolding, deploy event rendering, and the message catalog.

// ============================================================================
// SECTION: Modules
// ============================================================================

/// Containerized application build.
pub mod builder;
/// Deploy event sinks.
pub mod events;
/// Message catalog helpers.
pub mod i18n;
/// Function archive packaging.
pub mod packager;
/// Cancellable external processes.
pub mod process;
/// Project scaffolding.
pub mod project;
/// Embedded templates.
pub mod templates;
