//! # launchpad-runtime
//!
//! Drives the external container runtime for one instance.
//!
//! - **Commands**: Argument lists for every docker verb used.
//! - **Runtime**: The [`runtime::ContainerRuntime`] seam and its docker CLI
//!   implementation.
//! - **Lifecycle**: Maps a requested action onto runtime invocations.

pub mod commands;
pub mod lifecycle;
pub mod runtime;
