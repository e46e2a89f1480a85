//! # launchpad-template
//!
//! Turns an instance config and its templates into docker directives.
//!
//! Handles:
//! - **Loader**: Resolving declared templates against ordered search roots.
//! - **Document**: Parsing fragments into generic YAML mappings.
//! - **Aggregate**: Folding fragments into params, base image, run arguments,
//!   and build-only fragments.
//! - **Substitute**: `$name` replacement from a parameter mapping.
//! - **Artifact**: Joining, splitting, and writing fragment streams.

pub mod aggregate;
pub mod artifact;
pub mod document;
pub mod fragment;
pub mod loader;
pub mod substitute;
