//! Unified error types for the launchpad workspace.
//!
//! Configuration problems (unreadable or malformed documents, unresolved
//! templates, malformed directives) are all fatal and are reported before any
//! container runtime invocation. Runtime failures carry the exit status of
//! the external process so the CLI can surface it unchanged.

use std::path::PathBuf;

use thiserror::Error;

/// Top-level error type shared across the workspace.
#[derive(Debug, Error)]
pub enum LaunchpadError {
    /// An I/O operation failed.
    #[error("I/O error at {path}: {source}")]
    Io {
        /// Path where the I/O error occurred.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// A YAML document could not be parsed or serialized.
    #[error("invalid YAML in {origin}: {source}")]
    Yaml {
        /// Human-readable description of the document (usually a path).
        origin: String,
        /// Underlying YAML error.
        source: serde_yaml::Error,
    },

    /// A configuration value is invalid.
    #[error("invalid configuration: {message}")]
    Config {
        /// Description of the invalid configuration.
        message: String,
    },

    /// A declared template exists in none of the search roots.
    #[error("template '{name}' not found in any of the template roots: {}", display_roots(.roots))]
    TemplateNotFound {
        /// Template name as declared in the instance config.
        name: String,
        /// Every root that was searched, in search order.
        roots: Vec<PathBuf>,
    },

    /// A recognized directive has the wrong shape.
    #[error("invalid `{directive}` directive: {message}")]
    InvalidDirective {
        /// Top-level key being consumed.
        directive: &'static str,
        /// Description of the structural problem.
        message: String,
    },

    /// The instance name derived from the config file is unusable.
    #[error(
        "config name '{name}' must not contain upper case characters, spaces or special characters"
    )]
    InvalidInstanceName {
        /// Offending name.
        name: String,
    },

    /// The container runtime exited unsuccessfully.
    #[error("`{command}` failed with {}", display_status(.status))]
    Runtime {
        /// Rendered command line.
        command: String,
        /// Exit code, if the process was not killed by a signal.
        status: Option<i32>,
    },
}

impl LaunchpadError {
    /// Exit code the process should terminate with for this error.
    ///
    /// Runtime failures surface the runtime's own status; everything else
    /// maps to `1`.
    #[must_use]
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Runtime {
                status: Some(code), ..
            } if *code != 0 => *code,
            _ => 1,
        }
    }
}

fn display_roots(roots: &[PathBuf]) -> String {
    let rendered: Vec<String> = roots.iter().map(|r| r.display().to_string()).collect();
    format!("[{}]", rendered.join(", "))
}

#[allow(clippy::ref_option)]
fn display_status(status: &Option<i32>) -> String {
    status.map_or_else(
        || "no exit status (terminated by signal)".to_string(),
        |code| format!("exit status {code}"),
    )
}

/// Convenience alias used throughout the workspace.
pub type Result<T> = std::result::Result<T, LaunchpadError>;
