//! Container runtime abstraction.

use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use launchpad_common::error::{LaunchpadError, Result};

/// Blocking access to an external container runtime.
///
/// Implementors run one invocation per call; any unsuccessful exit is an
/// error carrying the runtime's exit status.
pub trait ContainerRuntime {
    /// Runs a query and returns its standard output.
    ///
    /// # Errors
    ///
    /// Returns an error if the process cannot be spawned or exits non-zero.
    fn capture(&self, args: &[String]) -> Result<String>;

    /// Runs a command with inherited standard streams.
    ///
    /// # Errors
    ///
    /// Returns an error if the process cannot be spawned or exits non-zero.
    fn run(&self, args: &[String]) -> Result<()>;

    /// Renders the full command line as a shell-quoted string.
    fn render(&self, args: &[String]) -> String;
}

/// The `docker` command line client.
#[derive(Debug, Clone)]
pub struct DockerCli {
    binary: PathBuf,
    program: String,
}

impl DockerCli {
    /// Wraps an already-resolved binary path without checking it.
    #[must_use]
    pub fn new(binary: impl Into<PathBuf>) -> Self {
        let binary = binary.into();
        let program = binary.display().to_string();
        Self { binary, program }
    }

    /// Resolves `binary` on `PATH` (or as a path) before any invocation.
    ///
    /// Rendered commands keep the name as given rather than the resolved path.
    ///
    /// # Errors
    ///
    /// Returns [`LaunchpadError::Config`] if the binary cannot be found.
    pub fn locate(binary: &Path) -> Result<Self> {
        let resolved = which::which(binary).map_err(|e| LaunchpadError::Config {
            message: format!("container runtime `{}` not found: {e}", binary.display()),
        })?;
        tracing::debug!(binary = %resolved.display(), "located container runtime");
        Ok(Self {
            binary: resolved,
            program: binary.display().to_string(),
        })
    }

    /// Path of the binary being invoked.
    #[must_use]
    pub fn binary(&self) -> &Path {
        &self.binary
    }

    fn command(&self, args: &[String]) -> Command {
        let mut cmd = Command::new(&self.binary);
        let _ = cmd.args(args);
        cmd
    }

    fn spawn_error(&self, source: std::io::Error) -> LaunchpadError {
        LaunchpadError::Io {
            path: self.binary.clone(),
            source,
        }
    }

    fn check(&self, args: &[String], status: std::process::ExitStatus) -> Result<()> {
        if status.success() {
            return Ok(());
        }
        Err(LaunchpadError::Runtime {
            command: self.render(args),
            status: status.code(),
        })
    }
}

impl ContainerRuntime for DockerCli {
    fn capture(&self, args: &[String]) -> Result<String> {
        tracing::debug!(args = ?args, "docker query");
        let output = self
            .command(args)
            .stderr(Stdio::inherit())
            .output()
            .map_err(|e| self.spawn_error(e))?;
        self.check(args, output.status)?;
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }

    fn run(&self, args: &[String]) -> Result<()> {
        tracing::info!(command = %self.render(args), "invoking container runtime");
        let status = self
            .command(args)
            .status()
            .map_err(|e| self.spawn_error(e))?;
        self.check(args, status)
    }

    fn render(&self, args: &[String]) -> String {
        shell_words::join(
            std::iter::once(self.program.as_str()).chain(args.iter().map(String::as_str)),
        )
    }
}
