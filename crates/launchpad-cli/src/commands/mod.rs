//! CLI argument definitions and dispatch.

pub mod launch;

use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use launchpad_common::config::LaunchpadConfig;
use launchpad_common::constants::{
    APP_NAME, DEFAULT_BUILD_DIR, DEFAULT_DOCKER_BINARY, DEFAULT_IMAGE_NAMESPACE,
    DEFAULT_TEMPLATE_ROOTS,
};
use launchpad_runtime::lifecycle::Action;
use launchpad_runtime::runtime::DockerCli;

/// Build and run containers from layered YAML templates.
#[derive(Parser, Debug)]
#[command(name = APP_NAME, version, about, long_about = None)]
pub struct Cli {
    /// The action to take.
    #[arg(value_enum)]
    pub action: ActionArg,

    /// Path to the instance config file; its stem names the container.
    pub config: PathBuf,

    /// Root directories for templates, searched in order.
    #[arg(long = "template-root", num_args = 1.., default_values = DEFAULT_TEMPLATE_ROOTS)]
    pub template_roots: Vec<PathBuf>,

    /// Build context directory receiving the `init` and `build` artifacts.
    #[arg(long, env = "LAUNCHPAD_BUILD_DIR", default_value = DEFAULT_BUILD_DIR)]
    pub build_dir: PathBuf,

    /// Namespace of the locally built image.
    #[arg(long, env = "LAUNCHPAD_IMAGE_NAMESPACE", default_value = DEFAULT_IMAGE_NAMESPACE)]
    pub image_namespace: String,

    /// Container runtime binary.
    #[arg(long, env = "LAUNCHPAD_DOCKER", default_value = DEFAULT_DOCKER_BINARY)]
    pub docker: PathBuf,

    /// Emit logs as JSON lines.
    #[arg(long)]
    pub log_json: bool,
}

/// Actions accepted on the command line.
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum ActionArg {
    /// Open a login shell in the running container.
    Enter,
    /// Build the image.
    Build,
    /// Stop, rebuild, and start the container.
    Rebuild,
    /// Start the container detached.
    Start,
    /// Stop the running container.
    Stop,
    /// Restart the running container.
    Restart,
    /// Print the docker run command instead of running it.
    StartCmd,
    /// Show container logs.
    Logs,
}

impl From<ActionArg> for Action {
    fn from(arg: ActionArg) -> Self {
        match arg {
            ActionArg::Enter => Self::Enter,
            ActionArg::Build => Self::Build,
            ActionArg::Rebuild => Self::Rebuild,
            ActionArg::Start => Self::Start,
            ActionArg::Stop => Self::Stop,
            ActionArg::Restart => Self::Restart,
            ActionArg::StartCmd => Self::StartCmd,
            ActionArg::Logs => Self::Logs,
        }
    }
}

impl Cli {
    /// Collects the runtime settings given on the command line.
    pub fn settings(&self) -> LaunchpadConfig {
        LaunchpadConfig {
            template_roots: self.template_roots.clone(),
            build_dir: self.build_dir.clone(),
            image_namespace: self.image_namespace.clone(),
            docker_binary: self.docker.clone(),
        }
    }
}

/// Runs the parsed command.
///
/// All configuration is loaded and merged before docker is located or
/// invoked.
///
/// # Errors
///
/// Returns an error if configuration loading fails or any docker invocation
/// fails.
pub fn execute(cli: Cli) -> anyhow::Result<()> {
    let action = Action::from(cli.action);
    let settings = cli.settings();
    let prepared = launch::prepare(&cli.config, &settings, action)?;

    let docker = DockerCli::locate(&settings.docker_binary)?;
    tracing::debug!(binary = %docker.binary().display(), "using container runtime");

    let outcome = launch::run(&prepared, &settings, action, docker)?;
    crate::output::report_outcome(&prepared.instance, &outcome);
    Ok(())
}
