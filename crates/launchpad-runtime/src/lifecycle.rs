//! Action dispatch for one instance.
//!
//! Maps a requested [`Action`] onto container runtime invocations. Actions
//! that start or build the container need a [`LaunchPlan`] and call the
//! supplied `prepare` hook (which writes the artifacts) before touching the
//! image. `rebuild` stops the running instance before preparing.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use launchpad_common::error::{LaunchpadError, Result};
use launchpad_common::types::{ContainerId, ImageTag, InstanceName};

use crate::commands;
use crate::runtime::ContainerRuntime;

/// User-requested lifecycle action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    /// Open an interactive login shell in the running instance.
    Enter,
    /// Build the image only.
    Build,
    /// Stop if running, build, then start detached.
    Rebuild,
    /// Start detached from the existing image.
    Start,
    /// Stop the running instance.
    Stop,
    /// Restart the running instance.
    Restart,
    /// Print the equivalent `docker run` command without executing it.
    StartCmd,
    /// Show the instance's logs.
    Logs,
}

impl Action {
    /// Every action, in the order shown to users.
    pub const ALL: [Self; 8] = [
        Self::Enter,
        Self::Build,
        Self::Rebuild,
        Self::Start,
        Self::Stop,
        Self::Restart,
        Self::StartCmd,
        Self::Logs,
    ];

    /// Name used on the command line.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Enter => "enter",
            Self::Build => "build",
            Self::Rebuild => "rebuild",
            Self::Start => "start",
            Self::Stop => "stop",
            Self::Restart => "restart",
            Self::StartCmd => "start-cmd",
            Self::Logs => "logs",
        }
    }

    /// Whether the action consumes merged directives and writes artifacts.
    #[must_use]
    pub const fn needs_plan(self) -> bool {
        matches!(
            self,
            Self::Build | Self::Rebuild | Self::Start | Self::StartCmd
        )
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Action {
    type Err = LaunchpadError;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|a| a.as_str() == s)
            .ok_or_else(|| LaunchpadError::Config {
                message: format!("unknown action '{s}'"),
            })
    }
}

/// Merged directives needed to build and run an instance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchPlan {
    /// Base image passed as `BASE_IMAGE` build argument.
    pub base_image: String,
    /// Extra `docker run` tokens.
    pub run_args: Vec<String>,
    /// Build context directory.
    pub build_dir: PathBuf,
}

/// What an action did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// All runtime invocations succeeded.
    Completed,
    /// The action targets a running instance but none was found.
    NotRunning,
    /// The rendered `docker run` command, for `start-cmd`.
    Command(String),
}

/// Lifecycle driver bound to one instance and runtime.
pub struct Lifecycle<R> {
    runtime: R,
    instance: InstanceName,
    image: ImageTag,
}

impl<R: ContainerRuntime> Lifecycle<R> {
    /// Creates a driver for `instance`, whose image is tagged `image`.
    pub const fn new(runtime: R, instance: InstanceName, image: ImageTag) -> Self {
        Self {
            runtime,
            instance,
            image,
        }
    }

    /// Returns the underlying runtime.
    pub const fn runtime(&self) -> &R {
        &self.runtime
    }

    /// Runs `action`.
    ///
    /// `prepare` is invoked once, before any build or run, for actions that
    /// need a plan.
    ///
    /// # Errors
    ///
    /// Returns an error if a plan is required but missing, if `prepare`
    /// fails, or if any runtime invocation fails.
    pub fn execute<F>(
        &self,
        action: Action,
        plan: Option<&LaunchPlan>,
        prepare: F,
    ) -> Result<Outcome>
    where
        F: FnOnce() -> Result<()>,
    {
        tracing::info!(instance = %self.instance, action = %action, "executing action");
        if !action.needs_plan() {
            return match action {
                Action::Stop => self.stop(),
                Action::Restart => self.restart(),
                Action::Enter => self.enter().map(|()| Outcome::Completed),
                _ => self.logs().map(|()| Outcome::Completed),
            };
        }

        let plan = plan.ok_or_else(|| LaunchpadError::Config {
            message: format!("action '{action}' requires merged configuration"),
        })?;
        if action == Action::Rebuild {
            let _ = self.stop()?;
        }
        prepare()?;

        match action {
            Action::StartCmd => Ok(Outcome::Command(self.start_command(plan))),
            Action::Start => self.start(plan).map(|()| Outcome::Completed),
            Action::Build => self.build(plan).map(|()| Outcome::Completed),
            _ => {
                self.build(plan)?;
                self.start(plan).map(|()| Outcome::Completed)
            }
        }
    }

    /// Queries the runtime for a running container with this instance's name.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn running_container(&self) -> Result<Option<ContainerId>> {
        let output = self.runtime.capture(&commands::ps(&self.instance))?;
        Ok(ContainerId::from_ps_output(&output))
    }

    /// Builds the image from the plan's build directory.
    ///
    /// # Errors
    ///
    /// Returns an error if the build invocation fails.
    pub fn build(&self, plan: &LaunchPlan) -> Result<()> {
        self.runtime.run(&commands::build(
            &self.image,
            &plan.base_image,
            &plan.build_dir,
        ))
    }

    /// Starts the instance detached.
    ///
    /// # Errors
    ///
    /// Returns an error if the run invocation fails.
    pub fn start(&self, plan: &LaunchPlan) -> Result<()> {
        self.runtime.run(&commands::run(
            &self.instance,
            &self.image,
            &plan.run_args,
            true,
        ))
    }

    /// Renders the attached `docker run` command for the plan.
    pub fn start_command(&self, plan: &LaunchPlan) -> String {
        self.runtime.render(&commands::run(
            &self.instance,
            &self.image,
            &plan.run_args,
            false,
        ))
    }

    /// Stops the running instance, if any.
    ///
    /// # Errors
    ///
    /// Returns an error if the query or stop invocation fails.
    pub fn stop(&self) -> Result<Outcome> {
        self.on_running(commands::stop)
    }

    /// Restarts the running instance, if any.
    ///
    /// # Errors
    ///
    /// Returns an error if the query or restart invocation fails.
    pub fn restart(&self) -> Result<Outcome> {
        self.on_running(commands::restart)
    }

    /// Opens a login shell in the running instance.
    ///
    /// # Errors
    ///
    /// Returns an error if the exec invocation fails.
    pub fn enter(&self) -> Result<()> {
        self.runtime.run(&commands::enter(&self.instance))
    }

    /// Streams the instance's logs.
    ///
    /// # Errors
    ///
    /// Returns an error if the logs invocation fails.
    pub fn logs(&self) -> Result<()> {
        self.runtime.run(&commands::logs(&self.instance))
    }

    fn on_running(&self, verb: fn(&ContainerId) -> Vec<String>) -> Result<Outcome> {
        let Some(id) = self.running_container()? else {
            tracing::info!(instance = %self.instance, "no running container");
            return Ok(Outcome::NotRunning);
        };
        self.runtime.run(&verb(&id))?;
        Ok(Outcome::Completed)
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use super::*;

    /// Records every invocation; `ps` answers with a scripted id.
    #[derive(Default)]
    struct Recorder {
        running: Option<&'static str>,
        fail_on: Option<&'static str>,
        calls: RefCell<Vec<Vec<String>>>,
    }

    impl Recorder {
        fn running(id: &'static str) -> Self {
            Self {
                running: Some(id),
                ..Self::default()
            }
        }

        fn verbs(&self) -> Vec<String> {
            self.calls.borrow().iter().map(|c| c[0].clone()).collect()
        }

        fn record(&self, args: &[String]) -> Result<()> {
            self.calls.borrow_mut().push(args.to_vec());
            if self.fail_on == Some(args[0].as_str()) {
                return Err(LaunchpadError::Runtime {
                    command: args.join(" "),
                    status: Some(42),
                });
            }
            Ok(())
        }
    }

    impl ContainerRuntime for Recorder {
        fn capture(&self, args: &[String]) -> Result<String> {
            self.record(args)?;
            Ok(self.running.map(|id| format!("{id}\n")).unwrap_or_default())
        }

        fn run(&self, args: &[String]) -> Result<()> {
            self.record(args)
        }

        fn render(&self, args: &[String]) -> String {
            format!("docker {}", args.join(" "))
        }
    }

    fn lifecycle(runtime: Recorder) -> Lifecycle<Recorder> {
        let instance = InstanceName::new("app").expect("valid name");
        let image = ImageTag::for_instance("local_discourse", &instance);
        Lifecycle::new(runtime, instance, image)
    }

    fn plan() -> LaunchPlan {
        LaunchPlan {
            base_image: "discourse/base:test".into(),
            run_args: vec!["-e".into(), "A=b".into()],
            build_dir: PathBuf::from("dkr"),
        }
    }

    #[test]
    fn action_names_round_trip() {
        for action in Action::ALL {
            assert_eq!(action.as_str().parse::<Action>().expect("parses"), action);
        }
        assert!("explode".parse::<Action>().is_err());
    }

    #[test]
    fn build_prepares_then_builds_only() {
        let lc = lifecycle(Recorder::default());
        let prepared = RefCell::new(false);
        let outcome = lc
            .execute(Action::Build, Some(&plan()), || {
                *prepared.borrow_mut() = true;
                Ok(())
            })
            .expect("build");
        assert_eq!(outcome, Outcome::Completed);
        assert!(*prepared.borrow());
        assert_eq!(lc.runtime().verbs(), vec!["build"]);
        assert_eq!(
            lc.runtime().calls.borrow()[0],
            vec![
                "build",
                "-t",
                "local_discourse/app",
                "--build-arg",
                "BASE_IMAGE=discourse/base:test",
                "dkr"
            ]
        );
    }

    #[test]
    fn rebuild_stops_running_instance_before_preparing() {
        let lc = lifecycle(Recorder::running("c0ffee"));
        let calls_at_prepare = RefCell::new(0);
        let _ = lc
            .execute(Action::Rebuild, Some(&plan()), || {
                *calls_at_prepare.borrow_mut() = lc.runtime().calls.borrow().len();
                Ok(())
            })
            .expect("rebuild");
        assert_eq!(*calls_at_prepare.borrow(), 2);
        assert_eq!(lc.runtime().verbs(), vec!["ps", "stop", "build", "run"]);
        assert_eq!(lc.runtime().calls.borrow()[1], vec!["stop", "c0ffee"]);
    }

    #[test]
    fn rebuild_without_running_instance_skips_stop() {
        let lc = lifecycle(Recorder::default());
        let _ = lc
            .execute(Action::Rebuild, Some(&plan()), || Ok(()))
            .expect("rebuild");
        assert_eq!(lc.runtime().verbs(), vec!["ps", "build", "run"]);
    }

    #[test]
    fn start_runs_detached() {
        let lc = lifecycle(Recorder::default());
        let _ = lc
            .execute(Action::Start, Some(&plan()), || Ok(()))
            .expect("start");
        assert_eq!(
            lc.runtime().calls.borrow()[0],
            vec![
                "run",
                "--rm",
                "-d",
                "-i",
                "--name",
                "app",
                "-e",
                "A=b",
                "local_discourse/app"
            ]
        );
    }

    #[test]
    fn start_cmd_renders_without_invoking() {
        let lc = lifecycle(Recorder::default());
        let outcome = lc
            .execute(Action::StartCmd, Some(&plan()), || Ok(()))
            .expect("start-cmd");
        assert_eq!(
            outcome,
            Outcome::Command("docker run --rm -i --name app -e A=b local_discourse/app".into())
        );
        assert!(lc.runtime().calls.borrow().is_empty());
    }

    #[test]
    fn stop_without_running_instance_is_noop() {
        let lc = lifecycle(Recorder::default());
        let outcome = lc.execute(Action::Stop, None, || Ok(())).expect("stop");
        assert_eq!(outcome, Outcome::NotRunning);
        assert_eq!(lc.runtime().verbs(), vec!["ps"]);
    }

    #[test]
    fn restart_targets_running_id() {
        let lc = lifecycle(Recorder::running("abc"));
        let outcome = lc.execute(Action::Restart, None, || Ok(())).expect("restart");
        assert_eq!(outcome, Outcome::Completed);
        assert_eq!(lc.runtime().calls.borrow()[1], vec!["restart", "abc"]);
    }

    #[test]
    fn enter_and_logs_address_instance_by_name() {
        let lc = lifecycle(Recorder::default());
        let _ = lc.execute(Action::Enter, None, || Ok(())).expect("enter");
        let _ = lc.execute(Action::Logs, None, || Ok(())).expect("logs");
        let calls = lc.runtime().calls.borrow();
        assert_eq!(calls[0], vec!["exec", "-it", "app", "/bin/bash", "--login"]);
        assert_eq!(calls[1], vec!["logs", "app"]);
    }

    #[test]
    fn plan_actions_require_plan() {
        let lc = lifecycle(Recorder::default());
        assert!(lc.execute(Action::Start, None, || Ok(())).is_err());
        assert!(lc.runtime().calls.borrow().is_empty());
    }

    #[test]
    fn failed_prepare_prevents_runtime_calls() {
        let lc = lifecycle(Recorder::default());
        let result = lc.execute(Action::Build, Some(&plan()), || {
            Err(LaunchpadError::Config {
                message: "disk full".into(),
            })
        });
        assert!(result.is_err());
        assert!(lc.runtime().calls.borrow().is_empty());
    }

    #[test]
    fn runtime_failure_aborts_remaining_steps() {
        let lc = lifecycle(Recorder {
            fail_on: Some("build"),
            ..Recorder::default()
        });
        let err = lc
            .execute(Action::Rebuild, Some(&plan()), || Ok(()))
            .expect_err("build fails");
        assert_eq!(err.exit_code(), 42);
        assert_eq!(lc.runtime().verbs(), vec!["ps", "build"]);
    }
}
