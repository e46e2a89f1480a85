//! User-facing output and exit status mapping.

use launchpad_common::error::LaunchpadError;
use launchpad_common::types::InstanceName;
use launchpad_runtime::lifecycle::Outcome;

/// Prints what an action produced.
///
/// `start-cmd` output goes to stdout so it can be piped; status notes go to
/// stderr.
#[allow(clippy::print_stdout, clippy::print_stderr)]
pub fn report_outcome(instance: &InstanceName, outcome: &Outcome) {
    match outcome {
        Outcome::Command(line) => println!("{line}"),
        Outcome::NotRunning => eprintln!("{}", not_running_message(instance)),
        Outcome::Completed => {}
    }
}

/// Prints a fatal error with its full cause chain.
#[allow(clippy::print_stderr)]
pub fn report_error(err: &anyhow::Error) {
    eprintln!("Error: {err:#}");
}

/// Process exit status for a fatal error.
///
/// Runtime failures forward docker's own status; anything else is `1`.
pub fn exit_status(err: &anyhow::Error) -> u8 {
    let code = err
        .downcast_ref::<LaunchpadError>()
        .map_or(1, LaunchpadError::exit_code);
    u8::try_from(code).unwrap_or(1)
}

fn not_running_message(instance: &InstanceName) -> String {
    format!("{instance} is not running")
}
