//! The launch pipeline: load, merge, write artifacts, drive the runtime.

use std::path::Path;

use launchpad_common::config::LaunchpadConfig;
use launchpad_common::error::Result;
use launchpad_common::types::InstanceName;
use launchpad_runtime::lifecycle::{Action, LaunchPlan, Lifecycle, Outcome};
use launchpad_runtime::runtime::ContainerRuntime;
use launchpad_template::aggregate::{Aggregation, aggregate};
use launchpad_template::artifact::write_artifacts;
use launchpad_template::fragment::{Fragment, texts};
use launchpad_template::loader::load_fragments;

/// Everything derived from the config files before docker is involved.
#[derive(Debug)]
pub struct Prepared {
    /// Instance name from the config file's stem.
    pub instance: InstanceName,
    /// Full fragment sequence in merge order.
    pub fragments: Vec<Fragment>,
    /// Merged directives, present for actions that build or run.
    pub merged: Option<Aggregation>,
}

/// Loads and merges the configuration needed by `action`.
///
/// # Errors
///
/// Returns an error if the instance name is invalid, a template cannot be
/// resolved, or a fragment is malformed.
pub fn prepare(config: &Path, settings: &LaunchpadConfig, action: Action) -> Result<Prepared> {
    let instance = InstanceName::from_config_path(config)?;
    let fragments = load_fragments(config, &settings.template_roots)?;
    let merged = if action.needs_plan() {
        Some(aggregate(&fragments, &instance)?)
    } else {
        None
    };
    Ok(Prepared {
        instance,
        fragments,
        merged,
    })
}

/// Executes `action` against `runtime`, writing artifacts when required.
///
/// # Errors
///
/// Returns an error if writing artifacts or any runtime invocation fails.
pub fn run<R: ContainerRuntime>(
    prepared: &Prepared,
    settings: &LaunchpadConfig,
    action: Action,
    runtime: R,
) -> Result<Outcome> {
    let plan = prepared.merged.as_ref().map(|merged| LaunchPlan {
        base_image: merged.base_image.clone(),
        run_args: merged.run_args.clone(),
        build_dir: settings.build_dir.clone(),
    });
    let lifecycle = Lifecycle::new(
        runtime,
        prepared.instance.clone(),
        settings.image_tag(&prepared.instance),
    );

    lifecycle.execute(action, plan.as_ref(), || {
        let build_texts = prepared
            .merged
            .as_ref()
            .map_or(&[][..], |m| m.build_fragments.as_slice());
        write_artifacts(&settings.build_dir, &texts(&prepared.fragments), build_texts)
            .map(|_| ())
    })
}
