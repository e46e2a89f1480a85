//! Argument lists for docker invocations.
//!
//! Every builder returns the arguments that follow the docker binary, in the
//! exact order docker receives them.

use std::path::Path;

use launchpad_common::constants::ENTER_SHELL;
use launchpad_common::types::{ContainerId, ImageTag, InstanceName};

/// `ps -q -f name=<instance>`
pub fn ps(instance: &InstanceName) -> Vec<String> {
    vec![
        "ps".into(),
        "-q".into(),
        "-f".into(),
        format!("name={instance}"),
    ]
}

/// `build -t <image> --build-arg BASE_IMAGE=<base> <context>`
pub fn build(image: &ImageTag, base_image: &str, context: &Path) -> Vec<String> {
    vec![
        "build".into(),
        "-t".into(),
        image.to_string(),
        "--build-arg".into(),
        format!("BASE_IMAGE={base_image}"),
        context.display().to_string(),
    ]
}

/// `run --rm [-d] -i --name <instance> <run-args...> <image>`
pub fn run(
    instance: &InstanceName,
    image: &ImageTag,
    run_args: &[String],
    detach: bool,
) -> Vec<String> {
    let mut args = vec!["run".to_string(), "--rm".to_string()];
    if detach {
        args.push("-d".into());
    }
    args.push("-i".into());
    args.push("--name".into());
    args.push(instance.to_string());
    args.extend(run_args.iter().cloned());
    args.push(image.to_string());
    args
}

/// `stop <id>`
pub fn stop(id: &ContainerId) -> Vec<String> {
    vec!["stop".into(), id.to_string()]
}

/// `restart <id>`
pub fn restart(id: &ContainerId) -> Vec<String> {
    vec!["restart".into(), id.to_string()]
}

/// `exec -it <instance> /bin/bash --login`
pub fn enter(instance: &InstanceName) -> Vec<String> {
    vec![
        "exec".into(),
        "-it".into(),
        instance.to_string(),
        ENTER_SHELL.into(),
        "--login".into(),
    ]
}

/// `logs <instance>`
pub fn logs(instance: &InstanceName) -> Vec<String> {
    vec!["logs".into(), instance.to_string()]
}
