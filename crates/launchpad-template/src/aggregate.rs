//! Folding fragments into docker directives.
//!
//! Fragments are applied strictly in sequence order. Within a fragment the
//! directives are consumed in a fixed order: `params`, `build`, `env`,
//! `labels`, `expose`, `volumes`, `links`, `docker_args`, `base_image`.
//! Scalars and params follow last-writer-wins; every list-valued directive
//! appends to the run argument list and is never deduplicated.

use std::collections::BTreeMap;

use launchpad_common::constants::{CONFIG_PLACEHOLDER, DEFAULT_BASE_IMAGE};
use launchpad_common::error::{LaunchpadError, Result};
use launchpad_common::types::InstanceName;
use serde_yaml::{Mapping, Value};

use crate::document::{
    coerce_text, expect_mapping, expect_scalar, expect_sequence, key_text, parse_document,
    render_document, required_field, value_text,
};
use crate::fragment::Fragment;

/// Result of merging one fragment sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Aggregation {
    /// Final parameter mapping.
    pub params: BTreeMap<String, String>,
    /// Base image passed to the image build.
    pub base_image: String,
    /// Tokens appended to `docker run`, in encounter order.
    pub run_args: Vec<String>,
    /// Serialized build-only documents with `build` renamed to `run`.
    pub build_fragments: Vec<String>,
}

impl Default for Aggregation {
    fn default() -> Self {
        Self {
            params: BTreeMap::new(),
            base_image: DEFAULT_BASE_IMAGE.to_string(),
            run_args: Vec::new(),
            build_fragments: Vec::new(),
        }
    }
}

/// Merges every fragment in order.
///
/// # Errors
///
/// Returns an error if any fragment fails to parse or a recognized directive
/// has the wrong shape. No partial result is returned.
pub fn aggregate(fragments: &[Fragment], instance: &InstanceName) -> Result<Aggregation> {
    let merged = fragments
        .iter()
        .try_fold(Aggregation::default(), |acc, fragment| {
            let origin = fragment.source.to_string();
            tracing::debug!(fragment = %origin, "applying fragment");
            let doc = parse_document(&fragment.text, &origin)?;
            apply_document(acc, &doc, &origin, instance)
        })?;

    tracing::info!(
        instance = %instance,
        base_image = %merged.base_image,
        run_args = merged.run_args.len(),
        build_fragments = merged.build_fragments.len(),
        "aggregation complete"
    );
    Ok(merged)
}

/// Applies one parsed fragment to the running aggregation.
///
/// # Errors
///
/// Returns an error if a recognized directive has the wrong shape.
pub fn apply_document(
    mut acc: Aggregation,
    doc: &Mapping,
    origin: &str,
    instance: &InstanceName,
) -> Result<Aggregation> {
    if let Some(params) = doc.get("params") {
        merge_params(&mut acc.params, params)?;
    }
    if doc.contains_key("build") {
        acc.build_fragments
            .push(render_document(&build_document(doc), origin)?);
    }
    if let Some(env) = doc.get("env") {
        push_pairs(&mut acc.run_args, "env", "-e", env, instance)?;
    }
    if let Some(labels) = doc.get("labels") {
        push_pairs(&mut acc.run_args, "labels", "-l", labels, instance)?;
    }
    if let Some(expose) = doc.get("expose") {
        push_expose(&mut acc.run_args, expose)?;
    }
    if let Some(volumes) = doc.get("volumes") {
        push_nested_pairs(&mut acc.run_args, &Nested::VOLUME, volumes)?;
    }
    if let Some(links) = doc.get("links") {
        push_nested_pairs(&mut acc.run_args, &Nested::LINK, links)?;
    }
    if let Some(docker_args) = doc.get("docker_args") {
        push_docker_args(&mut acc.run_args, docker_args)?;
    }
    if let Some(base_image) = doc.get("base_image") {
        acc.base_image = expect_scalar("base_image", base_image)?;
    }
    Ok(acc)
}

fn merge_params(params: &mut BTreeMap<String, String>, value: &Value) -> Result<()> {
    let Some(map) = expect_mapping("params", value)? else {
        return Ok(());
    };
    for (key, value) in map {
        let _ = params.insert(key_text("params", key)?, value_text(value));
    }
    Ok(())
}

/// Copies a document with `build` renamed to `run`.
///
/// An existing `run` key keeps its position and takes the `build` value;
/// otherwise `run` is appended after all other keys.
pub fn build_document(doc: &Mapping) -> Mapping {
    let Some(build) = doc.get("build") else {
        return doc.clone();
    };
    let run_key = Value::from("run");
    let mut out = Mapping::new();
    for (key, value) in doc {
        match key.as_str() {
            Some("build") => {}
            Some("run") => {
                let _ = out.insert(run_key.clone(), build.clone());
            }
            _ => {
                let _ = out.insert(key.clone(), value.clone());
            }
        }
    }
    if !out.contains_key("run") {
        let _ = out.insert(run_key, build.clone());
    }
    out
}

fn push_pairs(
    args: &mut Vec<String>,
    directive: &'static str,
    flag: &str,
    value: &Value,
    instance: &InstanceName,
) -> Result<()> {
    let Some(map) = expect_mapping(directive, value)? else {
        return Ok(());
    };
    for (key, value) in map {
        let key = key_text(directive, key)?;
        let text = coerce_text(value).replace(CONFIG_PLACEHOLDER, instance.as_str());
        args.push(flag.to_string());
        args.push(format!("{key}={text}"));
    }
    Ok(())
}

fn push_expose(args: &mut Vec<String>, value: &Value) -> Result<()> {
    let Some(entries) = expect_sequence("expose", value)? else {
        return Ok(());
    };
    for entry in entries {
        let port = expect_scalar("expose", entry)?;
        args.extend(expose_tokens(&port));
    }
    Ok(())
}

/// Translates one `expose` entry into docker flags.
///
/// `host=container` becomes `--expose host:container`; anything else is
/// published as-is with `-p`.
pub fn expose_tokens(entry: &str) -> [String; 2] {
    match entry.split_once('=') {
        Some((host, container)) => ["--expose".to_string(), format!("{host}:{container}")],
        None => ["-p".to_string(), entry.to_string()],
    }
}

/// Shape of a list directive whose entries are `{wrapper: {left, right}}`.
struct Nested {
    directive: &'static str,
    wrapper: &'static str,
    left: &'static str,
    right: &'static str,
    flag: &'static str,
}

impl Nested {
    const VOLUME: Self = Self {
        directive: "volumes",
        wrapper: "volume",
        left: "host",
        right: "guest",
        flag: "-v",
    };

    const LINK: Self = Self {
        directive: "links",
        wrapper: "link",
        left: "name",
        right: "alias",
        flag: "--link",
    };
}

fn push_nested_pairs(args: &mut Vec<String>, shape: &Nested, value: &Value) -> Result<()> {
    let Some(entries) = expect_sequence(shape.directive, value)? else {
        return Ok(());
    };
    for entry in entries {
        let inner = required_field(shape.directive, entry, shape.wrapper)?;
        let left = expect_scalar(
            shape.directive,
            required_field(shape.directive, inner, shape.left)?,
        )?;
        let right = expect_scalar(
            shape.directive,
            required_field(shape.directive, inner, shape.right)?,
        )?;
        args.push(shape.flag.to_string());
        args.push(format!("{left}:{right}"));
    }
    Ok(())
}

fn push_docker_args(args: &mut Vec<String>, value: &Value) -> Result<()> {
    match value {
        Value::Null => Ok(()),
        Value::String(line) => {
            let words =
                shell_words::split(line).map_err(|e| LaunchpadError::InvalidDirective {
                    directive: "docker_args",
                    message: e.to_string(),
                })?;
            args.extend(words);
            Ok(())
        }
        other => {
            let Some(entries) = expect_sequence("docker_args", other)? else {
                return Ok(());
            };
            for entry in entries {
                args.push(expect_scalar("docker_args", entry)?);
            }
            Ok(())
        }
    }
}
