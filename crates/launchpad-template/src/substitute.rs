//! `$name` substitution from a parameter mapping.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use regex::{Captures, Regex};

#[allow(clippy::expect_used)]
static PARAM_TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$(\w+)").expect("parameter token pattern is valid"));

/// Replaces every `$identifier` in `text` with its value from `params`.
///
/// Identifiers are runs of word characters, so `$host:` resolves `host`.
/// Unknown identifiers are left untouched and reported with a warning.
pub fn substitute(params: &BTreeMap<String, String>, text: &str) -> String {
    PARAM_TOKEN
        .replace_all(text, |caps: &Captures<'_>| {
            let name = &caps[1];
            params.get(name).map_or_else(
                || {
                    tracing::warn!(parameter = name, "found parameter but could not substitute it");
                    caps[0].to_string()
                },
                Clone::clone,
            )
        })
        .into_owned()
}
