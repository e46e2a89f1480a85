//! Domain primitive types used across the launchpad workspace.

use std::fmt;
use std::path::Path;

use crate::error::{LaunchpadError, Result};

/// Characters that may not appear in an instance name.
const FORBIDDEN_NAME_CHARS: &str = "/ !@#$%^&*()+~`=";

/// Name of one configured deployment, derived from its config file's stem.
///
/// Doubles as the docker container name and the last image path segment,
/// so it is restricted to lower-case, shell-safe characters.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct InstanceName(String);

impl InstanceName {
    /// Validates and wraps an instance name.
    ///
    /// # Errors
    ///
    /// Returns [`LaunchpadError::InvalidInstanceName`] if the name is empty or
    /// contains upper-case letters, whitespace, or special characters.
    pub fn new(name: impl Into<String>) -> Result<Self> {
        let name = name.into();
        let invalid = name.is_empty()
            || name
                .chars()
                .any(|c| c.is_uppercase() || c.is_whitespace() || FORBIDDEN_NAME_CHARS.contains(c));
        if invalid {
            return Err(LaunchpadError::InvalidInstanceName { name });
        }
        Ok(Self(name))
    }

    /// Derives the instance name from a config file path (`app.yml` -> `app`).
    ///
    /// # Errors
    ///
    /// Returns an error if the path has no file stem or the stem is invalid.
    pub fn from_config_path(path: &Path) -> Result<Self> {
        let stem = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        Self::new(stem)
    }

    /// Returns the inner string representation.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for InstanceName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Tag of the locally built image, `<namespace>/<instance>`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ImageTag(String);

impl ImageTag {
    /// Builds the tag for an instance under the given namespace.
    #[must_use]
    pub fn for_instance(namespace: &str, instance: &InstanceName) -> Self {
        Self(format!("{namespace}/{instance}"))
    }

    /// Returns the inner string representation.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ImageTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier of a running container as reported by `docker ps -q`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ContainerId(String);

impl ContainerId {
    /// Creates a new container ID from a string value.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Parses `docker ps -q` output, returning `None` when nothing matched.
    ///
    /// Only the first reported id is kept.
    #[must_use]
    pub fn from_ps_output(output: &str) -> Option<Self> {
        output
            .lines()
            .map(str::trim)
            .find(|line| !line.is_empty())
            .map(Self::new)
    }

    /// Returns the inner string representation.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ContainerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
