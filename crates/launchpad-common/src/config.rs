//! Runtime settings for one launchpad invocation.

use std::path::PathBuf;

use crate::constants;
use crate::types::{ImageTag, InstanceName};

/// Settings that locate templates, artifacts, and the container runtime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchpadConfig {
    /// Template search roots, tried in order.
    pub template_roots: Vec<PathBuf>,
    /// Build context directory; artifacts are written here.
    pub build_dir: PathBuf,
    /// Namespace prefix of locally built images.
    pub image_namespace: String,
    /// Container runtime binary (name on `PATH` or explicit path).
    pub docker_binary: PathBuf,
}

impl LaunchpadConfig {
    /// Image tag for the given instance under this config's namespace.
    #[must_use]
    pub fn image_tag(&self, instance: &InstanceName) -> ImageTag {
        ImageTag::for_instance(&self.image_namespace, instance)
    }
}

impl Default for LaunchpadConfig {
    fn default() -> Self {
        Self {
            template_roots: constants::DEFAULT_TEMPLATE_ROOTS
                .iter()
                .map(PathBuf::from)
                .collect(),
            build_dir: PathBuf::from(constants::DEFAULT_BUILD_DIR),
            image_namespace: constants::DEFAULT_IMAGE_NAMESPACE.to_string(),
            docker_binary: PathBuf::from(constants::DEFAULT_DOCKER_BINARY),
        }
    }
}
