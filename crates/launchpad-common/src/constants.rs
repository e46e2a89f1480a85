//! System-wide constants and default paths.

/// Base image used when no fragment declares `base_image`.
pub const DEFAULT_BASE_IMAGE: &str = "discourse/base:2.0.20250226-0128";

/// Directory holding the Dockerfile and the generated artifacts.
pub const DEFAULT_BUILD_DIR: &str = "dkr";

/// Namespace prefix for locally built images (`<namespace>/<instance>`).
pub const DEFAULT_IMAGE_NAMESPACE: &str = "local_discourse";

/// Template search roots used when none are given on the command line.
pub const DEFAULT_TEMPLATE_ROOTS: [&str; 2] = [".", "./discourse_docker"];

/// Name of the container runtime binary.
pub const DEFAULT_DOCKER_BINARY: &str = "docker";

/// Delimiter between fragments in written artifacts.
///
/// Must match the separator the in-container consumer splits on.
pub const FILE_SEPARATOR: &str = "\n_FILE_SEPERATOR_\n";

/// Content of the synthetic first fragment.
///
/// Guarantees the merged stream always parses as a non-empty mapping.
pub const MARKER_FRAGMENT: &str = "hack: true";

/// Placeholder in `env` and `labels` values replaced by the instance name.
pub const CONFIG_PLACEHOLDER: &str = "{config}";

/// File name of the full fragment stream artifact (run at container startup).
pub const INIT_ARTIFACT: &str = "init";

/// File name of the build-only fragment stream artifact.
pub const BUILD_ARTIFACT: &str = "build";

/// Shell launched by `enter`.
pub const ENTER_SHELL: &str = "/bin/bash";

/// Application name, used as the CLI command name.
pub const APP_NAME: &str = "launchpad";
