//! Fragment stream artifacts consumed inside the container.
//!
//! Two files are produced in the build directory: `init`, the full ordered
//! fragment stream run at container startup, and `build`, the build-only
//! stream run while the image is constructed. Both join fragments with
//! [`FILE_SEPARATOR`] and are written with `\n` line endings.

use std::path::{Path, PathBuf};

use launchpad_common::constants::{BUILD_ARTIFACT, FILE_SEPARATOR, INIT_ARTIFACT};
use launchpad_common::error::{LaunchpadError, Result};

/// Paths of the written artifacts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifacts {
    /// Full fragment stream.
    pub init: PathBuf,
    /// Build-only fragment stream.
    pub build: PathBuf,
}

/// Joins fragment texts with the separator; no trailing separator.
pub fn join_fragments<S: AsRef<str>>(texts: &[S]) -> String {
    let parts: Vec<&str> = texts.iter().map(|t| t.as_ref()).collect();
    parts.join(FILE_SEPARATOR)
}

/// Splits a joined stream back into its fragments.
///
/// An empty stream holds no fragments.
pub fn split_fragments(blob: &str) -> Vec<String> {
    if blob.is_empty() {
        return Vec::new();
    }
    blob.split(FILE_SEPARATOR).map(str::to_string).collect()
}

/// Rewrites `\r\n` line endings to `\n`.
pub fn normalize_line_endings(text: &str) -> String {
    text.replace("\r\n", "\n")
}

/// Writes the `init` and `build` artifacts into `dir`, creating it if needed.
///
/// # Errors
///
/// Returns an error if a fragment contains the separator or if the
/// directory or either file cannot be written.
pub fn write_artifacts<S: AsRef<str>, B: AsRef<str>>(
    dir: &Path,
    init_texts: &[S],
    build_texts: &[B],
) -> Result<Artifacts> {
    ensure_unambiguous(init_texts)?;
    ensure_unambiguous(build_texts)?;

    std::fs::create_dir_all(dir).map_err(|source| LaunchpadError::Io {
        path: dir.to_path_buf(),
        source,
    })?;

    let artifacts = Artifacts {
        init: dir.join(INIT_ARTIFACT),
        build: dir.join(BUILD_ARTIFACT),
    };
    write_stream(&artifacts.init, &join_fragments(init_texts))?;
    write_stream(&artifacts.build, &join_fragments(build_texts))?;

    tracing::info!(
        init = %artifacts.init.display(),
        build = %artifacts.build.display(),
        "artifacts written"
    );
    Ok(artifacts)
}

fn ensure_unambiguous<S: AsRef<str>>(texts: &[S]) -> Result<()> {
    let ambiguous = texts
        .iter()
        .any(|t| normalize_line_endings(t.as_ref()).contains(FILE_SEPARATOR));
    if ambiguous {
        return Err(LaunchpadError::Config {
            message: format!(
                "fragment contains the reserved separator {:?}",
                FILE_SEPARATOR.trim()
            ),
        });
    }
    Ok(())
}

fn write_stream(path: &Path, content: &str) -> Result<()> {
    std::fs::write(path, normalize_line_endings(content)).map_err(|source| {
        LaunchpadError::Io {
            path: path.to_path_buf(),
            source,
        }
    })
}
