//! Raw configuration fragments and where they came from.

use std::fmt;
use std::path::PathBuf;

use launchpad_common::constants::MARKER_FRAGMENT;

/// Origin of a fragment in the merge stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FragmentSource {
    /// The synthetic first fragment.
    Marker,
    /// A template resolved from one of the search roots.
    Template(PathBuf),
    /// The instance config itself, always last.
    Instance(PathBuf),
}

impl fmt::Display for FragmentSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Marker => write!(f, "<marker>"),
            Self::Template(path) => write!(f, "template {}", path.display()),
            Self::Instance(path) => write!(f, "config {}", path.display()),
        }
    }
}

/// One unit of raw YAML text in the merge stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fragment {
    /// Where the text was read from.
    pub source: FragmentSource,
    /// Unparsed file content.
    pub text: String,
}

impl Fragment {
    /// The synthetic fragment that leads every sequence.
    #[must_use]
    pub fn marker() -> Self {
        Self {
            source: FragmentSource::Marker,
            text: MARKER_FRAGMENT.to_string(),
        }
    }

    /// Creates a fragment from a template file's content.
    #[must_use]
    pub fn template(path: impl Into<PathBuf>, text: impl Into<String>) -> Self {
        Self {
            source: FragmentSource::Template(path.into()),
            text: text.into(),
        }
    }

    /// Creates a fragment from the instance config's content.
    #[must_use]
    pub fn instance(path: impl Into<PathBuf>, text: impl Into<String>) -> Self {
        Self {
            source: FragmentSource::Instance(path.into()),
            text: text.into(),
        }
    }
}

/// Borrows the text of every fragment, preserving order.
pub fn texts(fragments: &[Fragment]) -> Vec<&str> {
    fragments.iter().map(|f| f.text.as_str()).collect()
}
