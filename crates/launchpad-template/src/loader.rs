//! Instance config and template loading.
//!
//! Resolves the templates declared by an instance config against an ordered
//! list of search roots and produces the fragment sequence in merge order:
//! the marker fragment, each template in declaration order, then the
//! instance config itself.

use std::path::{Path, PathBuf};

use launchpad_common::error::{LaunchpadError, Result};
use serde_yaml::Value;

use crate::document::{expect_sequence, parse_document, scalar_text};
use crate::fragment::Fragment;

/// Loads the instance config and every template it declares.
///
/// # Errors
///
/// Returns an error if the config cannot be read or parsed, if its
/// `templates` list is malformed, or if any template cannot be resolved.
pub fn load_fragments(config_path: &Path, roots: &[PathBuf]) -> Result<Vec<Fragment>> {
    let config_text = read_text(config_path)?;
    let origin = config_path.display().to_string();
    let templates = declared_templates(&config_text, &origin)?;
    tracing::debug!(config = %origin, count = templates.len(), "declared templates");

    let mut fragments = Vec::with_capacity(templates.len() + 2);
    fragments.push(Fragment::marker());
    for name in &templates {
        let path = resolve_template(name, roots)?;
        let text = read_text(&path)?;
        fragments.push(Fragment::template(path, text));
    }
    fragments.push(Fragment::instance(config_path, config_text));

    tracing::info!(config = %origin, fragments = fragments.len(), "fragments loaded");
    Ok(fragments)
}

/// Extracts the ordered `templates` list from an instance config's text.
///
/// # Errors
///
/// Returns an error if the text is not a YAML mapping or `templates` is not
/// a list of scalar names.
pub fn declared_templates(config_text: &str, origin: &str) -> Result<Vec<String>> {
    let doc = parse_document(config_text, origin)?;
    let Some(value) = doc.get("templates") else {
        return Ok(Vec::new());
    };
    let Some(entries) = expect_sequence("templates", value)? else {
        return Ok(Vec::new());
    };
    entries.iter().map(template_name).collect()
}

fn template_name(entry: &Value) -> Result<String> {
    match entry {
        Value::Sequence(_) | Value::Mapping(_) | Value::Null => {
            Err(LaunchpadError::InvalidDirective {
                directive: "templates",
                message: "each entry must be a template file name".into(),
            })
        }
        other => Ok(scalar_text(other).unwrap_or_default()),
    }
}

/// Finds the first root containing `name` as a regular file.
///
/// # Errors
///
/// Returns [`LaunchpadError::TemplateNotFound`] listing every root searched.
pub fn resolve_template(name: &str, roots: &[PathBuf]) -> Result<PathBuf> {
    for root in roots {
        let candidate = root.join(name);
        if candidate.is_file() {
            tracing::debug!(template = name, path = %candidate.display(), "resolved template");
            return Ok(candidate);
        }
    }
    Err(LaunchpadError::TemplateNotFound {
        name: name.to_string(),
        roots: roots.to_vec(),
    })
}

fn read_text(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).map_err(|source| LaunchpadError::Io {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fragment::FragmentSource;

    fn write(dir: &Path, name: &str, content: &str) -> PathBuf {
        let path = dir.join(name);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).expect("create parent");
        }
        std::fs::write(&path, content).expect("write file");
        path
    }

    #[test]
    fn declared_templates_keeps_declaration_order() {
        let names = declared_templates("templates:\n  - b.yml\n  - a.yml\n", "app.yml")
            .expect("should parse");
        assert_eq!(names, vec!["b.yml", "a.yml"]);
    }

    #[test]
    fn declared_templates_defaults_to_empty() {
        assert!(declared_templates("env: {}\n", "app.yml").expect("parses").is_empty());
        assert!(declared_templates("templates:\n", "app.yml").expect("parses").is_empty());
    }

    #[test]
    fn declared_templates_rejects_nested_entries() {
        assert!(declared_templates("templates:\n  - {a: 1}\n", "app.yml").is_err());
    }

    #[test]
    fn resolve_template_prefers_first_root() {
        let first = tempfile::tempdir().expect("tempdir");
        let second = tempfile::tempdir().expect("tempdir");
        let _ = write(first.path(), "web.yml", "first");
        let _ = write(second.path(), "web.yml", "second");

        let roots = vec![first.path().to_path_buf(), second.path().to_path_buf()];
        let resolved = resolve_template("web.yml", &roots).expect("found");
        assert_eq!(resolved, first.path().join("web.yml"));

        let reversed = vec![second.path().to_path_buf(), first.path().to_path_buf()];
        let resolved = resolve_template("web.yml", &reversed).expect("found");
        assert_eq!(resolved, second.path().join("web.yml"));
    }

    #[test]
    fn resolve_template_falls_through_to_later_root() {
        let first = tempfile::tempdir().expect("tempdir");
        let second = tempfile::tempdir().expect("tempdir");
        let _ = write(second.path(), "templates/redis.yml", "x: 1");

        let roots = vec![first.path().to_path_buf(), second.path().to_path_buf()];
        let resolved = resolve_template("templates/redis.yml", &roots).expect("found");
        assert_eq!(resolved, second.path().join("templates/redis.yml"));
    }

    #[test]
    fn resolve_template_skips_directory_with_template_name() {
        let first = tempfile::tempdir().expect("tempdir");
        let second = tempfile::tempdir().expect("tempdir");
        std::fs::create_dir_all(first.path().join("web.yml")).expect("create dir");
        let _ = write(second.path(), "web.yml", "x: 1");

        let roots = vec![first.path().to_path_buf(), second.path().to_path_buf()];
        let resolved = resolve_template("web.yml", &roots).expect("found");
        assert_eq!(resolved, second.path().join("web.yml"));
    }

    #[test]
    fn resolve_template_error_lists_all_roots() {
        let roots = vec![PathBuf::from("/nonexistent/a"), PathBuf::from("/nonexistent/b")];
        match resolve_template("missing.yml", &roots) {
            Err(LaunchpadError::TemplateNotFound { name, roots: searched }) => {
                assert_eq!(name, "missing.yml");
                assert_eq!(searched, roots);
            }
            other => panic!("expected TemplateNotFound, got {other:?}"),
        }
    }

    #[test]
    fn load_fragments_orders_marker_templates_then_config() {
        let dir = tempfile::tempdir().expect("tempdir");
        let _ = write(dir.path(), "one.yml", "params:\n  a: 1\n");
        let _ = write(dir.path(), "two.yml", "params:\n  a: 2\n");
        let config_text = "templates:\n  - two.yml\n  - one.yml\nbase_image: x\n";
        let config = write(dir.path(), "app.yml", config_text);

        let fragments =
            load_fragments(&config, &[dir.path().to_path_buf()]).expect("should load");
        assert_eq!(fragments.len(), 4);
        assert_eq!(fragments[0], Fragment::marker());
        assert_eq!(fragments[1].text, "params:\n  a: 2\n");
        assert_eq!(fragments[2].text, "params:\n  a: 1\n");
        assert_eq!(fragments[3].source, FragmentSource::Instance(config.clone()));
        assert_eq!(fragments[3].text, config_text);
    }

    #[test]
    fn load_fragments_reports_unreadable_config() {
        let err = load_fragments(Path::new("/nonexistent/app.yml"), &[]).expect_err("missing");
        assert!(matches!(err, LaunchpadError::Io { .. }));
    }
}
