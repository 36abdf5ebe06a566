use regex::Regex;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

// ---------------------------------------------------------------------------
// File and directory constants
// ---------------------------------------------------------------------------

pub const STORE_FILE: &str = ".helmgen.yaml";

pub const VALUES_FILE: &str = "values.yaml";
pub const TEMPLATES_DIR: &str = "templates";
pub const DATA_DIR: &str = "data";
pub const HELPERS_FILE: &str = "templates/_helpers.tpl";

// ---------------------------------------------------------------------------
// Path helpers
// ---------------------------------------------------------------------------

pub fn store_path(root: &Path) -> PathBuf {
    root.join(STORE_FILE)
}

pub fn templates_dir(root: &Path) -> PathBuf {
    root.join(TEMPLATES_DIR)
}

/// Map a logical template path to its destination, relative to the chart root.
///
/// A leading `_` on any segment becomes `.` (`_gitignore` → `.gitignore`,
/// `charts/_keep` → `charts/.keep`), except that the placeholder segments
/// `_api` and `_hook` are replaced by `api` and `hook` when given. `_helpers.tpl`
/// keeps its underscore: Helm skips rendering files that start with `_`.
pub fn destination(template: &str, api: Option<&str>, hook: Option<&str>) -> PathBuf {
    let mut out = PathBuf::new();
    for segment in template.split('/') {
        match (segment, api, hook) {
            ("_api", Some(api), _) => out.push(api),
            ("_hook", _, Some(hook)) => out.push(hook),
            ("_helpers.tpl", ..) => out.push(segment),
            (s, ..) => match s.strip_prefix('_') {
                Some(rest) => out.push(format!(".{rest}")),
                None => out.push(s),
            },
        }
    }
    out
}

/// List the immediate subdirectories of `templates/`, sorted by name.
///
/// Each subdirectory is an API scaffolded by an earlier run. A missing
/// `templates/` yields an empty list.
pub fn list_apis(root: &Path) -> std::io::Result<Vec<String>> {
    let dir = templates_dir(root);
    if !dir.is_dir() {
        return Ok(vec![]);
    }
    let mut apis = Vec::new();
    for entry in std::fs::read_dir(&dir)? {
        let entry = entry?;
        if entry.file_type()?.is_dir() {
            apis.push(entry.file_name().to_string_lossy().into_owned());
        }
    }
    apis.sort();
    Ok(apis)
}

// ---------------------------------------------------------------------------
// Name validation
// ---------------------------------------------------------------------------

static NAME_RE: OnceLock<Regex> = OnceLock::new();

fn name_re() -> &'static Regex {
    NAME_RE.get_or_init(|| {
        Regex::new(r"^[a-z0-9][a-z0-9\-]*[a-z0-9]$|^[a-z0-9]$").expect("valid regex")
    })
}

/// Chart and API names end up as Kubernetes resource names, so they must be
/// DNS labels.
pub fn is_valid_name(name: &str) -> bool {
    !name.is_empty() && name.len() <= 63 && name_re().is_match(name)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_names() {
        for name in ["orders", "a", "my-api-2", "x1"] {
            assert!(is_valid_name(name), "expected valid: {name}");
        }
    }

    #[test]
    fn invalid_names() {
        for name in ["", "-api", "api-", "has space", "Upper", "a_b"] {
            assert!(!is_valid_name(name), "expected invalid: {name}");
        }
        assert!(!is_valid_name(&"a".repeat(64)));
    }

    #[test]
    fn destination_rewrites_dot_files() {
        assert_eq!(destination("_gitignore", None, None), PathBuf::from(".gitignore"));
        assert_eq!(destination("charts/_keep", None, None), PathBuf::from("charts/.keep"));
        assert_eq!(
            destination("templates/_helpers.tpl", None, None),
            PathBuf::from("templates/_helpers.tpl")
        );
    }

    #[test]
    fn destination_substitutes_api_and_hook() {
        assert_eq!(
            destination("templates/_api/service.yaml", Some("orders"), None),
            PathBuf::from("templates/orders/service.yaml")
        );
        assert_eq!(
            destination("templates/_api/_hook/job.yaml", Some("orders"), Some("pre-install")),
            PathBuf::from("templates/orders/pre-install/job.yaml")
        );
    }

    #[test]
    fn list_apis_ignores_files() {
        let dir = tempfile::TempDir::new().unwrap();
        assert!(list_apis(dir.path()).unwrap().is_empty());

        let templates = templates_dir(dir.path());
        std::fs::create_dir_all(templates.join("payments")).unwrap();
        std::fs::create_dir_all(templates.join("orders")).unwrap();
        std::fs::write(templates.join("_helpers.tpl"), "").unwrap();
        std::fs::write(templates.join("NOTES.txt"), "").unwrap();

        assert_eq!(list_apis(dir.path()).unwrap(), vec!["orders", "payments"]);
    }
}
