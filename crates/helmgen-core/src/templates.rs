use crate::error::{HelmgenError, Result};
use crate::paths;
use crate::types::HookPhase;
use rust_embed::Embed;
use std::path::PathBuf;

#[derive(Embed)]
#[folder = "templates/"]
struct Sources;

pub const API_HELPERS_FRAGMENT: &str = "fragments/api-helpers.tpl";
pub const API_VALUES_FRAGMENT: &str = "fragments/api-values.yaml";
pub const HOOK_HELPERS_FRAGMENT: &str = "fragments/hook-helpers.tpl";
pub const HOOK_VALUES_FRAGMENT: &str = "fragments/hook-values.yaml";

const APP_FILES: &[&str] = &[
    "Chart.yaml",
    "values.yaml",
    "charts/_keep",
    "data/_keep",
    "README.md",
    "_gitignore",
    "_helmignore",
    "_prettierrc",
    "templates/NOTES.txt",
    "templates/_helpers.tpl",
];

/// Base files that later runs append to. Written only when absent so that a
/// repeated `app` run keeps every API and hook fragment.
const APP_SHARED_FILES: &[&str] = &["values.yaml", "templates/_helpers.tpl"];

const API_FILES: &[&str] = &[
    "templates/_api/config.yaml",
    "templates/_api/deployment.yaml",
    "templates/_api/service.yaml",
    "templates/_api/gateway.yaml",
    "templates/_api/virtual-service.yaml",
];

const API_AUTH_FILE: &str = "templates/_api/policy.yaml";
const API_DATA_FILE: &str = "data/_config.json";

const HOOK_JOB_FILE: &str = "templates/_api/_hook/job.yaml";
const HOOK_DATA_FILE: &str = "templates/_api/_hook/config.yaml";

/// Read an embedded template source, e.g. `app/Chart.yaml`.
pub fn source(path: &str) -> Result<String> {
    let file = <Sources as Embed>::get(path)
        .ok_or_else(|| HelmgenError::TemplateNotFound(path.to_string()))?;
    Ok(String::from_utf8_lossy(&file.data).into_owned())
}

// ---------------------------------------------------------------------------
// Plans
// ---------------------------------------------------------------------------

/// One template to render: its embedded source and its destination relative
/// to the chart root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Planned {
    pub source: String,
    pub dest: PathBuf,
    pub shared: bool,
}

fn plan(group: &str, file: &str, api: Option<&str>, hook: Option<&str>) -> Planned {
    Planned {
        source: format!("{group}/{file}"),
        dest: paths::destination(file, api, hook),
        shared: false,
    }
}

pub fn app_plan() -> Vec<Planned> {
    APP_FILES
        .iter()
        .map(|file| Planned {
            shared: APP_SHARED_FILES.contains(file),
            ..plan("app", file, None, None)
        })
        .collect()
}

/// Files for one API. The authentication policy is only planned when auth is
/// enabled.
pub fn api_plan(api: &str, auth_enabled: bool) -> Vec<Planned> {
    let mut files: Vec<Planned> = API_FILES
        .iter()
        .map(|file| plan("api", file, Some(api), None))
        .collect();
    if auth_enabled {
        files.push(plan("api", API_AUTH_FILE, Some(api), None));
    }
    files.push(Planned {
        source: format!("api/{API_DATA_FILE}"),
        dest: PathBuf::from(paths::DATA_DIR).join(format!("{api}-config.json")),
        shared: false,
    });
    files
}

/// Files for one hook. The data config map is only planned when the hook
/// mounts data files.
pub fn hook_plan(api: &str, phase: HookPhase, with_data: bool) -> Vec<Planned> {
    let mut files = vec![plan("hook", HOOK_JOB_FILE, Some(api), Some(phase.as_str()))];
    if with_data {
        files.push(plan("hook", HOOK_DATA_FILE, Some(api), Some(phase.as_str())));
    }
    files
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dests(plan: &[Planned]) -> Vec<String> {
        plan.iter()
            .map(|p| p.dest.to_string_lossy().into_owned())
            .collect()
    }

    #[test]
    fn every_planned_source_is_embedded() {
        let mut all = app_plan();
        all.extend(api_plan("orders", true));
        all.extend(hook_plan("orders", HookPhase::PreInstall, true));
        for p in &all {
            source(&p.source).unwrap_or_else(|_| panic!("missing template {}", p.source));
        }
        for fragment in [
            API_HELPERS_FRAGMENT,
            API_VALUES_FRAGMENT,
            HOOK_HELPERS_FRAGMENT,
            HOOK_VALUES_FRAGMENT,
        ] {
            assert!(source(fragment).is_ok(), "missing fragment {fragment}");
        }
    }

    #[test]
    fn app_plan_marks_shared_files() {
        let plan = app_plan();
        let shared: Vec<_> = plan.iter().filter(|p| p.shared).map(|p| &p.dest).collect();
        assert_eq!(
            shared,
            vec![
                &PathBuf::from("values.yaml"),
                &PathBuf::from("templates/_helpers.tpl")
            ]
        );
        assert!(dests(&plan).contains(&".gitignore".to_string()));
        assert!(dests(&plan).contains(&".prettierrc".to_string()));
        assert!(dests(&plan).contains(&"charts/.keep".to_string()));
    }

    #[test]
    fn api_plan_gates_policy_on_auth() {
        let without = dests(&api_plan("orders", false));
        assert!(!without.contains(&"templates/orders/policy.yaml".to_string()));
        assert!(without.contains(&"templates/orders/deployment.yaml".to_string()));
        assert!(without.contains(&"data/orders-config.json".to_string()));

        let with = dests(&api_plan("orders", true));
        assert!(with.contains(&"templates/orders/policy.yaml".to_string()));
    }

    #[test]
    fn hook_plan_gates_data_config() {
        assert_eq!(
            dests(&hook_plan("orders", HookPhase::PostUpgrade, false)),
            vec!["templates/orders/post-upgrade/job.yaml"]
        );
        assert_eq!(
            dests(&hook_plan("orders", HookPhase::PostUpgrade, true)),
            vec![
                "templates/orders/post-upgrade/job.yaml",
                "templates/orders/post-upgrade/config.yaml"
            ]
        );
    }

    #[test]
    fn unknown_template_is_an_error() {
        assert!(matches!(
            source("app/missing.yaml"),
            Err(HelmgenError::TemplateNotFound(_))
        ));
    }
}
