use super::{banner, int, text};
use crate::root::dir_name;
use anyhow::Context;
use helmgen_core::prompt::{self, Prompter};
use helmgen_core::scaffold::{self, Owner, Report, SharedFile};
use helmgen_core::store::ConfigStore;
use helmgen_core::types::{Answer, Generator, HookPhase};
use helmgen_core::{paths, questions, templates, HelmgenError};
use std::path::Path;

/// Add a Helm hook job to one of the chart's APIs.
pub fn run(root: &Path, prompter: &mut dyn Prompter, title: Option<&str>) -> anyhow::Result<Report> {
    // No APIs means nothing to hook into; fail before asking anything.
    let apis = paths::list_apis(root).context("failed to list APIs")?;
    if apis.is_empty() {
        return Err(HelmgenError::NoApis.into());
    }
    scaffold::require_shared_files(root)?;
    banner(prompter, title, "Add hook to existing API")?;

    let mut store = ConfigStore::load(root).context("failed to load .helmgen.yaml")?;
    let mut context = questions::project_info(&mut store, prompter, &dir_name(root), false)?;
    store.save(root).context("failed to write .helmgen.yaml")?;

    context.extend(prompt::run(prompter, &questions::hook_fields(&apis))?);

    let api = text(&context, "hook_api")?;
    let phase: HookPhase = text(&context, "hook_type")?.parse()?;
    let weight = int(&context, "hook_weight")?;
    // The data config map must exist before the job that mounts it.
    context.insert("hook_data_weight".to_string(), Answer::Int(weight - 1));
    let glob = text(&context, "hook_file_glob")?;
    let with_data = !glob.trim().is_empty();
    tracing::debug!(api = %api, %phase, weight, with_data, "scaffolding hook");

    let mut report = Report::new(Generator::Hook.as_str());
    scaffold::write_plan(root, &templates::hook_plan(&api, phase, with_data), &context, &mut report)
        .with_context(|| format!("failed to write templates for hook '{api}:{phase}'"))?;
    let owner = Owner::Hook(&api, phase);
    scaffold::upsert_fragment(
        root,
        SharedFile::Helpers,
        owner,
        templates::HOOK_HELPERS_FRAGMENT,
        &context,
        &mut report,
    )?;
    scaffold::upsert_fragment(
        root,
        SharedFile::Values,
        owner,
        templates::HOOK_VALUES_FRAGMENT,
        &context,
        &mut report,
    )?;

    report.notes.push(format!(
        "A {phase} hook has been added to api '{api}' in templates/{api}/{phase}/."
    ));
    if with_data {
        report.notes.push(format!(
            "Put the hook's data files in data/ matching '{glob}'; they are mounted at /data."
        ));
    } else {
        report
            .notes
            .push("The hook does not require any data, and none will be mounted.".to_string());
    }
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cmd::testing::{api_answers, prompter, transcript, APP_ANSWERS};
    use tempfile::TempDir;

    fn chart(dir: &TempDir) {
        let mut p = prompter(&[APP_ANSWERS, api_answers("orders", "shop/orders:1").as_slice()].concat());
        crate::cmd::app::run(dir.path(), &mut p, None).unwrap();
    }

    #[test]
    fn hook_without_apis_fails_before_asking() {
        let dir = TempDir::new().unwrap();
        let mut p = prompter(&["1"]);
        let err = run(dir.path(), &mut p, None).unwrap_err();
        assert_eq!(
            err.to_string(),
            "This project does not have any APIs to assign hooks to"
        );
        assert!(transcript(p).is_empty());
        assert!(!dir.path().join("templates").exists());
    }

    #[test]
    fn hook_with_data_glob() {
        let dir = TempDir::new().unwrap();
        chart(&dir);
        let mut p = prompter(&["orders", "pre-install", "5", "shop/migrate:1", "*.sql", "migrate, --all"]);
        let report = run(dir.path(), &mut p, None).unwrap();

        let job = std::fs::read_to_string(dir.path().join("templates/orders/pre-install/job.yaml")).unwrap();
        assert!(job.contains(r#""helm.sh/hook-weight": "5""#));
        assert!(job.contains(r#"command: ["migrate","--all"]"#));
        let data =
            std::fs::read_to_string(dir.path().join("templates/orders/pre-install/config.yaml")).unwrap();
        assert!(data.contains(r#""helm.sh/hook-weight": "4""#));

        let values = std::fs::read_to_string(dir.path().join(paths::VALUES_FILE)).unwrap();
        assert!(values.lines().any(|l| l == "orders_pre-install:"));
        assert!(values.contains(r#"fileGlob: "*.sql""#));
        assert_eq!(report.notes.len(), 2);
    }

    #[test]
    fn hook_without_glob_skips_data_config() {
        let dir = TempDir::new().unwrap();
        chart(&dir);
        let mut p = prompter(&["1", "", "", "shop/notify:1", "", ""]);
        let report = run(dir.path(), &mut p, None).unwrap();

        let hook_dir = dir.path().join("templates/orders/post-install");
        assert!(hook_dir.join("job.yaml").exists());
        assert!(!hook_dir.join("config.yaml").exists());
        let job = std::fs::read_to_string(hook_dir.join("job.yaml")).unwrap();
        assert!(job.contains(r#""helm.sh/hook-weight": "10""#));
        assert!(job.contains("command: []"));
        assert!(job.contains(r#"index .Values "orders_post-install""#));
        assert_eq!(
            report.notes.last().map(String::as_str),
            Some("The hook does not require any data, and none will be mounted.")
        );
    }

    #[test]
    fn hook_values_key_differs_from_api_names() {
        let dir = TempDir::new().unwrap();
        chart(&dir);
        let mut p = prompter(&api_answers("orders-post-install", "shop/other:1"));
        crate::cmd::api::run(dir.path(), &mut p, None).unwrap();

        let mut p = prompter(&["orders", "", "", "shop/notify:1", "", ""]);
        run(dir.path(), &mut p, None).unwrap();

        let values = std::fs::read_to_string(dir.path().join(paths::VALUES_FILE)).unwrap();
        assert_eq!(values.lines().filter(|l| *l == "orders-post-install:").count(), 1);
        assert_eq!(values.lines().filter(|l| *l == "orders_post-install:").count(), 1);
        let parsed: serde_yaml::Value = serde_yaml::from_str(&values).unwrap();
        assert!(parsed.get("orders-post-install").is_some());
        assert!(parsed.get("orders_post-install").is_some());
    }

    #[test]
    fn hook_skips_known_project_questions() {
        let dir = TempDir::new().unwrap();
        chart(&dir);
        let mut p = prompter(&["1", "", "", "img", "", ""]);
        run(dir.path(), &mut p, None).unwrap();
        let out = transcript(p);
        assert!(!out.contains("Project name?"));
        assert!(out.contains("1) orders"));
    }

    #[test]
    fn hook_dirs_are_not_listed_as_apis() {
        let dir = TempDir::new().unwrap();
        chart(&dir);
        let mut p = prompter(&["1", "", "", "img", "", ""]);
        run(dir.path(), &mut p, None).unwrap();
        assert_eq!(paths::list_apis(dir.path()).unwrap(), vec!["orders"]);
    }
}
