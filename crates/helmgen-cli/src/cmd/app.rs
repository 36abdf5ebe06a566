use super::{api, banner};
use crate::root::dir_name;
use anyhow::Context;
use helmgen_core::prompt::Prompter;
use helmgen_core::questions;
use helmgen_core::scaffold::{self, Report};
use helmgen_core::store::ConfigStore;
use helmgen_core::templates;
use helmgen_core::types::Generator;
use std::path::Path;

/// Title the composed API generator shows instead of its own banner.
pub const API_TITLE: &str = "Add an API to your chart";

/// Scaffold the base chart, then add a first API to it.
///
/// Project and author questions are always asked, offering stored answers as
/// defaults. `values.yaml` and `_helpers.tpl` are only written when missing so
/// that fragments added by earlier runs survive.
pub fn run(root: &Path, prompter: &mut dyn Prompter, title: Option<&str>) -> anyhow::Result<Report> {
    banner(prompter, title, "Create a new Helm chart")?;

    let mut store = ConfigStore::load(root).context("failed to load .helmgen.yaml")?;
    let mut context = questions::project_info(&mut store, prompter, &dir_name(root), true)?;
    context.extend(questions::author_info(&mut store, prompter, true)?);
    store.save(root).context("failed to write .helmgen.yaml")?;

    let mut report = Report::new(Generator::App.as_str());
    scaffold::write_plan(root, &templates::app_plan(), &context, &mut report)
        .context("failed to write base chart")?;

    report.absorb(api::run(root, prompter, Some(API_TITLE))?);
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cmd::testing::{api_answers, prompter, transcript, APP_ANSWERS};
    use helmgen_core::paths;
    use helmgen_core::scaffold::FileStatus;
    use helmgen_core::types::Answer;
    use tempfile::TempDir;

    fn app_input(api: &str) -> Vec<&str> {
        [APP_ANSWERS, api_answers(api, "shop/orders:1").as_slice()].concat()
    }

    #[test]
    fn app_creates_chart_and_first_api() {
        let dir = TempDir::new().unwrap();
        let mut p = prompter(&app_input("orders"));
        let report = run(dir.path(), &mut p, None).unwrap();

        for file in [
            "Chart.yaml",
            "values.yaml",
            "README.md",
            ".gitignore",
            ".helmignore",
            "charts/.keep",
            "data/.keep",
            "templates/NOTES.txt",
            "templates/_helpers.tpl",
            "templates/orders/deployment.yaml",
            "templates/orders/service.yaml",
            "templates/orders/gateway.yaml",
            "templates/orders/virtual-service.yaml",
            "templates/orders/config.yaml",
            "data/orders-config.json",
            paths::STORE_FILE,
        ] {
            assert!(dir.path().join(file).exists(), "missing {file}");
        }
        assert_eq!(report.generators, vec!["app", "app:api"]);

        let chart = std::fs::read_to_string(dir.path().join("Chart.yaml")).unwrap();
        assert!(chart.contains("name: shop\n"));
        assert!(chart.contains(r#"keywords: ["shop","retail"]"#));

        let out = transcript(p);
        assert!(out.contains(API_TITLE));
    }

    #[test]
    fn app_stores_answers() {
        let dir = TempDir::new().unwrap();
        let mut p = prompter(&app_input("orders"));
        run(dir.path(), &mut p, None).unwrap();

        let store = ConfigStore::load(dir.path()).unwrap();
        assert_eq!(store.text("project_name"), Some("shop"));
        assert_eq!(store.text("author_email"), Some("ada@example.com"));
        assert_eq!(
            store.get("project_keywords"),
            Some(&Answer::List(vec!["shop".into(), "retail".into()]))
        );
        // API answers are per run and never stored.
        assert!(store.get("api_name").is_none());
    }

    #[test]
    fn rerunning_app_keeps_fragments() {
        let dir = TempDir::new().unwrap();
        let mut p = prompter(&app_input("orders"));
        run(dir.path(), &mut p, None).unwrap();

        let mut input = vec![""; 7];
        input.extend(api_answers("payments", "shop/payments:1"));
        let mut p = prompter(&input);
        let report = run(dir.path(), &mut p, None).unwrap();

        let out = transcript(p);
        assert!(out.contains("Project name? (shop)"));
        let values = std::fs::read_to_string(dir.path().join(paths::VALUES_FILE)).unwrap();
        assert!(values.contains("helmgen:start [api:orders]"));
        assert!(values.contains("helmgen:start [api:payments]"));
        let chart = report.files.iter().find(|f| f.path == "Chart.yaml").unwrap();
        assert_eq!(chart.status, FileStatus::Overwritten);
    }
}
