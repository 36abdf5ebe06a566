use super::{banner, flag, text};
use crate::root::dir_name;
use anyhow::Context;
use helmgen_core::prompt::{self, Prompter};
use helmgen_core::questions;
use helmgen_core::scaffold::{self, Owner, Report, SharedFile};
use helmgen_core::store::ConfigStore;
use helmgen_core::templates;
use helmgen_core::types::{Answer, Generator};
use std::path::Path;

/// Add one API (deployment, service, gateway, routing, optional auth policy)
/// to an existing chart.
pub fn run(root: &Path, prompter: &mut dyn Prompter, title: Option<&str>) -> anyhow::Result<Report> {
    banner(prompter, title, "Add new API to chart")?;
    scaffold::require_shared_files(root)?;

    let mut store = ConfigStore::load(root).context("failed to load .helmgen.yaml")?;
    let mut context = questions::project_info(&mut store, prompter, &dir_name(root), false)?;
    context.extend(questions::author_info(&mut store, prompter, false)?);
    store.save(root).context("failed to write .helmgen.yaml")?;

    let reserved = scaffold::reserved_api_names(root).context("failed to read values.yaml")?;
    context.extend(prompt::run(prompter, &questions::api_fields(&reserved))?);
    for gated in ["api_auth_issuer", "api_auth_jwks_uri"] {
        context.entry(gated.to_string()).or_insert_with(|| Answer::from(""));
    }

    let api = text(&context, "api_name")?;
    let auth = flag(&context, "api_auth_enabled");
    tracing::debug!(api = %api, auth, "scaffolding api");

    let mut report = Report::new(Generator::Api.as_str());
    scaffold::write_plan(root, &templates::api_plan(&api, auth), &context, &mut report)
        .with_context(|| format!("failed to write templates for api '{api}'"))?;
    scaffold::upsert_fragment(
        root,
        SharedFile::Helpers,
        Owner::Api(&api),
        templates::API_HELPERS_FRAGMENT,
        &context,
        &mut report,
    )?;
    scaffold::upsert_fragment(
        root,
        SharedFile::Values,
        Owner::Api(&api),
        templates::API_VALUES_FRAGMENT,
        &context,
        &mut report,
    )?;

    report.notes.push(format!(
        "Kubernetes resources for api '{api}' have been added to templates/{api}/.\n\
         To add a Helm hook to it, run: helmgen app:hook"
    ));
    Ok(report)
}
