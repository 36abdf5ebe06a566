//! The questions each generator asks.

use crate::error::Result;
use crate::prompt::{self, Answers, FieldSpec, Prompter};
use crate::store::{gather, ConfigStore, Known, StoredField};
use crate::types::{Answer, HookPhase};

pub const NOT_AVAILABLE: &str = "__NA__";
pub const DEFAULT_DESCRIPTION: &str = "My helm chart";
pub const DEFAULT_CHART_NAME: &str = "my-chart";

/// Turn a directory name into a usable chart name: whitespace and other
/// characters outside `[a-z0-9-]` become `-`.
pub fn chart_name_from(dir_name: &str) -> String {
    let name: String = dir_name
        .trim()
        .to_lowercase()
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '-' { c } else { '-' })
        .collect();
    let name = name.trim_matches('-');
    if name.is_empty() {
        DEFAULT_CHART_NAME.to_string()
    } else {
        name.chars().take(63).collect::<String>().trim_end_matches('-').to_string()
    }
}

// ---------------------------------------------------------------------------
// Project and author
// ---------------------------------------------------------------------------

fn stored_or(store: &ConfigStore, name: &str, fallback: Answer) -> Answer {
    match store.get(name) {
        Some(Answer::Text(s)) if s.is_empty() => fallback,
        Some(value) => value.clone(),
        None => fallback,
    }
}

pub fn project_fields(store: &ConfigStore, dir_name: &str) -> Vec<StoredField> {
    let name_default = store
        .text("project_name")
        .filter(|s| !s.is_empty())
        .map(chart_name_from)
        .unwrap_or_else(|| chart_name_from(dir_name));
    vec![
        StoredField::new(
            FieldSpec::input("project_name", "Project name?")
                .default(name_default)
                .validate(prompt::validate_name),
            Known::NonEmpty,
        ),
        StoredField::new(
            FieldSpec::input("project_description", "Project description?").default(stored_or(
                store,
                "project_description",
                Answer::from(DEFAULT_DESCRIPTION),
            )),
            Known::NonEmpty,
        ),
        StoredField::new(
            FieldSpec::input("project_keywords", "Project keywords (comma separated)?")
                .default(stored_or(store, "project_keywords", Answer::List(vec![])))
                .filter(prompt::comma_list),
            Known::AnyList,
        ),
        StoredField::new(
            FieldSpec::input("project_icon", "Project icon (leave empty if none)?")
                .default_opt(store.get("project_icon").cloned()),
            Known::AnyText,
        ),
        StoredField::new(
            FieldSpec::input(
                "project_app_version",
                "Version of application packaged by project (leave empty if none)?",
            )
            .default_opt(store.get("project_app_version").cloned()),
            Known::AnyText,
        ),
    ]
}

pub fn author_fields(store: &ConfigStore) -> Vec<StoredField> {
    vec![
        StoredField::new(
            FieldSpec::input("author_name", "Author name?").default(stored_or(
                store,
                "author_name",
                Answer::from(NOT_AVAILABLE),
            )),
            Known::NonEmpty,
        ),
        StoredField::new(
            FieldSpec::input("author_email", "Author email?").default(stored_or(
                store,
                "author_email",
                Answer::from(NOT_AVAILABLE),
            )),
            Known::NonEmpty,
        ),
    ]
}

/// Collect project metadata, asking only for what the store lacks unless
/// `force` is set.
pub fn project_info(
    store: &mut ConfigStore,
    prompter: &mut dyn Prompter,
    dir_name: &str,
    force: bool,
) -> Result<Answers> {
    let fields = project_fields(store, dir_name);
    gather(store, prompter, fields, force)
}

pub fn author_info(
    store: &mut ConfigStore,
    prompter: &mut dyn Prompter,
    force: bool,
) -> Result<Answers> {
    let fields = author_fields(store);
    gather(store, prompter, fields, force)
}

// ---------------------------------------------------------------------------
// API
// ---------------------------------------------------------------------------

fn auth_enabled(answers: &Answers) -> bool {
    answers.get("api_auth_enabled").and_then(Answer::as_bool) == Some(true)
}

/// API questions. `reserved` lists names whose values section would clash
/// with an existing top-level key in `values.yaml`.
pub fn api_fields(reserved: &[String]) -> Vec<FieldSpec> {
    let reserved = reserved.to_vec();
    vec![
        FieldSpec::input("api_name", "Api name?")
            .default("my-api")
            .validate(move |raw| {
                prompt::validate_name(raw)?;
                if reserved.iter().any(|r| r == raw) {
                    return Err(format!("'{raw}' is already a top-level key in values.yaml"));
                }
                Ok(())
            }),
        FieldSpec::input("api_path", "Api path?")
            .default("/")
            .filter(prompt::leading_slash),
        FieldSpec::input("api_port", "Port number on which API listens?")
            .default(Answer::Int(3000))
            .validate(prompt::validate_port)
            .filter(prompt::integer),
        FieldSpec::confirm("api_tls_enabled", "Enable TLS access?", true),
        FieldSpec::confirm("api_auth_enabled", "Require JWT authentication?", false),
        FieldSpec::input("api_auth_issuer", "JWT issuer?")
            .validate(non_empty("Please provide a JWT issuer"))
            .when(auth_enabled),
        FieldSpec::input("api_auth_jwks_uri", "JWKS URI?")
            .validate(non_empty("Please provide a JWKS URI"))
            .when(auth_enabled),
        FieldSpec::input("api_image", "Api image?").validate(prompt::validate_image),
    ]
}

fn non_empty(message: &'static str) -> impl Fn(&str) -> std::result::Result<(), String> {
    move |raw| {
        if raw.trim().is_empty() {
            Err(message.to_string())
        } else {
            Ok(())
        }
    }
}

// ---------------------------------------------------------------------------
// Hook
// ---------------------------------------------------------------------------

pub fn hook_fields(apis: &[String]) -> Vec<FieldSpec> {
    let known = apis.to_vec();
    vec![
        FieldSpec::list("hook_api", "Which API?", apis.to_vec()).validate(move |answer| {
            if known.iter().any(|a| a == answer) {
                Ok(())
            } else {
                Err("Please select an API to add the hook to".to_string())
            }
        }),
        FieldSpec::list(
            "hook_type",
            "Hook type?",
            HookPhase::all().iter().map(|p| p.to_string()).collect(),
        )
        .default(HookPhase::PostInstall.as_str()),
        FieldSpec::input("hook_weight", "Hook priority?")
            .default(Answer::Int(10))
            .validate(prompt::validate_priority)
            .filter(prompt::integer),
        FieldSpec::input("hook_image", "Hook image?").validate(prompt::validate_image),
        FieldSpec::input("hook_file_glob", "Hook data file glob (leave empty if none)?"),
        FieldSpec::input("hook_command", "Hook command and args (comma separated)?")
            .default(Answer::List(vec![]))
            .filter(prompt::comma_list),
    ]
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
