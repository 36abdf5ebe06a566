use crate::error::{HelmgenError, Result};
use crate::prompt::Answers;
use crate::types::Answer;
use regex::{Captures, Regex};
use std::sync::OnceLock;

static PLACEHOLDER_RE: OnceLock<Regex> = OnceLock::new();

fn placeholder_re() -> &'static Regex {
    PLACEHOLDER_RE.get_or_init(|| {
        Regex::new(r"\[\[\s*([A-Za-z0-9_]+)\s*(?:\|\s*([a-z_]+)\s*)?\]\]").expect("valid regex")
    })
}

/// Render `source` against `context`.
///
/// `[[ name ]]` inserts a value: strings verbatim, numbers and booleans in
/// their plain form, lists as a flow sequence of quoted strings.
/// `[[ name | quote ]]` inserts the value as a double-quoted string. Every
/// other character, Helm's `{{ ... }}` actions included, is copied unchanged.
pub fn render(template: &str, source: &str, context: &Answers) -> Result<String> {
    let mut failure = None;
    let out = placeholder_re().replace_all(source, |caps: &Captures| {
        match substitute(template, caps, context) {
            Ok(s) => s,
            Err(e) => {
                failure.get_or_insert(e);
                String::new()
            }
        }
    });
    match failure {
        Some(e) => Err(e),
        None => Ok(out.into_owned()),
    }
}

fn substitute(template: &str, caps: &Captures, context: &Answers) -> Result<String> {
    let name = &caps[1];
    let value = context
        .get(name)
        .ok_or_else(|| HelmgenError::MissingTemplateValue {
            template: template.to_string(),
            name: name.to_string(),
        })?;
    match caps.get(2).map(|m| m.as_str()) {
        None => plain(value),
        Some("quote") => Ok(serde_json::to_string(&value.to_string())?),
        Some(other) => Err(HelmgenError::UnknownFilter {
            template: template.to_string(),
            filter: other.to_string(),
        }),
    }
}

fn plain(value: &Answer) -> Result<String> {
    match value {
        Answer::List(items) => Ok(serde_json::to_string(items)?),
        other => Ok(other.to_string()),
    }
}
