pub mod api;
pub mod app;
pub mod config;
pub mod hook;

use crate::output::{print_json, print_report};
use anyhow::anyhow;
use helmgen_core::prompt::{Answers, LinePrompter, Prompter};
use helmgen_core::types::{Answer, Generator};
use std::path::Path;

/// Version of the helmgen binary embedded at compile time.
pub const HELMGEN_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Run `generator` against `root`, reading answers from stdin.
pub fn generate(
    root: &Path,
    generator: Generator,
    title: Option<&str>,
    json: bool,
) -> anyhow::Result<()> {
    let mut prompter = LinePrompter::stdio();
    tracing::debug!(root = %root.display(), %generator, "running generator");
    let report = match generator {
        Generator::App => app::run(root, &mut prompter, title)?,
        Generator::Api => api::run(root, &mut prompter, title)?,
        Generator::Hook => hook::run(root, &mut prompter, title)?,
    };
    if json {
        print_json(&report)
    } else {
        print_report(&report);
        Ok(())
    }
}

/// Greeting shown before the first question. A composing generator passes
/// `title` to replace the default banner.
fn banner(prompter: &mut dyn Prompter, title: Option<&str>, subtitle: &str) -> anyhow::Result<()> {
    match title {
        Some(title) => {
            prompter.say("")?;
            prompter.say(title)?;
        }
        None => {
            prompter.say(&format!("helmgen v{HELMGEN_VERSION}: Helm Chart Generator"))?;
            prompter.say(subtitle)?;
        }
    }
    prompter.say("")?;
    Ok(())
}

fn text(answers: &Answers, name: &str) -> anyhow::Result<String> {
    answers
        .get(name)
        .and_then(Answer::as_text)
        .map(str::to_string)
        .ok_or_else(|| anyhow!("missing answer for '{name}'"))
}

fn int(answers: &Answers, name: &str) -> anyhow::Result<i64> {
    answers
        .get(name)
        .and_then(Answer::as_int)
        .ok_or_else(|| anyhow!("missing answer for '{name}'"))
}

fn flag(answers: &Answers, name: &str) -> bool {
    answers.get(name).and_then(Answer::as_bool).unwrap_or(false)
}
