//! Declarative prompt runner.
//!
//! A generator describes its questions as an ordered list of [`FieldSpec`]s.
//! [`run`] asks them through a [`Prompter`], re-asking a question until its
//! validator accepts the input, and returns the filtered answers keyed by
//! field name.

use crate::error::{HelmgenError, Result};
use crate::types::Answer;
use std::collections::BTreeMap;
use std::io::{BufRead, Write};

pub type Answers = BTreeMap<String, Answer>;

/// Checks raw input; `Err` carries the message shown before re-asking.
pub type Validator = Box<dyn Fn(&str) -> std::result::Result<(), String>>;
/// Turns accepted raw input into the stored answer.
pub type Filter = Box<dyn Fn(&str) -> Answer>;
/// Decides from earlier answers whether a field is asked at all.
pub type Condition = Box<dyn Fn(&Answers) -> bool>;

// ---------------------------------------------------------------------------
// Prompter
// ---------------------------------------------------------------------------

/// The interactive side of a prompt session.
pub trait Prompter {
    /// Show `question` and read one line of input. `None` means the input is
    /// closed.
    fn ask(&mut self, question: &str) -> Result<Option<String>>;

    /// Show an informational line (choices, validation messages).
    fn say(&mut self, text: &str) -> Result<()>;
}

/// Line-oriented prompter over any reader/writer pair.
pub struct LinePrompter<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> LinePrompter<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    pub fn into_output(self) -> W {
        self.output
    }
}

impl LinePrompter<std::io::StdinLock<'static>, std::io::Stderr> {
    /// Read answers from stdin. Questions go to stderr so that stdout stays
    /// reserved for the generator's report.
    pub fn stdio() -> Self {
        Self::new(std::io::stdin().lock(), std::io::stderr())
    }
}

impl<R: BufRead, W: Write> Prompter for LinePrompter<R, W> {
    fn ask(&mut self, question: &str) -> Result<Option<String>> {
        write!(self.output, "{question} ")?;
        self.output.flush()?;
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            writeln!(self.output)?;
            return Ok(None);
        }
        Ok(Some(line.trim_end_matches(['\r', '\n']).to_string()))
    }

    fn say(&mut self, text: &str) -> Result<()> {
        writeln!(self.output, "{text}")?;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// FieldSpec
// ---------------------------------------------------------------------------

pub enum FieldKind {
    /// Free text.
    Input,
    /// Yes/no.
    Confirm,
    /// One of a fixed set of choices, picked by number or by value.
    List { choices: Vec<String> },
}

pub struct FieldSpec {
    pub name: String,
    pub message: String,
    pub kind: FieldKind,
    pub default: Option<Answer>,
    validate: Option<Validator>,
    filter: Option<Filter>,
    when: Option<Condition>,
}

impl FieldSpec {
    fn new(name: &str, message: &str, kind: FieldKind) -> Self {
        Self {
            name: name.to_string(),
            message: message.to_string(),
            kind,
            default: None,
            validate: None,
            filter: None,
            when: None,
        }
    }

    pub fn input(name: &str, message: &str) -> Self {
        Self::new(name, message, FieldKind::Input)
    }

    pub fn confirm(name: &str, message: &str, default: bool) -> Self {
        Self::new(name, message, FieldKind::Confirm).default(Answer::Bool(default))
    }

    pub fn list(name: &str, message: &str, choices: Vec<String>) -> Self {
        Self::new(name, message, FieldKind::List { choices })
    }

    pub fn default(mut self, default: impl Into<Answer>) -> Self {
        self.default = Some(default.into());
        self
    }

    pub fn default_opt(mut self, default: Option<Answer>) -> Self {
        self.default = default;
        self
    }

    pub fn validate(
        mut self,
        f: impl Fn(&str) -> std::result::Result<(), String> + 'static,
    ) -> Self {
        self.validate = Some(Box::new(f));
        self
    }

    pub fn filter(mut self, f: impl Fn(&str) -> Answer + 'static) -> Self {
        self.filter = Some(Box::new(f));
        self
    }

    pub fn when(mut self, f: impl Fn(&Answers) -> bool + 'static) -> Self {
        self.when = Some(Box::new(f));
        self
    }

    fn question(&self) -> String {
        match (&self.kind, &self.default) {
            (FieldKind::Confirm, Some(Answer::Bool(true))) => format!("? {} (Y/n)", self.message),
            (FieldKind::Confirm, _) => format!("? {} (y/N)", self.message),
            (_, Some(Answer::Text(s))) if s.is_empty() => format!("? {}", self.message),
            (_, Some(Answer::List(items))) if items.is_empty() => format!("? {}", self.message),
            (_, Some(default)) => format!("? {} ({default})", self.message),
            (_, None) => format!("? {}", self.message),
        }
    }

    /// Interpret one line of input. `Err` holds the message to show before
    /// asking again.
    fn accept(&self, raw: &str) -> std::result::Result<Answer, String> {
        match &self.kind {
            FieldKind::Confirm => match raw.trim().to_ascii_lowercase().as_str() {
                "" => self
                    .default
                    .clone()
                    .ok_or_else(|| "Please answer y or n".to_string()),
                "y" | "yes" => Ok(Answer::Bool(true)),
                "n" | "no" => Ok(Answer::Bool(false)),
                _ => Err("Please answer y or n".to_string()),
            },
            FieldKind::List { choices } => {
                let raw = raw.trim();
                if raw.is_empty() {
                    return self
                        .default
                        .clone()
                        .ok_or_else(|| "Please choose one of the listed options".to_string());
                }
                let by_number = raw
                    .parse::<usize>()
                    .ok()
                    .and_then(|n| n.checked_sub(1))
                    .and_then(|i| choices.get(i));
                let Some(choice) = by_number.or_else(|| choices.iter().find(|c| *c == raw))
                else {
                    return Err("Please choose one of the listed options".to_string());
                };
                self.finish(choice)
            }
            FieldKind::Input => {
                if raw.is_empty() {
                    if let Some(default) = &self.default {
                        return Ok(default.clone());
                    }
                }
                self.finish(raw)
            }
        }
    }

    fn finish(&self, raw: &str) -> std::result::Result<Answer, String> {
        if let Some(validate) = &self.validate {
            validate(raw)?;
        }
        Ok(match &self.filter {
            Some(filter) => filter(raw),
            None => Answer::Text(raw.to_string()),
        })
    }
}

// ---------------------------------------------------------------------------
// Runner
// ---------------------------------------------------------------------------

/// Ask every field in order and collect the answers.
///
/// Fields whose `when` condition rejects the answers collected so far are
/// skipped and absent from the result.
pub fn run(prompter: &mut dyn Prompter, fields: &[FieldSpec]) -> Result<Answers> {
    let mut answers = Answers::new();
    for field in fields {
        if let Some(when) = &field.when {
            if !when(&answers) {
                tracing::debug!(field = %field.name, "skipped by condition");
                continue;
            }
        }
        if let FieldKind::List { choices } = &field.kind {
            for (i, choice) in choices.iter().enumerate() {
                prompter.say(&format!("  {}) {choice}", i + 1))?;
            }
        }
        let answer = loop {
            let Some(raw) = prompter.ask(&field.question())? else {
                return Err(HelmgenError::InputClosed(field.name.clone()));
            };
            match field.accept(&raw) {
                Ok(answer) => break answer,
                Err(message) => prompter.say(&format!(">> {message}"))?,
            }
        };
        answers.insert(field.name.clone(), answer);
    }
    Ok(answers)
}

// ---------------------------------------------------------------------------
// Validators and filters
// ---------------------------------------------------------------------------

/// Split comma-separated input into trimmed, non-empty tokens.
pub fn comma_list(raw: &str) -> Answer {
    Answer::List(
        raw.split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect(),
    )
}

/// Ensure a route prefix starts with `/`.
pub fn leading_slash(raw: &str) -> Answer {
    if raw.starts_with('/') {
        Answer::Text(raw.to_string())
    } else {
        Answer::Text(format!("/{raw}"))
    }
}

/// Parse input already accepted by an integer validator.
pub fn integer(raw: &str) -> Answer {
    Answer::Int(raw.trim().parse().unwrap_or_default())
}

pub fn validate_port(raw: &str) -> std::result::Result<(), String> {
    match raw.trim().parse::<u16>() {
        Ok(port) if port > 0 => Ok(()),
        _ => Err("Please provide a valid port number".to_string()),
    }
}

pub fn validate_priority(raw: &str) -> std::result::Result<(), String> {
    raw.trim()
        .parse::<i32>()
        .map(|_| ())
        .map_err(|_| "Hook priority must be a number".to_string())
}

pub fn validate_image(raw: &str) -> std::result::Result<(), String> {
    if raw.trim().is_empty() {
        return Err("Please provide a valid image name".to_string());
    }
    Ok(())
}

pub fn validate_name(raw: &str) -> std::result::Result<(), String> {
    if crate::paths::is_valid_name(raw) {
        Ok(())
    } else {
        Err("Name must be lowercase alphanumeric with hyphens".to_string())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
