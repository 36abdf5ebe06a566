use crate::error::Result;
use crate::paths;
use crate::prompt::{self, Answers, FieldSpec, Prompter};
use crate::types::Answer;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

pub const GENERATOR_VERSION: &str = env!("CARGO_PKG_VERSION");

// ---------------------------------------------------------------------------
// ConfigStore
// ---------------------------------------------------------------------------

/// Project answers persisted in `.helmgen.yaml` across generator runs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigStore {
    #[serde(default = "default_version")]
    pub version: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub generator_version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub answers: BTreeMap<String, Answer>,
}

fn default_version() -> u32 {
    1
}

impl Default for ConfigStore {
    fn default() -> Self {
        Self {
            version: default_version(),
            generator_version: None,
            updated_at: None,
            answers: BTreeMap::new(),
        }
    }
}

impl ConfigStore {
    /// Load the store for `root`. A project without a store yet (first run)
    /// yields an empty one.
    pub fn load(root: &Path) -> Result<Self> {
        let path = paths::store_path(root);
        if !path.exists() {
            tracing::debug!(path = %path.display(), "no store yet, starting empty");
            return Ok(Self::default());
        }
        let data = std::fs::read_to_string(&path)?;
        let store: ConfigStore = serde_yaml::from_str(&data)?;
        Ok(store)
    }

    pub fn save(&mut self, root: &Path) -> Result<()> {
        self.generator_version = Some(GENERATOR_VERSION.to_string());
        self.updated_at = Some(Utc::now());
        let path = paths::store_path(root);
        let data = serde_yaml::to_string(self)?;
        crate::io::atomic_write(&path, data.as_bytes())
    }

    pub fn get(&self, name: &str) -> Option<&Answer> {
        self.answers.get(name)
    }

    pub fn text(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(Answer::as_text)
    }

    pub fn set(&mut self, name: &str, value: Answer) {
        self.answers.insert(name.to_string(), value);
    }

    /// Merge `answers` into the store; new answers override stored ones.
    pub fn merge(&mut self, answers: &Answers) {
        for (name, value) in answers {
            self.answers.insert(name.clone(), value.clone());
        }
    }
}

// ---------------------------------------------------------------------------
// Stored fields
// ---------------------------------------------------------------------------

/// When a stored value counts as already answered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Known {
    /// Any non-empty value.
    NonEmpty,
    /// Any list, including an empty one.
    AnyList,
    /// Any string, including the empty string.
    AnyText,
}

impl Known {
    pub fn is_known(self, value: Option<&Answer>) -> bool {
        match (self, value) {
            (Known::NonEmpty, Some(Answer::Text(s))) => !s.is_empty(),
            (Known::NonEmpty, Some(Answer::List(items))) => !items.is_empty(),
            (Known::NonEmpty, Some(_)) => true,
            (Known::AnyList, Some(Answer::List(_))) => true,
            (Known::AnyText, Some(Answer::Text(_))) => true,
            _ => false,
        }
    }
}

/// A persisted field: how to ask for it and when the stored value suffices.
pub struct StoredField {
    pub spec: FieldSpec,
    pub known: Known,
}

impl StoredField {
    pub fn new(spec: FieldSpec, known: Known) -> Self {
        Self { spec, known }
    }
}

/// Prompt for the stored fields that are not yet known (all of them when
/// `force` is set), merge the answers into `store` and return the merged
/// value of every field.
///
/// A field left unanswered keeps its stored value.
pub fn gather(
    store: &mut ConfigStore,
    prompter: &mut dyn Prompter,
    fields: Vec<StoredField>,
    force: bool,
) -> Result<Answers> {
    let mut names = Vec::with_capacity(fields.len());
    let mut to_ask = Vec::new();
    for field in fields {
        names.push(field.spec.name.clone());
        if force || !field.known.is_known(store.get(&field.spec.name)) {
            to_ask.push(field.spec);
        } else {
            tracing::debug!(field = %field.spec.name, "already known, not asking");
        }
    }

    let answers = prompt::run(prompter, &to_ask)?;
    store.merge(&answers);

    let mut merged = Answers::new();
    for name in names {
        if let Some(value) = store.get(&name) {
            merged.insert(name, value.clone());
        }
    }
    Ok(merged)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
