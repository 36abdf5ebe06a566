use crate::error::HelmgenError;
use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// HookPhase
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum HookPhase {
    PreInstall,
    PostInstall,
    PreDelete,
    PostDelete,
    PreUpgrade,
    PostUpgrade,
    PreRollback,
    PostRollback,
    CrdInstall,
}

impl HookPhase {
    pub fn all() -> &'static [HookPhase] {
        &[
            HookPhase::PreInstall,
            HookPhase::PostInstall,
            HookPhase::PreDelete,
            HookPhase::PostDelete,
            HookPhase::PreUpgrade,
            HookPhase::PostUpgrade,
            HookPhase::PreRollback,
            HookPhase::PostRollback,
            HookPhase::CrdInstall,
        ]
    }

    pub fn as_str(self) -> &'static str {
        match self {
            HookPhase::PreInstall => "pre-install",
            HookPhase::PostInstall => "post-install",
            HookPhase::PreDelete => "pre-delete",
            HookPhase::PostDelete => "post-delete",
            HookPhase::PreUpgrade => "pre-upgrade",
            HookPhase::PostUpgrade => "post-upgrade",
            HookPhase::PreRollback => "pre-rollback",
            HookPhase::PostRollback => "post-rollback",
            HookPhase::CrdInstall => "crd-install",
        }
    }
}

impl fmt::Display for HookPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for HookPhase {
    type Err = HelmgenError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        HookPhase::all()
            .iter()
            .copied()
            .find(|p| p.as_str() == s)
            .ok_or_else(|| HelmgenError::InvalidHookType(s.to_string()))
    }
}

// ---------------------------------------------------------------------------
// Generator
// ---------------------------------------------------------------------------

/// Generator selected on the command line: `app`, `app:api` or `app:hook`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Generator {
    App,
    Api,
    Hook,
}

impl Generator {
    pub fn as_str(self) -> &'static str {
        match self {
            Generator::App => "app",
            Generator::Api => "app:api",
            Generator::Hook => "app:hook",
        }
    }
}

impl fmt::Display for Generator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Generator {
    type Err = HelmgenError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "app" => Ok(Generator::App),
            "app:api" | "api" => Ok(Generator::Api),
            "app:hook" | "hook" => Ok(Generator::Hook),
            _ => Err(HelmgenError::UnknownGenerator(s.to_string())),
        }
    }
}

// ---------------------------------------------------------------------------
// Answer
// ---------------------------------------------------------------------------

/// A single collected answer. Serialized untagged so the store reads as plain
/// YAML scalars and sequences.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Answer {
    Bool(bool),
    Int(i64),
    Text(String),
    List(Vec<String>),
}

impl Answer {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Answer::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Answer::Int(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Answer::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[String]> {
        match self {
            Answer::List(items) => Some(items),
            _ => None,
        }
    }
}

impl fmt::Display for Answer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Answer::Bool(b) => write!(f, "{b}"),
            Answer::Int(n) => write!(f, "{n}"),
            Answer::Text(s) => f.write_str(s),
            Answer::List(items) => f.write_str(&items.join(", ")),
        }
    }
}

impl From<&str> for Answer {
    fn from(s: &str) -> Self {
        Answer::Text(s.to_string())
    }
}

impl From<String> for Answer {
    fn from(s: String) -> Self {
        Answer::Text(s)
    }
}

impl From<bool> for Answer {
    fn from(b: bool) -> Self {
        Answer::Bool(b)
    }
}

impl From<i64> for Answer {
    fn from(n: i64) -> Self {
        Answer::Int(n)
    }
}

impl From<Vec<String>> for Answer {
    fn from(items: Vec<String>) -> Self {
        Answer::List(items)
    }
}
