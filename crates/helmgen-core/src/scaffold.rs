use crate::error::{HelmgenError, Result};
use crate::io::{self, Upsert};
use crate::paths;
use crate::prompt::Answers;
use crate::render::render;
use crate::templates::{self, Planned};
use crate::types::HookPhase;
use serde::Serialize;
use std::fmt;
use std::path::Path;

// ---------------------------------------------------------------------------
// Report
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FileStatus {
    Created,
    Overwritten,
    Exists,
    Appended,
    Replaced,
}

impl FileStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            FileStatus::Created => "created",
            FileStatus::Overwritten => "overwritten",
            FileStatus::Exists => "exists",
            FileStatus::Appended => "appended",
            FileStatus::Replaced => "replaced",
        }
    }
}

impl fmt::Display for FileStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileChange {
    pub path: String,
    pub status: FileStatus,
}

/// Everything one generator run touched, in order.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Report {
    pub generators: Vec<String>,
    pub files: Vec<FileChange>,
    /// Follow-up instructions for the user.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub notes: Vec<String>,
}

impl Report {
    pub fn new(generator: impl Into<String>) -> Self {
        Self {
            generators: vec![generator.into()],
            files: Vec::new(),
            notes: Vec::new(),
        }
    }

    pub fn absorb(&mut self, other: Report) {
        self.generators.extend(other.generators);
        self.files.extend(other.files);
        self.notes.extend(other.notes);
    }

    fn push(&mut self, path: &Path, status: FileStatus) {
        self.files.push(FileChange {
            path: path.to_string_lossy().into_owned(),
            status,
        });
    }
}

// ---------------------------------------------------------------------------
// Rendering planned files
// ---------------------------------------------------------------------------

/// Render every planned template into `root`.
///
/// Shared files that already exist are left alone; everything else is
/// (over)written.
pub fn write_plan(root: &Path, plan: &[Planned], context: &Answers, report: &mut Report) -> Result<()> {
    for item in plan {
        let dest = root.join(&item.dest);
        if item.shared && dest.exists() {
            tracing::debug!(path = %item.dest.display(), "shared file exists, keeping it");
            report.push(&item.dest, FileStatus::Exists);
            continue;
        }
        let source = templates::source(&item.source)?;
        let text = render(&item.source, &source, context)?;
        let status = if dest.exists() {
            FileStatus::Overwritten
        } else {
            FileStatus::Created
        };
        io::atomic_write(&dest, text.as_bytes())?;
        tracing::debug!(path = %item.dest.display(), %status, "wrote template");
        report.push(&item.dest, status);
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Shared-file fragments
// ---------------------------------------------------------------------------

/// Who contributed a fragment to a shared file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Owner<'a> {
    Api(&'a str),
    Hook(&'a str, HookPhase),
}

impl Owner<'_> {
    /// Marker key; the closing bracket keeps `api:orders` from matching
    /// `api:orders-v2`.
    pub fn key(&self) -> String {
        match self {
            Owner::Api(api) => format!("[api:{api}]"),
            Owner::Hook(api, phase) => format!("[hook:{api}:{phase}]"),
        }
    }
}

/// The shared files fragments are appended to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SharedFile {
    Helpers,
    Values,
}

impl SharedFile {
    pub fn relative(self) -> &'static str {
        match self {
            SharedFile::Helpers => paths::HELPERS_FILE,
            SharedFile::Values => paths::VALUES_FILE,
        }
    }

    /// Start and end markers in the file's own comment syntax.
    pub fn markers(self, owner: Owner<'_>) -> (String, String) {
        let key = owner.key();
        match self {
            SharedFile::Helpers => (
                format!("{{{{/* helmgen:start {key} */}}}}"),
                format!("{{{{/* helmgen:end {key} */}}}}"),
            ),
            SharedFile::Values => (
                format!("# helmgen:start {key}"),
                format!("# helmgen:end {key}"),
            ),
        }
    }
}

/// Fail unless the base chart's shared files exist. Sub-generators check this
/// before asking anything.
pub fn require_shared_files(root: &Path) -> Result<()> {
    for file in [SharedFile::Helpers, SharedFile::Values] {
        if !root.join(file.relative()).is_file() {
            return Err(HelmgenError::MissingSharedFile {
                file: file.relative().to_string(),
            });
        }
    }
    Ok(())
}

/// Top-level keys the base chart's `values.yaml` defines for itself.
pub const BASE_VALUE_KEYS: &[&str] = &["global", "nameOverride", "fullnameOverride"];

/// Names a new API may not take because its values section would share a
/// top-level key with something already in `values.yaml`. Keys owned by an
/// existing API stay available so that API can be regenerated.
pub fn reserved_api_names(root: &Path) -> Result<Vec<String>> {
    let mut reserved: Vec<String> = BASE_VALUE_KEYS.iter().map(|k| k.to_string()).collect();
    let path = root.join(paths::VALUES_FILE);
    if path.is_file() {
        let data = std::fs::read_to_string(&path)?;
        let has_content = data.lines().any(|line| {
            let line = line.trim();
            !line.is_empty() && !line.starts_with('#')
        });
        if has_content {
            if let serde_yaml::Value::Mapping(map) = serde_yaml::from_str(&data)? {
                reserved.extend(map.keys().filter_map(|k| k.as_str()).map(str::to_string));
            }
        }
    }
    let apis = paths::list_apis(root)?;
    reserved.retain(|key| !apis.contains(key));
    reserved.sort();
    reserved.dedup();
    Ok(reserved)
}

/// Render `fragment` and insert it into `file` under `owner`'s markers.
///
/// The first run for an owner appends; later runs replace that owner's
/// fragment in place. Fragments of other owners are never touched. The shared
/// file must already exist.
pub fn upsert_fragment(
    root: &Path,
    file: SharedFile,
    owner: Owner<'_>,
    fragment: &str,
    context: &Answers,
    report: &mut Report,
) -> Result<()> {
    let source = templates::source(fragment)?;
    let mut body = render(fragment, &source, context)?;
    if !body.ends_with('\n') {
        body.push('\n');
    }
    let (start, end) = file.markers(owner);
    let rel = Path::new(file.relative());
    let status = match io::upsert_marked_section(&root.join(rel), &start, &end, &body)? {
        Upsert::Appended => FileStatus::Appended,
        Upsert::Replaced => FileStatus::Replaced,
    };
    tracing::debug!(path = %rel.display(), key = %owner.key(), %status, "updated shared file");
    report.push(rel, status);
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
