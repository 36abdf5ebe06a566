use helmgen_core::paths;
use std::path::{Path, PathBuf};

/// Resolve the chart root directory.
///
/// Priority:
/// 1. `--root` flag / `HELMGEN_ROOT` env var (passed in as `explicit`)
/// 2. Walk upward from `cwd` looking for `.helmgen.yaml`
/// 3. Fall back to `cwd`
pub fn resolve_root(explicit: Option<&Path>) -> PathBuf {
    if let Some(p) = explicit {
        return p.to_path_buf();
    }

    let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    find_store_dir(&cwd).unwrap_or(cwd)
}

fn find_store_dir(start: &Path) -> Option<PathBuf> {
    let mut dir = start.to_path_buf();
    loop {
        if dir.join(paths::STORE_FILE).is_file() {
            return Some(dir);
        }
        match dir.parent() {
            Some(p) => dir = p.to_path_buf(),
            None => return None,
        }
    }
}

/// Directory name used to suggest a chart name.
pub fn dir_name(root: &Path) -> String {
    root.canonicalize()
        .ok()
        .and_then(|p| p.file_name().map(|n| n.to_string_lossy().into_owned()))
        .or_else(|| root.file_name().map(|n| n.to_string_lossy().into_owned()))
        .unwrap_or_else(|| "project".to_string())
}
