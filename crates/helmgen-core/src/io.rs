use crate::error::{HelmgenError, Result};
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;

/// Atomically write `data` to `path` using a tempfile in the same directory.
/// Prevents partial writes from corrupting generated files.
pub fn atomic_write(path: &Path, data: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let dir = path.parent().unwrap_or(Path::new("."));
    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(data)?;
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}

/// Replace content between `start_marker` and `end_marker` (inclusive) in a file.
///
/// Returns `true` if both markers were found and the file was updated, `false`
/// if the start marker is absent (file unchanged). A start marker without a
/// matching end marker is an error.
pub fn replace_between_markers(
    path: &Path,
    start_marker: &str,
    end_marker: &str,
    replacement: &str,
) -> Result<bool> {
    if !path.exists() {
        return Ok(false);
    }
    let content = std::fs::read_to_string(path)?;
    let Some(start_pos) = content.find(start_marker) else {
        return Ok(false);
    };
    let search_from = start_pos + start_marker.len();
    let Some(end_offset) = content[search_from..].find(end_marker) else {
        return Err(HelmgenError::UnclosedMarker(start_marker.to_string()));
    };
    let end_pos = search_from + end_offset + end_marker.len();

    let mut updated = String::with_capacity(content.len());
    updated.push_str(&content[..start_pos]);
    updated.push_str(replacement);
    updated.push_str(&content[end_pos..]);

    atomic_write(path, updated.as_bytes())?;
    Ok(true)
}

/// Append text to an existing file.
///
/// Unlike a plain `O_APPEND` open this refuses to create the file: shared
/// files are owned by the base generator and a missing one means it never ran.
pub fn append_text(path: &Path, text: &str) -> Result<()> {
    if !path.is_file() {
        return Err(missing_shared_file(path));
    }
    let mut f = std::fs::OpenOptions::new().append(true).open(path)?;
    f.write_all(text.as_bytes())?;
    Ok(())
}

/// Outcome of [`upsert_marked_section`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Upsert {
    Appended,
    Replaced,
}

/// Insert `body` wrapped in `start_marker`/`end_marker` into an existing file.
///
/// A section already delimited by the same markers is replaced in place;
/// otherwise the section is appended after the existing content, separated by
/// a newline when the file does not already end with one.
pub fn upsert_marked_section(
    path: &Path,
    start_marker: &str,
    end_marker: &str,
    body: &str,
) -> Result<Upsert> {
    if !path.is_file() {
        return Err(missing_shared_file(path));
    }
    let section = format!("{start_marker}\n{body}{end_marker}");
    if replace_between_markers(path, start_marker, end_marker, &section)? {
        return Ok(Upsert::Replaced);
    }

    let existing = std::fs::read_to_string(path)?;
    let sep = if existing.is_empty() || existing.ends_with('\n') {
        ""
    } else {
        "\n"
    };
    append_text(path, &format!("{sep}{section}\n"))?;
    Ok(Upsert::Appended)
}

fn missing_shared_file(path: &Path) -> HelmgenError {
    HelmgenError::MissingSharedFile {
        file: path.display().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn atomic_write_creates_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("Chart.yaml");
        atomic_write(&path, b"name: demo").unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "name: demo");
    }

    #[test]
    fn atomic_write_creates_parents() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("templates/orders/deployment.yaml");
        atomic_write(&path, b"data").unwrap();
        assert!(path.exists());
    }

    #[test]
    fn append_text_refuses_missing_file() {
        let dir = TempDir::new().unwrap();
        let err = append_text(&dir.path().join("_helpers.tpl"), "x").unwrap_err();
        assert!(matches!(err, HelmgenError::MissingSharedFile { .. }));
        assert!(!dir.path().join("_helpers.tpl").exists());
    }

    #[test]
    fn upsert_appends_then_replaces() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("values.yaml");
        std::fs::write(&path, "replicaCount: 1").unwrap();

        let first = upsert_marked_section(&path, "# <a>", "# </a>", "a: 1\n").unwrap();
        assert_eq!(first, Upsert::Appended);
        let second = upsert_marked_section(&path, "# <a>", "# </a>", "a: 2\n").unwrap();
        assert_eq!(second, Upsert::Replaced);

        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content, "replicaCount: 1\n# <a>\na: 2\n# </a>\n");
    }

    #[test]
    fn upsert_keeps_unrelated_sections() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("values.yaml");
        std::fs::write(&path, "").unwrap();

        upsert_marked_section(&path, "# <a>", "# </a>", "a: 1\n").unwrap();
        upsert_marked_section(&path, "# <b>", "# </b>", "b: 1\n").unwrap();
        upsert_marked_section(&path, "# <a>", "# </a>", "a: 3\n").unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content, "# <a>\na: 3\n# </a>\n# <b>\nb: 1\n# </b>\n");
    }

    #[test]
    fn upsert_rejects_unclosed_marker() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("values.yaml");
        std::fs::write(&path, "# <a>\na: 1\n").unwrap();
        let err = upsert_marked_section(&path, "# <a>", "# </a>", "a: 2\n").unwrap_err();
        assert!(matches!(err, HelmgenError::UnclosedMarker(_)));
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "# <a>\na: 1\n");
    }
}
