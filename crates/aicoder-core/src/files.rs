//! Output paths and file I/O

use crate::error::{CoderError, CoderResult};
use std::path::{Component, Path, PathBuf};

/// Output path for a template
///
/// The template's first directory is dropped and the rest is rooted at
/// `project_root`: `prompts/src/my_code.py` becomes
/// `<project_root>/src/my_code.py`. Leading `.` and `/` are ignored.
///
/// # Errors
/// [`CoderError::InvalidPath`] when nothing is left after dropping the
/// first directory, or the path climbs with `..`.
pub fn output_path(project_root: &Path, template: &Path) -> CoderResult<PathBuf> {
    let mut parts = Vec::new();
    for component in template.components() {
        match component {
            Component::Normal(part) => parts.push(part),
            Component::CurDir | Component::RootDir | Component::Prefix(_) => {}
            Component::ParentDir => {
                return Err(CoderError::invalid_path(template, "`..` is not allowed"));
            }
        }
    }

    if parts.len() < 2 {
        return Err(CoderError::invalid_path(
            template,
            "expected a leading template directory followed by a file",
        ));
    }

    Ok(parts[1..].iter().fold(project_root.to_path_buf(), |path, part| path.join(part)))
}

/// Template path relative to `project_root`, and the file to read it from
///
/// Relative templates are taken as relative to `project_root`. Absolute
/// templates under `project_root` are made relative to it; other absolute
/// paths are kept as they are.
#[must_use]
pub fn locate_template(project_root: &Path, template: &Path) -> (PathBuf, PathBuf) {
    if template.is_absolute() {
        let relative = template
            .strip_prefix(project_root)
            .map_or_else(|_| template.to_path_buf(), Path::to_path_buf);
        (relative, template.to_path_buf())
    } else {
        (template.to_path_buf(), project_root.join(template))
    }
}

/// Read a UTF-8 source file
///
/// # Errors
/// [`CoderError::Io`] naming the path.
pub async fn read_source(path: &Path) -> CoderResult<String> {
    tokio::fs::read_to_string(path)
        .await
        .map_err(|e| CoderError::io_error(path, e))
}

/// Read a source file if it exists and is not blank
///
/// # Errors
/// [`CoderError::Io`] for failures other than the file being absent.
pub async fn read_existing(path: &Path) -> CoderResult<Option<String>> {
    match tokio::fs::read_to_string(path).await {
        Ok(text) if text.trim().is_empty() => Ok(None),
        Ok(text) => Ok(Some(text)),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(CoderError::io_error(path, e)),
    }
}

/// Write a source file, creating parent directories
///
/// # Errors
/// [`CoderError::Io`] naming the path.
pub async fn write_source(path: &Path, contents: &str) -> CoderResult<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent)
            .await
            .map_err(|e| CoderError::io_error(parent, e))?;
    }
    tokio::fs::write(path, contents)
        .await
        .map_err(|e| CoderError::io_error(path, e))
}
