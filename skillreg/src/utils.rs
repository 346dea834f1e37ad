//! Common utilities and helper functions.
//!
//! Path expansion and the recursive copy/remove helpers used when skills are
//! registered and distributed.

use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::Context;
use walkdir::WalkDir;

/// Expands a leading `~` to `home` and makes the path absolute.
///
/// Existing paths are canonicalised; missing ones are made absolute against
/// the current directory without touching the filesystem.
///
/// # Example
///
/// ```rust
/// use std::path::Path;
/// use skillreg::utils::expand_home;
///
/// let p = expand_home("~/skills", Path::new("/home/dev"));
/// assert_eq!(p, Path::new("/home/dev/skills"));
/// ```
pub fn expand_home(value: &str, home: &Path) -> PathBuf {
    let expanded = if value == "~" {
        home.to_path_buf()
    } else if let Some(rest) = value.strip_prefix("~/") {
        home.join(rest)
    } else {
        PathBuf::from(value)
    };
    absolutize(&expanded)
}

/// Absolute form of `path`, canonical when it exists.
pub fn absolutize(path: &Path) -> PathBuf {
    path.canonicalize()
        .or_else(|_| std::path::absolute(path))
        .unwrap_or_else(|_| path.to_path_buf())
}

/// Creates `path` and its parents.
pub fn ensure_dir(path: &Path) -> anyhow::Result<()> {
    fs::create_dir_all(path).with_context(|| format!("Failed to create {}", path.display()))
}

/// Replaces `dest` with a recursive copy of `src`.
///
/// # Errors
///
/// Returns an error if `src` and `dest` overlap, if `dest` cannot be removed
/// or if any entry fails to copy.
pub fn copy_dir(src: &Path, dest: &Path) -> anyhow::Result<()> {
    let (from, to) = (absolutize(src), absolutize(dest));
    if to.starts_with(&from) || from.starts_with(&to) {
        anyhow::bail!(
            "Refusing to copy {} onto {}: the paths overlap",
            src.display(),
            dest.display()
        );
    }
    remove_path(dest)?;
    for entry in WalkDir::new(src) {
        let entry = entry.with_context(|| format!("Failed to walk {}", src.display()))?;
        let rel = entry.path().strip_prefix(src)?;
        let target = dest.join(rel);
        if entry.file_type().is_dir() {
            ensure_dir(&target)?;
        } else {
            if let Some(parent) = target.parent() {
                ensure_dir(parent)?;
            }
            fs::copy(entry.path(), &target).with_context(|| {
                format!(
                    "Failed to copy {} -> {}",
                    entry.path().display(),
                    target.display()
                )
            })?;
        }
    }
    debug!("copied {} -> {}", src.display(), dest.display());
    Ok(())
}

/// Removes a file or directory tree.
///
/// Returns `false` when nothing existed at `target`.
pub fn remove_path(target: &Path) -> anyhow::Result<bool> {
    let Ok(meta) = fs::symlink_metadata(target) else {
        return Ok(false);
    };
    let removed = if meta.is_dir() {
        fs::remove_dir_all(target)
    } else {
        fs::remove_file(target)
    };
    removed.with_context(|| format!("Failed to remove {}", target.display()))?;
    Ok(true)
}
