//! `references/` taxonomy, size limits and fragmentation guard.

use std::path::{Component, Path, PathBuf};

use serde_json::Value;
use walkdir::WalkDir;

use super::{REFERENCE_TAXONOMY, line_count, posix, workflow::is_non_empty_string_list};
use crate::{frontmatter::Frontmatter, issue::Findings};

const MAX_REFERENCE_LINES: usize = 800;
const MICRO_FILE_LINES: usize = 100;
const FRAGMENTATION_MIN_FILES: usize = 5;

enum Content {
    Text(String),
    NotUtf8,
    Unreadable(std::io::Error),
}

fn read_content(path: &Path) -> Content {
    match std::fs::read(path) {
        Ok(bytes) => match String::from_utf8(bytes) {
            Ok(text) => Content::Text(text),
            Err(_) => Content::NotUtf8,
        },
        Err(e) => Content::Unreadable(e),
    }
}

/// All regular files below `dir` (symlinks followed), sorted by path.
fn files_below(dir: &Path) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = WalkDir::new(dir)
        .follow_links(true)
        .into_iter()
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(e) => {
                warn!("skipping unreadable entry below {}: {e}", dir.display());
                None
            }
        })
        .filter(|entry| entry.file_type().is_file())
        .map(|entry| entry.into_path())
        .collect();
    files.sort();
    files
}

fn is_markdown(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("md"))
}

fn allowed_categories() -> String {
    REFERENCE_TAXONOMY.join(", ")
}

pub(crate) fn check_reference_tree(skill_dir: &Path, frontmatter: &Frontmatter, out: &mut Findings) {
    let references_dir = skill_dir.join("references");
    let listed = frontmatter.get("references");

    if is_non_empty_string_list(listed) && !references_dir.exists() {
        out.error("Workflow gate: `references` field is present but `references/` directory is missing.");
        return;
    }
    if !references_dir.exists() {
        return;
    }
    if !references_dir.is_dir() {
        out.error("`references` must be a directory when present.");
        return;
    }

    let markdown: Vec<PathBuf> = files_below(&references_dir)
        .into_iter()
        .filter(|p| is_markdown(p))
        .collect();

    let mut micro_files = 0usize;
    for file in &markdown {
        let rel = file.strip_prefix(skill_dir).unwrap_or(file);
        let rel_text = posix(rel);
        let parts: Vec<_> = rel.components().collect();

        let content = read_content(file);
        if let Content::Text(text) = &content
            && line_count(text) < MICRO_FILE_LINES
        {
            micro_files += 1;
        }

        if parts.len() < 3 {
            out.error(format!(
                "Workflow gate: reference file must be under taxonomy folder `references/<category>/...`, got `{rel_text}`."
            ));
            continue;
        }
        let category = parts[1].as_os_str().to_string_lossy();
        if !REFERENCE_TAXONOMY.contains(&category.as_ref()) {
            out.error(format!(
                "Workflow gate: invalid reference category `{category}` in `{rel_text}`. Allowed: {}.",
                allowed_categories()
            ));
        }

        check_content(&rel_text, content, out);
    }

    if let Some(entries) = listed.and_then(Value::as_array) {
        for entry in entries.iter().filter_map(Value::as_str) {
            if entry.trim().is_empty() {
                continue;
            }
            check_listed_entry(skill_dir, entry, out);
        }
    }

    if markdown.len() >= FRAGMENTATION_MIN_FILES && micro_files >= (markdown.len() / 2).max(3) {
        out.warning(
            "Workflow gate: many reference files are under 100 lines. Check fragmentation guard and merge semantically related files where possible.",
        );
    }
}

fn check_content(rel_text: &str, content: Content, out: &mut Findings) {
    match content {
        Content::Text(text) => {
            let lines = line_count(&text);
            if lines > MAX_REFERENCE_LINES {
                out.error(format!(
                    "Workflow gate: reference file exceeds 800 lines ({lines}): `{rel_text}`."
                ));
            }
        }
        Content::NotUtf8 => {
            out.error(format!("Reference file must be UTF-8 decodable: `{rel_text}`"));
        }
        Content::Unreadable(e) => {
            out.error(format!("Unable to read reference file `{rel_text}`: {e}"));
        }
    }
}

fn check_listed_entry(skill_dir: &Path, entry: &str, out: &mut Findings) {
    let path = Path::new(entry);
    if !skill_dir.join(path).is_file() {
        return;
    }
    let parts: Vec<String> = path
        .components()
        .filter(|c| !matches!(c, Component::CurDir))
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect();
    if parts.len() < 3 || parts[0] != "references" {
        out.error(format!(
            "Workflow gate: `references` entries must use taxonomy paths under `references/<category>/...`, got `{entry}`."
        ));
    } else if !REFERENCE_TAXONOMY.contains(&parts[1].as_str()) {
        out.error(format!(
            "Workflow gate: `references` entry category `{}` is not allowed: `{entry}`.",
            parts[1]
        ));
    }
}

/// Total line count of decodable `*.md` files below `references/`.
pub(crate) fn total_reference_lines(skill_dir: &Path) -> usize {
    let references_dir = skill_dir.join("references");
    if !references_dir.is_dir() {
        return 0;
    }
    files_below(&references_dir)
        .iter()
        .filter(|p| p.extension().is_some_and(|e| e == "md"))
        .filter_map(|p| match read_content(p) {
            Content::Text(text) => Some(line_count(&text)),
            _ => None,
        })
        .sum()
}
