//! Folder layout and raw frontmatter text rules.

use std::{path::Path, sync::LazyLock};

use regex::Regex;

use crate::issue::Findings;

/// Optional subdirectories defined by the Agent Skills layout.
const OPTIONAL_DIRS: [&str; 3] = ["scripts", "references", "assets"];

/// Entries the workflow accepts at the skill root.
const ALLOWED_TOP_LEVEL: [&str; 5] = ["SKILL.md", "references", "scripts", "assets", "agents"];

static UNQUOTED_AT_ITEM: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*-\s+@").expect("valid list item regex"));

pub(crate) fn check_optional_dirs(skill_dir: &Path, out: &mut Findings) {
    for name in OPTIONAL_DIRS {
        let path = skill_dir.join(name);
        if path.exists() && !path.is_dir() {
            out.error(format!("`{name}` exists but is not a directory."));
        }
    }
}

pub(crate) fn check_top_level_layout(skill_dir: &Path, out: &mut Findings) {
    let entries = match std::fs::read_dir(skill_dir) {
        Ok(entries) => entries,
        Err(e) => {
            warn!("cannot list {}: {e}", skill_dir.display());
            return;
        }
    };
    let mut children: Vec<_> = entries.flatten().map(|e| e.path()).collect();
    children.sort();

    for child in children {
        let Some(name) = child.file_name().map(|n| n.to_string_lossy().into_owned()) else {
            continue;
        };
        if name == ".DS_Store" || ALLOWED_TOP_LEVEL.contains(&name.as_str()) {
            continue;
        }
        if child.is_dir() {
            out.warning(format!(
                "Unexpected top-level directory `{name}`. Workflow convention expects SKILL.md plus optional scripts/references/assets/agents."
            ));
        } else {
            out.warning(format!(
                "Unexpected top-level file `{name}`. Workflow convention prefers only `SKILL.md` at skill root."
            ));
        }
    }
}

/// YAML list items starting with an unquoted `@` are reserved indicators and
/// break some parsers (`- @scope/pkg`); they must be quoted.
pub(crate) fn check_yaml_safety(frontmatter_text: &str, out: &mut Findings) {
    for line in frontmatter_text.lines() {
        if UNQUOTED_AT_ITEM.is_match(line) {
            out.error(
                "YAML frontmatter safety rule violated: quote trigger/scalar values starting with `@` (use `- \"@pkg/name\"`).",
            );
        }
    }
}
