//! Registry workflow conventions that go beyond the Agent Skills spec.

use std::{
    path::{Component, Path},
    sync::LazyLock,
};

use regex::Regex;
use serde_json::Value;

use crate::{frontmatter::{Frontmatter, field}, issue::Findings};

const ACTIVATION_MODES: [&str; 2] = ["strict", "fuzzy"];
const ACTIVATION_PRIORITIES: [&str; 2] = ["normal", "high"];

static DIGIT: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\d").expect("valid digit regex"));

/// A non-empty list whose items are all non-blank strings.
pub(crate) fn is_non_empty_string_list(value: Option<&Value>) -> bool {
    match value.and_then(Value::as_array) {
        Some(items) => {
            !items.is_empty()
                && items
                    .iter()
                    .all(|item| item.as_str().is_some_and(|s| !s.trim().is_empty()))
        }
        None => false,
    }
}

/// `triggers`, `references`, `activation` and version governance.
///
/// A malformed `references` value stops the remaining convention checks.
pub(crate) fn check_conventions(frontmatter: &Frontmatter, skill_dir: &Path, out: &mut Findings) {
    if !is_non_empty_string_list(frontmatter.get("triggers")) {
        out.error("Workflow gate: `triggers` is required and must be a non-empty list of strings.");
    }

    match frontmatter.get("references") {
        Some(refs) => {
            if !is_non_empty_string_list(Some(refs)) {
                out.error(
                    "Workflow gate: `references` is required and must be a non-empty list of relative file paths.",
                );
                return;
            }
            for entry in refs.as_array().into_iter().flatten().filter_map(Value::as_str) {
                check_reference_entry(entry, skill_dir, out);
            }
        }
        None => out.error("Workflow gate: `references` field is required in SKILL.md frontmatter."),
    }

    check_activation(frontmatter, out);
    check_version_governance(frontmatter, out);
}

fn check_reference_entry(entry: &str, skill_dir: &Path, out: &mut Findings) {
    let path = Path::new(entry);
    if path.is_absolute() {
        out.error(format!(
            "`references` entry must be relative to the skill root, got absolute path: {entry}"
        ));
        return;
    }
    if path.components().any(|c| c == Component::ParentDir) {
        out.error(format!(
            "`references` entry must not traverse outside the skill root: {entry}"
        ));
        return;
    }
    if !skill_dir.join(path).exists() {
        out.error(format!("`references` entry not found: {entry}"));
    }
}

fn check_activation(frontmatter: &Frontmatter, out: &mut Findings) {
    let Some(activation) = frontmatter.get("activation").and_then(Value::as_object) else {
        out.error(
            "Workflow gate: `activation` is required and must be a mapping with `mode`, `triggers`, and `priority`.",
        );
        return;
    };

    let mode = activation.get("mode").and_then(Value::as_str);
    if !mode.is_some_and(|m| ACTIVATION_MODES.contains(&m)) {
        out.error("Workflow gate: `activation.mode` must be `strict` or `fuzzy`.");
    }

    if !is_non_empty_string_list(activation.get("triggers")) {
        out.error("Workflow gate: `activation.triggers` must be a non-empty list of strings.");
    }

    let priority = activation.get("priority").and_then(Value::as_str);
    if !priority.is_some_and(|p| ACTIVATION_PRIORITIES.contains(&p)) {
        out.error("Workflow gate: `activation.priority` must be `normal` or `high`.");
    }
}

/// Any Unicode decimal digit.
fn has_digit(s: &str) -> bool {
    DIGIT.is_match(s)
}

fn check_version_governance(frontmatter: &Frontmatter, out: &mut Findings) {
    let metadata = field(frontmatter, "metadata").and_then(Value::as_object);
    let compatibility = field(frontmatter, "compatibility");

    let has_metadata_compat = match metadata.and_then(|m| m.get("compatibility")) {
        Some(Value::String(s)) => !s.trim().is_empty(),
        Some(Value::Object(m)) => !m.is_empty(),
        _ => false,
    };
    if compatibility.is_none() && !has_metadata_compat {
        out.error(
            "Workflow gate: version governance requires compatibility metadata (prefer top-level `compatibility`).",
        );
    }

    let pinned_in_metadata = metadata.is_some_and(|m| {
        m.iter().any(|(key, value)| {
            key.to_lowercase().contains("version")
                && value
                    .as_str()
                    .is_some_and(|v| !v.trim().is_empty() && has_digit(v))
        })
    });
    let pinned_in_compat = compatibility.and_then(Value::as_str).is_some_and(has_digit);

    if !pinned_in_metadata && !pinned_in_compat {
        out.error(
            "Workflow gate: version appears unpinned. Add at least one metadata `*version*` string (e.g., `metadata.version: \"1.0\"` or dependency version pin).",
        );
    }
}
