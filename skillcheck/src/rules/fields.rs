//! Frontmatter field rules shared by both scopes.

use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value;

use crate::issue::{Findings, Scope};

static NAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-z0-9-]{1,64}$").expect("valid name regex"));

const MAX_NAME_CHARS: usize = 64;
const MAX_DESCRIPTION_CHARS: usize = 1024;
const SHORT_DESCRIPTION_CHARS: usize = 20;

pub(crate) const MAX_COMPATIBILITY_CHARS: usize = 500;

pub(crate) fn check_name(value: Option<&Value>, parent_dir_name: &str, out: &mut Findings) {
    let Some(name) = value.and_then(Value::as_str) else {
        out.error("Frontmatter field `name` is required and must be a string.");
        return;
    };

    let len = name.chars().count();
    if len == 0 || len > MAX_NAME_CHARS {
        out.error("`name` must be 1-64 characters.");
    }
    if !NAME_RE.is_match(name) {
        out.error("`name` must contain only lowercase letters, numbers, and hyphens.");
    }
    if name.starts_with('-') || name.ends_with('-') {
        out.error("`name` must not start or end with `-`.");
    }
    if name.contains("--") {
        out.error("`name` must not contain consecutive hyphens (`--`).");
    }
    if name != parent_dir_name {
        out.error(format!(
            "`name` ({name}) must match the parent directory name ({parent_dir_name})."
        ));
    }
}

pub(crate) fn check_description(value: Option<&Value>, scope: Scope, out: &mut Findings) {
    let Some(description) = value.and_then(Value::as_str) else {
        out.error("Frontmatter field `description` is required and must be a string.");
        return;
    };

    let len = description.trim().chars().count();
    if len == 0 || len > MAX_DESCRIPTION_CHARS {
        out.error("`description` must be non-empty and at most 1024 characters.");
    } else if len < SHORT_DESCRIPTION_CHARS {
        out.warning(match scope {
            Scope::Strict => {
                "`description` is very short; Agent Skills spec recommends describing what the skill does and when to use it."
            }
            Scope::Spec => {
                "`description` is very short; include what the skill does and when to use it."
            }
        });
    }
}

/// Optional string field such as `license` or `compatibility`.
///
/// `compatibility` additionally must not be blank.
pub(crate) fn check_optional_string(
    key: &str,
    value: Option<&Value>,
    max_len: Option<usize>,
    out: &mut Findings,
) {
    let Some(value) = value else {
        return;
    };
    let Some(text) = value.as_str() else {
        out.error(format!("`{key}` must be a string if provided."));
        return;
    };

    let trimmed = text.trim();
    if key == "compatibility" && trimmed.is_empty() {
        out.error("`compatibility` must be 1-500 characters if provided.");
        return;
    }
    if let Some(max_len) = max_len
        && trimmed.chars().count() > max_len
    {
        out.error(format!("`{key}` must be at most {max_len} characters."));
    }
}

pub(crate) fn check_metadata(value: Option<&Value>, scope: Scope, out: &mut Findings) {
    let Some(value) = value else {
        return;
    };
    let Some(metadata) = value.as_object() else {
        out.error("`metadata` must be a key-value mapping if provided.");
        return;
    };

    for (key, value) in metadata {
        if value.is_string() {
            continue;
        }
        out.warning(match scope {
            Scope::Strict => format!(
                "`metadata.{key}` is structured (non-string). Agent Skills spec prefers string metadata values, but this workflow currently allows richer metadata."
            ),
            Scope::Spec => format!(
                "`metadata.{key}` is structured (non-string). Spec-oriented tooling may expect string metadata values."
            ),
        });
    }
}

pub(crate) fn check_allowed_tools(value: Option<&Value>, out: &mut Findings) {
    let Some(value) = value else {
        return;
    };
    match value.as_str() {
        None => out.error("`allowed-tools` must be a space-delimited string if provided."),
        Some(tools) if tools.trim().is_empty() => {
            out.error("`allowed-tools` must not be empty if provided.")
        }
        Some(_) => {}
    }
}
