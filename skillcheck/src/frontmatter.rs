//! SKILL.md frontmatter handling.
//!
//! A SKILL.md document starts with a `---` line, followed by YAML, followed by
//! another `---` line. Everything after the closing delimiter is the markdown
//! body.
//!
//! ```text
//! ---
//! name: echo-web
//! description: Conventions for Echo HTTP handlers.
//! ---
//!
//! # Echo Web
//! ```

use serde_json::{Map, Value};

/// Parsed frontmatter mapping.
///
/// YAML is decoded into a JSON value tree so that the rule checks can
/// inspect loosely-typed fields (`name: 123`, `metadata: [..]`) without
/// failing deserialisation up front.
pub type Frontmatter = Map<String, Value>;

/// Splits a SKILL.md document into `(frontmatter, body)`.
///
/// Returns `None` when the first line is not `---` or when no closing `---`
/// line follows. Delimiter lines are compared after trimming.
pub fn split_frontmatter(text: &str) -> Option<(String, String)> {
    let lines: Vec<&str> = text.lines().collect();
    if lines.first()?.trim() != "---" {
        return None;
    }
    let end = lines.iter().skip(1).position(|line| line.trim() == "---")? + 1;
    let frontmatter = lines[1..end].join("\n");
    let body = lines[end + 1..].join("\n");
    Some((frontmatter, body))
}

/// Parses frontmatter YAML into a value tree.
///
/// Blank input yields `Ok(None)`.
///
/// # Errors
///
/// Returns the YAML error when the text is not valid YAML.
pub fn parse_frontmatter(text: &str) -> Result<Option<Value>, serde_yaml_bw::Error> {
    if text.trim().is_empty() {
        return Ok(None);
    }
    serde_yaml_bw::from_str::<Value>(text).map(Some)
}

/// Looks up `key`, treating an explicit YAML `null` as absent.
pub(crate) fn field<'a>(frontmatter: &'a Frontmatter, key: &str) -> Option<&'a Value> {
    frontmatter.get(key).filter(|v| !v.is_null())
}
