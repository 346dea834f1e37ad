//! The skill folder verification pipeline.
//!
//! [`Verifier::verify`] never fails. Unreadable folders, missing manifests and
//! malformed frontmatter are recorded as findings in both scopes and end the
//! pipeline early; every other rule runs to completion so that a single pass
//! reports everything that needs fixing.

use std::path::{Path, PathBuf};

use serde_json::Value;

use crate::{
    error::{CheckError, Result},
    frontmatter::{Frontmatter, field, parse_frontmatter, split_frontmatter},
    issue::{Findings, Scope},
    report::VerificationReport,
    rules::{
        fields::{self, MAX_COMPATIBILITY_CHARS},
        guidance, layout, references, workflow,
    },
};

/// Minimum strict grade required for the strict gate.
pub const DEFAULT_STRICT_THRESHOLD: u8 = 80;

/// SKILL.md length above which a strict warning is raised.
const MAX_SKILL_MD_LINES: usize = 500;

const EMPTY_BODY: &str = "SKILL.md has no Markdown body after frontmatter.";

/// Configurable verifier.
#[derive(Debug, Clone, Copy)]
pub struct Verifier {
    strict_threshold: u8,
}

impl Default for Verifier {
    fn default() -> Self {
        Self {
            strict_threshold: DEFAULT_STRICT_THRESHOLD,
        }
    }
}

impl Verifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the strict gate threshold (clamped to 100).
    pub fn with_strict_threshold(mut self, threshold: u8) -> Self {
        self.strict_threshold = threshold.min(100);
        self
    }

    pub fn strict_threshold(&self) -> u8 {
        self.strict_threshold
    }

    /// Verifies one skill folder.
    pub fn verify(&self, skill_dir: impl AsRef<Path>) -> VerificationReport {
        let skill_dir = absolute(skill_dir.as_ref());
        debug!("verifying {}", skill_dir.display());

        let mut report = VerificationReport::new(skill_dir);
        report.strict_threshold = self.strict_threshold;
        run(&mut report);
        report.finalize();
        report
    }
}

/// Verifies a skill folder with the default threshold.
pub fn verify_skill_dir(skill_dir: impl AsRef<Path>) -> VerificationReport {
    Verifier::default().verify(skill_dir)
}

/// Verifies a skill folder and fails when it does not pass the spec gate.
///
/// # Errors
///
/// Returns [`CheckError::Invalid`] carrying the full report.
pub fn ensure_valid(skill_dir: impl AsRef<Path>) -> Result<VerificationReport> {
    let report = verify_skill_dir(skill_dir);
    if report.is_valid() {
        Ok(report)
    } else {
        Err(CheckError::Invalid(Box::new(report)))
    }
}

fn absolute(path: &Path) -> PathBuf {
    path.canonicalize()
        .or_else(|_| std::path::absolute(path))
        .unwrap_or_else(|_| path.to_path_buf())
}

fn run(report: &mut VerificationReport) {
    let skill_dir = report.skill_dir.clone();

    if !skill_dir.is_dir() {
        report.fatal(format!("Skill path is not a directory: {}", skill_dir.display()));
        return;
    }
    if !report.skill_md_path.exists() {
        report.fatal(format!("Missing required file: {}", crate::SKILL_MD));
        return;
    }

    layout::check_optional_dirs(&skill_dir, &mut report.strict);
    layout::check_top_level_layout(&skill_dir, &mut report.strict);

    let text = match std::fs::read(&report.skill_md_path) {
        Ok(bytes) => match String::from_utf8(bytes) {
            Ok(text) => text,
            Err(_) => {
                report.fatal("SKILL.md must be UTF-8 decodable text.");
                return;
            }
        },
        Err(e) => {
            report.fatal(format!("Unable to read SKILL.md: {e}"));
            return;
        }
    };

    let Some((frontmatter_text, body)) = split_frontmatter(&text) else {
        report.fatal("SKILL.md must start with YAML frontmatter delimited by `---`.");
        return;
    };
    report.body = Some(body);
    layout::check_yaml_safety(&frontmatter_text, &mut report.strict);

    let parsed = match parse_frontmatter(&frontmatter_text) {
        Ok(parsed) => parsed,
        Err(e) => {
            report.fatal(format!("Invalid YAML frontmatter in SKILL.md: {e}"));
            return;
        }
    };
    let Some(Value::Object(frontmatter)) = parsed else {
        report.fatal("SKILL.md frontmatter must be a YAML mapping/object.");
        return;
    };

    let dir_name = skill_dir
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();

    check_fields(&frontmatter, &dir_name, Scope::Strict, &mut report.strict);
    workflow::check_conventions(&frontmatter, &skill_dir, &mut report.strict);
    references::check_reference_tree(&skill_dir, &frontmatter, &mut report.strict);

    check_fields(&frontmatter, &dir_name, Scope::Spec, &mut report.spec);
    let body_blank = report.body.as_deref().is_none_or(|b| b.trim().is_empty());
    if body_blank {
        report.spec.warning(EMPTY_BODY);
        report.strict.warning(EMPTY_BODY);
    }

    let skill_md_lines = text.lines().count();
    if skill_md_lines > MAX_SKILL_MD_LINES {
        report.strict.warning(format!(
            "SKILL.md has {skill_md_lines} lines; Agent Skills recommends keeping it under 500 lines."
        ));
    }

    let reference_lines = references::total_reference_lines(&skill_dir);
    guidance::check_brain_only(
        &text,
        (reference_lines > 0).then_some(reference_lines),
        &mut report.strict,
    );

    report.frontmatter = Some(frontmatter);
}

fn check_fields(frontmatter: &Frontmatter, dir_name: &str, scope: Scope, out: &mut Findings) {
    fields::check_name(field(frontmatter, "name"), dir_name, out);
    fields::check_description(field(frontmatter, "description"), scope, out);
    fields::check_optional_string("license", field(frontmatter, "license"), None, out);
    fields::check_optional_string(
        "compatibility",
        field(frontmatter, "compatibility"),
        Some(MAX_COMPATIBILITY_CHARS),
        out,
    );
    fields::check_metadata(field(frontmatter, "metadata"), scope, out);
    fields::check_allowed_tools(field(frontmatter, "allowed-tools"), out);
}
