//! Verification report and grading.

use std::{fmt, path::PathBuf};

use serde::Serialize;

use crate::{
    frontmatter::Frontmatter,
    issue::{Findings, Issue, Scope},
    verify::DEFAULT_STRICT_THRESHOLD,
};

const SPEC_ERROR_WEIGHT: i64 = 25;
const SPEC_WARNING_WEIGHT: i64 = 4;
const STRICT_ERROR_WEIGHT: i64 = 15;
const STRICT_WARNING_WEIGHT: i64 = 3;

/// Outcome of verifying one skill folder.
#[derive(Debug, Clone)]
pub struct VerificationReport {
    /// Absolute skill folder path.
    pub skill_dir: PathBuf,
    /// Path of the folder's `SKILL.md`.
    pub skill_md_path: PathBuf,
    /// Workflow gate findings.
    pub strict: Findings,
    /// Portable Agent Skills findings.
    pub spec: Findings,
    /// Parsed frontmatter, when it was a mapping.
    pub frontmatter: Option<Frontmatter>,
    /// Markdown body after the frontmatter.
    pub body: Option<String>,
    pub spec_grade: u8,
    pub strict_grade: u8,
    pub spec_passed: bool,
    pub strict_passed: bool,
    pub strict_threshold: u8,
}

impl VerificationReport {
    pub(crate) fn new(skill_dir: PathBuf) -> Self {
        let skill_md_path = skill_dir.join(crate::SKILL_MD);
        Self {
            skill_dir,
            skill_md_path,
            strict: Findings::default(),
            spec: Findings::default(),
            frontmatter: None,
            body: None,
            spec_grade: 0,
            strict_grade: 0,
            spec_passed: false,
            strict_passed: false,
            strict_threshold: DEFAULT_STRICT_THRESHOLD,
        }
    }

    /// Records an error in both scopes.
    pub(crate) fn fatal(&mut self, message: impl Into<String>) {
        let message = message.into();
        self.strict.error(message.clone());
        self.spec.error(message);
    }

    /// Findings of one scope.
    pub fn findings(&self, scope: Scope) -> &Findings {
        match scope {
            Scope::Spec => &self.spec,
            Scope::Strict => &self.strict,
        }
    }

    /// The folder passes the spec gate; this is what registration requires.
    pub fn is_valid(&self) -> bool {
        self.spec_passed
    }

    /// The frontmatter `name`, when it is a string.
    pub fn frontmatter_name(&self) -> Option<&str> {
        self.frontmatter.as_ref()?.get("name")?.as_str()
    }

    /// Errors of both scopes, spec first, de-duplicated by message.
    pub fn merged_errors(&self) -> Vec<&Issue> {
        let mut seen = std::collections::HashSet::new();
        self.spec
            .errors()
            .chain(self.strict.errors())
            .filter(|issue| seen.insert(issue.message.as_str()))
            .collect()
    }

    pub(crate) fn finalize(&mut self) {
        self.spec_grade = calc_grade(
            self.spec.error_count(),
            self.spec.warning_count(),
            SPEC_ERROR_WEIGHT,
            SPEC_WARNING_WEIGHT,
        );
        self.strict_grade = calc_grade(
            self.strict.error_count(),
            self.strict.warning_count(),
            STRICT_ERROR_WEIGHT,
            STRICT_WARNING_WEIGHT,
        );
        self.spec_passed = self.spec.error_count() == 0;
        self.strict_passed = self.spec_passed && self.strict_grade >= self.strict_threshold;
        debug!(
            "graded {}: spec={} strict={} (threshold {})",
            self.skill_dir.display(),
            self.spec_grade,
            self.strict_grade,
            self.strict_threshold
        );
    }

    /// Builds the serialisable summary of this report.
    ///
    /// Individual messages are only included when `verbose` is set.
    pub fn payload(&self, verbose: bool) -> ReportPayload {
        let messages = |findings: &Findings| ScopeFindings {
            errors: findings.errors().map(|i| i.message.clone()).collect(),
            warnings: findings.warnings().map(|i| i.message.clone()).collect(),
        };
        ReportPayload {
            skill_dir: self.skill_dir.display().to_string(),
            grades: Grades {
                spec: Grade {
                    score: self.spec_grade,
                    status: status_text(self.spec_passed),
                },
                strict: StrictGrade {
                    score: self.strict_grade,
                    status: status_text(self.strict_passed),
                    threshold: self.strict_threshold,
                },
            },
            counts: Counts {
                spec: ScopeCounts::of(&self.spec),
                strict: ScopeCounts::of(&self.strict),
            },
            findings: verbose.then(|| AllFindings {
                spec: messages(&self.spec),
                strict: messages(&self.strict),
            }),
        }
    }
}

impl fmt::Display for VerificationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "[verify] {}", self.skill_dir.display())?;
        writeln!(
            f,
            "[verify] SPEC  grade={}/100 status={}",
            self.spec_grade,
            status_text(self.spec_passed)
        )?;
        write!(
            f,
            "[verify] STRICT grade={}/100 status={} threshold={}",
            self.strict_grade,
            status_text(self.strict_passed),
            self.strict_threshold
        )?;

        for (title, scope) in [("Spec Findings", Scope::Spec), ("Strict Findings", Scope::Strict)] {
            let findings = self.findings(scope);
            if findings.is_empty() {
                continue;
            }
            write!(f, "\n[verify] {title}")?;
            for issue in findings.errors() {
                write!(f, "\n  {} ERROR: {}", scope.label(), issue.message)?;
            }
            for issue in findings.warnings() {
                write!(f, "\n  {} WARN: {}", scope.label(), issue.message)?;
            }
        }
        Ok(())
    }
}

/// `PASS` or `FAIL`.
pub fn status_text(passed: bool) -> &'static str {
    if passed { "PASS" } else { "FAIL" }
}

fn calc_grade(errors: usize, warnings: usize, error_weight: i64, warning_weight: i64) -> u8 {
    let score = 100 - errors as i64 * error_weight - warnings as i64 * warning_weight;
    score.clamp(0, 100) as u8
}

/// Serialisable report summary (the `--output json` document).
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ReportPayload {
    pub skill_dir: String,
    pub grades: Grades,
    pub counts: Counts,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub findings: Option<AllFindings>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Grades {
    pub spec: Grade,
    pub strict: StrictGrade,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Grade {
    pub score: u8,
    pub status: &'static str,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct StrictGrade {
    pub score: u8,
    pub status: &'static str,
    pub threshold: u8,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Counts {
    pub spec: ScopeCounts,
    pub strict: ScopeCounts,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ScopeCounts {
    pub errors: usize,
    pub warnings: usize,
}

impl ScopeCounts {
    fn of(findings: &Findings) -> Self {
        Self {
            errors: findings.error_count(),
            warnings: findings.warning_count(),
        }
    }

    /// No errors and no warnings.
    pub fn is_clean(&self) -> bool {
        self.errors == 0 && self.warnings == 0
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct AllFindings {
    pub spec: ScopeFindings,
    pub strict: ScopeFindings,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ScopeFindings {
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}
