//! # skillcheck
//!
//! Verification engine for agent skill folders.
//!
//! A skill is a directory holding a `SKILL.md` file (markdown with YAML
//! frontmatter) and optional `references/`, `scripts/`, `assets/` and
//! `agents/` folders. `skillcheck` grades such a folder twice:
//!
//! - **spec** – the portable Agent Skills checks (`name`, `description`,
//!   optional fields, markdown body).
//! - **strict** – the registry workflow gate (activation semantics, version
//!   pinning, reference taxonomy, "brain only" SKILL.md).
//!
//! It also ships a small line-oriented scanner for Go anti-patterns used when
//! reviewing the code samples that skill references point at.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use skillcheck::verify_skill_dir;
//!
//! let report = verify_skill_dir("skills/echo-web");
//! println!("{report}");
//! assert!(report.spec_passed);
//! ```
//!
//! ## Modules
//!
//! - [`frontmatter`] - SKILL.md frontmatter splitting and parsing
//! - [`issue`] - Findings collected per verification scope
//! - [`report`] - Verification report, grades and serialisable payload
//! - [`verify`] - The verification pipeline
//! - [`scan`] - Go anti-pattern scanner

#[macro_use]
extern crate log;

/// Error types for verification and scanning.
pub mod error;

/// SKILL.md frontmatter splitting and YAML parsing.
pub mod frontmatter;

/// Severity-tagged findings grouped per verification scope.
pub mod issue;

/// Verification report, grade computation and output payload.
pub mod report;

/// Go anti-pattern scanner.
pub mod scan;

/// The skill folder verification pipeline.
pub mod verify;

mod rules;

pub use error::{CheckError, Result};
pub use issue::{Findings, Issue, Scope, Severity};
pub use report::{ReportPayload, VerificationReport};
pub use scan::{AntiPattern, ScanFinding, ScanReport, Scanner};
pub use verify::{DEFAULT_STRICT_THRESHOLD, Verifier, ensure_valid, verify_skill_dir};

/// File name of the skill manifest every skill folder must contain.
pub const SKILL_MD: &str = "SKILL.md";
