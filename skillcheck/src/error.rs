use std::path::PathBuf;

use thiserror::Error;

use crate::report::VerificationReport;

/// Errors raised by the verification and scanning APIs.
///
/// Note that [`crate::verify_skill_dir`] itself never fails: problems with a
/// skill folder are recorded as findings in the report. Errors are reserved
/// for callers that want a hard failure ([`crate::ensure_valid`]) and for the
/// anti-pattern scanner, which aborts when the tree cannot be walked.
#[derive(Debug, Error)]
pub enum CheckError {
    /// The skill folder failed the spec gate.
    #[error("{0}")]
    Invalid(Box<VerificationReport>),

    /// The scan target is missing or not a directory.
    #[error("scan target is not a directory: {}", .0.display())]
    NotADirectory(PathBuf),

    /// Walking a directory tree failed.
    #[error("failed to walk {}: {source}", path.display())]
    Walk {
        path: PathBuf,
        #[source]
        source: walkdir::Error,
    },
}

/// Result alias for this crate.
pub type Result<T> = std::result::Result<T, CheckError>;
