//! Go anti-pattern scanner.
//!
//! A line-oriented pattern matcher over `*.go` files. It does not parse Go:
//! it reports lines that look like common anti-patterns so a reviewer can
//! look at them. False positives and negatives are expected.
//!
//! Every `*.go` file is scanned, test files included. Hidden directories and
//! `vendor/` are skipped. Files that are not valid UTF-8 are read lossily and
//! unreadable files are skipped with a warning.

use std::{
    fmt,
    path::{Path, PathBuf},
};

use walkdir::{DirEntry, WalkDir};

use crate::error::{CheckError, Result};

mod patterns;

pub use patterns::MAX_INTERFACE_METHODS;

/// Kinds of anti-patterns the scanner reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AntiPattern {
    /// Package-level variable holding shared state (DB handles, clients, mutexes, maps).
    GlobalState,
    /// `func init()`.
    InitFunction,
    /// An error discarded into the blank identifier.
    DiscardedError,
    /// A `panic(` call.
    Panic,
    /// A goroutine launched without a context argument.
    GoroutineWithoutContext,
    /// An interface with more than [`MAX_INTERFACE_METHODS`] methods.
    FatInterface,
}

impl AntiPattern {
    pub const ALL: [AntiPattern; 6] = [
        AntiPattern::GlobalState,
        AntiPattern::InitFunction,
        AntiPattern::DiscardedError,
        AntiPattern::Panic,
        AntiPattern::GoroutineWithoutContext,
        AntiPattern::FatInterface,
    ];

    /// Short identifier.
    pub fn label(self) -> &'static str {
        match self {
            AntiPattern::GlobalState => "global-state",
            AntiPattern::InitFunction => "init-function",
            AntiPattern::DiscardedError => "discarded-error",
            AntiPattern::Panic => "panic",
            AntiPattern::GoroutineWithoutContext => "goroutine-without-context",
            AntiPattern::FatInterface => "fat-interface",
        }
    }

    /// Human-readable warning.
    pub fn message(self) -> &'static str {
        match self {
            AntiPattern::GlobalState => "package-level mutable state; inject dependencies instead",
            AntiPattern::InitFunction => "init() hides side effects; initialise explicitly",
            AntiPattern::DiscardedError => "error discarded with the blank identifier",
            AntiPattern::Panic => "panic in library code; return an error",
            AntiPattern::GoroutineWithoutContext => {
                "goroutine launched without a context; it cannot be cancelled"
            }
            AntiPattern::FatInterface => "interface has more than 5 methods; split it",
        }
    }
}

impl fmt::Display for AntiPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One reported line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanFinding {
    pub path: PathBuf,
    /// 1-based line number.
    pub line: usize,
    pub kind: AntiPattern,
    /// The offending source line, trimmed.
    pub snippet: String,
}

impl fmt::Display for ScanFinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}: [{}] {}",
            self.path.display(),
            self.line,
            self.kind,
            self.kind.message()
        )
    }
}

/// Result of scanning a directory tree.
#[derive(Debug, Clone, Default)]
pub struct ScanReport {
    pub root: PathBuf,
    pub files_scanned: usize,
    pub findings: Vec<ScanFinding>,
}

impl ScanReport {
    pub fn is_clean(&self) -> bool {
        self.findings.is_empty()
    }

    /// Number of findings of `kind`.
    pub fn count(&self, kind: AntiPattern) -> usize {
        self.findings.iter().filter(|f| f.kind == kind).count()
    }
}

/// Walks a directory and scans every Go source file.
#[derive(Debug, Clone, Default)]
pub struct Scanner {
    skip_tests: bool,
}

impl Scanner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Leave `*_test.go` files out.
    pub fn skip_tests(mut self, skip: bool) -> Self {
        self.skip_tests = skip;
        self
    }

    /// Scans `root` recursively.
    ///
    /// # Errors
    ///
    /// Fails when `root` is not a directory or the tree cannot be walked.
    pub fn scan(&self, root: impl AsRef<Path>) -> Result<ScanReport> {
        let root = root.as_ref();
        if !root.is_dir() {
            return Err(CheckError::NotADirectory(root.to_path_buf()));
        }

        let mut report = ScanReport {
            root: root.to_path_buf(),
            ..Default::default()
        };

        let walker = WalkDir::new(root)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|e| e.depth() == 0 || !is_skipped_dir(e));

        for entry in walker {
            let entry = entry.map_err(|source| CheckError::Walk {
                path: root.to_path_buf(),
                source,
            })?;
            if !entry.file_type().is_file() || !self.wants(entry.path()) {
                continue;
            }
            let bytes = match std::fs::read(entry.path()) {
                Ok(bytes) => bytes,
                Err(e) => {
                    warn!("skipping unreadable {}: {e}", entry.path().display());
                    continue;
                }
            };
            let text = String::from_utf8_lossy(&bytes);
            report.files_scanned += 1;
            report.findings.extend(scan_source(entry.path(), &text));
        }

        debug!(
            "scanned {} go files under {}, {} findings",
            report.files_scanned,
            root.display(),
            report.findings.len()
        );
        Ok(report)
    }

    fn wants(&self, path: &Path) -> bool {
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            return false;
        };
        name.ends_with(".go") && !(self.skip_tests && name.ends_with("_test.go"))
    }
}

fn is_skipped_dir(entry: &DirEntry) -> bool {
    entry.file_type().is_dir()
        && entry
            .file_name()
            .to_str()
            .is_some_and(|n| n.starts_with('.') || n == "vendor")
}

struct OpenInterface {
    line: usize,
    snippet: String,
    methods: usize,
}

/// Scans one Go source text. `path` is only used to label findings.
pub fn scan_source(path: &Path, text: &str) -> Vec<ScanFinding> {
    let mut findings = Vec::new();
    let mut open: Option<OpenInterface> = None;

    let finding = |line: usize, kind: AntiPattern, snippet: &str| ScanFinding {
        path: path.to_path_buf(),
        line,
        kind,
        snippet: snippet.trim().to_string(),
    };

    for (idx, raw) in text.lines().enumerate() {
        let number = idx + 1;
        let code = patterns::strip_line_comment(raw);
        if code.trim().is_empty() {
            continue;
        }

        if let Some(iface) = open.as_mut() {
            if code.trim() == "}" {
                if iface.methods > MAX_INTERFACE_METHODS {
                    findings.push(finding(iface.line, AntiPattern::FatInterface, &iface.snippet));
                }
                open = None;
            } else if patterns::is_interface_method(code) {
                iface.methods += 1;
            }
            continue;
        }

        if patterns::interface_start(code).is_some() {
            open = Some(OpenInterface {
                line: number,
                snippet: raw.to_string(),
                methods: 0,
            });
            continue;
        }

        for kind in patterns::match_line(code) {
            findings.push(finding(number, kind, raw));
        }
    }

    findings
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::TempDir;

    use super::*;

    const HANDLER_GO: &str = r#"package handler

import (
	"database/sql"
	"os"
)

var db *sql.DB

func init() {
	db, _ = sql.Open("postgres", os.Getenv("DSN"))
}

type Repository interface {
	Get(id string) (*User, error)
	List() ([]*User, error)
	Create(u *User) error
	Update(u *User) error
	Delete(id string) error
	Count() (int, error)
}

type Reader interface {
	Read(p []byte) (int, error)
}

func Handle(ctx context.Context) {
	go func() { // background refresh
		refresh()
	}()
	go sync(ctx)
	if db == nil {
		panic("no db")
	}
}
"#;

    #[test]
    fn finds_each_kind() {
        let findings = scan_source(Path::new("handler.go"), HANDLER_GO);
        let summary: Vec<_> = findings.iter().map(|f| (f.line, f.kind)).collect();
        assert_eq!(
            summary,
            [
                (8, AntiPattern::GlobalState),
                (10, AntiPattern::InitFunction),
                (11, AntiPattern::DiscardedError),
                (14, AntiPattern::FatInterface),
                (28, AntiPattern::GoroutineWithoutContext),
                (33, AntiPattern::Panic),
            ]
        );
        assert_eq!(findings[3].snippet, "type Repository interface {");
        assert_eq!(
            findings[0].to_string(),
            "handler.go:8: [global-state] package-level mutable state; inject dependencies instead"
        );
    }

    #[test]
    fn scans_tree_and_skips_vendor() {
        let temp = TempDir::new().unwrap();
        let root = temp.path();
        fs::create_dir_all(root.join("internal/api")).unwrap();
        fs::create_dir_all(root.join("vendor/lib")).unwrap();
        fs::create_dir_all(root.join(".git")).unwrap();
        fs::write(root.join("internal/api/api.go"), "func init() {\n}\n").unwrap();
        fs::write(root.join("internal/api/api_test.go"), "func init() {\n}\n").unwrap();
        fs::write(root.join("vendor/lib/lib.go"), "func init() {\n}\n").unwrap();
        fs::write(root.join(".git/hook.go"), "func init() {\n}\n").unwrap();
        fs::write(root.join("README.md"), "panic(\n").unwrap();

        let report = Scanner::new().scan(root).unwrap();
        assert_eq!(report.files_scanned, 2);
        assert_eq!(report.count(AntiPattern::InitFunction), 2);

        let report = Scanner::new().skip_tests(true).scan(root).unwrap();
        assert_eq!(report.files_scanned, 1);
        assert_eq!(report.findings.len(), 1);
    }

    #[test]
    fn non_utf8_file_does_not_stop_scan() {
        let temp = TempDir::new().unwrap();
        let root = temp.path();
        let mut latin1 = b"package main\n// caf\xe9\nfunc init() {\n}\n".to_vec();
        latin1.extend_from_slice(b"var mu sync.Mutex\n");
        fs::write(root.join("a.go"), latin1).unwrap();
        fs::write(root.join("b.go"), "func f() {\n\tpanic(\"x\")\n}\n").unwrap();

        let report = Scanner::new().scan(root).unwrap();
        assert_eq!(report.files_scanned, 2);
        assert_eq!(report.count(AntiPattern::InitFunction), 1);
        assert_eq!(report.count(AntiPattern::Panic), 1);
        assert_eq!(report.findings[0].line, 3);
    }

    #[test]
    fn interface_limit_is_exclusive() {
        let interface = |methods: usize| {
            let mut src = String::from("type Store interface {\n");
            for i in 0..methods {
                src.push_str(&format!("\tM{i}() error\n"));
            }
            src.push_str("}\n");
            src
        };
        let five = scan_source(Path::new("five.go"), &interface(MAX_INTERFACE_METHODS));
        assert!(five.is_empty(), "{five:?}");
        let six = scan_source(Path::new("six.go"), &interface(MAX_INTERFACE_METHODS + 1));
        assert_eq!(six.len(), 1);
        assert_eq!(six[0].kind, AntiPattern::FatInterface);
        assert_eq!(six[0].line, 1);
    }

    #[test]
    fn missing_directory_is_an_error() {
        let temp = TempDir::new().unwrap();
        let err = Scanner::new().scan(temp.path().join("nope")).unwrap_err();
        assert!(matches!(err, CheckError::NotADirectory(_)));
    }
}
