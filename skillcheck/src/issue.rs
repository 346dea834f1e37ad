use serde::Serialize;

/// Severity of a finding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Blocks the gate of the scope it was recorded in.
    Error,
    /// Lowers the grade only.
    Warning,
}

/// The two independent verification scopes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
    /// Portable Agent Skills checks.
    Spec,
    /// Registry workflow quality gate.
    Strict,
}

impl Scope {
    /// Upper-case label used in text reports.
    pub fn label(self) -> &'static str {
        match self {
            Scope::Spec => "SPEC",
            Scope::Strict => "STRICT",
        }
    }
}

/// A single finding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Issue {
    pub severity: Severity,
    pub message: String,
}

/// Ordered findings of one scope.
#[derive(Debug, Clone, Default)]
pub struct Findings {
    issues: Vec<Issue>,
}

impl Findings {
    /// Records an error.
    pub fn error(&mut self, message: impl Into<String>) {
        self.push(Severity::Error, message.into());
    }

    /// Records a warning.
    pub fn warning(&mut self, message: impl Into<String>) {
        self.push(Severity::Warning, message.into());
    }

    fn push(&mut self, severity: Severity, message: String) {
        trace!("{severity:?}: {message}");
        self.issues.push(Issue { severity, message });
    }

    /// All findings in insertion order.
    pub fn all(&self) -> &[Issue] {
        &self.issues
    }

    pub fn errors(&self) -> impl Iterator<Item = &Issue> {
        self.issues.iter().filter(|i| i.severity == Severity::Error)
    }

    pub fn warnings(&self) -> impl Iterator<Item = &Issue> {
        self.issues.iter().filter(|i| i.severity == Severity::Warning)
    }

    pub fn error_count(&self) -> usize {
        self.errors().count()
    }

    pub fn warning_count(&self) -> usize {
        self.warnings().count()
    }

    pub fn is_empty(&self) -> bool {
        self.issues.is_empty()
    }

    /// Returns true if any finding's message contains `needle`.
    pub fn mentions(&self, needle: &str) -> bool {
        self.issues.iter().any(|i| i.message.contains(needle))
    }
}
