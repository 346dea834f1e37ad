//! Terminal rendering of verification reports.
//!
//! Three formats are supported: `pretty` (coloured, grouped), `text` (plain
//! `[verify]` lines, stable for scripts) and `json` (the serialised
//! [`ReportPayload`](skillcheck::ReportPayload)).

use std::fmt::Write as _;

use colored::Colorize;
use skillcheck::{Issue, VerificationReport, report::status_text};

use crate::config::OutputFormat;

const RULE_WIDTH: usize = 72;

/// Prints `report` to stdout in `output` format.
///
/// # Errors
///
/// Fails only if the JSON payload cannot be serialised.
pub fn print_report(
    report: &VerificationReport,
    verbose: bool,
    output: OutputFormat,
) -> anyhow::Result<()> {
    let rendered = match output {
        OutputFormat::Json => serde_json::to_string_pretty(&report.payload(verbose))?,
        OutputFormat::Text => render_text(report, verbose),
        OutputFormat::Pretty => render_pretty(report, verbose),
    };
    println!("{rendered}");
    Ok(())
}

/// Plain rendering built from the report payload.
pub fn render_text(report: &VerificationReport, verbose: bool) -> String {
    let p = report.payload(verbose);
    let mut out = String::new();
    let _ = writeln!(out, "[verify] {}", p.skill_dir);
    let _ = writeln!(
        out,
        "[verify] SPEC   grade={}/100 status={} errors={} warnings={}",
        p.grades.spec.score, p.grades.spec.status, p.counts.spec.errors, p.counts.spec.warnings
    );
    let _ = write!(
        out,
        "[verify] STRICT grade={}/100 status={} threshold={} errors={} warnings={}",
        p.grades.strict.score,
        p.grades.strict.status,
        p.grades.strict.threshold,
        p.counts.strict.errors,
        p.counts.strict.warnings
    );

    let Some(findings) = p.findings else {
        if !p.counts.spec.is_clean() || !p.counts.strict.is_clean() {
            out.push_str("\n[verify] Use --verbose for full findings.");
        }
        return out;
    };

    for (label, scope) in [("SPEC", &findings.spec), ("STRICT", &findings.strict)] {
        if scope.errors.is_empty() && scope.warnings.is_empty() {
            continue;
        }
        let _ = write!(out, "\n[verify] {label} Findings");
        for msg in &scope.errors {
            let _ = write!(out, "\n  {label} ERROR: {msg}");
        }
        for msg in &scope.warnings {
            let _ = write!(out, "\n  {label} WARN: {msg}");
        }
    }
    out
}

/// Coloured rendering for terminals.
///
/// Without `verbose` only the merged, de-duplicated errors of both scopes
/// are listed.
pub fn render_pretty(report: &VerificationReport, verbose: bool) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "\n{}",
        format!("Verify: {}", report.skill_dir.display()).cyan().bold()
    );
    let _ = writeln!(out, "{}", "-".repeat(RULE_WIDTH));
    out.push_str("Grades\n");
    let _ = writeln!(
        out,
        "{}",
        status_line(
            format!(
                "  SPEC   : {}  ({}/100)",
                status_text(report.spec_passed),
                report.spec_grade
            ),
            report.spec_passed
        )
    );
    let _ = writeln!(
        out,
        "{}",
        status_line(
            format!(
                "  STRICT : {}  ({}/100, threshold={})",
                status_text(report.strict_passed),
                report.strict_grade,
                report.strict_threshold
            ),
            report.strict_passed
        )
    );
    let _ = write!(
        out,
        "Counts  SPEC(e={}, w={})  STRICT(e={}, w={})",
        report.spec.error_count(),
        report.spec.warning_count(),
        report.strict.error_count(),
        report.strict.warning_count()
    );

    if report.spec.is_empty() && report.strict.is_empty() {
        let _ = write!(out, "\n\n{}", "No findings.".green());
        return out;
    }

    if !verbose {
        let merged = report.merged_errors();
        issue_group(&mut out, "Errors", &merged, &[]);
        let _ = write!(
            out,
            "\n\n{}",
            "Tip: Use --verbose for full spec/strict warnings and grouped findings.".bright_black()
        );
        return out;
    }

    let spec_errors: Vec<_> = report.spec.errors().collect();
    let spec_warnings: Vec<_> = report.spec.warnings().collect();
    issue_group(&mut out, "Spec Findings", &spec_errors, &spec_warnings);
    let strict_errors: Vec<_> = report.strict.errors().collect();
    let strict_warnings: Vec<_> = report.strict.warnings().collect();
    issue_group(&mut out, "Strict Findings", &strict_errors, &strict_warnings);
    out
}

fn status_line(text: String, passed: bool) -> colored::ColoredString {
    if passed {
        text.green().bold()
    } else {
        text.red()
    }
}

fn issue_group(out: &mut String, title: &str, errors: &[&Issue], warnings: &[&Issue]) {
    if errors.is_empty() && warnings.is_empty() {
        return;
    }
    let _ = write!(out, "\n\n{}", title.bright_blue().bold());
    for issue in errors {
        let _ = write!(out, "\n{}", format!("  [ERROR] {}", issue.message).red());
    }
    for issue in warnings {
        let _ = write!(out, "\n{}", format!("  [WARN]  {}", issue.message).yellow());
    }
}
