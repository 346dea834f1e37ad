//! "Brain only" rules: SKILL.md holds critical rules, `references/` holds
//! examples and code.

use std::sync::LazyLock;

use regex::Regex;

use crate::issue::Findings;

const MAX_BLOCK_LINES: usize = 25;
const MAX_CODE_LINES: usize = 60;
const MIN_REFERENCE_LINES_FOR_RATIO: usize = 200;
const MAX_SKILL_TO_REFERENCE_RATIO: f64 = 0.20;

static EXAMPLE_HEADING: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?im)^#{1,6}\s+.*example").expect("valid heading regex"));

#[derive(Debug, Default, PartialEq, Eq)]
struct FenceStats {
    blocks: usize,
    code_lines: usize,
    max_block_lines: usize,
    unclosed: bool,
}

fn fence_stats(text: &str) -> FenceStats {
    let mut stats = FenceStats::default();
    let mut in_code = false;
    let mut current = 0usize;

    for line in text.lines() {
        if line.trim().starts_with("```") {
            if in_code {
                stats.max_block_lines = stats.max_block_lines.max(current);
            } else {
                stats.blocks += 1;
                current = 0;
            }
            in_code = !in_code;
            continue;
        }
        if in_code {
            stats.code_lines += 1;
            current += 1;
        }
    }
    if in_code {
        stats.max_block_lines = stats.max_block_lines.max(current);
        stats.unclosed = true;
    }
    stats
}

pub(crate) fn check_brain_only(skill_md: &str, reference_lines: Option<usize>, out: &mut Findings) {
    let stats = fence_stats(skill_md);

    if stats.unclosed {
        out.warning("SKILL.md contains an unclosed fenced code block.");
    }
    if EXAMPLE_HEADING.is_match(skill_md) {
        out.warning(
            "Workflow gate: SKILL.md appears to contain example sections. Move examples into `references/` files.",
        );
    }
    if stats.blocks > 0 {
        out.warning(
            "Workflow gate: SKILL.md contains fenced code blocks. Keep SKILL.md focused on critical rules and move examples/code to `references/`.",
        );
    }
    if stats.max_block_lines > MAX_BLOCK_LINES || stats.code_lines > MAX_CODE_LINES {
        out.error(
            "Workflow gate: SKILL.md contains large code block(s). Prompt rules require examples/large code blocks to be moved to `references/`.",
        );
    }

    if let Some(reference_lines) = reference_lines
        && reference_lines >= MIN_REFERENCE_LINES_FOR_RATIO
    {
        let skill_lines = skill_md.lines().count();
        let ratio = skill_lines as f64 / reference_lines as f64;
        if ratio > MAX_SKILL_TO_REFERENCE_RATIO {
            out.warning(format!(
                "Workflow gate: SKILL.md is {skill_lines} lines vs {reference_lines} reference lines (~{:.0}%). Target ~10% per your builder prompt.",
                ratio * 100.0
            ));
        }
    }
}
