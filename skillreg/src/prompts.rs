//! LLM prompts seeded into the registry.
//!
//! `skill.build` turns a reference folder into a skill bundle, `skill.improve`
//! repairs an existing skill until it passes the strict gate.

use std::{fs, io, path::Path};

use anyhow::Context;

use crate::{ctx::AppContext, utils::ensure_dir};

const LEGACY_COPY_MARKER: &str = "You must create a copy of the generated skill at each location:";
const CLI_HANDOFF_HEADING: &str = "CLI HANDOFF";

const LEGACY_HANDOFF: &str = "\n\nCLI HANDOFF\n\
Do NOT copy skills to agent directories.\n\
Place the generated skill bundle only in the local registry path (for example: ~/skills/skills/{skill-name}).\n\
Agent distribution is handled by the `skills` CLI using install/sync commands.\n";

const DEFAULT_BUILDER_PROMPT: &str = "ROLE
You are a Senior Agentic Skill Architect specializing in Progressive Disclosure skill bundles.

OBJECTIVE
Convert the provided @ref folder into a compliant skill bundle.

CRITICAL
If no valid @ref folder is provided, stop and ask for it.

MANDATORY
- Enforce 1-3-10 rule
- Keep SKILL.md focused on critical setup/invariants only
- Put deep details in /references
- Split references semantically (not arbitrary line splits)
- Keep each reference file under 800 lines
- Pin supported versions in SKILL.md metadata
- Include activation semantics with triggers and priority

CLI HANDOFF
Do NOT copy skills to agent directories.
Place the generated skill bundle only in the local registry path requested by the user/runner.
Agent distribution is handled by the `skills` CLI using install/sync commands.
";

const DEFAULT_IMPROVE_PROMPT: &str = "ROLE
You are a Senior Agentic Skill Refiner. Improve an existing registered skill folder so it reaches STRICT quality while preserving correctness and usefulness.

ENTRY FORMAT (MANDATORY)
This prompt is invoked like: `~/skills/skill.improve <skill_name_or_path>`
Parse the invocation on the first line and extract `<skill_name_or_path>`.
If no target is provided, stop and ask for one.

DISCOVERY (MANDATORY)
1. If the argument looks like a path and exists, use that folder as the target skill folder.
2. Otherwise, treat it as a registered skill name and resolve the target folder from the local registry.
3. If no target folder exists, stop and ask the user to create/register the skill first.
4. Run: `skills verify <skill_name_or_path> --strict --verbose`
5. Use STRICT findings as the improvement checklist.

GOAL
Improve the entire target skill folder (all relevant files, not just SKILL.md) so it passes STRICT mode.
Minor refinement additions are allowed if they improve clarity, consistency, and agentskills.io alignment.
If the target is an unregistered local folder in bad shape, repair it enough to pass verification, then the user can register it.

COMMON FIXES FOR STRICT PASS
- Add/repair frontmatter fields used by strict quality checks (`triggers`, `references`, `activation`)
- Move examples/large code blocks out of `SKILL.md` into `references/`
- Reorganize references under taxonomy folders (`references/<category>/...`)
- Ensure `references` paths exist and are relative
- Add version governance / compatibility metadata
- Keep SKILL.md as 'brain only' (critical setup rules and invariants)

WORKFLOW
1. Verify in STRICT mode.
2. Load and edit files in the registered skill folder in-place.
3. Re-run STRICT verify.
4. Repeat until STRICT passes or clarification is needed.

CONSTRAINTS
- Do not copy to agent directories directly (`skills install` handles distribution).
- Preserve agentskills.io spec compliance while improving strict quality.
- If the folder is missing `SKILL.md` or has invalid YAML, create/fix it as part of the improvement.
";

/// Builder prompt text.
///
/// A non-empty legacy prompt at `legacy_path` is reused: line endings are
/// normalised, everything from the "copy to each location" instructions on
/// is dropped and a CLI HANDOFF section is appended when missing.
pub fn builder_prompt(legacy_path: &Path) -> anyhow::Result<String> {
    let legacy = match fs::read_to_string(legacy_path) {
        Ok(text) => text,
        Err(e) if e.kind() == io::ErrorKind::NotFound => String::new(),
        Err(e) => {
            return Err(e).with_context(|| format!("Failed to read {}", legacy_path.display()));
        }
    };
    if legacy.is_empty() {
        return Ok(DEFAULT_BUILDER_PROMPT.to_string());
    }
    debug!("adapting legacy prompt {}", legacy_path.display());
    Ok(adapt_legacy_prompt(&legacy))
}

fn adapt_legacy_prompt(legacy: &str) -> String {
    let mut text = legacy.replace("\r\n", "\n");
    if let Some(idx) = text.find(LEGACY_COPY_MARKER) {
        text.truncate(idx);
        text.truncate(text.trim_end().len());
    }
    if !text.contains(CLI_HANDOFF_HEADING) {
        text.push_str(LEGACY_HANDOFF);
    }
    format!("{}\n", text.trim_end())
}

/// Improve prompt text.
pub fn improve_prompt() -> &'static str {
    DEFAULT_IMPROVE_PROMPT
}

/// Outcome of seeding one prompt file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Seeded {
    Wrote,
    Exists,
}

/// Creates the registry layout and writes missing (or forced) prompts.
///
/// Returns what happened to the builder and improve prompts.
pub fn init(ctx: &AppContext, force_builder: bool, force_improve: bool) -> anyhow::Result<(Seeded, Seeded)> {
    let paths = &ctx.paths;
    ensure_dir(&paths.registry_root)?;
    ensure_dir(&paths.skills_dir)?;

    let builder = if force_builder || !paths.builder_prompt.exists() {
        let text = builder_prompt(&paths.legacy_builder_prompt)?;
        write(&paths.builder_prompt, &text)?;
        Seeded::Wrote
    } else {
        Seeded::Exists
    };

    let improve = if force_improve || !paths.improve_prompt.exists() {
        write(&paths.improve_prompt, improve_prompt())?;
        Seeded::Wrote
    } else {
        Seeded::Exists
    };

    Ok((builder, improve))
}

fn write(path: &Path, text: &str) -> anyhow::Result<()> {
    fs::write(path, text).with_context(|| format!("Failed to write {}", path.display()))
}
