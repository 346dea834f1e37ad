//! Registry operations: scaffolding, registering and removing skills.

use std::{
    fs,
    path::{Component, Path, PathBuf},
};

use anyhow::Context;
use colored::Colorize;
use skillcheck::VerificationReport;

use crate::{
    agent::Agent,
    config::{Gate, OutputFormat},
    ctx::AppContext,
    deploy::{self, DeployMode},
    display::print_report,
    error::{CliError, bad_parameter},
    utils::{absolutize, copy_dir, ensure_dir, expand_home, remove_path},
};

/// Manifest file names that mark a folder as a skill during discovery.
pub const SKILL_MANIFESTS: [&str; 3] = ["SKILL.md", "SKILLS.md", "skills.md"];

/// Normalises a user supplied skill name into a folder name.
///
/// ```rust
/// use skillreg::registry::normalize_skill_name;
///
/// assert_eq!(normalize_skill_name("  React_Flow  Hooks "), "react-flow-hooks");
/// assert_eq!(normalize_skill_name("--a--b--"), "a-b");
/// ```
pub fn normalize_skill_name(name: &str) -> String {
    let lowered = name.trim().to_lowercase().replace('_', "-");
    let mut normalized = lowered.split_whitespace().collect::<Vec<_>>().join("-");
    while normalized.contains("--") {
        normalized = normalized.replace("--", "-");
    }
    normalized.trim_matches('-').to_string()
}

/// Whether `path` holds any recognised skill manifest.
pub fn has_skill_file(path: &Path) -> bool {
    SKILL_MANIFESTS.iter().any(|name| path.join(name).exists())
}

/// Sorted direct child folders of `path` holding a skill manifest.
pub fn find_skill_folders(path: &Path) -> anyhow::Result<Vec<PathBuf>> {
    if !path.is_dir() {
        return Ok(Vec::new());
    }
    let mut found = Vec::new();
    for entry in fs::read_dir(path).with_context(|| format!("Failed to read {}", path.display()))? {
        let child = entry?.path();
        if child.is_dir() && has_skill_file(&child) {
            found.push(child);
        }
    }
    found.sort();
    Ok(found)
}

fn scaffold_skill_md(name: &str) -> String {
    format!(
        r#"---
name: {name}
description: >-
  Describe what the `{name}` skill does and when to use it.
triggers:
  - "{name}"
references:
  - references/misc/overview.md
compatibility: "Add supported versions/platforms here"
metadata:
  skill_version: "0.1.0"
  owner: ""
activation:
  mode: fuzzy
  triggers:
    - "{name}"
  priority: normal
---

# Skill Instructions

Keep this file focused on critical setup rules and invariants only.

## Critical Rules

1. Replace this scaffold with the actual setup constraints.
2. Move detailed docs/examples into `references/` files.
"#
    )
}

/// Scaffolds a new skill in the registry and returns its folder.
///
/// # Errors
///
/// Fails with a usage error when the name normalises to nothing or the skill
/// exists and `force` is not set.
pub fn create(ctx: &AppContext, name: &str, force: bool) -> anyhow::Result<PathBuf> {
    ensure_dir(&ctx.paths.skills_dir)?;
    let skill_name = normalize_skill_name(name);
    if skill_name.is_empty() {
        return Err(bad_parameter("Skill name is empty after normalization"));
    }

    let skill_dir = ctx.registered_dir(&skill_name);
    if skill_dir.exists() {
        if !force {
            return Err(bad_parameter(format!(
                "Skill already exists: {}. Use --force to overwrite.",
                skill_dir.display()
            )));
        }
        remove_path(&skill_dir)?;
    }

    let misc = skill_dir.join("references/misc");
    ensure_dir(&misc)?;
    fs::write(skill_dir.join(skillcheck::SKILL_MD), scaffold_skill_md(&skill_name))?;
    fs::write(
        misc.join("overview.md"),
        format!(
            "# {skill_name} Reference\n\nAdd detailed documentation, examples, API notes, and patterns here.\n"
        ),
    )?;
    info!("scaffolded {}", skill_dir.display());
    Ok(skill_dir)
}

/// Expands `register` sources.
///
/// A directory without a manifest is searched for skill subfolders; any other
/// path is kept as is and left to verification.
pub fn expand_sources(ctx: &AppContext, sources: &[String]) -> anyhow::Result<Vec<PathBuf>> {
    let mut resolved = Vec::new();
    for source in sources {
        let path = expand_home(source, &ctx.paths.home);
        if path.is_dir() && !has_skill_file(&path) {
            let discovered = find_skill_folders(&path)?;
            if discovered.is_empty() {
                println!(
                    "{}",
                    format!("[register] No skill folders found in: {}", path.display()).yellow()
                );
            } else {
                println!(
                    "[register] Discovered {} skill folder(s) in: {}",
                    discovered.len(),
                    path.display()
                );
                resolved.extend(discovered);
            }
        } else {
            resolved.push(path);
        }
    }
    Ok(resolved)
}

/// Rejects names that are not a single plain path component.
///
/// Registry and agent folders are joined with the name, so `..`, absolute
/// paths and separators would reach outside them.
pub fn check_skill_name(name: &str) -> anyhow::Result<()> {
    if is_plain_name(name) {
        Ok(())
    } else {
        Err(bad_parameter(format!("Invalid skill name: {name}")))
    }
}

fn is_plain_name(name: &str) -> bool {
    let mut components = Path::new(name).components();
    matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(part)), None) if part == name
    )
}

/// Copies `src` into the registry as `name`, replacing any previous copy.
///
/// A source that already is the registry folder is left in place.
pub fn store(ctx: &AppContext, src: &Path, name: &str) -> anyhow::Result<PathBuf> {
    check_skill_name(name)?;
    ensure_dir(&ctx.paths.skills_dir)?;
    let dest = ctx.registered_dir(name);
    if absolutize(src) == absolutize(&dest) {
        info!("{name} already registered at {}", dest.display());
        return Ok(dest);
    }
    copy_dir(src, &dest)?;
    Ok(dest)
}

/// Options of the `register` command.
#[derive(Debug, Clone)]
pub struct RegisterOptions {
    /// Registry folder name override, single skill only.
    pub name: Option<String>,
    pub gate: Gate,
    /// Agents to install to after registering; `None` skips installing.
    pub install: Option<Vec<Agent>>,
    pub verbose: bool,
    pub output: OutputFormat,
}

/// Why a source was not registered.
enum Rejection {
    Gate,
    Usage(String),
}

/// Verifies, gates and registers every source.
///
/// With more than one resolved source failures are skipped and reported at
/// the end (exit status 1 when any were skipped). A single source stops at
/// the first failure.
pub fn register(ctx: &AppContext, sources: &[String], opts: &RegisterOptions) -> anyhow::Result<()> {
    if opts.name.is_some() && sources.len() > 1 {
        return Err(bad_parameter("--name cannot be used when registering multiple skills."));
    }

    let resolved = expand_sources(ctx, sources)?;
    if resolved.is_empty() {
        return Err(bad_parameter("No skill source paths resolved."));
    }

    let batch = resolved.len() > 1;
    let verifier = ctx.verifier();
    let mut registered = 0usize;
    let mut skipped = 0usize;

    for src in &resolved {
        let label = src
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        if batch {
            println!("{}", format!("\n--- {label} ---").cyan());
        }

        let report = verifier.verify(src);
        print_report(&report, opts.verbose, opts.output)?;

        let skill_name = match accept(&report, &label, opts) {
            Ok(name) => name,
            Err(rejection) if batch => {
                let reason = match rejection {
                    Rejection::Gate => format!("Skipped {label} (failed `{}` gate).", opts.gate),
                    Rejection::Usage(msg) => format!("Skipped {label}: {msg}"),
                };
                println!("{}", format!("[register] {reason}").yellow());
                skipped += 1;
                continue;
            }
            Err(Rejection::Gate) => {
                println!(
                    "{}",
                    format!("\nRegistration blocked by `{}` gate.", opts.gate).red().bold()
                );
                println!(
                    "{}",
                    format!(
                        "Repair path: run `skills improve {}` and fix the folder in-place, then register again.",
                        src.display()
                    )
                    .yellow()
                );
                return Err(CliError::Exit(1).into());
            }
            Err(Rejection::Usage(msg)) => return Err(bad_parameter(msg)),
        };

        let dest = store(ctx, src, &skill_name)?;
        println!("[register] {} -> {}", src.display(), dest.display());
        registered += 1;

        if let Some(agents) = &opts.install {
            deploy::install(ctx, &[skill_name], agents, DeployMode::Install)?;
        }
    }

    if batch {
        println!("\n[register] Done: {registered} registered, {skipped} skipped.");
        if skipped > 0 {
            return Err(CliError::Exit(1).into());
        }
    }
    Ok(())
}

/// Applies the gate and the `--name` checks, yielding the registry name.
fn accept(report: &VerificationReport, label: &str, opts: &RegisterOptions) -> Result<String, Rejection> {
    if !opts.gate.passed(report) {
        return Err(Rejection::Gate);
    }
    let skill_name = opts.name.as_deref().unwrap_or(label).trim().to_string();
    if skill_name.is_empty() {
        return Err(Rejection::Usage("Resolved skill name is empty".into()));
    }
    if !is_plain_name(&skill_name) {
        return Err(Rejection::Usage(format!("Invalid skill name: {skill_name}")));
    }
    if opts.name.is_some()
        && let Some(fm_name) = report.frontmatter_name()
        && !fm_name.is_empty()
        && fm_name != skill_name
    {
        return Err(Rejection::Usage(format!(
            "--name ({skill_name}) must match SKILL.md frontmatter name ({fm_name}) to remain spec-compliant."
        )));
    }
    Ok(skill_name)
}

/// Result of removing one registered skill.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Removal {
    pub path: PathBuf,
    pub removed: bool,
}

/// Removes registered skills by name.
pub fn deregister(ctx: &AppContext, names: &[String]) -> anyhow::Result<Vec<Removal>> {
    ensure_dir(&ctx.paths.skills_dir)?;
    let mut removals = Vec::with_capacity(names.len());
    for name in names {
        check_skill_name(name)?;
        let path = ctx.registered_dir(name);
        let removed = remove_path(&path)?;
        if removed {
            info!("deregistered {name}");
        }
        removals.push(Removal { path, removed });
    }
    Ok(removals)
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;

    fn context(temp: &TempDir) -> AppContext {
        let home = temp.path().join("home");
        let project = temp.path().join("project");
        fs::create_dir_all(&home).unwrap();
        fs::create_dir_all(&project).unwrap();
        AppContext::new(&home, Some(project.to_str().unwrap())).unwrap()
    }

    fn opts() -> RegisterOptions {
        RegisterOptions {
            name: None,
            gate: Gate::Spec,
            install: None,
            verbose: false,
            output: OutputFormat::Text,
        }
    }

    #[test]
    fn normalizes_names() {
        assert_eq!(normalize_skill_name("Go  Web_Echo"), "go-web-echo");
        assert_eq!(normalize_skill_name(" - "), "");
        assert_eq!(normalize_skill_name("a - b"), "a-b");
    }

    #[test]
    fn scaffold_passes_both_gates() {
        let temp = TempDir::new().unwrap();
        let ctx = context(&temp);
        let dir = create(&ctx, "Echo Web", false).unwrap();
        assert_eq!(dir, ctx.registered_dir("echo-web"));

        let report = ctx.verifier().verify(&dir);
        assert!(report.spec_passed, "{report}");
        assert!(report.strict_passed, "{report}");
        assert_eq!(ctx.list_registered().unwrap(), ["echo-web"]);
    }

    #[test]
    fn create_refuses_existing_without_force() {
        let temp = TempDir::new().unwrap();
        let ctx = context(&temp);
        let dir = create(&ctx, "zod", false).unwrap();
        fs::write(dir.join("notes.txt"), "x").unwrap();

        let err = create(&ctx, "zod", false).unwrap_err();
        assert!(err.to_string().contains("Skill already exists"));
        assert_eq!(err.downcast_ref::<CliError>().unwrap().exit_code(), 2);

        create(&ctx, "zod", true).unwrap();
        assert!(!dir.join("notes.txt").exists());
        assert!(create(&ctx, "  __ ", false).is_err());
    }

    #[test]
    fn discovers_skill_subfolders() {
        let temp = TempDir::new().unwrap();
        let ctx = context(&temp);
        let bundle = temp.path().join("bundle");
        for (dir, manifest) in [("b", "SKILL.md"), ("a", "skills.md"), ("c", "README.md")] {
            fs::create_dir_all(bundle.join(dir)).unwrap();
            fs::write(bundle.join(dir).join(manifest), "").unwrap();
        }
        assert_eq!(
            find_skill_folders(&bundle).unwrap(),
            [bundle.join("a"), bundle.join("b")]
        );

        let sources = vec![bundle.to_string_lossy().into_owned()];
        let resolved = expand_sources(&ctx, &sources).unwrap();
        assert_eq!(resolved.len(), 2);
    }

    #[test]
    fn register_copies_passing_skill() {
        let temp = TempDir::new().unwrap();
        let ctx = context(&temp);
        let src = create(&ctx, "lenis", false).unwrap();
        let local = temp.path().join("work/lenis");
        copy_dir(&src, &local).unwrap();
        deregister(&ctx, &["lenis".into()]).unwrap();

        register(&ctx, &[local.to_string_lossy().into_owned()], &opts()).unwrap();
        assert!(ctx.registered_dir("lenis").join("SKILL.md").exists());
    }

    #[test]
    fn register_gate_failure_exits_one() {
        let temp = TempDir::new().unwrap();
        let ctx = context(&temp);
        let local = temp.path().join("broken");
        fs::create_dir_all(&local).unwrap();
        fs::write(local.join("SKILL.md"), "no frontmatter").unwrap();

        let err = register(&ctx, &[local.to_string_lossy().into_owned()], &opts()).unwrap_err();
        assert_eq!(err.downcast_ref::<CliError>().unwrap().exit_code(), 1);
        assert!(ctx.list_registered().unwrap().is_empty());
    }

    #[test]
    fn register_name_must_match_frontmatter() {
        let temp = TempDir::new().unwrap();
        let ctx = context(&temp);
        let src = create(&ctx, "lenis", false).unwrap();
        let mut opts = opts();
        opts.name = Some("smooth".into());

        let err = register(&ctx, &[src.to_string_lossy().into_owned()], &opts).unwrap_err();
        assert!(err.to_string().contains("--name (smooth) must match"));
    }

    #[test]
    fn batch_register_skips_failures() {
        let temp = TempDir::new().unwrap();
        let ctx = context(&temp);
        let bundle = temp.path().join("bundle");
        let good = create(&ctx, "good", false).unwrap();
        copy_dir(&good, &bundle.join("good")).unwrap();
        deregister(&ctx, &["good".into()]).unwrap();
        fs::create_dir_all(bundle.join("bad")).unwrap();
        fs::write(bundle.join("bad/SKILL.md"), "---\nname: 1\n---\n").unwrap();

        let err = register(&ctx, &[bundle.to_string_lossy().into_owned()], &opts()).unwrap_err();
        assert_eq!(err.downcast_ref::<CliError>().unwrap().exit_code(), 1);
        assert_eq!(ctx.list_registered().unwrap(), ["good"]);
    }

    #[test]
    fn deregister_reports_missing() {
        let temp = TempDir::new().unwrap();
        let ctx = context(&temp);
        create(&ctx, "zod", false).unwrap();
        let removals = deregister(&ctx, &["zod".into(), "ghost".into()]).unwrap();
        assert!(removals[0].removed);
        assert!(!removals[1].removed);
        assert_eq!(removals[1].path, ctx.registered_dir("ghost"));
    }

    #[test]
    fn registering_the_registry_folder_keeps_it() {
        let temp = TempDir::new().unwrap();
        let ctx = context(&temp);
        let dir = create(&ctx, "zod", false).unwrap();

        register(&ctx, &[dir.to_string_lossy().into_owned()], &opts()).unwrap();
        assert!(dir.join("SKILL.md").is_file());
        assert!(dir.join("references/misc/overview.md").is_file());
        assert_eq!(ctx.list_registered().unwrap(), ["zod"]);
    }

    #[test]
    fn skill_names_stay_inside_registry() {
        for name in ["zod", "echo-web", "a.b"] {
            check_skill_name(name).unwrap();
        }
        for name in ["", ".", "..", "../../precious", "/", "/etc", "a/b", "zod/"] {
            let err = check_skill_name(name).unwrap_err();
            assert_eq!(err.downcast_ref::<CliError>().unwrap().exit_code(), 2, "{name}");
        }
    }

    #[test]
    fn deregister_rejects_traversal() {
        let temp = TempDir::new().unwrap();
        let ctx = context(&temp);
        let precious = temp.path().join("precious");
        fs::create_dir_all(&precious).unwrap();
        fs::write(precious.join("data.txt"), "keep").unwrap();
        create(&ctx, "zod", false).unwrap();

        for name in ["..", "../../precious", "/"] {
            let err = deregister(&ctx, &[name.into()]).unwrap_err();
            assert!(err.to_string().contains("Invalid skill name"), "{err}");
        }
        assert!(precious.join("data.txt").is_file());
        assert!(ctx.paths.skills_dir.is_dir());
        assert_eq!(ctx.list_registered().unwrap(), ["zod"]);
    }

    #[test]
    fn register_name_must_be_plain() {
        let temp = TempDir::new().unwrap();
        let ctx = context(&temp);
        let local = temp.path().join("work/lenis");
        fs::create_dir_all(&local).unwrap();
        fs::write(
            local.join("SKILL.md"),
            "---\nname: lenis\ndescription: Smooth scrolling setup and pitfalls for Lenis.\n---\n\n# Lenis\n",
        )
        .unwrap();
        let mut opts = opts();
        opts.name = Some("../lenis".into());

        let err = register(&ctx, &[local.to_string_lossy().into_owned()], &opts).unwrap_err();
        assert_eq!(err.downcast_ref::<CliError>().unwrap().exit_code(), 2);
        assert!(err.to_string().contains("Invalid skill name: ../lenis"));
        assert!(!ctx.paths.registry_root.join("lenis").exists());
    }
}
