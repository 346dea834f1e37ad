//! Command line interface of the `skills` binary.

use std::{
    io::{self, BufRead, Write},
    path::{Path, PathBuf},
};

use clap::{Args, Parser, Subcommand};
use colored::Colorize;
use skillcheck::Scanner;

use crate::{
    agent::parse_agents,
    config::{Gate, OutputFormat},
    ctx::AppContext,
    deploy::{self, DeployMode},
    display::print_report,
    error::{CliError, bad_parameter},
    prompts::{self, Seeded},
    registry::{self, RegisterOptions},
    utils::ensure_dir,
};

#[derive(Parser, Debug)]
#[command(name = "skills", author, version, about = "Skills registry CLI", long_about = None)]
pub struct Cli {
    /// Home directory holding the `skills/` registry (default: $HOME)
    #[arg(long, global = true, env = "SKILLS_HOME")]
    pub home: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Agent selection shared by the distribution commands.
#[derive(Args, Debug, Clone, Default)]
pub struct TargetArgs {
    /// Agent(s): codex,claude,kiro,gemini,antigravity,all
    #[arg(long)]
    pub agent: Vec<String>,

    /// Project root for agent-local folders
    #[arg(long)]
    pub project: Option<String>,
}

/// Report options shared by `verify`, `register` and `improve`.
#[derive(Args, Debug, Clone, Default)]
pub struct ReportArgs {
    /// Output format: pretty, text, json
    #[arg(long, value_enum)]
    pub output: Option<OutputFormat>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create ~/skills layout and seed skill.build
    Init {
        /// Rewrite ~/skills/skill.build
        #[arg(long)]
        force_prompt: bool,
        /// Rewrite ~/skills/skill.improve
        #[arg(long)]
        force_improve_prompt: bool,
    },

    /// List registered skills
    List,

    /// Create a minimal skill scaffold in ~/skills/skills/<name>
    Create {
        /// Skill name (used as folder name)
        name: String,
        /// Overwrite existing registry skill folder
        #[arg(long)]
        force: bool,
    },

    /// Register one or more skills into ~/skills/skills
    ///
    /// Pass '.' to discover and register all skill subfolders in the current
    /// directory. Multiple explicit paths are also accepted.
    Register {
        /// Path(s) to skill folder(s)
        sources: Vec<String>,
        /// Override registry folder name (single skill only)
        #[arg(long)]
        name: Option<String>,
        /// Install to agent directories after register
        #[arg(long)]
        install: bool,
        #[command(flatten)]
        target: TargetArgs,
        /// Registration gate: spec or strict
        #[arg(long, value_enum)]
        gate: Option<Gate>,
        /// Show full verification findings
        #[arg(long)]
        verbose: bool,
        #[command(flatten)]
        report: ReportArgs,
    },

    /// Validate a skill folder against the Agent Skills checks
    Verify {
        /// Path to a skill folder OR registered skill name
        source: String,
        /// Exit-code gate: spec or strict
        #[arg(long, value_enum)]
        gate: Option<Gate>,
        /// Shortcut for --gate strict
        #[arg(long)]
        strict: bool,
        /// Show full verification findings
        #[arg(long)]
        verbose: bool,
        #[command(flatten)]
        report: ReportArgs,
    },

    /// Remove skill(s) from the global registry (~/skills/skills)
    Deregister {
        /// Registered skill name
        skill_name: Option<String>,
        /// Remove all registered skills from registry
        #[arg(long)]
        all: bool,
        /// Confirm destructive removal
        #[arg(long)]
        force: bool,
    },

    /// Install registered skill(s) to agent directories
    Install {
        /// Registered skill name
        skill_name: Option<String>,
        #[command(flatten)]
        target: TargetArgs,
        /// Install all registered skills
        #[arg(long)]
        all: bool,
    },

    /// Sync registered skill(s) to agent directories (all if no skill names are provided)
    Sync {
        /// Optional registered skill names to sync
        skill_names: Vec<String>,
        #[command(flatten)]
        target: TargetArgs,
    },

    /// Remove installed skill copies from agent directories
    Desync {
        /// Installed/registered skill name
        skill_name: Option<String>,
        #[command(flatten)]
        target: TargetArgs,
        /// Remove all registered skills from agent directories
        #[arg(long)]
        all: bool,
        /// Confirm destructive removal
        #[arg(long)]
        force: bool,
    },

    /// Show registry and agent target locations
    Where {
        /// Project root for agent-local folders
        #[arg(long)]
        project: Option<String>,
    },

    /// Print the builder prompt path
    Prompt,

    /// Prepare improvement of a skill folder and show the LLM invocation
    Improve {
        /// Registered skill name OR local folder path to improve
        target: String,
        /// Run STRICT verification before showing improve instructions
        #[arg(long, overrides_with = "no_verify")]
        verify: bool,
        /// Skip the STRICT preflight
        #[arg(long)]
        no_verify: bool,
        /// Show full STRICT findings when verifying (default)
        #[arg(long, overrides_with = "no_verbose")]
        verbose: bool,
        /// Only show merged errors when verifying
        #[arg(long)]
        no_verbose: bool,
        #[command(flatten)]
        report: ReportArgs,
    },

    /// Print the improve prompt path
    ImprovePath,

    /// Alias for `improve-path`
    #[command(hide = true)]
    ImprovePrompt,

    /// Scan Go sources for common anti-patterns
    Scan {
        /// Directory to scan
        #[arg(default_value = ".")]
        dir: PathBuf,
        /// Leave *_test.go files out
        #[arg(long)]
        skip_tests: bool,
        /// Exit with status 1 when anything is found
        #[arg(long)]
        deny: bool,
    },
}

/// Runs a parsed command line.
///
/// # Errors
///
/// [`CliError`] values carry the exit status; any other error exits with 1.
pub fn run(cli: Cli) -> anyhow::Result<()> {
    let home = match cli.home {
        Some(home) => home,
        None => AppContext::default_home()?,
    };
    let context = |project: Option<&str>| AppContext::new(&home, project);

    match cli.command {
        Commands::Init {
            force_prompt,
            force_improve_prompt,
        } => cmd_init(&context(None)?, force_prompt, force_improve_prompt),
        Commands::List => cmd_list(&context(None)?),
        Commands::Create { name, force } => {
            let ctx = context(None)?;
            let dir = registry::create(&ctx, &name, force)?;
            println!("[create] scaffolded {}", dir.display());
            println!("[create] edit {}", dir.join(skillcheck::SKILL_MD).display());
            Ok(())
        }
        Commands::Register {
            sources,
            name,
            install,
            target,
            gate,
            verbose,
            report,
        } => {
            let ctx = context(target.project.as_deref())?;
            let sources = if sources.is_empty() {
                vec![prompt_line("Skill source folder path")?]
            } else {
                sources
            };
            let agents = parse_agents(&target.agent)?;
            let opts = RegisterOptions {
                name,
                gate: gate.unwrap_or(ctx.config.default_gate),
                install: install.then_some(agents),
                verbose,
                output: report.output.unwrap_or(ctx.config.default_output),
            };
            registry::register(&ctx, &sources, &opts)
        }
        Commands::Verify {
            source,
            gate,
            strict,
            verbose,
            report,
        } => {
            let ctx = context(None)?;
            let gate = if strict {
                Gate::Strict
            } else {
                gate.unwrap_or(ctx.config.default_gate)
            };
            let src = ctx.resolve_skill_source(&source)?;
            let result = ctx.verifier().verify(&src);
            print_report(&result, verbose, report.output.unwrap_or(ctx.config.default_output))?;
            if !gate.passed(&result) {
                return Err(CliError::Exit(1).into());
            }
            Ok(())
        }
        Commands::Deregister {
            skill_name,
            all,
            force,
        } => {
            require_force(force, "deregister")?;
            let ctx = context(None)?;
            let Some(names) = select(&ctx, skill_name, all, "deregister")? else {
                return Ok(());
            };
            for removal in registry::deregister(&ctx, &names)? {
                let verb = if removal.removed { "removed" } else { "missing" };
                println!("[deregister] {verb} {}", removal.path.display());
            }
            Ok(())
        }
        Commands::Install {
            skill_name,
            target,
            all,
        } => {
            let ctx = context(target.project.as_deref())?;
            let skills = match skill_name {
                Some(name) if !all => vec![name],
                _ => {
                    let names = ctx.list_registered()?;
                    if names.is_empty() {
                        println!("No registered skills to install.");
                        return Ok(());
                    }
                    names
                }
            };
            let agents = parse_agents(&target.agent)?;
            deploy::install(&ctx, &skills, &agents, DeployMode::Install)?;
            Ok(())
        }
        Commands::Sync {
            skill_names,
            target,
        } => {
            let ctx = context(target.project.as_deref())?;
            let skills = if skill_names.is_empty() {
                ctx.list_registered()?
            } else {
                skill_names
            };
            if skills.is_empty() {
                println!("No registered skills to sync.");
                return Ok(());
            }
            let agents = parse_agents(&target.agent)?;
            deploy::install(&ctx, &skills, &agents, DeployMode::Sync)?;
            Ok(())
        }
        Commands::Desync {
            skill_name,
            target,
            all,
            force,
        } => {
            require_force(force, "desync")?;
            let ctx = context(target.project.as_deref())?;
            let Some(skills) = select(&ctx, skill_name, all, "desync")? else {
                return Ok(());
            };
            let agents = parse_agents(&target.agent)?;
            deploy::desync(&ctx, &skills, &agents)?;
            Ok(())
        }
        Commands::Where { project } => cmd_where(&context(project.as_deref())?),
        Commands::Prompt => {
            println!("{}", context(None)?.paths.builder_prompt.display());
            Ok(())
        }
        Commands::Improve {
            target,
            verify: _,
            no_verify,
            verbose: _,
            no_verbose,
            report,
        } => {
            let ctx = context(None)?;
            let output = report.output.unwrap_or(ctx.config.default_output);
            cmd_improve(&ctx, &target, !no_verify, !no_verbose, output)
        }
        Commands::ImprovePath | Commands::ImprovePrompt => {
            println!("{}", context(None)?.paths.improve_prompt.display());
            Ok(())
        }
        Commands::Scan {
            dir,
            skip_tests,
            deny,
        } => cmd_scan(&dir, skip_tests, deny),
    }
}

fn require_force(force: bool, action: &str) -> anyhow::Result<()> {
    if force {
        Ok(())
    } else {
        Err(bad_parameter(format!("{action} is destructive. Re-run with --force.")))
    }
}

/// Skill names named on the command line or, with `--all`, every registered
/// skill. `None` means there is nothing to do.
fn select(
    ctx: &AppContext,
    skill_name: Option<String>,
    all: bool,
    action: &str,
) -> anyhow::Result<Option<Vec<String>>> {
    if all {
        let names = ctx.list_registered()?;
        if names.is_empty() {
            println!("No registered skills to {action}.");
            return Ok(None);
        }
        return Ok(Some(names));
    }
    match skill_name {
        Some(name) => Ok(Some(vec![name])),
        None => Err(bad_parameter("Provide <skill-name> or use --all.")),
    }
}

fn prompt_line(label: &str) -> anyhow::Result<String> {
    print!("{label}: ");
    io::stdout().flush()?;
    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    let line = line.trim().to_string();
    if line.is_empty() {
        return Err(bad_parameter("Missing skill source path"));
    }
    Ok(line)
}

fn cmd_init(ctx: &AppContext, force_builder: bool, force_improve: bool) -> anyhow::Result<()> {
    let (builder, improve) = prompts::init(ctx, force_builder, force_improve)?;
    let paths = &ctx.paths;
    match builder {
        Seeded::Wrote => println!("Wrote prompt: {}", paths.builder_prompt.display()),
        Seeded::Exists => println!("Prompt exists: {}", paths.builder_prompt.display()),
    }
    match improve {
        Seeded::Wrote => println!("Wrote improve prompt: {}", paths.improve_prompt.display()),
        Seeded::Exists => println!("Improve prompt exists: {}", paths.improve_prompt.display()),
    }
    println!("Registry skills dir: {}", paths.skills_dir.display());
    Ok(())
}

fn cmd_list(ctx: &AppContext) -> anyhow::Result<()> {
    let skills = ctx.list_registered()?;
    if skills.is_empty() {
        println!("No registered skills found.");
    }
    for skill in skills {
        println!("{skill}");
    }
    Ok(())
}

fn cmd_where(ctx: &AppContext) -> anyhow::Result<()> {
    let paths = &ctx.paths;
    println!("registryRoot: {}", paths.registry_root.display());
    println!("registrySkills: {}", paths.skills_dir.display());
    println!("builderPrompt: {}", paths.builder_prompt.display());
    println!("improvePrompt: {}", paths.improve_prompt.display());
    println!("config: {}", paths.config_file.display());
    println!("projectRoot: {}", paths.project_root.display());
    for (agent, target) in ctx.agent_targets() {
        println!("{agent}: {}", target.display());
    }
    Ok(())
}

/// Where an `improve` target lives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetKind {
    Registered,
    LocalPath,
}

impl TargetKind {
    pub fn label(self) -> &'static str {
        match self {
            TargetKind::Registered => "registered",
            TargetKind::LocalPath => "local-path",
        }
    }
}

/// Resolves an `improve` target to its folder, kind and display label.
pub fn improve_target(ctx: &AppContext, target: &str) -> anyhow::Result<(PathBuf, TargetKind, String)> {
    ensure_dir(&ctx.paths.skills_dir)?;
    let skill_dir = ctx.resolve_skill_source(target)?;
    if !skill_dir.is_dir() {
        return Err(bad_parameter(format!(
            "Target skill folder not found: {target}. Pass a registered skill name or an existing folder path."
        )));
    }
    let registered = skill_dir
        .strip_prefix(&ctx.paths.skills_dir)
        .ok()
        .filter(|rel| !rel.as_os_str().is_empty())
        .map(|rel| {
            rel.components()
                .map(|c| c.as_os_str().to_string_lossy())
                .collect::<Vec<_>>()
                .join("/")
        });
    Ok(match registered {
        Some(label) => (skill_dir, TargetKind::Registered, label),
        None => (skill_dir, TargetKind::LocalPath, target.to_string()),
    })
}

fn cmd_improve(
    ctx: &AppContext,
    target: &str,
    verify_first: bool,
    verbose: bool,
    output: OutputFormat,
) -> anyhow::Result<()> {
    let (skill_dir, kind, label) = improve_target(ctx, target)?;
    let entrypoint = format!("{} {target}", ctx.paths.improve_prompt.display());

    println!("{}", format!("Improve Skill Folder: {label}").cyan().bold());
    println!("Target kind: {}", kind.label());
    println!("Target folder: {}", skill_dir.display());
    println!("LLM entrypoint: {entrypoint}");

    if verify_first {
        println!("{}", "\nPreflight STRICT verify".bright_blue().bold());
        let result = ctx.verifier().verify(&skill_dir);
        print_report(&result, verbose, output)?;
        if result.strict_passed {
            println!(
                "{}",
                "\nSTRICT already passes. You can still run the improve prompt for refinement if desired."
                    .green()
            );
        } else {
            println!(
                "{}",
                "\nNext step: run the LLM prompt and let it fix STRICT findings in-place.".yellow()
            );
        }
        if kind == TargetKind::LocalPath && result.spec_passed {
            println!(
                "{}",
                format!(
                    "\nAfter repair, you can register it with: skills register {}",
                    skill_dir.display()
                )
                .bright_black()
            );
        }
    }

    println!("\nRun in Gemini/Claude CLI: {entrypoint}");
    Ok(())
}

fn cmd_scan(dir: &Path, skip_tests: bool, deny: bool) -> anyhow::Result<()> {
    let report = Scanner::new().skip_tests(skip_tests).scan(dir)?;
    for finding in &report.findings {
        println!("{}", finding.to_string().yellow());
        println!("    {}", finding.snippet.bright_black());
    }
    println!(
        "[scan] {} go file(s) scanned, {} finding(s)",
        report.files_scanned,
        report.findings.len()
    );
    if deny && !report.is_clean() {
        return Err(CliError::Exit(1).into());
    }
    Ok(())
}
