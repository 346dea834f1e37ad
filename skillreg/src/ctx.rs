//! Application context and state management.
//!
//! This module provides the [`AppContext`] type which holds the registry
//! layout, the project root agent-local folders resolve against, and the
//! loaded [`RegistryConfig`].

use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, anyhow};
use skillcheck::{SKILL_MD, Verifier};

use crate::{
    agent::Agent,
    config::RegistryConfig,
    utils::{absolutize, ensure_dir, expand_home},
};

/// Path configuration grouping all path-related fields.
#[derive(Debug, Default, Clone)]
pub struct PathConfig {
    /// User home directory.
    pub home: PathBuf,
    /// Registry root, `<home>/skills`.
    pub registry_root: PathBuf,
    /// Registered skill folders, `<registry root>/skills`.
    pub skills_dir: PathBuf,
    /// Builder prompt, `<registry root>/skill.build`.
    pub builder_prompt: PathBuf,
    /// Improve prompt, `<registry root>/skill.improve`.
    pub improve_prompt: PathBuf,
    /// Pre-registry builder prompt, `<home>/skill.build`.
    pub legacy_builder_prompt: PathBuf,
    /// Optional settings, `<registry root>/config.toml`.
    pub config_file: PathBuf,
    /// Root of the project agent-local folders live in.
    pub project_root: PathBuf,
}

impl PathConfig {
    /// Derives the registry layout from `home`.
    pub fn new(home: &Path, project_root: PathBuf) -> Self {
        let registry_root = home.join("skills");
        Self {
            home: home.to_path_buf(),
            skills_dir: registry_root.join("skills"),
            builder_prompt: registry_root.join("skill.build"),
            improve_prompt: registry_root.join("skill.improve"),
            legacy_builder_prompt: home.join("skill.build"),
            config_file: registry_root.join("config.toml"),
            registry_root,
            project_root,
        }
    }
}

/// The main application context holding all state.
#[derive(Debug, Default, Clone)]
pub struct AppContext {
    pub paths: PathConfig,
    pub config: RegistryConfig,
}

impl AppContext {
    /// Builds the context for `home`, reading `config.toml` when present.
    ///
    /// `project` is tilde-expanded and made absolute; the current directory
    /// is used when it is `None`.
    ///
    /// # Errors
    ///
    /// Returns an error if the current directory is unavailable or the
    /// configuration file is invalid.
    pub fn new(home: &Path, project: Option<&str>) -> anyhow::Result<Self> {
        let home = absolutize(home);
        let project_root = match project {
            Some(project) if !project.is_empty() => expand_home(project, &home),
            _ => absolutize(&std::env::current_dir().context("Failed to read current directory")?),
        };
        let paths = PathConfig::new(&home, project_root);
        let config = RegistryConfig::load(&paths.config_file)?;
        Ok(Self { paths, config })
    }

    /// Home directory from `$HOME`.
    pub fn default_home() -> anyhow::Result<PathBuf> {
        std::env::var_os("HOME")
            .filter(|h| !h.is_empty())
            .map(PathBuf::from)
            .ok_or_else(|| anyhow!("Cannot determine home directory, pass --home or set SKILLS_HOME"))
    }

    /// Verifier honouring the configured strict threshold.
    pub fn verifier(&self) -> Verifier {
        Verifier::new().with_strict_threshold(self.config.threshold())
    }

    /// Directory `agent` reads skills from.
    ///
    /// A `[targets]` override wins; `~` expands to home and relative paths
    /// are joined to the project root.
    pub fn agent_target(&self, agent: Agent) -> PathBuf {
        if let Some(custom) = self.config.target(agent) {
            let expanded = if custom == "~" || custom.starts_with("~/") {
                expand_home(custom, &self.paths.home)
            } else {
                PathBuf::from(custom)
            };
            return if expanded.is_absolute() {
                expanded
            } else {
                self.paths.project_root.join(expanded)
            };
        }
        let base = if agent.is_global() {
            &self.paths.home
        } else {
            &self.paths.project_root
        };
        base.join(agent.default_dir())
    }

    /// Targets for every agent, in display order.
    pub fn agent_targets(&self) -> Vec<(Agent, PathBuf)> {
        Agent::ALL
            .into_iter()
            .map(|agent| (agent, self.agent_target(agent)))
            .collect()
    }

    /// Resolves a skill path or a registered skill name.
    ///
    /// An existing (tilde-expanded) path wins, then `<skills dir>/<source>`.
    /// When neither exists the expanded path is returned so callers report
    /// it.
    pub fn resolve_skill_source(&self, source: &str) -> anyhow::Result<PathBuf> {
        let expanded = expand_home(source, &self.paths.home);
        if expanded.exists() {
            return Ok(expanded);
        }
        ensure_dir(&self.paths.skills_dir)?;
        let candidate = self.paths.skills_dir.join(source);
        if candidate.exists() {
            return Ok(absolutize(&candidate));
        }
        Ok(expanded)
    }

    /// Sorted names of registered skills holding a `SKILL.md`.
    pub fn list_registered(&self) -> anyhow::Result<Vec<String>> {
        ensure_dir(&self.paths.skills_dir)?;
        let entries = fs::read_dir(&self.paths.skills_dir)
            .with_context(|| format!("Failed to read {}", self.paths.skills_dir.display()))?;
        let mut names = Vec::new();
        for entry in entries {
            let path = entry?.path();
            if path.is_dir()
                && path.join(SKILL_MD).exists()
                && let Some(name) = path.file_name().and_then(|n| n.to_str())
            {
                names.push(name.to_string());
            }
        }
        names.sort();
        Ok(names)
    }

    /// Folder of the registered skill `name`.
    pub fn registered_dir(&self, name: &str) -> PathBuf {
        self.paths.skills_dir.join(name)
    }
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

    #[test]
    fn layout_follows_home() {
        let temp = TempDir::new().unwrap();
        let ctx = context(&temp);
        let home = &ctx.paths.home;
        assert_eq!(ctx.paths.registry_root, home.join("skills"));
        assert_eq!(ctx.paths.skills_dir, home.join("skills/skills"));
        assert_eq!(ctx.paths.builder_prompt, home.join("skills/skill.build"));
        assert_eq!(ctx.paths.improve_prompt, home.join("skills/skill.improve"));
        assert_eq!(ctx.paths.legacy_builder_prompt, home.join("skill.build"));
    }

    #[test]
    fn default_agent_targets() {
        let temp = TempDir::new().unwrap();
        let ctx = context(&temp);
        let project = &ctx.paths.project_root;
        let targets = ctx.agent_targets();
        assert_eq!(targets[0], (Agent::Codex, ctx.paths.home.join(".codex/skills")));
        assert_eq!(targets[1], (Agent::Claude, project.join(".claude/skills")));
        assert_eq!(targets[2], (Agent::Kiro, project.join(".kiro/skills")));
        assert_eq!(targets[3], (Agent::Gemini, project.join(".gemini/skills")));
        assert_eq!(targets[4], (Agent::Antigravity, project.join(".agent/skills")));
    }

    #[test]
    fn configured_targets_override_defaults() {
        let temp = TempDir::new().unwrap();
        let mut ctx = context(&temp);
        ctx.config.targets.insert("codex".into(), "~/agents/codex".into());
        ctx.config.targets.insert("kiro".into(), "tools/kiro".into());
        assert_eq!(ctx.agent_target(Agent::Codex), ctx.paths.home.join("agents/codex"));
        assert_eq!(ctx.agent_target(Agent::Kiro), ctx.paths.project_root.join("tools/kiro"));
    }

    #[test]
    fn resolves_paths_before_registered_names() {
        let temp = TempDir::new().unwrap();
        let ctx = context(&temp);
        let registered = ctx.registered_dir("lenis");
        fs::create_dir_all(&registered).unwrap();
        fs::write(registered.join("SKILL.md"), "---\n").unwrap();

        assert_eq!(ctx.resolve_skill_source("lenis").unwrap(), absolutize(&registered));
        let local = ctx.paths.project_root.clone();
        assert_eq!(ctx.resolve_skill_source(local.to_str().unwrap()).unwrap(), local);
        assert_eq!(ctx.list_registered().unwrap(), ["lenis"]);
    }

    #[test]
    fn list_ignores_folders_without_manifest() {
        let temp = TempDir::new().unwrap();
        let ctx = context(&temp);
        fs::create_dir_all(ctx.registered_dir("draft")).unwrap();
        for name in ["zod", "axum"] {
            fs::create_dir_all(ctx.registered_dir(name)).unwrap();
            fs::write(ctx.registered_dir(name).join("SKILL.md"), "").unwrap();
        }
        assert_eq!(ctx.list_registered().unwrap(), ["axum", "zod"]);
    }
}
