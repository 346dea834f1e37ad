//! Distribution of registered skills to agent directories.

use std::{fmt, path::PathBuf};

use skillcheck::SKILL_MD;

use crate::{
    agent::Agent,
    ctx::AppContext,
    error::bad_parameter,
    registry::check_skill_name,
    utils::{copy_dir, ensure_dir, remove_path},
};

/// Wording used when reporting copies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeployMode {
    Install,
    Sync,
}

/// One skill copied to one agent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Placement {
    pub skill: String,
    pub agent: Agent,
    pub dest: PathBuf,
    pub mode: DeployMode,
}

impl fmt::Display for Placement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.mode {
            DeployMode::Install => write!(
                f,
                "[install] {} -> {} ({})",
                self.skill,
                self.agent,
                self.dest.display()
            ),
            DeployMode::Sync => write!(f, "[sync] updated {} -> {}", self.skill, self.dest.display()),
        }
    }
}

/// One skill removed (or found missing) in one agent directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Withdrawal {
    pub skill: String,
    pub agent: Agent,
    pub dest: PathBuf,
    pub removed: bool,
}

impl fmt::Display for Withdrawal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let verb = if self.removed { "removed" } else { "missing" };
        let prep = if self.removed { "from" } else { "in" };
        write!(
            f,
            "[desync] {verb} {} {prep} {} ({})",
            self.skill,
            self.agent,
            self.dest.display()
        )
    }
}

/// Copies registered skills to every agent target, replacing old copies.
///
/// Each placement is printed as it happens.
///
/// # Errors
///
/// Fails with a usage error when `skills` is empty, a name is not a plain
/// folder name, or a skill is not a registered folder with a `SKILL.md`.
pub fn install(
    ctx: &AppContext,
    skills: &[String],
    agents: &[Agent],
    mode: DeployMode,
) -> anyhow::Result<Vec<Placement>> {
    if skills.is_empty() {
        return Err(bad_parameter("No skills specified for install"));
    }
    for skill in skills {
        check_skill_name(skill)?;
    }
    ensure_dir(&ctx.paths.skills_dir)?;

    let mut placements = Vec::new();
    for skill in skills {
        let src = ctx.registered_dir(skill);
        if !src.is_dir() {
            return Err(bad_parameter(format!(
                "Skill source is not a directory: {}",
                src.display()
            )));
        }
        if !src.join(SKILL_MD).exists() {
            return Err(bad_parameter(format!("Missing SKILL.md in: {}", src.display())));
        }
        for &agent in agents {
            let root = ctx.agent_target(agent);
            ensure_dir(&root)?;
            let dest = root.join(skill);
            copy_dir(&src, &dest)?;
            let placement = Placement {
                skill: skill.clone(),
                agent,
                dest,
                mode,
            };
            println!("{placement}");
            placements.push(placement);
        }
    }
    Ok(placements)
}

/// Removes installed copies of `skills` from every agent target.
///
/// # Errors
///
/// Fails with a usage error when `skills` is empty or a name is not a plain
/// folder name. Nothing is removed in that case.
pub fn desync(ctx: &AppContext, skills: &[String], agents: &[Agent]) -> anyhow::Result<Vec<Withdrawal>> {
    if skills.is_empty() {
        return Err(bad_parameter("No skills specified for desync"));
    }
    for skill in skills {
        check_skill_name(skill)?;
    }
    let mut withdrawals = Vec::new();
    for skill in skills {
        for &agent in agents {
            let dest = ctx.agent_target(agent).join(skill);
            let removed = remove_path(&dest)?;
            let withdrawal = Withdrawal {
                skill: skill.clone(),
                agent,
                dest,
                removed,
            };
            println!("{withdrawal}");
            withdrawals.push(withdrawal);
        }
    }
    Ok(withdrawals)
}
